// CSV corpus loader.
//
// Reads the header row, locates the text column by exact name, and yields
// every non-missing cell of that column as a String in file order. Rows may
// be ragged (social-media exports often are); a row too short to reach the
// text column counts as a missing value.

use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

/// Cell spellings treated as missing values, matching what spreadsheet and
/// dataframe tooling writes for "no value".
pub const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Error)]
pub enum CorpusError {
    /// The required text column is absent from the header row.
    #[error("Corpus {path} has no '{column}' column (found: {found})")]
    MissingColumn {
        path: String,
        column: String,
        found: String,
    },

    #[error("Failed to read corpus {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Load the comments in `column` from the CSV file at `path`.
pub fn load_comments(path: &Path, column: &str) -> Result<Vec<String>, CorpusError> {
    let file = std::fs::File::open(path).map_err(|source| CorpusError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let comments = read_comments(file, column, &path.display().to_string())?;

    info!(
        path = %path.display(),
        column = column,
        count = comments.len(),
        "Corpus loaded"
    );

    Ok(comments)
}

/// Load comments from any CSV source. `origin` names the source in errors.
pub fn read_comments<R: Read>(
    source: R,
    column: &str,
    origin: &str,
) -> Result<Vec<String>, CorpusError> {
    let csv_err = |source: csv::Error| CorpusError::Csv {
        path: origin.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.byte_headers().map_err(csv_err)?.clone();
    let header_names: Vec<String> = headers
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}').to_string())
        .collect();

    let index = header_names
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| CorpusError::MissingColumn {
            path: origin.to_string(),
            column: column.to_string(),
            found: header_names.join(", "),
        })?;

    let mut comments = Vec::new();
    let mut dropped = 0usize;

    for record in reader.byte_records() {
        let record = record.map_err(csv_err)?;
        match record.get(index).map(String::from_utf8_lossy) {
            Some(cell) if !is_missing(&cell) => comments.push(cell.into_owned()),
            _ => dropped += 1,
        }
    }

    debug!(kept = comments.len(), dropped = dropped, "Dropped missing cells");

    Ok(comments)
}

fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NA_MARKERS.contains(&trimmed)
}
