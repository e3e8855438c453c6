// Unit tests for the CSV corpus loader.
//
// Covers the column check (the only fatal input error), missing-value
// handling, and text coercion of odd cells.

use std::io::Write;

use topica::corpus::{load_comments, read_comments, CorpusError};

fn read(csv: &str) -> Result<Vec<String>, CorpusError> {
    read_comments(csv.as_bytes(), "Description", "test.csv")
}

// ============================================================
// Column check
// ============================================================

#[test]
fn missing_description_column_is_a_schema_error() {
    let err = read("Text,Likes\nolá,3\n").unwrap_err();
    match err {
        CorpusError::MissingColumn { column, found, .. } => {
            assert_eq!(column, "Description");
            assert_eq!(found, "Text, Likes");
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn column_name_match_is_exact() {
    assert!(matches!(
        read("description\nolá\n"),
        Err(CorpusError::MissingColumn { .. })
    ));
}

#[test]
fn configurable_column_name() {
    let comments = read_comments("id,Texto\n1,bom dia\n".as_bytes(), "Texto", "t.csv").unwrap();
    assert_eq!(comments, vec!["bom dia"]);
}

#[test]
fn header_only_corpus_is_empty_not_an_error() {
    assert!(read("Description,Likes\n").unwrap().is_empty());
}

// ============================================================
// Missing values and coercion
// ============================================================

#[test]
fn missing_cells_are_dropped_in_order() {
    let csv = "Likes,Description\n\
               1,primeiro\n\
               2,\n\
               3,NaN\n\
               4,   \n\
               5,segundo\n\
               6,null\n";
    assert_eq!(read(csv).unwrap(), vec!["primeiro", "segundo"]);
}

#[test]
fn every_dataframe_na_spelling_is_dropped() {
    let mut csv = String::from("Description\nantes\n");
    for marker in [
        "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
        "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ] {
        csv.push_str(marker);
        csv.push('\n');
    }
    csv.push_str("depois\n");
    assert_eq!(read(&csv).unwrap(), vec!["antes", "depois"]);
}

#[test]
fn short_rows_count_as_missing() {
    let csv = "Likes,Description\n1,um\n2\n3,três\n";
    assert_eq!(read(csv).unwrap(), vec!["um", "três"]);
}

#[test]
fn numbers_and_quoted_multiline_cells_become_text() {
    let csv = "Description\n42\n\"linha um\nlinha dois, com vírgula\"\n";
    assert_eq!(
        read(csv).unwrap(),
        vec!["42", "linha um\nlinha dois, com vírgula"]
    );
}

#[test]
fn invalid_utf8_is_coerced_lossily() {
    let mut bytes = b"Description\n".to_vec();
    bytes.extend_from_slice(b"ol\xe1\n");
    let comments = read_comments(bytes.as_slice(), "Description", "latin1.csv").unwrap();
    assert_eq!(comments.len(), 1);
    assert!(comments[0].starts_with("ol"));
}

// ============================================================
// Files
// ============================================================

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Description").unwrap();
    writeln!(file, "A Braskem precisa pagar").unwrap();
    file.flush().unwrap();

    let comments = load_comments(file.path(), "Description").unwrap();
    assert_eq!(comments, vec!["A Braskem precisa pagar"]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_comments(&dir.path().join("nope.csv"), "Description").unwrap_err();
    assert!(matches!(err, CorpusError::Io { .. }));
}
