// AnnotationSet: the ordered comment -> annotation map of one run.
//
// Insertion order is corpus order, and both writers iterate in that order,
// so a fixed corpus and fixed model answers always produce byte-identical
// JSON. The set is written once, after the last comment is processed.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use tracing::{info, warn};

use crate::normalize::Annotation;
use crate::output::truncate_chars;

/// Excel refuses cells longer than this many characters. Longer comments
/// are clipped in the spreadsheet only; the JSON keeps the full text.
pub const XLSX_MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    entries: IndexMap<String, Annotation>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the annotation for `comment`. Returns false (and keeps the
    /// first annotation) if the comment was already recorded.
    pub fn insert(&mut self, comment: String, annotation: Annotation) -> bool {
        if self.entries.contains_key(&comment) {
            return false;
        }
        self.entries.insert(comment, annotation);
        true
    }

    pub fn contains(&self, comment: &str) -> bool {
        self.entries.contains_key(comment)
    }

    pub fn get(&self, comment: &str) -> Option<&Annotation> {
        self.entries.get(comment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Annotation)> {
        self.entries.iter().map(|(c, a)| (c.as_str(), a))
    }

    /// Number of comments recorded as parse failures.
    pub fn failure_count(&self) -> usize {
        self.entries.values().filter(|a| a.is_failed()).count()
    }

    /// How often each topic was assigned, most frequent first (ties by name).
    pub fn topic_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for topics in self.entries.values().filter_map(Annotation::topics) {
            for topic in topics {
                *counts.entry(topic.as_str()).or_default() += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(topic, n)| (topic.to_string(), n))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Tabular rendering: one (comment, joined topics) row per entry.
    pub fn rows(&self) -> impl Iterator<Item = (&str, String)> {
        self.entries.iter().map(|(c, a)| (c.as_str(), a.to_cell()))
    }

    /// Pretty-printed JSON (four-space indent, non-ASCII left unescaped).
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries
            .serialize(&mut serializer)
            .context("Failed to serialize annotations")?;
        String::from_utf8(buf).context("Serialized annotations are not UTF-8")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), entries = self.len(), "JSON written");
        Ok(())
    }

    /// Two-column spreadsheet: "Comment" and "Topics".
    pub fn write_xlsx(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        sheet.write_string_with_format(0, 0, "Comment", &header)?;
        sheet.write_string_with_format(0, 1, "Topics", &header)?;
        sheet.set_column_width(0, 80)?;
        sheet.set_column_width(1, 50)?;

        for (i, (comment, topics)) in self.rows().enumerate() {
            let row = u32::try_from(i + 1).context("Too many rows for a worksheet")?;
            if comment.chars().count() > XLSX_MAX_CELL_CHARS {
                warn!(
                    row = row,
                    comment = %truncate_chars(comment, 80),
                    "Comment too long for a spreadsheet cell, clipped in the xlsx only"
                );
            }
            sheet.write_string(row, 0, clip_cell(comment))?;
            sheet.write_string(row, 1, clip_cell(&topics))?;
        }

        workbook
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = self.len(), "Spreadsheet written");
        Ok(())
    }
}

fn clip_cell(text: &str) -> &str {
    match text.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
