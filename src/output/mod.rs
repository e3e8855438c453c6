// Output: persisted result files and terminal summaries.

pub mod annotations;
pub mod paths;
pub mod terminal;

pub use annotations::{AnnotationSet, XLSX_MAX_CELL_CHARS};
pub use paths::{sanitize_model_id, OutputPaths};

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on accented letters or emoji, which the corpus is full of.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("Omissão", 6), "Omissã...");
        assert_eq!(truncate_chars("curto", 10), "curto");
    }
}
