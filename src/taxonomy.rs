// Topic taxonomy: the closed label set used in classification mode.
//
// The default list comes from the Braskem CPI study the tool was built for.
// Labels are kept verbatim (including their original spelling) because
// published results reference them by exact string.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

/// Labels of the original study, in the order they are shown to the model.
pub const DEFAULT_TOPICS: &[&str] = &[
    "Responsabilidade da Braskem",
    "Crime ambiental",
    "Omissão dos órgãos públicos",
    "Disputa política",
    "Impacto na população",
    "Acordo da Braskem",
    "Relatório da CPI",
    "Mina 18",
    "Colpaso Mina",
    "Afundamento do solo",
    "Reparação das vítimas",
    "Corrupção",
    "Justiça e indenização",
    "Petrobras Odebrecht",
    "Estado Omisso",
    "Lira e Calheiros",
    "Falta de credibilidade da CPI",
    "Exploração gananciosa",
];

/// An ordered, duplicate-free list of topic labels. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    labels: Vec<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            labels: DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Taxonomy {
    /// Build a taxonomy from labels, trimming whitespace and dropping
    /// blanks and repeats (first spelling wins).
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }
            if seen.insert(fold(label)) {
                kept.push(label.to_string());
            }
        }

        if kept.is_empty() {
            anyhow::bail!("Taxonomy must contain at least one topic label");
        }

        Ok(Self { labels: kept })
    }

    /// Load a taxonomy file: one label per line, `#` starts a comment line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file {}", path.display()))?;

        let labels = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'));

        Self::new(labels).with_context(|| format!("Invalid taxonomy file {}", path.display()))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Look up a label ignoring case and surrounding whitespace.
    /// Returns the taxonomy's own spelling.
    pub fn canonical(&self, label: &str) -> Option<&str> {
        let wanted = fold(label.trim());
        self.labels
            .iter()
            .find(|known| fold(known) == wanted)
            .map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.canonical(label).is_some()
    }
}

fn fold(label: &str) -> String {
    label.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_has_study_labels_in_order() {
        let taxonomy = Taxonomy::default();
        assert_eq!(taxonomy.len(), 18);
        assert_eq!(taxonomy.labels()[0], "Responsabilidade da Braskem");
        assert_eq!(taxonomy.labels()[17], "Exploração gananciosa");
    }

    #[test]
    fn test_canonical_ignores_case_and_whitespace() {
        let taxonomy = Taxonomy::default();
        assert_eq!(
            taxonomy.canonical("  crime AMBIENTAL "),
            Some("Crime ambiental")
        );
        assert_eq!(
            taxonomy.canonical("omissão dos órgãos públicos"),
            Some("Omissão dos órgãos públicos")
        );
        assert_eq!(taxonomy.canonical("Futebol"), None);
    }

    #[test]
    fn test_new_dedupes_and_skips_blanks() {
        let taxonomy = Taxonomy::new(["A", " ", "b", "a", "B "]).unwrap();
        assert_eq!(taxonomy.labels(), &["A".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Taxonomy::new(Vec::<String>::new()).is_err());
        assert!(Taxonomy::new(["", "   "]).is_err());
    }

    #[test]
    fn test_from_file_skips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.txt");
        std::fs::write(&path, "# study labels\nCorrupção\n\nMina 18\n").unwrap();

        let taxonomy = Taxonomy::from_file(&path).unwrap();
        assert_eq!(taxonomy.labels(), &["Corrupção".to_string(), "Mina 18".to_string()]);
    }
}
