// Annotation: the per-comment outcome of classification.
//
// In memory this is a tagged value, so a real topic can never be mistaken
// for a failure. On disk it keeps the established format: a list of topic
// strings, or the sentinel string in place of the list.

use serde::ser::{Serialize, Serializer};

/// Value persisted for a comment whose answer could not be parsed.
pub const PARSE_FAILED_SENTINEL: &str = "Erro ao classificar o comentário";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// One to three topics, in the order the model gave them.
    Topics(Vec<String>),
    /// The model's answer was unusable.
    ParseFailed,
}

impl Annotation {
    pub fn topics(&self) -> Option<&[String]> {
        match self {
            Annotation::Topics(topics) => Some(topics),
            Annotation::ParseFailed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Annotation::ParseFailed)
    }

    /// Single-cell rendering for tabular output: topics joined by ", ",
    /// or the sentinel.
    pub fn to_cell(&self) -> String {
        match self {
            Annotation::Topics(topics) => topics.join(", "),
            Annotation::ParseFailed => PARSE_FAILED_SENTINEL.to_string(),
        }
    }
}

impl Serialize for Annotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Annotation::Topics(topics) => topics.serialize(serializer),
            Annotation::ParseFailed => serializer.serialize_str(PARSE_FAILED_SENTINEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_serialize_as_list() {
        let a = Annotation::Topics(vec!["Mina 18".into(), "Corrupção".into()]);
        assert_eq!(serde_json::to_string(&a).unwrap(), r#"["Mina 18","Corrupção"]"#);
    }

    #[test]
    fn test_failure_serializes_as_sentinel() {
        assert_eq!(
            serde_json::to_string(&Annotation::ParseFailed).unwrap(),
            format!("\"{PARSE_FAILED_SENTINEL}\"")
        );
    }

    #[test]
    fn test_cell_rendering() {
        let a = Annotation::Topics(vec!["A".into(), "B".into(), "C".into()]);
        assert_eq!(a.to_cell(), "A, B, C");
        assert_eq!(Annotation::ParseFailed.to_cell(), PARSE_FAILED_SENTINEL);
    }
}
