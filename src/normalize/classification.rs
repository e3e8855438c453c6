// Classification answer parsing.
//
// Expected answer: {"Topics": ["label", ...]} with one to three labels from
// the taxonomy, possibly wrapped in code fences or a sentence of preamble.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::fences::strip_fences;
use crate::taxonomy::Taxonomy;

/// Most topics kept per comment. Extra labels are dropped from the tail.
pub const MAX_TOPICS: usize = 3;

/// Why an answer could not be turned into topics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    #[error("answer is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("answer has no \"Topics\" key")]
    MissingTopics,

    #[error("\"Topics\" is not a list of strings")]
    NotAStringList,

    #[error("\"Topics\" is empty")]
    NoTopics,

    #[error("topics outside the taxonomy: {}", .0.join(", "))]
    OutsideTaxonomy(Vec<String>),
}

/// How to treat labels the model returns that are not in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaxonomyPolicy {
    /// Trust the model: keep every label as written.
    Keep,
    /// Keep known labels (in the taxonomy's spelling) and discard the rest.
    /// An answer left with no known label fails.
    #[default]
    Drop,
    /// Fail the whole answer if any label is unknown.
    Reject,
}

impl FromStr for TaxonomyPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(TaxonomyPolicy::Keep),
            "drop" => Ok(TaxonomyPolicy::Drop),
            "reject" => Ok(TaxonomyPolicy::Reject),
            other => anyhow::bail!(
                "Unknown taxonomy policy '{other}'. Expected keep, drop or reject."
            ),
        }
    }
}

impl fmt::Display for TaxonomyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaxonomyPolicy::Keep => "keep",
            TaxonomyPolicy::Drop => "drop",
            TaxonomyPolicy::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Parse a raw classification answer into one to three topics.
pub fn parse_topics(
    raw: &str,
    taxonomy: &Taxonomy,
    policy: TaxonomyPolicy,
) -> Result<Vec<String>, ParseFailure> {
    let text = strip_fences(raw);
    let value = parse_json_object(&text)?;

    let labels = value
        .get("Topics")
        .ok_or(ParseFailure::MissingTopics)?
        .as_array()
        .ok_or(ParseFailure::NotAStringList)?
        .iter()
        .map(|item| item.as_str().map(str::trim))
        .collect::<Option<Vec<&str>>>()
        .ok_or(ParseFailure::NotAStringList)?;

    let labels: Vec<&str> = labels.into_iter().filter(|l| !l.is_empty()).collect();
    if labels.is_empty() {
        return Err(ParseFailure::NoTopics);
    }

    let mut unknown = Vec::new();
    let mut resolved = Vec::with_capacity(labels.len());
    for label in labels {
        match (policy, taxonomy.canonical(label)) {
            (TaxonomyPolicy::Keep, _) => resolved.push(label.to_string()),
            (_, Some(canonical)) => resolved.push(canonical.to_string()),
            (_, None) => unknown.push(label.to_string()),
        }
    }

    if !unknown.is_empty() {
        if policy == TaxonomyPolicy::Reject || resolved.is_empty() {
            return Err(ParseFailure::OutsideTaxonomy(unknown));
        }
        debug!(dropped = ?unknown, "Dropped topics outside the taxonomy");
    }

    let mut seen = HashSet::new();
    resolved.retain(|topic| seen.insert(topic.to_lowercase()));
    resolved.truncate(MAX_TOPICS);

    Ok(resolved)
}

/// Parse `text` as a JSON object. If the whole text is not JSON, retry on
/// the span from the first `{` to the last `}` to get past prose around it.
fn parse_json_object(text: &str) -> Result<Value, ParseFailure> {
    let first_error = match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_object() => return Ok(value),
        Ok(_) => return Err(ParseFailure::MissingTopics),
        Err(e) => e.to_string(),
    };

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
    }

    Err(ParseFailure::InvalidJson(first_error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Vec<String>, ParseFailure> {
        parse_topics(raw, &Taxonomy::default(), TaxonomyPolicy::Drop)
    }

    #[test]
    fn test_plain_json_answer() {
        assert_eq!(
            parse(r#"{"Topics": ["Mina 18", "Corrupção"]}"#).unwrap(),
            vec!["Mina 18", "Corrupção"]
        );
    }

    #[test]
    fn test_preamble_around_json_is_tolerated() {
        let raw = "Claro! Aqui está: {\"Topics\": [\"Corrupção\"]} Espero ter ajudado.";
        assert_eq!(parse(raw).unwrap(), vec!["Corrupção"]);
    }

    #[test]
    fn test_non_object_json_is_missing_topics() {
        assert_eq!(parse(r#"["Mina 18"]"#), Err(ParseFailure::MissingTopics));
    }

    #[test]
    fn test_invalid_json_reports_reason() {
        assert!(matches!(parse("not json"), Err(ParseFailure::InvalidJson(_))));
    }

    #[test]
    fn test_keep_policy_preserves_model_spelling() {
        let topics = parse_topics(
            r#"{"Topics": ["crime ambiental", "Futebol"]}"#,
            &Taxonomy::default(),
            TaxonomyPolicy::Keep,
        )
        .unwrap();
        assert_eq!(topics, vec!["crime ambiental", "Futebol"]);
    }

    #[test]
    fn test_policy_round_trips_through_str() {
        for policy in [TaxonomyPolicy::Keep, TaxonomyPolicy::Drop, TaxonomyPolicy::Reject] {
            assert_eq!(policy.to_string().parse::<TaxonomyPolicy>().unwrap(), policy);
        }
        assert!("maybe".parse::<TaxonomyPolicy>().is_err());
    }
}
