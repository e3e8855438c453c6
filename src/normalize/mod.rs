// Response normalization: from raw model text to structured topics.
//
// Classification answers are parsed into an Annotation. A parse failure is
// recovered locally: the item becomes Annotation::ParseFailed and the run
// continues. Discovery answers are only unwrapped, never parsed.

pub mod annotation;
pub mod classification;
pub mod fences;

pub use annotation::{Annotation, PARSE_FAILED_SENTINEL};
pub use classification::{parse_topics, ParseFailure, TaxonomyPolicy, MAX_TOPICS};
pub use fences::strip_fences;

use tracing::warn;

use crate::output::truncate_chars;
use crate::taxonomy::Taxonomy;

/// Normalize one classification answer for `comment`.
///
/// Never fails: anything that does not yield one to three usable topics is
/// logged with the reason and recorded as `Annotation::ParseFailed`.
pub fn normalize_classification(
    comment: &str,
    raw: &str,
    taxonomy: &Taxonomy,
    policy: TaxonomyPolicy,
) -> Annotation {
    match parse_topics(raw, taxonomy, policy) {
        Ok(topics) => Annotation::Topics(topics),
        Err(reason) => {
            warn!(
                comment = %truncate_chars(comment, 80),
                response = %truncate_chars(raw.trim(), 120),
                reason = %reason,
                "Could not classify comment"
            );
            Annotation::ParseFailed
        }
    }
}

/// Normalize one discovery answer: fences and outer whitespace removed,
/// content kept verbatim.
pub fn normalize_discovery(raw: &str) -> String {
    strip_fences(raw)
}
