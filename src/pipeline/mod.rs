// Annotation pipelines.
//
// classify: one prompt and one completion per comment, against a fixed
//           taxonomy, until the item ceiling is reached.
// discover: one corpus-wide prompt swept across several models, each
//           model's answer saved as-is.
//
// Both run strictly one call at a time. Backend quotas are per minute and
// the rate limiter paces calls, so there is nothing to gain from overlap.

pub mod classify;
pub mod discover;

pub use classify::{ClassifyOptions, ClassifyReport, DEFAULT_LIMIT};
pub use discover::{DiscoverOptions, DiscoveryReport};
