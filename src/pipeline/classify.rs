// Classification pipeline: corpus -> per-comment topics -> JSON + XLSX.
//
// For each comment, in corpus order:
// 1. Render the classification prompt with the taxonomy
// 2. Ask the model (one call, awaited before the next comment)
// 3. Normalize the answer; unparseable answers become ParseFailed
// 4. Record it in the AnnotationSet
//
// A backend error aborts the run before anything is written. Outputs are
// written once, after the loop.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::completion::CompletionClient;
use crate::corpus::load_comments;
use crate::normalize::{normalize_classification, TaxonomyPolicy};
use crate::output::{truncate_chars, AnnotationSet, OutputPaths};
use crate::prompt::{classification_prompt, PromptContext};
use crate::taxonomy::Taxonomy;

/// Default item ceiling. Caps spend per run, not a correctness bound.
pub const DEFAULT_LIMIT: usize = 150;

/// Everything the classification pipeline needs besides the client.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub model_id: String,
    /// Most comments to annotate in this run
    pub limit: usize,
    pub taxonomy: Taxonomy,
    pub policy: TaxonomyPolicy,
    pub context: PromptContext,
    pub text_column: String,
}

impl ClassifyOptions {
    /// Options with the study defaults for everything but the model.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            limit: DEFAULT_LIMIT,
            taxonomy: Taxonomy::default(),
            policy: TaxonomyPolicy::default(),
            context: PromptContext::default(),
            text_column: "Description".to_string(),
        }
    }
}

/// What a classification run produced.
#[derive(Debug)]
pub struct ClassifyReport {
    pub annotations: AnnotationSet,
    /// Repeated comments that were skipped without a model call
    pub duplicates_skipped: usize,
    pub json_path: PathBuf,
    pub xlsx_path: PathBuf,
}

/// Run the classification pipeline over the corpus at `corpus`.
pub async fn run(
    client: &dyn CompletionClient,
    corpus: &Path,
    options: &ClassifyOptions,
) -> Result<ClassifyReport> {
    let comments = load_comments(corpus, &options.text_column)?;

    let (annotations, duplicates_skipped) = annotate(client, &comments, options).await?;

    let paths = OutputPaths::for_corpus(corpus);
    let json_path = paths.classification_json(&options.model_id);
    let xlsx_path = paths.classification_xlsx(&options.model_id);

    annotations.write_json(&json_path)?;
    annotations.write_xlsx(&xlsx_path)?;

    Ok(ClassifyReport {
        annotations,
        duplicates_skipped,
        json_path,
        xlsx_path,
    })
}

/// Annotate `comments` in order until `options.limit` distinct comments
/// are recorded. Returns the annotations and the number of duplicates
/// skipped on the way.
pub async fn annotate(
    client: &dyn CompletionClient,
    comments: &[String],
    options: &ClassifyOptions,
) -> Result<(AnnotationSet, usize)> {
    let mut annotations = AnnotationSet::new();
    let mut duplicates = 0usize;

    let pb = ProgressBar::new(options.limit.min(comments.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Classifying [{bar:30}] {pos}/{len} ({eta})")
            .expect("valid template"),
    );

    for comment in comments {
        if annotations.len() >= options.limit {
            info!(limit = options.limit, "Item ceiling reached");
            break;
        }

        if annotations.contains(comment) {
            duplicates += 1;
            debug!(comment = %truncate_chars(comment, 80), "Skipping repeated comment");
            continue;
        }

        let prompt = classification_prompt(&options.context, comment, &options.taxonomy);
        let raw = client
            .complete(&prompt, &options.model_id)
            .await
            .with_context(|| {
                format!(
                    "Model {} failed on comment \"{}\"",
                    options.model_id,
                    truncate_chars(comment, 80)
                )
            })?;

        let annotation =
            normalize_classification(comment, &raw, &options.taxonomy, options.policy);
        debug!(
            comment = %truncate_chars(comment, 80),
            annotation = ?annotation,
            "Comment classified"
        );

        annotations.insert(comment.clone(), annotation);
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        annotated = annotations.len(),
        failed = annotations.failure_count(),
        duplicates = duplicates,
        "Classification complete"
    );

    Ok((annotations, duplicates))
}
