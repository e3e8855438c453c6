// Discovery pipeline: whole corpus -> one prompt -> topic list per model.
//
// The rendered prompt is saved first so every run can be audited against
// exactly what the models saw. Each model in the sweep then gets the same
// prompt, and its answer (fences stripped, otherwise verbatim) is written
// to its own file. No comparison across models happens here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use crate::completion::CompletionClient;
use crate::corpus::load_comments;
use crate::normalize::normalize_discovery;
use crate::output::OutputPaths;
use crate::prompt::{discovery_prompt, estimate_tokens, PromptContext};

#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Models to sweep, in order
    pub models: Vec<String>,
    pub context: PromptContext,
    pub text_column: String,
}

impl DiscoverOptions {
    pub fn new(models: Vec<String>) -> Self {
        Self {
            models,
            context: PromptContext::default(),
            text_column: "Description".to_string(),
        }
    }
}

/// What a discovery run produced.
#[derive(Debug)]
pub struct DiscoveryReport {
    pub comment_count: usize,
    pub prompt_path: PathBuf,
    pub token_estimate: usize,
    /// (model id, topics file) in sweep order
    pub outputs: Vec<(String, PathBuf)>,
}

/// Run the discovery sweep over the corpus at `corpus`.
pub async fn run(
    client: &dyn CompletionClient,
    corpus: &Path,
    options: &DiscoverOptions,
) -> Result<DiscoveryReport> {
    if options.models.is_empty() {
        anyhow::bail!("No models to sweep. Pass --model or set TOPICA_DISCOVERY_MODELS.");
    }

    let comments = load_comments(corpus, &options.text_column)?;
    if comments.is_empty() {
        anyhow::bail!(
            "Corpus {} has no comments in column '{}'",
            corpus.display(),
            options.text_column
        );
    }

    let prompt = discovery_prompt(&options.context, &comments);
    let token_estimate = estimate_tokens(&prompt);

    let paths = OutputPaths::for_corpus(corpus);
    let prompt_path = paths.discovery_prompt();
    std::fs::write(&prompt_path, &prompt)
        .with_context(|| format!("Failed to write {}", prompt_path.display()))?;

    info!(
        comments = comments.len(),
        tokens = token_estimate,
        path = %prompt_path.display(),
        "Discovery prompt written"
    );

    let mut outputs = Vec::with_capacity(options.models.len());
    for (i, model_id) in options.models.iter().enumerate() {
        println!(
            "  [{}/{}] Asking {}...",
            i + 1,
            options.models.len(),
            model_id.bold()
        );

        let raw = client
            .complete(&prompt, model_id)
            .await
            .with_context(|| format!("Model {model_id} failed on the discovery prompt"))?;
        let topics = normalize_discovery(&raw);

        let topics_path = paths.discovery_topics(model_id);
        std::fs::write(&topics_path, &topics)
            .with_context(|| format!("Failed to write {}", topics_path.display()))?;

        info!(model = %model_id, path = %topics_path.display(), "Topics written");
        outputs.push((model_id.clone(), topics_path));
    }

    Ok(DiscoveryReport {
        comment_count: comments.len(),
        prompt_path,
        token_estimate,
        outputs,
    })
}
