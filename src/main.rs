use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topica::config::Config;
use topica::pipeline::{ClassifyOptions, DiscoverOptions, DEFAULT_LIMIT};
use topica::prompt::PromptContext;
use topica::taxonomy::Taxonomy;

/// Topica: topic annotation of social-media comments with generative models.
///
/// Classifies each comment of a CSV corpus against a fixed topic taxonomy,
/// or asks one or more models to propose the corpus's topics.
#[derive(Parser)]
#[command(name = "topica", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign one to three taxonomy topics to each comment
    Classify {
        /// CSV corpus with a text column (default column: Description)
        corpus: PathBuf,

        /// Max comments to classify (default: 150)
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Model to use (overrides TOPICA_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Taxonomy file, one topic per line (default: built-in study taxonomy)
        #[arg(long)]
        taxonomy: Option<PathBuf>,
    },

    /// Ask each model for the corpus's main topics
    Discover {
        /// CSV corpus with a text column (default column: Description)
        corpus: PathBuf,

        /// Model to sweep; repeat for several (overrides TOPICA_DISCOVERY_MODELS)
        #[arg(long = "model")]
        models: Vec<String>,
    },

    /// Show the taxonomy used for classification
    Taxonomy {
        /// Taxonomy file to show instead of the built-in one
        #[arg(long)]
        taxonomy: Option<PathBuf>,
    },

    /// Show the resolved configuration and check it is usable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topica=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            corpus,
            limit,
            model,
            taxonomy,
        } => {
            let config = Config::load()?;
            let taxonomy = load_taxonomy(taxonomy.as_deref())?;
            let client = topica::completion::from_config(&config)?;

            let options = ClassifyOptions {
                model_id: model.unwrap_or_else(|| config.classify_model.clone()),
                limit,
                taxonomy,
                policy: config.taxonomy_policy,
                context: PromptContext::new(config.subject.clone()),
                text_column: config.text_column.clone(),
            };

            println!(
                "Classifying up to {} comments from {} with {}...",
                options.limit,
                corpus.display(),
                options.model_id
            );
            info!(model = %options.model_id, limit = options.limit, "Starting classification");

            let report = topica::pipeline::classify::run(client.as_ref(), &corpus, &options).await?;
            topica::output::terminal::display_classification_report(&report, &options.model_id);
        }

        Commands::Discover { corpus, models } => {
            let config = Config::load()?;
            let client = topica::completion::from_config(&config)?;

            let models = if models.is_empty() {
                config.discovery_models.clone()
            } else {
                models
            };

            let options = DiscoverOptions {
                models,
                context: PromptContext::new(config.subject.clone()),
                text_column: config.text_column.clone(),
            };

            println!(
                "Running topic discovery on {} across {} model(s)...",
                corpus.display(),
                options.models.len()
            );
            println!(
                "{}",
                "Calls are paced per model; slow backends may take minutes per answer.".dimmed()
            );

            let report = topica::pipeline::discover::run(client.as_ref(), &corpus, &options).await?;
            topica::output::terminal::display_discovery_report(&report);
        }

        Commands::Taxonomy { taxonomy } => {
            let taxonomy = load_taxonomy(taxonomy.as_deref())?;
            topica::output::terminal::display_taxonomy(&taxonomy);
        }

        Commands::Check => {
            let config = Config::load()?;
            let key_state = |key: &str| {
                if key.is_empty() {
                    "not set".dimmed().to_string()
                } else {
                    "set".green().to_string()
                }
            };

            println!("\n{}", "=== Configuration ===".bold());
            println!("  Backend:              {}", config.backend.name());
            println!("  Classification model: {}", config.classify_model);
            println!("  Discovery models:     {}", config.discovery_models.join(", "));
            println!("  Requests per minute:  {}", config.requests_per_minute);
            println!("  Max retries:          {}", config.max_retries);
            println!("  Text column:          {}", config.text_column);
            println!("  Taxonomy policy:      {}", config.taxonomy_policy);
            println!("  Subject:              {}", config.subject);
            println!("  GEMINI_API_KEY:       {}", key_state(&config.gemini_api_key));
            println!("  OPENAI_API_KEY:       {}", key_state(&config.openai_api_key));
            println!("  ANTHROPIC_API_KEY:    {}", key_state(&config.anthropic_api_key));

            if config.discovery_models.is_empty() {
                println!(
                    "  {} TOPICA_DISCOVERY_MODELS lists no models; discover needs --model",
                    "!".yellow().bold()
                );
            }

            match config.require_backend() {
                Ok(()) => println!("\n{}", "Ready.".green().bold()),
                Err(e) => println!("\n{} {}", "Not ready:".red().bold(), e),
            }
        }
    }

    Ok(())
}

/// Use the taxonomy file if one was given, the built-in study taxonomy otherwise.
fn load_taxonomy(path: Option<&Path>) -> Result<Taxonomy> {
    match path {
        Some(path) => Taxonomy::from_file(path),
        None => Ok(Taxonomy::default()),
    }
}
