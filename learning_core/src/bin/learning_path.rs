//! `learning-path` - run the personalization core from the command line.
//!
//! Prints JSON to stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use learning_core::{
    GenerationAdapter, InMemoryCatalog, PersonalizationEngine, QuestionDifficulty, TutorConfig,
};
use learning_rules::{LearnerProfile, RuleSet, DEFAULT_LEARNING_STYLE, DEFAULT_PACING};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "learning-path")]
#[command(about = "Personalized learning paths and practice content", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, env = "PATHWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a learning path for a profile
    Path {
        #[arg(long, default_value = DEFAULT_LEARNING_STYLE)]
        style: String,

        #[arg(long, default_value = DEFAULT_PACING)]
        pacing: String,

        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        level: i64,
    },

    /// Generate practice questions about a topic
    Questions {
        #[arg(short, long)]
        topic: String,

        /// 1 = beginner, 3 = expert, anything else = intermediate
        #[arg(short, long, default_value_t = 2)]
        difficulty: i64,
    },

    /// Ask the tutor a question
    Chat {
        #[arg(short, long)]
        message: String,

        /// Title of the unit being studied
        #[arg(short, long)]
        unit: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("learning_core=debug,learning_rules=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("learning_core=info,learning_rules=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<TutorConfig> {
    let mut config = match path {
        Some(path) => TutorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TutorConfig::default(),
    };
    config.apply_env();
    debug!(?config, "Resolved configuration");
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Path {
            style,
            pacing,
            level,
        } => {
            let rules = RuleSet::load(&config.rules_path)
                .with_context(|| format!("loading rules {}", config.rules_path.display()))?;
            let catalog = InMemoryCatalog::load(&config.catalog_path)
                .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;

            let engine = PersonalizationEngine::new(Arc::new(catalog), rules.into_shared());
            let path = engine
                .generate_path(&LearnerProfile::new(style, pacing, level))
                .await?;
            print_json(&path)
        }
        Commands::Questions { topic, difficulty } => {
            let adapter = GenerationAdapter::from_config(&config.generation);
            let questions = adapter
                .generate_questions(&topic, QuestionDifficulty::from_level(difficulty))
                .await;
            print_json(&questions)
        }
        Commands::Chat { message, unit } => {
            let adapter = GenerationAdapter::from_config(&config.generation);
            let reply = adapter.chat_response(&message, unit.as_deref()).await;
            print_json(&serde_json::json!({ "response": reply }))
        }
    }
}
