//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use supportdesk_core::{PipelineProgress, QueryPipeline, Stage};
use supportdesk_llm::{OpenRouterClient, OpenRouterOptions};
use supportdesk_retrieval::{HttpVectorStore, HttpVectorStoreOptions, RetrievalGateway};
use supportdesk_shared::{
    AppConfig, SupportDeskError, init_config, load_config, load_config_from, validate_api_key,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SupportDesk: answer support questions from your documentation.
#[derive(Parser)]
#[command(
    name = "supportdesk",
    version,
    about = "Answer support queries with retrieved documentation and typed responses.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.supportdesk/supportdesk.toml.
    #[arg(long, global = true, env = "SUPPORTDESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Answer a single support query and print the JSON response.
    Ask {
        /// The user's question.
        query: String,

        /// Pretty-print the JSON response.
        #[arg(long)]
        pretty: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "supportdesk=warn",
        1 => "supportdesk=info",
        2 => "supportdesk=debug",
        _ => "supportdesk=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Ask { query, pretty } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_ask(&config, &query, pretty).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => {
                let config = resolve_config(cli.config.as_deref())?;
                cmd_config_show(&config).await
            }
        },
    }
}

/// Load the `--config` file if given, else the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

async fn cmd_ask(config: &AppConfig, query: &str, pretty: bool) -> Result<()> {
    validate_query(query)?;

    let api_key = validate_api_key(config)?;
    let model = OpenRouterClient::new(OpenRouterOptions::from_config(config, api_key))?;
    let store = HttpVectorStore::new(HttpVectorStoreOptions::from_config(config))?;

    let pipeline = QueryPipeline::from_config(
        config,
        RetrievalGateway::new(Arc::new(store)),
        Arc::new(model),
    );

    info!(
        model = %config.llm.model,
        collection = %config.vector_store.collection,
        "answering query"
    );

    let progress = CliProgress::new();
    let response = pipeline.answer_query_with_progress(query, &progress).await;
    progress.finish();

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");

    if response.is_error() {
        return Err(eyre!("query could not be answered"));
    }
    Ok(())
}

/// Reject a blank query before any client is built.
fn validate_query(query: &str) -> supportdesk_shared::Result<()> {
    if query.trim().is_empty() {
        return Err(SupportDeskError::validation("query must not be empty"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Spinner on stderr showing the current pipeline stage.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl PipelineProgress for CliProgress {
    fn stage(&self, stage: Stage) {
        let message = match stage {
            Stage::Retrieving => "Searching documentation",
            Stage::Gating => "Checking relevance",
            Stage::Classifying => "Classifying question",
            Stage::Synthesizing => "Writing answer",
            Stage::Responding => "Preparing response",
            Stage::Done | Stage::Failed => return,
        };
        self.spinner.set_message(message);
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ask_with_flags() {
        let cli = Cli::try_parse_from([
            "supportdesk",
            "-vv",
            "ask",
            "Can I get a refund?",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Ask { query, pretty } => {
                assert_eq!(query, "Can I get a refund?");
                assert!(pretty);
            }
            Command::Config { .. } => panic!("expected ask"),
        }
    }

    #[test]
    fn blank_query_is_a_validation_error() {
        let err = validate_query("   \n").unwrap_err();
        assert!(matches!(err, SupportDeskError::Validation { .. }));
        assert!(err.to_string().contains("query must not be empty"));
        assert!(validate_query("How do I reset my password?").is_ok());
    }
}
