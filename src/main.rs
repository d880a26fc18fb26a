use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vectorizectl::{VectorizeWrapper, DEFAULT_NUM_RESULTS};

/// Retrieve documents from a Vectorize pipeline.
///
/// Configuration is read from the VECTORIZE_PIPELINE_ACCESS_TOKEN,
/// VECTORIZE_ORGANIZATION_ID and VECTORIZE_PIPELINE_ID environment variables.
#[derive(Parser, Debug)]
#[command(name = "vectorizectl", version)]
struct Cli {
    /// The question to retrieve documents for.
    #[arg(required_unless_present = "check_env")]
    question: Option<String>,

    /// How many documents to request.
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_RESULTS)]
    num_results: u32,

    /// Only report which required environment variables are set.
    #[arg(long)]
    check_env: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Logs go to stderr so stdout stays parseable JSON.
/// `RUST_LOG` takes precedence over `--verbose` when set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints each required variable and whether it's set.
/// Returns whether all of them are.
fn check_env() -> bool {
    let mut all_present = true;
    for name in VectorizeWrapper::required_env_vars() {
        let present = std::env::var(name).map_or(false, |value| !value.is_empty());
        all_present &= present;
        println!("{name}: {}", if present { "set" } else { "missing" });
    }
    all_present
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.check_env {
        return Ok(if check_env() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // Configuration problems are fatal, unlike retrieval ones.
    let wrapper = VectorizeWrapper::from_env()?;
    tracing::debug!(config = ?wrapper.config(), "created Vectorize client");

    let question = cli.question.unwrap_or_default();
    let documents = wrapper.retrieve(&question, Some(cli.num_results)).await;
    tracing::info!(count = documents.len(), "retrieved documents");

    let output =
        serde_json::to_string_pretty(&documents).context("unable to serialize documents")?;
    println!("{output}");
    Ok(ExitCode::SUCCESS)
}
