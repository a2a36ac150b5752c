//! SupportDesk CLI: answer a support query from documentation.
//!
//! Runs the retrieval → relevance → classification/synthesis pipeline once
//! and prints the structured response as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
