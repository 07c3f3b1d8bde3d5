//! docforge CLI — Markdown-to-PDF document construction step.
//!
//! Assembles a set of Markdown documents into a versioned PDF artifact
//! using an external converter toolchain, and publishes both a versioned
//! and a "latest" copy.

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
