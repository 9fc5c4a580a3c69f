//! KaiCanvas CLI: rich-text rendering and composition enhancement.
//!
//! Renders Kontent.ai rich text to HTML, runs the parameter enhancement
//! pass over compositions, and fetches enhanced routes.

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
