//! TeXbuild CLI: builds a LaTeX document from the directives on its first line.
//!
//! Resolves master redirection and defaults, then runs the engine,
//! bibliography manager and viewer.

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
