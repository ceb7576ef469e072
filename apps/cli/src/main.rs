//! kibela-toc CLI: generate or refresh the table of contents of a Kibela note.
//!
//! Fetches the note's markdown, builds a nested heading list, splices it into
//! the document, and writes the note back (or prints it with `--dry-run`).

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
