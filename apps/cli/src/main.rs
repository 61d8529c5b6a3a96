//! LeetTutor CLI: LeetCode problems as ready-to-run notebook cells.
//!
//! Fetches a problem (or the daily challenge), converts it to markdown,
//! prepares the Python starter code and a test harness, and appends the
//! result to a Jupyter notebook.

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
