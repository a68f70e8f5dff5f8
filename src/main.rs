// Parts of the session and stats API exist for library-style
// callers and tests, not the two CLI paths.
#![allow(dead_code)]
#![recursion_limit = "256"]

mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("digit_model=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
