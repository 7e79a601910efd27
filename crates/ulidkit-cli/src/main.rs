#![doc = include_str!("../README.md")]

mod cli;

use std::io::{self, BufWriter, Write};

use clap::Parser;
use cli::commands::run;
use cli::config::{CliArgs, Config};
use cli::telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;

    let config = Config::try_from(args)?;
    tracing::debug!(?config, "starting");

    let mut out = BufWriter::new(io::stdout().lock());
    run(&config, &mut out)?;
    out.flush()?;
    Ok(())
}
