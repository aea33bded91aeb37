mod cli;
mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = cli::Cli::parse().into_config()?;
    platform::run_app(config)
}
