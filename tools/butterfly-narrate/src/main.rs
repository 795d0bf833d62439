use anyhow::Result;
use butterfly_narrate::cli::Cli;
use clap::Parser;

fn main() -> Result<()> {
    Cli::parse().run()
}
