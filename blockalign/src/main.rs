use anyhow::Result;
use blockalign::{build, extract};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a multiple alignment from pairwise alignments, optionally edit it, and print it.
    Build(build::Cli),

    /// Build a multiple alignment and extract some of its rows as pairwise alignments.
    Extract(extract::Cli),
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Build(cli) => build::cli(cli),
        Command::Extract(cli) => extract::cli(cli),
    }
}
