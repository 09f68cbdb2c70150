#![deny(unsafe_code)]

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{edit, join, split};

/// Command-line interface for delimiter-escaped compound names
#[derive(Parser)]
#[command(name = "nomen")]
#[command(author, version)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # Split a dotted name into its components
    nomen split oss.cs.fau.de

    # Split on a different delimiter
    nomen split -d / usr/bin/ls

    # Join raw components, masking delimiter occurrences
    nomen join oss cs.fau de

    # Insert a component at position 1
    nomen edit oss.fau.de insert 1 cs
")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a delimited name into its unmasked components
    Split(split::Args),

    /// Join raw components into a canonical data string
    Join(join::Args),

    /// Apply an edit to a delimited name
    Edit(edit::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Split(args) => split::execute(args),
        Commands::Join(args) => join::execute(args),
        Commands::Edit(args) => edit::execute(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
