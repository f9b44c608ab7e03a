//! # mau CLI
//!
//! Command-line front end for the mau markup parser.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mau")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML file with the initial environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Set an environment entry (dotted key), applied after --config
    #[arg(long = "var", value_name = "KEY=VALUE", global = true)]
    vars: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its node tree
    Outline {
        /// Source file
        file: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the document-level tokens of a file
    Tokens {
        /// Source file
        file: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Parse a file and report whether it is valid
    Check {
        /// Source file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::WARN.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let environment = commands::load_environment(cli.config.as_deref(), &cli.vars)?;

    match cli.command {
        Commands::Outline { file, json } => commands::show_outline(&file, environment, json),
        Commands::Tokens { file, json } => commands::show_tokens(&file, json),
        Commands::Check { file } => commands::check_file(&file, environment),
    }
}
