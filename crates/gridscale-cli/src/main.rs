//! gridscale — scaling-policy toolbox.
//!
//! Decodes policy files the same way the autoscaler does, so authors can
//! check a file before shipping it:
//!
//! ```text
//! gridscale validate ./policies
//! gridscale show ./policies/web.toml --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gridscale",
    about = "GridScale — scaling policy toolbox",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode policy files and report every problem found.
    Validate {
        /// Policy files or directories to check.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Recurse into subdirectories.
        #[arg(short, long)]
        recursive: bool,
    },
    /// Decode policy files and print the resulting policies.
    Show {
        /// Policy file or directory to render.
        path: PathBuf,
        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Recurse into subdirectories.
        #[arg(short, long)]
        recursive: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { paths, recursive } => commands::validate::validate(&paths, recursive),
        Commands::Show {
            path,
            format,
            recursive,
        } => commands::show::show(&path, &format, recursive),
    }
}
