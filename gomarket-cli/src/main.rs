// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `GoMarket` CLI - inspect and edit the locally persisted cart.
//!
//! # Examples
//!
//! ```bash
//! # Show the cart (default)
//! gomarket
//!
//! # Add a product
//! gomarket add --id 1 --title "Coffee beans" --image-url https://img/1.png --price 10
//!
//! # Change quantities
//! gomarket inc 1
//! gomarket dec 1
//!
//! # JSON output
//! gomarket --format json --pretty
//!
//! # Use another storage directory
//! gomarket --storage-dir /tmp/cart show
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{cart, path};

// ============================================================================
// CLI Definition
// ============================================================================

/// `GoMarket` CLI - local cart inspection.
#[derive(Parser)]
#[command(name = "gomarket")]
#[command(about = "Inspect and edit the GoMarket cart stored on this machine")]
#[command(version)]
#[command(author = "GoMarket Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'show' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage directory to use instead of the configured one.
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the cart (default if no command specified).
    #[command(visible_alias = "s")]
    Show,

    /// Add one unit of a product.
    #[command(visible_alias = "a")]
    Add(cart::AddArgs),

    /// Add one unit to a line already in the cart.
    #[command(visible_alias = "i")]
    Inc {
        /// Product id.
        id: String,
    },

    /// Remove one unit from a line, dropping it at zero.
    #[command(visible_alias = "d")]
    Dec {
        /// Product id.
        id: String,
    },

    /// Empty the cart.
    Clear,

    /// Show config and storage locations.
    Path,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("gomarket=debug,info")
    } else {
        EnvFilter::new("gomarket=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Show) | None => cart::show(&cli).await,
        Some(Commands::Add(args)) => cart::add(args, &cli).await,
        Some(Commands::Inc { id }) => cart::increment(id, &cli).await,
        Some(Commands::Dec { id }) => cart::decrement(id, &cli).await,
        Some(Commands::Clear) => cart::clear(&cli).await,
        Some(Commands::Path) => path::run(&cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
