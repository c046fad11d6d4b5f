//! sutradocs CLI - documentation site generator with sidebar-driven navigation.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

use commands::config::ConfigFile;

#[derive(Parser)]
#[command(name = "sutradocs")]
#[command(about = "Documentation site generator with sidebar-driven navigation")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docs.toml config file
    #[arg(short, long, default_value = "docs.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize documentation in current project
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Start development server with live reload
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "7777")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Build static documentation site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview built documentation
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Check that every sidebar entry has a page
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Dev { port, no_open } => {
            let config = ConfigFile::load(&cli.config)?;
            commands::dev::run(&config, port, !no_open).await?;
        }
        Commands::Build { output, no_minify } => {
            let config = ConfigFile::load(&cli.config)?;
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&config, output, minify).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(port, dir, !no_open).await?;
        }
        Commands::Check => {
            let config = ConfigFile::load(&cli.config)?;
            commands::check::run(&config).await?;
        }
    }

    Ok(())
}
