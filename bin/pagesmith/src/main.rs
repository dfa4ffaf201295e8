//! Pagesmith CLI
//!
//! Builds a static marketing site from structured content collections.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Pagesmith.
#[derive(Parser)]
#[command(
    name = "pagesmith",
    version,
    about = "A deterministic static site builder for structured content"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the site into the output directory
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Content directory (defaults to build.content_dir)
        #[arg(long)]
        content: Option<PathBuf>,
        /// Override the site URL (e.g., https://staging.example.com)
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Run every build check without writing output
    Check {
        /// Treat link warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print the resolved route table
    Routes,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    pagesmith::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            content,
            site_url,
        } => {
            pagesmith::cmd::build::run(
                &cli.config,
                output.as_deref(),
                content.as_deref(),
                site_url.as_deref(),
            )?;
        }
        Commands::Check { strict } => {
            pagesmith::cmd::check::run(&cli.config, strict)?;
        }
        Commands::Routes => {
            pagesmith::cmd::routes::run(&cli.config)?;
        }
    }

    Ok(())
}
