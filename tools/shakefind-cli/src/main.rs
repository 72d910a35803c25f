//! ShakeFind CLI: shake the mouse to find the pointer.
//!
//! Usage:
//!   shakefind run [OPTIONS]         Enlarge the pointer whenever it is shaken
//!   shakefind check                 Check system capabilities
//!   shakefind replay <SCRIPT>       Replay a JSONL position script
//!   shakefind preview [OPTIONS]     Scale a pointer image and write it as PNG

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shakefind_common::config::{AppConfig, TrackingMode};

mod commands;

#[derive(Parser)]
#[command(
    name = "shakefind",
    about = "Shake the mouse to temporarily enlarge the pointer",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the pointer until Ctrl+C
    Run {
        /// Sample delivery: hook|polling (defaults to the config file)
        #[arg(long)]
        mode: Option<TrackingMode>,

        /// Record cursor changes in memory instead of touching the system pointer
        #[arg(long)]
        dry_run: bool,

        /// Feed positions from a JSONL script instead of the real pointer
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// Check system capabilities
    Check,

    /// Replay a position script in virtual time and print state changes
    Replay {
        /// Path to the JSONL script
        script: PathBuf,

        /// Interval between dwell checks (ms)
        #[arg(long, default_value = "100")]
        tick_ms: u64,
    },

    /// Scale a pointer image and write the result as PNG
    Preview {
        /// Source PNG (the built-in arrow when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Hotspot of the source image as X,Y
        #[arg(long, default_value = "0,0")]
        hotspot: String,

        /// Scale factor
        #[arg(long, default_value = "3.0")]
        factor: f64,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load();

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    config.logging.json |= cli.json;
    if cli.log_file.is_some() {
        config.logging.file = cli.log_file;
    }
    shakefind_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Run {
            mode,
            dry_run,
            script,
        } => {
            if let Some(mode) = mode {
                config.tracking.mode = mode;
            }
            commands::run::run(config, dry_run, script).await
        }
        Commands::Check => commands::check::run(&config),
        Commands::Replay { script, tick_ms } => commands::replay::run(script, tick_ms),
        Commands::Preview {
            input,
            hotspot,
            factor,
            output,
        } => commands::preview::run(input, &hotspot, factor, output),
    }
}
