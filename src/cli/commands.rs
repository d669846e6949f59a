use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::ops;

#[derive(Parser)]
#[command(name = "claude-history-image-cleaner")]
#[command(version = "0.1.0")]
#[command(
    about = "Extract and preserve base64 images embedded in Claude Code's history file",
    long_about = None
)]
pub struct Cli {
    /// Use a specific config file instead of platform auto-detection
    #[arg(long, global = true, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract images from the config file and replace them with file
    /// references (the default when no command is given)
    Clean,
    /// Recover images from a backup file and merge newer history on top
    Recover {
        /// Backup file to recover from; auto-detects the largest one when omitted
        backup_file: Option<PathBuf>,
    },
    /// List available backup files
    ListBackups,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_file = cli.config_file.as_deref();

    match &cli.command {
        None | Some(Commands::Clean) => ops::run_clean(config_file, cli.verbose),
        Some(Commands::Recover { backup_file }) => {
            ops::run_recover(backup_file.as_deref(), config_file, cli.verbose)
        }
        Some(Commands::ListBackups) => ops::run_list_backups(config_file),
    }
}
