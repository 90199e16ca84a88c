use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use launchgate_core::{ALERT_REMEMBER_KEY, UPDATE_REMEMBER_KEY};

#[derive(Debug, Parser)]
#[command(
    name = "launchgate",
    version,
    about = "Check a remote gate document and show any alert or update prompt"
)]
pub struct Cli {
    /// URL of the remote gate document.
    #[arg(long, global = true)]
    pub config_url: Option<String>,

    /// Store page opened when an update is accepted.
    #[arg(long, global = true)]
    pub store_url: Option<String>,

    /// Installed application version. Defaults to this binary's version.
    #[arg(long, global = true)]
    pub app_version: Option<String>,

    /// Read sections from this key of the document instead of its root.
    #[arg(long, global = true)]
    pub platform_key: Option<String>,

    /// Compare versions numerically instead of as plain strings.
    #[arg(long, global = true)]
    pub numeric: bool,

    /// Dismissal memory file.
    #[arg(long, global = true)]
    pub memory_file: Option<PathBuf>,

    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one check cycle (default).
    Check,
    /// Print the decision for a local document without showing or recording
    /// anything.
    Decide { file: PathBuf },
    /// Clear a remembered dismissal.
    Forget {
        #[arg(value_enum)]
        slot: Slot,
    },
    /// Print the effective settings.
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Slot {
    Alert,
    Update,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Self::Alert => ALERT_REMEMBER_KEY,
            Self::Update => UPDATE_REMEMBER_KEY,
        }
    }
}
