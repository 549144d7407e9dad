//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Helpdesk support chat
#[derive(Parser, Debug)]
#[command(name = "helpdeskctl")]
#[command(about = "Customer support chat with ticket tracking", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path to config file (defaults to $XDG_CONFIG_HOME/helpdesk/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip the simulated typing delay
    #[arg(long, global = true)]
    pub no_delay: bool,

    /// Subcommand (if not provided, starts the interactive chat)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive support chat
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List the keywords the agent recognises, in match order
    Topics,

    /// Print the effective configuration as TOML
    Config,
}
