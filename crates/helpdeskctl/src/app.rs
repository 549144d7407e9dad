//! Command dispatch for helpdeskctl

use anyhow::{Context, Result};
use helpdesk_shared::{DeskConfig, DeskError, SupportSession};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::errors::{EXIT_CONFIG, EXIT_GENERAL_ERROR, EXIT_USAGE};
use crate::repl;

/// Load config and apply command-line overrides
pub fn load_config(cli: &Cli) -> Result<DeskConfig> {
    let mut config = DeskConfig::load(cli.config.as_deref()).context("loading config")?;
    if cli.no_delay {
        config.responder.min_delay_ms = 0;
        config.responder.max_delay_ms = 0;
    }
    debug!(?config, "Effective config");
    Ok(config)
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let session = SupportSession::new(&config)?;
            repl::start_repl(session).await
        }
        Commands::Ask { text } => {
            println!("{}", answer(&config, &text.join(" "))?);
            Ok(())
        }
        Commands::Topics => {
            for (i, keyword) in topics(&config)?.iter().enumerate() {
                println!("{:>2}. {}", i + 1, keyword);
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Immediate keyword answer, no ticket and no typing delay
pub fn answer(config: &DeskConfig, question: &str) -> Result<String> {
    let knowledge = config.knowledge_base()?;
    Ok(knowledge.respond(question).to_string())
}

/// Keywords in match order
pub fn topics(config: &DeskConfig) -> Result<Vec<String>> {
    let knowledge = config.knowledge_base()?;
    Ok(knowledge.keywords().into_iter().map(str::to_string).collect())
}

/// Map an error to the process exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DeskError>() {
        Some(DeskError::Config(_)) | Some(DeskError::Toml(_)) => EXIT_CONFIG,
        Some(e) if e.is_usage() => EXIT_USAGE,
        _ => EXIT_GENERAL_ERROR,
    }
}
