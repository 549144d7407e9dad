//! REPL - interactive support chat
//!
//! Reads lines from stdin, forwards chat messages to the session and renders
//! replies and ticket views. Input is not read while a reply is pending,
//! which is what keeps exchanges strictly one at a time. The typing
//! indicator follows the session's `Typing` updates.

use anyhow::{Context, Result};
use helpdesk_shared::{DeskError, DeskUpdate, SupportSession};
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Write};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info};

use crate::commands::{parse_line, ReplCommand};
use crate::display;
use crate::spinner::TypingIndicator;

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Start the interactive chat
pub async fn start_repl(session: SupportSession) -> Result<()> {
    display::print_banner();
    display::print_welcome();

    let observer = spawn_update_logger(&session);
    let result = run_repl_loop(&session).await;
    observer.abort();

    info!(session = %session.id(), "Chat ended");
    result
}

async fn run_repl_loop(session: &SupportSession) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt();

        let Some(line) = lines.next_line().await.context("reading input")? else {
            break; // EOF
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                display::print_error(&e.to_string());
                continue;
            }
        };

        match handle_command(session, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => display::print_error(&format!("{:#}", e)),
        }
    }

    println!();
    display::print_notice("Goodbye! Your tickets are kept until you close this session.");
    Ok(())
}

/// Execute one parsed REPL command
pub async fn handle_command(session: &SupportSession, command: ReplCommand) -> Result<Flow> {
    match command {
        ReplCommand::Say(text) => {
            // subscribe first so the Typing(true) from submit is not missed
            let mut updates = session.subscribe();
            let Some(pending) = session.submit(&text).await? else {
                return Ok(Flow::Continue);
            };
            let typing_for = follow_typing(&mut updates).await;
            let reply = pending.wait().await?;
            debug!(typing_ms = typing_for.as_millis() as u64, "Reply rendered");
            display::print_message(&reply);
        }

        ReplCommand::Help => display::print_help(),

        ReplCommand::Tickets => {
            if session.toggle_ticket_list().await {
                let snap = session.snapshot().await;
                display::print_ticket_list(&snap.tickets, snap.selected_ticket_id.as_deref());
            } else {
                display::print_notice("Ticket list hidden. Type /tickets to show it again.");
            }
        }

        ReplCommand::Open(ticket_id) => match session.select_ticket(&ticket_id).await {
            Some(ticket) => display::print_ticket_detail(&ticket),
            None => return Err(DeskError::TicketNotFound(ticket_id).into()),
        },

        ReplCommand::Back => {
            session.close_detail().await;
            let snap = session.snapshot().await;
            display::print_conversation(&snap.messages);
        }

        ReplCommand::Status(status) => {
            let ticket_id = focused_ticket(session).await?;
            session.set_status(&ticket_id, status).await?;
            display::print_notice(&format!("Ticket {} status: {}", ticket_id, status.label()));
        }

        ReplCommand::Priority(priority) => {
            let ticket_id = focused_ticket(session).await?;
            session.set_priority(&ticket_id, priority).await?;
            display::print_notice(&format!("Ticket {} priority: {}", ticket_id, priority));
        }

        ReplCommand::Customer { name, email } => {
            let ticket_id = focused_ticket(session).await?;
            session.set_customer(&ticket_id, name, email).await?;
            display::print_notice(&format!("Ticket {} customer details updated", ticket_id));
        }

        ReplCommand::Export => {
            let ticket_id = focused_ticket(session).await?;
            let ticket = session
                .ticket(&ticket_id)
                .await
                .ok_or(DeskError::TicketNotFound(ticket_id))?;
            println!("{}", serde_json::to_string_pretty(&ticket)?);
        }

        ReplCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Show the typing indicator from `Typing(true)` until `Typing(false)`.
/// Returns how long it was shown.
async fn follow_typing(updates: &mut broadcast::Receiver<DeskUpdate>) -> Duration {
    let mut indicator: Option<TypingIndicator> = None;
    loop {
        match updates.recv().await {
            Ok(DeskUpdate::Typing(true)) => {
                if indicator.is_none() {
                    indicator = Some(TypingIndicator::start());
                }
            }
            Ok(DeskUpdate::Typing(false)) | Err(RecvError::Closed) => break,
            Ok(_) => {}
            Err(RecvError::Lagged(n)) => debug!(skipped = n, "Typing observer lagged"),
        }
    }
    indicator.map(TypingIndicator::stop).unwrap_or_default()
}

async fn focused_ticket(session: &SupportSession) -> Result<String> {
    session
        .focused_ticket_id()
        .await
        .context("No ticket yet. Send a message first or /open a ticket.")
}

fn print_prompt() {
    if std::io::stdout().is_terminal() {
        print!("{} ", ">".bright_cyan().bold());
    } else {
        print!("> ");
    }
    let _ = std::io::stdout().flush();
}

/// Log desk updates as the presentation layer observes them
fn spawn_update_logger(session: &SupportSession) -> tokio::task::JoinHandle<()> {
    let mut rx = session.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(update) => debug!(?update, "Desk update"),
                Err(RecvError::Lagged(n)) => debug!(skipped = n, "Desk update observer lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_follow_typing_stops_on_typing_false() {
        let (tx, mut rx) = broadcast::channel(8);
        tx.send(DeskUpdate::Messages).unwrap();
        tx.send(DeskUpdate::Typing(true)).unwrap();
        tx.send(DeskUpdate::Tickets).unwrap();
        tx.send(DeskUpdate::Typing(false)).unwrap();
        tx.send(DeskUpdate::Messages).unwrap();

        follow_typing(&mut rx).await;
        // nothing past Typing(false) is consumed
        assert_eq!(rx.try_recv().unwrap(), DeskUpdate::Messages);
    }

    #[tokio::test]
    async fn test_follow_typing_ends_when_channel_closes() {
        let (tx, mut rx) = broadcast::channel::<DeskUpdate>(8);
        drop(tx);
        assert_eq!(follow_typing(&mut rx).await, Duration::ZERO);
    }
}
