//! Terminal rendering for the chat, the ticket list and the ticket detail.
//!
//! `format_*` functions return plain text (used by tests and when stdout is
//! not a terminal); `print_*` functions add color.

use chrono::{DateTime, Local, Utc};
use helpdesk_shared::{Message, MessageRole, Ticket, TicketPriority, TicketStatus, VERSION};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::commands::HELP;

pub const WELCOME_TITLE: &str = "Welcome to Customer Support";
pub const WELCOME_TEXT: &str = "I'm here to help you with any questions about orders, shipping, returns, payments, and more. How can I assist you today?";
pub const NO_TICKETS: &str = "No tickets yet. Send a message to open one.";

fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

fn clock(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

fn date(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn date_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn print_banner() {
    println!();
    if use_color() {
        println!("{} {}", "Helpdesk".bright_cyan().bold(), format!("v{}", VERSION).dimmed());
        println!("{}", "E-commerce Support Agent".dimmed());
    } else {
        println!("Helpdesk v{}", VERSION);
        println!("E-commerce Support Agent");
    }
}

pub fn print_welcome() {
    println!();
    if use_color() {
        println!("  {}", WELCOME_TITLE.bold());
        println!("  {}", WELCOME_TEXT.dimmed());
        println!("  {}", "Type /help for commands.".dimmed());
    } else {
        println!("  {}", WELCOME_TITLE);
        println!("  {}", WELCOME_TEXT);
        println!("  Type /help for commands.");
    }
    println!();
}

pub fn format_message(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        clock(&message.timestamp),
        message.role.label(),
        message.content
    )
}

pub fn print_message(message: &Message) {
    if !use_color() {
        println!("{}", format_message(message));
        return;
    }
    let time = format!("[{}]", clock(&message.timestamp));
    match message.role {
        MessageRole::User => println!(
            "{} {} {}",
            time.dimmed(),
            format!("{}:", message.role.label()).bright_blue().bold(),
            message.content
        ),
        MessageRole::Assistant => println!(
            "{} {} {}",
            time.dimmed(),
            format!("{}:", message.role.label()).bright_green().bold(),
            message.content
        ),
        MessageRole::System => println!(
            "{} {} {}",
            time.dimmed(),
            format!("{}:", message.role.label()).yellow(),
            message.content.dimmed()
        ),
    }
}

pub fn print_conversation(messages: &[Message]) {
    if messages.is_empty() {
        print_welcome();
        return;
    }
    for message in messages {
        print_message(message);
    }
}

/// Status column of the ticket list, padded before any coloring
pub fn status_cell(status: TicketStatus) -> String {
    format!("{:<13}", format!("[{}]", status.label()))
}

/// One ticket list row: marker, id, status, priority, date, subject
pub fn format_ticket_row(ticket: &Ticket, selected: bool) -> String {
    format!(
        "{} {:<8} {} {:<7} {}  {}",
        if selected { ">" } else { " " },
        ticket.id,
        status_cell(ticket.status),
        ticket.priority.to_string(),
        date(&ticket.created_at),
        ticket.subject
    )
}

pub fn print_ticket_list(tickets: &[Ticket], selected: Option<&str>) {
    println!();
    println!("Support Tickets ({})", tickets.len());
    if tickets.is_empty() {
        println!("  {}", NO_TICKETS);
        println!();
        return;
    }
    for ticket in tickets {
        let is_selected = selected == Some(ticket.id.as_str());
        let row = format_ticket_row(ticket, is_selected);
        if !use_color() {
            println!("{}", row);
            continue;
        }
        println!(
            "{} {:<8} {} {} {}  {}",
            if is_selected { ">".bright_cyan().to_string() } else { " ".to_string() },
            ticket.id.bold(),
            paint_status(ticket.status),
            paint_priority(ticket.priority),
            date(&ticket.created_at).dimmed(),
            ticket.subject
        );
    }
    println!();
}

fn paint_status(status: TicketStatus) -> String {
    let text = status_cell(status);
    match status {
        TicketStatus::Open => text.bright_blue().to_string(),
        TicketStatus::InProgress => text.yellow().to_string(),
        TicketStatus::Resolved => text.bright_green().to_string(),
        TicketStatus::Closed => text.dimmed().to_string(),
    }
}

fn paint_priority(priority: TicketPriority) -> String {
    let text = format!("{:<7}", priority.to_string());
    match priority {
        TicketPriority::Urgent => text.bright_red().to_string(),
        TicketPriority::High => text.red().to_string(),
        TicketPriority::Medium => text.yellow().to_string(),
        TicketPriority::Low => text.dimmed().to_string(),
    }
}

/// Ticket detail view as plain lines
pub fn format_ticket_detail(ticket: &Ticket) -> Vec<String> {
    let mut lines = vec![
        format!("Ticket {}: {}", ticket.id, ticket.subject),
        format!("Created:  {}", date_time(&ticket.created_at)),
        format!("Updated:  {}", date_time(&ticket.updated_at)),
    ];
    if let Some(email) = &ticket.customer_email {
        lines.push(format!("Email:    {}", email));
    }
    if let Some(name) = &ticket.customer_name {
        lines.push(format!("Customer: {}", name));
    }
    lines.push(format!("Status:   {}", ticket.status.label()));
    lines.push(format!("Priority: {}", ticket.priority));
    lines.push(format!("Conversation ({} messages)", ticket.message_count()));
    for message in &ticket.messages {
        lines.push(format!(
            "  {} [{}]: {}",
            message.role.label(),
            clock(&message.timestamp),
            message.content
        ));
    }
    lines
}

pub fn print_ticket_detail(ticket: &Ticket) {
    println!();
    let lines = format_ticket_detail(ticket);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 && use_color() {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
    println!();
    if use_color() {
        println!("{}", "Type /back to return to the chat.".dimmed());
    } else {
        println!("Type /back to return to the chat.");
    }
    println!();
}

pub fn print_help() {
    println!();
    let width = HELP.iter().map(|(c, _)| c.len()).max().unwrap_or(0);
    for (command, text) in HELP {
        if use_color() {
            println!("  {:<width$}  {}", command.bright_cyan(), text.dimmed(), width = width);
        } else {
            println!("  {:<width$}  {}", command, text, width = width);
        }
    }
    println!();
}

pub fn print_notice(text: &str) {
    if use_color() {
        println!("{}", text.dimmed());
    } else {
        println!("{}", text);
    }
}

pub fn print_error(text: &str) {
    if use_color() {
        eprintln!("{} {}", "error:".bright_red().bold(), text);
    } else {
        eprintln!("error: {}", text);
    }
}
