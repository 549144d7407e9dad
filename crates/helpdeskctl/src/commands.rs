//! REPL input parsing.
//!
//! Plain lines are chat messages; lines starting with `/` are desk commands.

use helpdesk_shared::{DeskError, TicketPriority, TicketStatus};
use thiserror::Error;

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Send a chat message
    Say(String),
    Help,
    /// Toggle and print the ticket list
    Tickets,
    /// Select a ticket and show its detail
    Open(String),
    /// Leave the ticket detail view
    Back,
    Status(TicketStatus),
    Priority(TicketPriority),
    Customer {
        name: Option<String>,
        email: Option<String>,
    },
    /// Print the focused ticket as JSON
    Export,
    Quit,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unknown command '/{0}'. Type /help for the list of commands.")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown customer field '{0}' (expected name=... or email=...)")]
    CustomerField(String),

    #[error(transparent)]
    Desk(#[from] DeskError),
}

pub const USAGE_OPEN: &str = "/open <ticket-id>";
pub const USAGE_STATUS: &str = "/status <open|in-progress|resolved|closed>";
pub const USAGE_PRIORITY: &str = "/priority <low|medium|high|urgent>";
pub const USAGE_CUSTOMER: &str = "/customer name=<name> email=<email>";

/// Help text shown by /help
pub const HELP: &[(&str, &str)] = &[
    ("<text>", "send a message to support"),
    ("/tickets", "show or hide the ticket list"),
    (USAGE_OPEN, "open a ticket and continue its conversation"),
    ("/back", "close the ticket detail and return to the chat"),
    (USAGE_STATUS, "set the status of the current ticket"),
    (USAGE_PRIORITY, "set the priority of the current ticket"),
    (USAGE_CUSTOMER, "record customer details on the current ticket"),
    ("/export", "print the current ticket as JSON"),
    ("/help", "show this help"),
    ("/quit", "leave the chat"),
];

/// Parse a REPL line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(ReplCommand::Say(line.to_string())));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "help" | "?" => ReplCommand::Help,
        "tickets" | "list" => ReplCommand::Tickets,
        "open" | "select" => {
            if args.is_empty() {
                return Err(ParseError::Usage(USAGE_OPEN));
            }
            ReplCommand::Open(args.to_string())
        }
        "back" | "close" => ReplCommand::Back,
        "status" => {
            if args.is_empty() {
                return Err(ParseError::Usage(USAGE_STATUS));
            }
            ReplCommand::Status(args.parse()?)
        }
        "priority" => {
            if args.is_empty() {
                return Err(ParseError::Usage(USAGE_PRIORITY));
            }
            ReplCommand::Priority(args.parse()?)
        }
        "customer" => parse_customer(args)?,
        "export" => ReplCommand::Export,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

/// `name=Ada Lovelace email=ada@example.com`; values may contain spaces
fn parse_customer(args: &str) -> Result<ReplCommand, ParseError> {
    let mut name: Option<String> = None;
    let mut email: Option<String> = None;
    let mut in_name = None;

    for token in args.split_whitespace() {
        if let Some((key, value)) = token.split_once('=') {
            match key.to_lowercase().as_str() {
                "name" => {
                    name = Some(value.to_string());
                    in_name = Some(true);
                }
                "email" => {
                    email = Some(value.to_string());
                    in_name = Some(false);
                }
                _ => return Err(ParseError::CustomerField(key.to_string())),
            }
            continue;
        }

        let slot = match in_name {
            Some(true) => name.as_mut(),
            Some(false) => email.as_mut(),
            None => None,
        };
        match slot {
            Some(value) => {
                value.push(' ');
                value.push_str(token);
            }
            None => return Err(ParseError::Usage(USAGE_CUSTOMER)),
        }
    }

    if name.is_none() && email.is_none() {
        return Err(ParseError::Usage(USAGE_CUSTOMER));
    }
    Ok(ReplCommand::Customer { name, email })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_message() {
        assert_eq!(
            parse_line("  where is my order?  ").unwrap(),
            Some(ReplCommand::Say("where is my order?".to_string()))
        );
    }

    #[test]
    fn test_blank_line_ignored() {
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_customer_values_with_spaces() {
        assert_eq!(
            parse_line("/customer name=Ada Lovelace email=ada@example.com").unwrap(),
            Some(ReplCommand::Customer {
                name: Some("Ada Lovelace".to_string()),
                email: Some("ada@example.com".to_string()),
            })
        );
    }

    #[test]
    fn test_customer_rejects_unknown_field() {
        assert!(matches!(
            parse_line("/customer phone=123"),
            Err(ParseError::CustomerField(_))
        ));
        assert!(matches!(parse_line("/customer Ada"), Err(ParseError::Usage(_))));
    }
}
