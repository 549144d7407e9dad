//! Ticket types for the support desk.
//!
//! Every conversation is tracked as a Ticket. Status and priority are
//! independent and may be set to any value at any time.

use crate::error::DeskError;
use crate::message::Message;
use crate::{SUBJECT_ELLIPSIS, SUBJECT_MAX_CHARS};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Resolved => write!(f, "resolved"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(DeskError::InvalidStatus(s.to_string())),
        }
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for TicketPriority {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(DeskError::InvalidPriority(s.to_string())),
        }
    }
}

/// A support ticket tracking one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    /// Full text of the message that opened the ticket
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Conversation history, append-only in chronological order
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl Ticket {
    /// Create an open, medium-priority ticket with no messages
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            description: description.into(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            created_at: at,
            updated_at: at,
            messages: Vec::new(),
            customer_email: None,
            customer_name: None,
        }
    }

    /// Refresh `updated_at`. The value strictly increases on every call.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// Append a user message and its reply, in that order
    pub fn push_exchange(&mut self, user: Message, reply: Message, now: DateTime<Utc>) {
        self.messages.push(user);
        self.messages.push(reply);
        self.touch(now);
    }

    pub fn set_status(&mut self, status: TicketStatus, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }

    pub fn set_priority(&mut self, priority: TicketPriority, now: DateTime<Utc>) {
        self.priority = priority;
        self.touch(now);
    }

    /// Set customer details. `None` leaves a field as is, a blank string clears it.
    pub fn set_customer(
        &mut self,
        name: Option<String>,
        email: Option<String>,
        now: DateTime<Utc>,
    ) {
        if let Some(name) = name {
            self.customer_name = non_blank(name);
        }
        if let Some(email) = email {
            self.customer_email = non_blank(email);
        }
        self.touch(now);
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Derive a ticket subject from the opening message.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn subject_from(text: &str) -> String {
    subject_with_limit(text, SUBJECT_MAX_CHARS)
}

pub fn subject_with_limit(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut subject: String = text.chars().take(max_chars).collect();
        subject.push_str(SUBJECT_ELLIPSIS);
        subject
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_creation_defaults() {
        let now = Utc::now();
        let ticket = Ticket::new("tkt-1", "Where is my order #123", "Where is my order #123", now);

        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert_eq!(ticket.created_at, ticket.updated_at);
        assert!(ticket.messages.is_empty());
        assert!(ticket.customer_email.is_none());
    }

    #[test]
    fn test_subject_short_text_kept() {
        assert_eq!(subject_from("Where is my order #123"), "Where is my order #123");
    }

    #[test]
    fn test_subject_exactly_limit_not_truncated() {
        let text = "a".repeat(50);
        assert_eq!(subject_from(&text), text);
    }

    #[test]
    fn test_subject_long_text_truncated() {
        let text = "b".repeat(51);
        let subject = subject_from(&text);
        assert_eq!(subject, format!("{}...", "b".repeat(50)));
    }

    #[test]
    fn test_subject_counts_chars_not_bytes() {
        let text = "é".repeat(60);
        let subject = subject_from(&text);
        assert_eq!(subject.chars().count(), 53);
        assert!(subject.starts_with(&"é".repeat(50)));
    }

    #[test]
    fn test_touch_strictly_increases() {
        let now = Utc::now();
        let mut ticket = Ticket::new("tkt-1", "s", "d", now);
        ticket.touch(now);
        assert!(ticket.updated_at > now);
        let before = ticket.updated_at;
        ticket.touch(now - Duration::seconds(10));
        assert!(ticket.updated_at > before);
    }

    #[test]
    fn test_customer_blank_clears() {
        let now = Utc::now();
        let mut ticket = Ticket::new("tkt-1", "s", "d", now);
        ticket.set_customer(Some("Ada".into()), Some("ada@example.com".into()), now);
        assert_eq!(ticket.customer_name.as_deref(), Some("Ada"));

        ticket.set_customer(None, Some("  ".into()), now);
        assert_eq!(ticket.customer_name.as_deref(), Some("Ada"));
        assert!(ticket.customer_email.is_none());
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in TicketStatus::ALL {
            assert_eq!(status.to_string().parse::<TicketStatus>().unwrap(), status);
        }
        assert_eq!("IN_PROGRESS".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
        assert!("pending".parse::<TicketStatus>().is_err());
        assert_eq!(TicketStatus::InProgress.label(), "In Progress");
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("Urgent".parse::<TicketPriority>().unwrap(), TicketPriority::Urgent);
        assert!(matches!(
            "critical".parse::<TicketPriority>(),
            Err(DeskError::InvalidPriority(_))
        ));
    }

    #[test]
    fn test_ticket_wire_format() {
        let now = Utc::now();
        let ticket = Ticket::new("tkt-1", "s", "d", now);
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("customerEmail").is_none());

        let in_progress = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(in_progress, "\"in-progress\"");
    }
}
