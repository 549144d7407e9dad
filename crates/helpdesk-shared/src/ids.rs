//! Collision-free id allocation for messages and tickets.
//!
//! A single atomic counter backs every id in a session, so ids never repeat
//! even when a message and a ticket are created back to back.

use std::sync::atomic::{AtomicU64, Ordering};

/// Kind of entity an id is allocated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Message,
    Ticket,
}

impl IdKind {
    fn prefix(&self) -> &'static str {
        match self {
            IdKind::Message => "msg",
            IdKind::Ticket => "tkt",
        }
    }
}

/// Strictly monotonic id generator, safe to share across tasks
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next id for the given kind
    pub fn next_id(&self, kind: IdKind) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", kind.prefix(), n)
    }

    pub fn next_message_id(&self) -> String {
        self.next_id(IdKind::Message)
    }

    pub fn next_ticket_id(&self) -> String {
        self.next_id(IdKind::Ticket)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric part of an id produced by [`IdGenerator`]
pub fn sequence_of(id: &str) -> Option<u64> {
    id.rsplit_once('-').and_then(|(_, n)| n.parse().ok())
}
