//! In-memory ticket collection, most recent first.
//!
//! Mutations on an unknown ticket id are no-ops and report `false`;
//! nothing here panics or errors on a missing id.

use crate::message::Message;
use crate::ticket::{Ticket, TicketPriority, TicketStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStore {
    tickets: Vec<Ticket>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self {
            tickets: Vec::new(),
        }
    }

    /// Insert a fresh open/medium ticket at the head and return its id
    pub fn create_ticket(
        &mut self,
        id: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> String {
        let ticket = Ticket::new(id, subject, description, now);
        let id = ticket.id.clone();
        debug!(ticket_id = %id, "Created ticket");
        self.tickets.insert(0, ticket);
        id
    }

    /// Append a user message and the reply to a ticket
    pub fn record_exchange(
        &mut self,
        ticket_id: &str,
        user: Message,
        reply: Message,
        now: DateTime<Utc>,
    ) -> bool {
        self.update(ticket_id, |t| t.push_exchange(user, reply, now))
    }

    pub fn set_status(&mut self, ticket_id: &str, status: TicketStatus, now: DateTime<Utc>) -> bool {
        self.update(ticket_id, |t| t.set_status(status, now))
    }

    pub fn set_priority(
        &mut self,
        ticket_id: &str,
        priority: TicketPriority,
        now: DateTime<Utc>,
    ) -> bool {
        self.update(ticket_id, |t| t.set_priority(priority, now))
    }

    pub fn set_customer(
        &mut self,
        ticket_id: &str,
        name: Option<String>,
        email: Option<String>,
        now: DateTime<Utc>,
    ) -> bool {
        self.update(ticket_id, |t| t.set_customer(name, email, now))
    }

    pub fn get(&self, ticket_id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == ticket_id)
    }

    /// Tickets, most recently created first
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    fn update(&mut self, ticket_id: &str, f: impl FnOnce(&mut Ticket)) -> bool {
        match self.tickets.iter_mut().find(|t| t.id == ticket_id) {
            Some(ticket) => {
                f(ticket);
                true
            }
            None => {
                debug!(ticket_id, "Ignoring update for unknown ticket");
                false
            }
        }
    }
}
