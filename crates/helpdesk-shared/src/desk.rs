//! Desk state machine: the visible conversation, the ticket store and the
//! active/selected ticket pointers.
//!
//! All mutation goes through [`DeskState::apply`] or the named transition
//! methods it dispatches to. Events carry their timestamps, so a transition
//! depends only on the state and the event. Each transition reports what
//! changed as a list of [`DeskUpdate`]s for the presentation layer.

use crate::ids::IdGenerator;
use crate::message::Message;
use crate::store::TicketStore;
use crate::ticket::{subject_with_limit, Ticket, TicketPriority, TicketStatus};
use crate::SUBJECT_MAX_CHARS;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Something that happened at the desk
#[derive(Debug, Clone)]
pub enum DeskEvent {
    /// The user sent a message (built with [`DeskState::new_user_message`])
    Submitted { message: Message },
    /// A reply finished generating for the ticket that was active at submit time
    ReplyReady {
        ticket_id: String,
        user: Message,
        reply: Message,
        at: DateTime<Utc>,
    },
    TypingChanged(bool),
    TicketSelected(String),
    DetailClosed,
    TicketListToggled,
    StatusSet {
        ticket_id: String,
        status: TicketStatus,
        at: DateTime<Utc>,
    },
    PrioritySet {
        ticket_id: String,
        priority: TicketPriority,
        at: DateTime<Utc>,
    },
    CustomerSet {
        ticket_id: String,
        name: Option<String>,
        email: Option<String>,
        at: DateTime<Utc>,
    },
}

/// What an observer should re-render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskUpdate {
    /// The visible conversation changed
    Messages,
    /// The ticket collection changed
    Tickets,
    Typing(bool),
    Selection(Option<String>),
    TicketList(bool),
}

#[derive(Debug, Clone)]
pub struct DeskState {
    ids: Arc<IdGenerator>,
    subject_max_chars: usize,
    messages: Vec<Message>,
    store: TicketStore,
    active_ticket: Option<String>,
    selected_ticket: Option<String>,
    typing: bool,
    show_tickets: bool,
}

impl Default for DeskState {
    fn default() -> Self {
        Self::new(Arc::new(IdGenerator::new()))
    }
}

impl DeskState {
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self {
            ids,
            subject_max_chars: SUBJECT_MAX_CHARS,
            messages: Vec::new(),
            store: TicketStore::new(),
            active_ticket: None,
            selected_ticket: None,
            typing: false,
            show_tickets: false,
        }
    }

    pub fn with_subject_limit(mut self, max_chars: usize) -> Self {
        self.subject_max_chars = max_chars;
        self
    }

    /// Apply an event and report what changed
    pub fn apply(&mut self, event: DeskEvent) -> Vec<DeskUpdate> {
        match event {
            DeskEvent::Submitted { message } => self.submit(message),
            DeskEvent::ReplyReady {
                ticket_id,
                user,
                reply,
                at,
            } => self.finish_exchange(&ticket_id, user, reply, at),
            DeskEvent::TypingChanged(typing) => self.set_typing(typing),
            DeskEvent::TicketSelected(ticket_id) => match self.select_ticket(&ticket_id) {
                Some(_) => vec![
                    DeskUpdate::Selection(Some(ticket_id)),
                    DeskUpdate::Messages,
                ],
                None => Vec::new(),
            },
            DeskEvent::DetailClosed => self.close_detail(),
            DeskEvent::TicketListToggled => vec![DeskUpdate::TicketList(self.toggle_ticket_list())],
            DeskEvent::StatusSet {
                ticket_id,
                status,
                at,
            } => tickets_changed(self.set_status(&ticket_id, status, at)),
            DeskEvent::PrioritySet {
                ticket_id,
                priority,
                at,
            } => tickets_changed(self.set_priority(&ticket_id, priority, at)),
            DeskEvent::CustomerSet {
                ticket_id,
                name,
                email,
                at,
            } => tickets_changed(self.set_customer(&ticket_id, name, email, at)),
        }
    }

    /// Build a user message with a fresh id. Does not touch any ticket.
    pub fn new_user_message(&self, content: impl Into<String>, at: DateTime<Utc>) -> Message {
        Message::user(self.ids.next_message_id(), content, at)
    }

    /// Build a user message and append it to the visible conversation
    pub fn append_user_message(&mut self, content: impl Into<String>, at: DateTime<Utc>) -> Message {
        let message = self.new_user_message(content, at);
        self.messages.push(message.clone());
        message
    }

    /// Allocate a new open/medium ticket at the head of the collection
    pub fn create_ticket(
        &mut self,
        subject: impl Into<String>,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> String {
        let id = self.ids.next_ticket_id();
        self.store.create_ticket(id, subject, description, at)
    }

    pub fn record_exchange(
        &mut self,
        ticket_id: &str,
        user: Message,
        reply: Message,
        at: DateTime<Utc>,
    ) -> bool {
        self.store.record_exchange(ticket_id, user, reply, at)
    }

    pub fn set_status(&mut self, ticket_id: &str, status: TicketStatus, at: DateTime<Utc>) -> bool {
        self.store.set_status(ticket_id, status, at)
    }

    pub fn set_priority(
        &mut self,
        ticket_id: &str,
        priority: TicketPriority,
        at: DateTime<Utc>,
    ) -> bool {
        self.store.set_priority(ticket_id, priority, at)
    }

    pub fn set_customer(
        &mut self,
        ticket_id: &str,
        name: Option<String>,
        email: Option<String>,
        at: DateTime<Utc>,
    ) -> bool {
        self.store.set_customer(ticket_id, name, email, at)
    }

    /// Select a ticket for display. Its history becomes the visible
    /// conversation and it becomes the active ticket.
    pub fn select_ticket(&mut self, ticket_id: &str) -> Option<Ticket> {
        let ticket = self.store.get(ticket_id)?.clone();
        self.messages = ticket.messages.clone();
        self.selected_ticket = Some(ticket.id.clone());
        self.active_ticket = Some(ticket.id.clone());
        info!(ticket_id = %ticket.id, messages = ticket.messages.len(), "Selected ticket");
        Some(ticket)
    }

    /// Leave the ticket detail view. The active ticket is unchanged.
    pub fn close_detail(&mut self) -> Vec<DeskUpdate> {
        if self.selected_ticket.take().is_some() {
            vec![DeskUpdate::Selection(None)]
        } else {
            Vec::new()
        }
    }

    /// Flip ticket list visibility and return the new value
    pub fn toggle_ticket_list(&mut self) -> bool {
        self.show_tickets = !self.show_tickets;
        self.show_tickets
    }

    pub fn set_typing(&mut self, typing: bool) -> Vec<DeskUpdate> {
        if self.typing == typing {
            return Vec::new();
        }
        self.typing = typing;
        vec![DeskUpdate::Typing(typing)]
    }

    fn submit(&mut self, message: Message) -> Vec<DeskUpdate> {
        let mut updates = vec![DeskUpdate::Messages];

        if self.active_ticket.is_none() {
            let subject = subject_with_limit(&message.content, self.subject_max_chars);
            let ticket_id = self.create_ticket(subject, message.content.clone(), message.timestamp);
            info!(ticket_id = %ticket_id, "Opened ticket for new conversation");
            self.active_ticket = Some(ticket_id);
            updates.push(DeskUpdate::Tickets);
        }

        self.messages.push(message);
        updates
    }

    /// Record a finished exchange on the ticket it belongs to. The reply is
    /// shown only while that ticket is still the active conversation.
    fn finish_exchange(
        &mut self,
        ticket_id: &str,
        user: Message,
        reply: Message,
        at: DateTime<Utc>,
    ) -> Vec<DeskUpdate> {
        let mut updates = Vec::new();

        if self.active_ticket.as_deref() == Some(ticket_id) {
            // Re-selecting the ticket mid-reply re-seeded the view without the question
            if !self.messages.iter().any(|m| m.id == user.id) {
                self.messages.push(user.clone());
            }
            self.messages.push(reply.clone());
            updates.push(DeskUpdate::Messages);
        } else {
            debug!(ticket_id, "Reply arrived for a ticket that is no longer active");
        }

        if self.record_exchange(ticket_id, user, reply, at) {
            updates.push(DeskUpdate::Tickets);
        }
        updates
    }

    /// Visible conversation
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Tickets, most recent first
    pub fn tickets(&self) -> &[Ticket] {
        self.store.tickets()
    }

    pub fn ticket(&self, ticket_id: &str) -> Option<&Ticket> {
        self.store.get(ticket_id)
    }

    pub fn active_ticket_id(&self) -> Option<&str> {
        self.active_ticket.as_deref()
    }

    pub fn selected_ticket_id(&self) -> Option<&str> {
        self.selected_ticket.as_deref()
    }

    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.selected_ticket.as_deref().and_then(|id| self.store.get(id))
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn tickets_visible(&self) -> bool {
        self.show_tickets
    }
}

fn tickets_changed(changed: bool) -> Vec<DeskUpdate> {
    if changed {
        vec![DeskUpdate::Tickets]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(state: &mut DeskState, text: &str) -> Message {
        let message = state.new_user_message(text, Utc::now());
        state.apply(DeskEvent::Submitted {
            message: message.clone(),
        });
        message
    }

    fn reply_to(state: &mut DeskState, ticket_id: &str, user: Message, text: &str) -> Vec<DeskUpdate> {
        let reply = Message::assistant("reply", text, Utc::now());
        state.apply(DeskEvent::ReplyReady {
            ticket_id: ticket_id.to_string(),
            user,
            reply,
            at: Utc::now(),
        })
    }

    #[test]
    fn test_first_message_opens_ticket() {
        let mut state = DeskState::default();
        submit(&mut state, "Where is my order #123");

        assert_eq!(state.tickets().len(), 1);
        let ticket = &state.tickets()[0];
        assert_eq!(ticket.subject, "Where is my order #123");
        assert_eq!(ticket.description, "Where is my order #123");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert_eq!(state.active_ticket_id(), Some(ticket.id.as_str()));
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_long_first_message_truncates_subject() {
        let mut state = DeskState::default();
        let text = "x".repeat(80);
        submit(&mut state, &text);
        assert_eq!(state.tickets()[0].subject, format!("{}...", "x".repeat(50)));
        assert_eq!(state.tickets()[0].description, text);
    }

    #[test]
    fn test_active_ticket_fixed_for_session() {
        let mut state = DeskState::default();
        submit(&mut state, "first");
        let active = state.active_ticket_id().map(str::to_string);
        submit(&mut state, "second");

        assert_eq!(state.tickets().len(), 1);
        assert_eq!(state.active_ticket_id().map(str::to_string), active);
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn test_reply_recorded_on_active_ticket() {
        let mut state = DeskState::default();
        let user = submit(&mut state, "refund please");
        let ticket_id = state.active_ticket_id().unwrap().to_string();

        let updates = reply_to(&mut state, &ticket_id, user, "refunds take a week");
        assert_eq!(updates, vec![DeskUpdate::Messages, DeskUpdate::Tickets]);

        let ticket = state.ticket(&ticket_id).unwrap();
        assert_eq!(ticket.messages.len(), 2);
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn test_reply_for_unselected_ticket_not_shown() {
        let mut state = DeskState::default();
        let first = submit(&mut state, "first question");
        let first_id = state.active_ticket_id().unwrap().to_string();

        let other_id = state.create_ticket("other", "other", Utc::now());
        state.apply(DeskEvent::TicketSelected(other_id.clone()));
        assert!(state.messages().is_empty());

        reply_to(&mut state, &first_id, first, "late answer");

        assert!(state.messages().is_empty());
        assert_eq!(state.ticket(&first_id).unwrap().messages.len(), 2);
        assert!(state.ticket(&other_id).unwrap().messages.is_empty());
    }

    #[test]
    fn test_reselecting_mid_reply_keeps_question() {
        let mut state = DeskState::default();
        let user = submit(&mut state, "question");
        let ticket_id = state.active_ticket_id().unwrap().to_string();

        state.apply(DeskEvent::TicketSelected(ticket_id.clone()));
        assert!(state.messages().is_empty());

        reply_to(&mut state, &ticket_id, user, "answer");
        assert_eq!(state.messages().len(), 2);
        assert!(state.messages()[0].is_user());
    }

    #[test]
    fn test_select_reseeds_conversation() {
        let mut state = DeskState::default();
        let user = submit(&mut state, "question");
        let ticket_id = state.active_ticket_id().unwrap().to_string();
        reply_to(&mut state, &ticket_id, user, "answer");

        let other_id = state.create_ticket("other", "other", Utc::now());
        state.select_ticket(&other_id).unwrap();
        assert_eq!(state.active_ticket_id(), Some(other_id.as_str()));
        assert!(state.messages().is_empty());

        let ticket = state.select_ticket(&ticket_id).unwrap();
        assert_eq!(ticket.messages.len(), 2);
        assert_eq!(state.messages(), ticket.messages.as_slice());
        assert_eq!(state.selected_ticket_id(), Some(ticket_id.as_str()));
    }

    #[test]
    fn test_select_unknown_ticket_changes_nothing() {
        let mut state = DeskState::default();
        submit(&mut state, "question");
        let active = state.active_ticket_id().map(str::to_string);

        let updates = state.apply(DeskEvent::TicketSelected("tkt-999".into()));
        assert!(updates.is_empty());
        assert_eq!(state.active_ticket_id().map(str::to_string), active);
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_close_detail_keeps_active() {
        let mut state = DeskState::default();
        submit(&mut state, "question");
        let ticket_id = state.active_ticket_id().unwrap().to_string();
        state.select_ticket(&ticket_id);

        assert_eq!(state.apply(DeskEvent::DetailClosed), vec![DeskUpdate::Selection(None)]);
        assert!(state.selected_ticket().is_none());
        assert_eq!(state.active_ticket_id(), Some(ticket_id.as_str()));
        assert!(state.apply(DeskEvent::DetailClosed).is_empty());
    }

    #[test]
    fn test_status_on_unknown_ticket_reports_nothing() {
        let mut state = DeskState::default();
        submit(&mut state, "question");
        let before = state.tickets().to_vec();

        let updates = state.apply(DeskEvent::StatusSet {
            ticket_id: "tkt-999".into(),
            status: TicketStatus::Closed,
            at: Utc::now(),
        });
        assert!(updates.is_empty());
        assert_eq!(state.tickets(), before.as_slice());
    }

    #[test]
    fn test_typing_and_list_toggles() {
        let mut state = DeskState::default();
        assert_eq!(state.apply(DeskEvent::TypingChanged(true)), vec![DeskUpdate::Typing(true)]);
        assert!(state.apply(DeskEvent::TypingChanged(true)).is_empty());
        assert!(state.is_typing());

        assert_eq!(state.apply(DeskEvent::TicketListToggled), vec![DeskUpdate::TicketList(true)]);
        assert_eq!(state.apply(DeskEvent::TicketListToggled), vec![DeskUpdate::TicketList(false)]);
    }

    #[test]
    fn test_custom_subject_limit() {
        let mut state = DeskState::default().with_subject_limit(5);
        submit(&mut state, "abcdefgh");
        assert_eq!(state.tickets()[0].subject, "abcde...");
    }

    #[test]
    fn test_append_user_message_leaves_tickets_alone() {
        let mut state = DeskState::default();
        let a = state.append_user_message("hello", Utc::now());
        let b = state.append_user_message("again", Utc::now());

        assert_ne!(a.id, b.id);
        assert!(a.is_user());
        assert_eq!(state.messages().len(), 2);
        assert!(state.tickets().is_empty());
        assert!(state.active_ticket_id().is_none());
    }
}
