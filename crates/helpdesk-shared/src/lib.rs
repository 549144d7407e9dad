//! Shared types and state for the helpdesk.
//!
//! The library owns everything with behavior: the message/ticket model,
//! the keyword knowledge base and its asynchronous responder, the ticket
//! store, the desk state machine and the session controller that drives it.
//! Front ends only render and forward user events.

pub mod config;
pub mod desk;
pub mod error;
pub mod ids;
pub mod knowledge;
pub mod message;
pub mod responder;
pub mod session;
pub mod store;
pub mod ticket;

pub use config::DeskConfig;
pub use desk::{DeskEvent, DeskState, DeskUpdate};
pub use error::{DeskError, DeskResult};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use message::{Message, MessageRole};
pub use responder::{DelayRange, PendingResponse, Responder};
pub use session::{DeskSnapshot, SupportSession};
pub use store::TicketStore;
pub use ticket::{Ticket, TicketPriority, TicketStatus};

/// Crate version, shown in the REPL banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum characters of the first message used as a ticket subject
pub const SUBJECT_MAX_CHARS: usize = 50;

/// Suffix appended to a truncated subject
pub const SUBJECT_ELLIPSIS: &str = "...";

/// Capacity of the desk update broadcast channel
pub const UPDATE_CHANNEL_CAPACITY: usize = 64;
