//! Error types for the helpdesk.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("A response is still being generated. Please wait.")]
    ResponsePending,

    #[error("Response generation was cancelled")]
    Cancelled,

    #[error("Unknown ticket status '{0}' (expected open, in-progress, resolved or closed)")]
    InvalidStatus(String),

    #[error("Unknown ticket priority '{0}' (expected low, medium, high or urgent)")]
    InvalidPriority(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeskError {
    /// Whether the error comes from user input rather than the environment
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            DeskError::InvalidStatus(_) | DeskError::InvalidPriority(_) | DeskError::TicketNotFound(_)
        )
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
