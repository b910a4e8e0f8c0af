// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Short text suitable for an inline error line or toast.
    ///
    /// `action` names what was attempted, e.g. "fetch ideas".
    pub fn user_message(&self, action: &str) -> String {
        match self {
            DomainError::InvalidInput(reason) => reason.clone(),
            DomainError::NotFound(_) => format!("Failed to {action}: not found"),
            DomainError::Server { message, .. } if !message.is_empty() => {
                format!("Failed to {action}: {message}")
            }
            _ => format!("Failed to {action}. Please try again."),
        }
    }
}
