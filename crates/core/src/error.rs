use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rule violations raised by the pure domain crates. Never carries IO failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input broke a field rule; the message is safe to show to clients.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("malformed {kind}: {reason}")]
    InvalidId { kind: &'static str, reason: String },

    /// The record (or cart line) the operation targets is absent.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            kind,
            reason: reason.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
