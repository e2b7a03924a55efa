//! Error types for district matching.
//!
//! Loading distinguishes a collection that does not exist ([`MatcherError::NotFound`],
//! expected and skipped by the cascade) from one that exists but cannot be
//! read or parsed (fatal, surfaced to the caller).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatcherError>;

#[derive(Debug, Error)]
pub enum MatcherError {
    /// No backing document exists for the collection key.
    #[error("collection not found: {0}")]
    NotFound(String),

    /// The backing document exists but is not a valid feature collection.
    #[error("failed to parse collection '{key}': {message}")]
    Parse { key: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed query input, rejected before reaching the matcher.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

// Coalesced loads hand one outcome to every waiter.
impl Clone for MatcherError {
    fn clone(&self) -> Self {
        match self {
            Self::NotFound(key) => Self::NotFound(key.clone()),
            Self::Parse { key, message } => Self::Parse {
                key: key.clone(),
                message: message.clone(),
            },
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::InvalidInput(msg) => Self::InvalidInput(msg.clone()),
            Self::Config(msg) => Self::Config(msg.clone()),
        }
    }
}

impl MatcherError {
    pub(crate) fn parse(key: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` for the expected, non-fatal "collection absent" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
