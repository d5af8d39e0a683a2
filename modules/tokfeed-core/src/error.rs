use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Fieldless mirror of [`FeedError`] for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Auth,
    RateLimit,
    NotFound,
    Upstream,
}

impl FeedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::Validation(_) => ErrorKind::Validation,
            FeedError::Configuration(_) => ErrorKind::Configuration,
            FeedError::Auth(_) => ErrorKind::Auth,
            FeedError::RateLimit(_) => ErrorKind::RateLimit,
            FeedError::NotFound(_) => ErrorKind::NotFound,
            FeedError::Upstream(_) => ErrorKind::Upstream,
        }
    }

    /// The detail message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            FeedError::Validation(m)
            | FeedError::Configuration(m)
            | FeedError::Auth(m)
            | FeedError::RateLimit(m)
            | FeedError::NotFound(m)
            | FeedError::Upstream(m) => m,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Auth => "auth",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Upstream => "upstream",
        };
        f.write_str(s)
    }
}
