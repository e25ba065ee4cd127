//! Error taxonomy shared by the normalizer, the store and the context window.

use thiserror::Error;

/// Errors raised while turning store results into entries or growing a window.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw hit is missing a required field or carries it in the wrong shape.
    /// Points at a config/schema mismatch, so it is never retried.
    #[error("malformed entry '{id}': field '{field}' {reason}")]
    MalformedEntry {
        id: String,
        field: String,
        reason: String,
    },

    /// The pivot cannot be bound to a context (missing context fields).
    #[error("cannot open context for entry '{id}': missing context field(s) {missing}")]
    PivotNotFound { id: String, missing: String },

    /// Lookup by id returned nothing.
    #[error("unable to find document with id '{0}'")]
    NotFound(String),

    /// Network, timeout or backend failure. Recoverable: retry the same action.
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}

impl Error {
    /// Whether the user can simply retry the action that produced this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::FetchFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
