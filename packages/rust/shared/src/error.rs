//! Error types for kibela-toc.
//!
//! Library crates use [`KibelaTocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

/// Top-level error type for all kibela-toc operations.
#[derive(Debug, thiserror::Error)]
pub enum KibelaTocError {
    /// Missing or invalid environment settings, or an out-of-range CLI option.
    #[error("config error: {message}")]
    Config { message: String },

    /// The note identifier could not be parsed from the given URL.
    #[error("invalid note URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Reading the note from the remote API failed.
    #[error("failed to fetch note {note}: {source}")]
    Fetch {
        note: String,
        #[source]
        source: ApiError,
    },

    /// Writing the note back to the remote API failed.
    #[error("failed to update note {note}: {source}")]
    Update {
        note: String,
        #[source]
        source: ApiError,
    },
}

/// Failure classes reported by the remote note API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The token was rejected (HTTP 401/403).
    #[error("unauthorized (HTTP {status}); check KIBELA_TOKEN and KIBELA_TEAM")]
    Unauthorized { status: u16 },

    /// The note does not exist or is not visible to this token.
    #[error("note not found or not accessible")]
    NotFound,

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The GraphQL layer reported errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KibelaTocError>;

impl KibelaTocError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an invalid-URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an [`ApiError`] raised while fetching `note`.
    pub fn fetch(note: impl ToString, source: ApiError) -> Self {
        Self::Fetch {
            note: note.to_string(),
            source,
        }
    }

    /// Wrap an [`ApiError`] raised while updating `note`.
    pub fn update(note: impl ToString, source: ApiError) -> Self {
        Self::Update {
            note: note.to_string(),
            source,
        }
    }
}
