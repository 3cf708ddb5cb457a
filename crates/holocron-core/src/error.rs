// ── Core error types ──
//
// User-facing errors from holocron-core. Consumers never see reqwest errors
// or JSON parse failures directly; the `From<holocron_api::Error>` impl
// folds them into the two failure kinds the listing distinguishes.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Remote errors ────────────────────────────────────────────────
    #[error("Record not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Archive request failed: {message}")]
    Transport {
        message: String,
        /// HTTP status code, when the archive answered at all.
        status: Option<u16>,
    },

    #[error("Archive request timed out: {message}")]
    Timeout { message: String },

    #[error("Unexpected archive response: {message}")]
    Decode { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status the archive answered with, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Message suitable for showing next to an empty listing.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport {
                status: Some(status),
                message,
            } => format!("Error Code: {status}\nMessage: {message}"),
            Self::Transport {
                status: None,
                message,
            } => format!("Error: {message}"),
            Self::Timeout { .. } => "Error: the archive took too long to answer".to_owned(),
            Self::NotFound { identifier } => format!("No record matches '{identifier}'"),
            Self::Decode { .. } => "The archive sent an unexpected response".to_owned(),
            Self::Config { .. } | Self::Internal(_) => {
                "The archive is unreachable right now".to_owned()
            }
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<holocron_api::Error> for CoreError {
    fn from(err: holocron_api::Error) -> Self {
        match err {
            holocron_api::Error::NotFound { id } => CoreError::NotFound { identifier: id },
            holocron_api::Error::Status { status, message } => CoreError::Transport {
                message,
                status: Some(status),
            },
            holocron_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout {
                message: e.to_string(),
            },
            holocron_api::Error::Transport(ref e) => CoreError::Transport {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            holocron_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            holocron_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}
