//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use holocron_config::ConfigError;
use holocron_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the archive: {message}")]
    #[diagnostic(
        code(holocron::connection_failed),
        help(
            "Check your network connection and the API URL.\n\
             Override it with --api-url or HOLOCRON_API_URL."
        )
    )]
    ConnectionFailed { message: String },

    #[error("The archive did not answer in time")]
    #[diagnostic(
        code(holocron::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout { message: String },

    // ── Archive responses ────────────────────────────────────────────
    #[error("No character with id '{identifier}'")]
    #[diagnostic(
        code(holocron::not_found),
        help("Run: holocron search <name> to find a character's id")
    )]
    NotFound { identifier: String },

    #[error("Archive error ({status}): {message}")]
    #[diagnostic(code(holocron::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected archive response: {message}")]
    #[diagnostic(
        code(holocron::invalid_response),
        help("The API URL may point at something other than the character archive.")
    )]
    InvalidResponse { message: String },

    // ── Validation & configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(holocron::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(holocron::config),
        help("Inspect it with: holocron config show\nRecreate it with: holocron config init")
    )]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(holocron::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(holocron::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            Self::ApiError { .. }
            | Self::InvalidResponse { .. }
            | Self::Internal(_)
            | Self::Io(_)
            | Self::Serialize(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { identifier } => CliError::NotFound { identifier },
            CoreError::Transport {
                status: Some(status),
                message,
            } => CliError::ApiError { status, message },
            CoreError::Transport {
                status: None,
                message,
            } => CliError::ConnectionFailed { message },
            CoreError::Timeout { message } => CliError::Timeout { message },
            CoreError::Decode { message } => CliError::InvalidResponse { message },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

impl From<tokio::task::JoinError> for CliError {
    fn from(err: tokio::task::JoinError) -> Self {
        CliError::Internal(format!("load task failed: {err}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialize(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::NotFound {
                    identifier: "999".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Transport {
                    message: "connection refused".into(),
                    status: None,
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::Timeout {
                    message: "timed out".into(),
                },
                exit_code::TIMEOUT,
            ),
            (
                CoreError::Transport {
                    message: "boom".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
        ];

        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
