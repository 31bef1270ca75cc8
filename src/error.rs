//! Error types for inbox-triage.
//!
//! Only structural collaborator failures live here. Heuristic failures
//! inside the pipeline (unparseable dates, missing headers, undecodable
//! parts) never become errors — they degrade to absent or default values
//! at the point they happen.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mailbox error: {0}")]
    Mailbox(#[from] MailboxError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Mailbox session errors.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    #[error("Connection to {host} failed: {reason}")]
    ConnectionFailed { host: String, reason: String },

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("Authentication failed for {username}")]
    AuthFailed { username: String },

    #[error("Mailbox {mailbox} could not be selected: {reason}")]
    SelectFailed { mailbox: String, reason: String },

    #[error("Message listing failed: {0}")]
    ListFailed(String),

    #[error("Connection closed by server")]
    Disconnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Report export errors.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Could not create report directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Could not write report to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
