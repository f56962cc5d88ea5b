//! Error types for configuration, transport, parsing and form filling.
//!
//! Only [`ConfigError`] ever reaches a caller of the login workflow. The
//! others are produced by collaborators and converted into boolean outcomes
//! plus diagnostics by the orchestrator.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid or incomplete operator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required options are empty.
    #[error(
        "all parameters are required and can't be empty; the missing parameters are {}",
        .missing.join(", ")
    )]
    MissingOptions { missing: Vec<String> },

    /// A URL option is set but cannot be parsed.
    #[error("option `{name}` is not a valid URL ({value}): {source}")]
    InvalidUrl {
        name: String,
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// `name=value` pair referenced an option that does not exist.
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    /// Override string was not of the form `name=value`.
    #[error("malformed option override `{0}`, expected name=value")]
    MalformedOverride(String),

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Names of the missing options, empty for every other variant.
    pub fn missing_options(&self) -> &[String] {
        match self {
            ConfigError::MissingOptions { missing } => missing,
            _ => &[],
        }
    }
}

/// Network-level failure reported by an [`HttpTransport`](crate::acquisition::http_client::HttpTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// No usable document parser for a fetched response.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no document parser available for {url} (content-type: {content_type})")]
    Unavailable { url: String, content_type: String },
}

/// The selected form cannot carry the credentials.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FillError {
    #[error("login form posting to {action} has no username field")]
    MissingUsernameField { action: String },

    #[error("login form posting to {action} has no password field")]
    MissingPasswordField { action: String },
}
