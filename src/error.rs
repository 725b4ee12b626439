use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Problems with the operator-supplied seed URL. Always fatal.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no URL provided")]
    MissingUrl,

    #[error("invalid URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors raised by a browser session backend
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to WebDriver at {url}: {message}")]
    Connect { url: String, message: String },

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("{url} did not become idle within {waited:?}")]
    ReadinessTimeout { url: String, waited: Duration },

    #[error("unexpected browser response: {0}")]
    Protocol(String),
}

/// A failed page capture. Logged by the capture unit, never propagated.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors loading or validating a crawl configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL filter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors that stop a crawl before it starts
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
