//! Error types for the hgdash library.

use thiserror::Error;

/// Errors that can occur while serving the dashboard or driving the offline cache.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error, including failure to bind the listening socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error from the network layer.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A JSON document could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL could not be parsed or resolved against the worker scope.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The configured listen address is not a valid socket address.
    #[error("invalid listen address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// A precached resource answered with a non-success status.
    #[error("fetching {url} returned status {status}")]
    Fetch {
        /// Resolved URL of the resource.
        url: String,
        /// HTTP status code of the response.
        status: u16,
    },

    /// The network could not be reached for a request.
    #[error("network error for {url}: {reason}")]
    Network {
        /// Resolved URL of the request.
        url: String,
        /// Transport-level failure description.
        reason: String,
    },

    /// A lifecycle event arrived while the worker was in a state that cannot handle it.
    #[error("cannot handle {event} while worker is {state}")]
    InvalidState {
        /// Name of the lifecycle event.
        event: &'static str,
        /// State the worker was in.
        state: crate::worker::WorkerState,
    },

    /// Cache storage backend failure.
    #[error("cache storage error: {0}")]
    Storage(String),

    /// The worker task stopped before answering.
    #[error("worker task is no longer running")]
    WorkerGone,
}

/// A specialized `Result` type for hgdash operations.
pub type Result<T> = std::result::Result<T, Error>;
