//! Error types for the Diffbot client.

use thiserror::Error;

/// Result type for Diffbot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Diffbot client.
#[derive(Error, Debug)]
pub enum Error {
    /// An invalid configuration value was supplied to a setter.
    ///
    /// Raised at the setter call, never deferred to request time, so a
    /// misconfigured client is caught before anything goes on the wire.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure: DNS, connect, TLS or timeout.
    ///
    /// A non-2xx status from the server is NOT a network error; the
    /// response body is returned to the caller regardless of status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body is not syntactically valid JSON.
    #[error("malformed JSON response: {source}")]
    MalformedResponse {
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
        /// The offending raw body, kept for diagnostics.
        body: String,
    },
}
