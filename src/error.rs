//! Error Handling Module
//!
//! One taxonomy for every stage of the dispatch pipeline: input validation,
//! throttling, provider resolution, transport, and response parsing. Callers
//! branch on the variant instead of parsing message strings.

use thiserror::Error;

/// Errors produced by the dispatch pipeline.
///
/// Variants never carry a credential value. Upstream error bodies are not
/// attached either; they are logged at debug level only, truncated and
/// redacted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The provider identifier is not present in the registry.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A configured provider has no credential.
    #[error("missing credential for provider: {0}")]
    MissingCredential(String),

    /// The request failed local validation; nothing was sent upstream.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller already used its slot for the current throttle window.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Connection-level failure or timeout while reaching the upstream.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The upstream answered with a non-success HTTP status.
    #[error("{provider} upstream returned HTTP {status}")]
    UpstreamHttp {
        /// Provider identifier the request was dispatched to.
        provider: String,
        /// HTTP status code returned by the upstream.
        status: u16,
    },

    /// The upstream body did not contain the expected response path.
    #[error("malformed {provider} response: {detail}")]
    MalformedResponse {
        /// Provider identifier the request was dispatched to.
        provider: String,
        /// Which part of the expected shape was missing.
        detail: String,
    },
}

impl DispatchError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Only transport failures and upstream 5xx responses are transient;
    /// every other variant is deterministic for a given request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportFailure(_) => true,
            Self::UpstreamHttp { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Upstream HTTP status, when this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }
}
