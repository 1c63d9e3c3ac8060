use std::sync::Arc;
use thiserror::Error;

/// Unified error type for quran-client-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Remote operations (transport failures, non-2xx statuses, empty lookups)
/// - Response decoding
/// - Configuration operations (loading, validation)
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Remote Errors
    // ==========================================================================
    /// Transport-level failure (DNS, connection refused, HTTP timeout)
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote API answered with a non-success status
    #[error("remote fetch failed with HTTP {status}: {body}")]
    RemoteError { status: u16, body: String },

    /// A single-entity lookup returned zero results
    #[error("not found: {0}")]
    NotFound(String),

    /// Successful response whose payload does not have the expected shape
    #[error("invalid response from remote service: {0}")]
    InvalidResponse(String),

    /// Failed to build the HTTP client
    #[error("failed to create HTTP client: {0}")]
    HttpClientInit(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },
}

impl Error {
    /// Recover an owned error from one shared between coalesced cache callers.
    pub fn from_shared(shared: Arc<Self>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(|shared| shared.duplicate())
    }

    fn duplicate(&self) -> Self {
        match self {
            Self::RemoteUnavailable(msg) => Self::RemoteUnavailable(msg.clone()),
            Self::RemoteError { status, body } => Self::RemoteError {
                status: *status,
                body: body.clone(),
            },
            Self::NotFound(what) => Self::NotFound(what.clone()),
            Self::InvalidResponse(msg) => Self::InvalidResponse(msg.clone()),
            Self::HttpClientInit(msg) => Self::HttpClientInit(msg.clone()),
            Self::ConfigLoad(msg) => Self::ConfigLoad(msg.clone()),
            Self::ConfigInvalid { field, reason } => Self::ConfigInvalid {
                field: field.clone(),
                reason: reason.clone(),
            },
        }
    }

    /// HTTP status carried by the error, if the remote answered at all
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
