//! Error types for remote synchronisation and image resolution.

use thiserror::Error;

/// Errors reported by the remote annotation store.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The request never produced a usable response (connection refused, timeout, ...)
    #[error("Network failure: {message}")]
    Network {
        /// Description of the transport failure
        message: String,
    },

    /// The remote store does not know the requested entity
    #[error("Not found: {what}")]
    NotFound {
        /// What was looked up
        what: String,
    },

    /// The remote store answered but refused the request
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// Status code reported by the remote
        status: u16,
        /// Reason given by the remote
        message: String,
    },

    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The remote answered a request with a reply meant for another kind of request
    #[error("Unexpected reply: expected {expected}, got {got}")]
    UnexpectedReply {
        /// Reply kind the request calls for
        expected: &'static str,
        /// Reply kind actually received
        got: &'static str,
    },
}

impl SyncError {
    /// Create a network failure with a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Check whether this is a not-found answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The image collaborator could not produce a slice for a path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Image '{path}' could not be resolved: {reason}")]
pub struct ImageUnavailable {
    /// Relative path of the image within the sequence
    pub path: String,
    /// Why resolution failed
    pub reason: String,
}

impl ImageUnavailable {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A failure while bringing a newly displayed image up, surfaced to the user.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The image itself could not be resolved
    #[error(transparent)]
    Image(#[from] ImageUnavailable),

    /// The annotation list for the image could not be fetched
    #[error("Failed to load annotations: {0}")]
    Annotations(#[from] SyncError),
}
