//! Error type shared by every `HttpClient` call.

use thiserror::Error;

/// Failure of a single API round trip.
///
/// Callers only ever learn the numeric status of an HTTP failure; the
/// response body of a non-2xx reply is not read.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, reset).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A response arrived with a status outside 2xx.
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    /// The 2xx body was not valid JSON for the requested type.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Origin, base path and endpoint did not form a valid URL.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// Status code of an HTTP failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
