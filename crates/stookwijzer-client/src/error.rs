//! Client error types.

use thiserror::Error;

/// Maximum number of characters of an error body kept in [`FetchError::Network`].
pub const BODY_EXCERPT_CHARS: usize = 200;

/// Why a feature lookup failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service answered with a non-success status.
    #[error("WFS request failed ({status}) {body}")]
    Network { status: u16, body: String },

    /// The request never produced a response (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not JSON.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request was superseded and abandoned.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Cancellations are expected and never shown to the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub(crate) fn network(status: u16, body: &str) -> Self {
        Self::Network {
            status,
            body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        }
    }
}
