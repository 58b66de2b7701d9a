//! Typed errors for fetching posts.

use thiserror::Error;

/// Everything that can go wrong while fetching a listing.
///
/// The `Display` text is what ends up in the error banner, so keep it short.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unauthorized - session token was rejected")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Malformed listing: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether the failure means the session is no longer usable.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }
}
