//! Error types for the nebius-provider crate.

use tokio::sync::mpsc;

/// Errors that can occur in vendor operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Stream parsing or transport error
    #[error("Stream error: {0}")]
    Stream(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// The consumer dropped its end of the token channel
    #[error("Token channel closed by consumer")]
    ChannelClosed,
}

/// A failed streaming send.
///
/// The token channel is *not* closed on failure. The sender is handed back
/// so the caller decides whether to drop it (closing the channel) or keep
/// it open.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct StreamFailure {
    #[source]
    pub error: ProviderError,
    pub channel: mpsc::Sender<String>,
}

impl StreamFailure {
    pub fn new(error: ProviderError, channel: mpsc::Sender<String>) -> Self {
        Self { error, channel }
    }

    pub fn into_parts(self) -> (ProviderError, mpsc::Sender<String>) {
        (self.error, self.channel)
    }
}
