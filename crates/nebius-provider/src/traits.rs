//! Vendor trait definition.

use crate::error::{ProviderError, StreamFailure};
use async_trait::async_trait;
use nebius_core::{ChatMessage, ChatOptions};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Trait for chat vendors the application dispatches to.
#[async_trait]
pub trait Vendor: Send + Sync {
    /// Vendor display name (e.g., "Nebius").
    fn name(&self) -> &str;

    /// Model identifiers this vendor exposes, in the vendor's order.
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;

    /// Send a non-streaming request and return the completion text.
    ///
    /// Returns `ProviderError::Cancelled` if `cancel` fires first.
    async fn send(
        &self,
        cancel: &CancellationToken,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ProviderError>;

    /// Send a streaming request, forwarding text fragments into `channel`.
    ///
    /// On success a final `"\n"` fragment is sent and the channel is closed.
    /// On failure the channel is left open and returned in the error.
    async fn send_stream(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
        channel: mpsc::Sender<String>,
    ) -> Result<(), StreamFailure>;
}

// Compile-time check: Vendor must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn Vendor) {}
};
