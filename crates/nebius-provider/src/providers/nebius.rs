//! Nebius AI Studio vendor.
//!
//! Uses the OpenAI-compatible API at `https://api.studio.nebius.ai/v1`.

use crate::filter::ModelFilter;
use crate::providers::openai_compat::{OpenAiCompatClient, OpenAiCompatConfig};

/// Display name; also the source of the `NEBIUS_` env prefix.
pub const NEBIUS_VENDOR_NAME: &str = "Nebius";

pub const NEBIUS_BASE_URL: &str = "https://api.studio.nebius.ai/v1";

/// Nebius config with the default base URL and publisher allow-list.
pub fn nebius_config(api_key: impl Into<String>) -> OpenAiCompatConfig {
    OpenAiCompatConfig::compatible(NEBIUS_VENDOR_NAME, NEBIUS_BASE_URL, api_key)
        .with_model_filter(ModelFilter::nebius())
}

/// Create a new Nebius client.
///
/// Set the `NEBIUS_API_KEY` environment variable.
pub fn new_nebius_client(api_key: impl Into<String>) -> OpenAiCompatClient {
    OpenAiCompatClient::new(nebius_config(api_key))
}
