//! nebius-provider: OpenAI-compatible vendor adapter.

mod error;
pub mod filter;
pub mod providers;
pub mod traits;
pub mod types;

pub use error::{ProviderError, StreamFailure};
pub use filter::{ModelFilter, NEBIUS_MODEL_PREFIXES};
pub use providers::nebius::{nebius_config, new_nebius_client, NEBIUS_BASE_URL, NEBIUS_VENDOR_NAME};
pub use providers::openai_compat::{
    build_request, OpenAiCompatClient, OpenAiCompatConfig, OPENAI_DEFAULT_BASE_URL,
};
pub use traits::Vendor;
pub use types::{CompletionRequest, WireMessage};
