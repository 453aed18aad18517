//! nebius-core: Chat message and option types, plus vendor configuration.

pub mod config;
mod error;
pub mod message;
pub mod options;

pub use config::{
    api_key_env, base_url_env, env_prefix, Config, ConfigStore, ResolvedVendor, VendorOverrides,
    VendorSettings, DEFAULT_VENDOR,
};
pub use error::ConfigError;
pub use message::{ChatMessage, Role, UnknownRoleError};
pub use options::ChatOptions;
