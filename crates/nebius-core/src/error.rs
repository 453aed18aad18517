//! Error types for the nebius-core crate.

/// Errors raised while loading or resolving vendor settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No API key from flags, environment, or config file
    #[error("No API key configured for {vendor}. Set {env_var} or run `nebius setup`")]
    MissingApiKey { vendor: String, env_var: String },
}
