use crate::error::ConfigError;
use crate::options::ChatOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Vendor used when none is selected.
pub const DEFAULT_VENDOR: &str = "Nebius";

/// Stored settings for one vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model-id prefixes to expose; empty keeps the vendor's own list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub model_prefixes: Vec<String>,
}

/// Serialized settings from ~/.nebius/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vendor: String,
    /// Keyed by vendor name as typed by the user.
    pub vendors: HashMap<String, VendorSettings>,
    /// Options used when the command line leaves them out.
    pub defaults: ChatOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vendor: DEFAULT_VENDOR.to_string(),
            vendors: HashMap::new(),
            defaults: ChatOptions::default(),
        }
    }
}

/// Explicit values that take precedence over env and file.
#[derive(Debug, Clone, Default)]
pub struct VendorOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// Fully resolved vendor credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVendor {
    pub name: String,
    pub api_key: String,
    /// `None` means the vendor's default base URL.
    pub base_url: Option<String>,
    pub model_prefixes: Vec<String>,
}

/// Environment variable prefix for a vendor, e.g. `"Nebius"` -> `"NEBIUS_"`.
pub fn env_prefix(vendor: &str) -> String {
    let name: String = vendor
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    if name.is_empty() {
        name
    } else {
        format!("{name}_")
    }
}

/// `NEBIUS_API_KEY` style variable name.
pub fn api_key_env(vendor: &str) -> String {
    format!("{}API_KEY", env_prefix(vendor))
}

/// `NEBIUS_API_BASE_URL` style variable name.
pub fn base_url_env(vendor: &str) -> String {
    format!("{}API_BASE_URL", env_prefix(vendor))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Stored settings for `vendor`, matched case-insensitively.
    pub fn vendor_settings(&self, vendor: &str) -> Option<&VendorSettings> {
        self.vendors
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(vendor))
            .map(|(_, settings)| settings)
    }

    /// Stored settings for `vendor`, inserted empty if missing.
    pub fn vendor_settings_mut(&mut self, vendor: &str) -> &mut VendorSettings {
        let key = self
            .vendors
            .keys()
            .find(|name| name.eq_ignore_ascii_case(vendor))
            .cloned()
            .unwrap_or_else(|| vendor.to_string());
        self.vendors.entry(key).or_default()
    }

    /// Resolve credentials for `vendor` from the process environment.
    pub fn resolve(
        &self,
        vendor: &str,
        overrides: VendorOverrides,
    ) -> Result<ResolvedVendor, ConfigError> {
        self.resolve_with(vendor, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve credentials with precedence: override, env, config file.
    pub fn resolve_with<F>(
        &self,
        vendor: &str,
        overrides: VendorOverrides,
        env: F,
    ) -> Result<ResolvedVendor, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let stored = self.vendor_settings(vendor).cloned().unwrap_or_default();

        let api_key = non_empty(overrides.api_key)
            .or_else(|| non_empty(env(&api_key_env(vendor))))
            .or_else(|| non_empty(stored.api_key))
            .ok_or_else(|| ConfigError::MissingApiKey {
                vendor: vendor.to_string(),
                env_var: api_key_env(vendor),
            })?;

        let base_url = non_empty(overrides.base_url)
            .or_else(|| non_empty(env(&base_url_env(vendor))))
            .or_else(|| non_empty(stored.base_url));

        Ok(ResolvedVendor {
            name: vendor.to_string(),
            api_key,
            base_url,
            model_prefixes: stored.model_prefixes,
        })
    }
}

/// Helper struct for storing the location to read/write global settings
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".nebius");
        path.push("config.json");
        Self { path }
    }

    /// Store backed by an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the user's saved config, or fallback to Default
    pub fn load(&self) -> Config {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Config::default(),
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    /// Save the user's config back to disk
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Export stored API keys and base URLs into the process env where unset.
    pub fn hydrate_env(&self) {
        let config = self.load();
        for (vendor, settings) in config.vendors.iter() {
            let pairs = [
                (api_key_env(vendor), settings.api_key.as_deref()),
                (base_url_env(vendor), settings.base_url.as_deref()),
            ];
            for (env_var, value) in pairs {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    if std::env::var(&env_var).is_err() {
                        std::env::set_var(&env_var, value);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_nebius(settings: VendorSettings) -> Config {
        let mut config = Config::default();
        config.vendors.insert("nebius".to_string(), settings);
        config
    }

    #[test]
    fn test_env_names() {
        assert_eq!(env_prefix("Nebius"), "NEBIUS_");
        assert_eq!(env_prefix("Together AI"), "TOGETHER_AI_");
        assert_eq!(api_key_env("Nebius"), "NEBIUS_API_KEY");
        assert_eq!(base_url_env("Nebius"), "NEBIUS_API_BASE_URL");
    }

    #[test]
    fn test_resolve_precedence() {
        let config = config_with_nebius(VendorSettings {
            api_key: Some("file-key".to_string()),
            base_url: Some("https://file.example/v1".to_string()),
            model_prefixes: vec![],
        });
        let env = |key: &str| match key {
            "NEBIUS_API_KEY" => Some("env-key".to_string()),
            _ => None,
        };

        let resolved = config
            .resolve_with("Nebius", VendorOverrides::default(), env)
            .unwrap();
        assert_eq!(resolved.api_key, "env-key");
        assert_eq!(resolved.base_url.as_deref(), Some("https://file.example/v1"));

        let overrides = VendorOverrides {
            api_key: Some("flag-key".to_string()),
            base_url: Some("https://flag.example/v1".to_string()),
        };
        let resolved = config.resolve_with("Nebius", overrides, env).unwrap();
        assert_eq!(resolved.api_key, "flag-key");
        assert_eq!(resolved.base_url.as_deref(), Some("https://flag.example/v1"));
    }

    #[test]
    fn test_resolve_missing_key() {
        let err = Config::default()
            .resolve_with("Nebius", VendorOverrides::default(), |_| None)
            .unwrap_err();
        match err {
            ConfigError::MissingApiKey { vendor, env_var } => {
                assert_eq!(vendor, "Nebius");
                assert_eq!(env_var, "NEBIUS_API_KEY");
            }
            other => panic!("Expected MissingApiKey, got: {other:?}"),
        }
    }

    #[test]
    fn test_blank_values_fall_through() {
        let config = config_with_nebius(VendorSettings {
            api_key: Some("file-key".to_string()),
            base_url: Some("  ".to_string()),
            model_prefixes: vec!["meta-llama/".to_string()],
        });
        let resolved = config
            .resolve_with("Nebius", VendorOverrides::default(), |_| Some(String::new()))
            .unwrap();
        assert_eq!(resolved.api_key, "file-key");
        assert_eq!(resolved.base_url, None);
        assert_eq!(resolved.model_prefixes, vec!["meta-llama/".to_string()]);
    }

    #[test]
    fn test_vendor_settings_mut_reuses_existing_key() {
        let mut config = config_with_nebius(VendorSettings::default());
        config.vendor_settings_mut("NEBIUS").api_key = Some("k".to_string());
        assert_eq!(config.vendors.len(), 1);
        assert_eq!(config.vendors["nebius"].api_key.as_deref(), Some("k"));

        config.vendor_settings_mut("Other").base_url = Some("http://x".to_string());
        assert_eq!(config.vendors.len(), 2);
    }

    #[test]
    fn test_config_defaults_for_partial_file() {
        let parsed: Config = serde_json::from_str(r#"{"vendor":"Nebius"}"#).unwrap();
        assert!(parsed.vendors.is_empty());
        assert_eq!(parsed.defaults, ChatOptions::default());
    }

    #[test]
    fn test_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("nested").join("config.json"));
        assert_eq!(store.load(), Config::default());

        let config = config_with_nebius(VendorSettings {
            api_key: Some("k".to_string()),
            base_url: None,
            model_prefixes: vec![],
        });
        store.save(&config).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(ConfigStore::with_path(path).load(), Config::default());
    }
}
