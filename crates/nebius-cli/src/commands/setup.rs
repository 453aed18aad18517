use nebius_core::ConfigStore;
use std::io::Write;

/// Values to persist for one vendor.
#[derive(Debug, Default)]
pub struct SetupValues {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model_prefixes: Vec<String>,
}

/// Store vendor settings and make it the default vendor.
pub fn run(
    store: &ConfigStore,
    vendor: &str,
    values: SetupValues,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if values.api_key.is_none() && values.base_url.is_none() && values.model_prefixes.is_empty() {
        anyhow::bail!("Nothing to save. Pass --api-key, --base-url, or --model-prefix.");
    }

    let mut config = store.load();
    config.vendor = vendor.to_string();

    let settings = config.vendor_settings_mut(vendor);
    if let Some(api_key) = values.api_key {
        settings.api_key = Some(api_key);
    }
    if let Some(base_url) = values.base_url {
        settings.base_url = Some(base_url);
    }
    if !values.model_prefixes.is_empty() {
        settings.model_prefixes = values.model_prefixes;
    }

    store.save(&config)?;
    writeln!(out, "Saved {vendor} settings to {}", store.path().display())?;
    Ok(())
}
