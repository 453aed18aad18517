use nebius_provider::Vendor;
use std::io::Write;

/// Print the vendor's allow-listed models, one per line.
pub async fn run(vendor: &dyn Vendor, out: &mut impl Write) -> anyhow::Result<()> {
    let models = vendor
        .list_models()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list {} models: {e}", vendor.name()))?;

    if models.is_empty() {
        writeln!(out, "No models found.")?;
    }
    for model in &models {
        writeln!(out, "{model}")?;
    }
    Ok(())
}
