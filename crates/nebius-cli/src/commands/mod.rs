//! Command implementations.

pub mod models;
pub mod send;
pub mod setup;

use crate::cli::Cli;
use nebius_core::{base_url_env, Config, VendorOverrides};
use nebius_provider::{
    nebius_config, ModelFilter, OpenAiCompatClient, OpenAiCompatConfig, Vendor, NEBIUS_VENDOR_NAME,
};
use std::sync::Arc;

/// Vendor selected on the command line, else the configured one.
pub fn vendor_name(cli: &Cli, config: &Config) -> String {
    cli.vendor.clone().unwrap_or_else(|| config.vendor.clone())
}

/// Build the selected vendor from flags, environment, and config file.
pub fn create_vendor(cli: &Cli, config: &Config) -> anyhow::Result<Arc<dyn Vendor>> {
    let name = vendor_name(cli, config);
    let resolved = config.resolve(
        &name,
        VendorOverrides {
            api_key: cli.api_key.clone(),
            base_url: cli.base_url.clone(),
        },
    )?;

    let mut vendor_config = if name.eq_ignore_ascii_case(NEBIUS_VENDOR_NAME) {
        nebius_config(resolved.api_key)
    } else {
        let base_url = resolved.base_url.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No base URL configured for {name}. Set it with:\n  \
                 export {}=https://...",
                base_url_env(&name)
            )
        })?;
        OpenAiCompatConfig::compatible(name.as_str(), base_url, resolved.api_key)
    };

    if let Some(base_url) = resolved.base_url {
        vendor_config = vendor_config.with_base_url(base_url);
    }
    if !resolved.model_prefixes.is_empty() {
        vendor_config = vendor_config.with_model_filter(ModelFilter::new(resolved.model_prefixes));
    }

    tracing::debug!(vendor = %name, "vendor configured");
    Ok(Arc::new(OpenAiCompatClient::new(vendor_config)))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted vendor for command tests.

    use async_trait::async_trait;
    use nebius_core::{ChatMessage, ChatOptions};
    use nebius_provider::{ProviderError, StreamFailure, Vendor};
    use std::sync::Mutex;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    pub enum StreamScript {
        Complete(Vec<&'static str>),
        FailAfter(Vec<&'static str>),
    }

    pub struct MockVendor {
        pub models: Vec<String>,
        pub reply: String,
        pub stream: StreamScript,
        pub seen: Mutex<Vec<ChatOptions>>,
    }

    impl MockVendor {
        pub fn new(stream: StreamScript) -> Self {
            Self {
                models: vec!["meta-llama/foo".to_string(), "mistralai/bar".to_string()],
                reply: "Hello from mock!".to_string(),
                stream,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Vendor for MockVendor {
        fn name(&self) -> &str {
            "mock"
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(self.models.clone())
        }

        async fn send(
            &self,
            cancel: &CancellationToken,
            _messages: &[ChatMessage],
            options: &ChatOptions,
        ) -> Result<String, ProviderError> {
            if cancel.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }
            self.seen.lock().unwrap().push(options.clone());
            Ok(self.reply.clone())
        }

        async fn send_stream(
            &self,
            _messages: &[ChatMessage],
            _options: &ChatOptions,
            channel: mpsc::Sender<String>,
        ) -> Result<(), StreamFailure> {
            let (fragments, fail) = match &self.stream {
                StreamScript::Complete(fragments) => (fragments, false),
                StreamScript::FailAfter(fragments) => (fragments, true),
            };
            for fragment in fragments {
                let _ = channel.send(fragment.to_string()).await;
            }
            if fail {
                return Err(StreamFailure::new(
                    ProviderError::Stream("connection reset".to_string()),
                    channel,
                ));
            }
            let _ = channel.send("\n".to_string()).await;
            Ok(())
        }
    }
}
