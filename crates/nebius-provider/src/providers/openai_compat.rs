//! Generic OpenAI-compatible vendor.
//!
//! Speaks the OpenAI chat completions and model listing APIs used by
//! Nebius AI Studio and many other hosted inference services.

use crate::error::{ProviderError, StreamFailure};
use crate::filter::ModelFilter;
use crate::traits::Vendor;
use crate::types::{
    api_error_message, CompletionRequest, CompletionResponse, ModelList, StreamChunk, WireMessage,
};
use async_trait::async_trait;
use futures::StreamExt;
use nebius_core::{ChatMessage, ChatOptions};
use once_cell::sync::OnceCell;
use reqwest::Client;
use reqwest_eventsource::{retry, Event, EventSource};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Base URL used when a vendor is configured with an empty one.
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Sentinel payload that ends an OpenAI event stream.
const DONE_SENTINEL: &str = "[DONE]";

/// Configuration for an OpenAI-compatible vendor.
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub vendor_name: String,
    pub api_key: SecretString,
    /// Empty means [`OPENAI_DEFAULT_BASE_URL`].
    pub base_url: String,
    pub model_filter: ModelFilter,
}

impl OpenAiCompatConfig {
    /// Config for a compatible vendor with its default base URL.
    pub fn compatible(
        vendor_name: impl Into<String>,
        default_base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            vendor_name: vendor_name.into(),
            api_key: SecretString::from(api_key.into()),
            base_url: default_base_url.into(),
            model_filter: ModelFilter::default(),
        }
    }

    /// Override the base URL. Blank values are ignored.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if !base_url.trim().is_empty() {
            self.base_url = base_url;
        }
        self
    }

    pub fn with_model_filter(mut self, model_filter: ModelFilter) -> Self {
        self.model_filter = model_filter;
        self
    }
}

/// Built on first use and shared by every later call.
#[derive(Debug)]
struct ApiHandle {
    http: Client,
    base_url: String,
}

impl ApiHandle {
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// A vendor that speaks the OpenAI chat completions protocol.
pub struct OpenAiCompatClient {
    config: OpenAiCompatConfig,
    handle: OnceCell<ApiHandle>,
}

impl OpenAiCompatClient {
    /// Create a new OpenAI-compatible client. No I/O happens here.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        Self {
            config,
            handle: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &OpenAiCompatConfig {
        &self.config
    }

    /// Base URL requests go to.
    pub fn base_url(&self) -> &str {
        let base_url = self.config.base_url.trim();
        if base_url.is_empty() {
            OPENAI_DEFAULT_BASE_URL
        } else {
            base_url.trim_end_matches('/')
        }
    }

    fn handle(&self) -> Result<&ApiHandle, ProviderError> {
        self.handle.get_or_try_init(|| {
            let http = Client::builder().build()?;
            tracing::debug!(
                vendor = %self.config.vendor_name,
                base_url = %self.base_url(),
                "built API client"
            );
            Ok::<_, ProviderError>(ApiHandle {
                http,
                base_url: self.base_url().to_string(),
            })
        })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(self.config.api_key.expose_secret())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        if response.status().is_success() {
            return Ok(response);
        }
        Err(Self::api_error(response).await)
    }

    async fn api_error(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ProviderError::Api {
            status,
            message: api_error_message(&body),
        }
    }

    async fn create_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let handle = self.handle()?;
        let response = self
            .authorized(handle.http.post(handle.endpoint("chat/completions")))
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn open_stream(&self, request: &CompletionRequest) -> Result<CompletionStream, ProviderError> {
        let handle = self.handle()?;
        let builder = self
            .authorized(handle.http.post(handle.endpoint("chat/completions")))
            .json(request);
        let source = EventSource::new(builder)
            .map_err(|e| ProviderError::Stream(format!("cannot open event stream: {e}")))?;
        CompletionStream::open(source).await
    }
}

/// Map chat messages and options to a completion request.
///
/// Message order is preserved. In raw mode only the model and messages are
/// set. Otherwise the sampling parameters are narrowed to `f32` and the seed
/// is sent only when non-zero.
pub fn build_request(messages: &[ChatMessage], options: &ChatOptions) -> CompletionRequest {
    let messages: Vec<WireMessage> = messages.iter().map(WireMessage::from).collect();

    if options.raw {
        return CompletionRequest {
            model: options.model.clone(),
            messages,
            temperature: None,
            top_p: None,
            presence_penalty: None,
            frequency_penalty: None,
            seed: None,
            stream: false,
        };
    }

    CompletionRequest {
        model: options.model.clone(),
        messages,
        temperature: Some(options.temperature as f32),
        top_p: Some(options.top_p as f32),
        presence_penalty: Some(options.presence_penalty as f32),
        frequency_penalty: Some(options.frequency_penalty as f32),
        seed: options.explicit_seed(),
        stream: false,
    }
}

/// An open completion event stream. Closed when dropped.
struct CompletionStream {
    source: EventSource,
}

impl CompletionStream {
    /// Wait for the connection to open, surfacing status and transport errors.
    async fn open(source: EventSource) -> Result<Self, ProviderError> {
        let mut stream = Self { source };
        stream.source.set_retry_policy(Box::new(retry::Never));

        let first = stream.source.next().await;
        match first {
            Some(Ok(Event::Open)) => Ok(stream),
            Some(Ok(Event::Message(_))) => Err(ProviderError::Stream(
                "received data before the stream opened".to_string(),
            )),
            Some(Err(err)) => Err(stream_error(err).await),
            None => Err(ProviderError::Stream("stream closed before opening".to_string())),
        }
    }

    /// Next chunk, or `None` once the stream has ended.
    async fn recv(&mut self) -> Result<Option<StreamChunk>, ProviderError> {
        loop {
            match self.source.next().await {
                None | Some(Err(reqwest_eventsource::Error::StreamEnded)) => return Ok(None),
                Some(Ok(Event::Open)) => continue,
                Some(Ok(Event::Message(message))) => {
                    let data = message.data.trim();
                    if data.is_empty() {
                        continue;
                    }
                    if data == DONE_SENTINEL {
                        return Ok(None);
                    }
                    let chunk: StreamChunk = serde_json::from_str(data)?;
                    if let Some(error) = chunk.error {
                        return Err(ProviderError::Stream(error.message));
                    }
                    return Ok(Some(chunk));
                }
                Some(Err(err)) => return Err(stream_error(err).await),
            }
        }
    }
}

impl Drop for CompletionStream {
    fn drop(&mut self) {
        self.source.close();
    }
}

async fn stream_error(err: reqwest_eventsource::Error) -> ProviderError {
    use reqwest_eventsource::Error;

    match err {
        Error::Transport(e) => ProviderError::Http(e),
        Error::InvalidStatusCode(_, response) => OpenAiCompatClient::api_error(response).await,
        Error::InvalidContentType(content_type, _) => ProviderError::Stream(format!(
            "unexpected content type: {}",
            content_type.to_str().unwrap_or("<non-ascii>")
        )),
        other => ProviderError::Stream(other.to_string()),
    }
}

async fn forward(channel: &mpsc::Sender<String>, fragment: String) -> Result<(), ProviderError> {
    channel
        .send(fragment)
        .await
        .map_err(|_| ProviderError::ChannelClosed)
}

/// Forward delta content until the stream ends, then send the trailing
/// newline. A chunk without choices counts as the end of the stream.
async fn relay(stream: &mut CompletionStream, channel: &mpsc::Sender<String>) -> Result<(), ProviderError> {
    while let Some(chunk) = stream.recv().await? {
        let Some(choice) = chunk.choices.into_iter().next() else {
            break;
        };
        forward(channel, choice.delta.content.unwrap_or_default()).await?;
    }
    forward(channel, "\n".to_string()).await
}

#[async_trait]
impl Vendor for OpenAiCompatClient {
    fn name(&self) -> &str {
        &self.config.vendor_name
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let handle = self.handle()?;
        let response = self
            .authorized(handle.http.get(handle.endpoint("models")))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        let models: ModelList = serde_json::from_slice(&body)?;

        let ids = self
            .config
            .model_filter
            .apply(models.data.into_iter().map(|m| m.id));
        tracing::debug!(vendor = %self.config.vendor_name, count = ids.len(), "listed models");
        Ok(ids)
    }

    async fn send(
        &self,
        cancel: &CancellationToken,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ProviderError> {
        let request = build_request(messages, options);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            result = self.create_completion(&request) => result?,
        };

        match response.choices.into_iter().next() {
            Some(choice) => {
                tracing::debug!(
                    vendor = %self.config.vendor_name,
                    system_fingerprint = response.system_fingerprint.as_deref().unwrap_or(""),
                    "SystemFingerprint"
                );
                Ok(choice.message.content.unwrap_or_default())
            }
            None => Ok(String::new()),
        }
    }

    async fn send_stream(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
        channel: mpsc::Sender<String>,
    ) -> Result<(), StreamFailure> {
        let mut request = build_request(messages, options);
        request.stream = true;

        let mut stream = match self.open_stream(&request).await {
            Ok(stream) => stream,
            Err(error) => {
                eprintln!("ChatCompletionStream error: {error}");
                tracing::warn!(vendor = %self.config.vendor_name, error = %error, "failed to open completion stream");
                return Err(StreamFailure::new(error, channel));
            }
        };

        match relay(&mut stream, &channel).await {
            Ok(()) => {
                // Dropping the last sender closes the channel.
                drop(channel);
                Ok(())
            }
            Err(error) => {
                eprintln!("\nStream error: {error}");
                tracing::warn!(vendor = %self.config.vendor_name, error = %error, "completion stream failed");
                Err(StreamFailure::new(error, channel))
            }
        }
    }
}
