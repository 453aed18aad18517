//! CLI argument and command definitions.

use clap::{Args, Parser, Subcommand};
use nebius_core::{ChatMessage, ChatOptions};

#[derive(Parser)]
#[command(
    name = "nebius",
    version,
    about = "Chat with Nebius AI Studio and other OpenAI-compatible vendors"
)]
pub struct Cli {
    /// Vendor to talk to (defaults to the configured vendor).
    #[arg(long, global = true)]
    pub vendor: Option<String>,

    /// API key; overrides the environment and config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// API base URL; overrides the environment and config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the models the vendor exposes.
    Models,

    /// Send a prompt and print the completion.
    Send(SendArgs),

    /// Save --api-key / --base-url for the vendor in the config file.
    Setup {
        /// Model-id prefix to expose; repeat to add several.
        #[arg(long = "model-prefix")]
        model_prefixes: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SendArgs {
    /// The prompt to send.
    pub prompt: String,

    /// System prompt sent before the user prompt.
    #[arg(long)]
    pub system: Option<String>,

    /// Model to use.
    #[arg(short, long)]
    pub model: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub top_p: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub presence_penalty: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub frequency_penalty: Option<f64>,

    /// Sampling seed; 0 leaves it unset.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Send only the model and messages.
    #[arg(long)]
    pub raw: bool,

    /// Print tokens as they arrive.
    #[arg(long)]
    pub stream: bool,
}

impl SendArgs {
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(ChatMessage::system(system.as_str()));
        }
        messages.push(ChatMessage::user(self.prompt.as_str()));
        messages
    }

    /// Command-line values layered over `defaults`.
    pub fn options(&self, defaults: &ChatOptions) -> ChatOptions {
        ChatOptions {
            model: self.model.clone().unwrap_or_else(|| defaults.model.clone()),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            presence_penalty: self.presence_penalty.unwrap_or(defaults.presence_penalty),
            frequency_penalty: self.frequency_penalty.unwrap_or(defaults.frequency_penalty),
            seed: self.seed.unwrap_or(defaults.seed),
            raw: self.raw || defaults.raw,
        }
    }
}
