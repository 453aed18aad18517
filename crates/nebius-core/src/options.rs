//! Per-request chat options.

use serde::{Deserialize, Serialize};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default nucleus sampling mass.
pub const DEFAULT_TOP_P: f64 = 0.9;

/// Options applied to a single chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatOptions {
    /// Model identifier, e.g. `meta-llama/Meta-Llama-3.1-70B-Instruct`.
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    /// Sampling seed.
    ///
    /// `0` means "unset": a zero seed is never sent to the vendor, so it
    /// cannot be requested explicitly.
    pub seed: i64,
    /// Forward only the model and messages, leaving every sampling
    /// parameter to the vendor's defaults.
    pub raw: bool,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            seed: 0,
            raw: false,
        }
    }
}

impl ChatOptions {
    /// Options for `model` with default sampling.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// The seed to send, if one was set.
    pub fn explicit_seed(&self) -> Option<i64> {
        (self.seed != 0).then_some(self.seed)
    }
}
