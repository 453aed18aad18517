//! Allow-list filtering of vendor-reported model ids.
//!
//! A plain case-sensitive prefix match. It only hides models from other
//! publishers; it says nothing about whether a model can actually be served.

/// Publisher namespaces Nebius AI Studio serves.
pub const NEBIUS_MODEL_PREFIXES: &[&str] = &[
    "meta-llama/",
    "mistralai/",
    "deepseek-ai/",
    "microsoft/",
    "allenai/",
];

/// Prefix allow-list for model identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFilter {
    prefixes: Vec<String>,
}

impl ModelFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// The Nebius publisher allow-list.
    pub fn nebius() -> Self {
        Self::new(NEBIUS_MODEL_PREFIXES.iter().copied())
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn allows(&self, model_id: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| model_id.starts_with(prefix.as_str()))
    }

    /// Keep allowed ids, preserving their order.
    pub fn apply<I>(&self, model_ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        model_ids.into_iter().filter(|id| self.allows(id)).collect()
    }
}

impl Default for ModelFilter {
    fn default() -> Self {
        Self::nebius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_allowed_in_order() {
        let filter = ModelFilter::nebius();
        let ids = vec![
            "unknown-org/bar".to_string(),
            "mistralai/Mixtral-8x7B".to_string(),
            "meta-llama/foo".to_string(),
            "gpt-4o".to_string(),
            "allenai/OLMo".to_string(),
        ];
        assert_eq!(
            filter.apply(ids),
            vec!["mistralai/Mixtral-8x7B", "meta-llama/foo", "allenai/OLMo"]
        );
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let filter = ModelFilter::nebius();
        assert!(!filter.allows("Meta-Llama/foo"));
        assert!(!filter.allows("meta-llama"));
        assert!(filter.allows("meta-llama/"));
    }

    #[test]
    fn test_custom_prefixes() {
        let filter = ModelFilter::new(["Qwen/"]);
        assert!(filter.allows("Qwen/Qwen2.5-72B"));
        assert!(!filter.allows("meta-llama/foo"));
        assert_eq!(filter.prefixes(), ["Qwen/".to_string()]);
    }

    #[test]
    fn test_empty_filter_allows_nothing() {
        let filter = ModelFilter::new(Vec::<String>::new());
        assert!(filter.apply(vec!["meta-llama/foo".to_string()]).is_empty());
    }
}
