//! Registry of models the compiler can source from or target.
//!
//! Seeds a curated list of known models, accepts dynamic registrations, and
//! synthesizes a conservative temporary descriptor (with a warning) when a
//! requested model is unknown so callers are not disrupted.

use crate::types::{ModelDescriptor, PromptStyle, Provider, ProviderKind};
use dashmap::DashMap;

/// Central model registry. Cheap to share; lookups are lock-free reads.
pub struct ModelRegistry {
    models: DashMap<String, ModelDescriptor>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    /// Registry pre-populated with curated models from major providers.
    pub fn new() -> Self {
        let registry = Self {
            models: DashMap::new(),
        };
        registry.register_default_models();
        registry
    }

    // Curated list; revisit as providers ship new models.
    fn register_default_models(&self) {
        for (name, window) in [
            ("gpt-5.1", 200_000),
            ("gpt-5", 200_000),
            ("gpt-5-mini", 128_000),
            ("gpt-4.1", 128_000),
            ("gpt-4.1-mini", 128_000),
            ("gpt-4o", 128_000),
            ("gpt-4o-mini", 64_000),
        ] {
            self.register(curated("openai", name, window));
        }

        for (name, window) in [
            ("gemini-3-pro-preview", 2_000_000),
            ("gemini-2.5-pro", 2_000_000),
            ("gemini-2.5-flash", 1_000_000),
            ("gemini-2.5-flash-lite", 1_000_000),
            ("gemini-2.0-flash", 1_000_000),
        ] {
            self.register(curated("gemini", name, window));
        }
    }

    /// Register a descriptor; an existing entry with the same model name is
    /// overwritten.
    pub fn register(&self, descriptor: ModelDescriptor) {
        tracing::debug!("Registered model: {}", descriptor.model_name);
        self.models
            .insert(descriptor.model_name.clone(), descriptor);
    }

    /// Look up a model by name with an optional provider hint.
    ///
    /// Unknown names synthesize a temporary descriptor with conservative
    /// defaults instead of failing, so a new model can be targeted before the
    /// curated list catches up.
    pub fn get(&self, model_name: &str, provider_hint: Option<&str>) -> ModelDescriptor {
        if let Some(descriptor) = self.models.get(model_name) {
            return descriptor.clone();
        }

        tracing::warn!(
            "Model '{}' not found in registry. Creating temporary model definition.",
            model_name
        );

        let provider_name = provider_hint.unwrap_or("unknown").trim().to_lowercase();
        let kind = if provider_name.contains("huggingface") {
            ProviderKind::HuggingFace
        } else {
            ProviderKind::Api
        };

        let style = if model_name.to_lowercase().contains("claude")
            || provider_name.contains("anthropic")
        {
            PromptStyle::Xml
        } else {
            PromptStyle::Markdown
        };

        ModelDescriptor {
            provider: Provider::new(provider_name, kind),
            model_name: model_name.to_string(),
            supports_system_messages: true,
            context_window_size: 8192,
            prompt_style: style,
            supports_json_mode: true,
            prompting_tips: "Be concise.".to_string(),
            metadata: Default::default(),
        }
    }
}

fn curated(provider: &str, model_name: &str, context_window_size: u32) -> ModelDescriptor {
    ModelDescriptor {
        provider: Provider::api(provider),
        model_name: model_name.to_string(),
        supports_system_messages: true,
        context_window_size,
        prompt_style: PromptStyle::Markdown,
        supports_json_mode: true,
        prompting_tips: "Be concise. Use Markdown.".to_string(),
        metadata: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curated_models_resolve_with_their_provider() {
        let registry = ModelRegistry::new();
        let descriptor = registry.get("gemini-2.5-pro", None);
        assert_eq!(descriptor.provider.name, "gemini");
        assert_eq!(descriptor.context_window_size, 2_000_000);
    }

    #[test]
    fn unknown_claude_model_falls_back_to_xml_style() {
        let registry = ModelRegistry::new();
        let descriptor = registry.get("claude-sonnet-4", Some("Anthropic"));
        assert_eq!(descriptor.prompt_style, PromptStyle::Xml);
        assert_eq!(descriptor.provider.name, "anthropic");
        assert_eq!(descriptor.context_window_size, 8192);
    }

    #[test]
    fn huggingface_hint_sets_provider_kind() {
        let registry = ModelRegistry::new();
        let descriptor = registry.get("mistral-7b", Some("huggingface"));
        assert_eq!(descriptor.provider.kind, ProviderKind::HuggingFace);
    }

    #[test]
    fn registration_overwrites_existing_entry() {
        let registry = ModelRegistry::new();
        let mut descriptor = registry.get("gpt-4o", None);
        descriptor.prompting_tips = "Prefer short answers.".to_string();
        registry.register(descriptor);
        assert_eq!(
            registry.get("gpt-4o", None).prompting_tips,
            "Prefer short answers."
        );
    }
}
