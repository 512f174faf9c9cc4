//! Model and provider descriptors.
//!
//! A [`ModelDescriptor`] captures everything the compiler needs to know about
//! a concrete model: who serves it, how large its context is, and which
//! prompting style it responds to best. Descriptors are resolved through the
//! registry before a run starts and are read-only afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// How a provider is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Hosted HTTP API (OpenAI, Gemini, Anthropic).
    Api,
    /// Hugging Face hosted or local models.
    #[serde(rename = "huggingface")]
    HuggingFace,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderKind::Api => "api",
            ProviderKind::HuggingFace => "huggingface",
        };
        write!(f, "{}", name)
    }
}

/// Prompting dialect a model responds to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Markdown sections (OpenAI / Gemini).
    Markdown,
    /// XML instruction tags (Anthropic).
    Xml,
    /// Plain text, no structure (older HF models).
    Plain,
}

impl std::fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PromptStyle::Markdown => "markdown",
            PromptStyle::Xml => "xml",
            PromptStyle::Plain => "plain",
        };
        write!(f, "{}", name)
    }
}

/// A model provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Provider identifier, lowercase ("openai", "gemini", "anthropic").
    pub name: String,
    /// Transport kind.
    pub kind: ProviderKind,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Provider {
    pub fn new(name: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            name: name.into(),
            kind,
            metadata: HashMap::new(),
        }
    }

    /// Hosted API provider shorthand.
    pub fn api(name: impl Into<String>) -> Self {
        Self::new(name, ProviderKind::Api)
    }
}

/// Full description of a model the compiler can source from or target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub provider: Provider,
    pub model_name: String,
    pub supports_system_messages: bool,
    pub context_window_size: u32,
    pub prompt_style: PromptStyle,
    pub supports_json_mode: bool,
    /// Provider-published guidance folded into architect prompts.
    pub prompting_tips: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl ModelDescriptor {
    /// Descriptor with conservative defaults for an API model.
    pub fn api_default(provider_name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            provider: Provider::api(provider_name),
            model_name: model_name.into(),
            supports_system_messages: true,
            context_window_size: 8192,
            prompt_style: PromptStyle::Markdown,
            supports_json_mode: true,
            prompting_tips: "Be concise.".to_string(),
            metadata: HashMap::new(),
        }
    }
}
