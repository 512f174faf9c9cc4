use async_trait::async_trait;

use super::{offline_generate, GenerationRequest, LlmProvider};
use crate::types::ProviderError;

/// Anthropic messages adapter.
#[derive(Debug, Clone, Default)]
pub struct AnthropicProvider;

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        offline_generate(self.name(), request)
    }
}
