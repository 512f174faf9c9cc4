use async_trait::async_trait;

use super::{offline_generate, GenerationRequest, LlmProvider};
use crate::types::ProviderError;

/// OpenAI chat-completions adapter.
#[derive(Debug, Clone, Default)]
pub struct OpenAiProvider;

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        offline_generate(self.name(), request)
    }
}
