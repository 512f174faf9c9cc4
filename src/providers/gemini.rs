use async_trait::async_trait;

use super::{offline_generate, GenerationRequest, LlmProvider};
use crate::types::ProviderError;

/// Google Gemini adapter.
#[derive(Debug, Clone, Default)]
pub struct GeminiProvider;

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        offline_generate(self.name(), request)
    }
}
