use async_trait::async_trait;

use super::{offline_generate, GenerationRequest, LlmProvider};
use crate::types::ProviderError;

/// Hugging Face inference adapter.
#[derive(Debug, Clone, Default)]
pub struct HuggingFaceProvider;

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        offline_generate(self.name(), request)
    }
}
