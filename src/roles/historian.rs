use async_trait::async_trait;
use chrono::Utc;

use crate::providers::{provider_for, GenerationRequest};
use crate::roles::Historian;
use crate::types::{OriginalPrompt, ProviderError};

/// Standard historian: benchmarks the original prompt on its native model.
///
/// The baseline run is deterministic (temperature 0) so the judge has a
/// stable point of comparison.
#[derive(Debug, Clone, Default)]
pub struct DefaultHistorian;

#[async_trait]
impl Historian for DefaultHistorian {
    async fn establish_baseline(
        &self,
        mut original: OriginalPrompt,
    ) -> Result<OriginalPrompt, ProviderError> {
        tracing::info!(
            "Historian starting baseline run: model={}",
            original.model.model_name
        );

        let provider = provider_for(&original.model.provider.name)
            .map_err(|_| ProviderError::BaselineFailed(original.model.model_name.clone()))?;

        let request = GenerationRequest::new(&original.prompt, &original.model.model_name)
            .with_system("You are a helpful assistant.");

        match provider.generate(&request).await {
            Ok(response) => {
                tracing::info!(
                    "Historian baseline captured: response_length={}",
                    response.len()
                );
                original.response = Some(response);
                original.baselined_at = Some(Utc::now());
                Ok(original)
            }
            Err(e) => {
                tracing::error!("Historian failed to run baseline: {}", e);
                Err(ProviderError::BaselineFailed(
                    original.model.model_name.clone(),
                ))
            }
        }
    }
}
