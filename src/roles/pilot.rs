use async_trait::async_trait;

use crate::providers::{provider_for, GenerationRequest};
use crate::roles::Pilot;
use crate::types::CandidatePrompt;

/// Standard pilot: test-flies a candidate against its target model.
///
/// Execution failures are absorbed into the candidate's response as an
/// `ERROR:` marker so the judge can still score the attempt.
#[derive(Debug, Clone, Default)]
pub struct DefaultPilot;

#[async_trait]
impl Pilot for DefaultPilot {
    async fn test_candidate(&self, mut candidate: CandidatePrompt) -> CandidatePrompt {
        tracing::info!(
            "Pilot testing candidate: model={}",
            candidate.model.model_name
        );

        let provider = match provider_for(&candidate.model.provider.name) {
            Ok(provider) => provider,
            Err(e) => {
                tracing::error!("Pilot failed: {}", e);
                candidate.response = Some(format!("ERROR: Execution failed. {}", e));
                return candidate;
            }
        };

        let request = GenerationRequest::new(&candidate.prompt, &candidate.model.model_name)
            .with_system("You are a helpful assistant.");

        match provider.generate(&request).await {
            Ok(response) => {
                tracing::info!("Pilot test complete: response_length={}", response.len());
                candidate.response = Some(response);
            }
            Err(e) => {
                tracing::error!("Pilot failed: {}", e);
                candidate.response = Some(format!("ERROR: Execution failed. {}", e));
            }
        }

        candidate
    }
}
