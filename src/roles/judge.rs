use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RoleConfig;
use crate::providers::{provider_for, GenerationRequest, LlmProvider};
use crate::roles::Judge;
use crate::types::{CandidatePrompt, EvaluationError, OriginalPrompt, ProviderError};

/// LLM-backed judge: compares the candidate's response against the baseline
/// and writes component scores plus a feedback hint into the candidate.
pub struct LlmJudge {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmJudge {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn from_config(config: &RoleConfig) -> Result<Self, ProviderError> {
        let provider = provider_for(&config.provider)?;
        Ok(Self::new(provider, config.model.clone()))
    }

    fn score_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "primary_intent_score": {"type": "number"},
                "tone_voice_score": {"type": "number"},
                "constraint_scores": {
                    "type": "object",
                    "additionalProperties": {"type": "number"}
                },
                "feedback_hint": {"type": "string"}
            },
            "required": [
                "primary_intent_score", "tone_voice_score",
                "constraint_scores", "feedback_hint"
            ]
        })
    }
}

#[derive(Debug, Deserialize)]
struct ScorePayload {
    #[serde(default)]
    primary_intent_score: f64,
    #[serde(default)]
    tone_voice_score: f64,
    #[serde(default)]
    constraint_scores: HashMap<String, f64>,
    #[serde(default)]
    feedback_hint: String,
}

#[async_trait]
impl Judge for LlmJudge {
    /// Runs the evaluation and returns 0.0 (legacy return); the component
    /// scores land on the candidate and the pipeline computes the final
    /// score through its scoring strategy.
    async fn evaluate(
        &self,
        candidate: &mut CandidatePrompt,
        original: &OriginalPrompt,
    ) -> Result<f64, EvaluationError> {
        tracing::info!("Judge evaluating candidate: judge_model={}", self.model);

        let user_prompt = format!(
            "Original Prompt (Context): {}\nBaseline Response: {}\nCandidate Response: {}\n\n\
             Rate the Candidate on scale 0.0 to 1.0 for: Primary Intent, Tone, Constraints.\n\
             Also provide a short constructive hint for the architect to improve the prompt. \
             Do NOT leak the content of the baseline response in the hint.",
            original.prompt,
            original.response.as_deref().unwrap_or(""),
            candidate.response.as_deref().unwrap_or(""),
        );

        let request = GenerationRequest::new(user_prompt, &self.model)
            .with_system(
                "You are a judge. Compare the baseline response and the candidate \
                 response based on the intent.",
            )
            .with_schema(Self::score_schema());

        let raw = match self.provider.generate(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                // Provider failures leave the candidate unscored; only
                // unparseable output is an evaluation error.
                tracing::error!("Judge failed: {}", e);
                return Ok(0.0);
            }
        };

        let payload: ScorePayload = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!("Judge received invalid JSON: {}", e);
            EvaluationError::InvalidJson(e.to_string())
        })?;

        tracing::debug!(
            "Judge scores: intent={} tone={} constraints={}",
            payload.primary_intent_score,
            payload.tone_voice_score,
            payload.constraint_scores.len()
        );

        candidate.primary_intent_score = Some(payload.primary_intent_score);
        candidate.tone_voice_score = Some(payload.tone_voice_score);
        candidate.constraint_scores = Some(payload.constraint_scores);
        candidate.feedback = Some(payload.feedback_hint);

        Ok(0.0)
    }
}
