use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::config::RoleConfig;
use crate::providers::{provider_for, GenerationRequest, LlmProvider};
use crate::roles::Architect;
use crate::types::{ArchitectureError, CandidatePrompt, ModelDescriptor, PromptIr};

/// LLM-backed architect: synthesizes a candidate prompt for the target model
/// from the IR, clean-room style (it never sees the original prompt).
pub struct LlmArchitect {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmArchitect {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn from_config(config: &RoleConfig) -> Result<Self, ArchitectureError> {
        let provider = provider_for(&config.provider)?;
        Ok(Self::new(provider, config.model.clone()))
    }

    fn spec_text(ir: &PromptIr) -> String {
        let spec = &ir.spec;
        format!(
            "Primary Intent: {}\nTone/Voice: {}\nDomain: {}\nConstraints: {}\nInput Format: {}\nOutput Schema: {}\n",
            spec.primary_intent,
            spec.tone_voice,
            spec.domain_context,
            serde_json::to_string(&spec.constraints).unwrap_or_default(),
            spec.input_format,
            spec.output_schema,
        )
    }

    fn examples_text(ir: &PromptIr) -> String {
        if ir.data.few_shot_examples.is_empty() {
            return String::new();
        }

        let mut text = String::from("Few-Shot Examples:\n");
        for example in &ir.data.few_shot_examples {
            let _ = writeln!(text, "Input: {}\nOutput: {}", example.input, example.output);
        }
        text
    }
}

#[async_trait]
impl Architect for LlmArchitect {
    async fn design_prompt(
        &self,
        ir: &PromptIr,
        target: &ModelDescriptor,
        feedback: Option<&str>,
    ) -> Result<CandidatePrompt, ArchitectureError> {
        tracing::info!(
            "Architect designing prompt: target_model={} architect_model={}",
            target.model_name,
            self.model
        );

        let system_prompt = format!(
            "You are a prompt architect. Write a highly optimized system prompt \
             for the model '{}'.\nModel prompting tips: {}\nTarget prompt style: {}\n\
             Do NOT look at the original prompt (clean room). Use ONLY the provided specification.",
            target.model_name, target.prompting_tips, target.prompt_style,
        );

        let feedback_text = match feedback {
            Some(hint) if !hint.is_empty() => format!(
                "\n\nCRITICAL FEEDBACK FROM PREVIOUS ITERATION:\n{}\nAddress this feedback in your new design.",
                hint
            ),
            _ => String::new(),
        };

        let user_prompt = format!(
            "Specification:\n{}\n{}{}\n\nWrite the optimized prompt:",
            Self::spec_text(ir),
            Self::examples_text(ir),
            feedback_text,
        );

        let request = GenerationRequest::new(user_prompt, &self.model)
            .with_system(system_prompt)
            .with_temperature(0.7);

        let response_text = self.provider.generate(&request).await?;
        tracing::debug!("Architect generated prompt: length={}", response_text.len());

        Ok(CandidatePrompt::new(response_text, target.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::OpenAiProvider;
    use crate::types::{ExamplePair, IrData, IrMeta, IrSpec, ModelDescriptor};

    fn ir(target: &ModelDescriptor) -> PromptIr {
        PromptIr {
            meta: IrMeta {
                source_model: ModelDescriptor::api_default("openai", "gpt-4o"),
                target_model: target.clone(),
            },
            spec: IrSpec {
                primary_intent: "Summarize movies".to_string(),
                tone_voice: "Playful".to_string(),
                domain_context: "Cinema".to_string(),
                constraints: vec!["Emojis only".to_string()],
                input_format: "movie title".to_string(),
                output_schema: "plain text".to_string(),
            },
            data: IrData {
                few_shot_examples: vec![ExamplePair {
                    input: "Fight Club".to_string(),
                    output: "🤜🧼".to_string(),
                }],
            },
        }
    }

    #[tokio::test]
    async fn designs_fresh_candidate_for_target() {
        let target = ModelDescriptor::api_default("gemini", "gemini-2.5-pro");
        let architect = LlmArchitect::new(Arc::new(OpenAiProvider), "gpt-4.1");

        let candidate = architect.design_prompt(&ir(&target), &target, None).await.unwrap();
        assert_eq!(candidate.model.model_name, "gemini-2.5-pro");
        assert!(candidate.primary_intent_score.is_none());
        assert!(candidate.response.is_none());
    }

    #[tokio::test]
    async fn consecutive_designs_are_distinct_records() {
        let target = ModelDescriptor::api_default("gemini", "gemini-2.5-pro");
        let architect = LlmArchitect::new(Arc::new(OpenAiProvider), "gpt-4.1");

        let first = architect.design_prompt(&ir(&target), &target, None).await.unwrap();
        let second = architect
            .design_prompt(&ir(&target), &target, Some("tighten the constraints"))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
    }
}
