use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::RoleConfig;
use crate::providers::{extract_first_json_object, provider_for, GenerationRequest, LlmProvider};
use crate::roles::Decompiler;
use crate::types::{
    DecompilationError, ExamplePair, IrData, IrMeta, IrSpec, ModelDescriptor, OriginalPrompt,
    PromptIr,
};

/// LLM-backed decompiler: reverse-engineers an original prompt into a
/// structured, model-agnostic IR via schema-constrained generation.
pub struct LlmDecompiler {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmDecompiler {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn from_config(config: &RoleConfig) -> Result<Self, DecompilationError> {
        let provider = provider_for(&config.provider)?;
        Ok(Self::new(provider, config.model.clone()))
    }

    fn system_prompt() -> &'static str {
        "You are an expert LLM decompiler. Convert the raw prompt into a \
         model-agnostic intermediate representation. Distinguish an abstract \
         template ('write a prompt to summarize movies') from a concrete \
         payload ('summarize Fight Club'): concrete entities are context, not \
         variables, and belong in the intent or domain fields. Respond with \
         JSON only."
    }

    fn ir_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "primary_intent": {"type": "string"},
                "tone_voice": {"type": "string"},
                "domain_context": {"type": "string"},
                "constraints": {"type": "array", "items": {"type": "string"}},
                "input_format": {"type": "string"},
                "output_schema": {"type": "string"},
                "few_shot_examples": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "input": {"type": "string"},
                            "output": {"type": "string"}
                        },
                        "required": ["input", "output"]
                    }
                }
            },
            "required": [
                "primary_intent", "tone_voice", "domain_context",
                "constraints", "input_format", "output_schema",
                "few_shot_examples"
            ]
        })
    }
}

#[derive(Debug, Deserialize)]
struct IrPayload {
    primary_intent: String,
    tone_voice: String,
    domain_context: String,
    #[serde(default)]
    constraints: Vec<String>,
    input_format: String,
    output_schema: String,
    #[serde(default)]
    few_shot_examples: Vec<ExamplePair>,
}

#[async_trait]
impl Decompiler for LlmDecompiler {
    async fn decompile(
        &self,
        original: &OriginalPrompt,
        target: &ModelDescriptor,
    ) -> Result<PromptIr, DecompilationError> {
        tracing::info!("Decompiler starting analysis: decompiler_model={}", self.model);

        let request = GenerationRequest::new(
            format!(
                "Analyze this prompt and extract the specification:\n\n{}",
                original.prompt
            ),
            &self.model,
        )
        .with_system(Self::system_prompt())
        .with_schema(Self::ir_schema());

        let raw = self.provider.generate(&request).await?;

        // Strict parse first, then a repair pass over the first embedded
        // JSON object for models that wrap their output in prose.
        let payload: IrPayload = match serde_json::from_str(&raw) {
            Ok(payload) => payload,
            Err(e) => match extract_first_json_object(&raw) {
                Some(inner) => serde_json::from_str(&inner)
                    .map_err(|e| DecompilationError::InvalidJson(e.to_string()))?,
                None => return Err(DecompilationError::InvalidJson(e.to_string())),
            },
        };

        tracing::debug!(
            "Decompiler extracted IR: intent='{}' constraints={}",
            payload.primary_intent,
            payload.constraints.len()
        );

        Ok(PromptIr {
            meta: IrMeta {
                source_model: original.model.clone(),
                target_model: target.clone(),
            },
            spec: IrSpec {
                primary_intent: payload.primary_intent,
                tone_voice: payload.tone_voice,
                domain_context: payload.domain_context,
                constraints: payload.constraints,
                input_format: payload.input_format,
                output_schema: payload.output_schema,
            },
            data: IrData {
                few_shot_examples: payload.few_shot_examples,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::OpenAiProvider;
    use crate::types::ModelDescriptor;

    fn decompiler() -> LlmDecompiler {
        LlmDecompiler::new(Arc::new(OpenAiProvider), "gpt-4.1")
    }

    #[tokio::test]
    async fn offline_decompile_yields_complete_ir() {
        let original = OriginalPrompt::new(
            "Summarize movies in three bullet points",
            ModelDescriptor::api_default("openai", "gpt-4o"),
        );
        let target = ModelDescriptor::api_default("gemini", "gemini-2.5-pro");

        let ir = decompiler().decompile(&original, &target).await.unwrap();
        assert_eq!(ir.meta.target_model.model_name, "gemini-2.5-pro");
        assert!(!ir.spec.primary_intent.is_empty());
        assert!(ir.data.few_shot_examples.is_empty());
    }

    #[tokio::test]
    async fn ir_is_recovered_from_prose_wrapped_json() {
        let provider = Arc::new(OpenAiProvider);
        let decompiler = LlmDecompiler::new(provider.clone(), "gpt-4.1");
        let original = OriginalPrompt::new(
            "translate to French",
            ModelDescriptor::api_default("openai", "gpt-4o"),
        );
        let target = ModelDescriptor::api_default("openai", "gpt-4o");

        // Drive the provider with a wrapped payload through the override.
        let wrapped = r#"Here is the IR: {"primary_intent":"translate","tone_voice":"neutral","domain_context":"language","constraints":["French only"],"input_format":"text","output_schema":"text","few_shot_examples":[]} hope that helps"#;
        let mut request = GenerationRequest::new("x", "gpt-4.1");
        request.raw_response_override = Some(wrapped.to_string());
        let raw = provider.generate(&request).await.unwrap();
        assert!(serde_json::from_str::<IrPayload>(&raw).is_err());
        let inner = extract_first_json_object(&raw).unwrap();
        let payload: IrPayload = serde_json::from_str(&inner).unwrap();
        assert_eq!(payload.constraints, vec!["French only".to_string()]);

        // And the full role path still succeeds offline.
        assert!(decompiler.decompile(&original, &target).await.is_ok());
    }
}
