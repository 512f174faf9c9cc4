//! # Prompt Compiler Runtime
//!
//! Iteratively rewrites a prompt authored for one model into an optimized
//! prompt for a different target model using a multi-role feedback loop:
//! establish a baseline, extract an abstract specification, generate
//! candidates, test them, score them, and retry with feedback until a quality
//! threshold is met or the process gives up.
//!
//! ## Roles
//!
//! The pipeline drives five narrow role contracts, each with one default
//! implementation and all injectable:
//!
//! - **Historian** runs the original prompt on its source model to capture a
//!   baseline response.
//! - **Decompiler** reverse-engineers the prompt into a model-agnostic
//!   intermediate representation (intent, tone, constraints, examples).
//! - **Architect** designs a fresh candidate prompt for the target model,
//!   clean-room, optionally steered by judge feedback.
//! - **Pilot** test-flies the candidate; execution failures become an
//!   `ERROR:` marker in the response, never a raised error.
//! - **Judge** scores the candidate against the baseline and leaves a
//!   feedback hint for the next iteration.
//!
//! A pluggable [`scoring::ScoringStrategy`] reduces the judge's component
//! scores to one scalar; the loop tracks the best candidate, applies early
//! stopping on stalled improvement, and short-circuits once the configured
//! threshold is reached.
//!
//! ## Quick start
//!
//! ```no_run
//! use prompt_compiler::{CompileRequest, CompilerConfig, CompilerPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CompilerConfig::default();
//!     let pipeline = CompilerPipeline::new(&config)?;
//!
//!     let request = CompileRequest::new(
//!         "Summarize the movie in three playful bullet points.",
//!         "gpt-4o",
//!         "gemini-2.5-pro",
//!     )
//!     .with_providers("openai", "gemini");
//!
//!     let optimized = pipeline.run(request).await?;
//!     println!("{}", optimized.prompt);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod pipeline;
pub mod providers;
pub mod roles;
pub mod scoring;
pub mod telemetry;
pub mod types;

// Re-exports for convenience
pub use config::{CompilerConfig, RoleConfig, RolesConfig, TelemetryConfig};
pub use pipeline::{CompileRequest, CompilerPipeline, ModelRegistry, PipelineBuilder};
pub use scoring::ScoringStrategy;
pub use types::{
    CandidatePrompt, CompileError, ModelDescriptor, OriginalPrompt, PromptIr, PromptStyle,
    Provider, ProviderKind,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_builds_from_default_config() {
        let config = CompilerConfig::default();
        assert!(CompilerPipeline::new(&config).is_ok());
    }

    #[test]
    fn pipeline_build_fails_on_unknown_role_provider() {
        let mut config = CompilerConfig::default();
        config.roles.judge.provider = "nonexistent".to_string();
        assert!(CompilerPipeline::new(&config).is_err());
    }

    #[tokio::test]
    async fn default_pipeline_compiles_offline() {
        let config = CompilerConfig::default();
        let pipeline = CompilerPipeline::new(&config).unwrap();
        let request =
            CompileRequest::new("Translate greetings to French", "gpt-4o", "gpt-4.1-mini");

        let result = pipeline.run(request).await;
        assert!(result.is_ok());
    }
}
