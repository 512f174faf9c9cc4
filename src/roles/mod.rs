//! Role contracts and their default implementations.
//!
//! The pipeline drives five narrow roles: the historian establishes a
//! baseline, the decompiler extracts the IR, the architect designs
//! candidates, the pilot test-flies them, and the judge scores them. Each is
//! a trait with exactly one default implementation so alternate backends and
//! test doubles can be injected without touching the loop.

mod architect;
mod decompiler;
mod historian;
mod judge;
mod pilot;

pub use architect::LlmArchitect;
pub use decompiler::LlmDecompiler;
pub use historian::DefaultHistorian;
pub use judge::LlmJudge;
pub use pilot::DefaultPilot;

use crate::types::{
    ArchitectureError, CandidatePrompt, DecompilationError, EvaluationError, ModelDescriptor,
    OriginalPrompt, PromptIr, ProviderError,
};
use async_trait::async_trait;

/// Runs the original prompt against its source model to capture a baseline.
///
/// Takes and returns ownership of the record; failure is fatal to the run.
#[async_trait]
pub trait Historian: Send + Sync {
    async fn establish_baseline(
        &self,
        original: OriginalPrompt,
    ) -> Result<OriginalPrompt, ProviderError>;
}

/// Reverse-engineers the original prompt into a model-agnostic IR.
#[async_trait]
pub trait Decompiler: Send + Sync {
    async fn decompile(
        &self,
        original: &OriginalPrompt,
        target: &ModelDescriptor,
    ) -> Result<PromptIr, DecompilationError>;
}

/// Synthesizes a candidate prompt for the target model from the IR,
/// optionally steered by the previous iteration's judge feedback.
#[async_trait]
pub trait Architect: Send + Sync {
    async fn design_prompt(
        &self,
        ir: &PromptIr,
        target: &ModelDescriptor,
        feedback: Option<&str>,
    ) -> Result<CandidatePrompt, ArchitectureError>;
}

/// Executes a candidate against the target model.
///
/// Never fails to the caller: an execution failure is written into the
/// candidate's response as an `ERROR:` marker so the judge can still run.
#[async_trait]
pub trait Pilot: Send + Sync {
    async fn test_candidate(&self, candidate: CandidatePrompt) -> CandidatePrompt;
}

/// Scores a candidate against the baselined original.
///
/// Mutates the candidate's component scores and feedback in place and returns
/// a legacy placeholder value; the pipeline computes the final score through
/// the scoring strategy.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn evaluate(
        &self,
        candidate: &mut CandidatePrompt,
        original: &OriginalPrompt,
    ) -> Result<f64, EvaluationError>;
}
