//! Error types for the prompt compiler runtime.

use thiserror::Error;

/// Provider transport or generation failures.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),

    #[error("Generation failed on {provider}/{model}: {reason}")]
    GenerationFailed {
        provider: String,
        model: String,
        reason: String,
    },

    #[error("Failed to get baseline from {0}")]
    BaselineFailed(String),
}

/// Decompiler failures extracting a valid IR.
#[derive(Debug, Error)]
pub enum DecompilationError {
    #[error("Decompiler output was not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Decompiler failed during generation")]
    Provider(#[from] ProviderError),
}

/// Architect failures generating a candidate.
#[derive(Debug, Error)]
pub enum ArchitectureError {
    #[error("Architect failed to generate prompt")]
    Provider(#[from] ProviderError),
}

/// Judge failures evaluating a candidate.
///
/// Raised only when the judge output cannot be parsed at all; other judge
/// failures are swallowed and leave the candidate unscored.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Judge returned invalid JSON: {0}")]
    InvalidJson(String),
}

/// Top-level failure of one compilation run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Raw prompt must not be empty")]
    EmptyPrompt,

    #[error("Invalid compiler configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Baseline(#[from] ProviderError),

    #[error(transparent)]
    Decompilation(#[from] DecompilationError),

    #[error(transparent)]
    Architecture(#[from] ArchitectureError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("Pipeline failed to generate any candidate prompt")]
    NoCandidate,
}
