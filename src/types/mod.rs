//! Core type definitions for the prompt compiler runtime.

mod errors;
mod ir;
mod models;
mod prompts;

pub use errors::{
    ArchitectureError, CompileError, DecompilationError, EvaluationError, ProviderError,
};
pub use ir::{ExamplePair, IrData, IrMeta, IrSpec, PromptIr};
pub use models::{ModelDescriptor, PromptStyle, Provider, ProviderKind};
pub use prompts::{CandidatePrompt, OriginalPrompt};
