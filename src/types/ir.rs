//! Model-agnostic intermediate representation of a prompt.
//!
//! The decompiler produces one [`PromptIr`] per run. It is read-only input to
//! every architect call and never mutated after creation.

use crate::types::ModelDescriptor;
use serde::{Deserialize, Serialize};

/// One few-shot input/output pair preserved from the original prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub input: String,
    pub output: String,
}

/// Source/target binding for an IR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrMeta {
    pub source_model: ModelDescriptor,
    pub target_model: ModelDescriptor,
}

/// The extracted specification itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrSpec {
    /// Core goal of the prompt.
    pub primary_intent: String,
    /// Desired tone and voice of the response.
    pub tone_voice: String,
    /// Domain the prompt operates in.
    pub domain_context: String,
    /// Ordered hard constraints on the response.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Expected input format.
    pub input_format: String,
    /// Expected output schema or shape.
    pub output_schema: String,
}

/// Examples and other data payload extracted alongside the spec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IrData {
    #[serde(default)]
    pub few_shot_examples: Vec<ExamplePair>,
}

/// Complete intermediate representation handed to the architect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptIr {
    pub meta: IrMeta,
    pub spec: IrSpec,
    pub data: IrData,
}
