//! Pipeline orchestration and model resolution.

mod compiler;
mod registry;

pub use compiler::{CompileRequest, CompilerPipeline, PipelineBuilder};
pub use registry::ModelRegistry;
