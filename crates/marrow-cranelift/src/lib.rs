//! Cranelift backend for candidate skeletons.
//!
//! This crate lowers fragment skeletons to Cranelift IR and emits them as
//! native object files. Each fragment variant maps to a control-flow shape:
//! empty fragments to a plain jump, linear fragments to one data region,
//! and the loop variants to a counting loop with the iteration count as a
//! region parameter.

mod compiler;
mod context;
mod errors;
mod types;

pub use compiler::CandidateCompiler;
pub use context::{compile_candidate, CompileContext, CompileMetadata, CompiledCandidate};
pub use errors::{CompilationError, CompilationResult};
pub use types::AbiTypes;

#[cfg(test)]
mod tests;
