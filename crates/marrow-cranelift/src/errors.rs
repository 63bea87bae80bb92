//! Error types for candidate compilation.

use derive_more::{Display, From};

pub type CompilationResult<T> = Result<T, CompilationError>;

#[derive(Debug, Display, From)]
pub enum CompilationError {
    #[display("module error: {_0}")]
    Module(cranelift_module::ModuleError),

    #[display("code generation error: {_0}")]
    Codegen(cranelift_codegen::CodegenError),

    #[display("invalid target: {_0}")]
    InvalidTarget(cranelift_codegen::isa::LookupError),

    #[display("settings error: {_0}")]
    Settings(cranelift_codegen::settings::SetError),

    #[display("object generation failed: {_0}")]
    Object(object::write::Error),
}

impl std::error::Error for CompilationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompilationError::Module(e) => Some(e),
            CompilationError::Codegen(e) => Some(e),
            CompilationError::InvalidTarget(e) => Some(e),
            CompilationError::Settings(e) => Some(e),
            CompilationError::Object(e) => Some(e),
        }
    }
}
