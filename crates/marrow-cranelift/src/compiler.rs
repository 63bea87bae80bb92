//! Object-file emission for lowered candidates.

use cranelift_codegen::settings::{self, Configurable};
use cranelift_module::{Linkage, Module};
use cranelift_object::{ObjectBuilder, ObjectModule};
use target_lexicon::Triple;

use crate::context::CompiledCandidate;
use crate::errors::CompilationResult;

/// Collects compiled candidates into a native object file.
pub struct CandidateCompiler {
    module: ObjectModule,
}

impl CandidateCompiler {
    /// Create a compiler for the given target, or the host if unspecified.
    pub fn new(target: Option<Triple>) -> CompilationResult<Self> {
        let target = target.unwrap_or_else(Triple::host);

        let mut flag_builder = settings::builder();
        flag_builder.set("use_colocated_libcalls", "false")?;
        flag_builder.set("is_pic", "false")?;

        let isa = cranelift_codegen::isa::lookup(target)?
            .finish(settings::Flags::new(flag_builder))?;

        let object_builder = ObjectBuilder::new(
            isa,
            format!("marrow_{}", std::process::id()),
            cranelift_module::default_libcall_names(),
        )?;

        Ok(CandidateCompiler {
            module: ObjectModule::new(object_builder),
        })
    }

    /// Declare and define one candidate under the given symbol name.
    pub fn define_candidate(
        &mut self,
        name: &str,
        candidate: &CompiledCandidate,
    ) -> CompilationResult<()> {
        let id =
            self.module
                .declare_function(name, Linkage::Export, &candidate.function.signature)?;

        let mut ctx = self.module.make_context();
        ctx.func = candidate.function.clone();
        self.module.define_function(id, &mut ctx)?;
        self.module.clear_context(&mut ctx);
        Ok(())
    }

    /// Finish the module and emit the object file bytes.
    pub fn finish(self) -> CompilationResult<Vec<u8>> {
        let object = self.module.finish();
        Ok(object.emit()?)
    }
}
