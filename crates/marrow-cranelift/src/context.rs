//! Compile context and the recursive splice lowering.
//!
//! One context exists per candidate compilation. It owns the function under
//! construction (through a `FunctionBuilder`), knows the entry and exit
//! regions, and accumulates lowering metadata: seed values produced along
//! the way, live loop induction variables, data-block regions, and output
//! locations.

use std::collections::HashSet;

use cranelift_codegen::ir::condcodes::IntCC;
use cranelift_codegen::ir::types::I64;
use cranelift_codegen::ir::{self, BlockArg, InstBuilder, MemFlags, UserFuncName};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use marrow_props::{BaseType, Signature, Value};
use marrow_synth::Fragment;

use crate::errors::CompilationResult;
use crate::types::AbiTypes;

/// Values and regions produced while lowering one candidate.
#[derive(Debug, Default)]
pub struct CompileMetadata {
    /// Data generated during lowering, available for later composition.
    pub seeds: HashSet<ir::Value>,
    /// Loop induction variables live at the current splice point. Empty
    /// again once the top-level splice returns.
    pub indices: HashSet<ir::Value>,
    /// Regions created by `linear` fragments.
    pub data_blocks: HashSet<ir::Block>,
    /// Addresses meant to be written as the function's observable results.
    pub outputs: HashSet<ir::Value>,
}

/// A fully lowered candidate: the constructed function plus the metadata
/// accumulated while splicing it.
pub struct CompiledCandidate {
    pub function: ir::Function,
    pub metadata: CompileMetadata,
}

/// Lower a candidate skeleton to a Cranelift function.
///
/// The function gets the signature's declared parameters, an entry region,
/// and an exit region terminated by a default (zero-valued or void) return;
/// the fragment is spliced between the two.
pub fn compile_candidate(
    fragment: &Fragment,
    signature: &Signature,
) -> CompilationResult<CompiledCandidate> {
    let abi = AbiTypes::abi_signature(signature);
    let mut function = ir::Function::with_name_signature(UserFuncName::user(0, 0), abi);
    let mut builder_ctx = FunctionBuilderContext::new();

    let metadata = {
        let builder = FunctionBuilder::new(&mut function, &mut builder_ctx);
        let mut ctx = CompileContext::new(builder, signature);
        let (entry, exit) = (ctx.entry, ctx.exit);
        ctx.splice(fragment, entry, exit);
        ctx.finish()
    };

    Ok(CompiledCandidate { function, metadata })
}

pub struct CompileContext<'a> {
    builder: FunctionBuilder<'a>,
    signature: &'a Signature,
    entry: ir::Block,
    exit: ir::Block,
    pub metadata: CompileMetadata,
}

impl<'a> CompileContext<'a> {
    pub fn new(mut builder: FunctionBuilder<'a>, signature: &'a Signature) -> Self {
        let entry = builder.create_block();
        builder.append_block_params_for_function_params(entry);
        let exit = builder.create_block();
        CompileContext {
            builder,
            signature,
            entry,
            exit,
            metadata: CompileMetadata::default(),
        }
    }

    pub fn entry_block(&self) -> ir::Block {
        self.entry
    }

    pub fn exit_block(&self) -> ir::Block {
        self.exit
    }

    /// The formal argument for a signature parameter name. An unknown name
    /// is a programmer error: rules can only bind names taken from the
    /// signature.
    pub fn argument(&self, name: &str) -> ir::Value {
        let Some(index) = self.signature.param_index(name) else {
            panic!("no parameter named '{name}' in signature '{}'", self.signature.name);
        };
        self.builder.block_params(self.entry)[index]
    }

    /// Materialize a construction argument in the current region.
    fn resolve(&mut self, value: &Value) -> ir::Value {
        match value {
            Value::Param(name) => self.argument(name),
            Value::Int(i) => self.builder.ins().iconst(I64, *i),
            Value::Float(x) => self.builder.ins().f64const(*x),
            Value::Str(s) => panic!("string literal \"{s}\" cannot be lowered"),
        }
    }

    /// Move the insertion point, tolerating re-entry into the block that is
    /// already current (a body splice continues the pre-body region its
    /// parent loop started).
    fn enter(&mut self, block: ir::Block) {
        if self.builder.current_block() != Some(block) {
            self.builder.switch_to_block(block);
        }
    }

    /// Recursively lower `fragment` between two regions. On return, every
    /// region created underneath is terminated and control flows from
    /// `entry` to `exit`.
    pub fn splice(&mut self, fragment: &Fragment, entry: ir::Block, exit: ir::Block) {
        match fragment {
            Fragment::Empty => {
                self.enter(entry);
                self.builder.ins().jump(exit, &[]);
            }
            Fragment::Linear { length } => self.splice_linear(*length, entry, exit),
            Fragment::LoopToN {
                bound,
                before,
                body,
                after,
            } => self.splice_loop(bound, &[], false, before, body, after, entry, exit),
            Fragment::RegularLoop {
                size,
                pointers,
                output,
                before,
                body,
                after,
            } => self.splice_loop(size, pointers, *output, before, body, after, entry, exit),
        }
    }

    /// An unfilled hole lowers as an empty fragment.
    fn splice_slot(
        &mut self,
        slot: &Option<Box<Fragment>>,
        entry: ir::Block,
        exit: ir::Block,
    ) {
        match slot {
            Some(child) => self.splice(child, entry, exit),
            None => self.splice(&Fragment::Empty, entry, exit),
        }
    }

    /// One interior region holding `length` generated operations whose
    /// results become seeds.
    fn splice_linear(&mut self, length: usize, entry: ir::Block, exit: ir::Block) {
        let region = self.builder.create_block();
        self.enter(entry);
        self.builder.ins().jump(region, &[]);

        self.enter(region);
        for i in 0..length {
            let seed = self.builder.ins().iconst(I64, i as i64);
            self.metadata.seeds.insert(seed);
        }
        self.metadata.data_blocks.insert(region);
        self.builder.ins().jump(exit, &[]);
    }

    /// A counting loop from zero to `bound`, shared by `loopToN` (no
    /// pointers) and the regular/output loops.
    ///
    /// Shape: `before` runs between `entry` and the loop header; the header
    /// carries the induction variable as a block parameter, guarded by a
    /// signed less-than compare; the body is spliced between a pre-body and
    /// a post-body region (the post-body increments and loops back);
    /// `after` runs from loop exit to `exit`.
    #[allow(clippy::too_many_arguments)]
    fn splice_loop(
        &mut self,
        bound: &Value,
        pointers: &[Value],
        output: bool,
        before: &Option<Box<Fragment>>,
        body: &Option<Box<Fragment>>,
        after: &Option<Box<Fragment>>,
        entry: ir::Block,
        exit: ir::Block,
    ) {
        let pre_loop = self.builder.create_block();
        let post_loop = self.builder.create_block();
        self.splice_slot(before, entry, pre_loop);

        let header = self.builder.create_block();
        let iter = self.builder.append_block_param(header, I64);
        let pre_body = self.builder.create_block();
        let post_body = self.builder.create_block();

        self.enter(pre_loop);
        let bound_val = self.resolve(bound);
        let zero = self.builder.ins().iconst(I64, 0);
        self.builder.ins().jump(header, &[BlockArg::from(zero)]);

        self.enter(header);
        let keep_going = self.builder.ins().icmp(IntCC::SignedLessThan, iter, bound_val);
        self.builder
            .ins()
            .brif(keep_going, pre_body, &[], post_loop, &[]);

        self.metadata.indices.insert(iter);

        // The post-body must be filled before instructions are appended to
        // the still-open pre-body.
        self.enter(post_body);
        let next = self.builder.ins().iadd_imm(iter, 1);
        if output {
            for pointer in pointers {
                let address = self.element_address(pointer, iter);
                self.metadata.outputs.insert(address);
            }
        }
        self.builder.ins().jump(header, &[BlockArg::from(next)]);

        if !output {
            self.enter(pre_body);
            for pointer in pointers {
                let address = self.element_address(pointer, iter);
                let param = self
                    .signature
                    .param(pointer.as_param().unwrap_or_default())
                    .map(AbiTypes::element_type)
                    .unwrap_or(I64);
                let loaded = self.builder.ins().load(param, MemFlags::new(), address, 0);
                self.metadata.seeds.insert(loaded);
            }
        }

        self.splice_slot(body, pre_body, post_body);

        self.metadata.indices.remove(&iter);
        self.splice_slot(after, post_loop, exit);
    }

    /// Address of the `index`-th element behind a pointer parameter.
    fn element_address(&mut self, pointer: &Value, index: ir::Value) -> ir::Value {
        let Some(name) = pointer.as_param() else {
            panic!("loop pointer argument must be a parameter reference, got {pointer}");
        };
        let stride = self
            .signature
            .param(name)
            .map(AbiTypes::element_size)
            .unwrap_or(8);
        let base = self.argument(name);
        let offset = self.builder.ins().imul_imm(index, stride);
        self.builder.ins().iadd(base, offset)
    }

    /// Terminate the exit region with a default return, then seal and
    /// finalize the function. The live-index set is expected to be empty
    /// again once the top-level splice has returned.
    pub fn finish(mut self) -> CompileMetadata {
        debug_assert!(self.metadata.indices.is_empty());

        self.enter(self.exit);
        match self.signature.return_type {
            None => {
                self.builder.ins().return_(&[]);
            }
            Some(BaseType::Integer) => {
                let zero = self.builder.ins().iconst(I64, 0);
                self.builder.ins().return_(&[zero]);
            }
            Some(BaseType::Floating) => {
                let zero = self.builder.ins().f64const(0.0);
                self.builder.ins().return_(&[zero]);
            }
        }

        self.builder.seal_all_blocks();
        self.builder.finalize();
        self.metadata
    }
}
