//! Mapping from property-set types to Cranelift IR types.
//!
//! Scalars map directly (`Integer` → I64, `Floating` → F64); any pointer
//! depth maps to the 64-bit pointer type, and element addressing is done
//! with explicit byte offsets.

use cranelift_codegen::ir::types::{F64, I64, Type};
use cranelift_codegen::ir::{AbiParam, Signature as AbiSignature};
use cranelift_codegen::isa::CallConv;
use marrow_props::{BaseType, Param, Signature};

pub struct AbiTypes;

impl AbiTypes {
    pub fn pointer_type() -> Type {
        I64
    }

    pub fn base_type(base: BaseType) -> Type {
        match base {
            BaseType::Integer => I64,
            BaseType::Floating => F64,
        }
    }

    /// The ABI type of a formal parameter.
    pub fn param_type(param: &Param) -> Type {
        if param.is_pointer() {
            Self::pointer_type()
        } else {
            Self::base_type(param.base)
        }
    }

    /// The type loaded when indexing one level through a pointer parameter.
    pub fn element_type(param: &Param) -> Type {
        if param.pointer_depth > 1 {
            Self::pointer_type()
        } else {
            Self::base_type(param.base)
        }
    }

    /// Byte stride between consecutive elements. Both scalar types and
    /// pointers are 8 bytes wide.
    pub fn element_size(_param: &Param) -> i64 {
        8
    }

    /// Translate a property-set signature to a Cranelift ABI signature.
    pub fn abi_signature(signature: &Signature) -> AbiSignature {
        let mut sig = AbiSignature::new(CallConv::SystemV);
        for param in &signature.parameters {
            sig.params.push(AbiParam::new(Self::param_type(param)));
        }
        if let Some(ret) = signature.return_type {
            sig.returns.push(AbiParam::new(Self::base_type(ret)));
        }
        sig
    }
}
