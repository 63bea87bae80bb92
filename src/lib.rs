//! Property-guided kernel synthesis.
//!
//! Given a target signature and a set of extracted properties, this crate
//! matches structural rules against the properties, enumerates candidate
//! program skeletons, and lowers them to native code through Cranelift.
//!
//! The pipeline is split across three member crates:
//! [`marrow_props`] holds the parsed signature and property model,
//! [`marrow_synth`] does rule matching and candidate enumeration, and
//! [`marrow_cranelift`] lowers candidates to object code. The
//! [`Synthesizer`] here ties the stages together.

mod synthesizer;

pub use marrow_cranelift::{CandidateCompiler, CompilationError, CompiledCandidate};
pub use marrow_props::{BaseType, Param, Property, PropertySet, Signature, Value};
pub use marrow_synth::{Fragment, Rule, SynthError, Validator};
pub use synthesizer::{SynthOptions, Synthesizer};
