//! Rule matching and skeleton enumeration for marrow.
//!
//! This crate discovers which structural templates apply to a
//! [`PropertySet`](marrow_props::PropertySet) (rules, match expressions,
//! unification, validators), instantiates them as [`Fragment`] trees, and
//! enumerates every deduplicated way to compose the matched fragments into a
//! complete candidate skeleton. Lowering a skeleton to IR lives in the
//! backend crate.

pub mod combinatorics;
pub mod enumerate;
pub mod errors;
pub mod fragment;
pub mod matching;
pub mod registry;
pub mod rules;

pub use enumerate::enumerate;
pub use errors::{SynthError, SynthResult};
pub use fragment::{DEFAULT_LINEAR_LEN, Fragment};
pub use matching::{Binding, MatchExpression, MatchResult};
pub use registry::{FragmentRegistry, builtin_rules};
pub use rules::{Rule, Validator};
