//! Error types for rule matching and fragment instantiation.
//!
//! Only structural contract violations are errors: a combination that simply
//! fails to unify or validate contributes nothing to a rule's results and is
//! never reported. A full subtree rejecting a child is not an error either;
//! [`Fragment::add_child`](crate::Fragment::add_child) hands the child back
//! through its `Err` value instead.

use derive_more::Display;

pub type SynthResult<T> = Result<T, SynthError>;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum SynthError {
    /// A property instance carried a different number of values than the
    /// match expression has bindings. Fatal to the whole rule evaluation.
    #[display("property '{property}' has {actual} values but {expected} bindings")]
    ArityMismatch {
        property: String,
        expected: usize,
        actual: usize,
    },

    /// A rule's required argument name was not bound by any match
    /// expression after unification.
    #[display("required binding '{_0}' was not resolved by any match expression")]
    UnboundVariable(String),

    /// A rule referenced a fragment template that is not registered.
    #[display("no fragment template named '{_0}' is registered")]
    NoSuchTemplate(String),

    /// A registered template was instantiated with an argument list it
    /// cannot accept.
    #[display("template '{template}' cannot be built from arguments [{arguments}]")]
    TemplateArity { template: String, arguments: String },
}

impl std::error::Error for SynthError {}
