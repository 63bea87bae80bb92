//! Property-set data model for marrow.
//!
//! A [`PropertySet`] is the already-parsed specification of the function to
//! synthesize: a typed signature plus a bag of named behavioral hints
//! (properties). Parsing the textual property format is a separate concern;
//! this crate only defines the shapes the matcher and the lowering consume.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal or parameter reference carried by a property instance or bound
/// to a match variable.
///
/// Equality is variant-aware: values of different variants never compare
/// equal, and floats compare by IEEE equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    /// Reference to a signature parameter by name.
    Param(String),
    Str(String),
}

impl Value {
    pub fn param(name: impl Into<String>) -> Self {
        Value::Param(name.into())
    }

    pub fn is_param(&self) -> bool {
        matches!(self, Value::Param(_))
    }

    /// The referenced parameter name, if this value is a parameter reference.
    pub fn as_param(&self) -> Option<&str> {
        match self {
            Value::Param(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Param(name) => write!(f, "{name}"),
            Value::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Scalar base type of a parameter, before pointer indirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseType {
    Integer,
    Floating,
}

/// A single formal parameter of the target signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub base: BaseType,
    /// Zero for scalars; each level adds one indirection.
    pub pointer_depth: u8,
}

impl Param {
    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }
}

/// The signature of the function under synthesis.
///
/// Parameter names are unique within a signature; the upstream parser
/// validates this, so lookups return the first (only) match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub return_type: Option<BaseType>,
    pub parameters: Vec<Param>,
}

impl Signature {
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// One named behavioral hint with an ordered argument list, e.g.
/// `size(ptr, sz)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub values: Vec<Value>,
}

/// The full, immutable input to the synthesis engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    pub signature: Signature,
    pub properties: Vec<Property>,
}
