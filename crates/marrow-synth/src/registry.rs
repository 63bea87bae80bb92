//! Explicit registries for fragment templates and built-in rules.
//!
//! Both are plain values constructed at startup and passed by reference into
//! matching; there is no ambient global state.

use std::collections::HashMap;

use marrow_props::Value;

use crate::errors::{SynthError, SynthResult};
use crate::fragment::{DEFAULT_LINEAR_LEN, Fragment};
use crate::matching::{Binding, MatchExpression};
use crate::rules::{Rule, Validator};

type TemplateFn = fn(Vec<Value>) -> SynthResult<Fragment>;

/// Maps fragment-template names to constructors taking the resolved rule
/// arguments.
pub struct FragmentRegistry {
    templates: HashMap<String, TemplateFn>,
}

impl FragmentRegistry {
    pub fn new() -> Self {
        FragmentRegistry {
            templates: HashMap::new(),
        }
    }

    /// A registry holding the built-in templates: `empty`, `linear`,
    /// `loopToN`, `regularLoop` and `outputLoop`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("empty", make_empty);
        registry.register("linear", make_linear);
        registry.register("loopToN", make_loop_to_n);
        registry.register("regularLoop", make_regular_loop);
        registry.register("outputLoop", make_output_loop);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, template: TemplateFn) {
        self.templates.insert(name.into(), template);
    }

    /// Instantiate a template by name. An unknown name is a configuration
    /// error, not a failed match.
    pub fn instantiate(&self, name: &str, args: Vec<Value>) -> SynthResult<Fragment> {
        match self.templates.get(name) {
            Some(template) => template(args),
            None => Err(SynthError::NoSuchTemplate(name.to_string())),
        }
    }
}

impl Default for FragmentRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn arity_error(template: &str, args: &[Value]) -> SynthError {
    SynthError::TemplateArity {
        template: template.to_string(),
        arguments: args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// A loop bound or size: a parameter reference or an integer literal.
fn is_bound(value: &Value) -> bool {
    matches!(value, Value::Param(_) | Value::Int(_))
}

fn make_empty(args: Vec<Value>) -> SynthResult<Fragment> {
    if !args.is_empty() {
        return Err(arity_error("empty", &args));
    }
    Ok(Fragment::Empty)
}

fn make_linear(args: Vec<Value>) -> SynthResult<Fragment> {
    match args.as_slice() {
        [] => Ok(Fragment::linear(DEFAULT_LINEAR_LEN)),
        [Value::Int(n)] if *n >= 0 => Ok(Fragment::linear(*n as usize)),
        _ => Err(arity_error("linear", &args)),
    }
}

fn make_loop_to_n(mut args: Vec<Value>) -> SynthResult<Fragment> {
    if args.len() == 1 && is_bound(&args[0]) {
        Ok(Fragment::loop_to_n(args.remove(0)))
    } else {
        Err(arity_error("loopToN", &args))
    }
}

fn make_regular_loop(mut args: Vec<Value>) -> SynthResult<Fragment> {
    let valid = (2..=4).contains(&args.len())
        && is_bound(&args[0])
        && args[1..].iter().all(Value::is_param);
    if !valid {
        return Err(arity_error("regularLoop", &args));
    }
    let size = args.remove(0);
    Ok(Fragment::regular_loop(size, args))
}

fn make_output_loop(mut args: Vec<Value>) -> SynthResult<Fragment> {
    if args.len() == 2 && is_bound(&args[0]) && args[1].is_param() {
        let size = args.remove(0);
        let pointer = args.remove(0);
        Ok(Fragment::output_loop(size, pointer))
    } else {
        Err(arity_error("outputLoop", &args))
    }
}

/// The built-in rule catalogue.
///
/// The `regularLoop` rules pair each pointer with a shared `size` property
/// argument; multi-pointer variants require the pointers to be pairwise
/// distinct. The `outputLoop` rule claims any sized pointer not marked as an
/// input.
pub fn builtin_rules() -> Vec<Rule> {
    fn size_of(ptr: &str, sz: &str) -> MatchExpression {
        MatchExpression::property("size", vec![Binding::var(ptr), Binding::var(sz)])
    }

    vec![
        Rule::new(
            "regularLoop",
            &["sz", "ptr"],
            vec![size_of("ptr", "sz")],
            vec![Validator::is_pointer(&["ptr"])],
        ),
        Rule::new(
            "regularLoop",
            &["sz", "ptrA", "ptrB"],
            vec![size_of("ptrA", "sz"), size_of("ptrB", "sz")],
            vec![
                Validator::distinct(&["ptrA", "ptrB"]),
                Validator::is_pointer(&["ptrA", "ptrB"]),
            ],
        ),
        Rule::new(
            "regularLoop",
            &["sz", "ptrA", "ptrB", "ptrC"],
            vec![
                size_of("ptrA", "sz"),
                size_of("ptrB", "sz"),
                size_of("ptrC", "sz"),
            ],
            vec![
                Validator::distinct(&["ptrA", "ptrB", "ptrC"]),
                Validator::is_pointer(&["ptrA", "ptrB", "ptrC"]),
            ],
        ),
        Rule::new(
            "outputLoop",
            &["sz", "out"],
            vec![size_of("out", "sz")],
            vec![
                Validator::is_pointer(&["out"]),
                Validator::negation("input", &["out"]),
            ],
        ),
    ]
}
