//! Match expressions and binding unification.
//!
//! A match expression evaluates a [`PropertySet`] to a list of partial
//! bindings ([`MatchResult`]s), one per way the expression can apply. A rule
//! then unifies one result from each of its expressions; conflicting
//! assignments make a combination silently inapplicable.

use std::collections::BTreeMap;

use marrow_props::{BaseType, PropertySet, Value};

use crate::errors::{SynthError, SynthResult};

/// A partial map from binding-variable names to matched values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    bindings: BTreeMap<String, Value>,
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bindings.insert(name.into(), value);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Merge `other` into a copy of `self`. Fails if any shared key is bound
    /// to a different value on the two sides.
    pub fn unify_with(&self, other: &MatchResult) -> Option<MatchResult> {
        let mut merged = self.bindings.clone();
        for (name, value) in &other.bindings {
            match merged.get(name) {
                Some(existing) if existing != value => return None,
                Some(_) => {}
                None => {
                    merged.insert(name.clone(), value.clone());
                }
            }
        }
        Some(MatchResult { bindings: merged })
    }

    /// Fold pairwise unification over a tuple of results. An empty tuple
    /// unifies to the empty binding.
    pub fn unify_all(results: &[MatchResult]) -> Option<MatchResult> {
        let mut unified = MatchResult::new();
        for result in results {
            unified = unified.unify_with(result)?;
        }
        Some(unified)
    }
}

/// One position of a property match expression: either a variable to bind or
/// a literal that contributes no binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Var(String),
    Literal(Value),
}

impl Binding {
    pub fn var(name: impl Into<String>) -> Self {
        Binding::Var(name.into())
    }
}

/// A predicate over a property set that yields partial bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchExpression {
    /// Matches every property instance with the given name, binding each
    /// variable position to the value at that position.
    Property {
        property: String,
        bindings: Vec<Binding>,
    },
    /// Binds `var` to each signature parameter of the given base type,
    /// regardless of pointer depth.
    Type { var: String, base: BaseType },
    /// Binds `var` to every signature parameter.
    Wildcard { var: String },
}

impl MatchExpression {
    pub fn property(name: impl Into<String>, bindings: Vec<Binding>) -> Self {
        MatchExpression::Property {
            property: name.into(),
            bindings,
        }
    }

    pub fn typed(var: impl Into<String>, base: BaseType) -> Self {
        MatchExpression::Type {
            var: var.into(),
            base,
        }
    }

    pub fn wildcard(var: impl Into<String>) -> Self {
        MatchExpression::Wildcard { var: var.into() }
    }

    /// Evaluate against a property set, producing one result per way the
    /// expression applies.
    ///
    /// A property instance whose value count disagrees with the binding
    /// count is a hard [`SynthError::ArityMismatch`]; it aborts the whole
    /// evaluation rather than skipping the instance.
    pub fn evaluate(&self, ps: &PropertySet) -> SynthResult<Vec<MatchResult>> {
        match self {
            MatchExpression::Property { property, bindings } => {
                let mut results = Vec::new();
                for prop in ps.properties.iter().filter(|p| &p.name == property) {
                    if prop.values.len() != bindings.len() {
                        return Err(SynthError::ArityMismatch {
                            property: property.clone(),
                            expected: bindings.len(),
                            actual: prop.values.len(),
                        });
                    }
                    let mut result = MatchResult::new();
                    for (binding, value) in bindings.iter().zip(&prop.values) {
                        if let Binding::Var(name) = binding {
                            result = result.bind(name.clone(), value.clone());
                        }
                    }
                    results.push(result);
                }
                Ok(results)
            }
            MatchExpression::Type { var, base } => Ok(ps
                .signature
                .parameters
                .iter()
                .filter(|p| p.base == *base)
                .map(|p| MatchResult::new().bind(var.clone(), Value::param(&p.name)))
                .collect()),
            MatchExpression::Wildcard { var } => Ok(ps
                .signature
                .parameters
                .iter()
                .map(|p| MatchResult::new().bind(var.clone(), Value::param(&p.name)))
                .collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marrow_props::{Param, Property, Signature};

    fn property_set() -> PropertySet {
        PropertySet {
            signature: Signature {
                name: "f".to_string(),
                return_type: None,
                parameters: vec![
                    Param {
                        name: "n".to_string(),
                        base: BaseType::Integer,
                        pointer_depth: 0,
                    },
                    Param {
                        name: "xs".to_string(),
                        base: BaseType::Floating,
                        pointer_depth: 1,
                    },
                    Param {
                        name: "ys".to_string(),
                        base: BaseType::Floating,
                        pointer_depth: 1,
                    },
                ],
            },
            properties: vec![
                Property {
                    name: "size".to_string(),
                    values: vec![Value::param("xs"), Value::param("n")],
                },
                Property {
                    name: "size".to_string(),
                    values: vec![Value::param("ys"), Value::param("n")],
                },
            ],
        }
    }

    #[test]
    fn unify_disjoint_keys_is_union() {
        let a = MatchResult::new().bind("x", Value::Int(1));
        let b = MatchResult::new().bind("y", Value::Int(2));
        let merged = a.unify_with(&b).unwrap();
        assert_eq!(merged.lookup("x"), Some(&Value::Int(1)));
        assert_eq!(merged.lookup("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn unify_conflicting_assignment_fails() {
        let a = MatchResult::new().bind("x", Value::Int(1));
        let b = MatchResult::new().bind("x", Value::Int(2));
        assert_eq!(a.unify_with(&b), None);
    }

    #[test]
    fn unify_agreeing_assignment_succeeds() {
        let a = MatchResult::new().bind("x", Value::param("n"));
        let b = MatchResult::new()
            .bind("x", Value::param("n"))
            .bind("y", Value::Int(3));
        let merged = a.unify_with(&b).unwrap();
        assert_eq!(merged.lookup("y"), Some(&Value::Int(3)));
    }

    #[test]
    fn property_expression_yields_one_result_per_instance() {
        let expr = MatchExpression::property(
            "size",
            vec![Binding::var("ptr"), Binding::var("sz")],
        );
        let results = expr.evaluate(&property_set()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].lookup("ptr"), Some(&Value::param("xs")));
        assert_eq!(results[0].lookup("sz"), Some(&Value::param("n")));
        assert_eq!(results[1].lookup("ptr"), Some(&Value::param("ys")));
    }

    #[test]
    fn property_expression_arity_mismatch_is_fatal() {
        let expr = MatchExpression::property("size", vec![Binding::var("sz")]);
        let err = expr.evaluate(&property_set()).unwrap_err();
        assert_eq!(
            err,
            SynthError::ArityMismatch {
                property: "size".to_string(),
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn literal_positions_bind_nothing() {
        let expr = MatchExpression::property(
            "size",
            vec![Binding::Literal(Value::param("xs")), Binding::var("sz")],
        );
        let results = expr.evaluate(&property_set()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].lookup("xs"), None);
        assert_eq!(results[0].lookup("sz"), Some(&Value::param("n")));
    }

    #[test]
    fn type_expression_matches_base_type_at_any_depth() {
        let expr = MatchExpression::typed("v", BaseType::Floating);
        let results = expr.evaluate(&property_set()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].lookup("v"), Some(&Value::param("xs")));
        assert_eq!(results[1].lookup("v"), Some(&Value::param("ys")));
    }

    #[test]
    fn wildcard_expression_matches_every_parameter() {
        let expr = MatchExpression::wildcard("v");
        let results = expr.evaluate(&property_set()).unwrap();
        assert_eq!(results.len(), 3);
    }
}
