//! Rules: matching logic that instantiates fragment templates.
//!
//! A rule names a fragment template, the binding names whose values become
//! the template's construction arguments, a list of match expressions, and a
//! list of validators. Matching a rule against a property set yields one
//! instantiated fragment per consistent, validated combination of
//! match-expression results.

use marrow_props::{PropertySet, Value};

use crate::combinatorics::cartesian_product;
use crate::errors::{SynthError, SynthResult};
use crate::fragment::Fragment;
use crate::matching::{MatchExpression, MatchResult};
use crate::registry::FragmentRegistry;

/// A post-unification boolean constraint over bound values. Validators never
/// mutate state; a failing validator silently drops the combination.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// All resolved variables must be pairwise distinct. A pair passes
    /// vacuously when either side is unresolved.
    Distinct { vars: Vec<String> },
    /// Fails if a property instance with this name and exactly these
    /// resolved argument values exists. Passes vacuously if any argument is
    /// unresolved.
    Negation { property: String, args: Vec<String> },
    /// Every bound variable that resolves to a parameter reference must name
    /// a parameter with nonzero pointer depth.
    IsPointer { vars: Vec<String> },
}

impl Validator {
    pub fn distinct(vars: &[&str]) -> Self {
        Validator::Distinct {
            vars: vars.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn negation(property: impl Into<String>, args: &[&str]) -> Self {
        Validator::Negation {
            property: property.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn is_pointer(vars: &[&str]) -> Self {
        Validator::IsPointer {
            vars: vars.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn validate(&self, unified: &MatchResult, ps: &PropertySet) -> bool {
        match self {
            Validator::Distinct { vars } => {
                for (i, v1) in vars.iter().enumerate() {
                    for v2 in &vars[i + 1..] {
                        if let (Some(a), Some(b)) = (unified.lookup(v1), unified.lookup(v2))
                            && a == b
                        {
                            return false;
                        }
                    }
                }
                true
            }
            Validator::Negation { property, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    match unified.lookup(arg) {
                        Some(value) => values.push(value.clone()),
                        None => return true,
                    }
                }
                !ps.properties
                    .iter()
                    .any(|p| &p.name == property && p.values == values)
            }
            Validator::IsPointer { vars } => vars.iter().all(|var| {
                match unified.lookup(var).and_then(Value::as_param) {
                    Some(name) => ps
                        .signature
                        .param(name)
                        .is_some_and(|p| p.is_pointer()),
                    // Unresolved or non-parameter values are not constrained.
                    None => true,
                }
            }),
        }
    }
}

/// A fragment template name plus the matching and validation logic that
/// instantiates it. Constructed once at startup and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Rule {
    template: String,
    args: Vec<String>,
    exprs: Vec<MatchExpression>,
    validators: Vec<Validator>,
}

impl Rule {
    pub fn new(
        template: impl Into<String>,
        args: &[&str],
        exprs: Vec<MatchExpression>,
        validators: Vec<Validator>,
    ) -> Self {
        Rule {
            template: template.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            exprs,
            validators,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Match this rule against a property set, instantiating one fragment
    /// per surviving unification.
    ///
    /// Combinations that fail to unify or validate are silently dropped.
    /// Hard errors are reserved for contract violations: a property arity
    /// mismatch, a required argument left unbound, or an unknown template.
    pub fn match_against(
        &self,
        ps: &PropertySet,
        templates: &FragmentRegistry,
    ) -> SynthResult<Vec<Fragment>> {
        let mut lists = Vec::with_capacity(self.exprs.len());
        for expr in &self.exprs {
            lists.push(expr.evaluate(ps)?);
        }

        let mut fragments = Vec::new();
        for combination in cartesian_product(&lists) {
            let Some(unified) = MatchResult::unify_all(&combination) else {
                continue;
            };
            if !self.validators.iter().all(|v| v.validate(&unified, ps)) {
                continue;
            }

            let mut call_args = Vec::with_capacity(self.args.len());
            for name in &self.args {
                match unified.lookup(name) {
                    Some(value) => call_args.push(value.clone()),
                    None => return Err(SynthError::UnboundVariable(name.clone())),
                }
            }
            fragments.push(templates.instantiate(&self.template, call_args)?);
        }
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Binding;
    use marrow_props::{BaseType, Param, Property, Signature};

    fn property_set() -> PropertySet {
        PropertySet {
            signature: Signature {
                name: "f".to_string(),
                return_type: None,
                parameters: vec![
                    Param {
                        name: "size".to_string(),
                        base: BaseType::Integer,
                        pointer_depth: 0,
                    },
                    Param {
                        name: "a".to_string(),
                        base: BaseType::Floating,
                        pointer_depth: 1,
                    },
                    Param {
                        name: "b".to_string(),
                        base: BaseType::Floating,
                        pointer_depth: 1,
                    },
                ],
            },
            properties: vec![
                Property {
                    name: "size".to_string(),
                    values: vec![Value::param("a"), Value::param("size")],
                },
                Property {
                    name: "size".to_string(),
                    values: vec![Value::param("b"), Value::param("size")],
                },
            ],
        }
    }

    fn bound(pairs: &[(&str, Value)]) -> MatchResult {
        let mut result = MatchResult::new();
        for (name, value) in pairs {
            result = result.bind(*name, value.clone());
        }
        result
    }

    #[test]
    fn distinct_rejects_any_equal_pair() {
        let v = Validator::distinct(&["a", "b", "c"]);
        let ps = property_set();

        let all_different = bound(&[
            ("a", Value::param("x")),
            ("b", Value::param("y")),
            ("c", Value::param("z")),
        ]);
        assert!(v.validate(&all_different, &ps));

        let one_pair_equal = bound(&[
            ("a", Value::param("x")),
            ("b", Value::param("x")),
            ("c", Value::param("z")),
        ]);
        assert!(!v.validate(&one_pair_equal, &ps));
    }

    #[test]
    fn distinct_is_vacuous_for_unresolved_variables() {
        let v = Validator::distinct(&["a", "b"]);
        let ps = property_set();
        let only_a = bound(&[("a", Value::param("x"))]);
        assert!(v.validate(&only_a, &ps));
        assert!(v.validate(&MatchResult::new(), &ps));
    }

    #[test]
    fn negation_fails_when_instance_exists() {
        let ps = property_set();
        let v = Validator::negation("size", &["p", "n"]);

        let present = bound(&[("p", Value::param("a")), ("n", Value::param("size"))]);
        assert!(!v.validate(&present, &ps));

        let absent = bound(&[("p", Value::param("size")), ("n", Value::param("a"))]);
        assert!(v.validate(&absent, &ps));

        let unresolved = bound(&[("p", Value::param("a"))]);
        assert!(v.validate(&unresolved, &ps));
    }

    #[test]
    fn is_pointer_checks_parameter_depth() {
        let ps = property_set();
        let v = Validator::is_pointer(&["p"]);

        assert!(v.validate(&bound(&[("p", Value::param("a"))]), &ps));
        assert!(!v.validate(&bound(&[("p", Value::param("size"))]), &ps));
        // Non-parameter values are not constrained.
        assert!(v.validate(&bound(&[("p", Value::Int(4))]), &ps));
    }

    #[test]
    fn two_pointer_rule_matches_both_orderings() {
        let registry = FragmentRegistry::with_builtins();
        let rule = Rule::new(
            "regularLoop",
            &["sz", "ptrA", "ptrB"],
            vec![
                MatchExpression::property(
                    "size",
                    vec![Binding::var("ptrA"), Binding::var("sz")],
                ),
                MatchExpression::property(
                    "size",
                    vec![Binding::var("ptrB"), Binding::var("sz")],
                ),
            ],
            vec![Validator::distinct(&["ptrA", "ptrB"])],
        );

        let fragments = rule.match_against(&property_set(), &registry).unwrap();
        assert_eq!(fragments.len(), 2);
        // Argument order is reflected in the rendering, so the two orderings
        // stay distinct under canonical-string equality.
        assert!(fragments[0].canonical().contains("regularLoop(size, a, b)"));
        assert!(fragments[1].canonical().contains("regularLoop(size, b, a)"));
        assert_ne!(fragments[0], fragments[1]);
    }

    #[test]
    fn unbound_required_argument_is_a_hard_error() {
        let registry = FragmentRegistry::with_builtins();
        let rule = Rule::new(
            "loopToN",
            &["missing"],
            vec![MatchExpression::property(
                "size",
                vec![Binding::var("ptr"), Binding::var("sz")],
            )],
            vec![],
        );
        let err = rule.match_against(&property_set(), &registry).unwrap_err();
        assert_eq!(err, SynthError::UnboundVariable("missing".to_string()));
    }

    #[test]
    fn unknown_template_is_a_hard_error() {
        let registry = FragmentRegistry::with_builtins();
        let rule = Rule::new(
            "noSuchShape",
            &["sz"],
            vec![MatchExpression::property(
                "size",
                vec![Binding::var("ptr"), Binding::var("sz")],
            )],
            vec![],
        );
        let err = rule.match_against(&property_set(), &registry).unwrap_err();
        assert_eq!(err, SynthError::NoSuchTemplate("noSuchShape".to_string()));
    }
}
