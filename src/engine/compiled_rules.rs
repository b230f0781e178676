//! Rule compilation.
//!
//! This module holds the *static* side of the engine: the validated form of a
//! `RuleSet` that every `Generation` built from it shares.
//!
//! Generation is split into two phases:
//!
//! 1. **Compile** (this module): walk every category once, compile each
//!    substitution regex anchored to the whole value, and parse each
//!    replacement template against that regex.
//! 2. **Run** (see `generation.rs`): flatten one category's inherit chain and
//!    evaluate parts on demand for a single headword.
//!
//! Compiling up front means a broken rule is reported once, with its category
//! and part, when the repository is loaded, instead of once per headword that
//! happens to reach it.
//!
//! ## Invariants
//!
//! - Every `Rule::Substitution` holds a regex of the form `^(?:match)$` and a
//!   template whose group references exist in that regex.
//! - Category and part names are copied verbatim; parent names are *not*
//!   checked here (a dangling `inherit` is only an error for the categories
//!   that reach it, see `flatten.rs`).

use super::template::Template;
use crate::config::{CategorySpec, RuleSet, RuleSpec};
use crate::error::{Error, ErrorKind, Result};
use crate::{Rule, Substitution};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// One compiled category.
#[derive(Debug, Clone)]
pub struct CompiledCategory {
    /// Parent category, if any.
    pub inherit: Option<String>,
    /// Part name to alternative rules, in declaration order.
    pub parts: BTreeMap<String, Vec<Rule>>,
}

/// A validated rule repository.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    categories: HashMap<String, CompiledCategory>,
}

impl CompiledRules {
    /// Compile every category of `rules`.
    pub fn new(rules: &RuleSet) -> Result<Self> {
        let mut categories = HashMap::with_capacity(rules.len());
        let mut rule_count = 0;

        for (name, spec) in rules.iter() {
            let category = compile_category(spec).map_err(|err| err.in_category(name))?;
            rule_count += category.parts.values().map(Vec::len).sum::<usize>();
            categories.insert(name.to_string(), category);
        }

        tracing::debug!(categories = categories.len(), rules = rule_count, "compiled rule set");
        Ok(CompiledRules { categories })
    }

    pub fn get(&self, name: &str) -> Option<&CompiledCategory> {
        self.categories.get(name)
    }

    /// Like [`get`](Self::get), but also returns the repository's own copy of the name.
    pub(crate) fn entry(&self, name: &str) -> Option<(&str, &CompiledCategory)> {
        self.categories.get_key_value(name).map(|(k, v)| (k.as_str(), v))
    }

    /// Category names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn compile_category(spec: &CategorySpec) -> Result<CompiledCategory> {
    let mut parts = BTreeMap::new();
    for (part, entry) in &spec.rules {
        let rules = entry.as_slice().iter().map(|rule| compile_rule(part, rule)).collect::<Result<Vec<_>>>()?;
        parts.insert(part.clone(), rules);
    }
    Ok(CompiledCategory { inherit: spec.inherit.clone(), parts })
}

fn compile_rule(part: &str, spec: &RuleSpec) -> Result<Rule> {
    match spec {
        RuleSpec::Pattern(template) => Ok(Rule::Pattern(template.clone())),
        RuleSpec::Substitution(sub) => {
            let regex = Regex::new(&format!("^(?:{})$", sub.pattern)).map_err(|source| {
                Error::new(ErrorKind::InvalidPattern { part: part.to_string(), pattern: sub.pattern.clone(), source })
            })?;
            let template = Template::parse(&sub.value, &regex).map_err(|reason| {
                Error::new(ErrorKind::TemplateExpansionFailure {
                    part: part.to_string(),
                    pattern: sub.pattern.clone(),
                    template: sub.value.clone(),
                    reason: reason.to_string(),
                })
            })?;
            Ok(Rule::Substitution(Substitution { source: sub.from.clone(), pattern: sub.pattern.clone(), regex, template }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(yaml: &str) -> Result<CompiledRules> {
        CompiledRules::new(&RuleSet::from_yaml(yaml).unwrap())
    }

    #[test]
    fn single_rule_becomes_one_element_list() {
        let compiled = compile("c:\n  rules:\n    a: '{b}s'\n    b: ['x', 'y']\n").unwrap();
        let category = compiled.get("c").unwrap();
        assert_eq!(category.parts["a"].len(), 1);
        assert_eq!(category.parts["b"].len(), 2);
        assert!(matches!(&category.parts["a"][0], Rule::Pattern(t) if t == "{b}s"));
    }

    #[test]
    fn substitution_regex_is_anchored() {
        let compiled = compile("c:\n  rules:\n    a: {from: b, match: 'x|y', value: 'z'}\n").unwrap();
        let Rule::Substitution(sub) = &compiled.get("c").unwrap().parts["a"][0] else {
            panic!("expected a substitution");
        };
        assert_eq!(sub.pattern, "x|y");
        assert!(sub.regex.is_match("y"));
        assert!(!sub.regex.is_match("xy"));
    }

    #[test]
    fn invalid_regex_reports_category_and_part() {
        let err = compile("weak:\n  rules:\n    stem: {from: plain-inf, match: '(.*an', value: '\\1'}\n").unwrap_err();
        assert!(matches!(&err.kind, ErrorKind::InvalidPattern { part, .. } if part == "stem"));
        assert_eq!(err.context.category.as_deref(), Some("weak"));
    }

    #[test]
    fn template_with_missing_group_is_rejected() {
        let err = compile("c:\n  rules:\n    x: {from: a, match: '(.)(.)', value: '\\3'}\n").unwrap_err();
        match err.kind {
            ErrorKind::TemplateExpansionFailure { part, pattern, template, reason } => {
                assert_eq!(part, "x");
                assert_eq!(pattern, "(.)(.)");
                assert_eq!(template, "\\3");
                assert_eq!(reason, "invalid group reference 3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dangling_parent_is_not_a_compile_error() {
        let compiled = compile("c:\n  inherit: missing\n").unwrap();
        assert_eq!(compiled.get("c").unwrap().inherit.as_deref(), Some("missing"));
        assert_eq!(compiled.names(), vec!["c"]);
    }
}
