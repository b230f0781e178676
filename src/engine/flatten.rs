//! Inheritance flattening.
//!
//! A category's effective rules are found by walking its `inherit` chain,
//! nearest category first. The first category in the chain that defines a part
//! wins; later (more distant) definitions of the same part are ignored.
//!
//! ```text
//! weak-ii ── inherit ──▶ weak ── inherit ──▶ verb
//!   pres-ind-3sg            stem               to-inf
//!                           pres-ind-3sg       stem      (shadowed by weak)
//! ```
//!
//! The walk is bounded by [`MAX_INHERIT_DEPTH`] parent hops, which turns a
//! cyclic or absurdly deep configuration into an error without full cycle
//! detection.

use super::compiled_rules::CompiledRules;
use crate::Rule;
use crate::error::{Error, ErrorKind, Result};
use std::collections::HashMap;

pub const MAX_INHERIT_DEPTH: usize = 20;

/// The effective rule table of one category.
#[derive(Debug, Clone)]
pub struct FlatRules<'a> {
    category: &'a str,
    chain: Vec<&'a str>,
    parts: HashMap<&'a str, &'a [Rule]>,
}

impl<'a> FlatRules<'a> {
    /// Flatten `category` against `compiled`.
    pub fn new(compiled: &'a CompiledRules, category: &str) -> Result<Self> {
        let missing = |name: &str, referenced_by: Option<&str>| {
            Error::new(ErrorKind::UnknownCategory {
                name: name.to_string(),
                referenced_by: referenced_by.map(str::to_string),
            })
            .in_category(category)
        };

        let (start, mut current) = compiled.entry(category).ok_or_else(|| missing(category, None))?;
        let mut name = start;
        let mut chain = Vec::new();
        let mut parts: HashMap<&'a str, &'a [Rule]> = HashMap::new();
        let mut depth = 0;

        loop {
            if depth >= MAX_INHERIT_DEPTH {
                return Err(Error::new(ErrorKind::CyclicOrTooDeepInheritance {
                    start: category.to_string(),
                    limit: MAX_INHERIT_DEPTH,
                })
                .in_category(category));
            }
            chain.push(name);
            for (part, rules) in &current.parts {
                parts.entry(part.as_str()).or_insert(rules.as_slice());
            }
            let Some(parent) = current.inherit.as_deref() else {
                break;
            };
            (name, current) = compiled.entry(parent).ok_or_else(|| missing(parent, Some(name)))?;
            depth += 1;
        }

        tracing::trace!(category = start, chain = ?chain, parts = parts.len(), "flattened category");
        Ok(FlatRules { category: start, chain, parts })
    }

    pub fn category(&self) -> &'a str {
        self.category
    }

    /// Categories visited, nearest first.
    pub fn chain(&self) -> &[&'a str] {
        &self.chain
    }

    /// Rules for `part`, if any category in the chain defines it.
    pub fn get(&self, part: &str) -> Option<&'a [Rule]> {
        self.parts.get(part).copied()
    }

    /// Defined part names, sorted.
    pub fn part_names(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = self.parts.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSet;

    fn compile(yaml: &str) -> CompiledRules {
        CompiledRules::new(&RuleSet::from_yaml(yaml).unwrap()).unwrap()
    }

    fn template(rules: &[Rule]) -> &str {
        match &rules[0] {
            Rule::Pattern(t) => t,
            Rule::Substitution(_) => panic!("expected a pattern"),
        }
    }

    const CHAIN: &str = r#"
a:
  rules:
    x: "from-a"
    y: "from-a"
b:
  inherit: a
  rules:
    y: "from-b"
c:
  inherit: b
  rules:
    z: "from-c"
"#;

    #[test]
    fn parent_fills_missing_parts() {
        let compiled = compile(CHAIN);
        let flat = FlatRules::new(&compiled, "b").unwrap();
        assert_eq!(template(flat.get("x").unwrap()), "from-a");
    }

    #[test]
    fn nearest_definition_wins() {
        let compiled = compile(CHAIN);
        let flat = FlatRules::new(&compiled, "c").unwrap();
        assert_eq!(template(flat.get("y").unwrap()), "from-b");
        assert_eq!(template(flat.get("z").unwrap()), "from-c");
        assert_eq!(flat.chain(), &["c", "b", "a"]);
        assert_eq!(flat.part_names(), vec!["x", "y", "z"]);
    }

    #[test]
    fn undefined_part_stays_absent() {
        let compiled = compile(CHAIN);
        let flat = FlatRules::new(&compiled, "a").unwrap();
        assert!(flat.get("z").is_none());
        assert_eq!(flat.part_names(), vec!["x", "y"]);
    }

    #[test]
    fn two_category_cycle_is_rejected() {
        let compiled = compile("a:\n  inherit: b\nb:\n  inherit: a\n");
        let err = FlatRules::new(&compiled, "a").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::CyclicOrTooDeepInheritance { limit: MAX_INHERIT_DEPTH, .. }));
    }

    #[test]
    fn self_inheritance_is_rejected() {
        let compiled = compile("a:\n  inherit: a\n");
        assert!(matches!(
            FlatRules::new(&compiled, "a").unwrap_err().kind,
            ErrorKind::CyclicOrTooDeepInheritance { .. }
        ));
    }

    #[test]
    fn depth_bound_counts_parent_hops() {
        let mut yaml = String::from("c0: {}\n");
        for i in 1..MAX_INHERIT_DEPTH {
            yaml.push_str(&format!("c{i}:\n  inherit: c{}\n", i - 1));
        }
        let mut too_deep = yaml.clone();
        too_deep.push_str(&format!("c{MAX_INHERIT_DEPTH}:\n  inherit: c{}\n", MAX_INHERIT_DEPTH - 1));

        let compiled = compile(&yaml);
        let top = format!("c{}", MAX_INHERIT_DEPTH - 1);
        assert_eq!(FlatRules::new(&compiled, &top).unwrap().chain().len(), MAX_INHERIT_DEPTH);

        let compiled = compile(&too_deep);
        let top = format!("c{MAX_INHERIT_DEPTH}");
        assert!(FlatRules::new(&compiled, &top).is_err());
    }

    #[test]
    fn missing_parent_names_child() {
        let compiled = compile("child:\n  inherit: ghost\n");
        let err = FlatRules::new(&compiled, "child").unwrap_err();
        match err.kind {
            ErrorKind::UnknownCategory { name, referenced_by } => {
                assert_eq!(name, "ghost");
                assert_eq!(referenced_by.as_deref(), Some("child"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_start_category() {
        let compiled = compile(CHAIN);
        let err = FlatRules::new(&compiled, "nope").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownCategory { ref name, referenced_by: None } if name == "nope"));
    }
}
