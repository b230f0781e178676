//! Pattern rules: template strings with `{part}` placeholders.
//!
//! Expansion resolves the leftmost placeholder, substitutes each of its forms
//! for *every* occurrence of that placeholder, and re-scans each result:
//!
//! ```text
//! "{stem}{ending}"   stem = [bind, band]   ending = [an, on]
//!   ├─ "bind{ending}" ─┬─ "bindan"
//!   │                  └─ "bindon"
//!   └─ "band{ending}" ─┬─ "bandan"
//!                      └─ "bandon"
//! ```
//!
//! The result is the cartesian product over all placeholders, in no
//! particular order (the engine sorts afterwards).

use super::generation::Generation;
use crate::error::{ErrorKind, Result};

/// Nested re-expansions allowed per template. A level is only spent when an
/// inserted form itself contains a placeholder, so the number of distinct
/// placeholders in a rule is unbounded.
pub const MAX_EXPANSION_DEPTH: usize = 64;

fn placeholder() -> &'static regex::Regex {
    regex!(r"\{([\w-]*)\}")
}

pub(super) fn expand(engine: &mut Generation<'_>, template: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    expand_into(engine, template, 0, &mut out)?;
    Ok(out)
}

fn expand_into(engine: &mut Generation<'_>, template: &str, depth: usize, out: &mut Vec<String>) -> Result<()> {
    let Some(caps) = placeholder().captures(template) else {
        out.push(template.to_string());
        return Ok(());
    };
    if depth >= MAX_EXPANSION_DEPTH {
        let kind = ErrorKind::ExpansionTooDeep { template: template.to_string(), limit: MAX_EXPANSION_DEPTH };
        return Err(engine.fail(kind));
    }

    let token = caps.get(0).map_or("", |m| m.as_str());
    let part = caps.get(1).map_or("", |m| m.as_str());

    for value in engine.generate(part)? {
        engine.note_expansion();
        let nested = usize::from(placeholder().is_match(&value));
        expand_into(engine, &template.replace(token, &value), depth + nested, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSet;
    use crate::engine::CompiledRules;

    fn generate(yaml: &str, seeds: &[(&str, &str)], part: &str) -> Result<Vec<String>> {
        let compiled = CompiledRules::new(&RuleSet::from_yaml(yaml).unwrap()).unwrap();
        let mut generation = Generation::new(&compiled, "c", seeds.iter().copied()).unwrap();
        generation.generate(part)
    }

    #[test]
    fn cartesian_expansion() {
        let forms = generate("c:\n  rules:\n    outer: '<{a}>'\n    a: ['x', 'y']\n", &[], "outer").unwrap();
        assert_eq!(forms, vec!["<x>", "<y>"]);
    }

    #[test]
    fn product_over_two_placeholders() {
        let yaml = "c:\n  rules:\n    f: '{stem}{ending}'\n    stem: ['bind', 'band']\n    ending: ['an', 'on']\n";
        assert_eq!(generate(yaml, &[], "f").unwrap(), vec!["bandan", "bandon", "bindan", "bindon"]);
    }

    #[test]
    fn repeated_placeholder_takes_one_value() {
        let yaml = "c:\n  rules:\n    f: '{a}-{a}'\n    a: ['x', 'y']\n";
        assert_eq!(generate(yaml, &[], "f").unwrap(), vec!["x-x", "y-y"]);
    }

    #[test]
    fn values_are_inserted_literally() {
        let yaml = "c:\n  rules:\n    f: '<{a}>'\n";
        assert_eq!(generate(yaml, &[("a", r"\1$0")], "f").unwrap(), vec![r"<\1$0>"]);
    }

    #[test]
    fn hyphenated_part_names() {
        let yaml = "c:\n  rules:\n    to-inf: 'to {plain-inf}'\n";
        assert_eq!(generate(yaml, &[("plain-inf", "bindan")], "to-inf").unwrap(), vec!["to bindan"]);
    }

    #[test]
    fn unbalanced_braces_are_literal() {
        let yaml = "c:\n  rules:\n    f: '{a'\n    g: 'a b}'\n    h: '{a b}'\n";
        assert_eq!(generate(yaml, &[], "f").unwrap(), vec!["{a"]);
        assert_eq!(generate(yaml, &[], "g").unwrap(), vec!["a b}"]);
        assert_eq!(generate(yaml, &[], "h").unwrap(), vec!["{a b}"]);
    }

    #[test]
    fn empty_placeholder_is_an_unknown_part() {
        let err = generate("c:\n  rules:\n    f: 'x{}'\n", &[], "f").unwrap_err();
        assert!(matches!(&err.kind, ErrorKind::UnknownPart { part } if part.is_empty()));
    }

    #[test]
    fn many_distinct_placeholders_expand() {
        let count = MAX_EXPANSION_DEPTH + 6;
        let mut yaml = String::from("c:\n  rules:\n    f: '");
        for i in 0..count {
            yaml.push_str(&format!("{{p{i}}}"));
        }
        yaml.push_str("'\n");
        for i in 0..count {
            yaml.push_str(&format!("    p{i}: 'x'\n"));
        }
        assert_eq!(generate(&yaml, &[], "f").unwrap(), vec!["x".repeat(count)]);
    }

    #[test]
    fn self_reproducing_value_is_bounded() {
        let err = generate("c:\n  rules:\n    f: '<{a}>'\n", &[("a", "{a}")], "f").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ExpansionTooDeep { limit: MAX_EXPANSION_DEPTH, .. }));
    }
}
