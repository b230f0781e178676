//! Substitution rules: regex rewrites of another part's forms.
//!
//! Every form of the source part must match the (anchored) regex; a form that
//! does not is a malformed rule, not something to skip.

use super::generation::Generation;
use crate::Substitution;
use crate::error::{ErrorKind, Result};

pub(super) fn apply(engine: &mut Generation<'_>, rule: &Substitution) -> Result<Vec<String>> {
    let values = engine.generate(&rule.source)?;
    let mut out = Vec::with_capacity(values.len());

    for value in values {
        engine.note_regex_evaluation();
        let Some(caps) = rule.regex.captures(&value) else {
            return Err(engine.fail(ErrorKind::PatternMatchFailure {
                source_part: rule.source.clone(),
                value: value.clone(),
                pattern: rule.pattern.clone(),
            }));
        };
        let expanded = rule.template.expand(&caps);
        tracing::trace!(source = %rule.source, value = %value, expanded = %expanded, "substitution");
        out.push(expanded);
    }
    Ok(out)
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
    fn swaps_groups() {
        let yaml = "c:\n  rules:\n    swapped: {from: x, match: '(.)(.)', value: '\\2\\1'}\n";
        assert_eq!(generate(yaml, &[("x", "ab")], "swapped").unwrap(), vec!["ba"]);
    }

    #[test]
    fn strips_an_ending() {
        let yaml = "c:\n  rules:\n    stem: {from: plain-inf, match: '(.*)(an|ian)', value: '\\1'}\n    past: '{stem}ode'\n";
        assert_eq!(generate(yaml, &[("plain-inf", "hopian")], "past").unwrap(), vec!["hopiode"]);
    }

    #[test]
    fn one_output_per_source_form() {
        let yaml = "c:\n  rules:\n    src: ['ab', 'cd']\n    swapped: {from: src, match: '(.)(.)', value: '\\2\\1'}\n";
        assert_eq!(generate(yaml, &[], "swapped").unwrap(), vec!["ba", "dc"]);
    }

    #[test]
    fn match_must_cover_the_whole_value() {
        let yaml = "c:\n  rules:\n    swapped: {from: x, match: '(.)(.)', value: '\\2\\1'}\n";
        let err = generate(yaml, &[("x", "abc")], "swapped").unwrap_err();
        match &err.kind {
            ErrorKind::PatternMatchFailure { source_part, value, pattern } => {
                assert_eq!(source_part, "x");
                assert_eq!(value, "abc");
                assert_eq!(pattern, "(.)(.)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.context.trail, vec!["swapped".to_string()]);
        assert_eq!(
            err.to_string(),
            "category 'c', generating swapped: value of 'x', 'abc', does not match pattern '(.)(.)'"
        );
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let yaml = "c:\n  rules:\n    y: {from: x, match: 'a|b', value: 'ok'}\n";
        assert_eq!(generate(yaml, &[("x", "b")], "y").unwrap(), vec!["ok"]);
        assert!(generate(yaml, &[("x", "ab")], "y").is_err());
    }

    #[test]
    fn unknown_source_part() {
        let yaml = "c:\n  rules:\n    y: {from: nowhere, match: '(.*)', value: '\\1'}\n";
        let err = generate(yaml, &[], "y").unwrap_err();
        assert!(matches!(&err.kind, ErrorKind::UnknownPart { part } if part == "nowhere"));
    }
}
