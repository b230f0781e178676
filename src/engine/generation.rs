//! The generation engine.
//!
//! A `Generation` answers "what are the forms of part X?" for one headword in
//! one category. It owns:
//!
//! - the category's flattened rule table (borrowed from `CompiledRules`),
//! - a memo of parts already known (seeded or computed),
//! - the stack of parts currently being computed.
//!
//! ```text
//! generate(part)
//!   ├─ memo hit ────────────────────────────▶ forms (no recomputation)
//!   ├─ part on the stack ───────────────────▶ CyclicPartReference
//!   ├─ no rule ─────────────────────────────▶ UnknownPart
//!   └─ for each rule
//!        ├─ Pattern       → pattern::expand      ─┐ may recurse into generate
//!        └─ Substitution  → substitution::apply  ─┘
//!      union → sort → dedup → memo → forms
//! ```
//!
//! Each part is evaluated at most once per instance. An instance is meant to be
//! used for a single headword and dropped.

use super::compiled_rules::CompiledRules;
use super::flatten::FlatRules;
use super::metrics::{GenerationStats, PartTrace};
use super::{pattern, substitution};
use crate::Rule;
use crate::error::{Error, ErrorKind, Result};
use std::collections::HashMap;
use std::time::Instant;

/// Inflection generator for one headword in one category.
#[derive(Debug)]
pub struct Generation<'a> {
    rules: FlatRules<'a>,
    /// Memo: part to sorted, deduplicated forms.
    parts: HashMap<String, Vec<String>>,
    /// Parts being computed, outermost first.
    in_progress: Vec<String>,
    stats: GenerationStats,
}

impl<'a> Generation<'a> {
    /// Flatten `category` and seed the memo with `initial_parts`
    /// (typically `{"plain-inf": <headword>}`).
    pub fn new<I, K, V>(compiled: &'a CompiledRules, category: &str, initial_parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(Self::from_flat(FlatRules::new(compiled, category)?, initial_parts))
    }

    /// Build from an already flattened table.
    pub fn from_flat<I, K, V>(rules: FlatRules<'a>, initial_parts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let parts = initial_parts.into_iter().map(|(k, v)| (k.into(), vec![v.into()])).collect();
        Generation { rules, parts, in_progress: Vec::new(), stats: GenerationStats::default() }
    }

    pub fn category(&self) -> &'a str {
        self.rules.category()
    }

    pub fn rules(&self) -> &FlatRules<'a> {
        &self.rules
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Whether `part` is already in the memo.
    pub fn is_resolved(&self, part: &str) -> bool {
        self.parts.contains_key(part)
    }

    /// Sorted, deduplicated forms of `part`.
    ///
    /// The first request computes and memoizes the part (and everything it
    /// references); later requests return the memoized forms.
    pub fn generate(&mut self, part: &str) -> Result<Vec<String>> {
        if let Some(forms) = self.parts.get(part) {
            self.stats.memo_hits += 1;
            tracing::trace!(category = self.category(), part, "memo hit");
            return Ok(forms.clone());
        }

        if let Some(pos) = self.in_progress.iter().position(|p| p == part) {
            let mut cycle = self.in_progress[pos..].to_vec();
            cycle.push(part.to_string());
            return Err(self.fail(ErrorKind::CyclicPartReference { cycle }));
        }

        let Some(rules) = self.rules.get(part) else {
            return Err(self.fail(ErrorKind::UnknownPart { part: part.to_string() }));
        };

        let started = Instant::now();
        let slot = self.stats.computed.len();
        self.stats.computed.push(PartTrace {
            part: part.to_string(),
            depth: self.in_progress.len(),
            rules: rules.len(),
            ..PartTrace::default()
        });

        self.in_progress.push(part.to_string());
        let result = self.evaluate(rules);
        self.in_progress.pop();

        let mut forms = result?;
        forms.sort_unstable();
        forms.dedup();

        let trace = &mut self.stats.computed[slot];
        trace.forms = forms.len();
        trace.duration = started.elapsed();
        tracing::debug!(category = self.category(), part, forms = ?forms, "generated part");

        self.parts.insert(part.to_string(), forms.clone());
        Ok(forms)
    }

    /// Union of the outputs of every alternative rule.
    fn evaluate(&mut self, rules: &'a [Rule]) -> Result<Vec<String>> {
        let mut forms = Vec::new();
        for rule in rules {
            match rule {
                Rule::Pattern(template) => forms.extend(pattern::expand(self, template)?),
                Rule::Substitution(sub) => forms.extend(substitution::apply(self, sub)?),
            }
        }
        Ok(forms)
    }

    /// Wrap `kind` with this engine's category and current trail.
    pub(super) fn fail(&self, kind: ErrorKind) -> Error {
        Error::new(kind).in_category(self.category()).with_trail(self.in_progress.clone())
    }

    pub(super) fn note_expansion(&mut self) {
        self.stats.expansions += 1;
    }

    pub(super) fn note_regex_evaluation(&mut self) {
        self.stats.regex_evaluations += 1;
    }
}
