//! Verb table driver.
//!
//! Builds the full inflection table for a vocabulary: every spelling of every
//! listed word is generated in its category, the standard parts are joined
//! into display strings, and the result is merged with an alternate,
//! pre-generated source.
//!
//! ```text
//! words.yaml ──┐                      rule-based table ──┐
//! explicit ────┼─▶ build_rule_based ───────────────────┐ │ merge_forms
//! rules.yaml ──┘                                       v v
//! wikidata.yaml ─▶ normalize_alternate ─────────▶ merged table
//! ```

use crate::config::{DataDir, ExplicitRules, FormTable, RuleSet, WordLists};
use crate::engine::{CompiledRules, Generation};
use crate::{ConfigError, Error};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// The standard verb parts, in table order.
pub const PARTS: [&str; 18] = [
    "plain-inf",
    "to-inf",
    "pres-part",
    "pres-ind-1sg",
    "pres-ind-2sg",
    "pres-ind-3sg",
    "pres-ind-pl",
    "imp-sg",
    "imp-pl",
    "pres-sub-sg",
    "pres-sub-pl",
    "past-ind-1sg",
    "past-ind-2sg",
    "past-ind-3sg",
    "past-ind-pl",
    "past-sub-sg",
    "past-sub-pl",
    "past-part",
];

/// Seed part holding the headword.
pub const PLAIN_INF: &str = "plain-inf";
/// Modern English gloss; seeded from the word list when present.
pub const MOD_E: &str = "mod-e";

const PAST_PART: &str = "past-part";
const PAST_PART_PREFIX: &str = "(ge)";
const MOD_E_PREFIX: &str = "to ";
/// Parts left out of the table: the headword itself, and the first person
/// past which always equals the third.
const SKIPPED: [&str; 2] = [PLAIN_INF, "past-ind-1sg"];
const EXPLICIT_PREFIX: &str = "explicit-";

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid rule set")]
    Rules(#[source] Error),
    #[error("failed to generate '{word}'")]
    Generation {
        word: String,
        #[source]
        source: Error,
    },
    #[error("'{word}' has '{part}' in the {present_in} forms but not the other")]
    MissingForm { word: String, part: String, present_in: &'static str },
    #[error("'{word}' disagrees on '{part}': '{existing}' vs '{generated}'")]
    FormMismatch { word: String, part: String, existing: String, generated: String },
}

/// One word-list line: `"sp1/sp2"` or `"sp1/sp2, modern gloss"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub spellings: Vec<String>,
    pub mod_e: Option<String>,
}

impl WordEntry {
    pub fn parse(line: &str) -> Self {
        let (spellings, mod_e) = match regex!(r"^([^,]+), (.+)$").captures(line) {
            Some(caps) => (caps.get(1).map_or("", |m| m.as_str()), caps.get(2).map(|m| m.as_str().to_string())),
            None => (line, None),
        };
        WordEntry { spellings: spellings.split('/').map(str::to_string).collect(), mod_e }
    }

    /// Seed parts for one spelling.
    pub fn seeds<'s>(&'s self, spelling: &'s str) -> Vec<(&'static str, &'s str)> {
        let mut seeds = vec![(PLAIN_INF, spelling)];
        if let Some(mod_e) = &self.mod_e {
            seeds.push((MOD_E, mod_e.as_str()));
        }
        seeds
    }
}

/// Generate the table row for one spelling.
pub fn generate_row(generation: &mut Generation<'_>) -> Result<BTreeMap<String, String>, Error> {
    let mut row = BTreeMap::new();
    for part in PARTS.iter().chain(std::iter::once(&MOD_E)) {
        if SKIPPED.contains(part) {
            continue;
        }
        let mut form = generation.generate(part)?.join("/");
        if form.is_empty() {
            continue;
        }
        if *part == PAST_PART && !form.starts_with(PAST_PART_PREFIX) {
            form.insert_str(0, PAST_PART_PREFIX);
        }
        if *part == MOD_E {
            form = with_mod_e_prefix(form);
        }
        row.insert(part.to_string(), form);
    }
    Ok(row)
}

/// Generate every word of `words`, plus each explicit word in its own
/// `explicit-<word>` category.
pub fn build_rule_based(rules: &RuleSet, words: &WordLists, explicit: &ExplicitRules) -> Result<FormTable, TableError> {
    let mut rules = rules.clone();
    let mut lists: Vec<(String, Vec<String>)> = words.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    for (word, spec) in explicit {
        let category = format!("{EXPLICIT_PREFIX}{word}");
        rules.insert(category.clone(), spec.clone());
        lists.push((category, vec![word.clone()]));
    }

    let compiled = CompiledRules::new(&rules).map_err(TableError::Rules)?;
    let mut table = FormTable::new();

    for (category, entries) in &lists {
        for line in entries {
            let entry = WordEntry::parse(line);
            for spelling in &entry.spellings {
                let failed = |source: Error| TableError::Generation { word: spelling.clone(), source };
                let mut generation = Generation::new(&compiled, category, entry.seeds(spelling)).map_err(failed)?;
                let row = generate_row(&mut generation).map_err(failed)?;
                tracing::debug!(category = %category, word = %spelling, parts = row.len(), "generated word");
                table.insert(spelling.clone(), row);
            }
        }
    }
    Ok(table)
}

/// Apply the `mod-e` prefix convention to a pre-generated table.
pub fn normalize_alternate(table: &mut FormTable) {
    for row in table.values_mut() {
        if let Some(mod_e) = row.remove(MOD_E) {
            row.insert(MOD_E.to_string(), with_mod_e_prefix(mod_e));
        }
    }
}

/// Merge `generated` into `base`.
///
/// Words only in `generated` are added. Words in both must agree on every part
/// except `mod-e`; the `base` row is kept.
pub fn merge_forms(base: &mut FormTable, generated: FormTable) -> Result<(), TableError> {
    for (word, row) in generated {
        let Some(existing) = base.get(&word) else {
            base.insert(word, row);
            continue;
        };
        for (part, form) in existing {
            if part == MOD_E {
                continue;
            }
            match row.get(part) {
                None => return Err(TableError::MissingForm { word, part: part.clone(), present_in: "existing" }),
                Some(other) if other != form => {
                    return Err(TableError::FormMismatch {
                        word,
                        part: part.clone(),
                        existing: form.clone(),
                        generated: other.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        if let Some(part) = row.keys().find(|part| *part != MOD_E && !existing.contains_key(*part)) {
            return Err(TableError::MissingForm { word, part: part.clone(), present_in: "generated" });
        }
    }
    Ok(())
}

/// Build the merged table from a loaded data directory.
pub fn build_table(data: &DataDir) -> Result<FormTable, TableError> {
    let mut table = data.alternate.clone();
    normalize_alternate(&mut table);
    let generated = build_rule_based(&data.rules, &data.words, &data.explicit)?;
    tracing::info!(alternate = table.len(), generated = generated.len(), "merging tables");
    merge_forms(&mut table, generated)?;
    Ok(table)
}

/// Load `dir` and build the merged table.
pub fn read_all_forms(dir: &Path) -> Result<FormTable, TableError> {
    build_table(&DataDir::load(dir)?)
}

fn with_mod_e_prefix(form: String) -> String {
    if form.starts_with(MOD_E_PREFIX) { form } else { format!("{MOD_E_PREFIX}{form}") }
}
