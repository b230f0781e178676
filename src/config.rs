//! Declarative rule repository and data-directory loading.
//!
//! The rule language is written in YAML. A category names an optional parent
//! and maps parts to rules; a rule is either a template string or a
//! `{from, match, value}` substitution, and a part may list several rules
//! whose outputs are unioned:
//!
//! ```yaml
//! weak:
//!   rules:
//!     stem: {from: plain-inf, match: "(.*)an", value: '\1'}
//!     past-ind-3sg: "{stem}ode"
//! weak-ii:
//!   inherit: weak
//!   rules:
//!     pres-ind-3sg: ["{stem}aþ", "{stem}að"]
//! ```
//!
//! These types are the *declarative* side only; see `engine::CompiledRules`
//! for the validated form the engine runs on.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names inside a data directory.
pub const RULES_FILE: &str = "rules.yaml";
pub const WORDS_FILE: &str = "words.yaml";
pub const EXPLICIT_FILE: &str = "explicit.yaml";
pub const ALTERNATE_FILE: &str = "wikidata.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A full rule repository: category name to category definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    categories: BTreeMap<String, CategorySpec>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a repository from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Read a repository from a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        load_yaml(path)
    }

    /// Add or replace a category.
    pub fn insert(&mut self, name: impl Into<String>, category: CategorySpec) -> Option<CategorySpec> {
        self.categories.insert(name.into(), category)
    }

    pub fn get(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategorySpec)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One category: an optional parent and its own part rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategorySpec {
    #[serde(default)]
    pub inherit: Option<String>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleEntry>,
}

impl CategorySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inherit(mut self, parent: impl Into<String>) -> Self {
        self.inherit = Some(parent.into());
        self
    }

    pub fn rule(mut self, part: impl Into<String>, entry: impl Into<RuleEntry>) -> Self {
        self.rules.insert(part.into(), entry.into());
        self
    }
}

/// The rules for one part: a single rule or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    // Untagged variants are tried in order; lists first.
    Many(Vec<RuleSpec>),
    One(RuleSpec),
}

impl RuleEntry {
    /// The alternatives as a slice; a single rule is a one-element list.
    pub fn as_slice(&self) -> &[RuleSpec] {
        match self {
            RuleEntry::One(rule) => std::slice::from_ref(rule),
            RuleEntry::Many(rules) => rules,
        }
    }
}

impl From<RuleSpec> for RuleEntry {
    fn from(rule: RuleSpec) -> Self {
        RuleEntry::One(rule)
    }
}

impl From<&str> for RuleEntry {
    fn from(template: &str) -> Self {
        RuleEntry::One(RuleSpec::Pattern(template.to_string()))
    }
}

impl<const N: usize> From<[&str; N]> for RuleEntry {
    fn from(templates: [&str; N]) -> Self {
        RuleEntry::Many(templates.iter().map(|t| RuleSpec::Pattern(t.to_string())).collect())
    }
}

impl From<Vec<RuleSpec>> for RuleEntry {
    fn from(rules: Vec<RuleSpec>) -> Self {
        RuleEntry::Many(rules)
    }
}

/// A single declarative rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// Template with `{part}` placeholders.
    Pattern(String),
    /// Regex rewrite of another part's values.
    Substitution(SubstitutionSpec),
}

impl RuleSpec {
    pub fn substitution(from: impl Into<String>, pattern: impl Into<String>, value: impl Into<String>) -> Self {
        RuleSpec::Substitution(SubstitutionSpec { from: from.into(), pattern: pattern.into(), value: value.into() })
    }
}

/// A `{from, match, value}` rule. Only the mapping form is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct SubstitutionSpec {
    /// Part whose values are rewritten.
    pub from: String,
    /// Regex matched against the whole value (the `match` key).
    pub pattern: String,
    /// Replacement with `\1`-style backreferences.
    pub value: String,
}

impl TryFrom<BTreeMap<String, String>> for SubstitutionSpec {
    type Error = String;

    fn try_from(mut fields: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut take = |key: &str| fields.remove(key).ok_or_else(|| format!("substitution rule is missing `{key}`"));
        let spec = SubstitutionSpec { from: take("from")?, pattern: take("match")?, value: take("value")? };
        match fields.keys().next() {
            Some(unknown) => Err(format!("unknown key `{unknown}` in substitution rule")),
            None => Ok(spec),
        }
    }
}

/// Word lists: category name to word entries (`"sp1/sp2"` or `"sp1/sp2, gloss"`).
pub type WordLists = BTreeMap<String, Vec<String>>;

/// Per-word rule sets that get their own pseudo-category.
pub type ExplicitRules = BTreeMap<String, CategorySpec>;

/// Pre-generated forms: word to part to form.
pub type FormTable = BTreeMap<String, BTreeMap<String, String>>;

/// Everything the table driver reads from a data directory.
#[derive(Debug, Clone, Default)]
pub struct DataDir {
    pub rules: RuleSet,
    pub words: WordLists,
    pub explicit: ExplicitRules,
    pub alternate: FormTable,
}

impl DataDir {
    /// Load a data directory. `rules.yaml` and `words.yaml` are required; the
    /// explicit and alternate files default to empty when missing.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let rules: RuleSet = load_yaml(&dir.join(RULES_FILE))?;
        let words: WordLists = load_yaml(&dir.join(WORDS_FILE))?;
        let explicit = load_optional_yaml(&dir.join(EXPLICIT_FILE))?;
        let alternate = load_optional_yaml(&dir.join(ALTERNATE_FILE))?;
        tracing::debug!(dir = %dir.display(), categories = rules.len(), words = words.len(), "loaded data directory");
        Ok(DataDir { rules, words, explicit, alternate })
    }
}

/// Read and deserialize one YAML file.
pub fn load_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    parse_yaml(path, &text)
}

fn load_optional_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => parse_yaml(path, &text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
    }
}

fn parse_yaml<T: DeserializeOwned + Default>(path: &Path, text: &str) -> Result<T, ConfigError> {
    // An empty document deserializes as unit, not as an empty map.
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })
}
