//! Rule-driven inflection generation.
//!
//! A small declarative rule language describes how the grammatical forms of a
//! word derive from one another: template strings that reference other forms
//! (`"{stem}ode"`), and regex rewrites of other forms (`{from: plain-inf,
//! match: "(.*)an", value: '\1'}`). Categories inherit rules from a parent.
//! Given a category and a seed (usually the infinitive), [`Generation`]
//! computes any requested form as a sorted, deduplicated list of strings.
//!
//! ```
//! use inflect::{CompiledRules, Generation, RuleSet};
//!
//! let rules = RuleSet::from_yaml(r#"
//! weak:
//!   rules:
//!     stem: {from: plain-inf, match: "(.*?)(i?an)", value: '\1'}
//!     past-ind-3sg: "{stem}ode"
//! "#).unwrap();
//! let compiled = CompiledRules::new(&rules).unwrap();
//!
//! let mut generation = Generation::new(&compiled, "weak", [("plain-inf", "hopian")]).unwrap();
//! assert_eq!(generation.generate("past-ind-3sg").unwrap(), vec!["hopode"]);
//! ```

#[macro_use]
mod macros;
mod api;
pub mod config;
pub mod engine;
mod error;
pub mod table;

use regex::Regex;

pub use api::{GenerationReport, generate_forms, generate_forms_verbose};
pub use config::{CategorySpec, ConfigError, DataDir, RuleEntry, RuleSet, RuleSpec, SubstitutionSpec};
pub use engine::{CompiledRules, Generation, GenerationStats, PartTrace, Template};
pub use error::{Error, ErrorContext, ErrorKind, Result};

// --- Compiled rules ---------------------------------------------------------

/// A compiled rule: one alternative derivation of a part.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Template with `{part}` placeholders, expanded as a cartesian product.
    Pattern(String),
    /// Regex rewrite of every form of another part.
    Substitution(Substitution),
}

/// A compiled `{from, match, value}` rule.
#[derive(Debug, Clone)]
pub struct Substitution {
    /// Part whose forms are rewritten.
    pub source: String,
    /// The pattern as written in the rule (unanchored).
    pub pattern: String,
    /// `^(?:pattern)$`.
    pub regex: Regex,
    /// The replacement, validated against `regex`.
    pub template: Template,
}
