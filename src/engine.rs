//! Inflection generation engine.
//!
//! This module is the entry point for the rule interpreter. It is split into
//! focused submodules under `src/engine/`, re-exported here so callers use
//! stable paths such as `crate::engine::Generation`.
//!
//! ## How the parts work together
//!
//! ```text
//! RuleSet (declarative, config.rs)
//!    │  CompiledRules::new                  (compiled_rules.rs)
//!    │    - anchor + compile regexes
//!    │    - parse replacement templates     (template.rs)
//!    v
//! CompiledRules ──── shared by every headword ────┐
//!                                                 │
//! Generation::new(category, seeds)  (generation.rs)
//!    │  FlatRules::new                          (flatten.rs)
//!    │    - walk inherit chain, nearest wins
//!    v
//! generate(part) ──┬── Pattern       → pattern.rs       (cartesian expansion)
//!    ▲             └── Substitution  → substitution.rs  (anchored match + template)
//!    └────────── both recurse into generate for referenced parts
//! ```
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: validates a `RuleSet` once into `CompiledRules`.
//! - `template.rs`: backreference template parsing and expansion.
//! - `flatten.rs`: resolves a category's effective rules (`FlatRules`).
//! - `generation.rs`: the memoizing engine plus the part-cycle guard.
//! - `pattern.rs` / `substitution.rs`: the two rule evaluators.
//! - `metrics.rs`: per-instance statistics for reports and debugging.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events: `debug` for every computed part, `trace`
//! for memo hits, flattening and individual substitutions.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/flatten.rs"]
mod flatten;
#[path = "engine/generation.rs"]
mod generation;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/pattern.rs"]
mod pattern;
#[path = "engine/substitution.rs"]
mod substitution;
#[path = "engine/template.rs"]
mod template;

pub use compiled_rules::{CompiledCategory, CompiledRules};
pub use flatten::{FlatRules, MAX_INHERIT_DEPTH};
pub use generation::Generation;
pub use metrics::{GenerationStats, PartTrace};
pub use pattern::MAX_EXPANSION_DEPTH;
pub use template::{Template, TemplateError};
