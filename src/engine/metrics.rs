//! Generation statistics.
//!
//! A `Generation` records what it did while answering requests, so that the
//! CLI report (and anyone debugging a rule set) can see which parts were
//! computed, in what nesting, and where memoization paid off.
//!
//! ## Design notes
//!
//! - `computed` is in *start* order, so walking it with `depth` as indentation
//!   yields the recursion tree.
//! - Durations are inclusive: a part's time contains the time of every part it
//!   had to compute first.

use std::time::Duration;

/// Counters and per-part traces for one engine instance.
#[derive(Debug, Default, Clone)]
pub struct GenerationStats {
    /// Every part the engine computed (not served from the memo).
    pub computed: Vec<PartTrace>,
    /// Requests answered from the memo, seeds included.
    pub memo_hits: usize,
    /// Placeholder substitutions performed by pattern rules.
    pub expansions: usize,
    /// Regex matches attempted by substitution rules.
    pub regex_evaluations: usize,
}

impl GenerationStats {
    pub fn total_forms(&self) -> usize {
        self.computed.iter().map(|t| t.forms).sum()
    }
}

/// One computed part.
#[derive(Debug, Default, Clone)]
pub struct PartTrace {
    pub part: String,
    /// Recursion depth when the part was requested (0 = requested by the caller).
    pub depth: usize,
    /// Number of alternative rules evaluated.
    pub rules: usize,
    /// Number of distinct forms produced.
    pub forms: usize,
    pub duration: Duration,
}
