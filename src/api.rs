use crate::engine::{CompiledRules, Generation, GenerationStats};
use crate::error::Result;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Result from [`generate_forms_verbose`].
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Category the headword was generated in.
    pub category: String,
    /// Categories whose rules were consulted, nearest first.
    pub chain: Vec<String>,
    /// Requested part to its forms.
    pub forms: BTreeMap<String, Vec<String>>,
    /// What the engine computed along the way.
    pub stats: GenerationStats,
    /// Total elapsed time, flattening included.
    pub elapsed: Duration,
}

/// Generate `parts` for one headword.
///
/// # Example
/// ```
/// use inflect::{CompiledRules, RuleSet, generate_forms};
///
/// let rules = RuleSet::from_yaml("verb:\n  rules:\n    to-inf: 'to {plain-inf}'\n").unwrap();
/// let compiled = CompiledRules::new(&rules).unwrap();
/// let forms = generate_forms(&compiled, "verb", [("plain-inf", "bindan")], &["to-inf"]).unwrap();
/// assert_eq!(forms["to-inf"], vec!["to bindan"]);
/// ```
pub fn generate_forms<I, K, V, P>(
    rules: &CompiledRules,
    category: &str,
    seeds: I,
    parts: &[P],
) -> Result<BTreeMap<String, Vec<String>>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    P: AsRef<str>,
{
    let mut generation = Generation::new(rules, category, seeds)?;
    run(&mut generation, parts)
}

/// Like [`generate_forms`], but also returns engine statistics and timing.
pub fn generate_forms_verbose<I, K, V, P>(
    rules: &CompiledRules,
    category: &str,
    seeds: I,
    parts: &[P],
) -> Result<GenerationReport>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    P: AsRef<str>,
{
    let start = Instant::now();
    let mut generation = Generation::new(rules, category, seeds)?;
    let forms = run(&mut generation, parts)?;

    Ok(GenerationReport {
        category: generation.category().to_string(),
        chain: generation.rules().chain().iter().map(|c| c.to_string()).collect(),
        forms,
        stats: generation.stats().clone(),
        elapsed: start.elapsed(),
    })
}

fn run<P: AsRef<str>>(generation: &mut Generation<'_>, parts: &[P]) -> Result<BTreeMap<String, Vec<String>>> {
    parts.iter().map(|part| Ok((part.as_ref().to_string(), generation.generate(part.as_ref())?))).collect()
}
