//! Error types for rule compilation and generation.
//!
//! Every failure is fatal to the headword being generated. The error carries
//! enough context (category, the chain of parts being generated, the offending
//! rule or value) for a rule author to fix the configuration without reading
//! engine internals.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A generation or compilation failure with its context.
///
/// `source()` forwards to the kind's source (e.g. the regex compiler error).
#[derive(Debug)]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where it went wrong.
    pub context: ErrorContext,
}

impl Error {
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, context: ErrorContext::default() }
    }

    /// Attach the category the error belongs to, unless one is already set.
    #[must_use]
    pub fn in_category(mut self, category: &str) -> Self {
        if self.context.category.is_none() {
            self.context.category = Some(category.to_string());
        }
        self
    }

    /// Attach the parts that were being generated when the error occurred.
    #[must_use]
    pub fn with_trail(mut self, trail: Vec<String>) -> Self {
        if self.context.trail.is_empty() {
            self.context.trail = trail;
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.context, self.kind)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// Location of an error inside the rule repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Category whose rule set was being compiled or generated.
    pub category: Option<String>,
    /// Parts being generated, outermost first.
    pub trail: Vec<String>,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.category, self.trail.is_empty()) {
            (None, true) => Ok(()),
            (Some(category), true) => write!(f, "category '{category}': "),
            (None, false) => write!(f, "generating {}: ", self.trail.join(" > ")),
            (Some(category), false) => write!(f, "category '{category}', generating {}: ", self.trail.join(" > ")),
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The starting category, or a parent named by `inherit`, does not exist.
    #[error("unknown category '{name}'{}", .referenced_by.as_ref().map(|c| format!(" (inherited by '{c}')")).unwrap_or_default())]
    UnknownCategory {
        /// The missing category.
        name: String,
        /// The category whose `inherit` names it, if any.
        referenced_by: Option<String>,
    },

    /// The inherit chain did not terminate within the depth bound.
    #[error("probable inheritance loop expanding rules for '{start}' (more than {limit} parents)")]
    CyclicOrTooDeepInheritance {
        /// Category the walk started from.
        start: String,
        /// The depth bound.
        limit: usize,
    },

    /// A part was requested or referenced but has no rule and was not seeded.
    #[error("no such part '{part}'")]
    UnknownPart {
        /// The missing part.
        part: String,
    },

    /// A part depends on itself through its rules.
    #[error("cyclic part reference: {}", .cycle.join(" -> "))]
    CyclicPartReference {
        /// The cycle, starting and ending at the same part.
        cycle: Vec<String>,
    },

    /// A substitution regex did not match a generated source value.
    #[error("value of '{source_part}', '{value}', does not match pattern '{pattern}'")]
    PatternMatchFailure {
        /// Part the substitution reads from.
        source_part: String,
        /// The non-matching value.
        value: String,
        /// The unanchored pattern as written in the rule.
        pattern: String,
    },

    /// A replacement template is invalid relative to the regex.
    #[error("error expanding '{pattern}' with '{template}' in part '{part}': {reason}")]
    TemplateExpansionFailure {
        /// Part that owns the rule.
        part: String,
        /// The unanchored pattern as written in the rule.
        pattern: String,
        /// The replacement template.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A substitution regex does not compile.
    #[error("invalid pattern '{pattern}' in part '{part}': {}", reason(.source))]
    InvalidPattern {
        /// Part that owns the rule.
        part: String,
        /// The pattern as written in the rule.
        pattern: String,
        /// Regex compiler error.
        #[source]
        source: regex::Error,
    },

    /// Placeholder substitution kept producing new placeholders.
    #[error("template '{template}' still has placeholders after {limit} substitutions")]
    ExpansionTooDeep {
        /// The template being expanded.
        template: String,
        /// The bound.
        limit: usize,
    },
}

fn reason(err: &regex::Error) -> String {
    let text = err.to_string();
    // Syntax errors end with a caret diagram followed by `error: <reason>`.
    text.lines().last().unwrap_or_default().trim().trim_start_matches("error: ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_trail() {
        let err = Error::new(ErrorKind::UnknownPart { part: "stem".into() })
            .in_category("weak")
            .with_trail(vec!["past-part".into(), "stem".into()]);
        assert_eq!(err.to_string(), "category 'weak', generating past-part > stem: no such part 'stem'");
    }

    #[test]
    fn first_context_wins() {
        let err = Error::new(ErrorKind::UnknownPart { part: "x".into() }).in_category("inner").in_category("outer");
        assert_eq!(err.context.category.as_deref(), Some("inner"));
    }

    #[test]
    fn invalid_pattern_exposes_regex_error() {
        let source = regex::Regex::new("(x").unwrap_err();
        let err = Error::new(ErrorKind::InvalidPattern { part: "a".into(), pattern: "(x".into(), source })
            .in_category("c");

        assert_eq!(err.to_string(), "category 'c': invalid pattern '(x' in part 'a': unclosed group");
        let cause = std::error::Error::source(&err).expect("regex error is the source");
        assert!(cause.downcast_ref::<regex::Error>().is_some());
    }

    #[test]
    fn kinds_without_cause_have_no_source() {
        let err = Error::new(ErrorKind::UnknownPart { part: "x".into() });
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn unknown_parent_mentions_child() {
        let kind = ErrorKind::UnknownCategory { name: "strong".into(), referenced_by: Some("strong-1".into()) };
        assert_eq!(kind.to_string(), "unknown category 'strong' (inherited by 'strong-1')");
    }
}
