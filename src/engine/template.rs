//! Replacement templates for substitution rules.
//!
//! A template is the `value` side of a `{from, match, value}` rule. It is
//! parsed once, against the rule's compiled regex, into literal runs and group
//! references. Parsing is where every malformed template is rejected, so
//! expansion itself cannot fail.
//!
//! ## Syntax
//!
//! ```text
//! \1 .. \99         numbered group (one or two digits)
//! \g<3> \g<stem>    numbered or named group
//! \0  \101          octal character escape (\0 + up to two digits, or three digits)
//! \\ \a \b \f \n \r \t \v
//! \&                any other non-letter escape is kept verbatim, backslash included
//! ```
//!
//! References to groups the regex does not define, escaped ASCII letters with
//! no meaning, octal values above `\377`, malformed `\g<...>` and a trailing
//! lone backslash are errors. A group that exists but did not take part in the
//! match expands to the empty string.

use regex::{Captures, Regex};
use thiserror::Error;

/// Why a template was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("bad escape \\{0}")]
    BadEscape(char),
    #[error("bad escape (end of template)")]
    TrailingBackslash,
    #[error("invalid group reference {0}")]
    InvalidGroup(String),
    #[error("unknown group name '{0}'")]
    UnknownGroupName(String),
    #[error("missing group name in \\g<...>")]
    MissingGroupName,
    #[error("octal escape value \\{0} outside of range 0-0o377")]
    OctalOutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
    Named(String),
}

/// A parsed replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
}

impl Template {
    /// Parse `source` for use with captures of `regex`.
    pub fn parse(source: &str, regex: &Regex) -> Result<Self, TemplateError> {
        let groups = regex.captures_len();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '\\' {
                literal.push(c);
                continue;
            }
            let Some(next) = chars.next() else {
                return Err(TemplateError::TrailingBackslash);
            };
            let group = match next {
                'g' => {
                    if chars.next() != Some('<') {
                        return Err(TemplateError::MissingGroupName);
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(ch) => name.push(ch),
                            None => return Err(TemplateError::MissingGroupName),
                        }
                    }
                    if name.is_empty() {
                        return Err(TemplateError::MissingGroupName);
                    }
                    if name.bytes().all(|b| b.is_ascii_digit()) {
                        Piece::Group(group_index(&name, groups)?)
                    } else if regex.capture_names().flatten().any(|n| n == name) {
                        Piece::Named(name)
                    } else {
                        return Err(TemplateError::UnknownGroupName(name));
                    }
                }
                '0' => {
                    let mut digits = String::from('0');
                    while digits.len() < 3 && chars.peek().is_some_and(is_octal) {
                        digits.extend(chars.next());
                    }
                    literal.push(octal_char(&digits)?);
                    continue;
                }
                '1'..='9' => {
                    let mut digits = String::from(next);
                    if chars.peek().is_some_and(char::is_ascii_digit) {
                        digits.extend(chars.next());
                        let both_octal = digits.chars().all(|d| is_octal(&d));
                        if both_octal && chars.peek().is_some_and(is_octal) {
                            digits.extend(chars.next());
                            literal.push(octal_char(&digits)?);
                            continue;
                        }
                    }
                    Piece::Group(group_index(&digits, groups)?)
                }
                '\\' => {
                    literal.push('\\');
                    continue;
                }
                'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' => {
                    literal.push(control_char(next));
                    continue;
                }
                other if other.is_ascii_alphabetic() => return Err(TemplateError::BadEscape(other)),
                other => {
                    literal.push('\\');
                    literal.push(other);
                    continue;
                }
            };

            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(group);
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Template { source: source.to_string(), pieces })
    }

    /// Expand the template with the groups of one match.
    pub fn expand(&self, caps: &Captures<'_>) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Group(index) => out.push_str(caps.get(*index).map_or("", |m| m.as_str())),
                Piece::Named(name) => out.push_str(caps.name(name).map_or("", |m| m.as_str())),
            }
        }
        out
    }

    /// The template as written in the rule.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn is_octal(c: &char) -> bool {
    matches!(c, '0'..='7')
}

fn group_index(digits: &str, groups: usize) -> Result<usize, TemplateError> {
    match digits.parse::<usize>() {
        Ok(index) if index < groups => Ok(index),
        _ => Err(TemplateError::InvalidGroup(digits.to_string())),
    }
}

fn octal_char(digits: &str) -> Result<char, TemplateError> {
    u32::from_str_radix(digits, 8)
        .ok()
        .filter(|&value| value <= 0o377)
        .and_then(char::from_u32)
        .ok_or_else(|| TemplateError::OctalOutOfRange(digits.to_string()))
}

fn control_char(c: char) -> char {
    match c {
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0c',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        _ => '\x0b',
    }
}
