use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CompileError, ParseError};
use crate::part::{Field, Part};
use crate::version::VersionInfo;

/// One level of a raw pattern: literal text (possibly containing part
/// tokens) or a bracketed optional group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SegNode {
    Literal(String),
    Group(Vec<SegNode>),
}

/// A compiled raw pattern: an anchored matcher plus the parts it references,
/// in template order.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw_pattern: String,
    pub(crate) regexp: Regex,
    pub(crate) parts: Vec<&'static Part>,
}

impl Pattern {
    /// The pattern string this was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw_pattern
    }

    /// The regex source the pattern compiled to. Useful in diagnostics.
    pub fn regex_str(&self) -> &str {
        self.regexp.as_str()
    }

    /// Parses a version string against this pattern.
    ///
    /// The match must cover the whole string; prefix matches are rejected.
    pub fn parse_version(&self, version_str: &str) -> Result<VersionInfo, ParseError> {
        VersionInfo::parse(version_str, self)
    }

    /// The fields referenced by this pattern, in template order, first
    /// occurrence only.
    pub(crate) fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            if !fields.contains(&part.field) {
                fields.push(part.field);
            }
        }
        fields
    }
}

static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Pattern>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Compiles a raw pattern into a [`Pattern`].
///
/// Compilation is pure, so results are memoized behind a read-mostly cache
/// keyed by the raw string.
///
/// ```
/// use calbump::compile_pattern;
///
/// let pattern = compile_pattern("vYYYY0M.BUILD[-RELEASE]").unwrap();
/// assert_eq!("vYYYY0M.BUILD[-RELEASE]", pattern.raw());
/// ```
pub fn compile_pattern(raw_pattern: &str) -> Result<Pattern, CompileError> {
    if let Ok(cache) = PATTERN_CACHE.read() {
        if let Some(pattern) = cache.get(raw_pattern) {
            return Ok(pattern.clone());
        }
    }

    let pattern = compile_uncached(raw_pattern)?;

    if let Ok(mut cache) = PATTERN_CACHE.write() {
        cache.insert(raw_pattern.to_string(), pattern.clone());
    }
    Ok(pattern)
}

fn compile_uncached(raw_pattern: &str) -> Result<Pattern, CompileError> {
    if let Some(err) = week_numbering_conflict(raw_pattern) {
        return Err(err);
    }

    let mut body = String::with_capacity(raw_pattern.len() * 2);
    let mut parts: Vec<&'static Part> = Vec::new();
    let mut depth = 0usize;

    let mut rest = raw_pattern;
    while let Some(ch) = rest.chars().next() {
        if let Some(part) = Part::match_at(rest) {
            body.push_str("(?P<");
            body.push_str(part.field.group_name());
            body.push('>');
            body.push_str(part.sub_pattern);
            body.push(')');
            parts.push(part);
            rest = &rest[part.token.len()..];
            continue;
        }

        match ch {
            '\\' if rest[1..].starts_with('[') || rest[1..].starts_with(']') => {
                // escaped bracket: a literal in the version string
                body.push('\\');
                body.push_str(&rest[1..2]);
                rest = &rest[2..];
            }
            '[' => {
                body.push_str("(?:");
                depth += 1;
                rest = &rest[1..];
            }
            ']' => {
                if depth == 0 {
                    return Err(CompileError::UnbalancedBrackets {
                        pattern: raw_pattern.to_string(),
                    });
                }
                depth -= 1;
                body.push_str(")?");
                rest = &rest[1..];
            }
            _ => {
                let mut buf = [0u8; 4];
                body.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    if depth != 0 {
        return Err(CompileError::UnbalancedBrackets {
            pattern: raw_pattern.to_string(),
        });
    }

    let regexp =
        Regex::new(&format!("^{body}")).map_err(|err| CompileError::BadMatcher {
            pattern: raw_pattern.to_string(),
            reason: err.to_string(),
        })?;

    Ok(Pattern {
        raw_pattern: raw_pattern.to_string(),
        regexp,
        parts,
    })
}

const GREGORIAN_YEAR_TOKENS: &[&str] = &["YYYY", "YY", "0Y"];
const ISO_YEAR_TOKENS: &[&str] = &["GGGG", "GG", "0G"];
const LOCALE_WEEK_TOKENS: &[&str] = &["WW", "0W", "UU", "0U"];
const ISO_WEEK_TOKENS: &[&str] = &["VV", "0V"];

fn first_contained(raw_pattern: &str, tokens: &[&'static str]) -> Option<&'static str> {
    tokens.iter().copied().find(|token| raw_pattern.contains(token))
}

fn week_numbering_conflict(raw_pattern: &str) -> Option<CompileError> {
    let year_y = first_contained(raw_pattern, GREGORIAN_YEAR_TOKENS);
    let year_g = first_contained(raw_pattern, ISO_YEAR_TOKENS);
    let week_wu = first_contained(raw_pattern, LOCALE_WEEK_TOKENS);
    let week_v = first_contained(raw_pattern, ISO_WEEK_TOKENS);

    if let (Some(year_part), Some(week_part)) = (year_y, week_v) {
        return Some(CompileError::MixedWeekNumbering {
            pattern: raw_pattern.to_string(),
            year_part,
            week_part,
            alt1: raw_pattern.replace('V', "W"),
            alt2: raw_pattern.replace('Y', "G"),
        });
    }
    if let (Some(year_part), Some(week_part)) = (year_g, week_wu) {
        return Some(CompileError::MixedWeekNumbering {
            pattern: raw_pattern.to_string(),
            year_part,
            week_part,
            alt1: raw_pattern.replace('W', "V").replace('U', "V"),
            alt2: raw_pattern.replace('G', "Y"),
        });
    }
    None
}

/// Checks that a pattern does not mix week-numbering systems: a Gregorian
/// year (`YYYY`/`YY`/`0Y`) pairs with `WW`/`0W`/`UU`/`0U`, an ISO year
/// (`GGGG`/`GG`/`0G`) pairs with `VV`/`0V`.
///
/// ```
/// use calbump::is_valid_week_pattern;
///
/// assert!(is_valid_week_pattern("vYYYYw0W.BUILD"));
/// assert!(is_valid_week_pattern("vGGGGw0V.BUILD"));
/// assert!(!is_valid_week_pattern("vYYYYw0V.BUILD"));
/// assert!(!is_valid_week_pattern("vGGGGw0W.BUILD"));
/// ```
pub fn is_valid_week_pattern(raw_pattern: &str) -> bool {
    week_numbering_conflict(raw_pattern).is_none()
}

/// Splits a raw pattern into nested segments along its `[...]` groups.
///
/// Escaped brackets (`\[`, `\]`) stay inside their segment text; the
/// formatter unescapes them at render time.
pub(crate) fn parse_segment_tree(raw_pattern: &str) -> Result<Vec<SegNode>, CompileError> {
    let unbalanced = || CompileError::UnbalancedBrackets {
        pattern: raw_pattern.to_string(),
    };

    let mut stack: Vec<Vec<SegNode>> = vec![Vec::new()];
    let mut literal = String::new();
    let mut prev_escape = false;

    for ch in raw_pattern.chars() {
        if (ch == '[' || ch == ']') && !prev_escape {
            if !literal.is_empty() {
                match stack.last_mut() {
                    Some(branch) => branch.push(SegNode::Literal(std::mem::take(&mut literal))),
                    None => unreachable!("branch stack never empties"),
                }
            }
            if ch == '[' {
                stack.push(Vec::new());
            } else {
                let group = stack.pop().unwrap_or_default();
                match stack.last_mut() {
                    Some(parent) => parent.push(SegNode::Group(group)),
                    None => return Err(unbalanced()),
                }
            }
        } else {
            literal.push(ch);
        }
        prev_escape = ch == '\\';
    }

    if stack.len() != 1 {
        return Err(unbalanced());
    }
    let mut root = stack.remove(0);
    if !literal.is_empty() {
        root.push(SegNode::Literal(literal));
    }
    Ok(root)
}
