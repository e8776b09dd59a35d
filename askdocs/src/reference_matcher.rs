//! Recognises citation markers that the LLM leaves in its markdown answers.
//!
//! Accepted forms, case-insensitive:
//!
//! - `(Ref: 123)`, `(Ref. 123)`, `(Reference: 123)`, `(References: 123)`,
//!   `(id: 123)`, `(123)` and lists such as `(Ref. 123, 456)`
//! - `[ref: 123]`, `[123]`
//! - `[[123]]`
//! - `[33ffd70e82ebd01b19dadc908ea097844c6fb013]` or `[[33ffd7...]]`, optionally
//!   followed by more comma-separated hashes inside the same brackets
//!
//! A list yields only its first id. The label and target of a markdown link,
//! `[1](https://example.org)`, are never citations.

use std::collections::HashSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};

/// Alternatives are ordered so `[[123]]` is consumed whole before the
/// single-bracket forms can match its inner `[123]`.
const REFERENCE_PATTERN: &str = r"(?ix)
    \[\[ (?P<double>[0-9]+) \]\]
  | \[\[ (?-i:(?P<double_hash>[0-9a-f]{40})) (?: \s*,\s* (?-i:[0-9a-f]{40}) )* \]\]
  | \[ (?-i:(?P<hash>[0-9a-f]{40})) (?: \s*,\s* (?-i:[0-9a-f]{40}) )* \]
  | \[ (?: ref \s* [:.]? \s* )? (?P<bracket>[0-9]+) \]
  | \( (?: (?: references? | ref | id ) \s* [:.]? \s* )? (?P<paren>[0-9]+) (?: \s*,\s* [0-9]+ )* \)
";

const GROUPS: [&str; 5] = ["double", "double_hash", "hash", "bracket", "paren"];

pub(crate) static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid"));

/// One citation marker found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch<'a> {
    pub id: &'a str,
    pub matched: &'a str,
    pub range: Range<usize>,
}

fn reference_id<'a>(caps: &Captures<'a>) -> Option<&'a str> {
    GROUPS
        .iter()
        .find_map(|name| caps.name(name))
        .map(|m| m.as_str())
}

/// `[1]` directly followed by `(`, or `(1)` directly after `]`, is part of a
/// markdown link rather than a citation.
fn is_markdown_link_part(haystack: &str, whole: Match<'_>) -> bool {
    let text = whole.as_str();
    (text.starts_with('[') && haystack[whole.end()..].starts_with('('))
        || (text.starts_with('(') && haystack[..whole.start()].ends_with(']'))
}

/// Id cited by one regex match, or `None` when the match is not a citation.
pub(crate) fn citation_id<'a>(haystack: &str, caps: &Captures<'a>) -> Option<&'a str> {
    let whole = caps.get(0)?;
    if is_markdown_link_part(haystack, whole) {
        return None;
    }
    reference_id(caps)
}

/// All non-overlapping citation markers in `markdown`, left to right.
pub fn find_references(markdown: &str) -> Vec<ReferenceMatch<'_>> {
    REFERENCE_RE
        .captures_iter(markdown)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = citation_id(markdown, &caps)?;
            Some(ReferenceMatch {
                id,
                matched: whole.as_str(),
                range: whole.range(),
            })
        })
        .collect()
}

pub fn extract_first_reference_id(markdown: &str) -> Option<String> {
    REFERENCE_RE
        .captures_iter(markdown)
        .find_map(|caps| citation_id(markdown, &caps).map(str::to_string))
}

/// Every cited id once, in the order first seen.
pub fn extract_all_reference_ids(markdown: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    find_references(markdown)
        .into_iter()
        .filter(|m| seen.insert(m.id))
        .map(|m| m.id.to_string())
        .collect()
}
