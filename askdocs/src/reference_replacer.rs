use std::borrow::Cow;

use regex::Captures;

use crate::hit_lookup::find_hit;
use crate::models::Hit;
use crate::reference_matcher::{citation_id, REFERENCE_RE};

/// Rewrites resolvable citation markers as links using [`default_reference_link`].
pub fn parse_and_replace_references<'a>(markdown: &'a str, hits: &[Hit]) -> Cow<'a, str> {
    parse_and_replace_references_with(markdown, hits, default_reference_link)
}

/// Rewrites every citation marker whose id resolves to a hit with `replace(hit)`.
/// Markers that do not resolve are left as they are.
pub fn parse_and_replace_references_with<'a, F>(
    markdown: &'a str,
    hits: &[Hit],
    replace: F,
) -> Cow<'a, str>
where
    F: Fn(&Hit) -> String,
{
    if markdown.is_empty() || hits.is_empty() {
        return Cow::Borrowed(markdown);
    }

    REFERENCE_RE.replace_all(markdown, |caps: &Captures| {
        match citation_id(markdown, caps).and_then(|id| find_hit(id, hits)) {
            Some(hit) => replace(hit),
            None => caps[0].to_string(),
        }
    })
}

pub fn default_reference_link(hit: &Hit) -> String {
    format!(
        r#"<a href="{}" target="_blank" title="{}">{}</a>"#,
        escape_html(&hit.url),
        escape_html(&hit.title),
        escape_html(&hit.id)
    )
}

/// Escapes HTML specials plus brackets and parentheses, so text placed in a
/// link can never be read as a citation marker again.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '[' => escaped.push_str("&#91;"),
            ']' => escaped.push_str("&#93;"),
            '(' => escaped.push_str("&#40;"),
            ')' => escaped.push_str("&#41;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
