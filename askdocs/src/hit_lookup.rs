use std::collections::HashSet;

use crate::models::Hit;

/// First hit whose `id` or `objectID` equals `id`.
pub fn find_hit<'a>(id: &str, hits: &'a [Hit]) -> Option<&'a Hit> {
    let id = id.trim();
    if id.is_empty() {
        return None;
    }

    let found = hits
        .iter()
        .find(|hit| hit.id.trim() == id || hit.object_id.as_deref().map(str::trim) == Some(id));

    if found.is_none() {
        log::debug!("No hit found for reference {} among {} hits", id, hits.len());
    }
    found
}

/// Document key used for de-duplication: fragment dropped, trailing `.html` stripped.
pub fn normalize_url(url: &str) -> &str {
    let path = url.split('#').next().unwrap_or(url);
    path.strip_suffix(".html").unwrap_or(path)
}

/// Hits with distinct documents, first occurrence wins, order preserved.
pub fn unique_hits(hits: &[Hit]) -> Vec<Hit> {
    let mut seen = HashSet::new();
    hits.iter()
        .filter(|hit| seen.insert(normalize_url(&hit.url)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, url: &str) -> Hit {
        Hit {
            id: id.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_find_by_id() {
        let hits = vec![hit("1", "/a"), hit("42", "/b"), hit("42", "/c")];
        assert_eq!(find_hit("42", &hits).map(|h| h.url.as_str()), Some("/b"));
    }

    #[test]
    fn test_find_by_object_id() {
        let mut h = hit("", "/obj");
        h.object_id = Some("abc".to_string());
        let hits = vec![hit("1", "/a"), h];
        assert_eq!(find_hit("abc", &hits).map(|h| h.url.as_str()), Some("/obj"));
    }

    #[test]
    fn test_empty_id_never_matches() {
        let hits = vec![hit("", "/a")];
        assert!(find_hit("", &hits).is_none());
        assert!(find_hit("  ", &hits).is_none());
    }

    #[test]
    fn test_missing_id() {
        assert!(find_hit("7", &[]).is_none());
        assert!(find_hit("7", &[hit("70", "/a")]).is_none());
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("/docs/foo.html#bar"), "/docs/foo");
        assert_eq!(normalize_url("/docs/foo#bar"), "/docs/foo");
        assert_eq!(normalize_url("/docs/foo.html"), "/docs/foo");
        assert_eq!(normalize_url("/docs/foo.htm"), "/docs/foo.htm");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn test_unique_hits_by_document() {
        let hits = vec![hit("", "/a.html"), hit("", "/a#section"), hit("", "/b")];
        let unique = unique_hits(&hits);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].url, "/a.html");
        assert_eq!(unique[1].url, "/b");
    }

    #[test]
    fn test_unique_hits_keeps_fragment_of_first() {
        let hits = vec![hit("1", "/docs/foo#bar"), hit("2", "/docs/foo.html#bar")];
        let unique = unique_hits(&hits);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].url, "/docs/foo#bar");
        assert_eq!(unique[0].id, "1");
    }
}
