//! Whitelist path pattern matching
//!
//! Two wildcard forms with deliberately different semantics:
//!
//! - A pattern ending in `/*` is a prefix match at any depth:
//!   `/webhook/jumio/*` covers `/webhook/jumio/validation` and
//!   `/webhook/jumio/validation/confirm`.
//! - A `*` as an interior segment is positional: `/users/*/profile` covers
//!   `/users/123/profile` but not `/users/123/profile/extra`.
//!
//! Matching is case-sensitive. Gateway template parameters such as `{id}`
//! are literal text, not wildcards.

/// Check whether a whitelist pattern covers a concrete resource path
pub fn matches(pattern: &str, candidate: &str) -> bool {
    if normalize(pattern) == normalize(candidate) {
        return true;
    }

    if !pattern.contains('*') {
        return false;
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        // Prefix form: require at least one segment beyond the prefix
        let tail = match candidate.strip_prefix(prefix) {
            Some(tail) => tail,
            None => return false,
        };
        return tail.starts_with('/') && tail != "/";
    }

    // Positional form: equal segment counts, literal segments must match
    let pattern_segments: Vec<&str> = normalize(pattern).split('/').collect();
    let candidate_segments: Vec<&str> = normalize(candidate).split('/').collect();

    if pattern_segments.len() != candidate_segments.len() {
        return false;
    }

    pattern_segments
        .iter()
        .zip(&candidate_segments)
        .all(|(p, c)| *p == "*" || p == c)
}

/// Strip trailing slashes for whole-string comparison; the root path stays `/`
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}
