//! Namespace helpers.  Pure string functions; none of them touch stored state.

use crate::{StoreError, StoreResult};

/// Separator between path segments of a key.
pub const NAMESPACE_DELIMITER: char = ':';

/// Join segments into a namespace: `make_namespace(["C", "inputs"]) == "C:inputs"`.
pub fn make_namespace<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, seg) in segments.into_iter().enumerate() {
        if i > 0 {
            out.push(NAMESPACE_DELIMITER);
        }
        out.push_str(seg.as_ref());
    }
    out
}

/// Qualify `key` with an optional namespace.
pub fn qualify(namespace: Option<&str>, key: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => make_namespace([ns, key]),
        _ => key.to_owned(),
    }
}

/// Split a key into its segments, rejecting empty keys and empty segments.
pub fn split_key(key: &str) -> StoreResult<Vec<&str>> {
    let segments: Vec<&str> = key.split(NAMESPACE_DELIMITER).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(StoreError::InvalidKey(key.to_owned()));
    }
    Ok(segments)
}
