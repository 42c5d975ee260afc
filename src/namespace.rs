//! Namespaced identifiers
//!
//! Identifiers are `"<namespace>:<path>"`. Old data often omits the namespace,
//! so [`normalize`] fills in [`DEFAULT_NAMESPACE`]. Malformed input (upper case,
//! spaces, a second separator, ...) is returned unchanged, which keeps legacy
//! ids like `"Cow"` distinct from their namespaced successors.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Namespace assumed when none is given
pub const DEFAULT_NAMESPACE: &str = "minecraft";

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:([a-z0-9_.\-]*):)?([a-z0-9_.\-/]+)$").expect("identifier pattern is valid")
    })
}

/// Split a well-formed id into `(namespace, path)`.
///
/// A missing or empty namespace becomes [`DEFAULT_NAMESPACE`]. Returns `None`
/// for malformed input.
pub fn split(id: &str) -> Option<(&str, &str)> {
    let captures = id_pattern().captures(id)?;
    let namespace = captures
        .get(1)
        .map(|m| m.as_str())
        .filter(|ns| !ns.is_empty())
        .unwrap_or(DEFAULT_NAMESPACE);
    let path = captures.get(2)?.as_str();
    Some((namespace, path))
}

/// Fully qualify an identifier. Total and idempotent.
pub fn normalize(id: &str) -> Cow<'_, str> {
    match split(id) {
        Some((namespace, path)) => {
            if id.len() == namespace.len() + 1 + path.len() && id.starts_with(namespace) {
                Cow::Borrowed(id)
            } else {
                Cow::Owned(format!("{}:{}", namespace, path))
            }
        }
        None => Cow::Borrowed(id),
    }
}

/// Whether `id` is already in fully qualified form
pub fn is_namespaced(id: &str) -> bool {
    matches!(normalize(id), Cow::Borrowed(_)) && split(id).is_some()
}
