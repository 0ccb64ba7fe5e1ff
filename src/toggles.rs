//! Feature toggles.
//!
//! The document's `toggles` map switches optional pieces of the page on and
//! off: whole sections (`news`, `projects`, `blog`, ...), navigation items and
//! sidebar actions that name a `toggle` key. Anything the map doesn't mention
//! keeps the caller's fallback, which is usually "enabled".

use crate::types::Toggles;

/// Decide whether a toggle-gated element is shown.
///
/// - no key → `fallback`, whatever the map contains
/// - key not in the map → `fallback`
/// - key in the map → the mapped value
pub fn is_enabled(key: Option<&str>, toggles: &Toggles, fallback: bool) -> bool {
    match key {
        Some(key) => toggles.get(key).copied().unwrap_or(fallback),
        None => fallback,
    }
}
