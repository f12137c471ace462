//! # Role/URL permission matching
//!
//! Pure decision function over a principal's role set and a request path.

use crate::auth::types::Role;

/// Decide whether any of `roles` covers `path`.
///
/// Access is granted when a rule's URL exactly equals the path, or when the
/// path contains the rule URL as a substring. The containment check is
/// intentionally loose (`/account` covers `/account/details`); this is the
/// existing semantics, kept as-is. An empty role set always denies.
#[must_use]
pub fn can_access(roles: &[Role], path: &str) -> bool {
    if roles.is_empty() {
        return false;
    }

    roles
        .iter()
        .flat_map(|role| role.rules.iter())
        .any(|rule| rule.url == path || path.contains(&rule.url))
}
