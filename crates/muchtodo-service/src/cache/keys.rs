//! Cache key generators.
//!
//! Usernames are used literally: `Alice` and `alice` are different keys,
//! matching the exact-match lookup in the user collection.

/// Prefix for username availability markers.
pub const USERNAME_TAKEN_PREFIX: &str = "username-taken:";

/// Sentinel whose presence means the username cache was warmed this TTL window.
pub const USERNAME_CACHE_SENTINEL: &str = "username_cache_initialized";

/// Value stored in markers and the sentinel. Only presence is meaningful.
pub const MARKER_VALUE: &str = "true";

/// Key for the "taken" marker of `username`.
#[must_use]
pub fn username_taken(username: &str) -> String {
    format!("{}{}", USERNAME_TAKEN_PREFIX, username)
}
