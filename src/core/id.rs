//! OpenAlex identifier normalization
//!
//! Entity IDs are stored with the public base URL stripped and get it
//! re-prepended on the way back out. Both functions are pure and inverse
//! to each other: `prepend(strip(x)) == x` and `strip(prepend(x)) == x`
//! for every well-formed ID, including IDs that never carried the prefix.

/// Public base URL carried by every OpenAlex entity ID.
pub const BASE_URL: &str = "https://openalex.org/";

/// Remove the base URL from an identifier. No-op if the prefix is absent.
pub fn strip_base_url(id: &str) -> &str {
    id.strip_prefix(BASE_URL).unwrap_or(id)
}

/// Prepend the base URL to a stripped identifier. No-op if already present.
pub fn prepend_base_url(id: &str) -> String {
    if id.starts_with(BASE_URL) {
        id.to_string()
    } else {
        format!("{}{}", BASE_URL, id)
    }
}
