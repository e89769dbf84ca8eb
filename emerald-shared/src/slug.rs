//! URL slug generation
//!
//! Slugs are derived from display names for projects, modules and portfolio
//! entries. The transformation is:
//!
//! 1. Lower-case the name
//! 2. Collapse every whitespace run into a single `-`
//! 3. Drop every character outside `[a-z0-9_-]`
//!
//! Leading and trailing whitespace is trimmed before step 2. No uniqueness
//! check is made; two names can map to the same slug.
//!
//! # Example
//!
//! ```
//! use emerald_shared::slug::slugify;
//!
//! assert_eq!(slugify("Toko Retail Modern!"), "toko-retail-modern");
//! assert_eq!(slugify("  A   B  "), "a-b");
//! ```

/// Derives a URL-safe slug from a display name
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
            continue;
        }

        in_whitespace = false;
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            slug.push(ch);
        }
    }

    slug
}
