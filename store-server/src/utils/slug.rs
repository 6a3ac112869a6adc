//! URL slug derivation
//!
//! Slugs are always derived from the display name, never edited directly.
//! Renaming a record therefore changes its public URL.

/// Derive a URL slug from a display name.
///
/// Alphanumeric characters are kept (lowercased); every other run of
/// characters collapses into a single hyphen. Leading and trailing hyphens
/// are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lc in c.to_lowercase() {
                slug.push(lc);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
