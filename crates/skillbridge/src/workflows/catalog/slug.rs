use std::collections::HashSet;

/// Slug used when a name has no ASCII letters or digits.
pub const FALLBACK_SLUG: &str = "untitled";

/// Lowercase ASCII slug: alphanumerics are kept and every other run of
/// characters collapses to a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// First free slug for `name`: the plain slug, then `-1`, `-2`, ...
pub fn unique_slug<S: AsRef<str>>(name: &str, taken: &[S]) -> String {
    let taken: HashSet<&str> = taken.iter().map(AsRef::as_ref).collect();
    let base = slugify(name);
    if !taken.contains(base.as_str()) {
        return base;
    }

    let mut suffix: u64 = 1;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        suffix += 1;
    }
}
