//! Name normalisation helpers.

use crate::item::validation::strip_extension;

/// URL-safe form of an item name.
///
/// Lowercases, strips the file extension, turns whitespace runs into a
/// single hyphen, and drops everything outside `[a-z0-9-]`.
pub fn slugify(name: &str, extension: &str) -> String {
    let lowered = name.to_lowercase();
    let base = strip_extension(&lowered, extension);

    let mut slug = String::with_capacity(base.len());
    let mut in_space = false;
    for ch in base.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        }
    }
    slug
}

/// Produce a copy name that does not collide with any of `siblings`.
///
/// The suffix goes before the last extension: `Chart.mmd` becomes
/// `Chart copy.mmd`, then `Chart copy 2.mmd`, `Chart copy 3.mmd`, ...
pub fn generate_sibling_copy_name<S: AsRef<str>>(original: &str, siblings: &[S]) -> String {
    let (base, ext) = match original.rfind('.') {
        Some(idx) if idx > 0 => original.split_at(idx),
        _ => (original, ""),
    };
    let taken = |candidate: &str| siblings.iter().any(|s| s.as_ref() == candidate);

    let first = format!("{base} copy{ext}");
    if !taken(&first) {
        return first;
    }
    let mut n: u32 = 2;
    loop {
        let candidate = format!("{base} copy {n}{ext}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
