//! URL slugs for public profile pages.

use unicode_normalization::UnicodeNormalization;

/// Longest base slug, before any `-N` suffix
pub const SLUG_MAX_CHARS: usize = 50;

/// Base slug used when a name has no usable characters at all
pub const FALLBACK_SLUG: &str = "business";

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Derives the base slug for a business name
///
/// Accents are folded (`"Salão"` → `"salao"`), anything outside `a-z`, `0-9`,
/// whitespace and `-` is dropped, and runs of whitespace or hyphens become a
/// single `-`.
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut previous_dash = false;
    for c in folded.trim().chars() {
        if c.is_whitespace() || c == '-' {
            if !previous_dash {
                slug.push('-');
            }
            previous_dash = true;
        } else {
            slug.push(c);
            previous_dash = false;
        }
    }

    let slug: String = slug.chars().take(SLUG_MAX_CHARS).collect();
    if slug.chars().any(|c| c.is_ascii_alphanumeric()) {
        slug
    } else {
        FALLBACK_SLUG.to_string()
    }
}

/// Candidate slugs in the order they should be tried: `base`, `base-1`, `base-2`, ...
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((1u32..).map(move |n| format!("{base}-{n}")))
}
