//! URL-safe slug generation.
//!
//! `slugify` is pure; uniqueness is resolved by the owning service, which
//! walks the candidate sequence (`base`, `base-1`, `base-2`, ...) against a
//! database existence check. The check-then-insert window is not locked;
//! a concurrent insert can still collide and surface as a database error.

/// Lowercase, hyphen-separated, ASCII-only rendition of a display name.
///
/// Common Latin accents are folded so Spanish titles produce readable
/// slugs; anything else non-alphanumeric becomes a separator.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());

    for c in input.chars() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        match fold(lower) {
            Some(ch) => slug.push(ch),
            None => {
                if !slug.is_empty() && !slug.ends_with('-') {
                    slug.push('-');
                }
            }
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// The candidate sequence for a base slug: the base itself, then numbered
/// suffixes counting up until the caller finds a free one.
pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((1u32..).map(move |n| format!("{base}-{n}")))
}

fn fold(c: char) -> Option<char> {
    match c {
        'a'..='z' | '0'..='9' => Some(c),
        'á' | 'à' | 'ä' | 'â' | 'ã' => Some('a'),
        'é' | 'è' | 'ë' | 'ê' => Some('e'),
        'í' | 'ì' | 'ï' | 'î' => Some('i'),
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => Some('o'),
        'ú' | 'ù' | 'ü' | 'û' => Some('u'),
        'ñ' => Some('n'),
        'ç' => Some('c'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Test"), "test");
        assert_eq!(slugify("The Rust Programming Language"), "the-rust-programming-language");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Hello --- World!  "), "hello-world");
        assert_eq!(slugify("a/b\\c"), "a-b-c");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Cien Años de Soledad"), "cien-anos-de-soledad");
        assert_eq!(slugify("Poesía Única"), "poesia-unica");
    }

    #[test]
    fn test_slugify_drops_unmappable_chars() {
        assert_eq!(slugify("C++ (2nd ed.)"), "c-2nd-ed");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_candidates_sequence() {
        let mut seq = candidates("test");
        assert_eq!(seq.next().as_deref(), Some("test"));
        assert_eq!(seq.next().as_deref(), Some("test-1"));
        assert_eq!(seq.next().as_deref(), Some("test-2"));
    }
}
