//! Anchor generation for headers and footnotes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid regex"));

/// Lowercased anchor for `input`. Whitespace and underscores turn into
/// hyphens and other punctuation is dropped; hyphen runs collapse to one
/// and are trimmed at both ends.
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();

    let cleaned = lowercased
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if matches!(g, " " | "_" | "\t" | "\n") {
                Some("-")
            } else if c.is_ascii_alphanumeric() || c == '-' || c.is_alphabetic() {
                Some(g)
            } else {
                None
            }
        })
        .collect::<String>();

    let collapsed = HYPHEN_RUNS.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// Slug of `input` that is not yet in `taken`, registering it.
///
/// Collisions get a `-2`, `-3`, ... suffix. An empty slug falls back to
/// `fallback`.
pub fn unique_slug(input: &str, fallback: &str, taken: &mut HashSet<String>) -> String {
    let mut base = slugify(input);
    if base.is_empty() {
        base = fallback.to_string();
    }

    let mut candidate = base.clone();
    let mut counter = 1;
    while taken.contains(&candidate) {
        counter += 1;
        candidate = format!("{}-{}", base, counter);
    }
    taken.insert(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Rust & Safety"), "rust-safety");
        assert_eq!(slugify("What's new?"), "whats-new");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(slugify("Café"), "café");
    }

    #[test]
    fn test_leading_trailing_hyphens() {
        assert_eq!(slugify("  Hello World  "), "hello-world");
        assert_eq!(slugify("hello_world"), "hello-world");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_unique_slug() {
        let mut taken = HashSet::new();
        assert_eq!(unique_slug("Intro", "header", &mut taken), "intro");
        assert_eq!(unique_slug("Intro", "header", &mut taken), "intro-2");
        assert_eq!(unique_slug("intro!", "header", &mut taken), "intro-3");
        assert_eq!(unique_slug("???", "header", &mut taken), "header");
    }
}
