//! URL slugs for organizations and projects.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("Invalid slug regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Derive a slug: strip accents, drop punctuation, join words with `-`,
/// lowercase.
///
/// ```
/// assert_eq!(saas_core::slug::create_slug("Acme Inc."), "acme-inc");
/// assert_eq!(saas_core::slug::create_slug("Café Olé"), "cafe-ole");
/// ```
pub fn create_slug(text: &str) -> String {
    let folded: String = text.nfd().filter(|c| !is_combining_diacritic(*c)).collect();
    let cleaned = NON_WORD.replace_all(&folded, "");
    WHITESPACE.replace_all(&cleaned, "-").to_lowercase()
}

/// Combining Diacritical Marks block.
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(create_slug("Acme Inc"), "acme-inc");
        assert_eq!(create_slug("My  Project   Name"), "my-project-name");
    }

    #[test]
    fn test_strips_accents() {
        assert_eq!(create_slug("Organização Ação"), "organizacao-acao");
        assert_eq!(create_slug("Crème Brûlée"), "creme-brulee");
        // Decomposed form: "e" followed by a combining acute accent.
        assert_eq!(create_slug("Cafe\u{0301}"), "cafe");
    }

    #[test]
    fn test_folds_letters_beyond_latin_1() {
        assert_eq!(create_slug("Việt Nam"), "viet-nam");
        assert_eq!(create_slug("Ǎrvo Ṭech"), "arvo-tech");
        assert_eq!(create_slug("Łódź"), "odz");
    }

    #[test]
    fn test_drops_punctuation_but_keeps_dashes_and_underscores() {
        assert_eq!(create_slug("Hello, World!"), "hello-world");
        assert_eq!(create_slug("rocket_seat - app"), "rocket_seat---app");
        assert_eq!(create_slug("100% @wesome"), "100-wesome");
    }

    #[test]
    fn test_non_latin_characters_are_dropped() {
        assert_eq!(create_slug("東京 Tokyo"), "-tokyo");
        assert_eq!(create_slug(""), "");
    }
}
