use once_cell::sync::Lazy;
use regex::Regex;

/// Expand common typographic ligatures that OCR engines emit for book type.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    WS_RE.replace_all(text, " ").trim().to_string()
}

/// Length in characters. Title budgets count characters, not UTF-8 bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cut `text` to at most `max` characters and drop any trailing whitespace
/// left by the cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// Keep only ASCII digits.
pub fn strip_non_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keep only ASCII digits and `X`/`x` (upper-cased), for ISBN-10 check characters.
pub fn strip_to_isbn_chars(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Byte offset of the last whole-word, case-sensitive occurrence of `word`.
fn rfind_word(text: &str, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let mut end = text.len();
    while let Some(pos) = text[..end].rfind(word) {
        let before_ok = text[..pos]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = text[pos + word.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(pos);
        }
        end = pos;
    }
    None
}

/// Whether `term` occurs starting at a word boundary, so `STAIN` matches
/// `STAINED` but not `SUSTAINABLE`.
pub fn contains_at_word_start(text: &str, term: &str) -> bool {
    !term.is_empty()
        && text.match_indices(term).any(|(pos, _)| {
            text[..pos]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric())
        })
}

/// Replace the last whole-word occurrence of `word` with `replacement`.
///
/// Returns `None` when `word` does not occur as a whole word.
pub fn replace_last_word(text: &str, word: &str, replacement: &str) -> Option<String> {
    let pos = rfind_word(text, word)?;
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..pos]);
    out.push_str(replacement);
    out.push_str(&text[pos + word.len()..]);
    Some(collapse_whitespace(&out))
}

/// Remove the last whole-word occurrence of `word`, collapsing the gap.
pub fn remove_last_word(text: &str, word: &str) -> Option<String> {
    replace_last_word(text, word, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ligatures() {
        assert_eq!(expand_ligatures("ﬁrst ﬂoor"), "first floor");
        assert_eq!(expand_ligatures("no ligatures here"), "no ligatures here");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n b\t\tc "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("Café Society", 4), "Café");
        assert_eq!(truncate_chars("abc", 10), "abc");
        // Trailing space from the cut is dropped
        assert_eq!(truncate_chars("one two", 4), "one");
    }

    #[test]
    fn test_strip_helpers() {
        assert_eq!(strip_non_digits("978-0-947163-61-7"), "9780947163617");
        assert_eq!(strip_to_isbn_chars("0-8044-2957-x"), "080442957X");
    }

    #[test]
    fn test_replace_last_word_whole_word_only() {
        assert_eq!(
            replace_last_word("Bookish Book by Ann Book", "Book", "").as_deref(),
            Some("Bookish Book by Ann")
        );
        assert_eq!(replace_last_word("Bookish", "Book", ""), None);
        assert_eq!(
            replace_last_word("Dune by Frank Herbert Hardcover Book", "Hardcover", "HC")
                .as_deref(),
            Some("Dune by Frank Herbert HC Book")
        );
    }

    #[test]
    fn test_contains_at_word_start() {
        assert!(contains_at_word_start("SMALL STAINED AREA", "STAIN"));
        assert!(contains_at_word_start("STAIN", "STAIN"));
        assert!(contains_at_word_start("RE-STAINED", "STAIN"));
        assert!(!contains_at_word_start("SUSTAINABLE", "STAIN"));
        assert!(!contains_at_word_start("anything", ""));
    }

    #[test]
    fn test_remove_last_word_missing() {
        assert_eq!(remove_last_word("Dune by Frank Herbert", "Textbook"), None);
    }
}
