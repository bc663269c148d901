use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::cascade::{Matcher, first_match};
use crate::normalize::NormalizedText;

/// Spelled-out ordinals recognized in edition statements, in numeric order.
const SPELLED_ORDINALS: [&str; 20] = [
    "FIRST",
    "SECOND",
    "THIRD",
    "FOURTH",
    "FIFTH",
    "SIXTH",
    "SEVENTH",
    "EIGHTH",
    "NINTH",
    "TENTH",
    "ELEVENTH",
    "TWELFTH",
    "THIRTEENTH",
    "FOURTEENTH",
    "FIFTEENTH",
    "SIXTEENTH",
    "SEVENTEENTH",
    "EIGHTEENTH",
    "NINETEENTH",
    "TWENTIETH",
];

/// Ordinals checked by the exact-phrase tier (`FIRST EDITION` … `EIGHTH EDITION`).
const EXACT_PHRASE_ORDINALS: usize = 8;

/// One strategy in the edition cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditionTier {
    /// `THIRD EDITION`, checked in list order First → Eighth.
    ExactPhrase,
    /// `3 EDITION` or `EDITION 3`.
    NumeralEdition,
    /// `3RD EDITION`.
    OrdinalNumeralEdition,
    /// Any spelled ordinal up to Twentieth, tolerant of spacing.
    SpelledOrdinal,
    /// `2ND ED.`, `2 ED.`, `SECOND ED.`
    Abbreviated,
}

impl EditionTier {
    pub const DEFAULT_ORDER: &'static [EditionTier] = &[
        EditionTier::ExactPhrase,
        EditionTier::NumeralEdition,
        EditionTier::OrdinalNumeralEdition,
        EditionTier::SpelledOrdinal,
        EditionTier::Abbreviated,
    ];

    fn find_upper(self, upper: &str) -> Option<String> {
        static NUMERAL_EDITION: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b(\d{1,2})\s+EDITION\b|\bEDITION\s+(\d{1,2})\b").unwrap()
        });
        static ORDINAL_NUMERAL_EDITION: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b(\d{1,2})\s?(?:ST|ND|RD|TH)\s+EDITION\b").unwrap()
        });
        static SPELLED_EDITION: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!(r"\b({})\s+EDITION\b", SPELLED_ORDINALS.join("|"))).unwrap()
        });
        static ABBREVIATED: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!(
                r"\b(?:(\d{{1,2}})\s?(?:ST|ND|RD|TH)?|({}))\s*ED\.",
                SPELLED_ORDINALS.join("|")
            ))
            .unwrap()
        });

        match self {
            EditionTier::ExactPhrase => SPELLED_ORDINALS[..EXACT_PHRASE_ORDINALS]
                .iter()
                .find(|ordinal| upper.contains(&format!("{ordinal} EDITION")))
                .map(|ordinal| spelled_edition(ordinal)),
            EditionTier::NumeralEdition => {
                let caps = NUMERAL_EDITION.captures(upper)?;
                let digits = caps.get(1).or_else(|| caps.get(2))?;
                numeric_edition(digits.as_str())
            }
            EditionTier::OrdinalNumeralEdition => {
                let caps = ORDINAL_NUMERAL_EDITION.captures(upper)?;
                numeric_edition(&caps[1])
            }
            EditionTier::SpelledOrdinal => {
                let caps = SPELLED_EDITION.captures(upper)?;
                Some(spelled_edition(&caps[1]))
            }
            EditionTier::Abbreviated => {
                let caps = ABBREVIATED.captures(upper)?;
                match (caps.get(1), caps.get(2)) {
                    (Some(digits), _) => numeric_edition(digits.as_str()),
                    (None, Some(word)) => Some(spelled_edition(word.as_str())),
                    (None, None) => None,
                }
            }
        }
    }
}

impl Matcher for EditionTier {
    type Output = String;

    fn name(&self) -> &'static str {
        match self {
            EditionTier::ExactPhrase => "exact_phrase",
            EditionTier::NumeralEdition => "numeral_edition",
            EditionTier::OrdinalNumeralEdition => "ordinal_numeral_edition",
            EditionTier::SpelledOrdinal => "spelled_ordinal",
            EditionTier::Abbreviated => "abbreviated",
        }
    }

    fn find(&self, text: &NormalizedText) -> Option<String> {
        self.find_upper(&text.text().to_uppercase())
    }
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th … 11th, 12th, 13th … 21st.
pub fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `"3"` → `"3rd Edition"`. Zero is not an edition.
fn numeric_edition(digits: &str) -> Option<String> {
    let n: u32 = digits.parse().ok().filter(|n| *n > 0)?;
    Some(format!("{n}{} Edition", ordinal_suffix(n)))
}

/// `"THIRD"` → `"Third Edition"`.
fn spelled_edition(ordinal: &str) -> String {
    let lower = ordinal.to_lowercase();
    let mut chars = lower.chars();
    let word = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{word} Edition")
}

/// Find an edition statement in OCR text and return it in title case
/// (`"Third Edition"`, `"3rd Edition"`). `None` when no tier matches.
pub fn extract_edition(text: &NormalizedText) -> Option<String> {
    let (tier, edition) = first_match(EditionTier::DEFAULT_ORDER, text)?;
    tracing::debug!(edition = %edition, tier = tier.name(), "edition extracted");
    Some(edition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edition(s: &str) -> Option<String> {
        extract_edition(&NormalizedText::from(s))
    }

    #[test]
    fn test_exact_phrase() {
        assert_eq!(edition("THIRD EDITION").as_deref(), Some("Third Edition"));
        assert_eq!(edition("a first edition copy").as_deref(), Some("First Edition"));
    }

    #[test]
    fn test_exact_phrase_list_order() {
        // Both present: the list is walked First → Eighth
        assert_eq!(
            edition("THIRD EDITION revised from the SECOND EDITION").as_deref(),
            Some("Second Edition")
        );
    }

    #[test]
    fn test_exact_phrase_across_lines() {
        assert_eq!(edition("FIFTH\nEDITION").as_deref(), Some("Fifth Edition"));
    }

    #[test]
    fn test_numeral_edition_both_orders() {
        assert_eq!(edition("3 EDITION").as_deref(), Some("3rd Edition"));
        assert_eq!(edition("Edition 2").as_deref(), Some("2nd Edition"));
    }

    #[test]
    fn test_ordinal_numeral_edition() {
        assert_eq!(edition("Calculus 3rd edition").as_deref(), Some("3rd Edition"));
        assert_eq!(edition("11TH EDITION").as_deref(), Some("11th Edition"));
        assert_eq!(edition("21 ST EDITION").as_deref(), Some("21st Edition"));
    }

    #[test]
    fn test_spelled_beyond_exact_list() {
        assert_eq!(edition("TWELFTH EDITION").as_deref(), Some("Twelfth Edition"));
        assert_eq!(edition("NINTH EDITION").as_deref(), Some("Ninth Edition"));
    }

    #[test]
    fn test_abbreviated() {
        assert_eq!(edition("Physics 2nd ed. Wiley").as_deref(), Some("2nd Edition"));
        assert_eq!(edition("SECOND ED.").as_deref(), Some("Second Edition"));
        assert_eq!(edition("4 ED.").as_deref(), Some("4th Edition"));
    }

    #[test]
    fn test_no_edition() {
        assert_eq!(edition(""), None);
        assert_eq!(edition("EDITED BY JOHN SMITH"), None);
        assert_eq!(edition("EDITION 2019"), None);
        assert_eq!(edition("0 EDITION"), None);
    }

    #[test]
    fn test_ordinal_suffix() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (111, "th"),
            (101, "st"),
        ];
        for (n, suffix) in cases {
            assert_eq!(ordinal_suffix(n), suffix, "n = {n}");
        }
    }
}
