use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cascade::{Matcher, first_match};
use crate::config::ScanConfig;
use crate::normalize::NormalizedText;
use crate::text_processing::{strip_non_digits, strip_to_isbn_chars};

/// Which identifier length a tier looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IsbnKind {
    Isbn13,
    Isbn10,
}

/// One strategy in the ISBN cascade.
///
/// The variants are listed loosest-last within each length. See
/// [`IsbnTier::DEFAULT_ORDER`] for the order they are tried in.
///
/// Serde names match [`IsbnTier::name`], so a tier copied from log or CLI
/// output can be pasted into `[isbn] tiers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsbnTier {
    /// A line carrying the literal `ISBN:` marker; every digit on the line.
    LabelLine,
    /// `9 780947 163617` barcode caption, searched line by line.
    SpacedBarcodeLine,
    /// `ISBN 978-0-947163-61-7` anywhere in the text.
    #[serde(rename = "labelled_delimited_13")]
    LabelledDelimited13,
    /// Barcode caption across the joined text (survives line splits).
    SpacedBarcodeText,
    /// Hyphen/space tolerant ISBN-13, label optional.
    #[serde(rename = "labelled_13")]
    Labelled13,
    /// Thirteen contiguous digits starting 978/979, even inside other tokens.
    #[serde(rename = "unlabelled_13")]
    Unlabelled13,
    /// Every non-digit removed from the text, then scanned for 978/979.
    #[serde(rename = "digit_stream_13")]
    DigitStream13,
    /// `ISBN-10: 0-306-40615-2`.
    #[serde(rename = "labelled_10")]
    Labelled10,
    /// Unlabelled four-group hyphenated form, `0-306-40615-2`.
    #[serde(rename = "hyphenated_10")]
    Hyphenated10,
    /// Bare nine digits plus a digit or `X`.
    #[serde(rename = "unlabelled_10")]
    Unlabelled10,
}

impl IsbnTier {
    /// Every ISBN-13 tier runs before any ISBN-10 tier, so a 13-digit hit
    /// always wins over a 10-digit one.
    pub const DEFAULT_ORDER: &'static [IsbnTier] = &[
        IsbnTier::LabelLine,
        IsbnTier::SpacedBarcodeLine,
        IsbnTier::LabelledDelimited13,
        IsbnTier::SpacedBarcodeText,
        IsbnTier::Labelled13,
        IsbnTier::Unlabelled13,
        IsbnTier::DigitStream13,
        IsbnTier::Labelled10,
        IsbnTier::Hyphenated10,
        IsbnTier::Unlabelled10,
    ];

    pub fn kind(self) -> IsbnKind {
        match self {
            IsbnTier::Labelled10 | IsbnTier::Hyphenated10 | IsbnTier::Unlabelled10 => {
                IsbnKind::Isbn10
            }
            _ => IsbnKind::Isbn13,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IsbnTier::LabelLine => "label_line",
            IsbnTier::SpacedBarcodeLine => "spaced_barcode_line",
            IsbnTier::LabelledDelimited13 => "labelled_delimited_13",
            IsbnTier::SpacedBarcodeText => "spaced_barcode_text",
            IsbnTier::Labelled13 => "labelled_13",
            IsbnTier::Unlabelled13 => "unlabelled_13",
            IsbnTier::DigitStream13 => "digit_stream_13",
            IsbnTier::Labelled10 => "labelled_10",
            IsbnTier::Hyphenated10 => "hyphenated_10",
            IsbnTier::Unlabelled10 => "unlabelled_10",
        }
    }

    /// Cleaned candidate strings in order of appearance. Not yet validated.
    pub fn candidates(self, text: &NormalizedText) -> Vec<String> {
        static SPACED_BARCODE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b9\s+78(?:\s*\d){10}\b").unwrap());
        static LABELLED_DELIMITED_13: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)\bISBN(?:[-\s]?13)?\s*[:#]?\s*(97[89](?:[-\s]?\d){10})\b").unwrap()
        });
        static LABELLED_13: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)(?:\bISBN(?:[-\s]?13)?\s*[:#]?\s*)?\b(97[89](?:[-\s]?\d){10})\b")
                .unwrap()
        });
        static RUN_13: Lazy<Regex> = Lazy::new(|| Regex::new(r"97[89]\d{10}").unwrap());
        static LABELLED_10: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)\bISBN(?:[-\s]?10)?\s*[:#]?\s*(\d(?:[-\s]?\d){8}[-\s]?[\dX])\b")
                .unwrap()
        });
        static HYPHENATED_10: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b(\d{1,5}-\d{1,7}-\d{1,7}-[\dXx])\b").unwrap());
        static UNLABELLED_10: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b(\d{9}[\dXx])\b").unwrap());

        match self {
            IsbnTier::LabelLine => text
                .lines()
                .iter()
                .filter(|line| line.to_ascii_uppercase().contains("ISBN:"))
                .map(|line| strip_non_digits(line))
                .collect(),
            IsbnTier::SpacedBarcodeLine => text
                .lines()
                .iter()
                .flat_map(|line| SPACED_BARCODE.find_iter(line).map(|m| squash(m.as_str())))
                .collect(),
            IsbnTier::LabelledDelimited13 => {
                capture_group(&LABELLED_DELIMITED_13, text.text(), strip_non_digits)
            }
            IsbnTier::SpacedBarcodeText => SPACED_BARCODE
                .find_iter(text.text())
                .map(|m| squash(m.as_str()))
                .collect(),
            IsbnTier::Labelled13 => capture_group(&LABELLED_13, text.text(), strip_non_digits),
            IsbnTier::Unlabelled13 => RUN_13
                .find_iter(text.text())
                .map(|m| m.as_str().to_string())
                .collect(),
            IsbnTier::DigitStream13 => RUN_13
                .find_iter(&strip_non_digits(text.text()))
                .map(|m| m.as_str().to_string())
                .collect(),
            IsbnTier::Labelled10 => {
                capture_group(&LABELLED_10, text.text(), strip_to_isbn_chars)
            }
            IsbnTier::Hyphenated10 => {
                capture_group(&HYPHENATED_10, text.text(), strip_to_isbn_chars)
            }
            IsbnTier::Unlabelled10 => {
                capture_group(&UNLABELLED_10, text.text(), strip_to_isbn_chars)
            }
        }
    }
}

fn squash(s: &str) -> String {
    s.split_whitespace().collect()
}

/// Group 1 of every match, cleaned.
fn capture_group(re: &Regex, haystack: &str, clean: fn(&str) -> String) -> Vec<String> {
    re.captures_iter(haystack)
        .filter_map(|caps| caps.get(1).map(|m| clean(m.as_str())))
        .collect()
}

/// An ISBN recovered from OCR text, tagged with the tier that found it.
///
/// Only the cascade builds candidates, so `value` always has the shape of
/// its tier's [`IsbnKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsbnCandidate {
    value: String,
    tier: IsbnTier,
}

impl IsbnCandidate {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn tier(&self) -> IsbnTier {
        self.tier
    }

    pub fn kind(&self) -> IsbnKind {
        self.tier.kind()
    }

    /// The ISBN-13 form of this identifier. ISBN-10 values get the `978`
    /// prefix and a recomputed check digit.
    pub fn to_isbn13(&self) -> String {
        match self.kind() {
            IsbnKind::Isbn13 => self.value.clone(),
            IsbnKind::Isbn10 => {
                let Some(body) = self.value.get(..9) else {
                    return self.value.clone();
                };
                let mut isbn13 = format!("978{body}");
                let check = isbn13_check_digit(&isbn13);
                isbn13.push(char::from(b'0' + check));
                isbn13
            }
        }
    }
}

/// Thirteen ASCII digits with a `978`/`979` prefix.
pub fn is_valid_isbn13(s: &str) -> bool {
    s.len() == 13
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s.starts_with("978") || s.starts_with("979"))
}

/// Nine ASCII digits followed by a digit or `X`.
pub fn is_valid_isbn10(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[..9].iter().all(|b| b.is_ascii_digit())
        && (bytes[9].is_ascii_digit() || bytes[9] == b'X')
}

fn isbn13_check_digit(first12: &str) -> u8 {
    let sum: u32 = first12
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// Weighted 1/3 mod-10 check over all thirteen digits.
pub fn isbn13_checksum_valid(s: &str) -> bool {
    is_valid_isbn13(s) && isbn13_check_digit(&s[..12]) == s.as_bytes()[12] - b'0'
}

/// Weighted 10..1 mod-11 check; a trailing `X` counts as 10.
pub fn isbn10_checksum_valid(s: &str) -> bool {
    if !is_valid_isbn10(s) {
        return false;
    }
    let sum: u32 = s
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = if b == b'X' { 10 } else { u32::from(b - b'0') };
            (10 - i as u32) * d
        })
        .sum();
    sum % 11 == 0
}

/// A tier bound to the validation policy from [`ScanConfig`].
#[derive(Debug, Clone, Copy)]
pub struct IsbnStrategy {
    pub tier: IsbnTier,
    pub verify_checksum: bool,
}

impl IsbnStrategy {
    fn accepts(&self, value: &str) -> bool {
        match (self.tier.kind(), self.verify_checksum) {
            (IsbnKind::Isbn13, false) => is_valid_isbn13(value),
            (IsbnKind::Isbn13, true) => isbn13_checksum_valid(value),
            (IsbnKind::Isbn10, false) => is_valid_isbn10(value),
            (IsbnKind::Isbn10, true) => isbn10_checksum_valid(value),
        }
    }
}

impl Matcher for IsbnStrategy {
    type Output = IsbnCandidate;

    fn name(&self) -> &'static str {
        self.tier.name()
    }

    fn find(&self, text: &NormalizedText) -> Option<IsbnCandidate> {
        self.tier
            .candidates(text)
            .into_iter()
            .find(|value| self.accepts(value))
            .map(|value| IsbnCandidate {
                value,
                tier: self.tier,
            })
    }
}

/// Recover the best ISBN from normalized OCR text.
///
/// Tries each tier of [`IsbnTier::DEFAULT_ORDER`] and returns the first valid
/// candidate of the first tier that has one. `None` is a normal outcome:
/// callers fall back to manual entry.
pub fn extract_isbn(text: &NormalizedText) -> Option<IsbnCandidate> {
    extract_isbn_with_config(text, &ScanConfig::default())
}

/// Config-aware version of [`extract_isbn`].
pub(crate) fn extract_isbn_with_config(
    text: &NormalizedText,
    config: &ScanConfig,
) -> Option<IsbnCandidate> {
    let strategies: Vec<IsbnStrategy> = config
        .isbn_tiers()
        .into_iter()
        .map(|tier| IsbnStrategy {
            tier,
            verify_checksum: config.verify_isbn_checksum,
        })
        .collect();

    let (_, candidate) = first_match(&strategies, text)?;
    tracing::debug!(isbn = %candidate.value, tier = candidate.tier.name(), "isbn extracted");
    Some(candidate)
}
