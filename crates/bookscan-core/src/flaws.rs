use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::normalize::NormalizedText;
use crate::text_processing::contains_at_word_start;

/// Condition flaws a listing can disclose.
///
/// Serialized as the upper-snake key (`WATER_DAMAGE`), which is also the
/// phrase matched against OCR text with `_` read as a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlawTag {
    CoverCrease,
    WaterDamage,
    Foxing,
    Yellowing,
    BindingIssue,
    Warped,
    DirtResidue,
    Highlighting,
    Writing,
    TornPages,
    MissingDustJacket,
    DigitalCode,
}

impl FlawTag {
    pub const ALL: [FlawTag; 12] = [
        FlawTag::CoverCrease,
        FlawTag::WaterDamage,
        FlawTag::Foxing,
        FlawTag::Yellowing,
        FlawTag::BindingIssue,
        FlawTag::Warped,
        FlawTag::DirtResidue,
        FlawTag::Highlighting,
        FlawTag::Writing,
        FlawTag::TornPages,
        FlawTag::MissingDustJacket,
        FlawTag::DigitalCode,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FlawTag::CoverCrease => "COVER_CREASE",
            FlawTag::WaterDamage => "WATER_DAMAGE",
            FlawTag::Foxing => "FOXING",
            FlawTag::Yellowing => "YELLOWING",
            FlawTag::BindingIssue => "BINDING_ISSUE",
            FlawTag::Warped => "WARPED",
            FlawTag::DirtResidue => "DIRT_RESIDUE",
            FlawTag::Highlighting => "HIGHLIGHTING",
            FlawTag::Writing => "WRITING",
            FlawTag::TornPages => "TORN_PAGES",
            FlawTag::MissingDustJacket => "MISSING_DUST_JACKET",
            FlawTag::DigitalCode => "DIGITAL_CODE",
        }
    }

    /// The key as an upper-case phrase: `WATER DAMAGE`.
    pub fn label(self) -> String {
        self.key().replace('_', " ")
    }

    /// Human-readable wording for the listing's condition notes.
    pub fn description(self) -> &'static str {
        match self {
            FlawTag::CoverCrease => "Cover shows creasing or bends",
            FlawTag::WaterDamage => "Signs of water damage or moisture exposure",
            FlawTag::Foxing => "Foxing (brown age spots) on pages",
            FlawTag::Yellowing => "Pages are yellowed or tanned with age",
            FlawTag::BindingIssue => "Binding is loose, cracked, or otherwise damaged",
            FlawTag::Warped => "Book is warped",
            FlawTag::DirtResidue => "Stains, dirt, or sticker residue present",
            FlawTag::Highlighting => "Contains highlighting or underlining",
            FlawTag::Writing => "Contains writing, notes, or inscriptions",
            FlawTag::TornPages => "One or more pages are torn",
            FlawTag::MissingDustJacket => "Dust jacket is missing",
            FlawTag::DigitalCode => {
                "Any digital access or download code may be used or missing and is not guaranteed"
            }
        }
    }

    pub fn from_key(key: &str) -> Option<FlawTag> {
        FlawTag::ALL
            .into_iter()
            .find(|tag| tag.key().eq_ignore_ascii_case(key.trim()))
    }
}

/// A loose term that implies a flaw (`STAIN` → `DIRT_RESIDUE`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlawSynonym {
    pub term: String,
    pub tag: FlawTag,
}

impl FlawSynonym {
    pub fn new(term: impl Into<String>, tag: FlawTag) -> Self {
        Self {
            term: term.into(),
            tag,
        }
    }
}

/// Built-in synonym table, matched case-insensitively at the start of a word
/// (`WARP` finds `WARPED`, `CREASE` does not find `INCREASE`).
pub(crate) const DEFAULT_SYNONYMS: &[(&str, FlawTag)] = &[
    ("CREASE", FlawTag::CoverCrease),
    ("BENT COVER", FlawTag::CoverCrease),
    ("WATER STAIN", FlawTag::WaterDamage),
    ("MOISTURE", FlawTag::WaterDamage),
    ("FOXED", FlawTag::Foxing),
    ("AGE SPOT", FlawTag::Foxing),
    ("YELLOWED", FlawTag::Yellowing),
    ("TANNED", FlawTag::Yellowing),
    ("TONED PAGES", FlawTag::Yellowing),
    ("LOOSE BINDING", FlawTag::BindingIssue),
    ("CRACKED SPINE", FlawTag::BindingIssue),
    ("LOOSE PAGES", FlawTag::BindingIssue),
    ("WARP", FlawTag::Warped),
    ("STAIN", FlawTag::DirtResidue),
    ("SMUDGE", FlawTag::DirtResidue),
    ("STICKER RESIDUE", FlawTag::DirtResidue),
    ("HIGHLIGHT", FlawTag::Highlighting),
    ("UNDERLIN", FlawTag::Highlighting),
    ("INSCRIPTION", FlawTag::Writing),
    ("INSCRIBED", FlawTag::Writing),
    ("MARGINALIA", FlawTag::Writing),
    ("PENCIL MARK", FlawTag::Writing),
    ("TORN", FlawTag::TornPages),
    ("RIPPED", FlawTag::TornPages),
    ("NO DUST JACKET", FlawTag::MissingDustJacket),
    ("WITHOUT DUST JACKET", FlawTag::MissingDustJacket),
    ("ACCESS CODE", FlawTag::DigitalCode),
    ("DOWNLOAD CODE", FlawTag::DigitalCode),
    ("ONLINE CODE", FlawTag::DigitalCode),
];

pub(crate) fn default_synonyms() -> Vec<FlawSynonym> {
    DEFAULT_SYNONYMS
        .iter()
        .map(|(term, tag)| FlawSynonym::new(*term, *tag))
        .collect()
}

/// The set of flaws detected in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlawReport {
    tags: BTreeSet<FlawTag>,
    any_detected: bool,
}

impl FlawReport {
    /// Returns `true` if the tag was newly added.
    pub fn insert(&mut self, tag: FlawTag) -> bool {
        self.any_detected = true;
        self.tags.insert(tag)
    }

    pub fn contains(&self, tag: FlawTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn any_detected(&self) -> bool {
        self.any_detected
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = FlawTag> + '_ {
        self.tags.iter().copied()
    }

    /// `(key, description)` pairs in tag order.
    pub fn descriptions(&self) -> Vec<(&'static str, &'static str)> {
        self.tags().map(|t| (t.key(), t.description())).collect()
    }
}

/// Exact label, or every significant word of a multi-word label.
fn label_matches(upper: &str, tag: FlawTag) -> bool {
    let label = tag.label();
    if upper.contains(&label) {
        return true;
    }
    let words: Vec<&str> = label.split(' ').filter(|w| w.len() > 2).collect();
    label.contains(' ') && !words.is_empty() && words.iter().all(|w| upper.contains(w))
}

/// Detect condition flaws mentioned in OCR text (seller notes, stickers,
/// inserts). An empty report is a normal outcome.
pub fn detect_flaws(text: &NormalizedText) -> FlawReport {
    detect_flaws_with_config(text, &ScanConfig::default())
}

/// Config-aware version of [`detect_flaws`].
pub(crate) fn detect_flaws_with_config(text: &NormalizedText, config: &ScanConfig) -> FlawReport {
    let upper = text.text().to_uppercase();
    let mut report = FlawReport::default();
    if upper.is_empty() {
        return report;
    }

    for tag in FlawTag::ALL {
        if label_matches(&upper, tag) {
            report.insert(tag);
        }
    }

    for synonym in config.flaw_synonyms() {
        if !report.contains(synonym.tag)
            && contains_at_word_start(&upper, &synonym.term.to_uppercase())
        {
            tracing::trace!(term = %synonym.term, tag = synonym.tag.key(), "flaw synonym hit");
            report.insert(synonym.tag);
        }
    }

    if report.any_detected() {
        tracing::debug!(
            flaws = ?report.tags().map(FlawTag::key).collect::<Vec<_>>(),
            "flaws detected"
        );
    }
    report
}
