//! Listing title composition.
//!
//! The grammar is
//! `MainTitle[: Subtitle] by Author[ Edition] Format BookType[ Fiction]`,
//! measured in characters against the configured budget. Titles that do not
//! fit are handed to [`crate::shorten`].

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::shorten::{
    FICTION_SUFFIX, ShortenRequest, append_fiction, shorten_with_config, trim_title_words,
};
use crate::text_processing::{char_len, collapse_whitespace};

/// Degree and honorific patterns removed from author names, as whole words.
pub(crate) const DEFAULT_CREDENTIAL_PATTERNS: &[&str] = &[
    r"(?i)\bPh\.?\s?D\b\.?",
    r"(?i)\bM\.?D\b\.?",
    r"(?i)\bDr\b\.?",
    r"(?i)\bProf\b\.?",
    r"(?i)\bM\.?S\b\.?",
    r"(?i)\bRDN\b",
    r"(?i)\bCD\b",
];

pub(crate) fn default_credential_patterns() -> &'static [Regex] {
    static COMPILED: Lazy<Vec<Regex>> = Lazy::new(|| {
        DEFAULT_CREDENTIAL_PATTERNS
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect()
    });
    &COMPILED
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookFormat {
    Hardcover,
    #[default]
    Paperback,
}

impl BookFormat {
    /// Map a metadata provider's binding label. Anything that is not
    /// recognizably hardcover is treated as paperback.
    pub fn from_binding(label: &str) -> Self {
        let lower = label.to_lowercase();
        if ["hardcover", "hard cover", "hardback"]
            .iter()
            .any(|h| lower.contains(h))
        {
            BookFormat::Hardcover
        } else {
            BookFormat::Paperback
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookFormat::Hardcover => "Hardcover",
            BookFormat::Paperback => "Paperback",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            BookFormat::Hardcover => "HC",
            BookFormat::Paperback => "PB",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookType {
    #[default]
    Book,
    Cookbook,
    Textbook,
}

impl BookType {
    pub fn label(self) -> &'static str {
        match self {
            BookType::Book => "Book",
            BookType::Cookbook => "Cookbook",
            BookType::Textbook => "Textbook",
        }
    }
}

impl FromStr for BookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "book" => Ok(BookType::Book),
            "cookbook" => Ok(BookType::Cookbook),
            "textbook" => Ok(BookType::Textbook),
            other => Err(format!("unknown book type: {other:?}")),
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeType {
    Fiction,
    NonFiction,
    #[default]
    Unknown,
}

impl FromStr for NarrativeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match key.as_str() {
            "fiction" => Ok(NarrativeType::Fiction),
            "nonfiction" => Ok(NarrativeType::NonFiction),
            "unknown" | "" => Ok(NarrativeType::Unknown),
            _ => Err(format!("unknown narrative type: {s:?}")),
        }
    }
}

/// Everything a listing title is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleComponents {
    pub main_title: String,
    pub subtitle: Option<String>,
    /// Raw author string; may list several people with credentials.
    pub author: String,
    pub edition: Option<String>,
    pub format: BookFormat,
    pub book_type: BookType,
    /// Compound keyword phrase from the classifier. Not emitted.
    pub keyword: Option<String>,
    pub narrative: NarrativeType,
}

impl TitleComponents {
    pub fn new(main_title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            main_title: main_title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn is_fiction(&self) -> bool {
        self.narrative == NarrativeType::Fiction
    }
}

/// Reduce a raw author string to one name without credentials.
///
/// `"Dr. Jane Doe, PhD and John Roe"` → `"Jane Doe"`.
pub fn primary_author(raw: &str) -> String {
    primary_author_with(raw, default_credential_patterns())
}

fn primary_author_with(raw: &str, credentials: &[Regex]) -> String {
    static SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[,;&]|\band\b").unwrap());

    SPLIT_RE
        .split(raw)
        .map(|part| strip_credentials(part, credentials))
        .find(|name| !name.is_empty())
        .unwrap_or_default()
}

/// A lone surname keeps its leading honorific: `"Dr. Seuss"` stays whole.
fn strip_credentials(part: &str, credentials: &[Regex]) -> String {
    let stripped = collapse_whitespace(
        &credentials
            .iter()
            .fold(part.to_string(), |acc, re| re.replace_all(&acc, " ").into_owned()),
    );
    if stripped.is_empty() || stripped.contains(' ') {
        return stripped;
    }

    let part = part.trim();
    credentials
        .iter()
        .filter_map(|re| re.find(part))
        .find(|m| m.start() == 0)
        .map(|honorific| format!("{} {stripped}", honorific.as_str().trim()))
        .unwrap_or(stripped)
}

pub(crate) fn contains_fiction(title: &str) -> bool {
    title.to_lowercase().contains("fiction")
}

/// `Main by Author`, omitting whichever side is empty.
pub(crate) fn title_by_author(main: &str, author: &str) -> String {
    match (main.is_empty(), author.is_empty()) {
        (_, true) => main.to_string(),
        (true, false) => format!("by {author}"),
        (false, false) => format!("{main} by {author}"),
    }
}

/// Compose the full draft title, without a fiction suffix.
pub(crate) fn compose(components: &TitleComponents, author: &str, config: &ScanConfig) -> String {
    let main = collapse_whitespace(&components.main_title);
    let subtitle = components
        .subtitle
        .as_deref()
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty());

    let head = match subtitle {
        Some(sub) if char_len(&main) < config.min_main_title_len => format!("{main}: {sub}"),
        _ => main,
    };

    let mut parts = vec![title_by_author(&head, author)];
    if let Some(edition) = components.edition.as_deref().map(str::trim)
        && !edition.is_empty()
    {
        parts.push(edition.to_string());
    }
    parts.push(components.format.label().to_string());
    parts.push(components.book_type.label().to_string());

    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

/// Build a listing title that fits the default 80-character budget.
pub fn synthesize(components: &TitleComponents) -> String {
    synthesize_with_config(components, &ScanConfig::default())
}

/// Config-aware version of [`synthesize`].
pub(crate) fn synthesize_with_config(components: &TitleComponents, config: &ScanConfig) -> String {
    let budget = config.title_budget;
    let author = primary_author_with(&components.author, &config.credential_patterns());
    let base = compose(components, &author, config);
    let fiction = components.is_fiction();

    if let Some(keyword) = components.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
        tracing::debug!(keyword, "keyword phrase not emitted in title");
    }

    let draft = if fiction && !contains_fiction(&base) {
        format!("{base} Fiction")
    } else {
        base
    };

    let title = if char_len(&draft) <= budget {
        draft
    } else {
        let request = ShortenRequest {
            main_title: collapse_whitespace(&components.main_title),
            author,
            format: components.format,
            book_type: components.book_type,
            fiction,
        };
        shorten_with_config(&draft, &request, config)
    };

    if fiction && !contains_fiction(&title) {
        // Make room at a word boundary before falling back to a hard cut
        let room = budget.saturating_sub(char_len(FICTION_SUFFIX));
        return append_fiction(&trim_title_words(&title, room), budget);
    }
    title
}
