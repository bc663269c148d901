//! Budget-constrained title shortening.
//!
//! A fixed sequence of [`ShrinkStep`]s, each applied only while the title is
//! still over budget. The sequence ends with a hard cut, so it always
//! terminates with a fitting title.

use serde::Serialize;

use crate::config::ScanConfig;
use crate::text_processing::{
    char_len, collapse_whitespace, remove_last_word, replace_last_word, truncate_chars,
};
use crate::title::{BookFormat, BookType, contains_fiction, title_by_author};

pub(crate) const FICTION_SUFFIX: &str = " Fiction";

/// Word trimming only applies to title portions longer than this.
const TRIM_MIN_TITLE_CHARS: usize = 40;

/// ...and to author portions (`" by Author …"`) shorter than this.
const TRIM_MAX_AUTHOR_CHARS: usize = 35;

/// What the shortener needs to rebuild a minimal title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenRequest {
    pub main_title: String,
    /// Primary author, credentials already stripped.
    pub author: String,
    pub format: BookFormat,
    pub book_type: BookType,
    pub fiction: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkStep {
    /// Hardcover → HC, Paperback → PB.
    AbbreviateFormat,
    /// Remove the book-type token.
    DropBookType,
    /// `MainTitle by Author[ HC][ Fiction]`.
    MinimalForm,
    /// Drop trailing title words, keeping the author portion intact.
    TrimTitleWords,
    HardTruncate,
}

impl ShrinkStep {
    pub const ORDER: [ShrinkStep; 5] = [
        ShrinkStep::AbbreviateFormat,
        ShrinkStep::DropBookType,
        ShrinkStep::MinimalForm,
        ShrinkStep::TrimTitleWords,
        ShrinkStep::HardTruncate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShrinkStep::AbbreviateFormat => "abbreviate_format",
            ShrinkStep::DropBookType => "drop_book_type",
            ShrinkStep::MinimalForm => "minimal_form",
            ShrinkStep::TrimTitleWords => "trim_title_words",
            ShrinkStep::HardTruncate => "hard_truncate",
        }
    }

    /// Apply this step unconditionally. Steps that cannot act return the
    /// title unchanged.
    pub fn apply(self, title: &str, request: &ShortenRequest, budget: usize) -> String {
        match self {
            ShrinkStep::AbbreviateFormat => replace_last_word(
                title,
                request.format.label(),
                request.format.abbreviation(),
            )
            .unwrap_or_else(|| title.to_string()),
            ShrinkStep::DropBookType => remove_last_word(title, request.book_type.label())
                .unwrap_or_else(|| title.to_string()),
            ShrinkStep::MinimalForm => minimal_form(request, budget),
            ShrinkStep::TrimTitleWords => trim_title_words(title, budget),
            ShrinkStep::HardTruncate => truncate_chars(title, budget),
        }
    }
}

fn minimal_form(request: &ShortenRequest, budget: usize) -> String {
    let mut title = title_by_author(&request.main_title, &request.author);
    let format = request.format.abbreviation();
    if char_len(&title) + 1 + char_len(format) <= budget {
        title.push(' ');
        title.push_str(format);
    }
    if request.fiction
        && !contains_fiction(&title)
        && char_len(&title) + char_len(FICTION_SUFFIX) <= budget
    {
        title.push_str(FICTION_SUFFIX);
    }
    title
}

pub(crate) fn trim_title_words(title: &str, budget: usize) -> String {
    let Some(pos) = title.rfind(" by ") else {
        return title.to_string();
    };
    let (head, tail) = title.split_at(pos);
    let tail_len = char_len(tail);
    if char_len(head) <= TRIM_MIN_TITLE_CHARS || tail_len >= TRIM_MAX_AUTHOR_CHARS {
        return title.to_string();
    }

    let room = budget.saturating_sub(tail_len);
    let mut kept = String::new();
    for word in head.split(' ') {
        let sep = usize::from(!kept.is_empty());
        if char_len(&kept) + sep + char_len(word) > room {
            break;
        }
        if sep == 1 {
            kept.push(' ');
        }
        kept.push_str(word);
    }

    let kept = kept.trim_end_matches([':', ',', ';', '-']).trim_end();
    if kept.is_empty() {
        return title.to_string();
    }
    format!("{kept}{tail}")
}

/// Cut the non-fiction portion so that `" Fiction"` fits, then append it.
pub(crate) fn append_fiction(title: &str, budget: usize) -> String {
    let stem = title.strip_suffix(FICTION_SUFFIX).unwrap_or(title);
    let cut = budget.saturating_sub(char_len(FICTION_SUFFIX));
    format!("{}{FICTION_SUFFIX}", truncate_chars(stem, cut))
}

/// Shorten a composed title to the default 80-character budget.
///
/// Titles already within budget are returned unchanged.
pub fn shorten(full_title: &str, request: &ShortenRequest) -> String {
    shorten_with_config(full_title, request, &ScanConfig::default())
}

/// Config-aware version of [`shorten`].
pub(crate) fn shorten_with_config(
    full_title: &str,
    request: &ShortenRequest,
    config: &ScanConfig,
) -> String {
    let budget = config.title_budget;
    if char_len(full_title) <= budget {
        return full_title.to_string();
    }

    let mut title = collapse_whitespace(full_title);
    for step in ShrinkStep::ORDER {
        if char_len(&title) <= budget {
            break;
        }
        title = step.apply(&title, request, budget);
        tracing::debug!(step = step.name(), chars = char_len(&title), "shrink step applied");
    }

    if char_len(&title) > budget {
        title = if request.fiction {
            append_fiction(&title, budget)
        } else {
            truncate_chars(&title, budget)
        };
    }
    title
}
