use serde::{Deserialize, Serialize};

use crate::ScanError;
use crate::text_processing::{collapse_whitespace, expand_ligatures};

/// One page of OCR output: recognized lines in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrPage {
    #[serde(default)]
    pub lines: Vec<String>,
}

/// A structured OCR result as returned by the recognition service.
///
/// Only line text and order are interpreted; bounding boxes, confidences and
/// language hints are ignored (and tolerated by the JSON decoder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrDocument {
    #[serde(default)]
    pub pages: Vec<OcrPage>,
}

impl OcrDocument {
    /// Build a single-page document from a block of newline-separated text.
    pub fn from_plain_text(text: &str) -> Self {
        Self {
            pages: vec![OcrPage {
                lines: text.lines().map(String::from).collect(),
            }],
        }
    }

    /// Decode a `{"pages":[{"lines":[...]}]}` JSON document.
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        serde_json::from_str(json).map_err(ScanError::InvalidDocument)
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}

/// OCR text flattened for searching: every line joined by a single space,
/// plus the cleaned line list in the original order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedText {
    text: String,
    lines: Vec<String>,
}

impl NormalizedText {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&str> for NormalizedText {
    fn from(text: &str) -> Self {
        normalize(&OcrDocument::from_plain_text(text))
    }
}

/// Collapse a structured OCR result into a [`NormalizedText`].
///
/// Lines are whitespace-collapsed and ligature-expanded; blank lines are
/// dropped. Never fails: an empty document yields empty text.
pub fn normalize(document: &OcrDocument) -> NormalizedText {
    let lines: Vec<String> = document
        .pages
        .iter()
        .flat_map(|page| page.lines.iter())
        .map(|line| collapse_whitespace(&expand_ligatures(line)))
        .filter(|line| !line.is_empty())
        .collect();
    let text = lines.join(" ");

    tracing::debug!(
        pages = document.pages.len(),
        raw_lines = document.line_count(),
        lines = lines.len(),
        chars = text.len(),
        "normalized OCR document"
    );

    NormalizedText { text, lines }
}
