use serde::Serialize;

use crate::config::ScanConfig;
use crate::flaws::FlawReport;
use crate::isbn::IsbnCandidate;
use crate::normalize::{NormalizedText, OcrDocument};
use crate::shorten::ShortenRequest;
use crate::title::TitleComponents;
use crate::{ScanError, edition, flaws, isbn, normalize, shorten, title};

/// Everything extracted from one OCR document.
///
/// `text` is kept so later steps (a second flaw pass, edition lookup for a
/// title) can be run without re-normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub text: NormalizedText,
    pub isbn: Option<IsbnCandidate>,
    pub edition: Option<String>,
    pub flaws: FlawReport,
}

impl ScanReport {
    pub fn isbn_str(&self) -> Option<&str> {
        self.isbn.as_ref().map(IsbnCandidate::as_str)
    }

    /// Copy the scanned edition into `components` unless one is already set.
    pub fn fill_edition(&self, components: &mut TitleComponents) {
        let has_edition = components
            .edition
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty());
        if !has_edition {
            components.edition = self.edition.clone();
        }
    }
}

/// A configurable book scanning pipeline.
///
/// Holds a [`ScanConfig`] and exposes each pipeline step as a method. The
/// default constructor uses built-in defaults; use [`Scanner::with_config`]
/// to supply a custom budget, ISBN tier order or synonym table.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn normalize(&self, document: &OcrDocument) -> NormalizedText {
        normalize::normalize(document)
    }

    pub fn extract_isbn(&self, text: &NormalizedText) -> Option<IsbnCandidate> {
        isbn::extract_isbn_with_config(text, &self.config)
    }

    pub fn extract_edition(&self, text: &NormalizedText) -> Option<String> {
        edition::extract_edition(text)
    }

    pub fn detect_flaws(&self, text: &NormalizedText) -> FlawReport {
        flaws::detect_flaws_with_config(text, &self.config)
    }

    /// Normalize once and run all three extractors over the result.
    pub fn scan(&self, document: &OcrDocument) -> ScanReport {
        let text = self.normalize(document);
        let isbn = self.extract_isbn(&text);
        let edition = self.extract_edition(&text);
        let flaws = self.detect_flaws(&text);
        tracing::info!(
            isbn = isbn.as_ref().map(IsbnCandidate::as_str),
            edition = edition.as_deref(),
            flaws = flaws.len(),
            "scan complete"
        );
        ScanReport {
            text,
            isbn,
            edition,
            flaws,
        }
    }

    /// Decode an OCR JSON document and [`scan`](Self::scan) it.
    pub fn scan_json(&self, json: &str) -> Result<ScanReport, ScanError> {
        let document = OcrDocument::from_json(json)?;
        Ok(self.scan(&document))
    }

    pub fn synthesize_title(&self, components: &TitleComponents) -> String {
        title::synthesize_with_config(components, &self.config)
    }

    pub fn shorten_title(&self, full_title: &str, request: &ShortenRequest) -> String {
        shorten::shorten_with_config(full_title, request, &self.config)
    }
}
