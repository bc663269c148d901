use thiserror::Error;

pub mod cascade;
pub mod config;
pub mod config_file;
pub mod edition;
pub mod flaws;
pub mod isbn;
pub mod normalize;
pub mod scanner;
pub mod shorten;
pub mod text_processing;
pub mod title;

pub use cascade::{Matcher, first_match};
pub use config::{ListOverride, ScanConfig, ScanConfigBuilder};
pub use edition::{EditionTier, extract_edition};
pub use flaws::{FlawReport, FlawSynonym, FlawTag, detect_flaws};
pub use isbn::{IsbnCandidate, IsbnKind, IsbnTier, extract_isbn};
pub use normalize::{NormalizedText, OcrDocument, OcrPage, normalize};
pub use scanner::{ScanReport, Scanner};
pub use shorten::{ShortenRequest, ShrinkStep, shorten};
pub use title::{BookFormat, BookType, NarrativeType, TitleComponents, primary_author, synthesize};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid OCR document: {0}")]
    InvalidDocument(#[source] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to parse config file {path}: {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scan one OCR document with the default configuration.
///
/// Pipeline:
/// 1. Flatten pages and lines into [`NormalizedText`]
/// 2. Recover an ISBN through the tiered cascade
/// 3. Find an edition statement
/// 4. Detect condition flaws
pub fn scan(document: &OcrDocument) -> ScanReport {
    Scanner::new().scan(document)
}
