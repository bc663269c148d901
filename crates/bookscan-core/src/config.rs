use regex::Regex;

use crate::ScanError;
use crate::flaws::{FlawSynonym, default_synonyms};
use crate::isbn::IsbnTier;
use crate::title::default_credential_patterns;

/// Listing titles must fit this many characters.
pub const DEFAULT_TITLE_BUDGET: usize = 80;

/// Main titles shorter than this keep their subtitle.
pub const DEFAULT_MIN_MAIN_TITLE_LEN: usize = 10;

/// Budgets below this cannot hold `Title by Author` plus a genre marker.
pub const MIN_TITLE_BUDGET: usize = 20;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for scanning and title synthesis.
///
/// Use [`ScanConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    // ── title.rs / shorten.rs ──
    /// Maximum listing title length in characters (default: 80).
    pub(crate) title_budget: usize,
    /// Main titles shorter than this keep their subtitle (default: 10).
    pub(crate) min_main_title_len: usize,
    /// Credential patterns stripped from the primary author.
    pub(crate) credential_patterns: ListOverride<Regex>,

    // ── isbn.rs ──
    /// Discard candidates whose check digit does not verify (default: off).
    pub(crate) verify_isbn_checksum: bool,
    /// Order of the ISBN cascade.
    pub(crate) isbn_tiers: ListOverride<IsbnTier>,

    // ── flaws.rs ──
    /// Loose terms mapped to flaw tags.
    pub(crate) flaw_synonyms: ListOverride<FlawSynonym>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            title_budget: DEFAULT_TITLE_BUDGET,
            min_main_title_len: DEFAULT_MIN_MAIN_TITLE_LEN,
            credential_patterns: ListOverride::Default,
            verify_isbn_checksum: false,
            isbn_tiers: ListOverride::Default,
            flaw_synonyms: ListOverride::Default,
        }
    }
}

impl ScanConfig {
    pub fn title_budget(&self) -> usize {
        self.title_budget
    }

    pub fn min_main_title_len(&self) -> usize {
        self.min_main_title_len
    }

    pub fn verify_isbn_checksum(&self) -> bool {
        self.verify_isbn_checksum
    }

    /// ISBN tiers in the order they are tried.
    pub fn isbn_tiers(&self) -> Vec<IsbnTier> {
        self.isbn_tiers.resolve(IsbnTier::DEFAULT_ORDER)
    }

    pub(crate) fn flaw_synonyms(&self) -> Vec<FlawSynonym> {
        self.flaw_synonyms.resolve(&default_synonyms())
    }

    pub(crate) fn credential_patterns(&self) -> Vec<Regex> {
        self.credential_patterns
            .resolve(default_credential_patterns())
    }
}

/// Builder for [`ScanConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with [`ScanError::Config`] if any pattern is invalid or the
/// title budget is unusable.
#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    title_budget: Option<usize>,
    min_main_title_len: Option<usize>,
    credential_patterns: ListOverride<String>,
    verify_isbn_checksum: Option<bool>,
    isbn_tiers: ListOverride<IsbnTier>,
    flaw_synonyms: ListOverride<FlawSynonym>,
}

/// Append to an `Extend` override, or start one.
fn push_extend<T>(list: &mut ListOverride<T>, value: T) {
    match list {
        ListOverride::Extend(v) => v.push(value),
        _ => *list = ListOverride::Extend(vec![value]),
    }
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Scalars ──

    pub fn title_budget(mut self, chars: usize) -> Self {
        self.title_budget = Some(chars);
        self
    }

    pub fn min_main_title_len(mut self, chars: usize) -> Self {
        self.min_main_title_len = Some(chars);
        self
    }

    pub fn verify_isbn_checksum(mut self, verify: bool) -> Self {
        self.verify_isbn_checksum = Some(verify);
        self
    }

    // ── ISBN tiers ──

    pub fn set_isbn_tiers(mut self, tiers: Vec<IsbnTier>) -> Self {
        self.isbn_tiers = ListOverride::Replace(tiers);
        self
    }

    // ── Flaw synonyms ──

    pub fn set_flaw_synonyms(mut self, synonyms: Vec<FlawSynonym>) -> Self {
        self.flaw_synonyms = ListOverride::Replace(synonyms);
        self
    }

    pub fn add_flaw_synonym(mut self, synonym: FlawSynonym) -> Self {
        push_extend(&mut self.flaw_synonyms, synonym);
        self
    }

    // ── Credential patterns ──

    pub fn set_credential_patterns(mut self, patterns: Vec<String>) -> Self {
        self.credential_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_credential_pattern(mut self, pattern: String) -> Self {
        push_extend(&mut self.credential_patterns, pattern);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ScanConfig`].
    pub fn build(self) -> Result<ScanConfig, ScanError> {
        let compile = |patterns: Vec<String>| -> Result<Vec<Regex>, ScanError> {
            patterns
                .iter()
                .map(|p| {
                    Regex::new(p)
                        .map_err(|e| ScanError::Config(format!("invalid pattern {p:?}: {e}")))
                })
                .collect()
        };

        let credential_patterns = match self.credential_patterns {
            ListOverride::Default => ListOverride::Default,
            ListOverride::Replace(v) => ListOverride::Replace(compile(v)?),
            ListOverride::Extend(v) => ListOverride::Extend(compile(v)?),
        };

        let title_budget = self.title_budget.unwrap_or(DEFAULT_TITLE_BUDGET);
        if title_budget < MIN_TITLE_BUDGET {
            return Err(ScanError::Config(format!(
                "title budget {title_budget} is below the minimum of {MIN_TITLE_BUDGET}"
            )));
        }

        if let ListOverride::Replace(tiers) = &self.isbn_tiers
            && tiers.is_empty()
        {
            return Err(ScanError::Config("ISBN tier list is empty".to_string()));
        }

        Ok(ScanConfig {
            title_budget,
            min_main_title_len: self
                .min_main_title_len
                .unwrap_or(DEFAULT_MIN_MAIN_TITLE_LEN),
            credential_patterns,
            verify_isbn_checksum: self.verify_isbn_checksum.unwrap_or(false),
            isbn_tiers: self.isbn_tiers,
            flaw_synonyms: self.flaw_synonyms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flaws::FlawTag;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.title_budget(), 80);
        assert_eq!(config.min_main_title_len(), 10);
        assert!(!config.verify_isbn_checksum());
        assert_eq!(config.isbn_tiers(), IsbnTier::DEFAULT_ORDER);
        assert!(!config.flaw_synonyms().is_empty());
        assert!(!config.credential_patterns().is_empty());
    }

    #[test]
    fn test_builder_basic() {
        let config = ScanConfigBuilder::new()
            .title_budget(60)
            .min_main_title_len(12)
            .verify_isbn_checksum(true)
            .build()
            .unwrap();
        assert_eq!(config.title_budget(), 60);
        assert_eq!(config.min_main_title_len(), 12);
        assert!(config.verify_isbn_checksum());
    }

    #[test]
    fn test_builder_rejects_tiny_budget() {
        let result = ScanConfigBuilder::new().title_budget(5).build();
        assert!(matches!(result, Err(ScanError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_empty_tier_list() {
        let result = ScanConfigBuilder::new().set_isbn_tiers(vec![]).build();
        assert!(matches!(result, Err(ScanError::Config(_))));
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ScanConfigBuilder::new()
            .add_credential_pattern(r"[invalid".to_string())
            .build();
        assert!(matches!(result, Err(ScanError::Config(_))));
    }

    #[test]
    fn test_extend_credential_patterns() {
        let defaults = ScanConfig::default().credential_patterns().len();
        let config = ScanConfigBuilder::new()
            .add_credential_pattern(r"(?i)\bFACS\b".to_string())
            .add_credential_pattern(r"(?i)\bRN\b".to_string())
            .build()
            .unwrap();
        assert_eq!(config.credential_patterns().len(), defaults + 2);
    }

    #[test]
    fn test_extend_flaw_synonyms() {
        let defaults = ScanConfig::default().flaw_synonyms().len();
        let config = ScanConfigBuilder::new()
            .add_flaw_synonym(FlawSynonym::new("SCUFF", FlawTag::CoverCrease))
            .build()
            .unwrap();
        let synonyms = config.flaw_synonyms();
        assert_eq!(synonyms.len(), defaults + 1);
        assert_eq!(synonyms.last().unwrap().term, "SCUFF");
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
