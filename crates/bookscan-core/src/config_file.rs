use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ScanError;
use crate::config::ScanConfigBuilder;
use crate::flaws::FlawSynonym;
use crate::isbn::IsbnTier;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
///
/// ```toml
/// [title]
/// budget = 80
/// extra_credential_patterns = ['(?i)\bFACS\b']
///
/// [isbn]
/// verify_checksum = true
///
/// [[flaws.extra_synonyms]]
/// term = "dog-eared"
/// tag = "COVER_CREASE"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub title: Option<TitleConfig>,
    pub isbn: Option<IsbnConfig>,
    pub flaws: Option<FlawsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleConfig {
    pub budget: Option<usize>,
    pub min_main_title_len: Option<usize>,
    /// Replaces the built-in credential patterns.
    pub credential_patterns: Option<Vec<String>>,
    /// Appended to the built-in (or replaced) credential patterns.
    pub extra_credential_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsbnConfig {
    pub verify_checksum: Option<bool>,
    pub tiers: Option<Vec<IsbnTier>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlawsConfig {
    /// Replaces the built-in synonym table.
    pub synonyms: Option<Vec<FlawSynonym>>,
    /// Appended to the built-in (or replaced) synonym table.
    pub extra_synonyms: Option<Vec<FlawSynonym>>,
}

/// Platform config directory path: `<config_dir>/bookscan/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bookscan").join("config.toml"))
}

/// Load config by cascading CWD `.bookscan.toml` over platform config.
/// CWD values override platform values. Missing files are skipped and
/// unparseable ones are logged and skipped.
pub fn load_config() -> ConfigFile {
    cascade(config_path().as_deref(), Path::new(".bookscan.toml"))
}

fn cascade(platform: Option<&Path>, cwd: &Path) -> ConfigFile {
    let platform = platform.and_then(load_if_present);
    let cwd = load_if_present(cwd);

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

fn load_if_present(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }
    match load_from_path(path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(config)
        }
        Err(e) => {
            tracing::warn!("ignoring config file: {e}");
            None
        }
    }
}

/// Load a config from a specific path.
pub fn load_from_path(path: &Path) -> Result<ConfigFile, ScanError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| ScanError::ConfigFile {
        path: path.display().to_string(),
        source,
    })
}

fn pick<T: Clone>(overlay: Option<&T>, base: Option<&T>) -> Option<T> {
    overlay.or(base).cloned()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bt, ot) = (base.title.unwrap_or_default(), overlay.title.unwrap_or_default());
    let (bi, oi) = (base.isbn.unwrap_or_default(), overlay.isbn.unwrap_or_default());
    let (bf, of) = (base.flaws.unwrap_or_default(), overlay.flaws.unwrap_or_default());

    ConfigFile {
        title: Some(TitleConfig {
            budget: ot.budget.or(bt.budget),
            min_main_title_len: ot.min_main_title_len.or(bt.min_main_title_len),
            credential_patterns: pick(
                ot.credential_patterns.as_ref(),
                bt.credential_patterns.as_ref(),
            ),
            extra_credential_patterns: pick(
                ot.extra_credential_patterns.as_ref(),
                bt.extra_credential_patterns.as_ref(),
            ),
        }),
        isbn: Some(IsbnConfig {
            verify_checksum: oi.verify_checksum.or(bi.verify_checksum),
            tiers: pick(oi.tiers.as_ref(), bi.tiers.as_ref()),
        }),
        flaws: Some(FlawsConfig {
            synonyms: pick(of.synonyms.as_ref(), bf.synonyms.as_ref()),
            extra_synonyms: pick(of.extra_synonyms.as_ref(), bf.extra_synonyms.as_ref()),
        }),
    }
}

impl ConfigFile {
    /// Seed a [`ScanConfigBuilder`] with every value set in this file.
    ///
    /// Callers can keep chaining (e.g. CLI flags) before `build()`.
    pub fn to_builder(&self) -> ScanConfigBuilder {
        let mut builder = ScanConfigBuilder::new();

        if let Some(title) = &self.title {
            if let Some(budget) = title.budget {
                builder = builder.title_budget(budget);
            }
            if let Some(n) = title.min_main_title_len {
                builder = builder.min_main_title_len(n);
            }
            if let Some(patterns) = &title.credential_patterns {
                builder = builder.set_credential_patterns(patterns.clone());
            }
            for pattern in title.extra_credential_patterns.iter().flatten() {
                builder = builder.add_credential_pattern(pattern.clone());
            }
        }

        if let Some(isbn) = &self.isbn {
            if let Some(verify) = isbn.verify_checksum {
                builder = builder.verify_isbn_checksum(verify);
            }
            if let Some(tiers) = &isbn.tiers {
                builder = builder.set_isbn_tiers(tiers.clone());
            }
        }

        if let Some(flaws) = &self.flaws {
            if let Some(synonyms) = &flaws.synonyms {
                builder = builder.set_flaw_synonyms(synonyms.clone());
            }
            for synonym in flaws.extra_synonyms.iter().flatten() {
                builder = builder.add_flaw_synonym(synonym.clone());
            }
        }

        builder
    }
}
