use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::resolver::FallbackPolicy;
use crate::types::{
    DEFAULT_SEPARATOR,
    is_well_formed_language_code,
    normalize_language_code,
};
use crate::view::BundleCache;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "cache.maxEntries")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverSettings {
    /// Language used when a scope has no records in the requested language.
    /// An empty string disables fallback.
    pub fallback_language: String,

    /// Separator between segments of scope keys and label keys.
    pub scope_separator: String,

    /// JSON file with label records, relative to the workspace root.
    pub records_file: Option<String>,

    /// Upper bound for a single store query.
    /// If unset, queries are not bounded.
    pub query_timeout_ms: Option<u64>,

    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Max cached `(scope, language)` pairs before the cache is cleared.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true, max_entries: BundleCache::DEFAULT_MAX_ENTRIES }
    }
}

impl ResolverSettings {
    /// # Errors
    /// - Invalid separator
    /// - Malformed fallback language
    /// - Zero-sized limits
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.scope_separator.is_empty() {
            errors.push(ValidationError::new(
                "scopeSeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        let fallback = normalize_language_code(&self.fallback_language);
        if !fallback.is_empty() && !is_well_formed_language_code(&fallback) {
            errors.push(ValidationError::new(
                "fallbackLanguage",
                format!(
                    "Invalid language code '{}'. Example: \"en\" or \"zh-hant\", or \"\" to disable fallback",
                    self.fallback_language
                ),
            ));
        }

        if let Some(path) = &self.records_file
            && path.trim().is_empty()
        {
            errors.push(ValidationError::new(
                "recordsFile",
                "The path cannot be empty. Please specify a file, or remove this field",
            ));
        }

        if self.query_timeout_ms == Some(0) {
            errors.push(ValidationError::new(
                "queryTimeoutMs",
                "The timeout must be greater than 0, or remove this field to disable it",
            ));
        }

        if self.cache.enabled && self.cache.max_entries == 0 {
            errors.push(ValidationError::new(
                "cache.maxEntries",
                "At least one entry is required. Set \"enabled\": false to disable the cache",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Fallback policy described by these settings.
    #[must_use]
    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.fallback_language.trim().is_empty() {
            FallbackPolicy::disabled()
        } else {
            FallbackPolicy::new(&self.fallback_language)
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            fallback_language: FallbackPolicy::DEFAULT_LANGUAGE.to_string(),
            scope_separator: DEFAULT_SEPARATOR.to_string(),
            records_file: None,
            query_timeout_ms: None,
            cache: CacheConfig::default(),
        }
    }
}
