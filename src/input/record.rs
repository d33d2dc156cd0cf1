//! Label record input definitions and seed file ingestion.

use std::collections::HashSet;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::{
    KeyPath,
    ScopeKey,
    is_well_formed_language_code,
    normalize_language_code,
};

/// The atomic unit of translatable content.
///
/// Scope and label key are parsed into segments once, at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    /// Scope the record belongs to
    scope: ScopeKey,
    /// Label key within the scope
    label: KeyPath,
    /// Normalized language code
    language: String,
    /// Translated text
    text: String,
}

impl LabelRecord {
    /// Creates a record from textual scope and label keys split on `separator`.
    ///
    /// # Examples
    /// ```
    /// use label_resolver::input::record::LabelRecord;
    ///
    /// let record = LabelRecord::new("teaRoomView.step1", "continueButton", "en", "Continue", ".");
    /// assert_eq!(record.scope().segments(), ["teaRoomView", "step1"]);
    /// assert_eq!(record.language(), "en");
    /// ```
    #[must_use]
    pub fn new(
        scope: &str,
        label: &str,
        language: &str,
        text: impl Into<String>,
        separator: &str,
    ) -> Self {
        Self::from_parts(
            ScopeKey::parse(scope, separator),
            KeyPath::parse(label, separator),
            language,
            text,
        )
    }

    /// Creates a record from already structured keys.
    #[must_use]
    pub fn from_parts(
        scope: ScopeKey,
        label: KeyPath,
        language: &str,
        text: impl Into<String>,
    ) -> Self {
        Self { scope, label, language: normalize_language_code(language), text: text.into() }
    }

    #[must_use]
    pub const fn scope(&self) -> &ScopeKey {
        &self.scope
    }

    #[must_use]
    pub const fn label(&self) -> &KeyPath {
        &self.label
    }

    /// Normalized language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if both records share the same `(scope, label, language)` triple.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.scope == other.scope && self.label == other.label && self.language == other.language
    }
}

/// One record as it appears in a JSON seed file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSeed {
    pub scope_key: String,
    pub label_key: String,
    pub language_code: String,
    pub translated_text: String,
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read records file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse records: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid record at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("Duplicate record at index {index}: '{scope}' / '{label}' / '{language}'")]
    DuplicateRecord { index: usize, scope: String, label: String, language: String },
}

impl RecordSeed {
    /// Validates the seed and converts it into a [`LabelRecord`].
    fn into_record(self, index: usize, separator: &str) -> Result<LabelRecord, IngestError> {
        let invalid = |message: &str| IngestError::InvalidRecord { index, message: message.to_string() };

        let scope = ScopeKey::parse(&self.scope_key, separator);
        if scope.is_empty() {
            return Err(invalid("scopeKey must contain at least one segment"));
        }

        let label = KeyPath::parse(&self.label_key, separator);
        if label.is_empty() {
            return Err(invalid("labelKey must contain at least one segment"));
        }

        if !is_well_formed_language_code(self.language_code.trim()) {
            return Err(IngestError::InvalidRecord {
                index,
                message: format!("languageCode '{}' is not a language tag", self.language_code),
            });
        }

        Ok(LabelRecord::from_parts(scope, label, &self.language_code, self.translated_text))
    }
}

/// Parses a JSON array of record seeds.
///
/// Every record is validated and the `(scope, label, language)` triple must
/// be unique across the whole input.
///
/// # Errors
/// - JSON parse failure
/// - Empty scope or label key, malformed language code
/// - Duplicate `(scope, label, language)` triple
pub fn parse_records(json_text: &str, separator: &str) -> Result<Vec<LabelRecord>, IngestError> {
    let seeds: Vec<RecordSeed> = serde_json::from_str(json_text)?;
    records_from_seeds(seeds, separator)
}

/// Converts seeds into records, enforcing validity and uniqueness.
///
/// # Errors
/// See [`parse_records`].
pub fn records_from_seeds(
    seeds: Vec<RecordSeed>,
    separator: &str,
) -> Result<Vec<LabelRecord>, IngestError> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(seeds.len());

    for (index, seed) in seeds.into_iter().enumerate() {
        let record = seed.into_record(index, separator)?;

        let identity =
            (record.scope().clone(), record.label().clone(), record.language().to_string());
        if !seen.insert(identity) {
            return Err(IngestError::DuplicateRecord {
                index,
                scope: record.scope().join(separator),
                label: record.label().segments().join(separator),
                language: record.language().to_string(),
            });
        }

        records.push(record);
    }

    tracing::debug!(count = records.len(), "Parsed label records");
    Ok(records)
}

/// Loads a JSON records file.
///
/// # Errors
/// Returns error if file read, JSON parse or record validation fails.
pub async fn load_records_file(
    file_path: &Path,
    separator: &str,
) -> Result<Vec<LabelRecord>, IngestError> {
    tracing::debug!("Loading records from: {:?}", file_path);
    let content = tokio::fs::read_to_string(file_path).await?;
    parse_records(&content, separator)
}
