//! In-memory label record store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use tokio::sync::RwLock;

use super::{
    LabelRecordStore,
    StoreError,
};
use crate::input::record::LabelRecord;
use crate::types::{
    ScopeKey,
    normalize_language_code,
};

/// Records held per language in insertion order.
///
/// Cloning shares the underlying records.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    /// Language → records
    records: Arc<RwLock<HashMap<String, Vec<LabelRecord>>>>,
    /// Write counter
    generation: Arc<AtomicU64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `records`.
    ///
    /// Later records replace earlier ones with the same identity.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = LabelRecord>) -> Self {
        let mut by_language: HashMap<String, Vec<LabelRecord>> = HashMap::new();
        for record in records {
            upsert(by_language.entry(record.language().to_string()).or_default(), record);
        }
        Self { records: Arc::new(RwLock::new(by_language)), generation: Arc::new(AtomicU64::new(0)) }
    }

    /// Inserts a record, replacing any record with the same `(scope, label, language)`.
    ///
    /// A replaced record keeps its position.
    pub async fn insert(&self, record: LabelRecord) {
        let mut records = self.records.write().await;
        upsert(records.entry(record.language().to_string()).or_default(), record);
        self.bump();
    }

    /// Inserts a batch of records as one write.
    pub async fn extend(&self, batch: impl IntoIterator<Item = LabelRecord>) {
        let mut records = self.records.write().await;
        let mut count = 0_usize;
        for record in batch {
            upsert(records.entry(record.language().to_string()).or_default(), record);
            count += 1;
        }
        drop(records);
        tracing::debug!(count, "Extended label store");
        self.bump();
    }

    /// Removes every record of `language`. Returns how many were removed.
    pub async fn remove_language(&self, language: &str) -> usize {
        let removed = self
            .records
            .write()
            .await
            .remove(&normalize_language_code(language))
            .map_or(0, |records| records.len());
        if removed > 0 {
            self.bump();
        }
        removed
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
        self.bump();
    }

    /// Total number of records across all languages.
    pub async fn len(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Languages that have at least one record, sorted.
    pub async fn languages(&self) -> Vec<String> {
        let records = self.records.read().await;
        let mut languages: Vec<String> = records
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(language, _)| language.clone())
            .collect();
        languages.sort();
        languages
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

/// Replaces a record with the same identity in place, or appends.
fn upsert(records: &mut Vec<LabelRecord>, record: LabelRecord) {
    if let Some(existing) = records.iter_mut().find(|r| r.same_identity(&record)) {
        tracing::debug!(
            scope = %record.scope(),
            label = %record.label(),
            language = record.language(),
            "Replacing label record"
        );
        *existing = record;
    } else {
        records.push(record);
    }
}

impl LabelRecordStore for MemoryStore {
    async fn query(&self, scope: &ScopeKey, language: &str) -> Result<Vec<LabelRecord>, StoreError> {
        let language = normalize_language_code(language);
        let records = self.records.read().await;

        let matched: Vec<LabelRecord> = records
            .get(&language)
            .map(|records| records.iter().filter(|r| r.scope().is_within(scope)).cloned().collect())
            .unwrap_or_default();

        tracing::trace!(%scope, %language, count = matched.len(), "Queried memory store");
        Ok(matched)
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
