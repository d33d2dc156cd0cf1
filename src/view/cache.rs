//! Resolved bundle cache keyed by `(scope, language)`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::bundle::LabelBundle;
use crate::types::ScopeKey;

/// A bundle resolved for one scope and requested language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBundle {
    pub scope: ScopeKey,
    pub requested_language: String,
    /// Language the labels came from
    pub used_language: String,
    pub bundle: LabelBundle,
}

impl ResolvedBundle {
    /// `true` if the labels come from the fallback language.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.used_language != self.requested_language
    }
}

/// Outcome remembered for one `(scope, language)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedResolution {
    Bundle(Arc<ResolvedBundle>),
    /// Nothing in the requested nor the fallback language
    ScopeNotFound,
}

impl CachedResolution {
    #[must_use]
    pub fn into_bundle(self) -> Option<Arc<ResolvedBundle>> {
        match self {
            Self::Bundle(bundle) => Some(bundle),
            Self::ScopeNotFound => None,
        }
    }
}

impl From<Option<Arc<ResolvedBundle>>> for CachedResolution {
    fn from(bundle: Option<Arc<ResolvedBundle>>) -> Self {
        bundle.map_or(Self::ScopeNotFound, Self::Bundle)
    }
}

/// Cache entry stamped with the store generation it was resolved at.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Store generation at resolution time
    generation: u64,
    /// Cached outcome
    resolution: CachedResolution,
}

/// Bounded cache of resolved bundles.
///
/// Entries resolved at an older store generation count as misses. When the
/// cache is full, it is cleared before the next insert.
#[derive(Debug)]
pub struct BundleCache {
    /// `(scope, normalized language)` → entry
    entries: RwLock<HashMap<(ScopeKey, String), CacheEntry>>,
    /// Upper bound on entries
    max_entries: usize,
}

impl BundleCache {
    /// Default upper bound on entries
    pub const DEFAULT_MAX_ENTRIES: usize = 256;

    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self { entries: RwLock::new(HashMap::new()), max_entries: max_entries.max(1) }
    }

    /// Returns the cached outcome if it was resolved at `generation`.
    pub async fn get(
        &self,
        scope: &ScopeKey,
        language: &str,
        generation: u64,
    ) -> Option<CachedResolution> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(scope.clone(), language.to_string()))?;
        if entry.generation != generation {
            tracing::trace!(%scope, language, "Stale bundle cache entry");
            return None;
        }
        Some(entry.resolution.clone())
    }

    pub async fn insert(
        &self,
        scope: ScopeKey,
        language: String,
        generation: u64,
        resolution: CachedResolution,
    ) {
        let mut entries = self.entries.write().await;
        let key = (scope, language);
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            tracing::debug!(max_entries = self.max_entries, "Bundle cache full, clearing");
            entries.clear();
        }
        entries.insert(key, CacheEntry { generation, resolution });
    }

    pub async fn invalidate(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for BundleCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ENTRIES)
    }
}
