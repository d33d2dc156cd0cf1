//! Scope resolution with language fallback.

use std::sync::Arc;
use std::time::Duration;

use super::fallback::FallbackPolicy;
use crate::input::record::LabelRecord;
use crate::store::{
    LabelRecordStore,
    StoreError,
};
use crate::types::{
    ScopeKey,
    normalize_language_code,
};

/// Records resolved for one scope, with the language they were found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeResolution {
    pub records: Vec<LabelRecord>,
    /// Normalized language that was asked for
    pub requested_language: String,
    /// Language the records came from, `None` when nothing was found
    pub used_language: Option<String>,
}

impl ScopeResolution {
    /// `false` means the scope is missing in both the requested and fallback language.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.used_language.is_some()
    }

    /// `true` if the records come from the fallback language.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.used_language.as_deref().is_some_and(|used| used != self.requested_language)
    }
}

/// Retrieves the record set of a scope, retrying under the fallback language on a miss.
#[derive(Debug)]
pub struct ScopeResolver<S> {
    /// Record source
    store: Arc<S>,
    /// Fallback language rule
    policy: FallbackPolicy,
    /// Upper bound per store query, unbounded if `None`
    query_timeout: Option<Duration>,
}

impl<S> Clone for ScopeResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy.clone(),
            query_timeout: self.query_timeout,
        }
    }
}

impl<S: LabelRecordStore> ScopeResolver<S> {
    #[must_use]
    pub const fn new(store: Arc<S>, policy: FallbackPolicy) -> Self {
        Self { store, policy, query_timeout: None }
    }

    /// Bounds each store query by `timeout`.
    #[must_use]
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    #[must_use]
    pub const fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    /// Resolves the records of `scope` for `language`.
    ///
    /// # Algorithm
    /// 1. Query the store for `language`
    /// 2. If that is empty and a fallback language applies, query it
    /// 3. Return the first non-empty result with the language it came from
    ///
    /// A partial record set in the requested language is returned as is.
    ///
    /// # Errors
    /// Store failures on either query are propagated. A miss is not an error.
    pub async fn resolve(
        &self,
        scope: &ScopeKey,
        language: &str,
    ) -> Result<ScopeResolution, StoreError> {
        let requested = normalize_language_code(language);

        if scope.is_empty() {
            tracing::debug!("Empty scope requested, nothing to resolve");
            return Ok(ScopeResolution {
                records: Vec::new(),
                requested_language: requested,
                used_language: None,
            });
        }

        let records = self.query(scope, &requested).await?;
        if !records.is_empty() {
            return Ok(ScopeResolution {
                records,
                used_language: Some(requested.clone()),
                requested_language: requested,
            });
        }

        let Some(fallback) = self.policy.fallback_for(&requested) else {
            tracing::debug!(%scope, language = %requested, "No records and no fallback");
            return Ok(ScopeResolution {
                records,
                requested_language: requested,
                used_language: None,
            });
        };

        tracing::debug!(%scope, language = %requested, fallback, "Falling back");
        let records = self.query(scope, fallback).await?;
        let used_language = (!records.is_empty()).then(|| fallback.to_string());
        if used_language.is_none() {
            tracing::debug!(%scope, language = %requested, fallback, "Scope not found");
        }

        Ok(ScopeResolution { records, requested_language: requested, used_language })
    }

    /// Runs one store query, bounded by the configured timeout.
    async fn query(&self, scope: &ScopeKey, language: &str) -> Result<Vec<LabelRecord>, StoreError> {
        tracing::debug!(%scope, language, "Querying label records");

        let Some(timeout) = self.query_timeout else {
            return self.store.query(scope, language).await;
        };

        tokio::time::timeout(timeout, self.store.query(scope, language)).await.map_err(|_| {
            let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(%scope, language, after_ms, "Label record query timed out");
            StoreError::Timeout { after_ms }
        })?
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::{
        FailingStore,
        SlowStore,
        record,
        scope,
        tea_room_records,
    };

    #[fixture]
    fn resolver() -> ScopeResolver<MemoryStore> {
        ScopeResolver::new(
            Arc::new(MemoryStore::from_records(tea_room_records())),
            FallbackPolicy::default(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn resolve_requested_language(resolver: ScopeResolver<MemoryStore>) {
        let resolution = resolver.resolve(&scope("teaRoomView"), "zh").await.unwrap();

        assert_that!(resolution.records.len(), eq(1));
        assert_that!(resolution.used_language.as_deref(), some(eq("zh")));
        assert_that!(resolution.is_fallback(), eq(false));
    }

    #[rstest]
    #[tokio::test]
    async fn resolve_falls_back_when_requested_language_is_empty(
        resolver: ScopeResolver<MemoryStore>,
    ) {
        let resolution = resolver.resolve(&scope("teaRoomView"), "fr").await.unwrap();

        assert_that!(resolution.records.len(), eq(2));
        assert_that!(resolution.records.iter().all(|r| r.language() == "en"), eq(true));
        assert_that!(resolution.requested_language, eq("fr"));
        assert_that!(resolution.used_language.as_deref(), some(eq("en")));
        assert_that!(resolution.is_fallback(), eq(true));
    }

    #[rstest]
    #[tokio::test]
    async fn resolve_never_merges_partial_language(resolver: ScopeResolver<MemoryStore>) {
        // zh has pageTitle only; step1.continueButton must not come from en
        let resolution = resolver.resolve(&scope("teaRoomView"), "zh").await.unwrap();

        assert_that!(resolution.records.iter().all(|r| r.language() == "zh"), eq(true));
        assert_that!(resolution.records.len(), eq(1));
    }

    #[rstest]
    #[tokio::test]
    async fn resolve_total_miss(resolver: ScopeResolver<MemoryStore>) {
        let resolution = resolver.resolve(&scope("nonexistentScope"), "fr").await.unwrap();

        assert_that!(resolution.records.len(), eq(0));
        assert_that!(resolution.is_found(), eq(false));
        assert_that!(resolution.is_fallback(), eq(false));
    }

    #[rstest]
    #[tokio::test]
    async fn resolve_empty_scope_is_a_miss(resolver: ScopeResolver<MemoryStore>) {
        let resolution = resolver.resolve(&scope(""), "en").await.unwrap();

        assert_that!(resolution.is_found(), eq(false));
    }

    #[tokio::test]
    async fn resolve_disabled_fallback() {
        let resolver = ScopeResolver::new(
            Arc::new(MemoryStore::from_records(tea_room_records())),
            FallbackPolicy::disabled(),
        );

        let resolution = resolver.resolve(&scope("teaRoomView"), "fr").await.unwrap();

        assert!(!resolution.is_found());
    }

    #[tokio::test]
    async fn resolve_fallback_language_itself_does_not_requery() {
        let store = Arc::new(MemoryStore::from_records([record("s", "a", "fr", "A")]));
        let resolver = ScopeResolver::new(store, FallbackPolicy::default());

        let resolution = resolver.resolve(&scope("s"), "en").await.unwrap();

        assert!(!resolution.is_found());
        assert_eq!(resolution.requested_language, "en");
    }

    #[tokio::test]
    async fn resolve_propagates_store_failure() {
        let resolver = ScopeResolver::new(Arc::new(FailingStore), FallbackPolicy::default());

        let result = resolver.resolve(&scope("teaRoomView"), "en").await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn resolve_times_out_slow_store() {
        let resolver =
            ScopeResolver::new(Arc::new(SlowStore::new(Duration::from_secs(5))), FallbackPolicy::default())
                .with_query_timeout(Duration::from_millis(20));

        let result = resolver.resolve(&scope("teaRoomView"), "en").await;

        assert_eq!(result, Err(StoreError::Timeout { after_ms: 20 }));
    }
}
