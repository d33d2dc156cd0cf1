//! The per-screen entry point: labels plus domain data for one view.

use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::cache::{
    BundleCache,
    CachedResolution,
    ResolvedBundle,
};
use crate::bundle::{
    BundleBuilder,
    LabelSchema,
    SchemaError,
    decode_bundle,
};
use crate::config::ResolverSettings;
use crate::resolver::{
    ScopeResolution,
    ScopeResolver,
};
use crate::store::{
    LabelRecordStore,
    StoreError,
};
use crate::types::{
    DEFAULT_SEPARATOR,
    ScopeKey,
    normalize_language_code,
};

/// Failure of the domain data collaborator.
///
/// Reported next to the labels, never instead of them.
#[derive(Error, Debug)]
#[error("Failed to load view data: {0}")]
pub struct DataError(#[source] Box<dyn StdError + Send + Sync>);

impl DataError {
    pub fn new(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(error.into())
    }

    #[must_use]
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync> {
        self.0
    }
}

/// Hard failures of a view fetch.
#[derive(Error, Debug)]
pub enum ViewError {
    /// The record store failed; the system itself is unhealthy
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The resolved bundle does not match the declared label type
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Labels and domain data for one view.
#[derive(Debug)]
pub struct ViewResult<L, D> {
    /// `None` when the scope has no records in the requested nor the fallback language
    pub labels: Option<L>,
    /// Normalized language that was asked for
    pub requested_language: String,
    /// Language the labels came from
    pub used_language: Option<String>,
    /// `Ok(None)` when the view has no data loader
    pub data: Result<Option<D>, DataError>,
}

impl<L, D> ViewResult<L, D> {
    /// `true` if the labels come from the fallback language.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.used_language.as_deref().is_some_and(|used| used != self.requested_language)
    }

    #[must_use]
    pub const fn has_labels(&self) -> bool {
        self.labels.is_some()
    }
}

/// Resolves label bundles for views and pairs them with domain data.
///
/// One generic fetcher serves every screen; a screen only declares its label
/// type and its data loader.
#[derive(Debug)]
pub struct ViewFetcher<S> {
    /// Scope resolution with fallback
    resolver: ScopeResolver<S>,
    /// Separator used to parse textual scopes
    separator: String,
    /// Resolved bundles, shared between clones
    cache: Option<Arc<BundleCache>>,
}

impl<S> Clone for ViewFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            separator: self.separator.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<S: LabelRecordStore> ViewFetcher<S> {
    #[must_use]
    pub fn new(resolver: ScopeResolver<S>) -> Self {
        Self { resolver, separator: DEFAULT_SEPARATOR.to_string(), cache: None }
    }

    /// Builds a fetcher over `store` as described by `settings`.
    #[must_use]
    pub fn from_settings(store: Arc<S>, settings: &ResolverSettings) -> Self {
        let mut resolver = ScopeResolver::new(store, settings.fallback_policy());
        if let Some(timeout_ms) = settings.query_timeout_ms {
            resolver = resolver.with_query_timeout(Duration::from_millis(timeout_ms));
        }

        let fetcher = Self::new(resolver).with_separator(&settings.scope_separator);
        if settings.cache.enabled {
            fetcher.with_cache(BundleCache::new(settings.cache.max_entries))
        } else {
            fetcher
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        separator.clone_into(&mut self.separator);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: BundleCache) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    #[must_use]
    pub const fn resolver(&self) -> &ScopeResolver<S> {
        &self.resolver
    }

    #[must_use]
    pub fn cache(&self) -> Option<&BundleCache> {
        self.cache.as_deref()
    }

    /// Parses a textual scope with this fetcher's separator.
    #[must_use]
    pub fn parse_scope(&self, scope: &str) -> ScopeKey {
        ScopeKey::parse(scope, &self.separator)
    }

    /// Resolves the untyped bundle of `scope`.
    ///
    /// Returns `Ok(None)` when the scope is missing in both the requested and
    /// the fallback language. Results are cached when a cache is configured;
    /// a cache entry is only written once the bundle is complete.
    ///
    /// # Errors
    /// Store failures are propagated.
    pub async fn fetch_bundle(
        &self,
        scope: &ScopeKey,
        language: &str,
    ) -> Result<Option<Arc<ResolvedBundle>>, StoreError> {
        let language = normalize_language_code(language);
        let generation = self.resolver.store().generation();

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(scope, &language, generation).await
        {
            tracing::trace!(scope = %scope.join(&self.separator), %language, "Bundle cache hit");
            return Ok(hit.into_bundle());
        }

        let ScopeResolution { records, requested_language, used_language } =
            self.resolver.resolve(scope, &language).await?;

        let resolved = used_language.map(|used_language| {
            let bundle = BundleBuilder::build(scope, &records);
            tracing::debug!(
                scope = %scope.join(&self.separator),
                language = %requested_language,
                used_language = %used_language,
                leaves = bundle.leaf_count(),
                "Built label bundle"
            );
            Arc::new(ResolvedBundle {
                scope: scope.clone(),
                requested_language,
                used_language,
                bundle,
            })
        });

        if let Some(cache) = &self.cache {
            cache
                .insert(scope.clone(), language, generation, CachedResolution::from(resolved.clone()))
                .await;
        }

        Ok(resolved)
    }

    /// Fetches the labels of `scope` together with the data from `loader`.
    ///
    /// Both run concurrently. A failing loader ends up in
    /// [`ViewResult::data`] and leaves the labels intact. Dropping the
    /// returned future cancels both without leaving partial state behind.
    ///
    /// # Errors
    /// - [`ViewError::Store`] when the record store fails
    /// - [`ViewError::Schema`] when the bundle does not match `L`
    pub async fn fetch_view<L, D, F, Fut, E>(
        &self,
        scope: &str,
        language: &str,
        loader: F,
    ) -> Result<ViewResult<L, D>, ViewError>
    where
        L: LabelSchema,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<D, E>>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let scope_key = self.parse_scope(scope);
        let (resolved, data) = tokio::join!(self.fetch_bundle(&scope_key, language), loader());

        let data = data.map(Some).map_err(DataError::new);
        if let Err(error) = &data {
            tracing::warn!(scope, %error, "View data load failed");
        }

        self.compose(&scope_key, language, resolved?, data)
    }

    /// Fetches the labels of `scope` for a view without domain data.
    ///
    /// # Errors
    /// See [`ViewFetcher::fetch_view`].
    pub async fn fetch_labels<L: LabelSchema>(
        &self,
        scope: &str,
        language: &str,
    ) -> Result<ViewResult<L, ()>, ViewError> {
        let scope_key = self.parse_scope(scope);
        let resolved = self.fetch_bundle(&scope_key, language).await?;
        self.compose(&scope_key, language, resolved, Ok(None))
    }

    /// Warms the cache for `scopes` concurrently.
    ///
    /// Returns how many scopes resolved to a bundle.
    ///
    /// # Errors
    /// The first store failure is returned.
    pub async fn prefetch(&self, scopes: &[&str], language: &str) -> Result<usize, StoreError> {
        let keys: Vec<ScopeKey> = scopes.iter().map(|scope| self.parse_scope(scope)).collect();
        let results =
            futures::future::join_all(keys.iter().map(|key| self.fetch_bundle(key, language)))
                .await;

        let mut found = 0;
        for result in results {
            if result?.is_some() {
                found += 1;
            }
        }
        tracing::debug!(requested = scopes.len(), found, language, "Prefetched label bundles");
        Ok(found)
    }

    /// Assembles a [`ViewResult`], decoding the bundle into `L`.
    fn compose<L: LabelSchema, D>(
        &self,
        scope: &ScopeKey,
        language: &str,
        resolved: Option<Arc<ResolvedBundle>>,
        data: Result<Option<D>, DataError>,
    ) -> Result<ViewResult<L, D>, ViewError> {
        let requested_language = normalize_language_code(language);

        let Some(resolved) = resolved else {
            return Ok(ViewResult { labels: None, requested_language, used_language: None, data });
        };

        let labels = decode_bundle::<L>(
            &resolved.bundle,
            &scope.join(&self.separator),
            &resolved.used_language,
        )?;

        Ok(ViewResult {
            labels: Some(labels),
            requested_language,
            used_language: Some(resolved.used_language.clone()),
            data,
        })
    }
}
