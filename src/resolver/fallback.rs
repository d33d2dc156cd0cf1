//! Language fallback policy.

use crate::types::normalize_language_code;

/// Decides whether a lookup is retried under a fallback language.
///
/// Fallback is all-or-nothing per language: it only applies when the
/// requested language has no records at all under a scope. A partially
/// translated scope is never back-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Normalized fallback language, `None` when fallback is disabled
    fallback_language: Option<String>,
}

impl FallbackPolicy {
    /// Default fallback language
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    #[must_use]
    pub fn new(fallback_language: &str) -> Self {
        Self { fallback_language: Some(normalize_language_code(fallback_language)) }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { fallback_language: None }
    }

    #[must_use]
    pub fn fallback_language(&self) -> Option<&str> {
        self.fallback_language.as_deref()
    }

    /// Returns the language to retry with after `requested` came back empty.
    ///
    /// `None` if fallback is disabled or `requested` already is the fallback.
    #[must_use]
    pub fn fallback_for(&self, requested: &str) -> Option<&str> {
        let fallback = self.fallback_language.as_deref()?;
        (normalize_language_code(requested) != fallback).then_some(fallback)
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LANGUAGE)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::other_language("fr", Some("en"))]
    #[case::same_language("en", None)]
    #[case::same_language_other_case("EN", None)]
    #[case::regional_variant("en-GB", Some("en"))]
    fn fallback_for_cases(#[case] requested: &str, #[case] expected: Option<&str>) {
        let policy = FallbackPolicy::default();
        assert_that!(policy.fallback_for(requested), eq(expected));
    }

    #[rstest]
    fn disabled_never_falls_back() {
        let policy = FallbackPolicy::disabled();

        assert_that!(policy.fallback_for("fr"), none());
        assert_that!(policy.fallback_language(), none());
    }

    #[rstest]
    fn custom_fallback_is_normalized() {
        let policy = FallbackPolicy::new("zh_CN");

        assert_that!(policy.fallback_language(), some(eq("zh-cn")));
        assert_that!(policy.fallback_for("zh-CN"), none());
        assert_that!(policy.fallback_for("en"), some(eq("zh-cn")));
    }
}
