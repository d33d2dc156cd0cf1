//! Core types used throughout the project.

use std::fmt;

/// Default separator between scope and label key segments.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Splits `text` by `separator`, dropping empty segments.
fn split_segments(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return if text.is_empty() { Vec::new() } else { vec![text.to_string()] };
    }
    text.split(separator).filter(|s| !s.is_empty()).map(ToString::to_string).collect()
}

/// A hierarchical scope identifier (e.g. `teaRoomView.enhancedReflectionModule.step1`).
///
/// Parsed once into segments so matching and nesting never re-split strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey {
    /// Non-empty segments, outermost first
    segments: Vec<String>,
}

impl ScopeKey {
    /// Parses a scope from its textual form.
    ///
    /// # Examples
    /// ```
    /// use label_resolver::types::ScopeKey;
    ///
    /// let scope = ScopeKey::parse("teaRoomView.step1", ".");
    /// assert_eq!(scope.segments(), ["teaRoomView", "step1"]);
    /// ```
    #[must_use]
    pub fn parse(text: &str, separator: &str) -> Self {
        Self { segments: split_segments(text, separator) }
    }

    /// Builds a scope from already separated segments.
    #[must_use]
    pub fn from_segments<I, T>(segments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).filter(|s| !s.is_empty()).collect() }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if `self` is `base` itself or a child section of it.
    ///
    /// Matching is segment-wise, so `teaRoomViewExtra` is not under `teaRoomView`.
    #[must_use]
    pub fn is_within(&self, base: &Self) -> bool {
        self.segments.starts_with(&base.segments)
    }

    /// Returns the section path of `self` relative to `base`.
    ///
    /// `None` when `self` is not within `base`; an empty slice when they are equal.
    #[must_use]
    pub fn section_after(&self, base: &Self) -> Option<&[String]> {
        self.segments.strip_prefix(base.segments.as_slice())
    }

    /// Joins the segments with `separator`.
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

/// Always rendered with [`DEFAULT_SEPARATOR`]; use [`ScopeKey::join`] where the
/// configured separator is known.
impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_SEPARATOR))
    }
}

/// A label key as an ordered list of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    /// Non-empty segments, outermost first
    segments: Vec<String>,
}

impl KeyPath {
    /// Parses a label key, splitting nested segments on `separator`.
    #[must_use]
    pub fn parse(text: &str, separator: &str) -> Self {
        Self { segments: split_segments(text, separator) }
    }

    /// Builds a key path from explicit segments.
    ///
    /// A segment may contain the separator literally; it is never split.
    #[must_use]
    pub fn from_segments<I, T>(segments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).filter(|s| !s.is_empty()).collect() }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(DEFAULT_SEPARATOR))
    }
}

/// Normalize language code (trim, lowercase and replace `_` with `-`).
#[must_use]
pub fn normalize_language_code(code: &str) -> String {
    code.trim().to_lowercase().replace('_', "-")
}

/// Checks that `code` looks like a language tag (`en`, `zh-CN`, `sr-Cyrl-BA`).
///
/// The primary subtag must be 2-3 ASCII letters; each further subtag 1-8
/// ASCII alphanumerics. Both `-` and `_` are accepted as delimiters.
#[must_use]
pub fn is_well_formed_language_code(code: &str) -> bool {
    let mut subtags = code.split(['-', '_']);

    let Some(primary) = subtags.next() else {
        return false;
    };
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    subtags.all(|tag| (1..=8).contains(&tag.len()) && tag.chars().all(|c| c.is_ascii_alphanumeric()))
}
