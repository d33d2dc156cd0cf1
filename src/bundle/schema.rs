//! Typed label bundles.
//!
//! A screen declares the shape of its labels as a plain serde struct and
//! gets it validated when the bundle is built:
//!
//! - optional leaves: `Option<String>` or `#[serde(default)]`
//! - mandatory leaves: plain `String` fields
//! - unexpected leaves: `#[serde(deny_unknown_fields)]`

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::builder::LabelBundle;

/// A resolved bundle does not fit the declared label shape.
#[derive(Error, Debug)]
#[error("Labels of scope '{scope}' ({language}) do not match the declared shape: {source}")]
pub struct SchemaError {
    pub scope: String,
    pub language: String,
    #[source]
    pub source: serde_json::Error,
}

/// A type that can be constructed from a resolved [`LabelBundle`].
///
/// Implemented for every deserializable type, including [`LabelBundle`]
/// itself, which always succeeds.
pub trait LabelSchema: Sized {
    /// # Errors
    /// Returns the deserialization error when the bundle shape does not match.
    fn from_bundle(bundle: &LabelBundle) -> Result<Self, serde_json::Error>;
}

impl<T: DeserializeOwned> LabelSchema for T {
    fn from_bundle(bundle: &LabelBundle) -> Result<Self, serde_json::Error> {
        serde_json::from_value(bundle.to_value())
    }
}

/// Converts `bundle` into `L`, tagging failures with the scope and language.
///
/// # Errors
/// Returns [`SchemaError`] when the bundle does not match `L`.
pub fn decode_bundle<L: LabelSchema>(
    bundle: &LabelBundle,
    scope: &str,
    language: &str,
) -> Result<L, SchemaError> {
    L::from_bundle(bundle).map_err(|source| SchemaError {
        scope: scope.to_string(),
        language: language.to_string(),
        source,
    })
}
