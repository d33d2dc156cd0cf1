//! Nested label bundle construction from flat records.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

use crate::input::record::LabelRecord;
use crate::types::{
    KeyPath,
    ScopeKey,
};

/// A node of a label bundle: either a translated text or a nested section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelNode {
    Text(String),
    Section(LabelBundle),
}

impl LabelNode {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Section(_) => None,
        }
    }

    #[must_use]
    pub const fn as_section(&self) -> Option<&LabelBundle> {
        match self {
            Self::Text(_) => None,
            Self::Section(section) => Some(section),
        }
    }
}

/// Nested mapping of label keys to translated text for one scope and language.
///
/// Entries are ordered by key, so the shape never depends on record order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelBundle {
    /// Key → text or nested section
    entries: BTreeMap<String, LabelNode>,
}

impl LabelBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a node by path segments.
    #[must_use]
    pub fn get<K: AsRef<str>>(&self, path: &[K]) -> Option<&LabelNode> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.section(segment.as_ref())?;
        }
        current.entries.get(last.as_ref())
    }

    /// Looks up a text leaf by path segments.
    ///
    /// # Examples
    /// ```
    /// use label_resolver::bundle::BundleBuilder;
    /// use label_resolver::input::record::LabelRecord;
    /// use label_resolver::types::ScopeKey;
    ///
    /// let base = ScopeKey::parse("teaRoomView", ".");
    /// let records = [LabelRecord::new("teaRoomView.step1", "continueButton", "en", "Continue", ".")];
    /// let bundle = BundleBuilder::build(&base, &records);
    ///
    /// assert_eq!(bundle.text(&["step1", "continueButton"]), Some("Continue"));
    /// assert_eq!(bundle.text(&["step1"]), None);
    /// ```
    #[must_use]
    pub fn text<K: AsRef<str>>(&self, path: &[K]) -> Option<&str> {
        self.get(path).and_then(LabelNode::as_text)
    }

    /// Text leaf at `path`, or the caller's `default` when it is absent.
    #[must_use]
    pub fn text_or<'a, K: AsRef<str>>(&'a self, path: &[K], default: &'a str) -> &'a str {
        self.text(path).unwrap_or(default)
    }

    /// Direct child section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Self> {
        self.entries.get(name).and_then(LabelNode::as_section)
    }

    /// Number of direct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of text leaves at any depth.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                LabelNode::Text(_) => 1,
                LabelNode::Section(section) => section.leaf_count(),
            })
            .sum()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, LabelNode> {
        self.entries.iter()
    }

    /// Converts the bundle into nested JSON objects of strings.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, node)| {
                    let value = match node {
                        LabelNode::Text(text) => Value::String(text.clone()),
                        LabelNode::Section(section) => section.to_value(),
                    };
                    (key.clone(), value)
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a LabelBundle {
    type Item = (&'a String, &'a LabelNode);
    type IntoIter = btree_map::Iter<'a, String, LabelNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds a [`LabelBundle`] for one base scope from its flat records.
///
/// Each record lands at `section path + label key path`, where the section
/// path is the record scope relative to the base scope. Building is pure and
/// synchronous, and the result does not depend on the order records arrive in:
///
/// - a section and a text claiming the same key: the section is kept
/// - two texts on the same path: the record sorting last by
///   `(scope, label, language, text)` is kept
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    /// Scope the bundle is rooted at
    base: ScopeKey,
    /// Leaves collected so far, written out in [`BundleBuilder::finish`]
    leaves: Vec<PendingLeaf>,
}

/// A record accepted by the builder, placed relative to the base scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PendingLeaf {
    /// Record scope, the primary ordering key
    scope: ScopeKey,
    /// Record label key
    label: KeyPath,
    /// Record language
    language: String,
    /// Translated text
    text: String,
    /// Section path followed by label key path
    path: Vec<String>,
}

impl BundleBuilder {
    #[must_use]
    pub const fn new(base: ScopeKey) -> Self {
        Self { base, leaves: Vec::new() }
    }

    /// Builds a bundle from `records`.
    ///
    /// Records outside `base` are skipped.
    #[must_use]
    pub fn build<'r>(
        base: &ScopeKey,
        records: impl IntoIterator<Item = &'r LabelRecord>,
    ) -> LabelBundle {
        let mut builder = Self::new(base.clone());
        for record in records {
            builder.insert(record);
        }
        builder.finish()
    }

    /// Adds one record.
    pub fn insert(&mut self, record: &LabelRecord) {
        let Some(section) = record.scope().section_after(&self.base) else {
            tracing::debug!(
                base = %self.base,
                scope = %record.scope(),
                "Skipping record outside base scope"
            );
            return;
        };

        let path = section.iter().chain(record.label().segments()).cloned().collect();
        self.leaves.push(PendingLeaf {
            scope: record.scope().clone(),
            label: record.label().clone(),
            language: record.language().to_string(),
            text: record.text().to_string(),
            path,
        });
    }

    #[must_use]
    pub fn finish(mut self) -> LabelBundle {
        self.leaves.sort_unstable();

        let mut root = LabelBundle::new();
        for leaf in &self.leaves {
            insert_at(&mut root, &leaf.path, &leaf.text);
        }
        root
    }
}

/// Walks/creates sections along `path` and writes `text` at its end.
fn insert_at(bundle: &mut LabelBundle, path: &[String], text: &str) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        match bundle.entries.get_mut(head) {
            Some(LabelNode::Section(_)) => {
                tracing::warn!(key = %head, "Label text shadowed by a section with the same key");
            }
            Some(LabelNode::Text(existing)) => {
                tracing::warn!(key = %head, "Duplicate label path");
                text.clone_into(existing);
            }
            None => {
                bundle.entries.insert(head.clone(), LabelNode::Text(text.to_string()));
            }
        }
        return;
    }

    let node = bundle
        .entries
        .entry(head.clone())
        .or_insert_with(|| LabelNode::Section(LabelBundle::new()));
    if matches!(node, LabelNode::Text(_)) {
        tracing::warn!(key = %head, "Label section replaced a text with the same key");
        *node = LabelNode::Section(LabelBundle::new());
    }
    if let LabelNode::Section(section) = node {
        insert_at(section, rest, text);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{
        record,
        scope,
    };

    #[googletest::test]
    fn build_nests_dotted_label_keys() {
        let records = [record("S", "a.b", "en", "X"), record("S", "c", "en", "Y")];

        let bundle = BundleBuilder::build(&scope("S"), &records);

        assert_eq!(bundle.to_value(), json!({ "a": { "b": "X" }, "c": "Y" }));
    }

    #[googletest::test]
    fn build_nests_child_scopes() {
        let records = [
            record("teaRoomView", "pageTitle", "en", "Tranquil Tea Room"),
            record("teaRoomView.enhancedReflectionModule.step1", "continueButton", "en", "Continue"),
            record("teaRoomView.enhancedReflectionModule.step1", "backButton", "en", "Back"),
        ];

        let bundle = BundleBuilder::build(&scope("teaRoomView"), &records);

        assert_eq!(
            bundle.to_value(),
            json!({
                "pageTitle": "Tranquil Tea Room",
                "enhancedReflectionModule": {
                    "step1": { "continueButton": "Continue", "backButton": "Back" }
                }
            })
        );
        expect_that!(bundle.leaf_count(), eq(3));
        expect_that!(bundle.len(), eq(2));
    }

    #[googletest::test]
    fn build_is_order_independent() {
        let mut records = vec![
            record("S", "title", "en", "T"),
            record("S.a", "x", "en", "X"),
            record("S.a.b", "y", "en", "Y"),
            record("S.c", "z", "en", "Z"),
        ];
        let forward = BundleBuilder::build(&scope("S"), &records);
        records.reverse();
        let backward = BundleBuilder::build(&scope("S"), &records);

        assert_eq!(forward, backward);
    }

    #[googletest::test]
    fn build_skips_records_outside_base() {
        let records = [
            record("teaRoomView", "title", "en", "Tea"),
            record("teaRoomViewExtra", "title", "en", "Extra"),
        ];

        let bundle = BundleBuilder::build(&scope("teaRoomView"), &records);

        assert_eq!(bundle.to_value(), json!({ "title": "Tea" }));
    }

    #[googletest::test]
    fn build_keeps_literal_dot_segments() {
        let literal = LabelRecord::from_parts(
            scope("S"),
            KeyPath::from_segments(["v1.0"]),
            "en",
            "Version one",
        );

        let bundle = BundleBuilder::build(&scope("S"), [&literal]);

        expect_that!(bundle.text(&["v1.0"]), some(eq("Version one")));
        expect_that!(bundle.get(&["v1"]), none());
    }

    #[googletest::test]
    fn build_empty_records() {
        let records: Vec<LabelRecord> = Vec::new();
        let bundle = BundleBuilder::build(&scope("S"), &records);

        expect_that!(bundle.is_empty(), eq(true));
        assert_eq!(bundle.to_value(), json!({}));
    }

    #[rstest]
    #[case::same_path_other_language(
        vec![record("S", "a", "en", "first"), record("S", "a", "fr", "second")],
        json!({ "a": "second" })
    )]
    #[case::section_beats_text(
        vec![record("S", "a", "en", "text"), record("S.a", "b", "en", "nested")],
        json!({ "a": { "b": "nested" } })
    )]
    #[case::dotted_label_meets_child_scope(
        vec![record("S", "x.y", "en", "from label"), record("S.x", "y", "en", "from scope")],
        json!({ "x": { "y": "from scope" } })
    )]
    #[case::deep_section_beats_text(
        vec![
            record("S", "a", "en", "text"),
            record("S.a.b", "c", "en", "deep"),
            record("S", "d", "en", "kept"),
        ],
        json!({ "a": { "b": { "c": "deep" } }, "d": "kept" })
    )]
    fn build_collisions_ignore_record_order(
        #[case] records: Vec<LabelRecord>,
        #[case] expected: Value,
    ) {
        let forward = BundleBuilder::build(&scope("S"), &records);
        let backward = BundleBuilder::build(&scope("S"), records.iter().rev());

        assert_eq!(forward.to_value(), expected);
        assert_eq!(backward, forward);
    }

    #[googletest::test]
    fn accessors() {
        let records = [record("S", "title", "en", "Title"), record("S.step1", "next", "en", "Next")];
        let bundle = BundleBuilder::build(&scope("S"), &records);

        expect_that!(bundle.text(&["title"]), some(eq("Title")));
        expect_that!(bundle.text(&["step1", "next"]), some(eq("Next")));
        expect_that!(bundle.text(&["step1"]), none());
        expect_that!(bundle.text(&["missing", "next"]), none());
        expect_that!(bundle.text::<&str>(&[]), none());
        expect_that!(bundle.text_or(&["step1", "back"], "Back"), eq("Back"));
        expect_that!(bundle.section("step1").map(LabelBundle::len), some(eq(1)));
        expect_that!(bundle.iter().count(), eq(2));
    }

    #[googletest::test]
    fn serde_round_trip_shape() {
        let records = [record("S", "title", "en", "Title"), record("S.step1", "next", "en", "Next")];
        let bundle = BundleBuilder::build(&scope("S"), &records);

        let serialized = serde_json::to_value(&bundle).unwrap();
        assert_eq!(serialized, bundle.to_value());

        let restored: LabelBundle = serde_json::from_value(serialized).unwrap();
        assert_eq!(restored, bundle);
    }
}
