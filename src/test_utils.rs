//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::sync::Arc;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::time::Duration;

use crate::input::record::LabelRecord;
use crate::store::{
    LabelRecordStore,
    MemoryStore,
    StoreError,
};
use crate::types::ScopeKey;

/// テスト用の `LabelRecord` を作成する（区切り文字は `.`）
pub(crate) fn record(scope: &str, label: &str, language: &str, text: &str) -> LabelRecord {
    LabelRecord::new(scope, label, language, text, ".")
}

/// テスト用の `ScopeKey` を作成する
pub(crate) fn scope(text: &str) -> ScopeKey {
    ScopeKey::parse(text, ".")
}

/// 茶室画面のレコード一式
///
/// - `en`: `pageTitle` と `step1.continueButton`
/// - `zh`: `pageTitle` のみ
pub(crate) fn tea_room_records() -> Vec<LabelRecord> {
    vec![
        record("teaRoomView", "pageTitle", "en", "Tranquil Tea Room"),
        record("teaRoomView", "pageTitle", "zh", "静心茶室"),
        record("teaRoomView.step1", "continueButton", "en", "Continue"),
    ]
}

/// 常に失敗するストア
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailingStore;

impl LabelRecordStore for FailingStore {
    async fn query(&self, _scope: &ScopeKey, _language: &str) -> Result<Vec<LabelRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// 応答前に指定時間待機するストア（中身は茶室レコード）
#[derive(Debug, Clone)]
pub(crate) struct SlowStore {
    /// 待機時間
    delay: Duration,
    /// 実際のレコード
    inner: MemoryStore,
}

impl SlowStore {
    /// 新しい `SlowStore` を作成
    pub(crate) fn new(delay: Duration) -> Self {
        Self { delay, inner: MemoryStore::from_records(tea_room_records()) }
    }
}

impl LabelRecordStore for SlowStore {
    async fn query(&self, scope: &ScopeKey, language: &str) -> Result<Vec<LabelRecord>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.query(scope, language).await
    }
}

/// クエリ回数を数えるストア
#[derive(Debug, Clone, Default)]
pub(crate) struct CountingStore {
    /// 実際のレコード
    pub(crate) inner: MemoryStore,
    /// クエリ回数
    pub(crate) queries: Arc<AtomicUsize>,
}

impl CountingStore {
    /// 新しい `CountingStore` を作成
    pub(crate) fn new(records: Vec<LabelRecord>) -> Self {
        Self { inner: MemoryStore::from_records(records), queries: Arc::new(AtomicUsize::new(0)) }
    }

    /// これまでのクエリ回数
    pub(crate) fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl LabelRecordStore for CountingStore {
    async fn query(&self, scope: &ScopeKey, language: &str) -> Result<Vec<LabelRecord>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(scope, language).await
    }

    fn generation(&self) -> u64 {
        self.inner.generation()
    }
}
