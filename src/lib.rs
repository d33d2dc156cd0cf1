//! label-resolver
//!
//! 画面単位（スコープ）でローカライズされたラベルを解決し、言語フォールバックと
//! ネストしたバンドル構築を行うライブラリ

pub mod bundle;
pub mod cli;
pub mod config;
pub mod input;
pub mod resolver;
pub mod store;
pub mod types;
pub mod view;

#[cfg(test)]
mod test_utils;

pub use bundle::{
    LabelBundle,
    LabelSchema,
};
pub use resolver::{
    FallbackPolicy,
    ScopeResolver,
};
pub use store::{
    LabelRecordStore,
    MemoryStore,
};
pub use view::{
    ViewFetcher,
    ViewResult,
};
