//! View-level label fetching.
//!
//! [`ViewFetcher`] resolves a scope's labels and runs the screen's data
//! loader side by side. Resolved bundles can be cached per
//! `(scope, language)`, and [`ViewSession`] lets a screen drop results of
//! requests it has since superseded.

pub mod cache;
pub mod fetcher;
pub mod session;

pub use cache::{
    BundleCache,
    CachedResolution,
    ResolvedBundle,
};
pub use fetcher::{
    DataError,
    ViewError,
    ViewFetcher,
    ViewResult,
};
pub use session::{
    ViewSession,
    ViewTicket,
};
