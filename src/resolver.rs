//! Scope resolution: record retrieval and language fallback.

pub mod fallback;
pub mod scope;

pub use fallback::FallbackPolicy;
pub use scope::{
    ScopeResolution,
    ScopeResolver,
};
