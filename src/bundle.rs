//! Label bundles: nested label maps built from flat records.

pub mod builder;
pub mod schema;

pub use builder::{
    BundleBuilder,
    LabelBundle,
    LabelNode,
};
pub use schema::{
    LabelSchema,
    SchemaError,
    decode_bundle,
};
