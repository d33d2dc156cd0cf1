//! Label record ingestion.
pub mod record;
