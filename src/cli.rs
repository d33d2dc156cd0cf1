//! Command-line lookup of one scope's label bundle.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;

use crate::bundle::LabelBundle;
use crate::config::{
    ConfigError,
    ConfigManager,
};
use crate::input::record::{
    IngestError,
    load_records_file,
};
use crate::store::MemoryStore;
use crate::view::{
    ViewError,
    ViewFetcher,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Resolve the localized labels of a view scope", long_about = None)]
pub struct Arguments {
    /// JSON records file (overrides `recordsFile` in the config file)
    #[arg(long)]
    pub records: Option<PathBuf>,

    /// Directory containing `.label-resolver.json`
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Base scope to resolve, e.g. `teaRoomView`
    #[arg(long)]
    pub scope: String,

    /// Requested language, e.g. `zh`
    #[arg(long, env = "LABEL_RESOLVER_LANGUAGE")]
    pub language: String,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("No records file given. Pass --records or set \"recordsFile\" in the config file")]
    MissingRecords,
}

/// JSON document printed for one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupOutput {
    pub scope: String,
    pub requested_language: String,
    pub used_language: Option<String>,
    /// `null` when the scope has no records in either language
    pub labels: Option<LabelBundle>,
}

/// Loads configuration and records, then resolves the requested scope.
///
/// # Errors
/// Configuration, ingestion and store failures.
pub async fn run(args: &Arguments) -> Result<LookupOutput, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(args.workspace.clone())).await?;
    let settings = config_manager.get_settings();

    let records_path =
        args.records.clone().or_else(|| config_manager.records_path()).ok_or(CliError::MissingRecords)?;
    let records = load_records_file(&records_path, &settings.scope_separator).await?;
    tracing::info!(count = records.len(), path = %records_path.display(), "Loaded label records");

    let store = Arc::new(MemoryStore::from_records(records));
    let fetcher = ViewFetcher::from_settings(store, settings);
    let view = fetcher.fetch_labels::<LabelBundle>(&args.scope, &args.language).await?;

    Ok(LookupOutput {
        scope: args.scope.clone(),
        requested_language: view.requested_language,
        used_language: view.used_language,
        labels: view.labels,
    })
}
