//! `.label-resolver.json` の読み込み

use std::io::ErrorKind;
use std::path::Path;

use super::{
    ConfigError,
    ResolverSettings,
};

/// ワークスペース直下の設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".label-resolver.json";

/// ワークスペースルートから設定ファイルを非同期に読み込む
///
/// ファイルがなければ `Ok(None)`
///
/// # Errors
/// - `NotFound` 以外の I/O エラー（ディレクトリ、権限など）
/// - JSON パースエラー
pub(super) async fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<ResolverSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "No configuration file, using defaults");
            return Ok(None);
        }
        Err(error) => return Err(error.into()),
    };

    let settings: ResolverSettings = serde_json::from_str(&content)?;
    tracing::debug!(path = %config_path.display(), "Loaded configuration");

    Ok(Some(settings))
}
