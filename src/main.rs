//! Entry point for the `label-resolver` command.

use std::process::ExitCode;

use clap::Parser;
use label_resolver::cli::{
    self,
    Arguments,
};
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Arguments::parse();

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();

    let output = match cli::run(&args).await {
        Ok(output) => output,
        Err(error) => {
            tracing::error!(scope = %args.scope, "{error}");
            return ExitCode::FAILURE;
        }
    };

    let mut rendered = match serde_json::to_vec_pretty(&output) {
        Ok(rendered) => rendered,
        Err(error) => {
            tracing::error!(%error, "Failed to render labels");
            return ExitCode::FAILURE;
        }
    };
    rendered.push(b'\n');

    let mut stdout = tokio::io::stdout();
    if let Err(error) = stdout.write_all(&rendered).await {
        tracing::error!(%error, "Failed to write labels");
        return ExitCode::FAILURE;
    }
    if let Err(error) = stdout.flush().await {
        tracing::error!(%error, "Failed to flush stdout");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
