// ABOUTME: Shared helper for opening the console session and wiring Ctrl-C cancellation.
// ABOUTME: Used by the deploy, uninstall, and status commands.

use tokio::sync::watch;
use webbundle::config::Config;
use webbundle::console::ConsoleConnection;
use webbundle::deploy::FsArtifacts;
use webbundle::error::Result;
use webbundle::lifecycle::ThemeLifecycle;
use webbundle::output::Output;

/// Connect to the console named in `config`.
pub async fn open(config: &Config, output: &Output) -> Result<ThemeLifecycle<ConsoleConnection, FsArtifacts>> {
    output.progress(&format!(
        "  → Connecting to console at {}...",
        config.console
    ));
    Ok(ThemeLifecycle::connect(config).await?)
}

/// Connect and arrange for Ctrl-C to cancel a pending uninstall wait.
pub async fn open_cancellable(
    config: &Config,
    output: &Output,
) -> Result<ThemeLifecycle<ConsoleConnection, FsArtifacts>> {
    let lifecycle = open(config, output).await?;

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            let _ = tx.send(true);
        }
    });

    Ok(lifecycle.cancellation(rx))
}

/// Close the session; a failure here only warrants a warning.
pub async fn close(lifecycle: ThemeLifecycle<ConsoleConnection, FsArtifacts>, output: &Output) {
    if let Err(e) = lifecycle.close().await {
        output.warning(&format!("console disconnect failed: {e}"));
    }
}
