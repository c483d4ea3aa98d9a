// ABOUTME: Status command implementation.
// ABOUTME: Lists the bundle the console reports for this theme.

use super::session;
use webbundle::config::Config;
use webbundle::error::Result;
use webbundle::output::Output;

/// Show the console's record for the theme in `config`.
pub async fn status(config: Config, output: Output) -> Result<()> {
    let target = config.target()?;
    let mut lifecycle = session::open(&config, &output).await?;
    let result = lifecycle.status().await;
    session::close(lifecycle, &output).await;

    match result? {
        Some(record) => output.report(
            &format!(
                "{}: bundle {} {} (start level {})",
                target.bundle,
                record.id,
                record.status,
                record.level.trim()
            ),
            &record,
        ),
        None => output.report(
            &format!("{}: not installed", target.bundle),
            &serde_json::json!({ "bundle": target.bundle.as_str(), "installed": false }),
        ),
    }
    Ok(())
}
