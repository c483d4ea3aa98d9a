// ABOUTME: Deploy command implementation.
// ABOUTME: Takes the deploy lock, runs the replace sequence, and reports the outcome.

use super::session;
use webbundle::config::Config;
use webbundle::deploy::{DeployLock, DeployOutcome};
use webbundle::error::Result;
use webbundle::output::Output;

/// Deploy the theme described by `config`.
pub async fn deploy(config: Config, force: bool, mut output: Output) -> Result<()> {
    output.start_timer();
    let target = config.target()?;

    output.progress(&format!(
        "Deploying {} from {}",
        target.bundle,
        target.theme_path().display()
    ));

    output.progress("  → Acquiring deploy lock...");
    let lock = DeployLock::acquire(target.theme_path(), &target.bundle, force)?;

    let mut lifecycle = session::open_cancellable(&config, &output).await?;
    output.progress(&format!("  → Installing {}", target.install_uri()));
    let result = lifecycle.deploy().await;
    session::close(lifecycle, &output).await;
    lock.release()?;

    let outcome = result?;
    match &outcome {
        DeployOutcome::Started { id, replaced } => {
            let summary = match replaced {
                Some(old) => format!("Deployed {} as bundle {id} (replaced {old})", target.bundle),
                None => format!("Deployed {} as bundle {id}", target.bundle),
            };
            output.report(&summary, &outcome);
            output.success("Deployment complete!");
        }
        DeployOutcome::InstallRejected { .. } => {
            output.warning("console did not report a bundle id; bundle was not started");
            output.report(&format!("Install of {} rejected", target.bundle), &outcome);
        }
    }

    Ok(())
}
