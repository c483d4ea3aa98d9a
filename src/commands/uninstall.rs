// ABOUTME: Uninstall command implementation.
// ABOUTME: Removes build artifacts and the theme's bundle from the console.

use super::session;
use webbundle::config::Config;
use webbundle::deploy::{DeployLock, DeploymentTarget, FsArtifacts, UninstallOutcome};
use webbundle::error::Result;
use webbundle::output::Output;

/// Uninstall the theme described by `config`.
pub async fn uninstall(config: Config, force: bool, mut output: Output) -> Result<()> {
    output.start_timer();
    let target = config.target()?;

    output.progress(&format!("Uninstalling {}", target.bundle));
    output.progress("  → Acquiring deploy lock...");
    let lock = DeployLock::acquire(target.theme_path(), &target.bundle, force)?;

    // With no artifacts there is nothing to uninstall and no reason to
    // require a reachable console.
    if !has_artifacts(&target).await? {
        lock.release()?;
        output.report(
            &format!("Nothing deployed for {}", target.bundle),
            &UninstallOutcome::NothingDeployed,
        );
        return Ok(());
    }

    let mut lifecycle = session::open_cancellable(&config, &output).await?;
    let result = lifecycle.uninstall().await;
    session::close(lifecycle, &output).await;
    lock.release()?;

    let outcome = result?;
    let summary = match &outcome {
        UninstallOutcome::NothingDeployed => format!("Nothing deployed for {}", target.bundle),
        UninstallOutcome::ArtifactsRemoved { removed } => format!(
            "Removed {} artifact(s); no {} bundle was listed",
            removed.len(),
            target.bundle
        ),
        UninstallOutcome::Uninstalled { id, removed } => format!(
            "Uninstalled bundle {id} and removed {} artifact(s)",
            removed.len()
        ),
    };
    output.report(&summary, &outcome);
    output.success("Uninstall complete!");
    Ok(())
}

async fn has_artifacts(target: &DeploymentTarget) -> Result<bool> {
    Ok(!FsArtifacts.list_matching(&target.artifacts).await?.is_empty())
}
