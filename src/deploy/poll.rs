// ABOUTME: Waits for an asynchronous uninstall to finish on the console.
// ABOUTME: Re-queries the bundle listing at a fixed interval until the bundle is gone.

use std::time::Duration;
use tokio::sync::watch;

use super::error::DeployError;
use crate::console::Transport;
use crate::protocol::BundleShell;
use crate::types::BundleName;

/// How the uninstall wait re-checks the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between listing queries.
    pub interval: Duration,
    /// Give up after this many queries. `None` waits indefinitely.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: Some(120),
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Keep polling until the bundle disappears, however long that takes.
    pub fn unbounded(interval: Duration) -> Self {
        Self::new(interval, None)
    }
}

/// Query the listing until `bundle` no longer appears.
///
/// Queries are strictly sequential: the next one is sent only after the
/// previous reply arrived and the interval elapsed. Cancellation is observed
/// only while sleeping, never while a command is in flight. Returns the number
/// of queries sent.
pub(crate) async fn wait_for_uninstall<T: Transport>(
    shell: &mut BundleShell<T>,
    bundle: &BundleName,
    policy: &PollPolicy,
    cancel: &mut Option<watch::Receiver<bool>>,
) -> Result<u32, DeployError> {
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let Some(record) = shell.find_bundle(bundle).await? else {
            tracing::debug!(bundle = %bundle, attempts, "bundle uninstalled");
            return Ok(attempts);
        };

        tracing::debug!(
            bundle = %bundle,
            id = %record.id,
            status = %record.status,
            attempts,
            "bundle still listed, waiting"
        );

        if let Some(max) = policy.max_attempts
            && attempts >= max
        {
            return Err(DeployError::UninstallTimeout {
                bundle: bundle.to_string(),
                attempts,
            });
        }

        pause(policy.interval, cancel, bundle).await?;
    }
}

async fn pause(
    interval: Duration,
    cancel: &mut Option<watch::Receiver<bool>>,
    bundle: &BundleName,
) -> Result<(), DeployError> {
    let Some(rx) = cancel.as_mut() else {
        tokio::time::sleep(interval).await;
        return Ok(());
    };

    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);

    loop {
        if *rx.borrow_and_update() {
            return Err(DeployError::Cancelled {
                bundle: bundle.to_string(),
            });
        }

        tokio::select! {
            () = &mut sleep => return Ok(()),
            changed = rx.changed() => {
                if changed.is_err() {
                    // Sender gone: nobody can cancel any more.
                    (&mut sleep).await;
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_bounded_one_second() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.max_attempts, Some(120));
    }

    #[test]
    fn unbounded_policy_has_no_limit() {
        let policy = PollPolicy::unbounded(Duration::from_millis(5));
        assert_eq!(policy.max_attempts, None);
    }

    #[tokio::test]
    async fn pause_without_cancel_just_sleeps() {
        let bundle = BundleName::new("acme").unwrap();
        let mut cancel = None;
        pause(Duration::from_millis(1), &mut cancel, &bundle)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pause_observes_prior_cancellation() {
        let bundle = BundleName::new("acme").unwrap();
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let mut cancel = Some(rx);

        let err = pause(Duration::from_secs(60), &mut cancel, &bundle)
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn pause_survives_dropped_sender() {
        let bundle = BundleName::new("acme").unwrap();
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let mut cancel = Some(rx);

        pause(Duration::from_millis(1), &mut cancel, &bundle)
            .await
            .unwrap();
    }
}
