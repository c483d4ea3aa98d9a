// ABOUTME: Test support utilities.
// ABOUTME: Provides an in-memory console, an in-memory artifact store, and tracing setup.

use async_trait::async_trait;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use webbundle::console::{ConsoleError, Transport};
use webbundle::deploy::{ArtifactPattern, ArtifactStore, DeploymentTarget};
use webbundle::locator::PlatformFamily;
use webbundle::types::BundleName;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("webbundle=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Target for bundle `name` rooted at `/themes/<name>`.
#[allow(dead_code)]
pub fn target(name: &str) -> DeploymentTarget {
    let bundle = BundleName::new(name).unwrap();
    DeploymentTarget::new(bundle, format!("/themes/{name}")).platform(PlatformFamily::Posix)
}

#[derive(Debug, Clone)]
pub struct FakeBundle {
    pub id: u32,
    pub status: String,
    pub location: String,
}

#[derive(Debug, Default)]
struct FakeState {
    bundles: Vec<FakeBundle>,
    /// (bundle id, listing queries it survives after `uninstall`)
    pending_removals: Vec<(u32, u32)>,
    next_id: u32,
    uninstall_lag: u32,
    reject_install: bool,
    log: Vec<String>,
    closed: bool,
}

/// A scripted Gogo shell holding an in-memory bundle table.
///
/// Clones share state, so a test can keep one handle for inspection while
/// the deployer owns the other.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct FakeConsole {
    state: Arc<Mutex<FakeState>>,
    in_flight: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FakeConsole {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                next_id: 100,
                ..FakeState::default()
            })),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pre-install an Active bundle deployed from `location`.
    pub fn with_bundle(self, id: u32, location: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.bundles.push(FakeBundle {
                id,
                status: "Active".to_string(),
                location: location.to_string(),
            });
            state.next_id = state.next_id.max(id + 1);
        }
        self
    }

    /// Keep uninstalled bundles listed for `queries` more listings.
    pub fn uninstall_lag(self, queries: u32) -> Self {
        self.state.lock().unwrap().uninstall_lag = queries;
        self
    }

    /// Answer every install with an exception instead of an id.
    pub fn reject_install(self) -> Self {
        self.state.lock().unwrap().reject_install = true;
        self
    }

    /// Every line received, in order.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    /// Verbs of every line received, in order.
    pub fn verbs(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(|line| line.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn bundles(&self) -> Vec<FakeBundle> {
        self.state.lock().unwrap().bundles.clone()
    }

    pub fn active_count(&self) -> usize {
        self.bundles().iter().filter(|b| b.status == "Active").count()
    }

    pub fn closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

impl FakeState {
    fn handle(&mut self, line: &str) -> String {
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        match verb {
            "lb" => self.list(rest),
            "stop" => self.set_status(rest, "Resolved"),
            "start" => self.set_status(rest, "Active"),
            "uninstall" => {
                let Ok(id) = rest.trim().parse::<u32>() else {
                    return format!("Cannot coerce uninstall({rest}) to any of []\n");
                };
                let lag = self.uninstall_lag;
                self.pending_removals.push((id, lag));
                String::new()
            }
            "install" => self.install(rest),
            other => format!("gogo: CommandNotFoundException: Command not found: {other}\n"),
        }
    }

    fn list(&mut self, args: &str) -> String {
        let mut gone = Vec::new();
        for (id, remaining) in &mut self.pending_removals {
            if *remaining == 0 {
                gone.push(*id);
            } else {
                *remaining -= 1;
            }
        }
        self.pending_removals.retain(|(id, _)| !gone.contains(id));
        self.bundles.retain(|b| !gone.contains(&b.id));

        let pattern = args
            .split('\'')
            .nth(1)
            .and_then(|p| Regex::new(p).ok());

        let mut out = String::new();
        for bundle in &self.bundles {
            let row = format!(
                "{:>4}|{:<11}|{:>5}|{}",
                bundle.id, bundle.status, 1, bundle.location
            );
            if pattern.as_ref().is_none_or(|re| re.is_match(&row)) {
                out.push_str(&row);
                out.push('\n');
            }
        }
        out
    }

    fn set_status(&mut self, args: &str, status: &str) -> String {
        let id = args.trim().parse::<u32>().ok();
        match self.bundles.iter_mut().find(|b| Some(b.id) == id) {
            Some(bundle) => {
                bundle.status = status.to_string();
                String::new()
            }
            None => format!("Cannot coerce {args} to any of []\n"),
        }
    }

    fn install(&mut self, uri: &str) -> String {
        if self.reject_install {
            return format!(
                "org.osgi.framework.BundleException: Could not create bundle object.: {uri}\n"
            );
        }
        let id = self.next_id;
        self.next_id += 1;
        self.bundles.push(FakeBundle {
            id,
            status: "Installed".to_string(),
            location: uri.to_string(),
        });
        format!("Bundle ID: {id}\n")
    }
}

#[async_trait]
impl Transport for FakeConsole {
    async fn exchange(&mut self, line: &str) -> Result<String, ConsoleError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(ConsoleError::Transport {
                message: format!("'{line}' sent while another command was in flight"),
            });
        }
        // Give an overlapping sender the chance to run before we answer.
        tokio::task::yield_now().await;

        let response = {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                Err(ConsoleError::Closed)
            } else {
                state.log.push(line.to_string());
                Ok(state.handle(line))
            }
        };

        self.in_flight.store(false, Ordering::SeqCst);
        response
    }

    async fn close(&mut self) -> Result<(), ConsoleError> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

/// Artifact files held in memory.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct MemoryArtifacts {
    files: Arc<Mutex<Vec<PathBuf>>>,
}

#[allow(dead_code)]
impl MemoryArtifacts {
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            files: Arc::new(Mutex::new(
                files.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            )),
        }
    }

    pub fn remaining(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifacts {
    async fn remove_matching(&self, pattern: &ArtifactPattern) -> io::Result<Vec<PathBuf>> {
        let mut files = self.files.lock().unwrap();
        let (mut removed, kept): (Vec<_>, Vec<_>) = files.drain(..).partition(|path| {
            path.parent() == Some(pattern.dir.as_path())
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| pattern.matches(n))
        });
        *files = kept;
        removed.sort();
        Ok(removed)
    }
}

/// Artifact store whose every removal fails.
#[derive(Debug, Clone, Copy, Default)]
#[allow(dead_code)]
pub struct FailingArtifacts;

#[async_trait]
impl ArtifactStore for FailingArtifacts {
    async fn remove_matching(&self, pattern: &ArtifactPattern) -> io::Result<Vec<PathBuf>> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("cannot delete {pattern}"),
        ))
    }
}
