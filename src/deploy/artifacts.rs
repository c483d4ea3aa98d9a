// ABOUTME: Removal of packaged theme artifacts from the local build output.
// ABOUTME: The filesystem implementation deletes every file matching the target's pattern.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

use super::target::ArtifactPattern;

/// Deletes packaged artifacts and reports which ones existed.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Delete every file matching `pattern`. An empty result means nothing
    /// matched, which is not an error.
    async fn remove_matching(&self, pattern: &ArtifactPattern) -> io::Result<Vec<PathBuf>>;
}

/// Artifacts on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifacts;

impl FsArtifacts {
    /// Files matching `pattern`, sorted, without touching them.
    pub async fn list_matching(&self, pattern: &ArtifactPattern) -> io::Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&pattern.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if pattern.matches(file_name) {
                found.push(entry.path());
            }
        }

        found.sort();
        Ok(found)
    }
}

#[async_trait]
impl ArtifactStore for FsArtifacts {
    async fn remove_matching(&self, pattern: &ArtifactPattern) -> io::Result<Vec<PathBuf>> {
        let found = self.list_matching(pattern).await?;
        for path in &found {
            tokio::fs::remove_file(path).await?;
            tracing::debug!(path = %path.display(), "removed artifact");
        }
        Ok(found)
    }
}
