//! On-disk last-known-good snapshot.
//!
//! Every successful upstream fetch is written here so a restarted process
//! can still answer while the upstream calendar is unreachable. The file
//! holds raw titles, so it is written owner-only on Unix.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cache::CacheEntry;
use crate::error::{ServerError, ServerResult};

/// JSON snapshot of the last fetched [`CacheEntry`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the snapshot; `Ok(None)` if none was ever written.
    pub async fn load(&self) -> ServerResult<Option<CacheEntry>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ServerError::io(&self.path, e)),
        };
        let entry = serde_json::from_str(&content).map_err(|source| ServerError::Snapshot {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(entry))
    }

    /// Writes the snapshot atomically: temp file first, then rename.
    pub async fn save(&self, entry: &CacheEntry) -> ServerResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ServerError::io(parent, e))?;
        }

        let content = serde_json::to_vec(entry).map_err(|source| ServerError::Snapshot {
            path: self.path.clone(),
            source,
        })?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content)
            .await
            .map_err(|e| ServerError::io(&temp_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&temp_path, perms)
                .await
                .map_err(|e| ServerError::io(&temp_path, e))?;
        }

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| ServerError::io(&self.path, e))?;

        debug!(path = %self.path.display(), events = entry.events.len(), "saved snapshot");
        Ok(())
    }
}
