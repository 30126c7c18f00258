use super::{decode_snapshot, encode_snapshot};
use crate::components::SnapshotStore;
use crate::digest::Event;
use crate::error::{snapshot_error, BotResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Snapshot kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load_snapshot(&self) -> BotResult<Vec<Event>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let events = decode_snapshot(&content)?;
                debug!("Loaded {} events from {}", events.len(), self.path.display());
                Ok(events)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No snapshot at {}, starting fresh", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(snapshot_error(&format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save_snapshot(&self, events: &[Event]) -> BotResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                snapshot_error(&format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = encode_snapshot(events)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, json).await.map_err(|e| {
            snapshot_error(&format!("Failed to write {}: {}", temp_path.display(), e))
        })?;
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            snapshot_error(&format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        info!("Saved {} events to {}", events.len(), self.path.display());
        Ok(())
    }
}
