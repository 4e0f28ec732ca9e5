//! Tree snapshot service
//!
//! Loads and saves the persisted flat record list, stamping a last-updated
//! time on every save.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{HierarchyStore, NodeRecord};
use crate::infrastructure::traits::FileSystem;

/// Persisted snapshot envelope.
///
/// `last_updated` is epoch milliseconds on the wire; older snapshots
/// without the field still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Service for loading and saving hierarchy snapshots.
pub struct SnapshotService {
    fs: Arc<dyn FileSystem>,
}

impl SnapshotService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load a snapshot file into a validated store.
    ///
    /// Malformed JSON and invariant violations (duplicate ids, unknown
    /// children, cycles) are both load failures; no partially-valid store
    /// ever escapes.
    pub fn load(&self, path: &Path) -> ApplicationResult<HierarchyStore> {
        let raw = self
            .fs
            .read_to_string(path)
            .with_path_context("read snapshot", path)?;
        let snapshot: TreeSnapshot =
            serde_json::from_str(&raw).map_err(|e| ApplicationError::Snapshot {
                message: format!("{}: {}", path.display(), e),
            })?;
        debug!(
            "load: {} nodes from {}",
            snapshot.nodes.len(),
            path.display()
        );
        Ok(HierarchyStore::from_records(snapshot.nodes)?)
    }

    /// Save a store back to `path`, stamping `last_updated` with now.
    pub fn save(&self, path: &Path, store: &HierarchyStore) -> ApplicationResult<()> {
        let snapshot = TreeSnapshot {
            nodes: store.to_records(),
            last_updated: Some(Utc::now()),
        };
        let json =
            serde_json::to_string_pretty(&snapshot).map_err(|e| ApplicationError::Snapshot {
                message: e.to_string(),
            })?;
        self.fs
            .write_atomic(path, &json)
            .with_path_context("write snapshot", path)?;
        debug!("save: {} nodes to {}", store.len(), path.display());
        Ok(())
    }
}
