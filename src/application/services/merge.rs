//! Snippet merge service
//!
//! File-facing use case over the merge registry: read the current text,
//! fold a snippet in, hand back or persist the full replacement text.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::error_ext::IoResultExt;
use crate::application::ApplicationResult;
use crate::domain::MergeRegistry;
use crate::infrastructure::traits::FileSystem;

/// Service for merging streamed snippets into files.
pub struct MergeService {
    fs: Arc<dyn FileSystem>,
    registry: MergeRegistry,
}

impl MergeService {
    /// Create a merge service with the built-in strategies.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_registry(fs, MergeRegistry::with_defaults())
    }

    /// Create a merge service over a caller-assembled registry.
    pub fn with_registry(fs: Arc<dyn FileSystem>, registry: MergeRegistry) -> Self {
        Self { fs, registry }
    }

    pub fn registry(&self) -> &MergeRegistry {
        &self.registry
    }

    /// Merge `snippet` into the file's current text and return the
    /// replacement text. Nothing is written.
    pub fn merge_text(
        &self,
        language: &str,
        path: &Path,
        snippet: &str,
    ) -> ApplicationResult<String> {
        debug!("merge: language={} path={}", language, path.display());
        let current = self
            .fs
            .read_to_string(path)
            .with_path_context("read current text", path)?;
        Ok(self.registry.merge(language, &current, snippet)?)
    }

    /// Merge `snippet` into the file and write the replacement text back.
    ///
    /// The write is atomic; a failed merge or a failed write leaves the
    /// previous content in place.
    pub fn merge_into_file(
        &self,
        language: &str,
        path: &Path,
        snippet: &str,
    ) -> ApplicationResult<String> {
        let merged = self.merge_text(language, path, snippet)?;
        self.fs
            .write_atomic(path, &merged)
            .with_path_context("write merged text", path)?;
        debug!("merge: wrote {} bytes to {}", merged.len(), path.display());
        Ok(merged)
    }
}
