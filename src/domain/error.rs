//! Domain-level errors (no I/O concerns)

use thiserror::Error;

use crate::domain::hierarchy::NodeId;

/// Violations of the hierarchy invariants.
///
/// Snapshot validation and rejected moves share this taxonomy. Rejections
/// never leave a partially-applied change behind; catching one of these means
/// the structure is exactly as it was before the call.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("node {0} is claimed as a child by more than one parent")]
    MultipleParents(NodeId),

    #[error("cycle detected in hierarchy at: {0}")]
    CycleDetected(NodeId),

    // A field named `source` would be picked up as the error's cause by
    // thiserror, so the moved node goes by `source_id`.
    #[error("move rejected: {target_id} is inside the subtree of {source_id}")]
    CycleBlocked { source_id: NodeId, target_id: NodeId },

    #[error("move rejected: {0} cannot be moved relative to itself")]
    SelfMove(NodeId),

    #[error("move rejected: {0} is a root and cannot take siblings")]
    RootSibling(NodeId),
}

impl HierarchyError {
    /// Rejections that callers should surface as a soft notice rather than a
    /// hard failure. The structure is untouched either way.
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            HierarchyError::SelfMove(_) | HierarchyError::RootSibling(_)
        )
    }
}

/// Failures of the language merge dispatch.
///
/// Incomplete input is deliberately absent here: a snippet with unbalanced
/// braces degrades to the blocks that did scan and still merges.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MergeError {
    #[error("no merge strategy registered for language '{0}'")]
    UnknownLanguage(String),

    #[error("merge strategy for '{language}' failed: {message}")]
    Strategy { language: String, message: String },
}

pub type HierarchyResult<T> = Result<T, HierarchyError>;
pub type MergeResult<T> = Result<T, MergeError>;
