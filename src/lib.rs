//! Incremental structural merge and reparenting.
//!
//! Two cores share this crate. The merge side folds streamed rule-block
//! snippets into an existing document with last-write-wins semantics per
//! key (CSS is the built-in strategy). The tree side classifies pointer
//! positions into placement intents and applies them as cycle-safe
//! reparents over a flat, id-keyed node store.
//!
//! Layering follows dependency direction: `domain` is pure logic,
//! `application` services orchestrate it over I/O boundary traits,
//! `infrastructure` provides the real implementations, `cli` is the thin
//! command surface.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use config::Settings;
pub use domain::{
    reparent, DragSession, DropZoneClassifier, HierarchyError, HierarchyStore, MergeError,
    MergeRegistry, MergeStrategy, NodeRecord, Placement, PlacementIntent, PointerPos, TargetRect,
};
