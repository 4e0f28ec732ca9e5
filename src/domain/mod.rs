//! Domain layer: merge, classification, and tree logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod hierarchy;
pub mod merge;
pub mod placement;
pub mod reparent;
pub mod rules;
pub mod session;

pub use error::{HierarchyError, MergeError};
pub use hierarchy::{HierarchyStore, NodeId, NodeRecord, StructuralNode};
pub use merge::{CssMerge, MergeRegistry, MergeStrategy};
pub use placement::{
    DropZoneClassifier, Placement, PlacementIntent, PointerPos, TargetRect, DROP_EDGE_FRACTION,
    HOVER_EDGE_FRACTION,
};
pub use reparent::{is_descendant, reparent, Topology};
pub use session::DragSession;
