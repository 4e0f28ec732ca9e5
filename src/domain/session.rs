//! One drag gesture, from pick-up to drop.
//!
//! A session is a value owned by the caller: created on drag-start, fed
//! pointer moves, and consumed by the drop or by a cancel. Because the drop
//! takes the session by value, a finished gesture cannot leak its state
//! into the next one.

use tracing::trace;

use crate::domain::error::HierarchyResult;
use crate::domain::hierarchy::NodeId;
use crate::domain::placement::{
    DropZoneClassifier, PlacementIntent, PointerPos, TargetRect, DROP_EDGE_FRACTION,
    HOVER_EDGE_FRACTION,
};
use crate::domain::reparent::{reparent, Topology};

/// In-flight drag of one node.
///
/// Hover feedback and the final drop classify with different edge
/// fractions; the preview margins are tuned shallower than the decision
/// margins, so the two classifiers stay separate.
pub struct DragSession {
    source: NodeId,
    hover_classifier: DropZoneClassifier,
    drop_classifier: DropZoneClassifier,
    preview: Option<PlacementIntent>,
}

impl DragSession {
    /// Start a gesture for `source` with explicit edge fractions.
    pub fn new(source: impl Into<NodeId>, hover_fraction: f64, drop_fraction: f64) -> Self {
        Self {
            source: source.into(),
            hover_classifier: DropZoneClassifier::new(hover_fraction),
            drop_classifier: DropZoneClassifier::new(drop_fraction),
            preview: None,
        }
    }

    /// Start a gesture with the stock fractions.
    pub fn with_defaults(source: impl Into<NodeId>) -> Self {
        Self::new(source, HOVER_EDGE_FRACTION, DROP_EDGE_FRACTION)
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    /// Recompute the preview intent for a pointer move over `target`.
    ///
    /// Hovering the dragged node itself clears the preview instead of
    /// offering a self-move the drop would reject anyway.
    pub fn hover(
        &mut self,
        target: &str,
        pointer: PointerPos,
        rect: TargetRect,
    ) -> Option<&PlacementIntent> {
        if target == self.source {
            self.preview = None;
        } else {
            let kind = self.hover_classifier.classify(pointer, rect);
            trace!(target, %kind, "hover preview");
            self.preview = Some(PlacementIntent::new(kind, target));
        }
        self.preview.as_ref()
    }

    /// The intent the last hover produced, if any.
    pub fn preview(&self) -> Option<&PlacementIntent> {
        self.preview.as_ref()
    }

    /// Label for the current preview, for drop-site feedback.
    pub fn preview_label(&self) -> Option<&'static str> {
        self.preview
            .as_ref()
            .map(|intent| intent.kind.preview_label())
    }

    /// Land the gesture: classify with the drop fraction and apply the move.
    ///
    /// Consumes the session either way. A rejected move surfaces its error
    /// with the tree untouched; the stale hover preview dies with the
    /// session rather than carrying into the next gesture.
    pub fn drop_on<T: Topology>(
        self,
        tree: &mut T,
        target: &str,
        pointer: PointerPos,
        rect: TargetRect,
    ) -> HierarchyResult<PlacementIntent> {
        let kind = self.drop_classifier.classify(pointer, rect);
        let intent = PlacementIntent::new(kind, target);
        reparent(tree, &self.source, &intent)?;
        Ok(intent)
    }

    /// Abandon the gesture without touching the tree.
    pub fn cancel(self) {}
}
