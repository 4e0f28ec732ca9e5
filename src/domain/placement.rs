//! Pointer-position classification against a drop target.

use std::fmt;

use crate::domain::hierarchy::NodeId;

/// Edge fraction used for hover feedback previews.
pub const HOVER_EDGE_FRACTION: f64 = 0.2;
/// Edge fraction used for the final drop decision.
pub const DROP_EDGE_FRACTION: f64 = 0.3;

/// A pointer coordinate in viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding region of a drop target, viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl TargetRect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The structural operation a pointer gesture resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Insert as the previous sibling of the anchor.
    Before,
    /// Insert as the next sibling of the anchor.
    After,
    /// Append as the last child of the anchor.
    Into,
}

impl Placement {
    /// Short label shown while hovering, before the drop lands.
    pub fn preview_label(&self) -> &'static str {
        match self {
            Placement::Before => "insert before",
            Placement::After => "insert after",
            Placement::Into => "append as child",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Placement::Before => "before",
            Placement::After => "after",
            Placement::Into => "into",
        };
        write!(f, "{name}")
    }
}

/// A placement coupled with the node it is relative to.
///
/// Recomputed on every pointer move and consumed by a reparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementIntent {
    pub kind: Placement,
    pub anchor: NodeId,
}

impl PlacementIntent {
    pub fn new(kind: Placement, anchor: impl Into<NodeId>) -> Self {
        Self {
            kind,
            anchor: anchor.into(),
        }
    }
}

/// Classifies pointer positions by proximity to a target's edges.
///
/// The edge margins reach `width * fraction` in from the left and right and
/// `height * fraction` in from the top and bottom. Inside a margin the
/// gesture means a sibling insert; the interior means nesting.
#[derive(Debug, Clone, Copy)]
pub struct DropZoneClassifier {
    edge_fraction: f64,
}

impl DropZoneClassifier {
    pub fn new(edge_fraction: f64) -> Self {
        Self { edge_fraction }
    }

    pub fn edge_fraction(&self) -> f64 {
        self.edge_fraction
    }

    /// Resolve a pointer against a target's bounding region.
    ///
    /// Top/left is checked before bottom/right, so a pointer that lands in
    /// both margins of a small target resolves to `Before`. Callers depend
    /// on that tie-break staying put.
    pub fn classify(&self, pointer: PointerPos, rect: TargetRect) -> Placement {
        let margin_x = rect.width * self.edge_fraction;
        let margin_y = rect.height * self.edge_fraction;

        let in_top = pointer.y < rect.top + margin_y;
        let in_bottom = pointer.y > rect.bottom() - margin_y;
        let in_left = pointer.x < rect.left + margin_x;
        let in_right = pointer.x > rect.right() - margin_x;

        if in_top || in_left {
            Placement::Before
        } else if in_bottom || in_right {
            Placement::After
        } else {
            Placement::Into
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_dead_center_when_classifying_then_placement_is_into() {
        let classifier = DropZoneClassifier::new(DROP_EDGE_FRACTION);
        let rect = TargetRect::new(0.0, 0.0, 100.0, 100.0);

        let placement = classifier.classify(PointerPos::new(50.0, 50.0), rect);

        assert_eq!(placement, Placement::Into);
    }

    #[test]
    fn given_margin_boundary_when_classifying_then_exact_edge_is_exclusive() {
        let classifier = DropZoneClassifier::new(DROP_EDGE_FRACTION);
        let rect = TargetRect::new(0.0, 0.0, 100.0, 100.0);

        // y == top + margin is not inside the top margin.
        let placement = classifier.classify(PointerPos::new(50.0, 30.0), rect);

        assert_eq!(placement, Placement::Into);
    }

    #[test]
    fn given_corner_pointer_when_classifying_then_before_wins_the_tie() {
        let classifier = DropZoneClassifier::new(DROP_EDGE_FRACTION);
        let rect = TargetRect::new(0.0, 0.0, 10.0, 10.0);

        // Bottom-left corner sits in both the left and bottom margins.
        let placement = classifier.classify(PointerPos::new(0.5, 9.5), rect);

        assert_eq!(placement, Placement::Before);
    }
}
