//! Cycle-safe reparenting over an id-keyed topology.
//!
//! The engine is generic over [`Topology`] so it can drive any structure
//! that exposes children/parent relations by id, not just the built-in
//! [`crate::domain::hierarchy::HierarchyStore`].

use std::collections::HashSet;

use tracing::debug;

use crate::domain::error::{HierarchyError, HierarchyResult};
use crate::domain::hierarchy::NodeId;
use crate::domain::placement::{Placement, PlacementIntent};

/// Structural access the reparent engine needs.
///
/// Implementors expose id-keyed relations; the engine never touches payloads
/// or rendering. The mutators are only called once every precondition has
/// passed, so implementations need no rollback story.
pub trait Topology {
    /// Whether `id` names a node.
    fn contains(&self, id: &str) -> bool;

    /// Total node count, bounding the descendant walk.
    fn node_count(&self) -> usize;

    /// Ordered child ids of `id`. Empty for leaves and unknown ids.
    fn children_of(&self, id: &str) -> &[NodeId];

    /// Parent of `id`. None for roots and unknown ids.
    fn parent_of(&self, id: &str) -> Option<&NodeId>;

    /// Remove `id` from its parent's child list, making it a root.
    fn detach(&mut self, id: &str);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &str, child: &str);

    /// Splice `child` into `parent`'s child list at `index`.
    fn insert_child_at(&mut self, parent: &str, index: usize, child: &str);
}

/// Whether `candidate` lies inside the subtree rooted at `ancestor`.
///
/// The walk carries a visited set and stops once it has seen as many nodes
/// as the topology holds, so even a corrupted graph with a reference loop
/// terminates instead of hanging.
pub fn is_descendant<T: Topology + ?Sized>(tree: &T, ancestor: &str, candidate: &str) -> bool {
    let bound = tree.node_count();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = tree.children_of(ancestor).to_vec();

    while let Some(current) = stack.pop() {
        if current == candidate {
            return true;
        }
        if visited.len() >= bound {
            break;
        }
        if visited.insert(current.clone()) {
            stack.extend(tree.children_of(&current).iter().cloned());
        }
    }
    false
}

/// Move `source` relative to `intent.anchor`, or reject without mutating.
///
/// Precondition order is part of the contract: unknown ids first, then the
/// self-move check, then the cycle guard, then (for sibling placements) the
/// root check. Nothing is written until all of them pass, so a rejected
/// move leaves the topology exactly as it was.
pub fn reparent<T: Topology>(
    tree: &mut T,
    source: &str,
    intent: &PlacementIntent,
) -> HierarchyResult<()> {
    let anchor = intent.anchor.as_str();

    if !tree.contains(source) {
        return Err(HierarchyError::UnknownNode(source.to_string()));
    }
    if !tree.contains(anchor) {
        return Err(HierarchyError::UnknownNode(anchor.to_string()));
    }
    if source == anchor {
        return Err(HierarchyError::SelfMove(source.to_string()));
    }
    if is_descendant(tree, source, anchor) {
        return Err(HierarchyError::CycleBlocked {
            source_id: source.to_string(),
            target_id: anchor.to_string(),
        });
    }

    match intent.kind {
        Placement::Into => {
            tree.detach(source);
            tree.append_child(anchor, source);
        }
        Placement::Before | Placement::After => {
            let parent = match tree.parent_of(anchor) {
                Some(parent) => parent.clone(),
                None => return Err(HierarchyError::RootSibling(anchor.to_string())),
            };

            // Splice point is computed before the detach; pulling the source
            // out of the same sibling list shifts the anchor left by one.
            let (anchor_at, source_at) = {
                let siblings = tree.children_of(&parent);
                let anchor_at = match siblings.iter().position(|child| child == anchor) {
                    Some(at) => at,
                    None => return Err(HierarchyError::UnknownNode(anchor.to_string())),
                };
                let source_at = siblings.iter().position(|child| child == source);
                (anchor_at, source_at)
            };

            let mut index = anchor_at;
            if intent.kind == Placement::After {
                index += 1;
            }
            if let Some(at) = source_at {
                if at < index {
                    index -= 1;
                }
            }

            tree.detach(source);
            tree.insert_child_at(&parent, index, source);
        }
    }

    debug!(source, anchor, kind = %intent.kind, "reparent applied");
    Ok(())
}
