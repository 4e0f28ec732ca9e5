//! Flat node store with explicit child-id lists.
//!
//! A single owner holds every node in an arena; nodes reference each other
//! by id only. This is both the topology the reparent engine mutates and the
//! persistence model: snapshots are the flat record list, never a nested
//! tree, so deep hierarchies cost no recursion to load or save.

use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::{HierarchyError, HierarchyResult};
use crate::domain::reparent::Topology;

/// Stable node identifier, unique within one store.
pub type NodeId = String;

/// One node: id, opaque payload, ordered child ids.
///
/// The parent back-pointer is derived from the child lists and kept in sync
/// by every mutation; only the store itself may write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralNode {
    pub id: NodeId,
    /// Payload carried through moves and snapshots untouched.
    pub label: Option<String>,
    /// Child order is significant and preserved across edits.
    pub children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl StructuralNode {
    fn new(id: NodeId, label: Option<String>) -> Self {
        Self {
            id,
            label,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    /// Human-facing text: the label when present, else the id.
    pub fn display_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Snapshot record, the external `{id, children, label?}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NodeRecord {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            label: None,
        }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Arena-backed node collection with id lookup.
///
/// Document order is the flat insertion order of the records and survives
/// every mutation, so a snapshot saved right after loading serializes the
/// records in the order they arrived.
#[derive(Debug, Default)]
pub struct HierarchyStore {
    arena: Arena<StructuralNode>,
    ids: HashMap<NodeId, Index>,
    order: Vec<NodeId>,
}

impl HierarchyStore {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            ids: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Build a store from snapshot records, validating every invariant.
    ///
    /// Rejects duplicate ids, child references to unknown ids, children
    /// claimed by more than one parent, and cyclic child chains. The checks
    /// run before any caller sees the store, so a loaded store is always
    /// well-formed.
    pub fn from_records(records: Vec<NodeRecord>) -> HierarchyResult<Self> {
        let mut store = Self::new();

        for record in &records {
            if store.ids.contains_key(&record.id) {
                return Err(HierarchyError::DuplicateId(record.id.clone()));
            }
            let index = store
                .arena
                .insert(StructuralNode::new(record.id.clone(), record.label.clone()));
            store.ids.insert(record.id.clone(), index);
            store.order.push(record.id.clone());
        }

        // Child lists are wired second so forward references work.
        for record in &records {
            for child_id in &record.children {
                if !store.ids.contains_key(child_id) {
                    return Err(HierarchyError::UnknownNode(child_id.clone()));
                }
                if let Some(child) = store.node_mut(child_id) {
                    if child.parent.is_some() {
                        return Err(HierarchyError::MultipleParents(child_id.clone()));
                    }
                    child.parent = Some(record.id.clone());
                }
            }
            if let Some(node) = store.node_mut(&record.id) {
                node.children = record.children.clone();
            }
        }

        store.reject_cycles()?;
        debug!(nodes = store.len(), "hierarchy loaded");
        Ok(store)
    }

    /// Every node must be reachable from some root; a node that is not sits
    /// on a cycle (or is its own parent).
    fn reject_cycles(&self) -> HierarchyResult<()> {
        let mut reachable: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&NodeId> = self
            .iter()
            .filter(|node| node.parent.is_none())
            .map(|node| &node.id)
            .collect();

        while let Some(id) = stack.pop() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(node) = self.get(id) {
                stack.extend(node.children.iter());
            }
        }

        for id in &self.order {
            if !reachable.contains(id.as_str()) {
                return Err(HierarchyError::CycleDetected(id.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&StructuralNode> {
        self.ids.get(id).and_then(|&index| self.arena.get(index))
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut StructuralNode> {
        let index = *self.ids.get(id)?;
        self.arena.get_mut(index)
    }

    /// Nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &StructuralNode> {
        self.order.iter().filter_map(|id| self.get(id))
    }

    /// Parentless nodes in document order.
    pub fn roots(&self) -> impl Iterator<Item = &StructuralNode> {
        self.iter().filter(|node| node.parent.is_none())
    }

    /// Insert a node, appending it under `parent` when one is given.
    ///
    /// A missing id is filled with a fresh UUID; the chosen id is returned.
    pub fn insert(
        &mut self,
        id: Option<NodeId>,
        label: Option<String>,
        parent: Option<&str>,
    ) -> HierarchyResult<NodeId> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        if self.ids.contains_key(&id) {
            return Err(HierarchyError::DuplicateId(id));
        }
        if let Some(parent_id) = parent {
            if !self.ids.contains_key(parent_id) {
                return Err(HierarchyError::UnknownNode(parent_id.to_string()));
            }
        }

        let index = self.arena.insert(StructuralNode::new(id.clone(), label));
        self.ids.insert(id.clone(), index);
        self.order.push(id.clone());
        if let Some(parent_id) = parent {
            self.append_child(parent_id, &id);
        }
        debug!(id = %id, parent = ?parent, "node inserted");
        Ok(id)
    }

    /// Remove a node. Its children are promoted to roots, not deleted.
    pub fn remove(&mut self, id: &str) -> HierarchyResult<StructuralNode> {
        let index = *self
            .ids
            .get(id)
            .ok_or_else(|| HierarchyError::UnknownNode(id.to_string()))?;

        self.detach(id);
        let removed = match self.arena.remove(index) {
            Some(node) => node,
            None => return Err(HierarchyError::UnknownNode(id.to_string())),
        };
        for child_id in &removed.children {
            if let Some(child) = self.node_mut(child_id) {
                child.parent = None;
            }
        }
        self.ids.remove(id);
        self.order.retain(|known| known != id);
        debug!(id = %id, orphaned = removed.children.len(), "node removed");
        Ok(removed)
    }

    /// Serialize back to snapshot records, document order.
    pub fn to_records(&self) -> Vec<NodeRecord> {
        self.iter()
            .map(|node| NodeRecord {
                id: node.id.clone(),
                children: node.children.clone(),
                label: node.label.clone(),
            })
            .collect()
    }

    /// Render every root as a box-drawing tree.
    pub fn to_tree_strings(&self) -> Vec<Tree<String>> {
        self.roots().map(|root| self.subtree(root)).collect()
    }

    fn subtree(&self, node: &StructuralNode) -> Tree<String> {
        let leaves = node
            .children
            .iter()
            .filter_map(|child_id| self.get(child_id))
            .map(|child| self.subtree(child));
        Tree::new(node.display_text().to_string()).with_leaves(leaves)
    }

    /// Markdown outline, one bullet per node, two-space indent per depth.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for root in self.roots() {
            self.write_markdown_item(root, 0, &mut out);
        }
        out
    }

    fn write_markdown_item(&self, node: &StructuralNode, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- **");
        out.push_str(node.display_text());
        out.push_str("**\n");
        for child_id in &node.children {
            if let Some(child) = self.get(child_id) {
                self.write_markdown_item(child, depth + 1, out);
            }
        }
    }
}

impl Topology for HierarchyStore {
    fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    fn node_count(&self) -> usize {
        self.len()
    }

    fn children_of(&self, id: &str) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    fn parent_of(&self, id: &str) -> Option<&NodeId> {
        self.get(id).and_then(|node| node.parent.as_ref())
    }

    fn detach(&mut self, id: &str) {
        let parent_id = match self.get(id).and_then(|node| node.parent.clone()) {
            Some(parent_id) => parent_id,
            None => return,
        };
        if let Some(parent) = self.node_mut(&parent_id) {
            parent.children.retain(|child| child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    fn append_child(&mut self, parent: &str, child: &str) {
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(child.to_string());
        }
        let parent_id = parent.to_string();
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent_id);
        }
    }

    fn insert_child_at(&mut self, parent: &str, index: usize, child: &str) {
        if let Some(parent_node) = self.node_mut(parent) {
            let at = index.min(parent_node.children.len());
            parent_node.children.insert(at, child.to_string());
        }
        let parent_id = parent.to_string();
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent_id);
        }
    }
}
