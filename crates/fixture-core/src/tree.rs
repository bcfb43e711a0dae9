//! Generation tree
//!
//! [`ArbitraryTree`] is an arena of [`ArbitraryNode`]s with exactly one root.
//! Parent links are plain [`NodeId`]s, so the tree never holds reference
//! cycles. Removed subtrees leave empty slots behind; handles are never
//! reused within one tree.
//!
//! Policies are immutable values: every update builds a new
//! [`ArbitraryProperty`] and swaps it into the node.

use crate::node::{ArbitraryNode, NodeId, Producer};
use fixture_api::{ArbitraryProperty, ALWAYS_NULL_INJECT, NOT_NULL_INJECT};
use std::ops::Index;

/// Per-pass tree of generation nodes
#[derive(Debug, Clone)]
pub struct ArbitraryTree {
    nodes: Vec<Option<ArbitraryNode>>,
    root: NodeId,
    live: usize,
}

impl ArbitraryTree {
    /// Tree consisting of `root` only
    #[must_use]
    pub fn new(root: ArbitraryNode) -> Self {
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
            live: 1,
        }
    }

    /// Handle of the root node
    #[inline]
    #[must_use]
    pub fn find_root(&self) -> NodeId {
        self.root
    }

    /// Node behind `id`, if it is still part of the tree
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ArbitraryNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> Option<&mut ArbitraryNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Check if `id` refers to a live node
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Always `false`: a tree owns at least its root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Children of `id`; empty for unknown handles
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], ArbitraryNode::children)
    }

    /// Parent of `id`
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(ArbitraryNode::parent)
    }

    /// Number of edges between `id` and the root
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// `id` and all its descendants in pre-order
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get(current) {
                out.push(current);
                stack.extend(node.children().iter().rev());
            }
        }
        out
    }

    /// Path expression addressing `id`, such as `$.orders[1].id`
    #[must_use]
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else { break };
            if node.parent().is_some() {
                segments.push(node.resolved_property_name().to_owned());
            }
            current = node.parent();
        }

        let mut path = String::from("$");
        for segment in segments.iter().rev() {
            if !segment.starts_with('[') {
                path.push('.');
            }
            path.push_str(segment);
        }
        path
    }

    /// Attach `node` as the last child of `parent`
    ///
    /// Returns `None` when `parent` is not part of the tree.
    pub fn add_child(&mut self, parent: NodeId, mut node: ArbitraryNode) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = NodeId(self.nodes.len());
        node.set_parent(parent);
        self.nodes.push(Some(node));
        self.live += 1;
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children_mut().push(id);
        }
        Some(id)
    }

    /// Drop children of `id` beyond the first `len`, with their subtrees
    pub fn truncate_children(&mut self, id: NodeId, len: usize) {
        let removed: Vec<NodeId> = match self.get_mut(id) {
            Some(node) if node.children().len() > len => node.children_mut().split_off(len),
            _ => return,
        };
        for child in removed {
            for descendant in self.descendants(child) {
                if let Some(slot) = self.nodes.get_mut(descendant.0) {
                    if slot.take().is_some() {
                        self.live -= 1;
                    }
                }
            }
        }
    }

    /// Swap in a new policy for `id`
    pub fn set_arbitrary_property(&mut self, id: NodeId, arbitrary_property: ArbitraryProperty) {
        if let Some(node) = self.get_mut(id) {
            node.set_arbitrary_property(arbitrary_property);
        }
    }

    /// Replace the policy of `id` with a copy derived from the current one
    pub fn update_arbitrary_property(
        &mut self,
        id: NodeId,
        update: impl FnOnce(&ArbitraryProperty) -> ArbitraryProperty,
    ) {
        if let Some(node) = self.get_mut(id) {
            let next = update(node.arbitrary_property());
            node.set_arbitrary_property(next);
        }
    }

    /// Replace the producer of `id`
    pub fn set_producer(&mut self, id: NodeId, producer: Producer) {
        if let Some(node) = self.get_mut(id) {
            node.set_producer(producer);
        }
    }

    /// Swap in a copy of the policy of `id` with `null_inject`
    ///
    /// The producer is left alone, so a value fixed to absence stays absent.
    pub fn set_null_inject(&mut self, id: NodeId, null_inject: f64) {
        self.update_arbitrary_property(id, |p| p.with_null_inject(null_inject));
    }

    /// Make `id` always present
    ///
    /// A producer fixed to absence is cleared as well.
    pub fn mark_not_null(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            let next = node.arbitrary_property().with_null_inject(NOT_NULL_INJECT);
            node.set_arbitrary_property(next);
            if node.producer().is_fixed_null() {
                node.set_producer(Producer::Undetermined);
            }
        }
    }

    /// Make `id` always absent and drop any fixed value
    pub fn mark_null(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            let next = node.arbitrary_property().with_null_inject(ALWAYS_NULL_INJECT);
            node.set_arbitrary_property(next);
            node.set_producer(Producer::Undetermined);
        }
    }

    /// Live nodes in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ArbitraryNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i), node)))
    }
}

impl Index<NodeId> for ArbitraryTree {
    type Output = ArbitraryNode;

    /// # Panics
    /// Panics when `id` was removed or belongs to another tree
    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {id} is not part of this tree"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_api::{Describe, FieldDesc, Property, TypeDesc, DEFAULT_NULL_INJECT};
    use std::sync::Arc;

    fn node(name: &str) -> ArbitraryNode {
        ArbitraryNode::new(
            Arc::new(Property::root(i32::describe())),
            ArbitraryProperty::new(name, DEFAULT_NULL_INJECT, None),
        )
    }

    fn sample_tree() -> (ArbitraryTree, NodeId, NodeId) {
        let root = ArbitraryNode::new(
            Arc::new(Property::root(TypeDesc::object("R", vec![FieldDesc::of::<i32>("a")]))),
            ArbitraryProperty::new("$", 0.0, None),
        );
        let mut tree = ArbitraryTree::new(root);
        let a = tree.add_child(tree.find_root(), node("a")).unwrap();
        let first = tree.add_child(a, node("[0]")).unwrap();
        tree.add_child(a, node("[1]")).unwrap();
        (tree, a, first)
    }

    #[test]
    fn structure_queries() {
        let (tree, a, first) = sample_tree();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.parent(first), Some(a));
        assert_eq!(tree.depth(first), 2);
        assert_eq!(tree.path(first), "$.a[0]");
        assert_eq!(tree.path(tree.find_root()), "$");
        assert_eq!(tree.descendants(a).len(), 3);
    }

    #[test]
    fn truncate_removes_subtrees() {
        let (mut tree, a, first) = sample_tree();
        tree.add_child(first, node("x")).unwrap();
        tree.truncate_children(a, 0);

        assert!(tree.children(a).is_empty());
        assert!(!tree.contains(first));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.iter().count(), 2);
    }

    #[test]
    fn policy_updates_swap_copies() {
        let (mut tree, a, _) = sample_tree();
        let before = tree[a].arbitrary_property().clone();
        tree.mark_not_null(a);

        assert!(tree[a].arbitrary_property().is_not_null());
        assert!(!before.is_not_null());
    }

    #[test]
    fn not_null_clears_fixed_null() {
        let (mut tree, a, _) = sample_tree();
        tree.set_producer(a, Producer::Fixed(fixture_api::Value::Null));
        tree.mark_not_null(a);
        assert_eq!(*tree[a].producer(), Producer::Undetermined);

        tree.set_producer(a, Producer::Fixed(fixture_api::Value::Int(1)));
        tree.mark_null(a);
        assert!(tree[a].arbitrary_property().is_forced_null());
        assert!(!tree[a].producer().is_fixed());
    }

    #[test]
    fn null_inject_swap_keeps_fixed_null() {
        let (mut tree, a, _) = sample_tree();
        tree.set_producer(a, Producer::Fixed(fixture_api::Value::Null));
        tree.set_null_inject(a, NOT_NULL_INJECT);

        assert!(tree[a].arbitrary_property().is_not_null());
        assert!(tree[a].producer().is_fixed_null());
    }

    #[test]
    fn add_child_to_removed_parent_fails() {
        let (mut tree, a, first) = sample_tree();
        tree.truncate_children(a, 0);
        assert!(tree.add_child(first, node("y")).is_none());
    }
}
