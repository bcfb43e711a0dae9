//! Node resolvers
//!
//! A [`NodeResolver`] selects the nodes a manipulation applies to. Resolvers
//! chain: each step narrows the result of the previous one. Every node a
//! step selects gets a not-null policy, so a path that reaches a node also
//! makes every node along the way present. A producer fixed to absence is
//! kept: only the policy is swapped. Selecting nothing is not an error.

use crate::node::NodeId;
use crate::tree::ArbitraryTree;
use fixture_api::NOT_NULL_INJECT;
use std::fmt;

/// Name that selects every child
pub const WILDCARD: &str = "*";

/// Selects nodes of a tree
pub trait NodeResolver: fmt::Debug + Send + Sync {
    /// Nodes selected in `tree`, in tree order
    fn resolve(&self, tree: &mut ArbitraryTree) -> Vec<NodeId>;
}

/// Selects the root
#[derive(Debug, Clone, Copy, Default)]
pub struct RootNodeResolver;

impl NodeResolver for RootNodeResolver {
    fn resolve(&self, tree: &mut ArbitraryTree) -> Vec<NodeId> {
        let root = tree.find_root();
        tree.set_null_inject(root, NOT_NULL_INJECT);
        vec![root]
    }
}

/// Returns what the previous resolver selected
#[derive(Debug)]
pub struct IdentityNodeResolver {
    previous: Box<dyn NodeResolver>,
}

impl IdentityNodeResolver {
    /// Wrap `previous`
    #[must_use]
    pub fn new(previous: Box<dyn NodeResolver>) -> Self {
        Self { previous }
    }
}

impl NodeResolver for IdentityNodeResolver {
    fn resolve(&self, tree: &mut ArbitraryTree) -> Vec<NodeId> {
        self.previous.resolve(tree)
    }
}

/// Selects children of the previous result by resolved name
#[derive(Debug)]
pub struct PropertyNameNodeResolver {
    previous: Box<dyn NodeResolver>,
    name: String,
}

impl PropertyNameNodeResolver {
    /// Children named `name`; [`WILDCARD`] selects all children
    #[must_use]
    pub fn new(previous: Box<dyn NodeResolver>, name: impl Into<String>) -> Self {
        Self {
            previous,
            name: name.into(),
        }
    }

    /// All children of the previous result
    #[must_use]
    pub fn wildcard(previous: Box<dyn NodeResolver>) -> Self {
        Self::new(previous, WILDCARD)
    }

    /// Name this step selects
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl NodeResolver for PropertyNameNodeResolver {
    fn resolve(&self, tree: &mut ArbitraryTree) -> Vec<NodeId> {
        let parents = self.previous.resolve(tree);
        let selected: Vec<NodeId> = parents
            .iter()
            .flat_map(|parent| tree.children(*parent).iter().copied())
            .filter(|child| self.name == WILDCARD || tree[*child].resolved_property_name() == self.name)
            .collect();

        for id in &selected {
            tree.set_null_inject(*id, NOT_NULL_INJECT);
        }
        tracing::trace!("Resolved {} node(s) named `{}`", selected.len(), self.name);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Producer;
    use crate::traverser::ArbitraryTraverser;
    use fixture_api::{ContainerInfo, FieldDesc, GenContext, GenerateOptions, Property, TypeDesc, Value};
    use std::sync::Arc;

    fn tree() -> ArbitraryTree {
        let options = GenerateOptions::builder()
            .default_container_info(ContainerInfo::new(3, 3).unwrap())
            .default_null_inject(0.5)
            .build();
        let desc = TypeDesc::object(
            "Basket",
            vec![
                FieldDesc::of::<Option<String>>("label"),
                FieldDesc::of::<Vec<Option<i32>>>("items"),
            ],
        );
        ArbitraryTraverser::new(Arc::new(options))
            .traverse(Property::root(desc), &mut GenContext::new(0))
            .unwrap()
    }

    fn items() -> Box<dyn NodeResolver> {
        Box::new(PropertyNameNodeResolver::new(Box::new(RootNodeResolver), "items"))
    }

    #[test]
    fn name_selects_matching_child() {
        let mut tree = tree();
        let label = PropertyNameNodeResolver::new(Box::new(RootNodeResolver), "label").resolve(&mut tree);

        assert_eq!(label.len(), 1);
        assert!(tree[label[0]].arbitrary_property().is_not_null());
    }

    #[test]
    fn wildcard_selects_all_elements() {
        let mut tree = tree();
        let elements = PropertyNameNodeResolver::wildcard(items()).resolve(&mut tree);

        assert_eq!(elements.len(), 3);
        assert!(elements.iter().all(|id| tree[*id].arbitrary_property().is_not_null()));
    }

    #[test]
    fn element_index_by_name() {
        let mut tree = tree();
        let second = PropertyNameNodeResolver::new(items(), "[1]").resolve(&mut tree);
        assert_eq!(second.len(), 1);
        assert_eq!(tree.path(second[0]), "$.items[1]");
    }

    #[test]
    fn unknown_name_is_empty() {
        let mut tree = tree();
        let before = tree.clone();
        let none = PropertyNameNodeResolver::new(Box::new(RootNodeResolver), "x").resolve(&mut tree);

        assert!(none.is_empty());
        assert_eq!(tree.len(), before.len());
    }

    #[test]
    fn resolving_keeps_fixed_null_producer() {
        let mut tree = tree();
        let label = tree.children(tree.find_root())[0];
        tree.set_producer(label, Producer::Fixed(Value::Null));

        let selected = PropertyNameNodeResolver::new(Box::new(RootNodeResolver), "label").resolve(&mut tree);
        assert_eq!(selected, vec![label]);
        assert!(tree[label].arbitrary_property().is_not_null());
        assert_eq!(*tree[label].producer(), Producer::Fixed(Value::Null));
    }

    #[test]
    fn identity_passes_through() {
        let mut tree = tree();
        let root = IdentityNodeResolver::new(Box::new(RootNodeResolver)).resolve(&mut tree);
        assert_eq!(root, vec![tree.find_root()]);
    }
}
