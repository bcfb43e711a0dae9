//! Tree materialization
//!
//! [`ArbitraryTraverser`] walks a root [`Property`] and builds the
//! [`ArbitraryTree`] mirroring it. Each node's policy comes from the
//! registered [`ArbitraryPropertyGenerator`](fixture_api::ArbitraryPropertyGenerator);
//! objects get one child per field and containers one child per element.
//! Container sizes not fixed by the policy are drawn from its bounds with the
//! pass's [`GenContext`].
//!
//! Recursion stops at the depth limit: objects there are forced null, and
//! containers whose elements would be cut objects are materialized empty.

use crate::node::{ArbitraryNode, NodeId};
use crate::tree::ArbitraryTree;
use fixture_api::{
    ContainerInfo, FixtureError, GenContext, GenerateOptions, Property, Result, TypeDesc, TypeKind,
    ALWAYS_NULL_INJECT, DEFAULT_MAX_DEPTH,
};
use std::sync::Arc;

/// Builds generation trees from properties
#[derive(Debug, Clone)]
pub struct ArbitraryTraverser {
    options: Arc<GenerateOptions>,
    max_depth: usize,
}

impl ArbitraryTraverser {
    /// Create traverser using `options`
    #[must_use]
    pub fn new(options: Arc<GenerateOptions>) -> Self {
        Self {
            options,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// With depth limit; at least one level below the root is materialized
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Registry used for node policies
    #[inline]
    #[must_use]
    pub fn options(&self) -> &Arc<GenerateOptions> {
        &self.options
    }

    /// Depth limit
    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Materialize the tree for `property`
    ///
    /// # Errors
    /// Returns `UnsupportedShape` for opaque types without a registered
    /// value generator
    pub fn traverse(&self, property: Property, ctx: &mut GenContext) -> Result<ArbitraryTree> {
        let arbitrary_property = self.options.generate_arbitrary_property(&property, None);
        let mut tree = ArbitraryTree::new(ArbitraryNode::new(Arc::new(property), arbitrary_property));
        let root = tree.find_root();
        self.expand(&mut tree, root, 0, ctx)?;

        tracing::debug!("Materialized tree with {} nodes", tree.len());
        Ok(tree)
    }

    /// Append a freshly materialized subtree for `property` under `parent`
    ///
    /// # Errors
    /// Returns `UnsupportedShape` for opaque types without a registered
    /// value generator, or when `parent` is not part of `tree`
    pub fn materialize_child(
        &self,
        tree: &mut ArbitraryTree,
        parent: NodeId,
        property: Property,
        ctx: &mut GenContext,
    ) -> Result<NodeId> {
        let parent_policy = tree
            .get(parent)
            .map(|node| node.arbitrary_property().clone())
            .ok_or_else(|| FixtureError::UnsupportedShape(format!("node {parent} is not part of the tree")))?;

        let arbitrary_property = self
            .options
            .generate_arbitrary_property(&property, Some(&parent_policy));
        let node = ArbitraryNode::new(Arc::new(property), arbitrary_property);
        let child = tree
            .add_child(parent, node)
            .ok_or_else(|| FixtureError::UnsupportedShape(format!("node {parent} is not part of the tree")))?;

        let depth = tree.depth(child);
        self.expand(tree, child, depth, ctx)?;
        Ok(child)
    }

    fn is_cut(&self, element: &TypeDesc, depth: usize) -> bool {
        depth + 1 >= self.max_depth && matches!(element.kind(), TypeKind::Object(_))
    }

    fn expand(&self, tree: &mut ArbitraryTree, id: NodeId, depth: usize, ctx: &mut GenContext) -> Result<()> {
        let property = tree[id].shared_property();

        match property.ty().kind() {
            TypeKind::Leaf(_) | TypeKind::Enum(_) => Ok(()),
            TypeKind::Opaque => {
                if self.options.find_arbitrary_generator(&property).is_some() {
                    Ok(())
                } else {
                    Err(FixtureError::UnsupportedShape(format!(
                        "{} at {} is neither a leaf, an object nor a container",
                        property.ty(),
                        tree.path(id)
                    )))
                }
            }
            TypeKind::Object(_) if depth >= self.max_depth => {
                tracing::trace!("Depth limit {} reached at {}", self.max_depth, tree.path(id));
                tree.update_arbitrary_property(id, |p| p.with_null_inject(ALWAYS_NULL_INJECT));
                Ok(())
            }
            TypeKind::List(element) if depth >= self.max_depth || self.is_cut(element, depth) => {
                tracing::trace!("Depth limit {} reached at {}", self.max_depth, tree.path(id));
                tree.update_arbitrary_property(id, |p| p.with_container_info(ContainerInfo::exact(0)));
                Ok(())
            }
            TypeKind::Object(_) => {
                for child in property.child_properties() {
                    self.materialize_child(tree, id, child, ctx)?;
                }
                Ok(())
            }
            TypeKind::List(_) => {
                let Some(info) = tree[id].arbitrary_property().container_info().copied() else {
                    return Ok(());
                };
                let size = info.resolve_size(ctx);
                tree.update_arbitrary_property(id, |p| p.with_container_info(info.with_element_count(size)));
                for index in 0..size {
                    if let Some(element) = Property::element(&property, index) {
                        self.materialize_child(tree, id, element, ctx)?;
                    }
                }
                Ok(())
            }
        }
    }
}
