//! Node manipulators
//!
//! Manipulators rewrite the state of resolved nodes before sampling:
//! - [`NodeSetDecomposedValueManipulator`]: pushes a concrete value down to
//!   the leaves of a subtree
//! - [`NodeSizeManipulator`]: resizes a container node to a size drawn
//!   from its bounds
//! - [`NodeNullityManipulator`]: forces a node absent or present
//!
//! [`ArbitraryManipulator`] pairs a path expression with one of them.

use crate::expression::ArbitraryExpression;
use crate::node::{NodeId, Producer};
use crate::resolver::NodeResolver;
use crate::traverser::ArbitraryTraverser;
use crate::tree::ArbitraryTree;
use fixture_api::{
    ContainerInfo, DecomposedContainerValueFactory, FixtureError, GenContext, Property, Result, Value,
};
use std::fmt;
use std::sync::Arc;

/// Rewrites the state of one node
pub trait NodeManipulator: fmt::Debug + Send + Sync {
    /// Apply to `node` of `tree`, drawing any randomness from `ctx`
    ///
    /// # Errors
    /// Returns the first error raised while rewriting the subtree
    fn manipulate(&self, tree: &mut ArbitraryTree, node: NodeId, ctx: &mut GenContext) -> Result<()>;
}

/// Fixes a node, and its descendants, to a concrete value
pub struct NodeSetDecomposedValueManipulator {
    traverser: ArbitraryTraverser,
    factory: Arc<dyn DecomposedContainerValueFactory>,
    value: Value,
}

impl NodeSetDecomposedValueManipulator {
    /// Create manipulator setting `value`
    #[must_use]
    pub fn new(
        traverser: ArbitraryTraverser,
        factory: Arc<dyn DecomposedContainerValueFactory>,
        value: Value,
    ) -> Self {
        Self {
            traverser,
            factory,
            value,
        }
    }

    fn set(&self, tree: &mut ArbitraryTree, id: NodeId, value: &Value, ctx: &mut GenContext) -> Result<()> {
        let property = tree[id].shared_property();
        if !value.is_assignable_to(property.ty()) {
            return Err(FixtureError::type_mismatch(property.ty().to_string(), value.type_name()));
        }

        if value.is_null() {
            tree.set_producer(id, Producer::Fixed(Value::Null));
            return Ok(());
        }
        tree.mark_not_null(id);

        if tree[id].arbitrary_property().is_container() {
            let decomposed = self.factory.decompose(value)?;
            tracing::trace!("Decomposed {} element(s) onto {}", decomposed.size, tree.path(id));
            if decomposed.size != tree.children(id).len() {
                NodeSizeManipulator::new(self.traverser.clone(), decomposed.size, decomposed.size)
                    .manipulate(tree, id, ctx)?;
            }

            let children = tree.children(id).to_vec();
            for (child, element) in children.into_iter().zip(&decomposed.elements) {
                self.set(tree, child, element, ctx)?;
            }
            return Ok(());
        }

        let children = tree.children(id).to_vec();
        if children.is_empty() {
            tree.set_producer(id, Producer::Fixed(value.clone()));
            return Ok(());
        }

        for child in children {
            let child_value = tree[child].property().get_value(value)?;
            self.set(tree, child, &child_value, ctx)?;
        }
        Ok(())
    }
}

impl NodeManipulator for NodeSetDecomposedValueManipulator {
    fn manipulate(&self, tree: &mut ArbitraryTree, node: NodeId, ctx: &mut GenContext) -> Result<()> {
        self.set(tree, node, &self.value, ctx)
    }
}

impl fmt::Debug for NodeSetDecomposedValueManipulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSetDecomposedValueManipulator")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Resizes a container node to a size drawn from `min..=max`
///
/// Missing elements are freshly materialized at the end, surplus elements
/// are dropped from the end. With equal bounds the size is exact, so
/// applying the manipulator twice changes nothing.
#[derive(Debug, Clone)]
pub struct NodeSizeManipulator {
    traverser: ArbitraryTraverser,
    min: usize,
    max: usize,
}

impl NodeSizeManipulator {
    /// Create manipulator with bounds `min..=max`
    #[must_use]
    pub fn new(traverser: ArbitraryTraverser, min: usize, max: usize) -> Self {
        Self { traverser, min, max }
    }
}

impl NodeManipulator for NodeSizeManipulator {
    fn manipulate(&self, tree: &mut ArbitraryTree, node: NodeId, ctx: &mut GenContext) -> Result<()> {
        let info = ContainerInfo::new(self.min, self.max)?;
        let property = tree[node].shared_property();
        if !tree[node].arbitrary_property().is_container() {
            return Err(FixtureError::UnsupportedShape(format!(
                "cannot resize {} at {}, it is not a container",
                property.ty(),
                tree.path(node)
            )));
        }

        let current = tree.children(node).len();
        let target = info.resolve_size(ctx);
        if target > current {
            tracing::debug!("Growing {} from {} to {} element(s)", tree.path(node), current, target);
            for index in current..target {
                let element = Property::element(&property, index).ok_or_else(|| {
                    FixtureError::UnsupportedShape(format!("{} has no element type", property.ty()))
                })?;
                self.traverser.materialize_child(tree, node, element, ctx)?;
            }
        } else if target < current {
            tracing::debug!("Shrinking {} from {} to {} element(s)", tree.path(node), current, target);
            tree.truncate_children(node, target);
        }

        tree.update_arbitrary_property(node, |p| p.with_container_info(info.with_element_count(target)));
        Ok(())
    }
}

/// Forces a node absent or present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeNullityManipulator {
    to_null: bool,
}

impl NodeNullityManipulator {
    /// Force absent when `to_null`, present otherwise
    #[inline]
    #[must_use]
    pub fn new(to_null: bool) -> Self {
        Self { to_null }
    }
}

impl NodeManipulator for NodeNullityManipulator {
    fn manipulate(&self, tree: &mut ArbitraryTree, node: NodeId, _ctx: &mut GenContext) -> Result<()> {
        if self.to_null {
            tree.mark_null(node);
        } else {
            tree.mark_not_null(node);
        }
        Ok(())
    }
}

/// A path paired with the manipulator applied to every node it selects
#[derive(Debug)]
pub struct ArbitraryManipulator {
    expression: ArbitraryExpression,
    resolver: Box<dyn NodeResolver>,
    manipulator: Box<dyn NodeManipulator>,
    strict: bool,
}

impl ArbitraryManipulator {
    /// Apply `manipulator` to the nodes `expression` selects
    #[must_use]
    pub fn new(expression: ArbitraryExpression, manipulator: Box<dyn NodeManipulator>) -> Self {
        Self {
            resolver: expression.to_node_resolver(),
            expression,
            manipulator,
            strict: false,
        }
    }

    /// Fail when the expression selects no node
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve and manipulate; returns the number of nodes touched
    ///
    /// # Errors
    /// Returns the manipulator's error, or `InvalidExpression` in strict
    /// mode when nothing matched
    pub fn manipulate(&self, tree: &mut ArbitraryTree, ctx: &mut GenContext) -> Result<usize> {
        let nodes = self.resolver.resolve(tree);
        if nodes.is_empty() && self.strict {
            return Err(FixtureError::invalid_expression(
                self.expression.to_string(),
                "no node matched",
            ));
        }

        for node in &nodes {
            self.manipulator.manipulate(tree, *node, ctx)?;
        }
        Ok(nodes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_api::{
        ArbitraryProperty, ArbitraryPropertyGeneratorContext, Describe,
        DefaultDecomposedContainerValueFactory, FieldDesc, GenerateOptions, TypeDesc, NOT_NULL_INJECT,
    };
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn ctx() -> GenContext {
        GenContext::new(0)
    }

    fn traverser() -> ArbitraryTraverser {
        ArbitraryTraverser::new(Arc::new(GenerateOptions::default()))
    }

    fn set(value: Value) -> NodeSetDecomposedValueManipulator {
        NodeSetDecomposedValueManipulator::new(
            traverser(),
            Arc::new(DefaultDecomposedContainerValueFactory),
            value,
        )
    }

    fn point() -> TypeDesc {
        TypeDesc::object("Point", vec![FieldDesc::of::<i32>("x"), FieldDesc::of::<i32>("y")])
    }

    fn fixed(tree: &ArbitraryTree, id: NodeId) -> Option<&Value> {
        match tree[id].producer() {
            Producer::Fixed(value) => Some(value),
            Producer::Undetermined => None,
        }
    }

    #[test]
    fn resize_grows_and_shrinks() {
        let mut tree = traverser().traverse(Property::root(Vec::<i32>::describe()), &mut ctx()).unwrap();
        let root = tree.find_root();

        NodeSizeManipulator::new(traverser(), 5, 5).manipulate(&mut tree, root, &mut ctx()).unwrap();
        assert_eq!(tree.children(root).len(), 5);
        assert_eq!(tree[root].arbitrary_property().container_info().and_then(ContainerInfo::element_count), Some(5));

        NodeSizeManipulator::new(traverser(), 5, 5).manipulate(&mut tree, root, &mut ctx()).unwrap();
        assert_eq!(tree.len(), 6);

        NodeSizeManipulator::new(traverser(), 2, 2).manipulate(&mut tree, root, &mut ctx()).unwrap();
        assert_eq!(tree.children(root).len(), 2);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn resize_draws_within_bounds() {
        let mut seen = BTreeSet::new();
        for seed in 0..40 {
            let mut ctx = GenContext::new(seed);
            let mut tree = traverser().traverse(Property::root(Vec::<i32>::describe()), &mut ctx).unwrap();
            let root = tree.find_root();
            NodeSizeManipulator::new(traverser(), 1, 4).manipulate(&mut tree, root, &mut ctx).unwrap();

            let len = tree.children(root).len();
            assert!((1..=4).contains(&len));
            assert_eq!(tree[root].arbitrary_property().container_info().and_then(ContainerInfo::element_count), Some(len));
            seen.insert(len);
        }
        assert!(seen.len() > 1, "resize never varied: {seen:?}");
    }

    #[test]
    fn resize_rejects_leaves_and_inverted_bounds() {
        let mut tree = traverser().traverse(Property::root(i32::describe()), &mut ctx()).unwrap();
        let root = tree.find_root();
        assert!(matches!(
            NodeSizeManipulator::new(traverser(), 1, 1).manipulate(&mut tree, root, &mut ctx()),
            Err(FixtureError::UnsupportedShape(_))
        ));
        assert_eq!(
            NodeSizeManipulator::new(traverser(), 3, 1).manipulate(&mut tree, root, &mut ctx()),
            Err(FixtureError::InvalidContainerSize { min: 3, max: 1 })
        );
    }

    #[test]
    fn set_pushes_value_to_leaves() {
        let mut tree = traverser().traverse(Property::root(point()), &mut ctx()).unwrap();
        let root = tree.find_root();
        set(Value::object([("x", 1), ("y", 2)])).manipulate(&mut tree, root, &mut ctx()).unwrap();

        let children = tree.children(root).to_vec();
        assert_eq!(fixed(&tree, children[0]), Some(&Value::Int(1)));
        assert_eq!(fixed(&tree, children[1]), Some(&Value::Int(2)));
        assert_eq!(fixed(&tree, root), None);
    }

    #[test]
    fn set_list_resizes_container() {
        let options = GenerateOptions::builder()
            .default_container_info(ContainerInfo::new(5, 5).unwrap())
            .build();
        let traverser = ArbitraryTraverser::new(Arc::new(options));
        let mut tree = traverser.traverse(Property::root(Vec::<i32>::describe()), &mut ctx()).unwrap();
        let root = tree.find_root();
        assert_eq!(tree.children(root).len(), 5);

        NodeSetDecomposedValueManipulator::new(
            traverser,
            Arc::new(DefaultDecomposedContainerValueFactory),
            Value::from(vec![1, 2, 3]),
        )
        .manipulate(&mut tree, root, &mut ctx())
        .unwrap();

        let values: Vec<_> = tree.children(root).iter().filter_map(|id| fixed(&tree, *id)).cloned().collect();
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn set_list_of_matching_size_keeps_elements() {
        let options = GenerateOptions::builder()
            .default_container_info(ContainerInfo::new(2, 6).unwrap())
            .build();
        let traverser = ArbitraryTraverser::new(Arc::new(options));
        let mut tree = traverser
            .traverse(Property::root(Vec::<i32>::describe()), &mut GenContext::new(3))
            .unwrap();
        let root = tree.find_root();
        let before = tree.children(root).to_vec();
        let info = tree[root].arbitrary_property().container_info().copied();

        let value = Value::List((1..=before.len()).map(|n| Value::from(i64::try_from(n).unwrap())).collect());
        NodeSetDecomposedValueManipulator::new(traverser, Arc::new(DefaultDecomposedContainerValueFactory), value)
            .manipulate(&mut tree, root, &mut ctx())
            .unwrap();

        assert_eq!(tree.children(root), before.as_slice());
        assert_eq!(tree[root].arbitrary_property().container_info().copied(), info);
    }

    fn scalar_policy(_: &ArbitraryPropertyGeneratorContext<'_>) -> ArbitraryProperty {
        ArbitraryProperty::new("$", NOT_NULL_INJECT, None)
    }

    #[test]
    fn list_with_scalar_policy_is_set_whole() {
        let options = GenerateOptions::builder()
            .default_arbitrary_property_generator(scalar_policy)
            .build();
        let traverser = ArbitraryTraverser::new(Arc::new(options));
        let mut tree = traverser.traverse(Property::root(Vec::<i32>::describe()), &mut ctx()).unwrap();
        let root = tree.find_root();

        NodeSetDecomposedValueManipulator::new(
            traverser.clone(),
            Arc::new(DefaultDecomposedContainerValueFactory),
            Value::from(vec![4, 5]),
        )
        .manipulate(&mut tree, root, &mut ctx())
        .unwrap();
        assert_eq!(fixed(&tree, root), Some(&Value::from(vec![4, 5])));
        assert_eq!(tree.len(), 1);

        let err = NodeSizeManipulator::new(traverser, 1, 1).manipulate(&mut tree, root, &mut ctx());
        assert!(matches!(err, Err(FixtureError::UnsupportedShape(_))));
    }

    #[test]
    fn set_type_mismatch_names_types() {
        let mut tree = traverser().traverse(Property::root(point()), &mut ctx()).unwrap();
        let root = tree.find_root();
        let err = set(Value::object([("x", "one"), ("y", "two")]))
            .manipulate(&mut tree, root, &mut ctx())
            .unwrap_err();
        assert_eq!(err, FixtureError::type_mismatch("i32", "string"));
    }

    #[test]
    fn set_missing_field_is_access_error() {
        let mut tree = traverser().traverse(Property::root(point()), &mut ctx()).unwrap();
        let root = tree.find_root();
        let err = set(Value::object([("x", 1)])).manipulate(&mut tree, root, &mut ctx()).unwrap_err();
        assert_eq!(err, FixtureError::property_access("y", "object"));
    }

    #[test]
    fn set_null_fixes_absence() {
        let mut tree = traverser().traverse(Property::root(point()), &mut ctx()).unwrap();
        let root = tree.find_root();
        set(Value::Null).manipulate(&mut tree, root, &mut ctx()).unwrap();
        assert_eq!(fixed(&tree, root), Some(&Value::Null));
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn nullity_toggles() {
        let mut tree = traverser().traverse(Property::root(point()), &mut ctx()).unwrap();
        let x = tree.children(tree.find_root())[0];
        NodeNullityManipulator::new(true).manipulate(&mut tree, x, &mut ctx()).unwrap();
        assert!(tree[x].arbitrary_property().is_forced_null());
        NodeNullityManipulator::new(false).manipulate(&mut tree, x, &mut ctx()).unwrap();
        assert!(tree[x].arbitrary_property().is_not_null());
    }

    #[test]
    fn unmatched_path_is_noop_unless_strict() {
        let mut tree = traverser().traverse(Property::root(point()), &mut ctx()).unwrap();
        let expression = ArbitraryExpression::parse("z").unwrap();

        let lenient = ArbitraryManipulator::new(expression.clone(), Box::new(NodeNullityManipulator::new(true)));
        assert_eq!(lenient.manipulate(&mut tree, &mut ctx()), Ok(0));

        let strict = ArbitraryManipulator::new(expression, Box::new(NodeNullityManipulator::new(true))).strict(true);
        assert!(matches!(strict.manipulate(&mut tree, &mut ctx()), Err(FixtureError::InvalidExpression { .. })));
    }
}
