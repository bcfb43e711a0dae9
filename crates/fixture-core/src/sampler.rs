//! Tree sampling
//!
//! An [`ArbitraryAssembler`] turns a fully manipulated tree into a
//! [`Value`]. [`TreeSampler`] walks the tree top-down:
//! 1. A fixed producer yields its value; its subtree is not visited
//! 2. The null-inject probability is rolled; absence stops the walk
//! 3. Leaves are sampled by the registered value generator
//! 4. Objects and containers assemble their children's samples
//! 5. The registered customizer rewrites the result

use crate::node::{NodeId, Producer};
use crate::tree::ArbitraryTree;
use fixture_api::{GenContext, GenerateOptions, Result, TypeKind, Value};
use indexmap::IndexMap;
use std::sync::Arc;

/// Turns a generation tree into a value
pub trait ArbitraryAssembler {
    /// Assemble the value of the whole tree
    ///
    /// # Errors
    /// Returns the first error raised by a value generator
    fn assemble(&self, tree: &ArbitraryTree, ctx: &mut GenContext) -> Result<Value>;
}

/// Default assembler driven by [`GenerateOptions`]
#[derive(Debug, Clone)]
pub struct TreeSampler {
    options: Arc<GenerateOptions>,
}

impl TreeSampler {
    /// Create sampler using `options`
    #[must_use]
    pub fn new(options: Arc<GenerateOptions>) -> Self {
        Self { options }
    }

    /// Sample the subtree rooted at `id`
    ///
    /// # Errors
    /// Returns the first error raised by a value generator
    pub fn sample_node(&self, tree: &ArbitraryTree, id: NodeId, ctx: &mut GenContext) -> Result<Value> {
        let node = &tree[id];
        if let Producer::Fixed(value) = node.producer() {
            return Ok(value.clone());
        }
        if ctx.gen_bool(node.arbitrary_property().null_inject()) {
            return Ok(Value::Null);
        }

        let property = node.property();
        let mut value = match property.ty().kind() {
            TypeKind::Object(_) => {
                let mut fields = IndexMap::with_capacity(node.children().len());
                for child in node.children() {
                    let child_node = &tree[*child];
                    let key = child_node
                        .property()
                        .name()
                        .unwrap_or_else(|| child_node.resolved_property_name())
                        .to_owned();
                    fields.insert(key, self.sample_node(tree, *child, ctx)?);
                }
                Value::Object(fields)
            }
            TypeKind::List(_) => Value::List(
                node.children()
                    .iter()
                    .map(|child| self.sample_node(tree, *child, ctx))
                    .collect::<Result<_>>()?,
            ),
            TypeKind::Leaf(_) | TypeKind::Enum(_) | TypeKind::Opaque => {
                self.options.arbitrary_generator(property).generate(property, ctx)?
            }
        };

        self.options.customizer(property).customize(property, &mut value);
        Ok(value)
    }
}

impl ArbitraryAssembler for TreeSampler {
    fn assemble(&self, tree: &ArbitraryTree, ctx: &mut GenContext) -> Result<Value> {
        tracing::trace!("Sampling tree of {} nodes with seed {}", tree.len(), ctx.seed());
        self.sample_node(tree, tree.find_root(), ctx)
    }
}
