//! Generation nodes
//!
//! An [`ArbitraryNode`] mirrors one [`Property`] of the generated type and
//! carries the state manipulators rewrite: the node's policy and its value
//! producer. Nodes live in an [`ArbitraryTree`](crate::tree::ArbitraryTree)
//! arena and refer to each other through [`NodeId`] handles.

use fixture_api::{ArbitraryProperty, Property, Value};
use std::fmt;
use std::sync::Arc;

/// Handle of a node inside its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena slot of this handle
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of a node's sampled value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Producer {
    /// Sampled from the node's policy and children
    #[default]
    Undetermined,

    /// Fixed by a manipulation; `Value::Null` means absent
    Fixed(Value),
}

impl Producer {
    /// Check if a manipulation fixed the value
    #[inline]
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// Check if the value is fixed to absence
    #[inline]
    #[must_use]
    pub fn is_fixed_null(&self) -> bool {
        matches!(self, Self::Fixed(Value::Null))
    }
}

/// One node of the generation tree
#[derive(Debug, Clone)]
pub struct ArbitraryNode {
    property: Arc<Property>,
    arbitrary_property: ArbitraryProperty,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    producer: Producer,
}

impl ArbitraryNode {
    /// Create a detached node
    #[must_use]
    pub fn new(property: Arc<Property>, arbitrary_property: ArbitraryProperty) -> Self {
        Self {
            property,
            arbitrary_property,
            children: Vec::new(),
            parent: None,
            producer: Producer::Undetermined,
        }
    }

    /// Property this node mirrors
    #[inline]
    #[must_use]
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Shared handle of the mirrored property
    #[inline]
    #[must_use]
    pub fn shared_property(&self) -> Arc<Property> {
        Arc::clone(&self.property)
    }

    /// Current policy
    #[inline]
    #[must_use]
    pub fn arbitrary_property(&self) -> &ArbitraryProperty {
        &self.arbitrary_property
    }

    /// Name segment used by path resolution
    #[inline]
    #[must_use]
    pub fn resolved_property_name(&self) -> &str {
        self.arbitrary_property.resolved_property_name()
    }

    /// Child handles in declaration or element order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent handle; `None` for the root
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Current producer
    #[inline]
    #[must_use]
    pub fn producer(&self) -> &Producer {
        &self.producer
    }

    pub(crate) fn set_arbitrary_property(&mut self, arbitrary_property: ArbitraryProperty) {
        self.arbitrary_property = arbitrary_property;
    }

    pub(crate) fn set_producer(&mut self, producer: Producer) {
        self.producer = producer;
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }
}
