//! Property model
//!
//! A [`Property`] describes one slot of a generated value: the root, an
//! object field or a container element. Properties are immutable and shared
//! by the nodes that mirror them.

use crate::error::{FixtureError, Result};
use crate::types::{FieldDesc, TypeDesc};
use crate::value::Value;
use std::fmt::{self, Display, Formatter};

/// Position of a property inside its parent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Top-level value
    Root,

    /// Named object field
    Field(String),

    /// Container element at index
    Element(usize),
}

/// Structural descriptor of one field or element
#[derive(Debug, Clone)]
pub struct Property {
    kind: PropertyKind,
    ty: TypeDesc,
    parent_type: Option<String>,
}

impl Property {
    /// Root property for `ty`
    #[inline]
    #[must_use]
    pub fn root(ty: TypeDesc) -> Self {
        Self {
            kind: PropertyKind::Root,
            ty,
            parent_type: None,
        }
    }

    /// Field property declared on `parent`
    #[inline]
    #[must_use]
    pub fn field(parent: &Property, field: FieldDesc) -> Self {
        Self {
            kind: PropertyKind::Field(field.name),
            ty: field.ty,
            parent_type: Some(parent.ty.name().to_owned()),
        }
    }

    /// Element property of container `parent`
    ///
    /// Returns `None` when `parent` is not a container.
    #[must_use]
    pub fn element(parent: &Property, index: usize) -> Option<Self> {
        parent.ty.element().map(|element| Self {
            kind: PropertyKind::Element(index),
            ty: element.clone(),
            parent_type: Some(parent.ty.name().to_owned()),
        })
    }

    /// Position inside the parent
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// Declared type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    /// Declared field name, if this is a field
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Field(name) => Some(name),
            _ => None,
        }
    }

    /// Element index, if this is a container element
    #[inline]
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.kind {
            PropertyKind::Element(index) => Some(index),
            _ => None,
        }
    }

    /// Nullability hint of the declared type
    #[inline]
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.ty.is_nullable()
    }

    /// Type name of the enclosing property; `None` for the root
    #[inline]
    #[must_use]
    pub fn parent_type(&self) -> Option<&str> {
        self.parent_type.as_deref()
    }

    /// Generic type arguments (the element type of a container)
    #[must_use]
    pub fn generic_arguments(&self) -> Vec<&TypeDesc> {
        self.ty.element().into_iter().collect()
    }

    /// Declared object fields as child properties
    ///
    /// Containers and leaves have no declared sub-properties; container
    /// elements are created per index with [`Property::element`].
    #[must_use]
    pub fn child_properties(&self) -> Vec<Property> {
        self.ty
            .fields()
            .unwrap_or_default()
            .into_iter()
            .map(|field| Self::field(self, field))
            .collect()
    }

    /// Project this property's value out of its parent's value
    ///
    /// # Errors
    /// Returns `PropertyAccess` if the parent value has no such field or
    /// element.
    pub fn get_value(&self, parent_value: &Value) -> Result<Value> {
        let found = match &self.kind {
            PropertyKind::Root => Some(parent_value),
            PropertyKind::Field(name) => parent_value.get_field(name),
            PropertyKind::Element(index) => parent_value.get_index(*index),
        };
        found
            .cloned()
            .ok_or_else(|| FixtureError::property_access(self.to_string(), parent_value.type_name()))
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PropertyKind::Root => f.write_str("$"),
            PropertyKind::Field(name) => f.write_str(name),
            PropertyKind::Element(index) => write!(f, "[{index}]"),
        }
    }
}
