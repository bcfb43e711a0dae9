//! Container decomposition
//!
//! Splits a concrete container value into its elements so a fixed value can
//! be pushed down into element nodes.

use crate::error::{FixtureError, Result};
use crate::value::Value;

/// Elements of a container value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecomposedContainerValue {
    /// Elements in container order
    pub elements: Vec<Value>,
    /// Number of elements
    pub size: usize,
}

impl DecomposedContainerValue {
    /// Wrap `elements`
    #[must_use]
    pub fn new(elements: Vec<Value>) -> Self {
        let size = elements.len();
        Self { elements, size }
    }
}

/// Decomposes container values
pub trait DecomposedContainerValueFactory: Send + Sync {
    /// Split `value` into elements
    ///
    /// # Errors
    /// Returns `UnsupportedShape` when `value` is not a container this
    /// factory understands
    fn decompose(&self, value: &Value) -> Result<DecomposedContainerValue>;
}

/// Handles list values
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecomposedContainerValueFactory;

impl DecomposedContainerValueFactory for DefaultDecomposedContainerValueFactory {
    fn decompose(&self, value: &Value) -> Result<DecomposedContainerValue> {
        match value {
            Value::List(elements) => Ok(DecomposedContainerValue::new(elements.clone())),
            other => Err(FixtureError::UnsupportedShape(format!(
                "cannot decompose {} as a container",
                other.type_name()
            ))),
        }
    }
}
