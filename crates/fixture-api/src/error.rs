//! Error types for fixture generation
//!
//! Every failure of a generation pass surfaces as a [`FixtureError`]:
//! - Fixed values that do not fit the node they are set on
//! - Decomposed values missing an expected field or element
//! - Types or values whose shape cannot be described
//! - Sampled trees that cannot be assembled into a concrete instance

/// Result alias used across the fixture crates
pub type Result<T> = std::result::Result<T, FixtureError>;

/// Main fixture error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FixtureError {
    /// Value is not assignable to the node's declared type
    #[error("the value is not of the same type as the property. node type: {node_type}, value type: {value_type}")]
    TypeMismatch {
        /// Declared type of the node
        node_type: String,
        /// Runtime type of the offending value
        value_type: String,
    },

    /// Accessor for a child property is absent on a decomposed value
    #[error("cannot access property `{property}` on value of type {value_type}")]
    PropertyAccess {
        /// Resolved name of the child property
        property: String,
        /// Runtime type of the parent value
        value_type: String,
    },

    /// Type or value cannot be described as leaf, object or container
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    /// Sampled values could not be assembled into an instance
    #[error("assembly failed: {0}")]
    Assembly(String),

    /// Path expression could not be parsed
    #[error("invalid expression `{expression}`: {reason}")]
    InvalidExpression {
        /// Expression as given by the caller
        expression: String,
        /// What went wrong
        reason: String,
    },

    /// Container size bounds are inverted
    #[error("invalid container size: min {min} is greater than max {max}")]
    InvalidContainerSize {
        /// Requested lower bound
        min: usize,
        /// Requested upper bound
        max: usize,
    },

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl FixtureError {
    /// Create type mismatch error
    #[inline]
    #[must_use]
    pub fn type_mismatch(node_type: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self::TypeMismatch {
            node_type: node_type.into(),
            value_type: value_type.into(),
        }
    }

    /// Create property access error
    #[inline]
    #[must_use]
    pub fn property_access(property: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self::PropertyAccess {
            property: property.into(),
            value_type: value_type.into(),
        }
    }

    /// Create invalid expression error
    #[inline]
    #[must_use]
    pub fn invalid_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Check if error was raised while applying a manipulation
    #[inline]
    #[must_use]
    pub fn is_manipulation_error(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. } | Self::PropertyAccess { .. } | Self::InvalidContainerSize { .. }
        )
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Assembly(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_both_types() {
        let err = FixtureError::type_mismatch("i64", "string");
        let message = err.to_string();
        assert!(message.contains("node type: i64"));
        assert!(message.contains("value type: string"));
    }

    #[test]
    fn manipulation_errors_classified() {
        assert!(FixtureError::property_access("name", "int").is_manipulation_error());
        assert!(!FixtureError::Assembly("boom".into()).is_manipulation_error());
        assert!(!FixtureError::UnsupportedShape("Opaque".into()).is_manipulation_error());
    }

    #[test]
    fn serde_errors_become_assembly_errors() {
        let err: FixtureError = serde_json::from_str::<u8>("\"x\"").unwrap_err().into();
        assert!(matches!(err, FixtureError::Assembly(_)));
    }
}
