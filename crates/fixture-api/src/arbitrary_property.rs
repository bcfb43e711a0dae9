//! Node generation policy
//!
//! [`ArbitraryProperty`] is the resolved generation policy attached to a
//! node. It is an immutable value: every change goes through a `with_*`
//! copy, and the node swaps the whole policy.

use crate::arbitrary::GenContext;
use crate::error::{FixtureError, Result};
use serde::{Deserialize, Serialize};

/// Null-inject probability that keeps a node present
pub const NOT_NULL_INJECT: f64 = 0.0;

/// Null-inject probability that always makes a node absent
pub const ALWAYS_NULL_INJECT: f64 = 1.0;

/// Default null-inject probability for nullable properties
pub const DEFAULT_NULL_INJECT: f64 = 0.2;

/// Container size bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    min: usize,
    max: usize,
    element_count: Option<usize>,
}

impl ContainerInfo {
    /// Create bounds `min..=max`
    ///
    /// # Errors
    /// Returns `InvalidContainerSize` when `min > max`
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(FixtureError::InvalidContainerSize { min, max });
        }
        Ok(Self {
            min,
            max,
            element_count: None,
        })
    }

    /// Bounds of exactly `size` elements, already resolved
    #[inline]
    #[must_use]
    pub const fn exact(size: usize) -> Self {
        Self {
            min: size,
            max: size,
            element_count: Some(size),
        }
    }

    /// Lower bound
    #[inline]
    #[must_use]
    pub fn min(&self) -> usize {
        self.min
    }

    /// Upper bound
    #[inline]
    #[must_use]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Element count once resolved
    #[inline]
    #[must_use]
    pub fn element_count(&self) -> Option<usize> {
        self.element_count
    }

    /// Element count to materialize: the resolved count, else a size drawn
    /// from `min..=max`
    #[inline]
    pub fn resolve_size(&self, ctx: &mut GenContext) -> usize {
        self.element_count
            .unwrap_or_else(|| ctx.gen_size(self.min, self.max))
    }

    /// Copy with a resolved element count
    #[inline]
    #[must_use]
    pub fn with_element_count(mut self, count: usize) -> Self {
        self.element_count = Some(count);
        self
    }
}

/// Resolved generation policy of a node
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitraryProperty {
    resolved_property_name: String,
    null_inject: f64,
    container_info: Option<ContainerInfo>,
}

impl ArbitraryProperty {
    /// Create policy
    ///
    /// `null_inject` is clamped into `[0.0, 1.0]`.
    #[inline]
    #[must_use]
    pub fn new(
        resolved_property_name: impl Into<String>,
        null_inject: f64,
        container_info: Option<ContainerInfo>,
    ) -> Self {
        Self {
            resolved_property_name: resolved_property_name.into(),
            null_inject: clamp_probability(null_inject),
            container_info,
        }
    }

    /// Name segment used by path resolution
    #[inline]
    #[must_use]
    pub fn resolved_property_name(&self) -> &str {
        &self.resolved_property_name
    }

    /// Probability of sampling absence
    #[inline]
    #[must_use]
    pub fn null_inject(&self) -> f64 {
        self.null_inject
    }

    /// Check if the node is marked as a container
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.container_info.is_some()
    }

    /// Container bounds, for container nodes
    #[inline]
    #[must_use]
    pub fn container_info(&self) -> Option<&ContainerInfo> {
        self.container_info.as_ref()
    }

    /// Check if the node can never be absent
    #[inline]
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.null_inject <= NOT_NULL_INJECT
    }

    /// Check if the node is always absent
    #[inline]
    #[must_use]
    pub fn is_forced_null(&self) -> bool {
        self.null_inject >= ALWAYS_NULL_INJECT
    }

    /// Copy with a different null-inject probability
    #[inline]
    #[must_use]
    pub fn with_null_inject(&self, null_inject: f64) -> Self {
        Self {
            null_inject: clamp_probability(null_inject),
            ..self.clone()
        }
    }

    /// Copy with different container bounds
    #[inline]
    #[must_use]
    pub fn with_container_info(&self, container_info: ContainerInfo) -> Self {
        Self {
            container_info: Some(container_info),
            ..self.clone()
        }
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        NOT_NULL_INJECT
    } else {
        p.clamp(NOT_NULL_INJECT, ALWAYS_NULL_INJECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_info_rejects_inverted_bounds() {
        assert_eq!(
            ContainerInfo::new(4, 2),
            Err(FixtureError::InvalidContainerSize { min: 4, max: 2 })
        );
        let info = ContainerInfo::new(1, 3).unwrap();
        let mut ctx = GenContext::new(0);
        assert!((1..=3).contains(&info.resolve_size(&mut ctx)));
        assert_eq!(info.with_element_count(2).resolve_size(&mut ctx), 2);
        assert_eq!(ContainerInfo::exact(4).resolve_size(&mut ctx), 4);
    }

    #[test]
    fn with_null_inject_copies() {
        let original = ArbitraryProperty::new("name", DEFAULT_NULL_INJECT, None);
        let forced = original.with_null_inject(NOT_NULL_INJECT);

        assert!(forced.is_not_null());
        assert!(!original.is_not_null());
        assert_eq!(forced.resolved_property_name(), "name");
    }

    #[test]
    fn null_inject_clamped() {
        assert!(ArbitraryProperty::new("a", 7.0, None).is_forced_null());
        assert!(ArbitraryProperty::new("a", -1.0, None).is_not_null());
        assert!(ArbitraryProperty::new("a", f64::NAN, None).is_not_null());
    }

    #[test]
    fn container_flag_follows_info() {
        let leaf = ArbitraryProperty::new("a", 0.0, None);
        assert!(!leaf.is_container());
        let list = leaf.with_container_info(ContainerInfo::exact(3));
        assert!(list.is_container());
        assert_eq!(list.container_info().and_then(ContainerInfo::element_count), Some(3));
    }
}
