//! Manipulation settings

use fixture_api::{DecomposedContainerValueFactory, DefaultDecomposedContainerValueFactory};
use std::fmt;
use std::sync::Arc;

/// Settings shared by all manipulations of a fixture
#[derive(Clone)]
pub struct ManipulateOptions {
    decomposed_container_value_factory: Arc<dyn DecomposedContainerValueFactory>,
    expression_strict_mode: bool,
}

impl ManipulateOptions {
    /// Start building options
    #[inline]
    #[must_use]
    pub fn builder() -> ManipulateOptionsBuilder {
        ManipulateOptionsBuilder::default()
    }

    /// Service splitting container values into elements
    #[inline]
    #[must_use]
    pub fn decomposed_container_value_factory(&self) -> &Arc<dyn DecomposedContainerValueFactory> {
        &self.decomposed_container_value_factory
    }

    /// Whether a path that selects no node is an error
    #[inline]
    #[must_use]
    pub fn expression_strict_mode(&self) -> bool {
        self.expression_strict_mode
    }
}

impl Default for ManipulateOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for ManipulateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManipulateOptions")
            .field("expression_strict_mode", &self.expression_strict_mode)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ManipulateOptions`]
#[derive(Default)]
pub struct ManipulateOptionsBuilder {
    decomposed_container_value_factory: Option<Arc<dyn DecomposedContainerValueFactory>>,
    expression_strict_mode: bool,
}

impl ManipulateOptionsBuilder {
    /// Use `factory` to decompose container values
    #[must_use]
    pub fn decomposed_container_value_factory(
        mut self,
        factory: impl DecomposedContainerValueFactory + 'static,
    ) -> Self {
        self.decomposed_container_value_factory = Some(Arc::new(factory));
        self
    }

    /// Fail manipulations whose path selects no node
    #[must_use]
    pub fn expression_strict_mode(mut self, strict: bool) -> Self {
        self.expression_strict_mode = strict;
        self
    }

    /// Fill defaults
    #[must_use]
    pub fn build(self) -> ManipulateOptions {
        ManipulateOptions {
            decomposed_container_value_factory: self
                .decomposed_container_value_factory
                .unwrap_or_else(|| Arc::new(DefaultDecomposedContainerValueFactory)),
            expression_strict_mode: self.expression_strict_mode,
        }
    }
}
