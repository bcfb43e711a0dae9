//! Fixture facade
//!
//! [`FixtureMonkey`] bundles the generation registry, manipulation settings
//! and configuration. [`ArbitraryBuilder`] records manipulations for one
//! type and replays them on a freshly materialized tree for every sample, so
//! one builder can be sampled any number of times.
//!
//! # Example
//!
//! ```
//! use fixture_core::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Order {
//!     id: String,
//!     quantities: Vec<i32>,
//! }
//!
//! impl Describe for Order {
//!     fn describe() -> TypeDesc {
//!         TypeDesc::object(
//!             "Order",
//!             vec![FieldDesc::of::<String>("id"), FieldDesc::of::<Vec<i32>>("quantities")],
//!         )
//!     }
//! }
//!
//! let fixture = FixtureMonkey::builder().seed(7).build();
//! let order: Order = fixture
//!     .giving::<Order>()
//!     .set("id", "A-1")
//!     .size("quantities", 2, 2)
//!     .sample()?;
//!
//! assert_eq!(order.id, "A-1");
//! assert_eq!(order.quantities.len(), 2);
//! # Ok::<(), fixture_api::FixtureError>(())
//! ```

use crate::expression::ArbitraryExpression;
use crate::manipulate_options::ManipulateOptions;
use crate::manipulator::{
    ArbitraryManipulator, NodeManipulator, NodeNullityManipulator, NodeSetDecomposedValueManipulator,
    NodeSizeManipulator,
};
use crate::sampler::{ArbitraryAssembler, TreeSampler};
use crate::traverser::ArbitraryTraverser;
use crate::tree::ArbitraryTree;
use fixture_api::{
    Describe, FixtureConfig, FixtureError, GenContext, GenerateOptions, GenerateOptionsBuilder, Plugin,
    Property, Result, Value,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Entry point for generating fixtures
#[derive(Debug, Clone)]
pub struct FixtureMonkey {
    options: Arc<GenerateOptions>,
    manipulate_options: Arc<ManipulateOptions>,
    config: FixtureConfig,
}

impl FixtureMonkey {
    /// Fixture with default registry and configuration
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Fixture using `config`
    #[must_use]
    pub fn with_config(config: FixtureConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Start building a fixture
    #[must_use]
    pub fn builder() -> FixtureMonkeyBuilder {
        FixtureMonkeyBuilder::new()
    }

    /// Builder for samples of `T`
    #[must_use]
    pub fn giving<T: Describe>(&self) -> ArbitraryBuilder<T> {
        ArbitraryBuilder::new(self.clone(), Property::root(T::describe()))
    }

    /// One sample of `T`
    ///
    /// # Errors
    /// Returns the first error raised while materializing, sampling or
    /// converting the value
    pub fn sample<T: Describe + DeserializeOwned>(&self) -> Result<T> {
        self.giving::<T>().sample()
    }

    /// Registry shared by every generation pass
    #[inline]
    #[must_use]
    pub fn options(&self) -> &Arc<GenerateOptions> {
        &self.options
    }

    /// Manipulation settings
    #[inline]
    #[must_use]
    pub fn manipulate_options(&self) -> &ManipulateOptions {
        &self.manipulate_options
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Traverser configured with this fixture's registry and depth limit
    #[must_use]
    pub fn traverser(&self) -> ArbitraryTraverser {
        ArbitraryTraverser::new(Arc::clone(&self.options)).with_max_depth(self.config.max_depth)
    }

    fn context(&self) -> GenContext {
        self.config.seed.map_or_else(GenContext::from_entropy, GenContext::new)
    }
}

impl Default for FixtureMonkey {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`FixtureMonkey`]
#[derive(Debug, Default)]
pub struct FixtureMonkeyBuilder {
    options: GenerateOptionsBuilder,
    manipulate_options: ManipulateOptions,
    config: FixtureConfig,
}

impl FixtureMonkeyBuilder {
    /// Builder with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjust the generation registry
    #[must_use]
    pub fn generate_options(
        mut self,
        configure: impl FnOnce(GenerateOptionsBuilder) -> GenerateOptionsBuilder,
    ) -> Self {
        self.options = configure(self.options);
        self
    }

    /// Apply `plugin` to the generation registry
    #[must_use]
    pub fn plugin(mut self, plugin: &impl Plugin) -> Self {
        self.options = self.options.plugin(plugin);
        self
    }

    /// Use `manipulate_options`
    #[must_use]
    pub fn manipulate_options(mut self, manipulate_options: ManipulateOptions) -> Self {
        self.manipulate_options = manipulate_options;
        self
    }

    /// Use `config`; registry defaults are taken from it immediately
    #[must_use]
    pub fn config(mut self, config: FixtureConfig) -> Self {
        self.options = self.options.config(&config);
        self.config = config;
        self
    }

    /// Sample reproducibly from `seed`
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Limit tree depth
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Freeze the registry and create the fixture
    #[must_use]
    pub fn build(self) -> FixtureMonkey {
        FixtureMonkey {
            options: Arc::new(self.options.build()),
            manipulate_options: Arc::new(self.manipulate_options),
            config: self.config,
        }
    }
}

#[derive(Debug, Clone)]
enum Manipulation {
    Set(ArbitraryExpression, Value),
    Nullity(ArbitraryExpression, bool),
    Size(ArbitraryExpression, usize, usize),
}

/// Records manipulations for samples of `T`
#[derive(Debug, Clone)]
pub struct ArbitraryBuilder<T> {
    monkey: FixtureMonkey,
    root: Property,
    manipulations: Vec<Manipulation>,
    error: Option<FixtureError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArbitraryBuilder<T> {
    fn new(monkey: FixtureMonkey, root: Property) -> Self {
        Self {
            monkey,
            root,
            manipulations: Vec::new(),
            error: None,
            _marker: PhantomData,
        }
    }

    /// Fix the nodes at `expression` to `value`
    ///
    /// Errors are reported when sampling.
    #[must_use]
    pub fn set(self, expression: &str, value: impl Serialize) -> Self {
        match Value::from_serialize(&value) {
            Ok(value) => self.set_value(expression, value),
            Err(err) => self.fail(err),
        }
    }

    /// Fix the nodes at `expression` to a dynamic `value`
    #[must_use]
    pub fn set_value(self, expression: &str, value: Value) -> Self {
        self.record(expression, |expression| Manipulation::Set(expression, value))
    }

    /// Make the nodes at `expression` always absent
    #[must_use]
    pub fn set_null(self, expression: &str) -> Self {
        self.record(expression, |expression| Manipulation::Nullity(expression, true))
    }

    /// Make the nodes at `expression` always present
    #[must_use]
    pub fn set_not_null(self, expression: &str) -> Self {
        self.record(expression, |expression| Manipulation::Nullity(expression, false))
    }

    /// Give the containers at `expression` between `min` and `max` elements
    #[must_use]
    pub fn size(self, expression: &str, min: usize, max: usize) -> Self {
        self.record(expression, |expression| Manipulation::Size(expression, min, max))
    }

    /// Materialize a tree and replay the recorded manipulations on it
    ///
    /// # Errors
    /// Returns the first recorded or replay error
    pub fn build_tree(&self) -> Result<ArbitraryTree> {
        self.build_tree_with(&mut self.monkey.context())
    }

    /// Like [`build_tree`](Self::build_tree), drawing container sizes from `ctx`
    ///
    /// # Errors
    /// Returns the first recorded or replay error
    pub fn build_tree_with(&self, ctx: &mut GenContext) -> Result<ArbitraryTree> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        let traverser = self.monkey.traverser();
        let mut tree = traverser.traverse(self.root.clone(), ctx)?;
        let strict = self.monkey.manipulate_options.expression_strict_mode();
        for manipulation in &self.manipulations {
            let (expression, manipulator) = self.manipulator(&traverser, manipulation);
            ArbitraryManipulator::new(expression, manipulator)
                .strict(strict)
                .manipulate(&mut tree, ctx)?;
        }
        Ok(tree)
    }

    /// One sample as a dynamic value
    ///
    /// # Errors
    /// Returns the first error raised while materializing or sampling
    pub fn sample_value(&self) -> Result<Value> {
        self.sample_value_with(&mut self.monkey.context())
    }

    /// One sample as a dynamic value, drawing from `ctx`
    ///
    /// # Errors
    /// Returns the first error raised while materializing or sampling
    pub fn sample_value_with(&self, ctx: &mut GenContext) -> Result<Value> {
        let tree = self.build_tree_with(ctx)?;
        tracing::debug!("Sampling {} with seed {}", self.root.ty(), ctx.seed());
        TreeSampler::new(Arc::clone(&self.monkey.options)).assemble(&tree, ctx)
    }

    fn manipulator(
        &self,
        traverser: &ArbitraryTraverser,
        manipulation: &Manipulation,
    ) -> (ArbitraryExpression, Box<dyn NodeManipulator>) {
        match manipulation {
            Manipulation::Set(expression, value) => (
                expression.clone(),
                Box::new(NodeSetDecomposedValueManipulator::new(
                    traverser.clone(),
                    Arc::clone(self.monkey.manipulate_options.decomposed_container_value_factory()),
                    value.clone(),
                )),
            ),
            Manipulation::Nullity(expression, to_null) => {
                (expression.clone(), Box::new(NodeNullityManipulator::new(*to_null)))
            }
            Manipulation::Size(expression, min, max) => (
                expression.clone(),
                Box::new(NodeSizeManipulator::new(traverser.clone(), *min, *max)),
            ),
        }
    }

    fn record(mut self, expression: &str, manipulation: impl FnOnce(ArbitraryExpression) -> Manipulation) -> Self {
        if self.error.is_none() {
            match ArbitraryExpression::parse(expression) {
                Ok(expression) => self.manipulations.push(manipulation(expression)),
                Err(err) => self.error = Some(err),
            }
        }
        self
    }

    fn fail(mut self, err: FixtureError) -> Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }
}

impl<T: DeserializeOwned> ArbitraryBuilder<T> {
    /// One sample
    ///
    /// # Errors
    /// Returns the first error raised while materializing, sampling or
    /// converting the value
    pub fn sample(&self) -> Result<T> {
        self.sample_value()?.deserialize_into()
    }

    /// One sample drawn from `seed`
    ///
    /// # Errors
    /// See [`ArbitraryBuilder::sample`]
    pub fn sample_with_seed(&self, seed: u64) -> Result<T> {
        self.sample_value_with(&mut GenContext::new(seed))?.deserialize_into()
    }

    /// `count` samples drawn from one random stream
    ///
    /// # Errors
    /// See [`ArbitraryBuilder::sample`]
    pub fn sample_list(&self, count: usize) -> Result<Vec<T>> {
        let mut ctx = self.monkey.context();
        (0..count)
            .map(|_| self.sample_value_with(&mut ctx)?.deserialize_into())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_api::{FieldDesc, TypeDesc};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        tags: Vec<String>,
        note: Option<String>,
    }

    impl Describe for Item {
        fn describe() -> TypeDesc {
            TypeDesc::object(
                "Item",
                vec![
                    FieldDesc::of::<String>("name"),
                    FieldDesc::of::<Vec<String>>("tags"),
                    FieldDesc::of::<Option<String>>("note"),
                ],
            )
        }
    }

    fn fixture() -> FixtureMonkey {
        FixtureMonkey::builder().seed(11).build()
    }

    #[test]
    fn builder_is_reusable() {
        let builder = fixture().giving::<Item>().set("name", "pen").size("tags", 2, 2);
        for item in builder.sample_list(5).unwrap() {
            assert_eq!(item.name, "pen");
            assert_eq!(item.tags.len(), 2);
        }
    }

    #[test]
    fn set_whole_object() {
        let item = Item {
            name: "cup".into(),
            tags: vec!["a".into()],
            note: None,
        };
        let sampled: Item = fixture().giving::<Item>().set("$", &item).sample().unwrap();
        assert_eq!(sampled, item);
    }

    #[test]
    fn null_and_not_null() {
        let builder = fixture().giving::<Item>().set_null("note");
        assert!(builder.sample_list(10).unwrap().iter().all(|item| item.note.is_none()));

        let builder = fixture().giving::<Item>().set_not_null("note");
        assert!(builder.sample_list(10).unwrap().iter().all(|item| item.note.is_some()));
    }

    #[test]
    fn invalid_expression_surfaces_on_sample() {
        let err = fixture().giving::<Item>().set("tags[", 1).sample().unwrap_err();
        assert!(matches!(err, FixtureError::InvalidExpression { .. }));
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let builder = fixture().giving::<Item>();
        assert_eq!(builder.sample_with_seed(3).unwrap(), builder.sample_with_seed(3).unwrap());
        assert_eq!(builder.sample().unwrap(), builder.sample().unwrap());
    }

    #[test]
    fn strict_mode_rejects_unknown_paths() {
        let fixture = FixtureMonkey::builder()
            .manipulate_options(ManipulateOptions::builder().expression_strict_mode(true).build())
            .build();
        let err = fixture.giving::<Item>().set("missing", 1).sample().unwrap_err();
        assert!(matches!(err, FixtureError::InvalidExpression { .. }));
    }
}
