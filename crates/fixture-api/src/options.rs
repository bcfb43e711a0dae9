//! Generation registry
//!
//! [`GenerateOptions`] holds one [`PriorityChain`] per pluggable concern.
//! It is assembled once through [`GenerateOptionsBuilder`], is immutable
//! afterwards and is shared between generation passes behind an `Arc`.
//!
//! # Example
//!
//! ```
//! use fixture_api::prelude::*;
//!
//! let options = GenerateOptions::builder()
//!     .default_container_max_size(5)
//!     .insert_first_null_inject_generator(AnyMatcher, |_: &Property| NOT_NULL_INJECT)
//!     .build();
//!
//! assert_eq!(options.default_container_max_size(), 5);
//! ```

use crate::arbitrary::{ArbitraryGenerator, DefaultArbitraryGenerator, FixtureCustomizer, NoopCustomizer};
use crate::arbitrary_property::{ArbitraryProperty, ContainerInfo, DEFAULT_NULL_INJECT};
use crate::config::{FixtureConfig, DEFAULT_CONTAINER_MAX_SIZE};
use crate::generator::{
    ArbitraryPropertyGenerator, ArbitraryPropertyGeneratorContext, ContainerInfoGenerator,
    DefaultArbitraryPropertyGenerator, DefaultContainerInfoGenerator, DefaultNullInjectGenerator,
    DefaultPropertyNameResolver, NullInjectGenerator, PropertyNameResolver,
};
use crate::matcher::{Matcher, MatcherOperator, PriorityChain};
use crate::property::Property;
use std::fmt;
use std::sync::Arc;

/// Shared policy generator
pub type SharedArbitraryPropertyGenerator = Arc<dyn ArbitraryPropertyGenerator>;
/// Shared name resolver
pub type SharedPropertyNameResolver = Arc<dyn PropertyNameResolver>;
/// Shared null-inject generator
pub type SharedNullInjectGenerator = Arc<dyn NullInjectGenerator>;
/// Shared container bounds generator
pub type SharedContainerInfoGenerator = Arc<dyn ContainerInfoGenerator>;
/// Shared leaf value generator
pub type SharedArbitraryGenerator = Arc<dyn ArbitraryGenerator>;
/// Shared customizer
pub type SharedCustomizer = Arc<dyn FixtureCustomizer>;

/// Immutable registry of generation policies
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    arbitrary_property_generators: PriorityChain<SharedArbitraryPropertyGenerator>,
    property_name_resolvers: PriorityChain<SharedPropertyNameResolver>,
    null_inject_generators: PriorityChain<SharedNullInjectGenerator>,
    container_info_generators: PriorityChain<SharedContainerInfoGenerator>,
    arbitrary_generators: PriorityChain<SharedArbitraryGenerator>,
    arbitrary_customizers: PriorityChain<SharedCustomizer>,
    default_null_inject: f64,
    default_container_max_size: usize,
    default_container_info: ContainerInfo,
}

impl GenerateOptions {
    /// Start building a registry
    #[inline]
    #[must_use]
    pub fn builder() -> GenerateOptionsBuilder {
        GenerateOptionsBuilder::new()
    }

    /// Policy generator for `property`
    #[must_use]
    pub fn arbitrary_property_generator(&self, property: &Property) -> &dyn ArbitraryPropertyGenerator {
        self.arbitrary_property_generators.resolve(property).as_ref()
    }

    /// Name resolver for `property`
    #[must_use]
    pub fn property_name_resolver(&self, property: &Property) -> &dyn PropertyNameResolver {
        self.property_name_resolvers.resolve(property).as_ref()
    }

    /// Null-inject generator for `property`
    #[must_use]
    pub fn null_inject_generator(&self, property: &Property) -> &dyn NullInjectGenerator {
        self.null_inject_generators.resolve(property).as_ref()
    }

    /// Container bounds generator for `property`
    #[must_use]
    pub fn container_info_generator(&self, property: &Property) -> &dyn ContainerInfoGenerator {
        self.container_info_generators.resolve(property).as_ref()
    }

    /// Leaf value generator for `property`
    #[must_use]
    pub fn arbitrary_generator(&self, property: &Property) -> &dyn ArbitraryGenerator {
        self.arbitrary_generators.resolve(property).as_ref()
    }

    /// Explicitly registered leaf value generator, ignoring the default
    #[must_use]
    pub fn find_arbitrary_generator(&self, property: &Property) -> Option<&dyn ArbitraryGenerator> {
        self.arbitrary_generators.find(property).map(AsRef::as_ref)
    }

    /// Customizer for `property`
    #[must_use]
    pub fn customizer(&self, property: &Property) -> &dyn FixtureCustomizer {
        self.arbitrary_customizers.resolve(property).as_ref()
    }

    /// Generate the policy of a node mirroring `property`
    #[must_use]
    pub fn generate_arbitrary_property(
        &self,
        property: &Property,
        parent: Option<&ArbitraryProperty>,
    ) -> ArbitraryProperty {
        let ctx = ArbitraryPropertyGeneratorContext {
            property,
            parent,
            options: self,
        };
        self.arbitrary_property_generator(property).generate(&ctx)
    }

    /// Null-inject probability of nullable properties
    #[inline]
    #[must_use]
    pub fn default_null_inject(&self) -> f64 {
        self.default_null_inject
    }

    /// Upper container size bound
    #[inline]
    #[must_use]
    pub fn default_container_max_size(&self) -> usize {
        self.default_container_max_size
    }

    /// Container bounds used when no generator is registered
    #[inline]
    #[must_use]
    pub fn default_container_info(&self) -> ContainerInfo {
        self.default_container_info
    }

    /// Leaf value generator chain
    #[inline]
    #[must_use]
    pub fn arbitrary_generators(&self) -> &PriorityChain<SharedArbitraryGenerator> {
        &self.arbitrary_generators
    }

    /// Null-inject generator chain
    #[inline]
    #[must_use]
    pub fn null_inject_generators(&self) -> &PriorityChain<SharedNullInjectGenerator> {
        &self.null_inject_generators
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Extension bundle applied to a builder
pub trait Plugin {
    /// Register this plugin's policies on `builder`
    fn accept(&self, builder: GenerateOptionsBuilder) -> GenerateOptionsBuilder;
}

impl<F> Plugin for F
where
    F: Fn(GenerateOptionsBuilder) -> GenerateOptionsBuilder,
{
    fn accept(&self, builder: GenerateOptionsBuilder) -> GenerateOptionsBuilder {
        self(builder)
    }
}

macro_rules! chain_methods {
    (
        $field:ident, $default_field:ident, $trait_:ident, $shared:ty,
        $replace:ident, $push:ident, $insert_first:ident, $set_default:ident, $what:literal
    ) => {
        #[doc = concat!("Replace the ", $what, " chain")]
        #[must_use]
        pub fn $replace(mut self, operators: Vec<MatcherOperator<$shared>>) -> Self {
            self.$field = operators;
            self
        }

        #[doc = concat!("Append a ", $what, " with lowest priority")]
        #[must_use]
        pub fn $push(mut self, matcher: impl Matcher + 'static, operator: impl $trait_ + 'static) -> Self {
            self.$field.push(MatcherOperator::new(matcher, Arc::new(operator) as $shared));
            self
        }

        #[doc = concat!("Insert a ", $what, " ahead of every registered one")]
        #[must_use]
        pub fn $insert_first(mut self, matcher: impl Matcher + 'static, operator: impl $trait_ + 'static) -> Self {
            self.$field
                .insert(0, MatcherOperator::new(matcher, Arc::new(operator) as $shared));
            self
        }

        #[doc = concat!("Set the fallback ", $what)]
        #[must_use]
        pub fn $set_default(mut self, operator: impl $trait_ + 'static) -> Self {
            self.$default_field = Some(Arc::new(operator) as $shared);
            self
        }
    };
}

/// Builder for [`GenerateOptions`]
pub struct GenerateOptionsBuilder {
    arbitrary_property_generators: Vec<MatcherOperator<SharedArbitraryPropertyGenerator>>,
    property_name_resolvers: Vec<MatcherOperator<SharedPropertyNameResolver>>,
    null_inject_generators: Vec<MatcherOperator<SharedNullInjectGenerator>>,
    container_info_generators: Vec<MatcherOperator<SharedContainerInfoGenerator>>,
    arbitrary_generators: Vec<MatcherOperator<SharedArbitraryGenerator>>,
    arbitrary_customizers: Vec<MatcherOperator<SharedCustomizer>>,
    default_arbitrary_property_generator: Option<SharedArbitraryPropertyGenerator>,
    default_property_name_resolver: Option<SharedPropertyNameResolver>,
    default_null_inject_generator: Option<SharedNullInjectGenerator>,
    default_container_info_generator: Option<SharedContainerInfoGenerator>,
    default_arbitrary_generator: Option<SharedArbitraryGenerator>,
    default_customizer: Option<SharedCustomizer>,
    default_null_inject: f64,
    default_container_min_size: usize,
    default_container_max_size: usize,
    default_container_info: Option<ContainerInfo>,
}

impl GenerateOptionsBuilder {
    /// Builder with no registrations
    #[must_use]
    pub fn new() -> Self {
        Self {
            arbitrary_property_generators: Vec::new(),
            property_name_resolvers: Vec::new(),
            null_inject_generators: Vec::new(),
            container_info_generators: Vec::new(),
            arbitrary_generators: Vec::new(),
            arbitrary_customizers: Vec::new(),
            default_arbitrary_property_generator: None,
            default_property_name_resolver: None,
            default_null_inject_generator: None,
            default_container_info_generator: None,
            default_arbitrary_generator: None,
            default_customizer: None,
            default_null_inject: DEFAULT_NULL_INJECT,
            default_container_min_size: 0,
            default_container_max_size: DEFAULT_CONTAINER_MAX_SIZE,
            default_container_info: None,
        }
    }

    chain_methods!(
        arbitrary_property_generators, default_arbitrary_property_generator,
        ArbitraryPropertyGenerator, SharedArbitraryPropertyGenerator,
        arbitrary_property_generators, push_arbitrary_property_generator,
        insert_first_arbitrary_property_generator, default_arbitrary_property_generator,
        "policy generator"
    );

    chain_methods!(
        property_name_resolvers, default_property_name_resolver,
        PropertyNameResolver, SharedPropertyNameResolver,
        property_name_resolvers, push_property_name_resolver,
        insert_first_property_name_resolver, default_property_name_resolver,
        "name resolver"
    );

    chain_methods!(
        null_inject_generators, default_null_inject_generator,
        NullInjectGenerator, SharedNullInjectGenerator,
        null_inject_generators, push_null_inject_generator,
        insert_first_null_inject_generator, default_null_inject_generator,
        "null-inject generator"
    );

    chain_methods!(
        container_info_generators, default_container_info_generator,
        ContainerInfoGenerator, SharedContainerInfoGenerator,
        container_info_generators, push_container_info_generator,
        insert_first_container_info_generator, default_container_info_generator,
        "container bounds generator"
    );

    chain_methods!(
        arbitrary_generators, default_arbitrary_generator,
        ArbitraryGenerator, SharedArbitraryGenerator,
        arbitrary_generators, push_arbitrary_generator,
        insert_first_arbitrary_generator, default_arbitrary_generator,
        "leaf value generator"
    );

    chain_methods!(
        arbitrary_customizers, default_customizer,
        FixtureCustomizer, SharedCustomizer,
        arbitrary_customizers, push_customizer,
        insert_first_customizer, default_customizer,
        "customizer"
    );

    /// Null-inject probability used by the default null-inject generator
    #[inline]
    #[must_use]
    pub fn default_null_inject(mut self, null_inject: f64) -> Self {
        self.default_null_inject = null_inject;
        self
    }

    /// Upper bound used by the default container bounds
    #[inline]
    #[must_use]
    pub fn default_container_max_size(mut self, max: usize) -> Self {
        self.default_container_max_size = max;
        self
    }

    /// Exact bounds returned by the default container bounds generator
    #[inline]
    #[must_use]
    pub fn default_container_info(mut self, info: ContainerInfo) -> Self {
        self.default_container_info = Some(info);
        self
    }

    /// Apply settings from `config`
    #[must_use]
    pub fn config(mut self, config: &FixtureConfig) -> Self {
        self.default_null_inject = config.default_null_inject;
        self.default_container_min_size = config.default_container_min_size;
        self.default_container_max_size = config.default_container_max_size;
        self
    }

    /// Apply `plugin`
    #[must_use]
    pub fn plugin(self, plugin: &impl Plugin) -> Self {
        plugin.accept(self)
    }

    /// Fill defaults and freeze the registry
    #[must_use]
    pub fn build(self) -> GenerateOptions {
        let max = self.default_container_max_size;
        let min = self.default_container_min_size.min(max);
        let container_info = self.default_container_info.unwrap_or_else(|| {
            ContainerInfo::new(min, max).unwrap_or_else(|_| ContainerInfo::exact(max))
        });

        tracing::trace!(
            "Building generate options: null_inject={}, container={}..={}",
            self.default_null_inject,
            container_info.min(),
            container_info.max()
        );

        GenerateOptions {
            arbitrary_property_generators: PriorityChain::with_operators(
                self.arbitrary_property_generators,
                self.default_arbitrary_property_generator
                    .unwrap_or_else(|| Arc::new(DefaultArbitraryPropertyGenerator)),
            ),
            property_name_resolvers: PriorityChain::with_operators(
                self.property_name_resolvers,
                self.default_property_name_resolver
                    .unwrap_or_else(|| Arc::new(DefaultPropertyNameResolver)),
            ),
            null_inject_generators: PriorityChain::with_operators(
                self.null_inject_generators,
                self.default_null_inject_generator
                    .unwrap_or_else(|| Arc::new(DefaultNullInjectGenerator::new(self.default_null_inject))),
            ),
            container_info_generators: PriorityChain::with_operators(
                self.container_info_generators,
                self.default_container_info_generator
                    .unwrap_or_else(|| Arc::new(DefaultContainerInfoGenerator::new(container_info))),
            ),
            arbitrary_generators: PriorityChain::with_operators(
                self.arbitrary_generators,
                self.default_arbitrary_generator
                    .unwrap_or_else(|| Arc::new(DefaultArbitraryGenerator)),
            ),
            arbitrary_customizers: PriorityChain::with_operators(
                self.arbitrary_customizers,
                self.default_customizer.unwrap_or_else(|| Arc::new(NoopCustomizer)),
            ),
            default_null_inject: self.default_null_inject,
            default_container_max_size: max,
            default_container_info: container_info,
        }
    }
}

impl Default for GenerateOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GenerateOptionsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateOptionsBuilder")
            .field("default_null_inject", &self.default_null_inject)
            .field("default_container_max_size", &self.default_container_max_size)
            .finish_non_exhaustive()
    }
}
