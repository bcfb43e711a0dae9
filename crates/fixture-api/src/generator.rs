//! Policy generators
//!
//! The pluggable pieces that decide a node's [`ArbitraryProperty`]:
//! - [`ArbitraryPropertyGenerator`]: assembles the whole policy
//! - [`PropertyNameResolver`]: the name segment used by path expressions
//! - [`NullInjectGenerator`]: the null-inject probability
//! - [`ContainerInfoGenerator`]: container size bounds
//!
//! Each has a default and a blanket implementation for closures, so a
//! registration can be a one-liner.

use crate::arbitrary_property::{
    ArbitraryProperty, ContainerInfo, DEFAULT_NULL_INJECT, NOT_NULL_INJECT,
};
use crate::options::GenerateOptions;
use crate::property::{Property, PropertyKind};

/// Inputs for generating one node's policy
#[derive(Debug, Clone, Copy)]
pub struct ArbitraryPropertyGeneratorContext<'a> {
    /// Property the node mirrors
    pub property: &'a Property,

    /// Policy of the parent node, if any
    pub parent: Option<&'a ArbitraryProperty>,

    /// Registry the generator may consult
    pub options: &'a GenerateOptions,
}

/// Produces a node's generation policy
pub trait ArbitraryPropertyGenerator: Send + Sync {
    /// Generate the policy for `ctx.property`
    fn generate(&self, ctx: &ArbitraryPropertyGeneratorContext<'_>) -> ArbitraryProperty;
}

impl<F> ArbitraryPropertyGenerator for F
where
    F: Fn(&ArbitraryPropertyGeneratorContext<'_>) -> ArbitraryProperty + Send + Sync,
{
    fn generate(&self, ctx: &ArbitraryPropertyGeneratorContext<'_>) -> ArbitraryProperty {
        self(ctx)
    }
}

/// Builds the policy from the name, null-inject and container chains
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultArbitraryPropertyGenerator;

impl ArbitraryPropertyGenerator for DefaultArbitraryPropertyGenerator {
    fn generate(&self, ctx: &ArbitraryPropertyGeneratorContext<'_>) -> ArbitraryProperty {
        let property = ctx.property;
        let name = ctx.options.property_name_resolver(property).resolve(property);
        let null_inject = ctx.options.null_inject_generator(property).generate(property);
        let container_info = property
            .ty()
            .is_container()
            .then(|| ctx.options.container_info_generator(property).generate(property));

        ArbitraryProperty::new(name, null_inject, container_info)
    }
}

/// Resolves the name segment of a property
pub trait PropertyNameResolver: Send + Sync {
    /// Name used to address `property` in path expressions
    fn resolve(&self, property: &Property) -> String;
}

impl<F> PropertyNameResolver for F
where
    F: Fn(&Property) -> String + Send + Sync,
{
    fn resolve(&self, property: &Property) -> String {
        self(property)
    }
}

/// Field name, `[index]` for elements, `$` for the root
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPropertyNameResolver;

impl PropertyNameResolver for DefaultPropertyNameResolver {
    fn resolve(&self, property: &Property) -> String {
        property.to_string()
    }
}

/// Decides the null-inject probability of a property
pub trait NullInjectGenerator: Send + Sync {
    /// Probability in `[0.0, 1.0]` of sampling absence
    fn generate(&self, property: &Property) -> f64;
}

impl<F> NullInjectGenerator for F
where
    F: Fn(&Property) -> f64 + Send + Sync,
{
    fn generate(&self, property: &Property) -> f64 {
        self(property)
    }
}

/// Never null for the root or non-nullable types, fixed probability otherwise
#[derive(Debug, Clone, Copy)]
pub struct DefaultNullInjectGenerator {
    default_null_inject: f64,
}

impl DefaultNullInjectGenerator {
    /// Create generator with probability for nullable properties
    #[inline]
    #[must_use]
    pub fn new(default_null_inject: f64) -> Self {
        Self {
            default_null_inject,
        }
    }
}

impl Default for DefaultNullInjectGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NULL_INJECT)
    }
}

impl NullInjectGenerator for DefaultNullInjectGenerator {
    fn generate(&self, property: &Property) -> f64 {
        if *property.kind() == PropertyKind::Root || !property.is_nullable() {
            NOT_NULL_INJECT
        } else {
            self.default_null_inject
        }
    }
}

/// Decides container size bounds
pub trait ContainerInfoGenerator: Send + Sync {
    /// Bounds for container `property`
    fn generate(&self, property: &Property) -> ContainerInfo;
}

impl<F> ContainerInfoGenerator for F
where
    F: Fn(&Property) -> ContainerInfo + Send + Sync,
{
    fn generate(&self, property: &Property) -> ContainerInfo {
        self(property)
    }
}

/// Same bounds for every container
#[derive(Debug, Clone, Copy)]
pub struct DefaultContainerInfoGenerator {
    info: ContainerInfo,
}

impl DefaultContainerInfoGenerator {
    /// Create generator returning `info`
    #[inline]
    #[must_use]
    pub fn new(info: ContainerInfo) -> Self {
        Self { info }
    }
}

impl ContainerInfoGenerator for DefaultContainerInfoGenerator {
    fn generate(&self, _property: &Property) -> ContainerInfo {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary_property::ALWAYS_NULL_INJECT;
    use crate::matcher::{AssignableTypeMatcher, PropertyNameMatcher};
    use crate::types::{Describe, FieldDesc, TypeDesc};

    fn children() -> Vec<Property> {
        Property::root(TypeDesc::object(
            "Sample",
            vec![
                FieldDesc::of::<Option<String>>("nickname"),
                FieldDesc::of::<i32>("count"),
                FieldDesc::of::<Vec<i32>>("values"),
            ],
        ))
        .child_properties()
    }

    fn generate(options: &GenerateOptions, property: &Property) -> ArbitraryProperty {
        options.generate_arbitrary_property(property, None)
    }

    #[test]
    fn default_policy_for_fields() {
        let options = GenerateOptions::default();
        let props = children();

        let nickname = generate(&options, &props[0]);
        assert_eq!(nickname.resolved_property_name(), "nickname");
        assert!((nickname.null_inject() - DEFAULT_NULL_INJECT).abs() < f64::EPSILON);
        assert!(!nickname.is_container());

        let count = generate(&options, &props[1]);
        assert!(count.is_not_null());

        let values = generate(&options, &props[2]);
        assert!(values.is_container());
        assert_eq!(values.container_info().map(ContainerInfo::max), Some(3));
    }

    #[test]
    fn root_never_null() {
        let options = GenerateOptions::default();
        let root = Property::root(Option::<i32>::describe());
        assert!(generate(&options, &root).is_not_null());
    }

    #[test]
    fn registered_resolvers_are_consulted() {
        let options = GenerateOptions::builder()
            .insert_first_property_name_resolver(PropertyNameMatcher::new("count"), |p: &Property| {
                format!("x_{p}")
            })
            .insert_first_null_inject_generator(AssignableTypeMatcher::new("i32"), |_: &Property| {
                ALWAYS_NULL_INJECT
            })
            .build();
        let props = children();

        let count = generate(&options, &props[1]);
        assert_eq!(count.resolved_property_name(), "x_count");
        assert!(count.is_forced_null());
        assert_eq!(generate(&options, &props[0]).resolved_property_name(), "nickname");
    }

    fn exact_five(ctx: &ArbitraryPropertyGeneratorContext<'_>) -> ArbitraryProperty {
        ArbitraryProperty::new(ctx.property.to_string(), 0.0, Some(ContainerInfo::exact(5)))
    }

    #[test]
    fn custom_property_generator_replaces_policy() {
        let options = GenerateOptions::builder()
            .insert_first_arbitrary_property_generator(AssignableTypeMatcher::new("Vec<i32>"), exact_five)
            .build();
        let values = generate(&options, &children()[2]);
        assert_eq!(values.container_info().and_then(ContainerInfo::element_count), Some(5));
    }
}
