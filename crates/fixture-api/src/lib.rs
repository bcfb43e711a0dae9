//! Fixture API - property model and generation policies
//!
//! The contracts shared by the generation engine and its callers:
//! - Type descriptors ([`TypeDesc`], [`Describe`]) and dynamic [`Value`]s
//! - The [`Property`] model mirrored by generation nodes
//! - Matchers and [`PriorityChain`]s that select policies per property
//! - Node policy ([`ArbitraryProperty`]) and the generators that produce it
//! - The [`GenerateOptions`] registry, its builder and [`Plugin`]s
//! - Leaf value generation ([`GenContext`], [`ArbitraryGenerator`])
//! - Container decomposition and [`FixtureConfig`]
//!
//! # Example
//!
//! ```
//! use fixture_api::prelude::*;
//!
//! let options = GenerateOptions::default();
//! let property = Property::root(Vec::<String>::describe());
//! let policy = options.generate_arbitrary_property(&property, None);
//!
//! assert!(policy.is_container());
//! assert!(policy.is_not_null());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod arbitrary;
pub mod arbitrary_property;
pub mod config;
pub mod decompose;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod options;
pub mod property;
pub mod types;
pub mod value;

pub use arbitrary::{
    ArbitraryGenerator, DefaultArbitraryGenerator, EnumArbitraryGenerator, FixtureCustomizer,
    GenContext, JustArbitraryGenerator, NoopCustomizer,
};
pub use arbitrary_property::{
    ArbitraryProperty, ContainerInfo, ALWAYS_NULL_INJECT, DEFAULT_NULL_INJECT, NOT_NULL_INJECT,
};
pub use config::{FixtureConfig, DEFAULT_CONTAINER_MAX_SIZE, DEFAULT_MAX_DEPTH};
pub use decompose::{
    DecomposedContainerValue, DecomposedContainerValueFactory, DefaultDecomposedContainerValueFactory,
};
pub use error::{FixtureError, Result};
pub use generator::{
    ArbitraryPropertyGenerator, ArbitraryPropertyGeneratorContext, ContainerInfoGenerator,
    DefaultArbitraryPropertyGenerator, DefaultContainerInfoGenerator, DefaultNullInjectGenerator,
    DefaultPropertyNameResolver, NullInjectGenerator, PropertyNameResolver,
};
pub use matcher::{AnyMatcher, AssignableTypeMatcher, Matcher, MatcherOperator, PriorityChain, PropertyNameMatcher};
pub use options::{GenerateOptions, GenerateOptionsBuilder, Plugin};
pub use property::{Property, PropertyKind};
pub use types::{Describe, FieldDesc, Fields, LeafKind, TypeDesc, TypeKind};
pub use value::Value;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for describing types and registering policies
    pub use crate::{
        AnyMatcher, ArbitraryGenerator, ArbitraryProperty, AssignableTypeMatcher, ContainerInfo,
        Describe, FieldDesc, FixtureConfig, FixtureError, GenContext, GenerateOptions,
        GenerateOptionsBuilder, JustArbitraryGenerator, MatcherOperator, Plugin, Property,
        PropertyNameMatcher, TypeDesc, Value, ALWAYS_NULL_INJECT, NOT_NULL_INJECT,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
