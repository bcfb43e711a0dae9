//! Fixture Core - generation tree engine
//!
//! Builds a tree of generation nodes mirroring a type, lets callers rewrite
//! parts of it through path expressions, and samples it into a value:
//! - [`ArbitraryTraverser`] materializes the [`ArbitraryTree`] for a property
//! - [`NodeResolver`]s and [`ArbitraryExpression`]s select nodes
//! - [`NodeManipulator`]s fix values, resize containers and force nullity
//! - [`TreeSampler`] assembles the final [`Value`](fixture_api::Value)
//! - [`FixtureMonkey`] and [`ArbitraryBuilder`] tie it together
//!
//! # Example
//!
//! ```
//! use fixture_core::prelude::*;
//!
//! let fixture = FixtureMonkey::builder().seed(42).build();
//! let values: Vec<i32> = fixture.giving::<Vec<i32>>().size("$", 3, 3).sample()?;
//! assert_eq!(values.len(), 3);
//! # Ok::<(), FixtureError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod expression;
pub mod manipulate_options;
pub mod manipulator;
pub mod monkey;
pub mod node;
pub mod resolver;
pub mod sampler;
pub mod traverser;
pub mod tree;

pub use expression::{ArbitraryExpression, Segment};
pub use manipulate_options::{ManipulateOptions, ManipulateOptionsBuilder};
pub use manipulator::{
    ArbitraryManipulator, NodeManipulator, NodeNullityManipulator, NodeSetDecomposedValueManipulator,
    NodeSizeManipulator,
};
pub use monkey::{ArbitraryBuilder, FixtureMonkey, FixtureMonkeyBuilder};
pub use node::{ArbitraryNode, NodeId, Producer};
pub use resolver::{IdentityNodeResolver, NodeResolver, PropertyNameNodeResolver, RootNodeResolver, WILDCARD};
pub use sampler::{ArbitraryAssembler, TreeSampler};
pub use traverser::ArbitraryTraverser;
pub use tree::ArbitraryTree;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for generating fixtures
    pub use crate::{
        ArbitraryBuilder, ArbitraryExpression, ArbitraryTree, FixtureMonkey, ManipulateOptions, NodeId,
        Producer,
    };
    pub use fixture_api::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
