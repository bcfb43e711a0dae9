//! Testing utilities for fixture workspace
//!
//! Shared sample types and tracing setup.

#![allow(missing_docs)]

use fixture_api::{Describe, FieldDesc, TypeDesc};
use serde::{Deserialize, Serialize};

/// Install a fmt subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];
}

impl Describe for Season {
    fn describe() -> TypeDesc {
        TypeDesc::enumeration("Season", ["Spring", "Summer", "Fall", "Winter"])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeanSample {
    pub name: String,
    pub value: i32,
    pub season: Season,
}

impl Describe for BeanSample {
    fn describe() -> TypeDesc {
        TypeDesc::object(
            "BeanSample",
            vec![
                FieldDesc::of::<String>("name"),
                FieldDesc::of::<i32>("value"),
                FieldDesc::of::<Season>("season"),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub zip_code: Option<String>,
}

impl Describe for Address {
    fn describe() -> TypeDesc {
        TypeDesc::object(
            "Address",
            vec![FieldDesc::of::<String>("street"), FieldDesc::of::<Option<String>>("zip_code")],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: Address,
    pub orders: Vec<Order>,
    pub favorite: Option<Season>,
}

impl Describe for Customer {
    fn describe() -> TypeDesc {
        TypeDesc::object(
            "Customer",
            vec![
                FieldDesc::of::<i64>("id"),
                FieldDesc::of::<String>("name"),
                FieldDesc::of::<Address>("address"),
                FieldDesc::of::<Vec<Order>>("orders"),
                FieldDesc::of::<Option<Season>>("favorite"),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub code: String,
    pub quantities: Vec<u8>,
    pub express: bool,
}

impl Describe for Order {
    fn describe() -> TypeDesc {
        TypeDesc::object(
            "Order",
            vec![
                FieldDesc::of::<String>("code"),
                FieldDesc::of::<Vec<u8>>("quantities"),
                FieldDesc::of::<bool>("express"),
            ],
        )
    }
}

/// Self-referential type; only terminates through the depth limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
    pub parent: Option<Box<TreeNode>>,
}

impl Describe for TreeNode {
    fn describe() -> TypeDesc {
        TypeDesc::lazy_object("TreeNode", || {
            vec![
                FieldDesc::of::<String>("label"),
                FieldDesc::of::<Vec<TreeNode>>("children"),
                FieldDesc::of::<Option<Box<TreeNode>>>("parent"),
            ]
        })
    }
}

pub fn sample_customer() -> Customer {
    Customer {
        id: 42,
        name: "Kim".to_string(),
        address: Address {
            street: "Main St".to_string(),
            zip_code: None,
        },
        orders: vec![
            Order {
                code: "A-1".to_string(),
                quantities: vec![1, 2, 3],
                express: true,
            },
            Order {
                code: "B-2".to_string(),
                quantities: vec![],
                express: false,
            },
        ],
        favorite: Some(Season::Winter),
    }
}
