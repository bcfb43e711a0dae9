//! Leaf value generation
//!
//! Provides [`GenContext`] (seeded randomness), the [`ArbitraryGenerator`]
//! trait for sampling leaf values and the [`FixtureCustomizer`] hook that
//! post-processes assembled values.

use crate::arbitrary_property::ALWAYS_NULL_INJECT;
use crate::error::{FixtureError, Result};
use crate::property::Property;
use crate::types::{LeafKind, TypeKind};
use crate::value::Value;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomness for one generation pass
///
/// Two contexts created with the same seed produce the same samples.
#[derive(Debug, Clone)]
pub struct GenContext {
    rng: StdRng,
    seed: u64,
}

impl GenContext {
    /// Create context from `seed`
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create context from a random seed
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed = rand::random::<u64>();
        tracing::debug!("Generation seed: {}", seed);
        Self::new(seed)
    }

    /// Seed this context was created from
    #[inline]
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample `true` with probability `p`
    pub fn gen_bool(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            false
        } else if p >= ALWAYS_NULL_INJECT {
            true
        } else {
            self.rng.gen_bool(p)
        }
    }

    /// Integer in `min..=max`
    pub fn gen_i64(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    /// Unsigned integer in `min..=max`
    pub fn gen_u64(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    /// Container size in `min..=max`
    pub fn gen_size(&mut self, min: usize, max: usize) -> usize {
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    /// Float in `min..max`
    pub fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Index in `0..len`; `len` must be non-zero
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }

    /// Alphanumeric string of up to `max_len` characters
    pub fn gen_string(&mut self, max_len: usize) -> String {
        let len = self.rng.gen_range(0..=max_len);
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    /// Underlying generator
    #[inline]
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Samples values for leaf properties
pub trait ArbitraryGenerator: Send + Sync {
    /// Sample a value for `property`
    ///
    /// # Errors
    /// Returns `UnsupportedShape` when the property cannot be sampled
    fn generate(&self, property: &Property, ctx: &mut GenContext) -> Result<Value>;
}

impl<F> ArbitraryGenerator for F
where
    F: Fn(&Property, &mut GenContext) -> Result<Value> + Send + Sync,
{
    fn generate(&self, property: &Property, ctx: &mut GenContext) -> Result<Value> {
        self(property, ctx)
    }
}

/// Samples scalars by [`LeafKind`] and enums by variant
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultArbitraryGenerator;

impl ArbitraryGenerator for DefaultArbitraryGenerator {
    fn generate(&self, property: &Property, ctx: &mut GenContext) -> Result<Value> {
        match property.ty().kind() {
            TypeKind::Leaf(LeafKind::Bool) => Ok(Value::Bool(ctx.gen_bool(0.5))),
            TypeKind::Leaf(LeafKind::Int { min, max }) => Ok(Value::Int(ctx.gen_i64(*min, *max))),
            TypeKind::Leaf(LeafKind::UInt { min, max }) => Ok(Value::from(ctx.gen_u64(*min, *max))),
            TypeKind::Leaf(LeafKind::Float { min, max }) => Ok(Value::Float(ctx.gen_f64(*min, *max))),
            TypeKind::Leaf(LeafKind::Str { max_len }) => Ok(Value::Str(ctx.gen_string(*max_len))),
            TypeKind::Leaf(LeafKind::Char) => {
                let c = char::from(ctx.rng_mut().sample(Alphanumeric));
                Ok(Value::from(c))
            }
            TypeKind::Enum(variants) if !variants.is_empty() => {
                let index = ctx.gen_index(variants.len());
                Ok(Value::Str(variants[index].clone()))
            }
            _ => Err(FixtureError::UnsupportedShape(format!(
                "no arbitrary generator for type {}",
                property.ty()
            ))),
        }
    }
}

/// Always yields the same value
#[derive(Debug, Clone, PartialEq)]
pub struct JustArbitraryGenerator {
    value: Value,
}

impl JustArbitraryGenerator {
    /// Create generator for `value`
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl ArbitraryGenerator for JustArbitraryGenerator {
    fn generate(&self, _property: &Property, _ctx: &mut GenContext) -> Result<Value> {
        Ok(self.value.clone())
    }
}

/// Picks uniformly from a fixed set of values
#[derive(Debug, Clone, PartialEq)]
pub struct EnumArbitraryGenerator {
    elements: Vec<Value>,
}

impl EnumArbitraryGenerator {
    /// Create generator choosing from `elements`
    #[must_use]
    pub fn new<V: Into<Value>>(elements: impl IntoIterator<Item = V>) -> Self {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }
}

impl ArbitraryGenerator for EnumArbitraryGenerator {
    fn generate(&self, property: &Property, ctx: &mut GenContext) -> Result<Value> {
        if self.elements.is_empty() {
            return Err(FixtureError::UnsupportedShape(format!(
                "no elements to choose from for {property}"
            )));
        }
        let index = ctx.gen_index(self.elements.len());
        Ok(self.elements[index].clone())
    }
}

/// Rewrites an assembled value before it is returned
pub trait FixtureCustomizer: Send + Sync {
    /// Adjust `value`, sampled for `property`, in place
    fn customize(&self, property: &Property, value: &mut Value);
}

impl<F> FixtureCustomizer for F
where
    F: Fn(&Property, &mut Value) + Send + Sync,
{
    fn customize(&self, property: &Property, value: &mut Value) {
        self(property, value);
    }
}

/// Leaves values untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCustomizer;

impl FixtureCustomizer for NoopCustomizer {
    fn customize(&self, _property: &Property, _value: &mut Value) {}
}
