//! Property matchers and priority chains
//!
//! A [`PriorityChain`] is an ordered list of [`MatcherOperator`]s plus one
//! default. Resolution walks the list in registration order and returns the
//! first operator whose matcher accepts the property. Order is the only
//! precedence rule: [`PriorityChain::insert_first`] is how later, more
//! specific configuration overrides earlier defaults.

use crate::property::Property;
use std::fmt;
use std::sync::Arc;

/// Predicate over properties
pub trait Matcher: Send + Sync {
    /// Check if `property` is accepted
    fn matches(&self, property: &Property) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&Property) -> bool + Send + Sync,
{
    #[inline]
    fn matches(&self, property: &Property) -> bool {
        self(property)
    }
}

/// Matches properties whose declared type has the given name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignableTypeMatcher {
    type_name: String,
}

impl AssignableTypeMatcher {
    /// Create matcher for `type_name`
    #[inline]
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl Matcher for AssignableTypeMatcher {
    fn matches(&self, property: &Property) -> bool {
        property.ty().name() == self.type_name
    }
}

/// Matches fields with the given declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNameMatcher {
    name: String,
}

impl PropertyNameMatcher {
    /// Create matcher for field `name`
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Matcher for PropertyNameMatcher {
    fn matches(&self, property: &Property) -> bool {
        property.name() == Some(self.name.as_str())
    }
}

/// Matches every property
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyMatcher;

impl Matcher for AnyMatcher {
    #[inline]
    fn matches(&self, _property: &Property) -> bool {
        true
    }
}

/// Predicate paired with the policy it selects
pub struct MatcherOperator<T> {
    matcher: Arc<dyn Matcher>,
    operator: T,
}

impl<T> MatcherOperator<T> {
    /// Pair `matcher` with `operator`
    #[inline]
    #[must_use]
    pub fn new(matcher: impl Matcher + 'static, operator: T) -> Self {
        Self {
            matcher: Arc::new(matcher),
            operator,
        }
    }

    /// Select `operator` for properties of type `type_name`
    #[inline]
    #[must_use]
    pub fn assignable_type(type_name: impl Into<String>, operator: T) -> Self {
        Self::new(AssignableTypeMatcher::new(type_name), operator)
    }

    /// Select `operator` for fields named `name`
    #[inline]
    #[must_use]
    pub fn property_name(name: impl Into<String>, operator: T) -> Self {
        Self::new(PropertyNameMatcher::new(name), operator)
    }

    /// Select `operator` for every property
    #[inline]
    #[must_use]
    pub fn any(operator: T) -> Self {
        Self::new(AnyMatcher, operator)
    }

    /// Check if this pair applies to `property`
    #[inline]
    #[must_use]
    pub fn matches(&self, property: &Property) -> bool {
        self.matcher.matches(property)
    }

    /// The selected policy
    #[inline]
    #[must_use]
    pub fn operator(&self) -> &T {
        &self.operator
    }
}

impl<T: Clone> Clone for MatcherOperator<T> {
    fn clone(&self) -> Self {
        Self {
            matcher: Arc::clone(&self.matcher),
            operator: self.operator.clone(),
        }
    }
}

impl<T> fmt::Debug for MatcherOperator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherOperator").finish_non_exhaustive()
    }
}

/// Ordered matcher list with a default
pub struct PriorityChain<T> {
    operators: Vec<MatcherOperator<T>>,
    default: T,
}

impl<T> PriorityChain<T> {
    /// Empty chain resolving everything to `default`
    #[inline]
    #[must_use]
    pub fn new(default: T) -> Self {
        Self {
            operators: Vec::new(),
            default,
        }
    }

    /// Chain with initial operators
    #[inline]
    #[must_use]
    pub fn with_operators(operators: Vec<MatcherOperator<T>>, default: T) -> Self {
        Self { operators, default }
    }

    /// First matching policy, or the default
    #[inline]
    #[must_use]
    pub fn resolve(&self, property: &Property) -> &T {
        self.find(property).unwrap_or(&self.default)
    }

    /// First matching policy, ignoring the default
    #[must_use]
    pub fn find(&self, property: &Property) -> Option<&T> {
        self.operators
            .iter()
            .find(|op| op.matches(property))
            .map(MatcherOperator::operator)
    }

    /// Put `operator` ahead of every registered operator
    pub fn insert_first(&mut self, operator: MatcherOperator<T>) {
        self.operators.insert(0, operator);
    }

    /// Put `operator` behind every registered operator
    #[inline]
    pub fn push(&mut self, operator: MatcherOperator<T>) {
        self.operators.push(operator);
    }

    /// Replace the whole operator list
    #[inline]
    pub fn replace(&mut self, operators: Vec<MatcherOperator<T>>) {
        self.operators = operators;
    }

    /// Replace the default
    #[inline]
    pub fn set_default(&mut self, default: T) {
        self.default = default;
    }

    /// Registered operators in priority order
    #[inline]
    #[must_use]
    pub fn operators(&self) -> &[MatcherOperator<T>] {
        &self.operators
    }

    /// The fallback policy
    #[inline]
    #[must_use]
    pub fn default_operator(&self) -> &T {
        &self.default
    }

    /// Number of registered operators
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Check if no operators are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl<T: Clone> Clone for PriorityChain<T> {
    fn clone(&self) -> Self {
        Self {
            operators: self.operators.clone(),
            default: self.default.clone(),
        }
    }
}

impl<T> fmt::Debug for PriorityChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityChain")
            .field("operators", &self.operators.len())
            .finish_non_exhaustive()
    }
}
