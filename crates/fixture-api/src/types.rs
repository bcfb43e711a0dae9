//! Type descriptors
//!
//! Provides [`TypeDesc`], the structural description of a type that the
//! generation tree mirrors, and [`Describe`] for registering Rust types.
//!
//! Descriptions are registered explicitly: primitives, `String`, `char`,
//! `Vec<T>`, `Option<T>` and `Box<T>` are covered here, user types implement
//! [`Describe`] by listing their fields.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Scalar shape of a leaf type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeafKind {
    /// `true` / `false`
    Bool,

    /// Integer within inclusive bounds
    Int {
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },

    /// Unsigned integer within inclusive bounds
    UInt {
        /// Lower bound
        min: u64,
        /// Upper bound
        max: u64,
    },

    /// Floating point within bounds
    Float {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// String of at most `max_len` characters
    Str {
        /// Maximum generated length
        max_len: usize,
    },

    /// Single character
    Char,
}

/// Field list of an object type
///
/// `Lazy` lets self-referential types describe themselves without building
/// an infinite descriptor; the traverser bounds the recursion.
#[derive(Debug, Clone)]
pub enum Fields {
    /// Fields known up front
    Eager(Arc<[FieldDesc]>),

    /// Fields produced on demand
    Lazy(fn() -> Vec<FieldDesc>),
}

impl Fields {
    /// Materialize the field list
    #[must_use]
    pub fn resolve(&self) -> Vec<FieldDesc> {
        match self {
            Self::Eager(fields) => fields.to_vec(),
            Self::Lazy(fields) => fields(),
        }
    }
}

/// Structural kind of a type
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Scalar value
    Leaf(LeafKind),

    /// One of a fixed set of unit variants
    Enum(Arc<[String]>),

    /// Named fields
    Object(Fields),

    /// Ordered, homogeneous collection
    List(Box<TypeDesc>),

    /// Type with no known structure
    Opaque,
}

/// Declared field of an object type
#[derive(Debug, Clone)]
pub struct FieldDesc {
    /// Field name
    pub name: String,

    /// Field type
    pub ty: TypeDesc,
}

impl FieldDesc {
    /// Create field descriptor
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Create field descriptor from a described Rust type
    #[inline]
    #[must_use]
    pub fn of<T: Describe>(name: impl Into<String>) -> Self {
        Self::new(name, T::describe())
    }
}

/// Structural description of a type
#[derive(Debug, Clone)]
pub struct TypeDesc {
    name: String,
    kind: TypeKind,
    nullable: bool,
}

impl TypeDesc {
    /// Create descriptor from parts
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }

    /// Leaf type
    #[inline]
    #[must_use]
    pub fn leaf(name: impl Into<String>, kind: LeafKind) -> Self {
        Self::new(name, TypeKind::Leaf(kind))
    }

    /// Enum type with unit variants
    #[must_use]
    pub fn enumeration<S: Into<String>>(name: impl Into<String>, variants: impl IntoIterator<Item = S>) -> Self {
        let variants: Vec<String> = variants.into_iter().map(Into::into).collect();
        Self::new(name, TypeKind::Enum(variants.into()))
    }

    /// Object type with a fixed field list
    #[inline]
    #[must_use]
    pub fn object(name: impl Into<String>, fields: Vec<FieldDesc>) -> Self {
        Self::new(name, TypeKind::Object(Fields::Eager(fields.into())))
    }

    /// Object type whose fields are produced on demand
    #[inline]
    #[must_use]
    pub fn lazy_object(name: impl Into<String>, fields: fn() -> Vec<FieldDesc>) -> Self {
        Self::new(name, TypeKind::Object(Fields::Lazy(fields)))
    }

    /// List of `element`
    #[inline]
    #[must_use]
    pub fn list(element: TypeDesc) -> Self {
        let name = format!("Vec<{}>", element.name);
        Self::new(name, TypeKind::List(Box::new(element)))
    }

    /// Type without structure
    #[inline]
    #[must_use]
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Opaque)
    }

    /// Mark as nullable
    #[inline]
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Structural kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Whether absence is a valid value
    #[inline]
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether the type is a collection
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.kind, TypeKind::List(_))
    }

    /// Whether the type is sampled directly (scalar or enum)
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, TypeKind::Leaf(_) | TypeKind::Enum(_))
    }

    /// Declared fields, for object types
    #[must_use]
    pub fn fields(&self) -> Option<Vec<FieldDesc>> {
        match &self.kind {
            TypeKind::Object(fields) => Some(fields.resolve()),
            _ => None,
        }
    }

    /// Element type, for containers
    #[inline]
    #[must_use]
    pub fn element(&self) -> Option<&TypeDesc> {
        match &self.kind {
            TypeKind::List(element) => Some(&**element),
            _ => None,
        }
    }
}

impl Display for TypeDesc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Types that can describe their own structure
///
/// # Example
///
/// ```rust
/// use fixture_api::{Describe, FieldDesc, TypeDesc};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Describe for Point {
///     fn describe() -> TypeDesc {
///         TypeDesc::object("Point", vec![FieldDesc::of::<i32>("x"), FieldDesc::of::<i32>("y")])
///     }
/// }
///
/// assert_eq!(Point::describe().fields().map(|f| f.len()), Some(2));
/// ```
pub trait Describe {
    /// Structural description of `Self`
    fn describe() -> TypeDesc;
}

macro_rules! describe_int {
    ($($ty:ty),*) => {
        $(
            impl Describe for $ty {
                #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
                fn describe() -> TypeDesc {
                    TypeDesc::leaf(
                        stringify!($ty),
                        LeafKind::Int { min: <$ty>::MIN as i64, max: <$ty>::MAX as i64 },
                    )
                }
            }
        )*
    };
}

macro_rules! describe_uint {
    ($($ty:ty),*) => {
        $(
            impl Describe for $ty {
                #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
                fn describe() -> TypeDesc {
                    TypeDesc::leaf(
                        stringify!($ty),
                        LeafKind::UInt { min: 0, max: <$ty>::MAX as u64 },
                    )
                }
            }
        )*
    };
}

describe_int!(i8, i16, i32, i64, isize);
describe_uint!(u8, u16, u32, u64, usize);

impl Describe for bool {
    fn describe() -> TypeDesc {
        TypeDesc::leaf("bool", LeafKind::Bool)
    }
}

impl Describe for f32 {
    fn describe() -> TypeDesc {
        TypeDesc::leaf("f32", LeafKind::Float { min: -1.0e6, max: 1.0e6 })
    }
}

impl Describe for f64 {
    fn describe() -> TypeDesc {
        TypeDesc::leaf("f64", LeafKind::Float { min: -1.0e9, max: 1.0e9 })
    }
}

impl Describe for char {
    fn describe() -> TypeDesc {
        TypeDesc::leaf("char", LeafKind::Char)
    }
}

impl Describe for String {
    fn describe() -> TypeDesc {
        TypeDesc::leaf("String", LeafKind::Str { max_len: 16 })
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDesc {
        TypeDesc::list(T::describe())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDesc {
        T::describe().nullable()
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDesc {
        T::describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tree {
        _children: Vec<Tree>,
    }

    impl Describe for Tree {
        fn describe() -> TypeDesc {
            TypeDesc::lazy_object("Tree", || vec![FieldDesc::of::<Vec<Tree>>("children")])
        }
    }

    #[test]
    fn primitive_bounds() {
        match u8::describe().kind() {
            TypeKind::Leaf(LeafKind::UInt { min, max }) => {
                assert_eq!(*min, 0);
                assert_eq!(*max, 255);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        match u64::describe().kind() {
            TypeKind::Leaf(LeafKind::UInt { max, .. }) => assert_eq!(*max, u64::MAX),
            other => panic!("unexpected kind {other:?}"),
        }
        match i16::describe().kind() {
            TypeKind::Leaf(LeafKind::Int { min, max }) => {
                assert_eq!(*min, -32768);
                assert_eq!(*max, 32767);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn option_is_nullable_inner() {
        let desc = Option::<String>::describe();
        assert!(desc.is_nullable());
        assert_eq!(desc.name(), "String");
        assert_eq!(desc.to_string(), "Option<String>");
    }

    #[test]
    fn list_names_element() {
        let desc = Vec::<i32>::describe();
        assert!(desc.is_container());
        assert_eq!(desc.name(), "Vec<i32>");
        assert_eq!(desc.element().map(TypeDesc::name), Some("i32"));
    }

    #[test]
    fn self_referential_type_describes_lazily() {
        let desc = Tree::describe();
        let fields = desc.fields().unwrap();
        assert_eq!(fields.len(), 1);
        let nested = fields[0].ty.element().unwrap();
        assert_eq!(nested.name(), "Tree");
        assert_eq!(nested.fields().unwrap().len(), 1);
    }

    #[test]
    fn enum_is_leaf() {
        let desc = TypeDesc::enumeration("Season", ["Spring", "Summer"]);
        assert!(desc.is_leaf());
        assert!(!desc.is_container());
        assert!(desc.fields().is_none());
    }
}
