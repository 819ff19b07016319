//! Field type definitions.
//!
//! A field type is a primitive, a container over other types, a reference to
//! a user declaration or the untyped `annotation` reference.

use std::fmt;

/// Index of a declaration inside its owning [`Schema`](crate::Schema).
///
/// This is a non-owning link; resolving it requires the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl DeclId {
    /// Creates an id from a declaration index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the declaration index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Primitive value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    /// Boolean.
    Bool,
    /// UTF-8 string. Spelled like a type name, but always a value.
    String,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// Variable-length encoded 64-bit integer.
    V64,
    /// Single-precision float.
    F32,
    /// Double-precision float.
    F64,
}

impl PrimitiveKind {
    /// Number of primitive kinds.
    pub const COUNT: usize = 9;

    /// All primitive kinds, ordered by [`index`](Self::index).
    pub const ALL: [Self; Self::COUNT] = [
        Self::Bool,
        Self::String,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::V64,
        Self::F32,
        Self::F64,
    ];

    /// Returns the position of this kind in per-target spelling tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the schema spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::V64 => "v64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Parses a primitive from its schema spelling, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a container type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerShape {
    /// Ordered sequence.
    List,
    /// Unordered collection of distinct elements.
    Set,
    /// Associative container.
    Map,
    /// Variable-length array (`T[]`).
    VarArray,
    /// Fixed-length array (`T[n]`).
    FixedArray,
}

/// Container type with its element types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    /// `list<T>`
    List(Box<Type>),
    /// `set<T>`
    Set(Box<Type>),
    /// `map<K, V>`
    Map(Box<Type>, Box<Type>),
    /// `T[]`
    VarArray(Box<Type>),
    /// `T[n]`
    FixedArray(Box<Type>, usize),
}

impl Container {
    /// Returns the shape of the container.
    #[must_use]
    pub const fn shape(&self) -> ContainerShape {
        match self {
            Self::List(_) => ContainerShape::List,
            Self::Set(_) => ContainerShape::Set,
            Self::Map(_, _) => ContainerShape::Map,
            Self::VarArray(_) => ContainerShape::VarArray,
            Self::FixedArray(_, _) => ContainerShape::FixedArray,
        }
    }

    /// Returns the element types in order (key before value for maps).
    #[must_use]
    pub fn element_types(&self) -> Vec<&Type> {
        match self {
            Self::List(elem) | Self::Set(elem) | Self::VarArray(elem) => vec![elem.as_ref()],
            Self::FixedArray(elem, _) => vec![elem.as_ref()],
            Self::Map(key, value) => vec![key.as_ref(), value.as_ref()],
        }
    }
}

/// Type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive value type.
    Primitive(PrimitiveKind),
    /// Container type.
    Container(Container),
    /// Reference to an instance of a user declaration.
    Reference(DeclId),
    /// Untyped reference to an instance of any declaration.
    Annotation,
}

impl Type {
    /// Creates a `list<T>` type.
    #[must_use]
    pub fn list(elem: Type) -> Self {
        Self::Container(Container::List(Box::new(elem)))
    }

    /// Creates a `set<T>` type.
    #[must_use]
    pub fn set(elem: Type) -> Self {
        Self::Container(Container::Set(Box::new(elem)))
    }

    /// Creates a `map<K, V>` type.
    #[must_use]
    pub fn map(key: Type, value: Type) -> Self {
        Self::Container(Container::Map(Box::new(key), Box::new(value)))
    }

    /// Creates a `T[]` type.
    #[must_use]
    pub fn var_array(elem: Type) -> Self {
        Self::Container(Container::VarArray(Box::new(elem)))
    }

    /// Creates a `T[n]` type.
    #[must_use]
    pub fn fixed_array(elem: Type, length: usize) -> Self {
        Self::Container(Container::FixedArray(Box::new(elem), length))
    }

    /// Returns true for followable references (`Reference` and `Annotation`).
    ///
    /// `string` is a primitive and never counts as a reference.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_) | Self::Annotation)
    }

    /// Returns the length of a top-level fixed-length array.
    #[must_use]
    pub fn fixed_length(&self) -> Option<usize> {
        match self {
            Self::Container(Container::FixedArray(_, length)) => Some(*length),
            _ => None,
        }
    }

    /// Returns the largest length of fixed-length arrays stored inline.
    ///
    /// Only arrays nested directly in arrays count; elements of lists,
    /// sets, maps and variable-length arrays live on the heap.
    #[must_use]
    pub fn inline_array_length(&self) -> Option<usize> {
        match self {
            Self::Container(Container::FixedArray(elem, length)) => Some(
                elem.inline_array_length()
                    .map_or(*length, |inner| inner.max(*length)),
            ),
            _ => None,
        }
    }

    /// Appends every declaration referenced anywhere in this type.
    pub fn collect_references(&self, out: &mut Vec<DeclId>) {
        match self {
            Self::Reference(id) => out.push(*id),
            Self::Container(container) => {
                for elem in container.element_types() {
                    elem.collect_references(out);
                }
            }
            Self::Primitive(_) | Self::Annotation => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_from_name() {
        assert_eq!(PrimitiveKind::from_name("i32"), Some(PrimitiveKind::I32));
        assert_eq!(PrimitiveKind::from_name("V64"), Some(PrimitiveKind::V64));
        assert_eq!(PrimitiveKind::from_name("String"), Some(PrimitiveKind::String));
        assert_eq!(PrimitiveKind::from_name("i33"), None);
    }

    #[test]
    fn test_primitive_indices_match_all() {
        for (index, kind) in PrimitiveKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), index);
        }
    }

    #[test]
    fn test_string_is_not_a_reference() {
        assert!(!Type::Primitive(PrimitiveKind::String).is_reference());
        assert!(Type::Reference(DeclId::new(0)).is_reference());
        assert!(Type::Annotation.is_reference());
        assert!(!Type::list(Type::Reference(DeclId::new(0))).is_reference());
    }

    #[test]
    fn test_container_shapes() {
        let map = Type::map(Type::Primitive(PrimitiveKind::String), Type::Annotation);
        let Type::Container(container) = &map else {
            panic!("expected container");
        };
        assert_eq!(container.shape(), ContainerShape::Map);
        assert_eq!(container.element_types().len(), 2);
    }

    #[test]
    fn test_collect_references() {
        let ty = Type::map(
            Type::Reference(DeclId::new(2)),
            Type::list(Type::Reference(DeclId::new(5))),
        );
        let mut refs = Vec::new();
        ty.collect_references(&mut refs);
        assert_eq!(refs, [DeclId::new(2), DeclId::new(5)]);
    }

    #[test]
    fn test_fixed_length() {
        let ty = Type::fixed_array(Type::Primitive(PrimitiveKind::I8), 4);
        assert_eq!(ty.fixed_length(), Some(4));
        assert_eq!(Type::Primitive(PrimitiveKind::I8).fixed_length(), None);
    }

    #[test]
    fn test_inline_array_length() {
        let byte = Type::Primitive(PrimitiveKind::I8);
        assert_eq!(Type::fixed_array(byte.clone(), 8).inline_array_length(), Some(8));
        let nested = Type::fixed_array(Type::fixed_array(byte.clone(), 40), 2);
        assert_eq!(nested.inline_array_length(), Some(40));
        let boxed = Type::list(Type::fixed_array(byte.clone(), 64));
        assert_eq!(boxed.inline_array_length(), None);
        assert_eq!(byte.inline_array_length(), None);
    }
}
