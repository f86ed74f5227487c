//! Type algebra for reflected Java type references
//!
//! A [`TypeRef`] is the single tagged representation of every kind of type a
//! reflection provider can hand back, erased or generic:
//!
//! ```text
//! Plain(String)                        java.lang.String
//! Array(Plain(int))                    int[]
//! Parameterized(List, [Wildcard])      java.util.List<? extends Number>
//! TypeVariable(T, [Comparable<T>])     T extends Comparable<T>
//! GenericArray(TypeVariable(E))        E[]
//! ```
//!
//! Erased signatures only ever contain `Plain` and `Array`. The generic
//! variants appear in generic signatures, and consumers match exhaustively so
//! a new variant cannot be ignored silently.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a reflected class.
///
/// Two handles are equal iff the reflection provider returned the same class.
/// Ordering follows registration order in the provider, which is stable for
/// a given input but carries no meaning beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    /// Create a handle from a provider-assigned index
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The provider-assigned index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reference to a Java type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A class, interface or primitive
    Plain(ClassId),

    /// An erased array type
    Array(Box<TypeRef>),

    /// A generic class instantiation such as `Map<K, V>`
    Parameterized { raw: ClassId, args: Vec<TypeRef> },

    /// A wildcard argument, `?` or `? extends Bound`
    Wildcard { upper_bounds: Vec<TypeRef> },

    /// A type variable with its declared bounds.
    ///
    /// Self-referential bounds (`T extends Comparable<T>`) are cut at the
    /// inner occurrence, which carries no bounds.
    TypeVariable { name: String, bounds: Vec<TypeRef> },

    /// An array whose component type is generic, such as `T[]`
    GenericArray(Box<TypeRef>),
}

impl TypeRef {
    /// Create an erased array of `element`
    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// The class handle of a plain type
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            TypeRef::Plain(id) => Some(*id),
            _ => None,
        }
    }

    /// Strip every array layer, returning the innermost element type
    pub fn element(&self) -> &TypeRef {
        let mut ty = self;
        while let TypeRef::Array(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Whether this variant may appear in an erased signature
    pub fn is_erased(&self) -> bool {
        match self {
            TypeRef::Plain(_) => true,
            TypeRef::Array(inner) => inner.is_erased(),
            TypeRef::Parameterized { .. }
            | TypeRef::Wildcard { .. }
            | TypeRef::TypeVariable { .. }
            | TypeRef::GenericArray(_) => false,
        }
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            TypeRef::Plain(_) => "plain",
            TypeRef::Array(_) => "array",
            TypeRef::Parameterized { .. } => "parameterized",
            TypeRef::Wildcard { .. } => "wildcard",
            TypeRef::TypeVariable { .. } => "type variable",
            TypeRef::GenericArray(_) => "generic array",
        }
    }
}

impl From<ClassId> for TypeRef {
    fn from(id: ClassId) -> Self {
        TypeRef::Plain(id)
    }
}
