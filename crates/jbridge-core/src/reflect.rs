//! Reflection provider contract
//!
//! The generator never inspects a JVM itself. It asks a [`ReflectionProvider`]
//! for class handles and reads the [`ClassInfo`] snapshot behind each handle:
//! name, modifiers, supertypes, declared members with both their erased and
//! generic signatures.

use crate::error::BridgeResult;
use crate::types::{ClassId, TypeRef};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

bitflags::bitflags! {
    /// Java access and property modifiers, with the JVM's bit values.
    ///
    /// Serializes as the flag names joined by `|`, e.g. `"PUBLIC | STATIC"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
    }
}

impl Modifiers {
    pub fn is_public(self) -> bool {
        self.contains(Modifiers::PUBLIC)
    }

    pub fn is_protected(self) -> bool {
        self.contains(Modifiers::PROTECTED)
    }

    pub fn is_private(self) -> bool {
        self.contains(Modifiers::PRIVATE)
    }

    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(Modifiers::FINAL)
    }

    pub fn is_native(self) -> bool {
        self.contains(Modifiers::NATIVE)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Modifiers::ABSTRACT)
    }
}

/// The nine Java primitive types, `void` included.
///
/// Every name derived from a primitive (JNI descriptor, accessor suffix,
/// native alias) comes from this fixed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::Void,
    ];

    /// Look up a primitive by its Java source name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Java source name (`int`)
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    /// JNI descriptor character (`I`)
    pub fn descriptor(self) -> char {
        match self {
            Primitive::Boolean => 'Z',
            Primitive::Byte => 'B',
            Primitive::Char => 'C',
            Primitive::Short => 'S',
            Primitive::Int => 'I',
            Primitive::Long => 'J',
            Primitive::Float => 'F',
            Primitive::Double => 'D',
            Primitive::Void => 'V',
        }
    }

    /// Suffix of the JNI accessor family (`callIntMethod`, `getStaticIntField`)
    pub fn accessor_suffix(self) -> &'static str {
        match self {
            Primitive::Boolean => "Boolean",
            Primitive::Byte => "Byte",
            Primitive::Char => "Char",
            Primitive::Short => "Short",
            Primitive::Int => "Int",
            Primitive::Long => "Long",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
            Primitive::Void => "Void",
        }
    }

    /// Fixed-width native alias (`jint`), `void` for void
    pub fn native_type(self) -> &'static str {
        match self {
            Primitive::Boolean => "jboolean",
            Primitive::Byte => "jbyte",
            Primitive::Char => "jchar",
            Primitive::Short => "jshort",
            Primitive::Int => "jint",
            Primitive::Long => "jlong",
            Primitive::Float => "jfloat",
            Primitive::Double => "jdouble",
            Primitive::Void => "void",
        }
    }
}

/// What kind of class a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Primitive(Primitive),
}

/// A declared constructor
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub declaring_class: ClassId,
    pub modifiers: Modifiers,
    pub parameter_types: Vec<TypeRef>,
    pub generic_parameter_types: Vec<TypeRef>,
    pub exception_types: Vec<TypeRef>,
    pub generic_exception_types: Vec<TypeRef>,
}

/// A declared method
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub declaring_class: ClassId,
    pub modifiers: Modifiers,
    /// Compiler-generated (bridge methods and the like)
    pub synthetic: bool,
    pub parameter_types: Vec<TypeRef>,
    pub generic_parameter_types: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub generic_return_type: TypeRef,
    pub exception_types: Vec<TypeRef>,
    pub generic_exception_types: Vec<TypeRef>,
}

/// A declared field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub declaring_class: ClassId,
    pub modifiers: Modifiers,
    pub field_type: TypeRef,
    pub generic_type: TypeRef,
}

/// Snapshot of everything the generator reads about one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    /// Binary name, dotted, with `$` separating nested classes
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub superclass: Option<ClassId>,
    pub generic_superclass: Option<TypeRef>,
    pub interfaces: Vec<ClassId>,
    pub generic_interfaces: Vec<TypeRef>,
    /// Declared type parameters, as `TypeVariable` references
    pub type_parameters: Vec<TypeRef>,
    /// Enclosing class of a nested class
    pub declaring_class: Option<ClassId>,
    pub constructors: Vec<Constructor>,
    pub methods: Vec<Method>,
    pub fields: Vec<Field>,
}

impl ClassInfo {
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface)
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self.kind {
            ClassKind::Primitive(p) => Some(p),
            ClassKind::Class | ClassKind::Interface => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive().is_some()
    }

    /// Package part of the name, empty for the default package
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
    }

    /// Last dotted segment of the name (nested classes keep their `$`)
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// A non-static nested class, whose constructors take the outer instance
    pub fn is_inner(&self) -> bool {
        self.declaring_class.is_some() && !self.modifiers.is_static()
    }
}

/// Source of class metadata for one generation run.
pub trait ReflectionProvider {
    /// Resolve a fully-qualified class name, dotted or slashed
    fn find_class(&self, name: &str) -> BridgeResult<ClassId>;

    /// Metadata behind a handle returned by this provider
    fn class(&self, id: ClassId) -> &ClassInfo;

    /// Binary name of a class
    fn name(&self, id: ClassId) -> &str {
        &self.class(id).name
    }

    /// Short stable hash of a JNI signature, used to tell overloads apart
    fn signature_hash(&self, signature: &str) -> String {
        signature_hash(signature)
    }

    /// Java source spelling of a type reference, for diagnostics
    fn describe(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Plain(id) => self.name(*id).to_string(),
            TypeRef::Array(element) | TypeRef::GenericArray(element) => {
                format!("{}[]", self.describe(element))
            }
            TypeRef::Parameterized { raw, args } => {
                let args: Vec<String> = args.iter().map(|a| self.describe(a)).collect();
                format!("{}<{}>", self.name(*raw), args.join(", "))
            }
            TypeRef::Wildcard { upper_bounds } if upper_bounds.is_empty() => "?".to_string(),
            TypeRef::Wildcard { upper_bounds } => {
                let bounds: Vec<String> = upper_bounds.iter().map(|b| self.describe(b)).collect();
                format!("? extends {}", bounds.join(" & "))
            }
            TypeRef::TypeVariable { name, .. } => name.clone(),
        }
    }

    /// Whether `source` can be assigned to a variable of type `target`
    fn is_assignable_from(&self, target: ClassId, source: ClassId) -> bool {
        if target == source {
            return true;
        }
        let info = self.class(source);
        if let Some(superclass) = info.superclass
            && self.is_assignable_from(target, superclass)
        {
            return true;
        }
        info.interfaces
            .iter()
            .any(|&iface| self.is_assignable_from(target, iface))
    }
}

/// First 8 bytes of the SHA-256 digest as 16 lowercase hex digits
pub fn signature_hash(signature: &str) -> String {
    let digest = Sha256::digest(signature.as_bytes());
    hex::encode(&digest[..8])
}

/// Find the implementation a non-virtual call on `class` would reach.
///
/// Looks up a public method (declared or inherited), then a declared method
/// of any access on `class` and each superclass in turn. Abstract and private
/// results are rejected since they cannot be invoked non-virtually.
pub fn find_method<'p, P: ReflectionProvider + ?Sized>(
    provider: &'p P,
    class: ClassId,
    name: &str,
    params: &[TypeRef],
) -> Option<&'p Method> {
    let method = find_public_method(provider, class, name, params).or_else(|| {
        let mut current = Some(class);
        while let Some(id) = current {
            if let Some(found) = find_declared_method(provider, id, name, params, false) {
                return Some(found);
            }
            current = provider.class(id).superclass;
        }
        None
    })?;

    if method.modifiers.is_abstract() || method.modifiers.is_private() {
        return None;
    }
    Some(method)
}

fn find_public_method<'p, P: ReflectionProvider + ?Sized>(
    provider: &'p P,
    class: ClassId,
    name: &str,
    params: &[TypeRef],
) -> Option<&'p Method> {
    if let Some(found) = find_declared_method(provider, class, name, params, true) {
        return Some(found);
    }
    let info = provider.class(class);
    if let Some(found) = info
        .superclass
        .and_then(|superclass| find_public_method(provider, superclass, name, params))
    {
        return Some(found);
    }
    info.interfaces
        .iter()
        .find_map(|&iface| find_public_method(provider, iface, name, params))
}

fn find_declared_method<'p, P: ReflectionProvider + ?Sized>(
    provider: &'p P,
    class: ClassId,
    name: &str,
    params: &[TypeRef],
    public_only: bool,
) -> Option<&'p Method> {
    provider
        .class(class)
        .methods
        .iter()
        .filter(|m| m.name == name && m.parameter_types == params)
        .filter(|m| !public_only || m.modifiers.is_public())
        .reduce(|best, m| if preferred_over(provider, m, best) { m } else { best })
}

/// Whether `candidate` wins over `current`, both declared with the same
/// name and parameters.
///
/// The narrower return type wins. Between unrelated or equal return types a
/// non-synthetic method wins, and otherwise the earlier declaration stays.
fn preferred_over<P: ReflectionProvider + ?Sized>(
    provider: &P,
    candidate: &Method,
    current: &Method,
) -> bool {
    let narrower = |a: &Method, b: &Method| match (a.return_type.as_class(), b.return_type.as_class()) {
        (Some(a), Some(b)) => a != b && provider.is_assignable_from(b, a),
        _ => false,
    };
    if narrower(candidate, current) {
        return true;
    }
    if narrower(current, candidate) {
        return false;
    }
    current.synthetic && !candidate.synthetic
}
