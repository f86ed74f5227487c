//! Java to C++ type mappings for wrapper declarations.
//!
//! # Type Mappings
//!
//! | Java | C++ value | C++ parameter |
//! |------|-----------|---------------|
//! | `int` | `jint` | `jint` |
//! | `void` | `void` | - |
//! | `java.lang.String` | `::java::lang::String` | `const ::java::lang::String &` |
//! | `int[]` | `JArray< jint >` | `const JArray< jint > &` |
//! | the wrapped class | `Widget` | `const Widget &` |
//!
//! Only erased types are mapped; declarations never spell out generics.

use crate::naming::ReservedWords;
use jbridge_core::{BridgeError, BridgeResult, ClassId, Primitive, ReflectionProvider, TypeRef};

/// Maps types as seen from inside one wrapper class
pub struct TypeMapper<'a, P: ReflectionProvider + ?Sized> {
    provider: &'a P,
    reserved: &'a ReservedWords,
    current: ClassId,
}

impl<'a, P: ReflectionProvider + ?Sized> TypeMapper<'a, P> {
    pub fn new(provider: &'a P, reserved: &'a ReservedWords, current: ClassId) -> Self {
        Self {
            provider,
            reserved,
            current,
        }
    }

    /// C++ name of a class: unqualified for the current class, absolute otherwise
    pub fn class_name(&self, id: ClassId) -> String {
        let class = self.provider.class(id);
        if id == self.current {
            self.reserved.cpp_name(class.simple_name())
        } else {
            self.reserved.abs_name(&class.name)
        }
    }

    /// C++ spelling of an erased type.
    ///
    /// With `as_const`, non-primitive types become `const T &`.
    pub fn type_name(&self, ty: &TypeRef, as_const: bool) -> BridgeResult<String> {
        let name = match ty {
            TypeRef::Array(element) => format!("JArray< {} >", self.type_name(element, false)?),
            TypeRef::Plain(id) => match self.provider.class(*id).primitive() {
                Some(primitive) => return Ok(primitive.native_type().to_string()),
                None => self.class_name(*id),
            },
            TypeRef::Parameterized { .. }
            | TypeRef::Wildcard { .. }
            | TypeRef::TypeVariable { .. }
            | TypeRef::GenericArray(_) => {
                return Err(BridgeError::UnsupportedType {
                    kind: ty.kind(),
                    context: format!("declaration in {}", self.provider.name(self.current)),
                });
            }
        };

        if as_const {
            Ok(format!("const {name} &"))
        } else {
            Ok(name)
        }
    }

    /// Comma-separated parameter types of a declaration
    pub fn parameter_list(&self, params: &[TypeRef]) -> BridgeResult<String> {
        let names = params
            .iter()
            .map(|p| self.type_name(p, true))
            .collect::<BridgeResult<Vec<_>>>()?;
        Ok(names.join(", "))
    }

    /// Named parameter declarations and the matching call arguments.
    ///
    /// Returns `("jint a0, const T & a1", ", a0, a1.this$")`; both are empty
    /// without parameters. Object arguments pass their `this$` handle.
    pub fn arg_names(&self, params: &[TypeRef]) -> BridgeResult<(String, String)> {
        if params.is_empty() {
            return Ok((String::new(), String::new()));
        }

        let mut decls = Vec::with_capacity(params.len());
        let mut args = Vec::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            decls.push(format!("{} a{i}", self.type_name(param, true)?));
            if self.is_primitive(param) {
                args.push(format!("a{i}"));
            } else {
                args.push(format!("a{i}.this$"));
            }
        }

        Ok((decls.join(", "), format!(", {}", args.join(", "))))
    }

    /// The primitive a type stands for, if any
    pub fn primitive(&self, ty: &TypeRef) -> Option<Primitive> {
        match ty {
            TypeRef::Plain(id) => self.provider.class(*id).primitive(),
            TypeRef::Array(_)
            | TypeRef::Parameterized { .. }
            | TypeRef::Wildcard { .. }
            | TypeRef::TypeVariable { .. }
            | TypeRef::GenericArray(_) => None,
        }
    }

    /// Whether a type is passed and returned by value as a JNI scalar
    pub fn is_primitive(&self, ty: &TypeRef) -> bool {
        self.primitive(ty).is_some()
    }
}
