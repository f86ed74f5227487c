//! In-memory reflection provider built from a class model.
//!
//! A class model is a serializable dump of reflected classes (see
//! [`ClassModel`]). Erased types are written as strings (`int`,
//! `java.lang.String[][]`); generic types are tagged objects:
//!
//! ```json
//! { "parameterized": { "raw": "java.util.Map",
//!                      "args": [ { "class": "java.lang.String" },
//!                                { "wildcard": { "upper_bounds": [ { "class": "java.lang.Number" } ] } } ] } }
//! ```
//!
//! Primitive classes are always present. The bootstrap classes the generator
//! seeds every run with are stubbed when the model does not define them.

use crate::error::{BridgeError, BridgeResult};
use crate::reflect::{
    ClassInfo, ClassKind, Constructor, Field, Method, Modifiers, Primitive, ReflectionProvider,
};
use crate::types::{ClassId, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Root object class name
pub const OBJECT: &str = "java.lang.Object";

/// Classes every run needs, with their superclass
const BOOTSTRAP: &[(&str, Option<&str>)] = &[
    (OBJECT, None),
    ("java.lang.Class", Some(OBJECT)),
    ("java.lang.String", Some(OBJECT)),
    ("java.lang.Throwable", Some(OBJECT)),
    ("java.lang.Exception", Some("java.lang.Throwable")),
    ("java.lang.RuntimeException", Some("java.lang.Exception")),
];

/// A reflection dump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassModel {
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
}

/// A generic type reference in a class model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSpec {
    Class(String),
    Array(Box<TypeSpec>),
    Parameterized {
        raw: String,
        #[serde(default)]
        args: Vec<TypeSpec>,
    },
    Wildcard {
        #[serde(default)]
        upper_bounds: Vec<TypeSpec>,
    },
    Variable {
        name: String,
        #[serde(default)]
        bounds: Vec<TypeSpec>,
    },
    GenericArray(Box<TypeSpec>),
    /// Anything else the dump contains; rejected when the pool is built
    #[serde(untagged)]
    Unsupported(serde_json::Value),
}

impl TypeSpec {
    pub fn class(name: impl Into<String>) -> Self {
        TypeSpec::Class(name.into())
    }

    pub fn parameterized(raw: impl Into<String>, args: Vec<TypeSpec>) -> Self {
        TypeSpec::Parameterized {
            raw: raw.into(),
            args,
        }
    }

    pub fn variable(name: impl Into<String>, bounds: Vec<TypeSpec>) -> Self {
        TypeSpec::Variable {
            name: name.into(),
            bounds,
        }
    }

    pub fn wildcard(upper_bounds: Vec<TypeSpec>) -> Self {
        TypeSpec::Wildcard { upper_bounds }
    }
}

fn default_public() -> Modifiers {
    Modifiers::PUBLIC
}

fn default_void() -> String {
    "void".to_string()
}

/// One class of a reflection dump.
///
/// A class without an explicit superclass extends `java.lang.Object`;
/// interfaces and `java.lang.Object` itself have none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSpec {
    pub name: String,

    #[serde(default)]
    pub interface: bool,

    #[serde(default = "default_public")]
    pub modifiers: Modifiers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_superclass: Option<TypeSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_interfaces: Option<Vec<TypeSpec>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_class: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<ConstructorSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

impl ClassSpec {
    /// A public class extending `java.lang.Object`
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interface: false,
            modifiers: Modifiers::PUBLIC,
            superclass: None,
            generic_superclass: None,
            interfaces: Vec::new(),
            generic_interfaces: None,
            type_parameters: Vec::new(),
            declaring_class: None,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// A public interface
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            interface: true,
            modifiers: Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT,
            ..Self::class(name)
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn extends_generic(mut self, superclass: TypeSpec) -> Self {
        self.generic_superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_type_parameter(mut self, parameter: TypeSpec) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn nested_in(mut self, outer: impl Into<String>) -> Self {
        self.declaring_class = Some(outer.into());
        self
    }

    pub fn constructor(mut self, constructor: ConstructorSpec) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

/// A declared constructor in a reflection dump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorSpec {
    #[serde(default = "default_public")]
    pub modifiers: Modifiers,

    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_parameters: Option<Vec<TypeSpec>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_exceptions: Option<Vec<TypeSpec>>,
}

impl ConstructorSpec {
    /// A public constructor
    pub fn new(parameters: &[&str]) -> Self {
        Self {
            modifiers: Modifiers::PUBLIC,
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            generic_parameters: None,
            exceptions: Vec::new(),
            generic_exceptions: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_generic_parameters(mut self, parameters: Vec<TypeSpec>) -> Self {
        self.generic_parameters = Some(parameters);
        self
    }

    pub fn throws(mut self, exception: impl Into<String>) -> Self {
        self.exceptions.push(exception.into());
        self
    }
}

/// A declared method in a reflection dump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,

    #[serde(default = "default_public")]
    pub modifiers: Modifiers,

    #[serde(default)]
    pub synthetic: bool,

    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_parameters: Option<Vec<TypeSpec>>,

    #[serde(default = "default_void")]
    pub return_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_return_type: Option<TypeSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_exceptions: Option<Vec<TypeSpec>>,
}

impl MethodSpec {
    /// A public instance method
    pub fn new(name: impl Into<String>, return_type: &str, parameters: &[&str]) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::PUBLIC,
            synthetic: false,
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            generic_parameters: None,
            return_type: return_type.to_string(),
            generic_return_type: None,
            exceptions: Vec::new(),
            generic_exceptions: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    pub fn with_generic_parameters(mut self, parameters: Vec<TypeSpec>) -> Self {
        self.generic_parameters = Some(parameters);
        self
    }

    pub fn with_generic_return(mut self, return_type: TypeSpec) -> Self {
        self.generic_return_type = Some(return_type);
        self
    }

    pub fn throws(mut self, exception: impl Into<String>) -> Self {
        self.exceptions.push(exception.into());
        self
    }
}

/// A declared field in a reflection dump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,

    #[serde(default = "default_public")]
    pub modifiers: Modifiers,

    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_type: Option<TypeSpec>,
}

impl FieldSpec {
    /// A public instance field
    pub fn new(name: impl Into<String>, field_type: &str) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::PUBLIC,
            field_type: field_type.to_string(),
            generic_type: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_generic_type(mut self, generic_type: TypeSpec) -> Self {
        self.generic_type = Some(generic_type);
        self
    }
}

/// Reflection provider over a fixed set of classes
#[derive(Debug, Clone)]
pub struct ClassPool {
    classes: Vec<ClassInfo>,
    index: HashMap<String, ClassId>,
}

impl ClassPool {
    /// A pool holding only primitives and the bootstrap classes
    pub fn new() -> Self {
        // The bootstrap specs only reference each other
        match Self::from_specs(Vec::new()) {
            Ok(pool) => pool,
            Err(_) => unreachable!("bootstrap classes always resolve"),
        }
    }

    /// Build a pool from a parsed model
    pub fn from_model(model: ClassModel) -> BridgeResult<Self> {
        Self::from_specs(model.classes)
    }

    /// Build a pool from a JSON reflection dump
    pub fn from_json(json: &str) -> BridgeResult<Self> {
        let model: ClassModel = serde_json::from_str(json)?;
        Self::from_model(model)
    }

    /// Load a JSON reflection dump from disk
    pub fn from_path(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| BridgeError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Build a pool from class specs
    pub fn from_specs(mut specs: Vec<ClassSpec>) -> BridgeResult<Self> {
        let mut pool = ClassPool {
            classes: Vec::new(),
            index: HashMap::new(),
        };

        for primitive in Primitive::ALL {
            pool.register(placeholder(primitive.name(), ClassKind::Primitive(primitive)))?;
        }

        for spec in &mut specs {
            spec.name = normalize(&spec.name);
        }
        for &(name, superclass) in BOOTSTRAP {
            if !specs.iter().any(|s| s.name == name) {
                let mut stub = ClassSpec::class(name);
                stub.superclass = superclass.map(str::to_string);
                specs.push(stub);
            }
        }

        let mut ids = Vec::with_capacity(specs.len());
        for spec in &specs {
            let kind = if spec.interface {
                ClassKind::Interface
            } else {
                ClassKind::Class
            };
            ids.push(pool.register(placeholder(&spec.name, kind))?);
        }

        for (spec, id) in specs.iter().zip(ids) {
            let info = pool.resolve_class(spec, id)?;
            pool.classes[id.index()] = info;
        }

        Ok(pool)
    }

    /// Number of classes, primitives included
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn register(&mut self, info: ClassInfo) -> BridgeResult<ClassId> {
        if self.index.contains_key(&info.name) {
            return Err(BridgeError::Model(format!(
                "class {} is defined more than once",
                info.name
            )));
        }
        let id = ClassId::new(self.classes.len() as u32);
        self.index.insert(info.name.clone(), id);
        self.classes.push(info);
        Ok(id)
    }

    fn lookup(&self, name: &str, context: &str) -> BridgeResult<ClassId> {
        self.index.get(&normalize(name)).copied().ok_or_else(|| {
            BridgeError::Model(format!("{context} references undefined class {name}"))
        })
    }

    /// Parse an erased type string such as `java.lang.String[][]`
    fn erased(&self, text: &str, context: &str) -> BridgeResult<TypeRef> {
        let text = text.trim();
        if let Some(element) = text.strip_suffix("[]") {
            return Ok(TypeRef::array_of(self.erased(element, context)?));
        }
        Ok(TypeRef::Plain(self.lookup(text, context)?))
    }

    fn erased_all(&self, texts: &[String], context: &str) -> BridgeResult<Vec<TypeRef>> {
        texts.iter().map(|t| self.erased(t, context)).collect()
    }

    fn generic(&self, spec: &TypeSpec, context: &str) -> BridgeResult<TypeRef> {
        Ok(match spec {
            TypeSpec::Class(name) => self.erased(name, context)?,
            TypeSpec::Array(inner) => TypeRef::array_of(self.generic(inner, context)?),
            TypeSpec::Parameterized { raw, args } => TypeRef::Parameterized {
                raw: self.lookup(raw, context)?,
                args: self.generic_all(args, context)?,
            },
            TypeSpec::Wildcard { upper_bounds } => TypeRef::Wildcard {
                upper_bounds: self.generic_all(upper_bounds, context)?,
            },
            TypeSpec::Variable { name, bounds } => TypeRef::TypeVariable {
                name: name.clone(),
                bounds: self.generic_all(bounds, context)?,
            },
            TypeSpec::GenericArray(inner) => {
                TypeRef::GenericArray(Box::new(self.generic(inner, context)?))
            }
            TypeSpec::Unsupported(value) => {
                return Err(BridgeError::UnsupportedType {
                    kind: "unrecognized",
                    context: format!("{context}: {value}"),
                });
            }
        })
    }

    fn generic_all(&self, specs: &[TypeSpec], context: &str) -> BridgeResult<Vec<TypeRef>> {
        specs.iter().map(|s| self.generic(s, context)).collect()
    }

    /// Generic list if the dump has one, otherwise the erased list
    fn generic_or(
        &self,
        specs: &Option<Vec<TypeSpec>>,
        erased: &[TypeRef],
        context: &str,
    ) -> BridgeResult<Vec<TypeRef>> {
        match specs {
            Some(specs) => self.generic_all(specs, context),
            None => Ok(erased.to_vec()),
        }
    }

    fn resolve_class(&self, spec: &ClassSpec, id: ClassId) -> BridgeResult<ClassInfo> {
        let context = spec.name.as_str();

        let superclass = match (&spec.superclass, spec.interface) {
            (Some(name), _) => Some(self.lookup(name, context)?),
            (None, false) if spec.name != OBJECT => Some(self.lookup(OBJECT, context)?),
            (None, _) => None,
        };
        let generic_superclass = match &spec.generic_superclass {
            Some(generic) => Some(self.generic(generic, context)?),
            None => superclass.map(TypeRef::Plain),
        };

        let interfaces = spec
            .interfaces
            .iter()
            .map(|name| self.lookup(name, context))
            .collect::<BridgeResult<Vec<_>>>()?;
        let erased_interfaces: Vec<TypeRef> = interfaces.iter().map(|&i| i.into()).collect();
        let generic_interfaces =
            self.generic_or(&spec.generic_interfaces, &erased_interfaces, context)?;

        let constructors = spec
            .constructors
            .iter()
            .map(|c| {
                let context = format!("{context}.<init>");
                let parameter_types = self.erased_all(&c.parameters, &context)?;
                let exception_types = self.erased_all(&c.exceptions, &context)?;
                Ok(Constructor {
                    declaring_class: id,
                    modifiers: c.modifiers,
                    generic_parameter_types: self.generic_or(
                        &c.generic_parameters,
                        &parameter_types,
                        &context,
                    )?,
                    generic_exception_types: self.generic_or(
                        &c.generic_exceptions,
                        &exception_types,
                        &context,
                    )?,
                    parameter_types,
                    exception_types,
                })
            })
            .collect::<BridgeResult<Vec<_>>>()?;

        let methods = spec
            .methods
            .iter()
            .map(|m| {
                let context = format!("{context}.{}", m.name);
                let parameter_types = self.erased_all(&m.parameters, &context)?;
                let exception_types = self.erased_all(&m.exceptions, &context)?;
                let return_type = self.erased(&m.return_type, &context)?;
                Ok(Method {
                    name: m.name.clone(),
                    declaring_class: id,
                    modifiers: m.modifiers,
                    synthetic: m.synthetic,
                    generic_parameter_types: self.generic_or(
                        &m.generic_parameters,
                        &parameter_types,
                        &context,
                    )?,
                    generic_exception_types: self.generic_or(
                        &m.generic_exceptions,
                        &exception_types,
                        &context,
                    )?,
                    generic_return_type: match &m.generic_return_type {
                        Some(generic) => self.generic(generic, &context)?,
                        None => return_type.clone(),
                    },
                    parameter_types,
                    exception_types,
                    return_type,
                })
            })
            .collect::<BridgeResult<Vec<_>>>()?;

        let fields = spec
            .fields
            .iter()
            .map(|f| {
                let context = format!("{context}.{}", f.name);
                let field_type = self.erased(&f.field_type, &context)?;
                Ok(Field {
                    name: f.name.clone(),
                    declaring_class: id,
                    modifiers: f.modifiers,
                    generic_type: match &f.generic_type {
                        Some(generic) => self.generic(generic, &context)?,
                        None => field_type.clone(),
                    },
                    field_type,
                })
            })
            .collect::<BridgeResult<Vec<_>>>()?;

        Ok(ClassInfo {
            name: spec.name.clone(),
            kind: if spec.interface {
                ClassKind::Interface
            } else {
                ClassKind::Class
            },
            modifiers: spec.modifiers,
            superclass,
            generic_superclass,
            interfaces,
            generic_interfaces,
            type_parameters: self.generic_all(&spec.type_parameters, context)?,
            declaring_class: spec
                .declaring_class
                .as_deref()
                .map(|name| self.lookup(name, context))
                .transpose()?,
            constructors,
            methods,
            fields,
        })
    }
}

impl Default for ClassPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflectionProvider for ClassPool {
    fn find_class(&self, name: &str) -> BridgeResult<ClassId> {
        self.index
            .get(&normalize(name))
            .copied()
            .ok_or_else(|| BridgeError::ClassNotFound(name.to_string()))
    }

    fn class(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.index()]
    }
}

fn normalize(name: &str) -> String {
    name.trim().replace('/', ".")
}

fn placeholder(name: &str, kind: ClassKind) -> ClassInfo {
    let modifiers = match kind {
        ClassKind::Primitive(_) => Modifiers::PUBLIC | Modifiers::FINAL | Modifiers::ABSTRACT,
        ClassKind::Class | ClassKind::Interface => Modifiers::PUBLIC,
    };
    ClassInfo {
        name: name.to_string(),
        kind,
        modifiers,
        superclass: None,
        generic_superclass: None,
        interfaces: Vec::new(),
        generic_interfaces: Vec::new(),
        type_parameters: Vec::new(),
        declaring_class: None,
        constructors: Vec::new(),
        methods: Vec::new(),
        fields: Vec::new(),
    }
}

#[cfg(test)]
#[path = "model/model_tests.rs"]
mod model_tests;
