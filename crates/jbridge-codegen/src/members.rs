//! Member selection for one wrapped class.
//!
//! Builds the [`MemberTable`] the emitters render: which constructors,
//! methods and fields a wrapper exposes, in the order that fixes their slot
//! indices. Members whose types fail closure inclusion are dropped; that is
//! never an error.

use crate::closure::{ClosureAnalyzer, TypeSet};
use crate::naming::{ReservedWords, SHADOWED_FIELD_SUFFIX};
use crate::signature;
use indexmap::IndexMap;
use jbridge_core::{
    BridgeError, BridgeResult, ClassId, ClassInfo, Constructor, Field, Method, OBJECT,
    ReflectionProvider, TypeRef, find_method,
};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// How a wrapper method reaches its Java implementation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch<'p> {
    /// Through the class handle
    Static,
    /// Through the instance handle, resolved by the VM
    Virtual,
    /// Through the instance handle, bound to a superclass implementation
    NonVirtual { target: &'p Method },
    /// Bound to a superclass that has no callable implementation; the wrapper
    /// keeps the slot and declaration but gets no body
    Unavailable,
}

/// A method kept in the table with its dispatch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedMethod<'p> {
    pub method: &'p Method,
    pub dispatch: Dispatch<'p>,
}

/// A static field with its C++ member name
#[derive(Debug, Clone, PartialEq)]
pub struct StaticField<'p> {
    pub field: &'p Field,
    /// Escaped name, suffixed when a method of the same name shadows it
    pub cpp_name: String,
}

/// Everything a wrapper exposes, in slot order
#[derive(Debug, Clone)]
pub struct MemberTable<'p> {
    pub class: ClassId,
    /// Native base class; `None` maps to the root wrapper type
    pub superclass: Option<ClassId>,
    /// Sorted by parameter count
    pub constructors: Vec<&'p Constructor>,
    /// Deduplicated by name and erased parameters, sorted by name then arity
    pub methods: Vec<SelectedMethod<'p>>,
    /// Declared protected methods; they get slots but no wrapper
    pub protected_methods: Vec<&'p Method>,
    /// Escaped names of `methods`
    pub method_names: BTreeSet<String>,
    pub static_fields: Vec<StaticField<'p>>,
    pub instance_fields: Vec<&'p Field>,
    /// Classes referenced by the wrapper
    pub declares: TypeSet,
    /// The class carries the extension marker method
    pub extension: bool,
}

impl MemberTable<'_> {
    /// Whether the wrapper needs a method-id table
    pub fn has_method_slots(&self) -> bool {
        !(self.constructors.is_empty() && self.methods.is_empty() && self.protected_methods.is_empty())
    }

    /// Whether the wrapper needs a field-id table
    pub fn has_field_slots(&self) -> bool {
        !self.instance_fields.is_empty()
    }
}

/// Selects wrapper members under one run's configuration
pub struct MemberSelector<'a, P: ReflectionProvider + ?Sized> {
    analyzer: ClosureAnalyzer<'a, P>,
    reserved: &'a ReservedWords,
    generics: bool,
    extension_marker: &'a str,
}

impl<'a, P: ReflectionProvider + ?Sized> MemberSelector<'a, P> {
    pub fn new(
        analyzer: ClosureAnalyzer<'a, P>,
        reserved: &'a ReservedWords,
        generics: bool,
        extension_marker: &'a str,
    ) -> Self {
        Self {
            analyzer,
            reserved,
            generics,
            extension_marker,
        }
    }

    pub fn analyzer(&self) -> &ClosureAnalyzer<'a, P> {
        &self.analyzer
    }

    /// Build the member table of `class`.
    ///
    /// `listed` names non-public methods and fields to expose anyway.
    /// Referenced classes that pass the closure gates are added to `typeset`.
    pub fn select(
        &self,
        class: ClassId,
        listed: &[String],
        typeset: &mut TypeSet,
    ) -> BridgeResult<MemberTable<'a>> {
        let provider = self.analyzer.provider();
        let info = provider.class(class);
        let mut declares = TypeSet::from([provider.find_class("java.lang.Class")?]);
        let is_listed = |name: &str| listed.iter().any(|m| m == name);

        let superclass = self.native_superclass(class, info, typeset, &mut declares)?;

        let mut constructors = Vec::new();
        for constructor in &info.constructors {
            if !constructor.modifiers.is_public() {
                continue;
            }
            let params = self.constructor_params(constructor);
            if self.is_self_copy(class, info, &params) {
                continue;
            }
            let label = || self.label(provider, "<init>", &constructor.parameter_types);
            if self
                .all_includable(&params, typeset, &mut declares)
                .map_err(|e| e.in_member(&info.name, label()))?
            {
                constructors.push(constructor);
            }
        }
        constructors.sort_by_key(|c| c.parameter_types.len());

        let mut by_signature: IndexMap<String, &'a Method> = IndexMap::new();
        let mut protected_methods = Vec::new();
        for method in &info.methods {
            if method.synthetic {
                continue;
            }
            if method.modifiers.is_public() || is_listed(&method.name) {
                let label = || self.label(provider, &method.name, &method.parameter_types);
                if let Some(key) = self
                    .method_key(class, method, &by_signature, typeset, &mut declares)
                    .map_err(|e| e.in_member(&info.name, label()))?
                {
                    by_signature.insert(key, method);
                }
            } else if method.modifiers.is_protected() {
                protected_methods.push(method);
            }
        }

        let mut methods: Vec<&'a Method> = by_signature.into_values().collect();
        methods.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.parameter_types.len().cmp(&b.parameter_types.len()))
        });
        let method_names: BTreeSet<String> =
            methods.iter().map(|m| self.reserved.cpp_name(&m.name)).collect();

        for constructor in &constructors {
            let exceptions = if self.generics {
                &constructor.generic_exception_types
            } else {
                &constructor.exception_types
            };
            for exception in exceptions {
                self.analyzer
                    .is_includable(exception, typeset, &mut declares, self.generics)?;
            }
        }
        for method in &methods {
            let exceptions = if self.generics {
                &method.generic_exception_types
            } else {
                &method.exception_types
            };
            for exception in exceptions {
                self.analyzer
                    .is_includable(exception, typeset, &mut declares, self.generics)?;
            }
        }

        let mut static_fields = Vec::new();
        let mut instance_fields = Vec::new();
        for field in &info.fields {
            if !(field.modifiers.is_public() || is_listed(&field.name)) {
                continue;
            }
            let field_type = if self.generics {
                &field.generic_type
            } else {
                &field.field_type
            };
            if !self
                .analyzer
                .is_includable(field_type, typeset, &mut declares, self.generics)
                .map_err(|e| e.in_member(&info.name, field.name.as_str()))?
            {
                continue;
            }
            if field.modifiers.is_static() {
                static_fields.push(field);
            } else {
                instance_fields.push(field);
            }
        }
        static_fields.sort_by(|a, b| a.name.cmp(&b.name));
        instance_fields.sort_by(|a, b| a.name.cmp(&b.name));

        let static_fields = static_fields
            .into_iter()
            .map(|field| {
                let mut cpp_name = self.reserved.cpp_name(&field.name);
                if method_names.contains(&cpp_name) {
                    warn!(
                        class = %info.name,
                        field = %field.name,
                        "renaming static field to {cpp_name}{SHADOWED_FIELD_SUFFIX}, a method of the same name shadows it"
                    );
                    cpp_name.push_str(SHADOWED_FIELD_SUFFIX);
                }
                StaticField { field, cpp_name }
            })
            .collect();

        let extension = methods.iter().any(|m| m.name == self.extension_marker);
        let methods = methods
            .into_iter()
            .map(|method| SelectedMethod {
                method,
                dispatch: self.dispatch(info, superclass, extension, method),
            })
            .collect::<Vec<_>>();

        debug!(
            class = %info.name,
            constructors = constructors.len(),
            methods = methods.len(),
            protected = protected_methods.len(),
            declares = declares.len(),
            "selected members"
        );

        Ok(MemberTable {
            class,
            superclass,
            constructors,
            methods,
            protected_methods,
            method_names,
            static_fields,
            instance_fields,
            declares,
            extension,
        })
    }

    /// Base class of the wrapper.
    ///
    /// Includable interfaces not already implemented by the superclass are
    /// recorded; an interface wrapper derives from the first of them, or from
    /// `java.lang.Object`.
    fn native_superclass(
        &self,
        class: ClassId,
        info: &'a ClassInfo,
        typeset: &mut TypeSet,
        declares: &mut TypeSet,
    ) -> BridgeResult<Option<ClassId>> {
        let provider = self.analyzer.provider();

        let mut declared: Vec<(ClassId, &'a [TypeRef])> = Vec::new();
        if self.generics {
            for interface in &info.generic_interfaces {
                match interface {
                    TypeRef::Plain(id) => declared.push((*id, &[] as &[TypeRef])),
                    TypeRef::Parameterized { raw, args } => declared.push((*raw, args.as_slice())),
                    TypeRef::Array(_)
                    | TypeRef::Wildcard { .. }
                    | TypeRef::TypeVariable { .. }
                    | TypeRef::GenericArray(_) => {
                        return Err(BridgeError::UnsupportedType {
                            kind: interface.kind(),
                            context: format!("interface of {}", info.name),
                        });
                    }
                }
            }
        } else {
            declared.extend(info.interfaces.iter().map(|&id| (id, &[] as &[TypeRef])));
        }

        let mut interfaces = Vec::new();
        for (interface, args) in declared {
            if let Some(superclass) = info.superclass
                && provider.is_assignable_from(interface, superclass)
            {
                continue;
            }
            if self
                .analyzer
                .is_includable(&TypeRef::Plain(interface), typeset, declares, false)?
            {
                interfaces.push(interface);
                for arg in args {
                    self.analyzer.add_required_types(arg, typeset, true)?;
                }
            }
        }

        if info.is_interface() {
            return match interfaces.first() {
                Some(&first) => Ok(Some(first)),
                None => Ok(Some(provider.find_class(OBJECT)?)),
            };
        }

        if self.generics && info.superclass.is_some() {
            for param in self.analyzer.type_parameters(Some(class)) {
                if let TypeRef::Plain(_) = param {
                    self.analyzer.add_required_types(&param, typeset, true)?;
                    self.analyzer.is_includable(&param, typeset, declares, true)?;
                }
            }
        }

        Ok(info.superclass)
    }

    /// Parameters checked for inclusion.
    ///
    /// Generic parameter lists of inner-class constructors omit the outer
    /// instance; it is taken from the erased list.
    fn constructor_params(&self, constructor: &Constructor) -> Vec<TypeRef> {
        if !self.generics {
            return constructor.parameter_types.clone();
        }
        let erased = &constructor.parameter_types;
        let generic = &constructor.generic_parameter_types;
        match erased.split_first() {
            Some((outer, _)) if erased.len() == generic.len() + 1 => std::iter::once(outer.clone())
                .chain(generic.iter().cloned())
                .collect(),
            _ => generic.clone(),
        }
    }

    /// A one-argument constructor that would clash with the generated copy
    /// constructor or only takes the outer instance.
    fn is_self_copy(&self, class: ClassId, info: &ClassInfo, params: &[TypeRef]) -> bool {
        let [param] = params else {
            return false;
        };
        match param {
            TypeRef::Plain(id) if *id == class => true,
            TypeRef::Parameterized { raw, .. } if *raw == class => true,
            TypeRef::Plain(id) => info.is_inner() && info.declaring_class == Some(*id),
            _ => false,
        }
    }

    /// Dedup key of a method, or `None` if the method is dropped.
    ///
    /// A later method with an existing key replaces the earlier one only when
    /// it returns the wrapped class itself.
    fn method_key(
        &self,
        class: ClassId,
        method: &Method,
        seen: &IndexMap<String, &'a Method>,
        typeset: &mut TypeSet,
        declares: &mut TypeSet,
    ) -> BridgeResult<Option<String>> {
        let provider = self.analyzer.provider();
        let (return_type, params) = if self.generics {
            (&method.generic_return_type, &method.generic_parameter_types)
        } else {
            (&method.return_type, &method.parameter_types)
        };

        if !self
            .analyzer
            .is_includable(return_type, typeset, declares, self.generics)?
        {
            return Ok(None);
        }

        let key = format!(
            "{}:{}",
            method.name,
            signature::parameters(provider, &method.parameter_types)?
        );
        if seen.contains_key(&key) && *return_type != TypeRef::Plain(class) {
            return Ok(None);
        }

        if self.all_includable(params, typeset, declares)? {
            Ok(Some(key))
        } else {
            Ok(None)
        }
    }

    fn all_includable(
        &self,
        params: &[TypeRef],
        typeset: &mut TypeSet,
        declares: &mut TypeSet,
    ) -> BridgeResult<bool> {
        for param in params {
            if !self
                .analyzer
                .is_includable(param, typeset, declares, self.generics)?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn dispatch(
        &self,
        info: &ClassInfo,
        superclass: Option<ClassId>,
        extension: bool,
        method: &'a Method,
    ) -> Dispatch<'a> {
        let provider = self.analyzer.provider();
        if method.modifiers.is_static() {
            return Dispatch::Static;
        }
        if extension
            && method.modifiers.is_native()
            && let Some(superclass) = superclass
        {
            return match find_method(provider, superclass, &method.name, &method.parameter_types) {
                Some(target) => Dispatch::NonVirtual { target },
                None => {
                    warn!(
                        class = %info.name,
                        method = %method.name,
                        "no callable superclass implementation, wrapper body omitted"
                    );
                    Dispatch::Unavailable
                }
            };
        }
        Dispatch::Virtual
    }

    fn label(&self, provider: &P, name: &str, params: &[TypeRef]) -> String {
        let params: Vec<String> = params.iter().map(|p| provider.describe(p)).collect();
        format!("{name}({})", params.join(", "))
    }
}
