//! Type closure analysis.
//!
//! Decides which classes have to exist, as generated wrappers or forward
//! declarations, for the wrappers of a requested class set to compile.
//!
//! Two operations grow the [`TypeSet`]:
//!
//! - [`ClosureAnalyzer::is_includable`] filters a referenced type through the
//!   exclude and allowed-package gates, and records it in the caller's
//!   `declares` set when it passes.
//! - [`ClosureAnalyzer::add_required_types`] inserts a type and its supertypes
//!   unconditionally. It seeds the run and pulls in types that must compile
//!   regardless of package filters.
//!
//! The set only ever grows; the generator keeps emitting until a round adds
//! nothing new.

use jbridge_core::{BridgeError, BridgeResult, ClassId, ReflectionProvider, TypeRef};
use std::collections::BTreeSet;

/// Classes that must be generated or declared
pub type TypeSet = BTreeSet<ClassId>;

/// Classes every run starts with
pub const BOOTSTRAP_CLASSES: &[&str] = &[
    "java.lang.Object",
    "java.lang.Class",
    "java.lang.String",
    "java.lang.Throwable",
    "java.lang.Exception",
    "java.lang.RuntimeException",
];

/// Package and exclude gates over one reflection provider
pub struct ClosureAnalyzer<'a, P: ReflectionProvider + ?Sized> {
    provider: &'a P,
    packages: &'a BTreeSet<String>,
    excludes: &'a BTreeSet<String>,
}

impl<'a, P: ReflectionProvider + ?Sized> ClosureAnalyzer<'a, P> {
    pub fn new(
        provider: &'a P,
        packages: &'a BTreeSet<String>,
        excludes: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            provider,
            packages,
            excludes,
        }
    }

    pub fn provider(&self) -> &'a P {
        self.provider
    }

    /// Insert the bootstrap classes
    pub fn seed(&self, typeset: &mut TypeSet) -> BridgeResult<()> {
        for name in BOOTSTRAP_CLASSES {
            typeset.insert(self.provider.find_class(name)?);
        }
        Ok(())
    }

    /// Whether a referenced class is excluded.
    ///
    /// An exclude entry matches the class name, its outer class name, or any
    /// class in that package or below it.
    pub fn is_excluded(&self, name: &str) -> bool {
        let outer = outer_name(name);
        self.excludes.iter().any(|exclude| {
            name == exclude
                || outer == exclude
                || name
                    .strip_prefix(exclude.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// Whether a directly requested class is excluded.
    ///
    /// Only an exact match on the class name or its outer class name counts,
    /// so excluding a package still lets a class in it be requested by name.
    pub fn is_request_excluded(&self, name: &str) -> bool {
        let outer = outer_name(name);
        self.excludes.contains(name) || self.excludes.contains(outer)
    }

    /// Whether `ty` can appear in a wrapper signature, growing `typeset` and
    /// `declares` as a side effect.
    ///
    /// Generic references recurse structurally: a parameterized type needs its
    /// raw type and every concrete argument, a wildcard or type variable needs
    /// all of its bounds, a generic array needs its component.
    pub fn is_includable(
        &self,
        ty: &TypeRef,
        typeset: &mut TypeSet,
        declares: &mut TypeSet,
        generics: bool,
    ) -> BridgeResult<bool> {
        if !generics {
            return match ty.element() {
                TypeRef::Plain(id) => Ok(self.includes_class(*id, typeset, declares)),
                other => Err(BridgeError::UnsupportedType {
                    kind: other.kind(),
                    context: "non-generic closure".to_string(),
                }),
            };
        }

        match ty {
            TypeRef::Plain(id) => Ok(self.includes_class(*id, typeset, declares)),
            TypeRef::Array(element) => self.is_includable(element, typeset, declares, true),
            TypeRef::Parameterized { raw, args } => {
                if !self.includes_class(*raw, typeset, declares) {
                    return Ok(false);
                }
                for arg in args {
                    if matches!(arg, TypeRef::TypeVariable { .. }) {
                        continue;
                    }
                    if !self.is_includable(arg, typeset, declares, true)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            TypeRef::Wildcard {
                upper_bounds: bounds,
            }
            | TypeRef::TypeVariable { bounds, .. } => {
                for bound in bounds {
                    if !self.is_includable(bound, typeset, declares, true)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            TypeRef::GenericArray(component) => {
                self.is_includable(component, typeset, declares, true)
            }
        }
    }

    fn includes_class(&self, id: ClassId, typeset: &mut TypeSet, declares: &mut TypeSet) -> bool {
        let class = self.provider.class(id);
        if self.is_excluded(&class.name) {
            return false;
        }
        if class.is_primitive() {
            return true;
        }
        if typeset.contains(&id) {
            declares.insert(id);
            return true;
        }
        if self.packages.contains(class.package()) {
            typeset.insert(id);
            declares.insert(id);
            let mut current = class.superclass;
            while let Some(superclass) = current {
                if !typeset.insert(superclass) {
                    break;
                }
                current = self.provider.class(superclass).superclass;
            }
            return true;
        }
        false
    }

    /// Insert `ty` and everything it is built from, without filtering.
    ///
    /// Non-generic mode follows the erased superclass chain. Generic mode also
    /// walks raw types, type arguments and array components, and follows the
    /// generic superclass; type variables and wildcards add nothing.
    pub fn add_required_types(
        &self,
        ty: &TypeRef,
        typeset: &mut TypeSet,
        generics: bool,
    ) -> BridgeResult<()> {
        if !generics {
            return match ty {
                TypeRef::Plain(id) => {
                    let mut current = Some(*id);
                    while let Some(class) = current {
                        if self.provider.class(class).is_primitive() || !typeset.insert(class) {
                            break;
                        }
                        current = self.provider.class(class).superclass;
                    }
                    Ok(())
                }
                TypeRef::Array(element) => self.add_required_types(element, typeset, false),
                TypeRef::Parameterized { .. }
                | TypeRef::Wildcard { .. }
                | TypeRef::TypeVariable { .. }
                | TypeRef::GenericArray(_) => Err(BridgeError::UnsupportedType {
                    kind: ty.kind(),
                    context: "non-generic closure".to_string(),
                }),
            };
        }

        match ty {
            TypeRef::Plain(id) => {
                let class = self.provider.class(*id);
                if class.is_primitive() || !typeset.insert(*id) {
                    return Ok(());
                }
                if let Some(superclass) = &class.generic_superclass {
                    self.add_required_types(superclass, typeset, true)?;
                }
                Ok(())
            }
            TypeRef::Array(element) => self.add_required_types(element, typeset, true),
            TypeRef::Parameterized { raw, args } => {
                self.add_required_types(&TypeRef::Plain(*raw), typeset, true)?;
                for arg in args {
                    self.add_required_types(arg, typeset, true)?;
                }
                Ok(())
            }
            TypeRef::GenericArray(component) => self.add_required_types(component, typeset, true),
            TypeRef::TypeVariable { .. } | TypeRef::Wildcard { .. } => Ok(()),
        }
    }

    /// Type parameters in effect for a class.
    ///
    /// A class without its own parameters inherits the ones of its generic
    /// superclass: the actual arguments if it extends a parameterized type,
    /// otherwise that superclass's own. Failing both, the declaring class's.
    pub fn type_parameters(&self, class: Option<ClassId>) -> Vec<TypeRef> {
        let Some(id) = class else {
            return Vec::new();
        };
        let info = self.provider.class(id);
        if !info.type_parameters.is_empty() {
            return info.type_parameters.clone();
        }

        match &info.generic_superclass {
            Some(TypeRef::Plain(superclass)) => {
                let inherited = self.type_parameters(Some(*superclass));
                if !inherited.is_empty() {
                    return inherited;
                }
            }
            Some(TypeRef::Parameterized { args, .. }) if !args.is_empty() => {
                return args.clone();
            }
            _ => {}
        }

        self.type_parameters(info.declaring_class)
    }
}

fn outer_name(name: &str) -> &str {
    name.split('$').next().unwrap_or(name)
}
