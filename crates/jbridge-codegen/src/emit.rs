//! Shared state and naming for the header and implementation emitters.
//!
//! Slot identifiers tie the two outputs together: the header enumerates them,
//! the implementation indexes the cached id arrays with them.
//!
//! | Member | Slot |
//! |--------|------|
//! | constructor | `mid_init$_<hash>` |
//! | method | `mid_<name>_<hash>` |
//! | instance field | `fid_<name>` |
//!
//! `<hash>` is the provider's signature hash of the member's JNI signature.

use crate::jvm_types::TypeMapper;
use crate::members::MemberTable;
use crate::naming::{self, ReservedWords};
use crate::signature;
use jbridge_core::{BridgeResult, ClassId, Constructor, Field, Method, ReflectionProvider};

/// Root wrapper type of classes without a superclass
pub const ROOT_WRAPPER: &str = "JObject";

/// Global accessor of the lock every thread-safe initializer takes
pub const INIT_MUTEX: &str = "initMutex$";

/// Guard around the accessor's inline definition, repeated in every header
pub const INIT_MUTEX_GUARD: &str = "JBRIDGE_INIT_MUTEX";

/// Everything the emitters need besides the member table
pub struct EmitContext<'a, P: ReflectionProvider + ?Sized> {
    pub provider: &'a P,
    pub reserved: &'a ReservedWords,
    /// Guard the lazy initializer with an atomic flag and the shared mutex
    pub thread_safe_init: bool,
}

impl<'a, P: ReflectionProvider + ?Sized> EmitContext<'a, P> {
    pub fn new(provider: &'a P, reserved: &'a ReservedWords) -> Self {
        Self {
            provider,
            reserved,
            thread_safe_init: true,
        }
    }

    pub fn with_thread_safe_init(mut self, enabled: bool) -> Self {
        self.thread_safe_init = enabled;
        self
    }

    pub(crate) fn mapper(&self, class: ClassId) -> TypeMapper<'a, P> {
        TypeMapper::new(self.provider, self.reserved, class)
    }

    /// `mid_init$_<hash>`
    pub fn constructor_slot(&self, constructor: &Constructor) -> BridgeResult<String> {
        let sig = signature::constructor(self.provider, constructor)?;
        Ok(format!("mid_init$_{}", self.provider.signature_hash(&sig)))
    }

    /// `mid_<name>_<hash>`
    pub fn method_slot(&self, method: &Method) -> BridgeResult<String> {
        let sig = signature::method(self.provider, method)?;
        Ok(format!(
            "mid_{}_{}",
            method.name,
            self.provider.signature_hash(&sig)
        ))
    }

    /// C++ names of the wrapped class and its base
    pub(crate) fn class_names(&self, table: &MemberTable<'_>) -> ClassNames {
        let info = self.provider.class(table.class);
        let (base, base_include) = match table.superclass {
            Some(superclass) => {
                let name = self.provider.name(superclass);
                (self.reserved.abs_name(name), naming::include_path(name))
            }
            None => (
                self.reserved.abs_name(ROOT_WRAPPER),
                format!("{ROOT_WRAPPER}.h"),
            ),
        };
        let packages = naming::segments(&info.name)
            .split_last()
            .map(|(_, packages)| packages.iter().map(|s| self.reserved.cpp_name(s)).collect())
            .unwrap_or_default();

        ClassNames {
            dotted: info.name.clone(),
            simple: self.reserved.cpp_name(info.simple_name()),
            packages,
            base,
            base_include,
            is_root: table.superclass.is_none(),
        }
    }

    /// Referenced classes other than the class itself and its base, by name
    pub(crate) fn referenced(&self, table: &MemberTable<'_>) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = table
            .declares
            .iter()
            .filter(|&&id| id != table.class && Some(id) != table.superclass)
            .map(|&id| self.provider.name(id))
            .collect();
        names.sort_unstable();
        names
    }
}

/// `fid_<name>`
pub fn field_slot(field: &Field) -> String {
    format!("fid_{}", field.name)
}

/// Resolved C++ spellings for one wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassNames {
    pub dotted: String,
    /// Escaped unqualified class name
    pub simple: String,
    /// Escaped namespace segments
    pub packages: Vec<String>,
    /// Absolute name of the base wrapper
    pub base: String,
    pub base_include: String,
    /// The base is the root wrapper type
    pub is_root: bool,
}
