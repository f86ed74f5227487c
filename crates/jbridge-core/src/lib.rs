//! jbridge-core - Type algebra, reflection contract and request configuration
//!
//! This crate provides the foundational types for generating JNI wrappers:
//! - [`TypeRef`] and [`ClassId`] for reflected type references
//! - [`ReflectionProvider`] and [`ClassInfo`] for reading class metadata
//! - [`ClassPool`] as an in-memory provider loaded from a JSON class model
//! - [`GenerationRequest`] for run configuration
//! - [`BridgeError`] for error handling

mod config;
mod error;
mod model;
mod reflect;
mod types;

pub use config::{ClassRequest, FileSplit, GenerationRequest, ModuleConfig};
pub use error::{BridgeError, BridgeResult, ErrorCategory};
pub use model::{
    ClassModel, ClassPool, ClassSpec, ConstructorSpec, FieldSpec, MethodSpec, OBJECT, TypeSpec,
};
pub use reflect::{
    ClassInfo, ClassKind, Constructor, Field, Method, Modifiers, Primitive, ReflectionProvider,
    find_method, signature_hash,
};
pub use types::{ClassId, TypeRef};

/// Log levels for generator diagnostics
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    /// Map a `-v` count to a level: none is `Warn`, each flag one step lower
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BridgeError, BridgeResult, ClassId, ClassInfo, ClassPool, GenerationRequest, LogLevel,
        ReflectionProvider, TypeRef,
    };
}

#[cfg(test)]
mod lib_tests;
