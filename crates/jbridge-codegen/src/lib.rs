//! JNI wrapper generation from reflected Java classes.
//!
//! Given a [`GenerationRequest`](jbridge_core::GenerationRequest) and a
//! [`ReflectionProvider`](jbridge_core::ReflectionProvider), produces one C++
//! header per wrapped Java class plus implementation files that forward every
//! exposed constructor, method and field through JNI.
//!
//! # Pipeline
//!
//! ```text
//! ReflectionProvider
//!     ↓
//!  [ClosureAnalyzer]   which classes must exist
//!     ↓
//!  [MemberSelector]    which members each wrapper exposes, in slot order
//!     ↓
//!  ├─→ [emit_header]          → a/b/C.h
//!  └─→ [emit_implementation]  → __wrap__.cpp, __wrapNN__.cpp or a/b/C.cpp
//!     ↓
//!  [ModuleAggregator]  module-level files
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use jbridge_codegen::Generator;
//! use jbridge_core::{ClassPool, GenerationRequest};
//!
//! let pool = ClassPool::from_path("classes.json").unwrap();
//! let request = GenerationRequest::from_path("jbridge.toml").unwrap();
//!
//! let output = Generator::new(&pool, &request).generate().unwrap();
//! output.write_to(&request.output).unwrap();
//! ```
//!
//! # Determinism
//!
//! Emission rounds, member lists, forward declarations and includes are all
//! ordered by name, so the same input always yields byte-identical output and
//! slot indices stay stable across regenerations.

pub mod aggregator;
pub mod closure;
pub mod emit;
pub mod generator;
pub mod header;
pub mod implementation;
pub mod jvm_types;
pub mod members;
pub mod namespace;
pub mod naming;
pub mod partition;
pub mod signature;
pub mod source;

#[cfg(test)]
mod test_support;

pub use aggregator::{EmittedClass, ManifestAggregator, ModuleAggregator, ModuleSummary};
pub use closure::{BOOTSTRAP_CLASSES, ClosureAnalyzer, TypeSet};
pub use emit::EmitContext;
pub use generator::{GeneratedFile, GenerationOutput, Generator};
pub use header::emit_header;
pub use implementation::emit_implementation;
pub use members::{Dispatch, MemberSelector, MemberTable, SelectedMethod, StaticField};
pub use naming::ReservedWords;
