//! Fixtures shared by the emitter tests

use crate::closure::{ClosureAnalyzer, TypeSet};
use crate::emit::EmitContext;
use crate::header::emit_header;
use crate::implementation::emit_implementation;
use crate::members::{MemberSelector, MemberTable};
use crate::naming::ReservedWords;
use jbridge_core::{
    ClassPool, ClassSpec, ConstructorSpec, FieldSpec, MethodSpec, Modifiers, ReflectionProvider,
    signature_hash,
};
use std::collections::BTreeSet;

pub(crate) struct EmitFixture {
    pub pool: ClassPool,
    pub packages: BTreeSet<String>,
    pub excludes: BTreeSet<String>,
    pub reserved: ReservedWords,
}

impl EmitFixture {
    pub fn new(specs: Vec<ClassSpec>) -> Self {
        Self {
            pool: ClassPool::from_specs(specs).unwrap(),
            packages: BTreeSet::from(["com.acme".to_string()]),
            excludes: BTreeSet::new(),
            reserved: ReservedWords::new(),
        }
    }

    /// `com.acme.Widget` with two constructors, a static and an instance
    /// method, two instance fields (one final) and two static fields
    pub fn widget() -> Self {
        Self::new(vec![
            ClassSpec::class("com.acme.Widget")
                .constructor(ConstructorSpec::new(&["int"]))
                .constructor(ConstructorSpec::new(&[]))
                .method(MethodSpec::new("size", "int", &[]))
                .method(
                    MethodSpec::new("create", "com.acme.Widget", &["java.lang.String"])
                        .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
                )
                .field(FieldSpec::new("width", "int"))
                .field(FieldSpec::new("id", "long").with_modifiers(Modifiers::PUBLIC | Modifiers::FINAL))
                .field(
                    FieldSpec::new("NAME", "java.lang.String")
                        .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
                )
                .field(FieldSpec::new("MAX", "int").with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC)),
        ])
    }

    pub fn table(&self, name: &str) -> MemberTable<'_> {
        let selector = MemberSelector::new(
            ClosureAnalyzer::new(&self.pool, &self.packages, &self.excludes),
            &self.reserved,
            false,
            "pythonExtension",
        );
        let mut typeset = TypeSet::new();
        selector.analyzer().seed(&mut typeset).unwrap();
        typeset.insert(self.pool.find_class(name).unwrap());
        selector
            .select(self.pool.find_class(name).unwrap(), &[], &mut typeset)
            .unwrap()
    }

    pub fn ctx(&self, thread_safe_init: bool) -> EmitContext<'_, ClassPool> {
        EmitContext::new(&self.pool, &self.reserved).with_thread_safe_init(thread_safe_init)
    }

    pub fn header(&self, name: &str, thread_safe_init: bool) -> String {
        emit_header(&self.ctx(thread_safe_init), &self.table(name)).unwrap()
    }

    pub fn implementation(&self, name: &str, thread_safe_init: bool) -> String {
        emit_implementation(&self.ctx(thread_safe_init), &self.table(name)).unwrap()
    }
}

/// Signature hash as rendered into slot names
pub(crate) fn hash(signature: &str) -> String {
    signature_hash(signature)
}

/// Assert that `text` contains `fragment`, showing both on failure
pub(crate) fn assert_contains(text: &str, fragment: &str) {
    assert!(
        text.contains(fragment),
        "expected fragment:\n{fragment}\nin:\n{text}"
    );
}
