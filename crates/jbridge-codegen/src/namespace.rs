//! Forward-declaration tree of the classes a header references

use crate::naming::ReservedWords;
use crate::source::SourceBuffer;
use std::collections::BTreeMap;

/// One namespace level, built once from a set of dotted class names.
///
/// Entries render in name order so headers are stable across runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Namespace {
    children: BTreeMap<String, Namespace>,
    is_class: bool,
}

impl Namespace {
    /// Build the tree of `names`, each a dotted binary class name
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = Namespace::default();
        for name in names {
            let mut node = &mut root;
            for segment in name.as_ref().split('.') {
                node = node.children.entry(segment.to_string()).or_default();
            }
            node.is_class = true;
        }
        root
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Write `class X;` for classes and nested `namespace x { ... }` blocks
    pub fn render(&self, reserved: &ReservedWords, out: &mut SourceBuffer, indent: usize) {
        for (name, child) in &self.children {
            let name = reserved.cpp_name(name);
            if child.is_class {
                out.line(indent, &format!("class {name};"));
            }
            if !child.children.is_empty() {
                out.line(indent, &format!("namespace {name} {{"));
                child.render(reserved, out, indent + 1);
                out.line(indent, "}");
            }
        }
    }
}
