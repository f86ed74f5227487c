//! Naming rules for generated C++ identifiers and paths.
//!
//! Java names map onto C++ names segment by segment:
//!
//! | Java | Function | C++ |
//! |------|----------|-----|
//! | `delete` | [`ReservedWords::cpp_name`] | `delete$` |
//! | `com.acme.Widget` | [`ReservedWords::abs_name`] | `::com::acme::Widget` |
//! | `com.acme.Widget` | [`include_path`] | `com/acme/Widget.h` |
//! | `com.acme.Widget` | [`include_guard`] | `com_acme_Widget_H` |

use std::collections::BTreeSet;

/// Words that may not be used as C++ identifiers in generated code.
///
/// Covers C++ keywords that are legal Java identifiers plus macros commonly
/// defined by platform headers.
pub const DEFAULT_RESERVED: &[&str] = &[
    "delete", "and", "or", "not", "xor", "union", "register", "const", "bool", "operator",
    "typeof", "asm", "mutable", "inline", "typedef", "struct", "extern", "NULL", "DOMAIN",
    "IGNORE", "min", "max", "PREFIX",
];

/// Suffix appended to a reserved identifier
pub const RESERVED_SUFFIX: &str = "$";

/// Suffix appended to a static field shadowed by a method of the same name
pub const SHADOWED_FIELD_SUFFIX: &str = "__";

/// Reserved-word table for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedWords {
    words: BTreeSet<String>,
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self {
            words: DEFAULT_RESERVED.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl ReservedWords {
    /// The built-in table
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table extended with `extra`
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(extra.into_iter().map(|w| w.as_ref().trim().to_string()));
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Escape one identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use jbridge_codegen::naming::ReservedWords;
    ///
    /// let reserved = ReservedWords::new();
    /// assert_eq!(reserved.cpp_name("delete"), "delete$");
    /// assert_eq!(reserved.cpp_name("remove"), "remove");
    /// ```
    pub fn cpp_name(&self, name: &str) -> String {
        if self.contains(name) {
            format!("{name}{RESERVED_SUFFIX}")
        } else {
            name.to_string()
        }
    }

    /// Fully qualified C++ name of a dotted Java class name.
    ///
    /// # Examples
    ///
    /// ```
    /// use jbridge_codegen::naming::ReservedWords;
    ///
    /// let reserved = ReservedWords::new();
    /// assert_eq!(reserved.abs_name("java.lang.String"), "::java::lang::String");
    /// assert_eq!(reserved.abs_name("org.union.Set"), "::org::union$::Set");
    /// ```
    pub fn abs_name(&self, dotted: &str) -> String {
        dotted
            .split('.')
            .map(|segment| format!("::{}", self.cpp_name(segment)))
            .collect()
    }
}

/// Dotted name segments, package first
pub fn segments(dotted: &str) -> Vec<&str> {
    dotted.split('.').collect()
}

/// Header path of a class relative to the output directory
pub fn include_path(dotted: &str) -> String {
    format!("{}.h", dotted.replace('.', "/"))
}

/// Implementation path of a class when each class gets its own file
pub fn source_path(dotted: &str) -> String {
    format!("{}.cpp", dotted.replace('.', "/"))
}

/// Include-guard macro of a class header
pub fn include_guard(dotted: &str) -> String {
    format!("{}_H", dotted.replace('.', "_"))
}

/// Class name a header under an include directory stands for.
///
/// `relative` is the header path relative to that directory; returns `None`
/// for anything but a `.h` file.
pub fn class_name_from_header(relative: &std::path::Path) -> Option<String> {
    let stem = relative.to_str()?.strip_suffix(".h")?;
    Some(stem.replace(['/', '\\'], "."))
}
