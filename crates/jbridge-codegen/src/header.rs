//! Wrapper class declarations (`.h` files).

use crate::emit::{EmitContext, INIT_MUTEX, INIT_MUTEX_GUARD, field_slot};
use crate::members::MemberTable;
use crate::namespace::Namespace;
use crate::naming;
use crate::source::SourceBuffer;
use jbridge_core::{BridgeResult, ReflectionProvider};

/// Render the header of one wrapper class.
///
/// Declarations use erased types only. Slot enumerations list constructors,
/// then methods, then protected methods, in table order.
pub fn emit_header<P: ReflectionProvider + ?Sized>(
    ctx: &EmitContext<'_, P>,
    table: &MemberTable<'_>,
) -> BridgeResult<String> {
    let names = ctx.class_names(table);
    let mapper = ctx.mapper(table.class);
    let class = &names.simple;
    let mut out = SourceBuffer::new();

    let guard = naming::include_guard(&names.dotted);
    out.line(0, &format!("#ifndef {guard}"));
    out.line(0, &format!("#define {guard}"));
    out.blank();
    out.line(0, &format!("#include \"{}\"", names.base_include));
    if ctx.thread_safe_init {
        out.line(0, "#include <atomic>");
        out.line(0, "#include <mutex>");
        out.blank();
        init_mutex(&mut out);
    }

    out.blank();
    Namespace::from_names(ctx.referenced(table)).render(ctx.reserved, &mut out, 0);
    out.line(0, "template<class T> class JArray;");

    out.blank();
    let mut indent = 0;
    for package in &names.packages {
        out.line(indent, &format!("namespace {package} {{"));
        indent += 1;
    }

    out.blank();
    if names.is_root {
        out.line(indent, &format!("class {class} : public JObject {{"));
    } else {
        out.line(indent, &format!("class {class} : public {} {{", names.base));
    }
    out.line(indent, "public:");
    indent += 1;

    if table.has_method_slots() {
        out.line(indent, "enum {");
        for constructor in &table.constructors {
            out.line(indent + 1, &format!("{},", ctx.constructor_slot(constructor)?));
        }
        for selected in &table.methods {
            out.line(indent + 1, &format!("{},", ctx.method_slot(selected.method)?));
        }
        for method in &table.protected_methods {
            out.line(indent + 1, &format!("{},", ctx.method_slot(method)?));
        }
        out.line(indent + 1, "max_mid");
        out.line(indent, "};");
    }

    if table.has_field_slots() {
        out.blank();
        out.line(indent, "enum {");
        for field in &table.instance_fields {
            out.line(indent + 1, &format!("{},", field_slot(field)));
        }
        out.line(indent + 1, "max_fid");
        out.line(indent, "};");
    }

    out.blank();
    out.line(indent, "static ::java::lang::Class *class$;");
    out.line(indent, "static jmethodID *mids$;");
    if table.has_field_slots() {
        out.line(indent, "static jfieldID *fids$;");
    }
    if ctx.thread_safe_init {
        out.line(indent, "static ::std::atomic<bool> live$;");
    } else {
        out.line(indent, "static bool live$;");
    }
    out.line(indent, "static jclass initializeClass(bool);");
    out.blank();

    out.line(
        indent,
        &format!("explicit {class}(jobject obj) : {}(obj) {{", names.base),
    );
    out.line(indent + 1, "if (obj != NULL)");
    out.line(indent + 2, "env->getClass(initializeClass);");
    out.line(indent, "}");
    out.line(
        indent,
        &format!("{class}(const {class}& obj) : {}(obj) {{}}", names.base),
    );

    if !table.static_fields.is_empty() {
        out.blank();
        for field in &table.static_fields {
            let ty = mapper.type_name(&field.field.field_type, false)?;
            if mapper.is_primitive(&field.field.field_type) {
                out.line(indent, &format!("static {ty} {};", field.cpp_name));
            } else {
                out.line(indent, &format!("static {ty} *{};", field.cpp_name));
            }
        }
    }

    if !table.instance_fields.is_empty() {
        out.blank();
        for field in &table.instance_fields {
            let name = &field.name;
            out.line(
                indent,
                &format!("{} _get_{name}() const;", mapper.type_name(&field.field_type, false)?),
            );
            if !field.modifiers.is_final() {
                out.line(
                    indent,
                    &format!(
                        "void _set_{name}({}) const;",
                        mapper.type_name(&field.field_type, true)?
                    ),
                );
            }
        }
    }

    if !table.constructors.is_empty() {
        out.blank();
        for constructor in &table.constructors {
            let params = mapper.parameter_list(&constructor.parameter_types)?;
            out.line(indent, &format!("{class}({params});"));
        }
    }

    if !table.methods.is_empty() {
        out.blank();
        for selected in &table.methods {
            let method = selected.method;
            let (prefix, suffix) = if method.modifiers.is_static() {
                ("static ", "")
            } else {
                ("", " const")
            };
            out.line(
                indent,
                &format!(
                    "{prefix}{} {}({}){suffix};",
                    mapper.type_name(&method.return_type, false)?,
                    ctx.reserved.cpp_name(&method.name),
                    mapper.parameter_list(&method.parameter_types)?
                ),
            );
        }
    }

    indent -= 1;
    out.line(indent, "};");
    while indent > 0 {
        indent -= 1;
        out.line(indent, "}");
    }

    out.blank();
    out.line(0, "#endif");
    Ok(out.into_string())
}

/// Process-wide lock shared by every initializer.
///
/// A static field initializer constructs wrappers of other classes, which
/// initializes those classes in turn; with one lock per class two threads
/// could take them in opposite orders.
fn init_mutex(out: &mut SourceBuffer) {
    out.line(0, &format!("#ifndef {INIT_MUTEX_GUARD}"));
    out.line(0, &format!("#define {INIT_MUTEX_GUARD}"));
    out.line(0, &format!("inline ::std::recursive_mutex &{INIT_MUTEX}()"));
    out.line(0, "{");
    out.line(1, "static ::std::recursive_mutex mutex;");
    out.line(1, "return mutex;");
    out.line(0, "}");
    out.line(0, "#endif");
}
