//! Wrapper class definitions (`.cpp` bodies).
//!
//! Each wrapper gets:
//!
//! - out-of-line definitions of its static storage
//! - `initializeClass`, the lazy metadata initializer filling the id arrays
//! - constructor, method and field accessor bodies forwarding through `env`
//!
//! With thread-safe initialization the `Uninitialized -> Live` transition runs
//! under one process-wide recursive mutex and is published through an atomic
//! flag. Recursion lets initializers nest while static field wrappers are
//! constructed.

use crate::emit::{ClassNames, EmitContext, INIT_MUTEX, field_slot};
use crate::members::{Dispatch, MemberTable, SelectedMethod};
use crate::naming;
use crate::signature;
use crate::source::SourceBuffer;
use jbridge_core::{BridgeResult, Primitive, ReflectionProvider};

/// Render the implementation of one wrapper class
pub fn emit_implementation<P: ReflectionProvider + ?Sized>(
    ctx: &EmitContext<'_, P>,
    table: &MemberTable<'_>,
) -> BridgeResult<String> {
    let names = ctx.class_names(table);
    let mut out = SourceBuffer::new();

    out.line(0, "#include <jni.h>");
    out.line(0, "#include \"JCCEnv.h\"");
    out.line(0, &format!("#include \"{}\"", naming::include_path(&names.dotted)));
    for name in ctx.referenced(table) {
        out.line(0, &format!("#include \"{}\"", naming::include_path(name)));
    }
    out.line(0, "#include \"JArray.h\"");

    out.blank();
    let mut indent = 0;
    for package in &names.packages {
        out.line(indent, &format!("namespace {package} {{"));
        indent += 1;
    }

    out.blank();
    storage(ctx, table, &names, &mut out, indent)?;

    out.blank();
    initializer(ctx, table, &names, &mut out, indent)?;

    constructors(ctx, table, &names, &mut out, indent)?;
    for selected in &table.methods {
        method(ctx, table, &names, selected, &mut out, indent)?;
    }
    fields(ctx, table, &names, &mut out, indent)?;

    while indent > 0 {
        indent -= 1;
        out.line(indent, "}");
    }
    Ok(out.into_string())
}

fn storage<P: ReflectionProvider + ?Sized>(
    ctx: &EmitContext<'_, P>,
    table: &MemberTable<'_>,
    names: &ClassNames,
    out: &mut SourceBuffer,
    indent: usize,
) -> BridgeResult<()> {
    let class = &names.simple;
    let mapper = ctx.mapper(table.class);

    out.line(indent, &format!("::java::lang::Class *{class}::class$ = NULL;"));
    out.line(indent, &format!("jmethodID *{class}::mids$ = NULL;"));
    if table.has_field_slots() {
        out.line(indent, &format!("jfieldID *{class}::fids$ = NULL;"));
    }
    if ctx.thread_safe_init {
        out.line(indent, &format!("::std::atomic<bool> {class}::live$(false);"));
    } else {
        out.line(indent, &format!("bool {class}::live$ = false;"));
    }

    for field in &table.static_fields {
        let ty = mapper.type_name(&field.field.field_type, false)?;
        let name = &field.cpp_name;
        if mapper.is_primitive(&field.field.field_type) {
            out.line(indent, &format!("{ty} {class}::{name} = ({ty}) 0;"));
        } else {
            out.line(indent, &format!("{ty} *{class}::{name} = NULL;"));
        }
    }
    Ok(())
}

fn initializer<P: ReflectionProvider + ?Sized>(
    ctx: &EmitContext<'_, P>,
    table: &MemberTable<'_>,
    names: &ClassNames,
    out: &mut SourceBuffer,
    indent: usize,
) -> BridgeResult<()> {
    let provider = ctx.provider;
    let mapper = ctx.mapper(table.class);
    let live = if ctx.thread_safe_init { "live$.load()" } else { "live$" };

    out.line(indent, &format!("jclass {}::initializeClass(bool getOnly)", names.simple));
    out.line(indent, "{");
    out.line(indent + 1, "if (getOnly)");
    out.line(
        indent + 2,
        &format!("return (jclass) ({live} ? class$->this$ : NULL);"),
    );

    let mut body = indent + 1;
    if ctx.thread_safe_init {
        out.line(body, "if (!live$.load())");
        out.line(body, "{");
        out.line(
            body + 1,
            &format!("::std::lock_guard< ::std::recursive_mutex > lock(::{INIT_MUTEX}());"),
        );
        body += 1;
    }
    out.line(body, "if (class$ == NULL)");
    out.line(body, "{");
    let inner = body + 1;
    out.line(
        inner,
        &format!(
            "jclass cls = (jclass) env->findClass(\"{}\");",
            signature::class_path(&names.dotted)
        ),
    );

    if table.has_method_slots() {
        out.blank();
        out.line(inner, "mids$ = new jmethodID[max_mid];");
        for constructor in &table.constructors {
            let sig = signature::constructor(provider, constructor)?;
            out.line(
                inner,
                &format!(
                    "mids$[{}] = env->getMethodID(cls, \"<init>\", \"{sig}\");",
                    ctx.constructor_slot(constructor)?
                ),
            );
        }
        let methods = table
            .methods
            .iter()
            .map(|selected| selected.method)
            .chain(table.protected_methods.iter().copied());
        for method in methods {
            let sig = signature::method(provider, method)?;
            let qualifier = if method.modifiers.is_static() { "Static" } else { "" };
            out.line(
                inner,
                &format!(
                    "mids$[{}] = env->get{qualifier}MethodID(cls, \"{}\", \"{sig}\");",
                    ctx.method_slot(method)?,
                    method.name
                ),
            );
        }
    }

    if table.has_field_slots() {
        out.blank();
        out.line(inner, "fids$ = new jfieldID[max_fid];");
        for field in &table.instance_fields {
            out.line(
                inner,
                &format!(
                    "fids$[{}] = env->getFieldID(cls, \"{}\", \"{}\");",
                    field_slot(field),
                    field.name,
                    signature::field(provider, field)?
                ),
            );
        }
    }

    out.blank();
    out.line(inner, "class$ = (::java::lang::Class *) new JObject(cls);");

    if !table.static_fields.is_empty() {
        out.line(inner, "cls = (jclass) class$->this$;");
        out.blank();
        for field in &table.static_fields {
            let java_name = &field.field.name;
            let line = match mapper.primitive(&field.field.field_type) {
                Some(primitive) => format!(
                    "{} = env->getStatic{}Field(cls, \"{java_name}\");",
                    field.cpp_name,
                    primitive.accessor_suffix()
                ),
                None => format!(
                    "{} = new {}(env->getStaticObjectField(cls, \"{java_name}\", \"{}\"));",
                    field.cpp_name,
                    mapper.type_name(&field.field.field_type, false)?,
                    signature::field(provider, field.field)?
                ),
            };
            out.line(inner, &line);
        }
    }

    if ctx.thread_safe_init {
        out.line(inner, "live$.store(true);");
    } else {
        out.line(inner, "live$ = true;");
    }
    out.line(body, "}");
    if ctx.thread_safe_init {
        out.line(indent + 1, "}");
    }
    out.line(indent + 1, "return (jclass) class$->this$;");
    out.line(indent, "}");
    Ok(())
}

fn constructors<P: ReflectionProvider + ?Sized>(
    ctx: &EmitContext<'_, P>,
    table: &MemberTable<'_>,
    names: &ClassNames,
    out: &mut SourceBuffer,
    indent: usize,
) -> BridgeResult<()> {
    let mapper = ctx.mapper(table.class);
    let class = &names.simple;

    for constructor in &table.constructors {
        let (decls, args) = mapper.arg_names(&constructor.parameter_types)?;
        out.blank();
        out.line(
            indent,
            &format!(
                "{class}::{class}({decls}) : {}(env->newObject(initializeClass, &mids$, {}{args})) {{}}",
                names.base,
                ctx.constructor_slot(constructor)?
            ),
        );
    }
    Ok(())
}

fn method<P: ReflectionProvider + ?Sized>(
    ctx: &EmitContext<'_, P>,
    table: &MemberTable<'_>,
    names: &ClassNames,
    selected: &SelectedMethod<'_>,
    out: &mut SourceBuffer,
    indent: usize,
) -> BridgeResult<()> {
    let mapper = ctx.mapper(table.class);
    let method = selected.method;

    let (qualifier, this, midns, slot) = match selected.dispatch {
        Dispatch::Unavailable => return Ok(()),
        Dispatch::Static => ("Static", "cls".to_string(), String::new(), ctx.method_slot(method)?),
        Dispatch::Virtual => ("", "this$".to_string(), String::new(), ctx.method_slot(method)?),
        Dispatch::NonVirtual { target } => (
            "Nonvirtual",
            format!("this$, (jclass) {}::class$->this$", names.base),
            format!("{}::", mapper.class_name(target.declaring_class)),
            ctx.method_slot(target)?,
        ),
    };
    let is_static = matches!(selected.dispatch, Dispatch::Static);
    let (decls, args) = mapper.arg_names(&method.parameter_types)?;
    let return_type = mapper.type_name(&method.return_type, false)?;

    out.blank();
    out.line(
        indent,
        &format!(
            "{return_type} {}::{}({decls}){}",
            names.simple,
            ctx.reserved.cpp_name(&method.name),
            if is_static { "" } else { " const" }
        ),
    );
    out.line(indent, "{");
    if is_static {
        out.line(indent + 1, "jclass cls = env->getClass(initializeClass);");
    }
    let call = format!("{this}, {midns}mids$[{midns}{slot}]{args}");
    match mapper.primitive(&method.return_type) {
        Some(primitive) => {
            let ret = if primitive == Primitive::Void {
                ""
            } else {
                "return "
            };
            out.line(
                indent + 1,
                &format!(
                    "{ret}env->call{qualifier}{}Method({call});",
                    primitive.accessor_suffix()
                ),
            );
        }
        None => out.line(
            indent + 1,
            &format!("return {return_type}(env->call{qualifier}ObjectMethod({call}));"),
        ),
    }
    out.line(indent, "}");
    Ok(())
}

fn fields<P: ReflectionProvider + ?Sized>(
    ctx: &EmitContext<'_, P>,
    table: &MemberTable<'_>,
    names: &ClassNames,
    out: &mut SourceBuffer,
    indent: usize,
) -> BridgeResult<()> {
    let mapper = ctx.mapper(table.class);
    let class = &names.simple;

    for field in &table.instance_fields {
        let name = &field.name;
        let slot = field_slot(field);
        let ty = mapper.type_name(&field.field_type, false)?;
        let primitive = mapper.primitive(&field.field_type);

        out.blank();
        out.line(indent, &format!("{ty} {class}::_get_{name}() const"));
        out.line(indent, "{");
        match primitive {
            Some(p) => out.line(
                indent + 1,
                &format!("return env->get{}Field(this$, fids$[{slot}]);", p.accessor_suffix()),
            ),
            None => out.line(
                indent + 1,
                &format!("return {ty}(env->getObjectField(this$, fids$[{slot}]));"),
            ),
        }
        out.line(indent, "}");

        if field.modifiers.is_final() {
            continue;
        }
        out.blank();
        out.line(
            indent,
            &format!(
                "void {class}::_set_{name}({} a0) const",
                mapper.type_name(&field.field_type, true)?
            ),
        );
        out.line(indent, "{");
        match primitive {
            Some(p) => out.line(
                indent + 1,
                &format!("env->set{}Field(this$, fids$[{slot}], a0);", p.accessor_suffix()),
            ),
            None => out.line(
                indent + 1,
                &format!("env->setObjectField(this$, fids$[{slot}], a0.this$);"),
            ),
        }
        out.line(indent, "}");
    }
    Ok(())
}
