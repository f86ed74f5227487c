#![allow(non_snake_case)]

use super::*;
use crate::error::ErrorCategory;

const DUMP: &str = r#"{
  "classes": [
    {
      "name": "com/acme/Widget",
      "interfaces": ["java.lang.Comparable"],
      "generic_interfaces": [
        { "parameterized": { "raw": "java.lang.Comparable",
                             "args": [ { "class": "com.acme.Widget" } ] } }
      ],
      "constructors": [ { "parameters": ["int", "java.lang.String"] } ],
      "methods": [
        { "name": "size", "return_type": "int" },
        { "name": "names", "return_type": "java.lang.String[][]",
          "modifiers": "PUBLIC | STATIC" }
      ],
      "fields": [ { "name": "count", "type": "long", "modifiers": "PUBLIC | FINAL" } ]
    },
    {
      "name": "java.lang.Comparable",
      "interface": true,
      "type_parameters": [ { "variable": { "name": "T" } } ],
      "methods": [ { "name": "compareTo", "return_type": "int",
                     "parameters": ["java.lang.Object"],
                     "generic_parameters": [ { "variable": { "name": "T" } } ] } ]
    }
  ]
}"#;

#[test]
fn ClassPool___new___has_primitives_and_bootstrap_classes() {
    let pool = ClassPool::new();

    for name in [
        "int",
        "void",
        "boolean",
        "java.lang.Object",
        "java.lang.Class",
        "java.lang.String",
        "java.lang.Throwable",
        "java.lang.Exception",
        "java.lang.RuntimeException",
    ] {
        assert!(pool.find_class(name).is_ok(), "missing {name}");
    }
    assert_eq!(pool.len(), 9 + 6);
}

#[test]
fn ClassPool___bootstrap___exception_hierarchy_is_linked() {
    let pool = ClassPool::new();
    let runtime = pool.find_class("java.lang.RuntimeException").unwrap();
    let throwable = pool.find_class("java.lang.Throwable").unwrap();
    let object = pool.find_class("java.lang.Object").unwrap();

    assert!(pool.is_assignable_from(throwable, runtime));
    assert_eq!(pool.class(object).superclass, None);
}

#[test]
fn ClassPool___from_json___normalizes_slashed_names() {
    let pool = ClassPool::from_json(DUMP).unwrap();

    let by_dots = pool.find_class("com.acme.Widget").unwrap();
    let by_slashes = pool.find_class("com/acme/Widget").unwrap();

    assert_eq!(by_dots, by_slashes);
    assert_eq!(pool.name(by_dots), "com.acme.Widget");
}

#[test]
fn ClassPool___from_json___implicit_superclass_is_object() {
    let pool = ClassPool::from_json(DUMP).unwrap();
    let widget = pool.class(pool.find_class("com.acme.Widget").unwrap());
    let object = pool.find_class("java.lang.Object").unwrap();

    assert_eq!(widget.superclass, Some(object));
    assert_eq!(widget.generic_superclass, Some(TypeRef::Plain(object)));
}

#[test]
fn ClassPool___from_json___interfaces_have_no_superclass() {
    let pool = ClassPool::from_json(DUMP).unwrap();
    let comparable = pool.class(pool.find_class("java.lang.Comparable").unwrap());

    assert!(comparable.is_interface());
    assert_eq!(comparable.superclass, None);
}

#[test]
fn ClassPool___from_json___parses_array_suffixes() {
    let pool = ClassPool::from_json(DUMP).unwrap();
    let widget = pool.class(pool.find_class("com.acme.Widget").unwrap());
    let string = pool.find_class("java.lang.String").unwrap();

    let names = widget.methods.iter().find(|m| m.name == "names").unwrap();

    assert_eq!(
        names.return_type,
        TypeRef::array_of(TypeRef::array_of(TypeRef::Plain(string)))
    );
    assert!(names.modifiers.is_static());
}

#[test]
fn ClassPool___from_json___generic_lists_default_to_erased() {
    let pool = ClassPool::from_json(DUMP).unwrap();
    let widget = pool.class(pool.find_class("com.acme.Widget").unwrap());

    let constructor = &widget.constructors[0];

    assert_eq!(constructor.parameter_types.len(), 2);
    assert_eq!(constructor.generic_parameter_types, constructor.parameter_types);
}

#[test]
fn ClassPool___from_json___reads_generic_signatures() {
    let pool = ClassPool::from_json(DUMP).unwrap();
    let widget_id = pool.find_class("com.acme.Widget").unwrap();
    let comparable_id = pool.find_class("java.lang.Comparable").unwrap();
    let widget = pool.class(widget_id);
    let comparable = pool.class(comparable_id);

    assert_eq!(
        widget.generic_interfaces,
        vec![TypeRef::Parameterized {
            raw: comparable_id,
            args: vec![TypeRef::Plain(widget_id)],
        }]
    );
    assert_eq!(
        comparable.methods[0].generic_parameter_types,
        vec![TypeRef::TypeVariable {
            name: "T".into(),
            bounds: vec![],
        }]
    );
}

#[test]
fn ClassPool___from_json___field_type_and_modifiers() {
    let pool = ClassPool::from_json(DUMP).unwrap();
    let widget = pool.class(pool.find_class("com.acme.Widget").unwrap());
    let long = pool.find_class("long").unwrap();

    let count = &widget.fields[0];

    assert_eq!(count.field_type, TypeRef::Plain(long));
    assert!(count.modifiers.is_final());
    assert!(!count.modifiers.is_static());
}

#[test]
fn ClassPool___undefined_reference___is_model_error() {
    let result = ClassPool::from_specs(vec![ClassSpec::class("a.B").extends("a.Missing")]);

    let err = result.unwrap_err();
    assert!(matches!(err, BridgeError::Model(_)));
    assert!(err.to_string().contains("a.Missing"));
}

#[test]
fn ClassPool___duplicate_class___is_model_error() {
    let result = ClassPool::from_specs(vec![ClassSpec::class("a.B"), ClassSpec::class("a/B")]);

    assert!(matches!(result, Err(BridgeError::Model(_))));
}

#[test]
fn ClassPool___unknown_type_tag___is_unsupported_type() {
    let json = r#"{ "classes": [ { "name": "a.B", "fields": [
        { "name": "x", "type": "java.lang.Object",
          "generic_type": { "intersection": [] } } ] } ] }"#;

    let err = ClassPool::from_json(json).unwrap_err();

    assert!(matches!(err, BridgeError::UnsupportedType { .. }));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn ClassPool___malformed_json___is_model_error() {
    let err = ClassPool::from_json("{ \"classes\": [ { } ] }").unwrap_err();

    assert!(matches!(err, BridgeError::Model(_)));
}

#[test]
fn ClassPool___find_class___unknown_name_is_not_found() {
    let err = ClassPool::new().find_class("com.acme.Nope").unwrap_err();

    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[test]
fn ClassPool___model_overrides_bootstrap_stub() {
    let pool = ClassPool::from_specs(vec![
        ClassSpec::class("java.lang.String").method(MethodSpec::new("length", "int", &[])),
    ])
    .unwrap();

    let string = pool.class(pool.find_class("java.lang.String").unwrap());

    assert_eq!(string.methods.len(), 1);
    assert_eq!(pool.len(), 9 + 6);
}

#[test]
fn ClassModel___serde___builder_output_loads_back() {
    let model = ClassModel {
        classes: vec![
            ClassSpec::class("a.Box")
                .with_type_parameter(TypeSpec::variable("T", vec![]))
                .method(
                    MethodSpec::new("get", "java.lang.Object", &[])
                        .with_generic_return(TypeSpec::variable("T", vec![])),
                ),
        ],
    };

    let json = serde_json::to_string(&model).unwrap();
    let pool = ClassPool::from_json(&json).unwrap();
    let boxed = pool.class(pool.find_class("a.Box").unwrap());

    assert_eq!(boxed.type_parameters.len(), 1);
    assert_eq!(boxed.methods[0].generic_return_type.kind(), "type variable");
}

#[test]
fn ClassPool___from_path___missing_file_is_io_error() {
    let err = ClassPool::from_path("/nonexistent/jbridge/classes.json").unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Io);
}
