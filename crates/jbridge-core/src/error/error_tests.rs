#![allow(non_snake_case)]

use super::*;

#[test]
fn BridgeError___class_not_found___displays_name() {
    let err = BridgeError::ClassNotFound("com.acme.Missing".into());

    assert_eq!(err.to_string(), "class not found: com.acme.Missing");
}

#[test]
fn BridgeError___rename_collision___displays_all_names() {
    let err = BridgeError::RenameCollision {
        class: "com.acme.b.Widget".into(),
        name: "Widget".into(),
        existing: "com.acme.a.Widget".into(),
    };

    let msg = err.to_string();
    assert!(msg.contains("com.acme.b.Widget"));
    assert!(msg.contains("'Widget'"));
    assert!(msg.contains("com.acme.a.Widget"));
}

#[test]
fn BridgeError___io___displays_path() {
    let err = BridgeError::io(
        "/tmp/out/com/acme",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );

    let msg = err.to_string();
    assert!(msg.contains("/tmp/out/com/acme"));
    assert!(msg.contains("denied"));
}

#[test]
fn BridgeError___in_member___prefixes_class_and_member() {
    let err = BridgeError::UnsupportedType {
        kind: "wildcard",
        context: "non-generic traversal".into(),
    }
    .in_member("com.acme.Foo", "bar(Ljava/util/List;)V");

    assert_eq!(
        err.to_string(),
        "com.acme.Foo.bar(Ljava/util/List;)V: unsupported wildcard type reference in non-generic traversal"
    );
}

#[test]
fn BridgeError___in_member___keeps_inner_category_and_code() {
    let inner = BridgeError::ClassNotFound("x.Y".into());
    let code = inner.error_code();

    let err = inner.in_member("x.Z", "f");

    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert_eq!(err.error_code(), code);
}

#[test]
fn BridgeError___from_serde_error___converts_to_model_error() {
    let json_err = serde_json::from_str::<String>("invalid").unwrap_err();

    let err: BridgeError = json_err.into();

    assert!(matches!(err, BridgeError::Model(_)));
}

#[test]
fn BridgeError___from_toml_error___converts_to_config_error() {
    let toml_err = toml::from_str::<toml::Table>("= nope").unwrap_err();

    let err: BridgeError = toml_err.into();

    assert!(matches!(err, BridgeError::Config(_)));
}
