#![allow(non_snake_case)]

use super::*;

#[test]
fn GenerationRequest___default___has_expected_values() {
    let request = GenerationRequest::default();

    assert!(request.classes.is_empty());
    assert!(request.generics);
    assert!(request.thread_safe_init);
    assert_eq!(request.files, FileSplit::Count(1));
    assert_eq!(request.output, PathBuf::from("build"));
    assert_eq!(request.extension_marker, "pythonExtension");
    assert!(request.module.is_none());
}

#[test]
fn GenerationRequest___from_toml___partial_file_keeps_defaults() {
    let request = GenerationRequest::from_toml(
        r#"
packages = ["com.acme"]
generics = false
"#,
    )
    .unwrap();

    assert_eq!(request.packages, BTreeSet::from(["com.acme".to_string()]));
    assert!(!request.generics);
    assert_eq!(request.output, PathBuf::from("build"));
    assert!(request.thread_safe_init);
}

#[test]
fn GenerationRequest___from_toml___reads_every_section() {
    let request = GenerationRequest::from_toml(
        r#"
packages = ["com.acme"]
excludes = ["com.acme.internal"]
files = "separate"
reserved = ["interface"]
output = "out"
imports = ["../base/include"]
thread_safe_init = false

[[classes]]
name = "com.acme.Widget"
members = ["resize"]

[renames]
"com.acme.ui.Widget" = "UiWidget"

[module]
name = "acme"
use_full_names = true
"#,
    )
    .unwrap();

    assert_eq!(
        request.classes,
        vec![ClassRequest::new("com.acme.Widget").with_member("resize")]
    );
    assert_eq!(request.files, FileSplit::Separate);
    assert_eq!(request.renames["com.acme.ui.Widget"], "UiWidget");
    assert_eq!(request.reserved, vec!["interface".to_string()]);
    assert_eq!(request.imports, vec![PathBuf::from("../base/include")]);
    assert!(!request.thread_safe_init);
    let module = request.module.unwrap();
    assert_eq!(module.name, "acme");
    assert!(module.use_full_names);
}

#[test]
fn GenerationRequest___from_toml___invalid_is_config_error() {
    let err = GenerationRequest::from_toml("files = \"some\"").unwrap_err();

    assert!(matches!(err, BridgeError::Config(_)));
}

#[test]
fn GenerationRequest___from_path___missing_file_is_io_error() {
    let err = GenerationRequest::from_path("/nonexistent/jbridge.toml").unwrap_err();

    assert!(matches!(err, BridgeError::Io { .. }));
}

#[test]
fn GenerationRequest___add_class___accumulates_members() {
    let mut request = GenerationRequest::new();

    request.add_class("com.acme.Widget:resize").unwrap();
    request.add_class("com.acme.Widget:paint").unwrap();
    request.add_class("com.acme.Widget:resize").unwrap();
    request.add_class("com.acme.Gadget").unwrap();

    assert_eq!(
        request.classes,
        vec![
            ClassRequest::new("com.acme.Widget")
                .with_member("resize")
                .with_member("paint"),
            ClassRequest::new("com.acme.Gadget"),
        ]
    );
}

#[test]
fn GenerationRequest___cpp_dir___module_goes_under_underscore_dir() {
    let mut request = GenerationRequest::new();
    assert_eq!(request.cpp_dir(), PathBuf::from("build"));

    request.module = Some(ModuleConfig::new("acme"));
    assert_eq!(request.cpp_dir(), PathBuf::from("build").join("_acme"));
}

#[test]
fn GenerationRequest___validate___default_is_valid() {
    assert!(GenerationRequest::default().validate().is_ok());
}

#[test]
fn GenerationRequest___validate___rejects_zero_files() {
    let request = GenerationRequest {
        files: FileSplit::Count(0),
        ..GenerationRequest::default()
    };

    assert!(matches!(request.validate(), Err(BridgeError::Config(_))));
}

#[test]
fn GenerationRequest___validate___rejects_empty_class_name() {
    let request = GenerationRequest::new().with_class(" ");

    assert!(matches!(request.validate(), Err(BridgeError::Config(_))));
}

#[test]
fn GenerationRequest___validate___rejects_empty_module_name() {
    let request = GenerationRequest {
        module: Some(ModuleConfig::new("")),
        ..GenerationRequest::default()
    };

    assert!(matches!(request.validate(), Err(BridgeError::Config(_))));
}

#[test]
fn ClassRequest___from_str___splits_member() {
    let request: ClassRequest = "a.b.C:run".parse().unwrap();

    assert_eq!(request.name, "a.b.C");
    assert_eq!(request.members, vec!["run".to_string()]);
}

#[test]
fn ClassRequest___from_str___rejects_empty_parts() {
    assert!("".parse::<ClassRequest>().is_err());
    assert!(":run".parse::<ClassRequest>().is_err());
    assert!("a.b.C:".parse::<ClassRequest>().is_err());
}

#[test]
fn FileSplit___display___matches_textual_form() {
    assert_eq!(FileSplit::Count(4).to_string(), "4");
    assert_eq!(FileSplit::Separate.to_string(), "separate");
}
