#![allow(non_snake_case)]

use super::*;
use jbridge_core::{ClassPool, ClassRequest, ClassSpec, ErrorCategory, MethodSpec, Modifiers};
use std::cell::RefCell;

fn pool() -> ClassPool {
    ClassPool::from_specs(vec![
        ClassSpec::class("com.acme.Widget")
            .method(MethodSpec::new("part", "com.acme.Part", &[]))
            .method(
                MethodSpec::new("secret", "com.acme.Secret", &[])
                    .with_modifiers(Modifiers::PRIVATE),
            ),
        ClassSpec::class("com.acme.Part"),
        ClassSpec::class("com.acme.Secret"),
        ClassSpec::class("com.other.Gadget"),
    ])
    .unwrap()
}

fn request() -> GenerationRequest {
    GenerationRequest::new()
        .with_class("com.acme.Widget")
        .with_package("com.acme")
}

// ============================================================================
// Rounds
// ============================================================================

#[test]
fn generate___emits_bootstrap_requested_and_reached_classes() {
    let pool = pool();
    let request = request();

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert_eq!(
        output.emitted,
        vec![
            "com.acme.Widget",
            "java.lang.Class",
            "java.lang.Exception",
            "java.lang.Object",
            "java.lang.RuntimeException",
            "java.lang.String",
            "java.lang.Throwable",
            "com.acme.Part",
        ]
    );
    assert!(!output.emitted.contains(&"com.acme.Secret".to_string()));
}

#[test]
fn generate___listed_member___reaches_its_types() {
    let pool = pool();
    let mut request = request();
    request.add_class("com.acme.Widget:secret").unwrap();

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert!(output.emitted.contains(&"com.acme.Secret".to_string()));
}

#[test]
fn generate___requested_class_outside_packages___is_still_wrapped() {
    let pool = pool();
    let request = request().with_class("com.other.Gadget");

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert!(output.emitted.contains(&"com.other.Gadget".to_string()));
}

#[test]
fn generate___excluded_request___is_skipped() {
    let pool = pool();
    let request = request()
        .with_class("com.other.Gadget")
        .with_exclude("com.other.Gadget");

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert!(!output.emitted.contains(&"com.other.Gadget".to_string()));
}

#[test]
fn generate___unknown_class___not_found() {
    let pool = pool();
    let request = request().with_class("com.acme.Missing");

    let err = Generator::new(&pool, &request).generate().unwrap_err();

    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(err.to_string().contains("com.acme.Missing"));
}

#[test]
fn generate___invalid_request___rejected_before_emitting() {
    let pool = pool();
    let mut request = request();
    request.files = FileSplit::Count(0);

    let err = Generator::new(&pool, &request).generate().unwrap_err();

    assert!(matches!(err, BridgeError::Config(_)));
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn generate___single_file___headers_and_wrap_cpp() {
    let pool = pool();
    let request = request();

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert!(output.file("com/acme/Widget.h").is_some());
    assert!(output.file("java/lang/Object.h").is_some());
    let wrap = output.file("__wrap__.cpp").unwrap();
    assert!(wrap.contents.contains("Widget::initializeClass"));
    assert!(wrap.contents.contains("Part::initializeClass"));
    assert_eq!(output.files.len(), output.emitted.len() + 1);
}

#[test]
fn generate___separate___one_cpp_per_class() {
    let pool = pool();
    let mut request = request();
    request.files = FileSplit::Separate;

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert!(output.file("com/acme/Widget.cpp").is_some());
    assert!(output.file("java/lang/String.cpp").is_some());
    assert!(output.file("__wrap__.cpp").is_none());
    assert_eq!(output.files.len(), output.emitted.len() * 2);
}

#[test]
fn generate___module___writes_below_module_dir_with_manifest() {
    let pool = pool();
    let mut request = request();
    request.module = Some(ModuleConfig::new("acme"));

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert!(output.file("_acme/com/acme/Widget.h").is_some());
    assert!(output.file("_acme/__wrap__.cpp").is_some());
    let manifest = output.file("_acme/acme.json").unwrap();
    let summary: ModuleSummary = serde_json::from_str(&manifest.contents).unwrap();
    assert_eq!(summary.module, "acme");
    assert_eq!(summary.emitted.len(), output.emitted.len());
    assert_eq!(summary.typeset, output.typeset);
}

struct Recording<'s> {
    seen: &'s RefCell<Vec<String>>,
}

impl ModuleAggregator for Recording<'_> {
    fn aggregate(&self, summary: &ModuleSummary, _cpp_dir: &Path) -> BridgeResult<Vec<GeneratedFile>> {
        self.seen
            .borrow_mut()
            .extend(summary.emitted.iter().map(|c| c.wrapper_name.clone()));
        Ok(Vec::new())
    }
}

#[test]
fn generate___custom_aggregator___receives_wrapper_names() {
    let pool = pool();
    let mut request = request();
    request.module = Some(ModuleConfig::new("acme"));
    request
        .renames
        .insert("com.acme.Part".to_string(), "AcmePart".to_string());
    let seen = RefCell::new(Vec::new());

    let output = Generator::new(&pool, &request)
        .with_aggregator(Recording { seen: &seen })
        .generate()
        .unwrap();

    assert!(output.file("_acme/acme.json").is_none());
    assert!(seen.borrow().contains(&"AcmePart".to_string()));
    assert!(seen.borrow().contains(&"Widget".to_string()));
}

// ============================================================================
// Wrapper names
// ============================================================================

#[test]
fn WrapperNames___without_module___assigns_nothing() {
    let renames = BTreeMap::new();
    let mut names = WrapperNames::new(None, &renames);

    assert_eq!(names.register("a.Widget", "Widget").unwrap(), None);
    assert_eq!(names.register("b.Widget", "Widget").unwrap(), None);
}

#[test]
fn WrapperNames___duplicate_simple_name___collides() {
    let module = ModuleConfig::new("m");
    let renames = BTreeMap::new();
    let mut names = WrapperNames::new(Some(&module), &renames);
    names.register("a.Widget", "Widget").unwrap();

    let err = names.register("b.Widget", "Widget").unwrap_err();

    match err {
        BridgeError::RenameCollision {
            class,
            name,
            existing,
        } => {
            assert_eq!(class, "b.Widget");
            assert_eq!(name, "Widget");
            assert_eq!(existing, "a.Widget");
        }
        other => panic!("expected a rename collision, got {other:?}"),
    }
}

#[test]
fn WrapperNames___rename___resolves_collision() {
    let module = ModuleConfig::new("m");
    let renames = BTreeMap::from([("b.Widget".to_string(), "BWidget".to_string())]);
    let mut names = WrapperNames::new(Some(&module), &renames);
    names.register("a.Widget", "Widget").unwrap();

    assert_eq!(
        names.register("b.Widget", "Widget").unwrap(),
        Some("BWidget".to_string())
    );
}

#[test]
fn WrapperNames___full_names___never_collide() {
    let module = ModuleConfig {
        use_full_names: true,
        ..ModuleConfig::new("m")
    };
    let renames = BTreeMap::new();
    let mut names = WrapperNames::new(Some(&module), &renames);
    names.register("a.Widget", "Widget").unwrap();

    assert_eq!(
        names.register("b.Widget", "Widget").unwrap(),
        Some("b.Widget".to_string())
    );
}

#[test]
fn generate___module_name_collision___fails_run() {
    let pool = ClassPool::from_specs(vec![
        ClassSpec::class("com.acme.a.Item"),
        ClassSpec::class("com.acme.b.Item"),
    ])
    .unwrap();
    let mut request = GenerationRequest::new()
        .with_class("com.acme.a.Item")
        .with_class("com.acme.b.Item");
    request.module = Some(ModuleConfig::new("acme"));

    let err = Generator::new(&pool, &request).generate().unwrap_err();

    assert!(matches!(err, BridgeError::RenameCollision { .. }));
}

// ============================================================================
// Imports
// ============================================================================

#[test]
fn generate___imported_headers___are_not_emitted_again() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("java/lang")).unwrap();
    std::fs::write(dir.path().join("java/lang/Object.h"), "").unwrap();
    std::fs::write(dir.path().join("java/lang/String.h"), "").unwrap();
    std::fs::write(dir.path().join("JObject.h"), "").unwrap();
    std::fs::write(dir.path().join("java/lang/notes.txt"), "").unwrap();
    let pool = pool();
    let mut request = request();
    request.imports = vec![dir.path().to_path_buf()];

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert_eq!(output.imported, vec!["java.lang.Object", "java.lang.String"]);
    assert!(!output.emitted.contains(&"java.lang.Object".to_string()));
    assert!(output.file("java/lang/Object.h").is_none());
    assert!(output.typeset.contains(&"java.lang.Object".to_string()));
}

#[test]
fn generate___missing_import_dir___io_error() {
    let dir = tempfile::tempdir().unwrap();
    let pool = pool();
    let mut request = request();
    request.imports = vec![dir.path().join("absent")];

    let err = Generator::new(&pool, &request).generate().unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Io);
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn write_to___creates_package_directories() {
    let dir = tempfile::tempdir().unwrap();
    let pool = pool();
    let request = request();
    let output = Generator::new(&pool, &request).generate().unwrap();

    output.write_to(dir.path()).unwrap();

    let header = std::fs::read_to_string(dir.path().join("com/acme/Widget.h")).unwrap();
    assert_eq!(header, output.file("com/acme/Widget.h").unwrap().contents);
    assert!(dir.path().join("__wrap__.cpp").is_file());
}

#[test]
fn write_to___blocked_directory___io_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("com"), "not a directory").unwrap();
    let pool = pool();
    let request = request();
    let output = Generator::new(&pool, &request).generate().unwrap();

    let err = output.write_to(dir.path()).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Io);
    assert!(err.to_string().contains("com"));
}

#[test]
fn ClassRequest___members_accumulate_across_entries() {
    let pool = pool();
    let mut request = request();
    request.classes.push(ClassRequest::new("com.acme.Widget").with_member("secret"));

    let output = Generator::new(&pool, &request).generate().unwrap();

    assert!(output.emitted.contains(&"com.acme.Secret".to_string()));
}
