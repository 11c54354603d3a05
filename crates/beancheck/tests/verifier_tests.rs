//! Integration tests for the bean and exception verifiers

mod common;

use beancheck::verify::{BatchOutcome, CAUSE_MESSAGE};
use beancheck::{
    ClassCriteria, ClassSpaceScanner, FieldCriteria, PropertyVerdict, Session, ShapeVerdict,
    Verdict,
};
use beancheck_reflect::{
    lang, ClassBuilder, ExceptionShape, InvokeError, PrimitiveKind, TypeCatalog, Value,
};
use common::{dummy_catalog, prim, ClassSpace, DUMMY_NAMESPACE};
use std::sync::Arc;

fn void() -> beancheck_reflect::TypeDescriptor {
    prim(PrimitiveKind::Void)
}

#[test]
fn test_dummy_object_passes() {
    let catalog = dummy_catalog();
    let session = Session::new(catalog.clone());
    let dummy = catalog.get("acme.dummy.DummyObject").unwrap();

    let report = session
        .bean_verifier()
        .verify_type(&dummy, &FieldCriteria::default())
        .unwrap();
    assert_eq!(report.properties.len(), 18);
    assert_eq!(report.passed(), 18);
    assert!(report.warnings.is_empty());
    assert!(report.into_result().is_ok());
}

#[test]
fn test_broken_setter_fails_its_property() {
    let catalog = Arc::new(TypeCatalog::new());
    let ty = catalog
        .define(
            ClassBuilder::class("acme.Broken")
                .property("name", &lang::string())
                .field("size", &prim(PrimitiveKind::Int))
                .getter("getSize", "size", &prim(PrimitiveKind::Int))
                .method("setSize", &[prim(PrimitiveKind::Int)], &void(), |_, _| {
                    Ok(Value::Null)
                })
                .method("getFlag", &[], &prim(PrimitiveKind::Boolean), |_, _| {
                    Err(InvokeError::Thrown(Value::Null))
                })
                .method("setFlag", &[prim(PrimitiveKind::Boolean)], &void(), |_, _| {
                    Ok(Value::Null)
                }),
        )
        .unwrap();
    let session = Session::new(catalog.clone());

    let report = session
        .bean_verifier()
        .verify_type(&ty, &FieldCriteria::default())
        .unwrap();
    assert_eq!(report.verdict("name"), Some(&PropertyVerdict::Passed));
    assert_eq!(
        report.verdict("size"),
        Some(&PropertyVerdict::Failed {
            message: "Failed when testing field size".to_string()
        })
    );
    match report.verdict("flag") {
        Some(PropertyVerdict::Failed { message }) => assert!(message.starts_with(
            "An exception was thrown during test of field flag on bean of type acme.Broken"
        )),
        other => panic!("unexpected verdict {:?}", other),
    }

    let failure = report.into_result().unwrap_err();
    assert_eq!(failure.failures.len(), 2);

    // excluding the broken properties makes the bean pass
    let criteria = FieldCriteria::builder()
        .exclude_fields(["size", "flag"])
        .build();
    assert!(session
        .bean_verifier()
        .verify_type(&ty, &criteria)
        .unwrap()
        .is_success());
}

#[test]
fn test_read_only_constructor_warning() {
    let catalog = Arc::new(TypeCatalog::new());
    let honest = catalog
        .define(
            ClassBuilder::class("acme.Honest")
                .read_only("id", &lang::string())
                .field_constructor(&["id"]),
        )
        .unwrap();
    let sloppy = catalog
        .define(
            ClassBuilder::class("acme.Sloppy")
                .read_only("id", &lang::string())
                .constructor(&[lang::string()], |this, _| {
                    this.set_field("id", Value::from("fixed"));
                    Ok(())
                }),
        )
        .unwrap();
    let session = Session::new(catalog.clone());
    let verifier = session.bean_verifier();
    let criteria = FieldCriteria::default();

    assert!(verifier.verify_type(&honest, &criteria).unwrap().warnings.is_empty());

    let report = verifier.verify_type(&sloppy, &criteria).unwrap();
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("read-only property id"));
    assert!(report.is_success());
}

#[test]
fn test_read_only_fills_every_assignable_slot() {
    let catalog = Arc::new(TypeCatalog::new());
    let pair = catalog
        .define(
            ClassBuilder::class("acme.Pair")
                .read_only("first", &lang::string())
                .field("second", &lang::string())
                .field_constructor(&["first", "second"]),
        )
        .unwrap();
    let session = Session::new(catalog.clone());

    let report = session
        .bean_verifier()
        .verify_type(&pair, &FieldCriteria::default())
        .unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn test_types_without_accessors_pass() {
    let catalog = dummy_catalog();
    let session = Session::new(catalog.clone());
    let verifier = session.bean_verifier();
    let criteria = FieldCriteria::default();

    for name in [
        "acme.dummy.DummyInterface",
        "acme.dummy.DummyEnum",
        "acme.dummy.DummyAnnotation",
    ] {
        let ty = catalog.get(name).unwrap();
        let report = verifier.verify_type(&ty, &criteria).unwrap();
        assert!(report.properties.is_empty());
        assert!(report.is_success());
    }

    for ty in [prim(PrimitiveKind::Int), lang::array_of(&lang::string())] {
        assert!(verifier.verify_type(&ty, &criteria).unwrap_err().is_precondition());
    }
}

#[test]
fn test_unconstructible_type_fails_per_property() {
    let catalog = Arc::new(TypeCatalog::new());
    let named = catalog
        .define(
            ClassBuilder::interface("acme.Named")
                .method("getName", &[], &lang::string(), |_, _| Ok(Value::Null))
                .method("setName", &[lang::string()], &void(), |_, _| Ok(Value::Null)),
        )
        .unwrap();
    let session = Session::new(catalog.clone());

    let report = session
        .bean_verifier()
        .verify_type(&named, &FieldCriteria::default())
        .unwrap();
    match report.verdict("name") {
        Some(PropertyVerdict::Failed { message }) => assert!(message.starts_with(
            "An exception was thrown during test of field name on bean of type acme.Named"
        )),
        other => panic!("unexpected verdict {:?}", other),
    }
    assert_eq!(report.failures().len(), 1);
}

#[test]
fn test_verify_namespace() {
    let space = ClassSpace::new();
    let session = Session::new(space.catalog.clone());
    let scanner = ClassSpaceScanner::with_loader(space.loader());
    let verifier = session.bean_verifier();

    let batch = verifier
        .verify_namespace(
            &scanner,
            DUMMY_NAMESPACE,
            &ClassCriteria::default(),
            &FieldCriteria::default(),
        )
        .unwrap();
    assert_eq!(batch.len(), 8);
    assert!(batch
        .entries
        .iter()
        .all(|e| matches!(e.outcome, BatchOutcome::Completed(_))));
    assert!(batch.into_result().is_ok());

    let batch = verifier
        .verify_namespace(
            &scanner,
            DUMMY_NAMESPACE,
            &ClassCriteria::builder().exclude_all().build().unwrap(),
            &FieldCriteria::default(),
        )
        .unwrap();
    assert_eq!(batch.len(), 4);
    assert!(batch.is_success());
}

#[test]
fn test_exception_with_all_constructors() {
    let catalog = dummy_catalog();
    let session = Session::new(catalog.clone());
    let ty = catalog.get("acme.dummy.DummyException").unwrap();

    let report = session.exception_verifier().verify(&ty).unwrap();
    assert_eq!(report.shapes.len(), 4);
    assert_eq!(report.passed(), 4);
    for shape in ExceptionShape::ALL {
        assert_eq!(report.verdict(shape.as_str()), Some(&ShapeVerdict::Passed));
    }
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["shapes"][3]["shape"], "(String, Throwable)");
    assert_eq!(json["shapes"][3]["verdict"]["status"], "passed");
}

#[test]
fn test_exception_with_some_constructors() {
    let catalog = Arc::new(TypeCatalog::new());
    let partial = catalog
        .define(
            ClassBuilder::class("acme.PartialException")
                .extends(&lang::exception())
                .exception_constructors(&[ExceptionShape::NoArgs, ExceptionShape::Cause]),
        )
        .unwrap();
    let session = Session::new(catalog.clone());

    let report = session.exception_verifier().verify(&partial).unwrap();
    assert_eq!(report.passed(), 2);
    assert_eq!(report.verdict("(String)"), Some(&ShapeVerdict::Skipped));
    assert_eq!(report.verdict("(String, Throwable)"), Some(&ShapeVerdict::Skipped));
    assert!(report.into_result().is_ok());
}

#[test]
fn test_exception_cause_message() {
    let catalog = Arc::new(TypeCatalog::new());
    let wrapped = catalog
        .define(ClassBuilder::exception("acme.WrappedException"))
        .unwrap();
    let session = Session::new(catalog.clone());
    let resolver = session.resolver();

    let cause = resolver
        .create_with(
            &resolver
                .find_constructor_matching_params(&lang::throwable(), &[lang::string()])
                .unwrap(),
            &[Value::from(CAUSE_MESSAGE)],
        )
        .unwrap();
    let candidate = resolver
        .find_constructor_matching_params(&wrapped, &[lang::throwable()])
        .unwrap();
    let exception = resolver.create_with(&candidate, &[cause]).unwrap();
    assert_eq!(
        exception.as_object().unwrap().get_field("message"),
        Some(Value::from("lang.Throwable: Exception cause"))
    );
}

#[test]
fn test_failing_constructor_is_reported() {
    let catalog = Arc::new(TypeCatalog::new());
    let faulty = catalog
        .define(
            ClassBuilder::class("acme.FaultyException")
                .extends(&lang::runtime_exception())
                .exception_constructors(&[ExceptionShape::NoArgs])
                .constructor(&[lang::string()], |_, _| {
                    Err(InvokeError::Thrown(Value::Null))
                }),
        )
        .unwrap();
    let session = Session::new(catalog.clone());

    let report = session.exception_verifier().verify(&faulty).unwrap();
    assert_eq!(report.verdict("()"), Some(&ShapeVerdict::Passed));
    assert!(matches!(
        report.verdict("(String)"),
        Some(ShapeVerdict::Failed { .. })
    ));
    assert_eq!(report.failures().len(), 1);
}

#[test]
fn test_non_throwable_is_rejected() {
    let session = Session::new(Arc::new(TypeCatalog::new()));
    let err = session.exception_verifier().verify(&lang::string()).unwrap_err();
    assert!(err.is_precondition());

    let batch = session
        .exception_verifier()
        .verify_all(&[lang::string(), lang::exception()]);
    assert_eq!(batch.len(), 2);
    assert!(batch.report("lang.Exception").is_some());
    assert!(!batch.is_success());
}
