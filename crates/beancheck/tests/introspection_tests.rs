//! Integration tests for property discovery and direct member access

mod common;

use beancheck::{
    invoke_private_method, set_internal_field, FieldCriteria, PropertyIntrospector, ProbeError,
    TypeSynthesisFactory,
};
use beancheck_reflect::{lang, ClassBuilder, PrimitiveKind, TypeCatalog, Value};
use common::{dummy_catalog, prim};
use std::sync::Arc;

const DUMMY_PROPERTIES: [&str; 18] = [
    "array",
    "bool",
    "bool2",
    "character",
    "chr",
    "date",
    "dbl",
    "double2",
    "enumType",
    "float2",
    "flt",
    "int",
    "integer",
    "list",
    "lng",
    "long2",
    "obj",
    "str",
];

#[test]
fn test_dummy_accessor_pairs() {
    let catalog = dummy_catalog();
    let introspector = PropertyIntrospector::new(catalog.as_ref());
    let dummy = catalog.get("acme.dummy.DummyObject").unwrap();

    let pairs = introspector
        .find_accessor_pairs(&dummy, &FieldCriteria::default())
        .unwrap();
    let names: Vec<&str> = pairs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, DUMMY_PROPERTIES.to_vec());

    let bool2 = pairs.iter().find(|p| p.name == "bool2").unwrap();
    assert_eq!(bool2.getter.name(), "isBool2");
    assert_eq!(*bool2.property_type(), lang::boxed(PrimitiveKind::Boolean).unwrap());
}

#[test]
fn test_excluded_properties() {
    let catalog = dummy_catalog();
    let introspector = PropertyIntrospector::new(catalog.as_ref());
    let dummy = catalog.get("acme.dummy.DummyObject").unwrap();

    let criteria = FieldCriteria::builder()
        .exclude_fields(["bool2", "chr"])
        .build();
    let pairs = introspector.find_accessor_pairs(&dummy, &criteria).unwrap();
    assert_eq!(pairs.len(), 16);
    assert!(pairs.iter().all(|p| p.name != "bool2" && p.name != "chr"));

    // class stays excluded even when included explicitly
    let criteria = FieldCriteria::builder().include_fields(["class"]).build();
    assert!(criteria.is_excluded("class"));
    let read_only = introspector
        .find_read_only_properties(&dummy, &criteria)
        .unwrap();
    assert!(read_only.is_empty());
}

#[test]
fn test_mismatched_and_read_only() {
    let catalog = Arc::new(TypeCatalog::new());
    let ty = catalog
        .define(
            ClassBuilder::class("acme.Account")
                .field("balance", &prim(PrimitiveKind::Long))
                .getter("getBalance", "balance", &prim(PrimitiveKind::Long))
                .setter("setBalance", "balance", &prim(PrimitiveKind::Int))
                .read_only("id", &lang::string())
                .read_only("active", &prim(PrimitiveKind::Boolean))
                .write_only("secret", &lang::string()),
        )
        .unwrap();
    let introspector = PropertyIntrospector::new(catalog.as_ref());
    let criteria = FieldCriteria::default();

    assert!(introspector
        .find_accessor_pairs(&ty, &criteria)
        .unwrap()
        .is_empty());
    assert_eq!(
        introspector.find_mismatched_properties(&ty, &criteria).unwrap(),
        vec!["balance".to_string()]
    );
    let read_only: Vec<String> = introspector
        .find_read_only_properties(&ty, &criteria)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(read_only, vec!["active".to_string(), "id".to_string()]);
}

#[test]
fn test_primitive_is_not_a_bean() {
    let catalog = TypeCatalog::new();
    let introspector = PropertyIntrospector::new(&catalog);
    let err = introspector
        .find_accessor_pairs(&prim(PrimitiveKind::Int), &FieldCriteria::default())
        .unwrap_err();
    assert!(err.is_precondition());
}

#[test]
fn test_internal_access_on_dummy() {
    let catalog = dummy_catalog();
    let factory = TypeSynthesisFactory::new(catalog.clone());
    let dummy = catalog.get("acme.dummy.DummyObject").unwrap();
    let bean = factory.instantiate(&dummy).unwrap();

    set_internal_field(catalog.as_ref(), &bean, "str", Value::from("direct")).unwrap();
    assert_eq!(
        invoke_private_method(catalog.as_ref(), &bean, "getStr", &[]).unwrap(),
        Value::from("direct")
    );
    assert!(matches!(
        set_internal_field(catalog.as_ref(), &bean, "nope", Value::Null),
        Err(ProbeError::NoSuchField { .. })
    ));

    // stubs carry no fields
    let stub = factory.synthesize(&dummy).unwrap();
    assert!(matches!(
        set_internal_field(catalog.as_ref(), &stub, "str", Value::from("x")),
        Err(ProbeError::NoSuchField { .. })
    ));
}
