//! Integration tests for namespace scanning

mod common;

use beancheck::scan::set_context_loader;
use beancheck::{ClassCriteria, ClassSpaceScanner, ProbeError};
use common::{ClassSpace, DUMMY_NAMESPACE, DUMMY_TYPES, SUB_NAMESPACE, SUB_TYPES};

fn names(types: &[beancheck_reflect::TypeDescriptor]) -> Vec<String> {
    types.iter().map(|ty| ty.name().to_string()).collect()
}

fn count(space: &ClassSpace, criteria: ClassCriteria) -> usize {
    ClassSpaceScanner::with_loader(space.loader())
        .find_classes(DUMMY_NAMESPACE, &criteria)
        .unwrap()
        .len()
}

#[test]
fn test_default_scan_lists_namespace() {
    let space = ClassSpace::new();
    let found = ClassSpaceScanner::with_loader(space.loader())
        .find_classes(DUMMY_NAMESPACE, &ClassCriteria::default())
        .unwrap();
    assert_eq!(names(&found), DUMMY_TYPES.to_vec());
}

#[test]
fn test_kind_filters() {
    let space = ClassSpace::new();
    let build = |f: fn(beancheck::ClassCriteriaBuilder) -> beancheck::ClassCriteriaBuilder| {
        f(ClassCriteria::builder()).build().unwrap()
    };

    assert_eq!(count(&space, build(|b| b.exclude_interfaces())), 6);
    assert_eq!(count(&space, build(|b| b.exclude_enums())), 7);
    assert_eq!(count(&space, build(|b| b.exclude_annotations())), 7);
    assert_eq!(count(&space, build(|b| b.exclude_member_types())), 7);
    assert_eq!(count(&space, build(|b| b.exclude_all())), 4);
    assert_eq!(count(&space, build(|b| b.exclude_all().include_enums())), 5);
}

#[test]
fn test_recursive_scan() {
    let space = ClassSpace::new();
    let found = ClassSpaceScanner::with_loader(space.loader())
        .find_classes(DUMMY_NAMESPACE, &ClassCriteria::recursive())
        .unwrap();
    assert_eq!(found.len(), 10);
    for name in SUB_TYPES {
        assert!(names(&found).contains(&name.to_string()));
    }
    assert!(!names(&found).iter().any(|name| name.contains("Ghost")));
}

#[test]
fn test_path_exclusion() {
    let space = ClassSpace::new();
    let criteria = ClassCriteria::builder()
        .recursive_search()
        .exclude_paths(["test-classes"])
        .build()
        .unwrap();
    assert_eq!(count(&space, criteria), 0);

    let criteria = ClassCriteria::builder()
        .recursive_search()
        .exclude_paths([r"[/\\]sub[/\\]"])
        .build()
        .unwrap();
    assert_eq!(count(&space, criteria), 8);
}

#[test]
fn test_result_cap() {
    let space = ClassSpace::new();
    let criteria = ClassCriteria::builder()
        .recursive_search()
        .with_max_results(3)
        .build()
        .unwrap();
    let found = ClassSpaceScanner::with_loader(space.loader())
        .find_classes(DUMMY_NAMESPACE, &criteria)
        .unwrap();
    assert_eq!(names(&found), DUMMY_TYPES[..3].to_vec());
}

#[test]
fn test_package_of_and_missing_namespace() {
    let space = ClassSpace::new();
    let scanner = ClassSpaceScanner::with_loader(space.loader());

    let sub_one = space.get(SUB_TYPES[0]);
    let found = scanner
        .find_classes_in_package_of(&sub_one, &ClassCriteria::default())
        .unwrap();
    assert_eq!(names(&found), SUB_TYPES.to_vec());
    assert_eq!(sub_one.namespace(), SUB_NAMESPACE);

    let found = scanner
        .find_classes("acme.nowhere", &ClassCriteria::default())
        .unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_unregistered_artifact_fails() {
    let space = ClassSpace::new();
    space.write_artifact("acme.dummy.Unregistered");
    let err = ClassSpaceScanner::with_loader(space.loader())
        .find_classes(DUMMY_NAMESPACE, &ClassCriteria::default())
        .unwrap_err();
    assert!(matches!(err, ProbeError::ArtifactLoad { ref name, .. } if name == "acme.dummy.Unregistered"));
}

#[test]
fn test_context_loader() {
    let space = ClassSpace::new();
    let previous = set_context_loader(Some(space.loader()));
    let found = ClassSpaceScanner::new()
        .find_classes(DUMMY_NAMESPACE, &ClassCriteria::default())
        .unwrap();
    set_context_loader(previous);
    assert_eq!(found.len(), 8);
}
