//! Shared fixtures for the integration tests
//!
//! The dummy namespace `acme.dummy` holds eight types: four classes, an
//! interface, an annotation, an enum and a member type. Its `sub` namespace
//! holds two more classes. Every type is registered in a catalog and has an
//! artifact under `<tempdir>/test-classes`.

#![allow(dead_code)]

use beancheck::{DirectoryLoader, NamespaceLoader};
use beancheck_reflect::{lang, ClassBuilder, PrimitiveKind, TypeCatalog, TypeDescriptor, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const DUMMY_NAMESPACE: &str = "acme.dummy";
pub const SUB_NAMESPACE: &str = "acme.dummy.sub";

/// Artifact order of the dummy namespace (`$` sorts before `.`)
pub const DUMMY_TYPES: [&str; 8] = [
    "acme.dummy.DummyAnnotation",
    "acme.dummy.DummyEnum",
    "acme.dummy.DummyException",
    "acme.dummy.DummyInterface",
    "acme.dummy.DummyObject",
    "acme.dummy.Outer$Inner",
    "acme.dummy.Outer",
    "acme.dummy.Plain",
];

pub const SUB_TYPES: [&str; 2] = ["acme.dummy.sub.SubOne", "acme.dummy.sub.SubTwo"];

pub fn prim(kind: PrimitiveKind) -> TypeDescriptor {
    lang::primitive(kind)
}

pub fn boxed(kind: PrimitiveKind) -> TypeDescriptor {
    lang::boxed(kind).unwrap()
}

/// A class with one accessor pair per supported property type
pub fn dummy_object(enum_type: &TypeDescriptor) -> ClassBuilder {
    ClassBuilder::class("acme.dummy.DummyObject")
        .property("str", &lang::string())
        .property("int", &prim(PrimitiveKind::Int))
        .property("integer", &boxed(PrimitiveKind::Int))
        .property("lng", &prim(PrimitiveKind::Long))
        .property("long2", &boxed(PrimitiveKind::Long))
        .property("dbl", &prim(PrimitiveKind::Double))
        .property("double2", &boxed(PrimitiveKind::Double))
        .property("flt", &prim(PrimitiveKind::Float))
        .property("float2", &boxed(PrimitiveKind::Float))
        .property("bool", &prim(PrimitiveKind::Boolean))
        .field("bool2", &boxed(PrimitiveKind::Boolean))
        .getter("isBool2", "bool2", &boxed(PrimitiveKind::Boolean))
        .setter("setBool2", "bool2", &boxed(PrimitiveKind::Boolean))
        .property("chr", &prim(PrimitiveKind::Char))
        .property("character", &boxed(PrimitiveKind::Char))
        .property("list", &lang::list())
        .property("array", &lang::array_of(&lang::string()))
        .property("enumType", enum_type)
        .property("date", &lang::date())
        .property("obj", &lang::object())
}

/// Catalog holding the dummy namespaces
pub fn dummy_catalog() -> Arc<TypeCatalog> {
    let catalog = Arc::new(TypeCatalog::new());

    catalog
        .define(ClassBuilder::annotation("acme.dummy.DummyAnnotation"))
        .unwrap();
    let dummy_enum = catalog
        .define(ClassBuilder::enumeration(
            "acme.dummy.DummyEnum",
            &["FIRST", "SECOND"],
        ))
        .unwrap();
    catalog
        .define(ClassBuilder::exception("acme.dummy.DummyException"))
        .unwrap();
    catalog
        .define(
            ClassBuilder::interface("acme.dummy.DummyInterface").method(
                "name",
                &[],
                &lang::string(),
                |_, _| Ok(Value::Null),
            ),
        )
        .unwrap();
    catalog.define(dummy_object(&dummy_enum)).unwrap();
    catalog
        .define(ClassBuilder::class("acme.dummy.Outer").property("label", &lang::string()))
        .unwrap();
    catalog
        .define(
            ClassBuilder::class("acme.dummy.Outer$Inner").property("depth", &prim(PrimitiveKind::Int)),
        )
        .unwrap();
    catalog.define(ClassBuilder::class("acme.dummy.Plain")).unwrap();
    for name in SUB_TYPES {
        catalog.define(ClassBuilder::class(name)).unwrap();
    }

    catalog
}

/// Artifact tree for the dummy namespaces
pub struct ClassSpace {
    pub dir: TempDir,
    pub catalog: Arc<TypeCatalog>,
}

impl ClassSpace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let space = Self {
            dir,
            catalog: dummy_catalog(),
        };
        for name in DUMMY_TYPES.iter().chain(SUB_TYPES.iter()) {
            space.write_artifact(name);
        }
        // never entered: the directory name contains a dot
        let hidden = space.root().join("acme").join("dummy").join("ignored.dir");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("Ghost.type"), b"").unwrap();
        // not an artifact
        fs::write(space.root().join("acme").join("dummy").join("README.txt"), b"").unwrap();
        space
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("test-classes")
    }

    pub fn write_artifact(&self, qualified_name: &str) {
        let path = beancheck::scan::artifact_path(&self.root(), qualified_name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, qualified_name.as_bytes()).unwrap();
    }

    pub fn loader(&self) -> Arc<dyn NamespaceLoader> {
        Arc::new(DirectoryLoader::new([self.root()], Arc::clone(&self.catalog)))
    }

    pub fn get(&self, name: &str) -> TypeDescriptor {
        self.catalog.get(name).unwrap()
    }
}
