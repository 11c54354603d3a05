//! Beancheck reflection layer
//!
//! This crate provides the type system the verification engine reflects over:
//! - Type descriptors with kinds, modifiers and supertypes
//! - Runtime values, objects, collections, arrays and date/time values
//! - Method and constructor handles with invocable bodies
//! - The [`ReflectionHost`] capability trait
//! - [`TypeCatalog`], an in-memory host populated through [`ClassBuilder`]
//! - The built-in `lang`, `util` and `time` types

#![warn(missing_docs)]

pub mod builder;
pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod handle;
pub mod host;
pub mod lang;
pub mod object;
pub mod value;

pub use builder::{ClassBuilder, ExceptionShape};
pub use catalog::{ClassDef, TypeCatalog};
pub use descriptor::{
    Modifiers, PrimitiveKind, TypeDescriptor, TypeKind, MEMBER_SEPARATOR, NAMESPACE_SEPARATOR,
    OBJECT_TYPE_NAME,
};
pub use error::{CatalogError, InvokeError};
pub use handle::{ConstructorBody, ConstructorHandle, MethodBody, MethodHandle, Visibility};
pub use host::{FieldInfo, ReflectionHost};
pub use object::{Instance, ObjectRef};
pub use value::{ArrayRef, CollectionRef, EnumConstant, Temporal, Value};
