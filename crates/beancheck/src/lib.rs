//! Beancheck - reflection-driven contract verification
//!
//! This crate checks that types honour the conventions code relies on without
//! hand-written fixtures:
//! - [`TypeSynthesisFactory`] fabricates plausible values of any type
//! - [`ConstructorResolver`] finds and invokes constructors
//! - [`PropertyIntrospector`] discovers getter/setter pairs
//! - [`ClassSpaceScanner`] enumerates the types of a namespace
//! - [`BeanContractVerifier`] round-trips every accessor pair
//! - [`ExceptionContractVerifier`] exercises the conventional exception constructors
//!
//! # Example
//!
//! ```ignore
//! use beancheck::{FieldCriteria, Session};
//! use beancheck_reflect::{ClassBuilder, TypeCatalog, lang};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(TypeCatalog::new());
//! let person = catalog.define(ClassBuilder::class("acme.Person").property("name", &lang::string()))?;
//!
//! let session = Session::new(catalog);
//! session
//!     .bean_verifier()
//!     .verify_type(&person, &FieldCriteria::default())?
//!     .into_result()?;
//! ```

#![warn(missing_docs)]

pub mod access;
pub mod error;
pub mod introspect;
pub mod logging;
pub mod options;
pub mod resolve;
pub mod scan;
pub mod session;
pub mod synth;
pub mod verify;

pub use access::{invoke_private_method, set_internal_field};
pub use error::{ProbeError, Result};
pub use introspect::{
    FieldCriteria, FieldCriteriaBuilder, PropertyIntrospector, PropertyPair, ReadOnlyProperty,
    CLASS_PROPERTY,
};
pub use logging::init_tracing;
pub use options::{SynthesisOptions, DEFAULT_MAX_DEPTH};
pub use resolve::{ConstructorCandidate, ConstructorResolver};
pub use scan::{
    ClassCriteria, ClassCriteriaBuilder, ClassSpaceScanner, DirectoryLoader, NamespaceLoader,
};
pub use session::Session;
pub use synth::{classes_for_values, BasicTypeRule, RuleRegistry, TypeSynthesisFactory};
pub use verify::{
    BatchReport, BeanContractVerifier, BeanReport, ExceptionContractVerifier, ExceptionReport,
    PropertyVerdict, ShapeVerdict, Verdict, VerificationFailure,
};
