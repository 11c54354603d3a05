//! Accessor contract verification
//!
//! Every getter/setter pair must round-trip a synthesized value on a freshly
//! constructed instance. A type that cannot be constructed fails each of its
//! pairs; a type without pairs passes. Read-only properties are checked
//! against the constructors that accept their type: every assignable slot
//! receives the synthesized value, and a constructor that does not hand it
//! through to the getter is reported as a warning.

use beancheck_reflect::{ReflectionHost, TypeDescriptor, Value};
use tracing::{error, trace, warn};

use super::report::{BatchReport, BeanReport, PropertyResult, PropertyVerdict};
use crate::error::{ProbeError, Result};
use crate::introspect::{FieldCriteria, PropertyIntrospector, PropertyPair, ReadOnlyProperty};
use crate::resolve::ConstructorResolver;
use crate::scan::{ClassCriteria, ClassSpaceScanner};
use crate::synth::TypeSynthesisFactory;

/// Checks that bean accessors behave
pub struct BeanContractVerifier<'f> {
    factory: &'f TypeSynthesisFactory,
}

impl<'f> BeanContractVerifier<'f> {
    /// Create a verifier synthesizing values with `factory`
    pub fn new(factory: &'f TypeSynthesisFactory) -> Self {
        Self { factory }
    }

    fn host(&self) -> &'f dyn ReflectionHost {
        self.factory.host()
    }

    /// Verify the accessors of `ty`, skipping properties excluded by `criteria`
    pub fn verify_type(&self, ty: &TypeDescriptor, criteria: &FieldCriteria) -> Result<BeanReport> {
        if ty.is_primitive() || ty.is_array() {
            return Err(ProbeError::precondition(format!(
                "{} cannot be verified as a bean: primitive and array types have no accessors",
                ty
            )));
        }

        let introspector = PropertyIntrospector::new(self.host());
        let mut report = BeanReport::new(ty.name());

        for pair in introspector.find_accessor_pairs(ty, criteria)? {
            let verdict = self.check_pair(ty, &pair);
            report.properties.push(PropertyResult {
                property: pair.name.clone(),
                verdict,
            });
        }

        for property in introspector.find_read_only_properties(ty, criteria)? {
            self.check_read_only(ty, &property, &mut report.warnings);
        }

        Ok(report)
    }

    /// Verify several types; a type that cannot be verified is recorded, not fatal
    pub fn verify_types(
        &self,
        types: &[TypeDescriptor],
        criteria: &FieldCriteria,
    ) -> BatchReport<BeanReport> {
        let mut batch = BatchReport::default();
        for ty in types {
            match self.verify_type(ty, criteria) {
                Ok(report) => batch.push_completed(report),
                Err(err) => {
                    warn!(ty = %ty, error = %err, "bean verification could not run");
                    batch.push_errored(ty.name(), err);
                }
            }
        }
        batch
    }

    /// Scan `namespace` and verify every type found
    pub fn verify_namespace(
        &self,
        scanner: &ClassSpaceScanner,
        namespace: &str,
        class_criteria: &ClassCriteria,
        field_criteria: &FieldCriteria,
    ) -> Result<BatchReport<BeanReport>> {
        let types = scanner.find_classes(namespace, class_criteria)?;
        Ok(self.verify_types(&types, field_criteria))
    }

    fn check_pair(&self, ty: &TypeDescriptor, pair: &PropertyPair) -> PropertyVerdict {
        match self.round_trip(ty, pair) {
            Ok(true) => PropertyVerdict::Passed,
            Ok(false) => {
                let message = format!("Failed when testing field {}", pair.name);
                error!(ty = %ty, property = %pair.name, "{}", message);
                PropertyVerdict::Failed { message }
            }
            Err(err) => {
                let message = format!(
                    "An exception was thrown during test of field {} on bean of type {}: {}",
                    pair.name, ty, err
                );
                error!(ty = %ty, property = %pair.name, "{}", message);
                PropertyVerdict::Failed { message }
            }
        }
    }

    /// Write a synthesized value and read it back
    fn round_trip(&self, ty: &TypeDescriptor, pair: &PropertyPair) -> Result<bool> {
        let host = self.host();
        let expected = self.factory.synthesize(pair.property_type())?;
        let bean = self.factory.instantiate(ty).map_err(|err| {
            warn!(ty = %ty, error = %err, "could not construct bean");
            err
        })?;

        host.invoke(&pair.setter, &bean, &[expected.clone()])?;
        let actual = host.invoke(&pair.getter, &bean, &[])?;
        trace!(
            property = %pair.name,
            expected = %expected,
            actual = %actual,
            "comparing round-tripped value"
        );
        Ok(actual == expected)
    }

    /// Pass a synthesized value through every constructor slot accepting it
    fn check_read_only(
        &self,
        ty: &TypeDescriptor,
        property: &ReadOnlyProperty,
        warnings: &mut Vec<String>,
    ) {
        let host = self.host();
        let property_type = property.property_type();
        let expected = match self.factory.synthesize(property_type) {
            Ok(value) => value,
            Err(err) => {
                trace!(property = %property.name, error = %err, "no value for read-only property");
                return;
            }
        };

        let resolver = ConstructorResolver::new(host);
        for candidate in resolver.find_constructors_accepting_param(ty, property_type) {
            let args: Vec<Value> = candidate
                .params()
                .iter()
                .map(|param| {
                    if param.is_assignable_from(property_type) {
                        expected.clone()
                    } else {
                        Value::default_for(param)
                    }
                })
                .collect();

            let actual = resolver
                .create_with(&candidate, &args)
                .and_then(|instance| Ok(host.invoke(&property.getter, &instance, &[])?));
            match actual {
                Ok(actual) if actual.same(&expected) => {}
                Ok(actual) => {
                    let message = format!(
                        "Constructor {} did not set read-only property {}: expected {}, got {}",
                        candidate.handle().signature(),
                        property.name,
                        expected,
                        actual
                    );
                    warn!(ty = %ty, property = %property.name, "{}", message);
                    warnings.push(message);
                }
                Err(err) => trace!(
                    ty = %ty,
                    property = %property.name,
                    error = %err,
                    "ignoring failure while checking read-only property"
                ),
            }
        }
    }
}
