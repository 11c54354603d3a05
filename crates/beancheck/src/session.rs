//! Verification session
//!
//! A [`Session`] bundles a host with a synthesis factory so the resolver,
//! introspector and verifiers can be obtained without threading the host
//! through every call.

use beancheck_reflect::ReflectionHost;
use std::sync::Arc;

use crate::introspect::PropertyIntrospector;
use crate::options::SynthesisOptions;
use crate::resolve::ConstructorResolver;
use crate::synth::TypeSynthesisFactory;
use crate::verify::{BeanContractVerifier, ExceptionContractVerifier};

/// A host paired with its synthesis factory
pub struct Session {
    host: Arc<dyn ReflectionHost>,
    factory: TypeSynthesisFactory,
}

impl Session {
    /// Session with default synthesis options
    pub fn new(host: Arc<dyn ReflectionHost>) -> Self {
        Self::with_options(host, SynthesisOptions::default())
    }

    /// Session with explicit synthesis options
    pub fn with_options(host: Arc<dyn ReflectionHost>, options: SynthesisOptions) -> Self {
        let factory = TypeSynthesisFactory::with_options(Arc::clone(&host), options);
        Self { host, factory }
    }

    /// Host the session reflects over
    pub fn host(&self) -> &dyn ReflectionHost {
        self.host.as_ref()
    }

    /// Synthesis factory shared by the verifiers
    pub fn factory(&self) -> &TypeSynthesisFactory {
        &self.factory
    }

    /// Constructor resolver over the session host
    pub fn resolver(&self) -> ConstructorResolver<'_> {
        ConstructorResolver::new(self.host())
    }

    /// Property introspector over the session host
    pub fn introspector(&self) -> PropertyIntrospector<'_> {
        PropertyIntrospector::new(self.host())
    }

    /// Accessor verifier using the session factory
    pub fn bean_verifier(&self) -> BeanContractVerifier<'_> {
        BeanContractVerifier::new(&self.factory)
    }

    /// Exception constructor verifier over the session host
    pub fn exception_verifier(&self) -> ExceptionContractVerifier<'_> {
        ExceptionContractVerifier::new(self.host())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::FieldCriteria;
    use crate::verify::Verdict;
    use beancheck_reflect::{lang, ClassBuilder, TypeCatalog, Value};

    #[test]
    fn test_session_shares_host() {
        let session = Session::with_options(
            Arc::new(TypeCatalog::new()),
            SynthesisOptions::default().with_max_depth(3),
        );
        assert_eq!(session.factory().options().max_depth, 3);
        assert!(session.host().resolve("lang.String").is_some());
        assert_eq!(
            session.factory().synthesize(&lang::string()).unwrap(),
            Value::from("whatever")
        );
    }

    #[test]
    fn test_accessors_share_one_host() {
        let catalog = Arc::new(TypeCatalog::new());
        let session = Session::new(catalog.clone());
        let ty = catalog
            .define(ClassBuilder::class("acme.Label").property("text", &lang::string()))
            .unwrap();

        let pairs = session
            .introspector()
            .find_accessor_pairs(&ty, &FieldCriteria::default())
            .unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(session.resolver().find_best_constructor(&ty).unwrap().arity(), 0);
        assert!(session
            .bean_verifier()
            .verify_type(&ty, &FieldCriteria::default())
            .unwrap()
            .is_success());
    }

    #[test]
    fn test_exception_verifier_from_session() {
        let session = Session::new(Arc::new(TypeCatalog::new()));
        let report = session
            .exception_verifier()
            .verify(&lang::runtime_exception())
            .unwrap();
        assert_eq!(report.passed(), 4);
    }
}
