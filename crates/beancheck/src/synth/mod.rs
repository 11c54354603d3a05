//! Synthetic value factory
//!
//! [`TypeSynthesisFactory`] produces a plausible value of any requested type
//! by trying, in order:
//!
//! 1. the basic-type rules of its [`RuleRegistry`]
//! 2. a stub, for types that are not final
//! 3. the narrowest constructor, synthesizing each argument recursively
//!
//! Recursive construction keeps the chain of types being built. A reference
//! parameter whose type is already on the chain receives `null`, and chains
//! longer than [`SynthesisOptions::max_depth`] fail.

mod rules;
mod temporal;

pub use rules::{
    BasicTypeRule, Generator, Predicate, RuleRegistry, BYTE_VALUE, CHAR_VALUE, FLOATING_VALUE,
    INTEGRAL_VALUE, STRING_VALUE,
};

use beancheck_reflect::{ReflectionHost, TypeDescriptor, Value};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{ProbeError, Result};
use crate::options::SynthesisOptions;
use crate::resolve::ConstructorResolver;

/// Produces synthetic values of arbitrary types
pub struct TypeSynthesisFactory {
    host: Arc<dyn ReflectionHost>,
    rules: RwLock<RuleRegistry>,
    options: SynthesisOptions,
}

impl TypeSynthesisFactory {
    /// Factory with the built-in rules and default options
    pub fn new(host: Arc<dyn ReflectionHost>) -> Self {
        Self::with_options(host, SynthesisOptions::default())
    }

    /// Factory with the built-in rules and the given options
    pub fn with_options(host: Arc<dyn ReflectionHost>, options: SynthesisOptions) -> Self {
        Self {
            host,
            rules: RwLock::new(RuleRegistry::with_builtins()),
            options,
        }
    }

    /// Host the factory reflects over
    pub fn host(&self) -> &dyn ReflectionHost {
        self.host.as_ref()
    }

    /// Shared handle to the host
    pub fn shared_host(&self) -> Arc<dyn ReflectionHost> {
        Arc::clone(&self.host)
    }

    /// Options in effect
    pub fn options(&self) -> SynthesisOptions {
        self.options
    }

    /// Append a rule; it is consulted after every rule already registered
    pub fn add_rule(&self, rule: BasicTypeRule) {
        debug!(rule = rule.name(), "registering synthesis rule");
        self.rules.write().push(rule);
    }

    /// Names of the registered rules in order
    pub fn rule_names(&self) -> Vec<String> {
        self.rules
            .read()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Produce a value of `ty`
    pub fn synthesize(&self, ty: &TypeDescriptor) -> Result<Value> {
        let mut chain = Vec::new();
        self.synthesize_in(ty, &mut chain)
    }

    /// Produce a real (non-stub) instance of `ty` through its narrowest constructor
    ///
    /// Rules are bypassed for the outer instance; constructor arguments are
    /// synthesized as usual.
    pub fn instantiate(&self, ty: &TypeDescriptor) -> Result<Value> {
        let mut chain = Vec::new();
        self.construct(ty, &mut chain)
    }

    fn synthesize_in(&self, ty: &TypeDescriptor, chain: &mut Vec<TypeDescriptor>) -> Result<Value> {
        if ty.is_void() {
            return Err(instantiation_error(ty, "void has no values"));
        }

        let rule = self.rules.read().find(ty, self.host()).cloned();
        if let Some(rule) = rule {
            trace!(ty = %ty, rule = rule.name(), "synthesizing from rule");
            return rule.generate(ty, self.host());
        }

        if self.options.allow_stubs && !ty.is_final() {
            match self.host.new_stub(ty) {
                Ok(stub) => {
                    debug!(ty = %ty, "synthesized stub");
                    return Ok(stub);
                }
                Err(err) => debug!(ty = %ty, error = %err, "stub unavailable"),
            }
        }

        self.construct(ty, chain)
    }

    fn construct(&self, ty: &TypeDescriptor, chain: &mut Vec<TypeDescriptor>) -> Result<Value> {
        if chain.len() >= self.options.max_depth {
            return Err(instantiation_error(
                ty,
                format!(
                    "construction nested deeper than {} levels",
                    self.options.max_depth
                ),
            ));
        }

        let resolver = ConstructorResolver::new(self.host());
        let candidate = resolver
            .find_best_constructor(ty)
            .ok_or_else(|| instantiation_error(ty, "no constructor available"))?;
        debug!(ty = %ty, constructor = %candidate.handle().signature(), "constructing");

        chain.push(ty.clone());
        let args = candidate
            .params()
            .iter()
            .map(|param| {
                if param.is_reference() && chain.contains(param) {
                    trace!(ty = %param, "cyclic constructor parameter, passing null");
                    Ok(Value::Null)
                } else {
                    self.synthesize_in(param, chain)
                }
            })
            .collect::<Result<Vec<_>>>();
        chain.pop();

        resolver
            .create_with(&candidate, &args?)
            .map_err(|err| instantiation_error(ty, err.to_string()))
    }
}

fn instantiation_error(ty: &TypeDescriptor, reason: impl Into<String>) -> ProbeError {
    ProbeError::ObjectInstantiation {
        type_name: ty.to_string(),
        reason: reason.into(),
    }
}

/// Runtime types of `values`; `None` for `null`
pub fn classes_for_values(values: &[Value]) -> Vec<Option<TypeDescriptor>> {
    values.iter().map(Value::type_descriptor).collect()
}
