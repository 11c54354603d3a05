//! Constructor resolution
//!
//! Constructors are read from the host on every call, so constructors added
//! after a first resolution are picked up by the next one.

use beancheck_reflect::{ConstructorHandle, ReflectionHost, TypeDescriptor, Value};

use crate::error::{ProbeError, Result};

/// A constructor considered for instantiation
#[derive(Debug, Clone)]
pub struct ConstructorCandidate {
    handle: ConstructorHandle,
}

impl ConstructorCandidate {
    /// Type the constructor instantiates
    pub fn declaring_type(&self) -> &TypeDescriptor {
        self.handle.declaring_type()
    }

    /// Parameter types in order
    pub fn params(&self) -> &[TypeDescriptor] {
        self.handle.params()
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.handle.arity()
    }

    /// Underlying handle
    pub fn handle(&self) -> &ConstructorHandle {
        &self.handle
    }
}

/// Finds constructors fit for instantiation
pub struct ConstructorResolver<'h> {
    host: &'h dyn ReflectionHost,
}

impl<'h> ConstructorResolver<'h> {
    /// Create a resolver over `host`
    pub fn new(host: &'h dyn ReflectionHost) -> Self {
        Self { host }
    }

    /// Public constructors of `ty`, or every declared constructor when none is public
    pub fn constructors(&self, ty: &TypeDescriptor) -> Vec<ConstructorCandidate> {
        let declared = self.host.declared_constructors(ty);
        let public: Vec<ConstructorHandle> = declared
            .iter()
            .filter(|ctor| ctor.visibility().is_public())
            .cloned()
            .collect();
        let chosen = if public.is_empty() { declared } else { public };
        chosen
            .into_iter()
            .map(|handle| ConstructorCandidate { handle })
            .collect()
    }

    /// Constructor with the fewest parameters; ties go to the first declared
    pub fn find_best_constructor(&self, ty: &TypeDescriptor) -> Option<ConstructorCandidate> {
        self.constructors(ty)
            .into_iter()
            .min_by_key(|candidate| candidate.arity())
    }

    /// Constructor whose parameters accept `param_types` position by position
    pub fn find_constructor_matching_params(
        &self,
        ty: &TypeDescriptor,
        param_types: &[TypeDescriptor],
    ) -> Result<ConstructorCandidate> {
        self.constructors(ty)
            .into_iter()
            .find(|candidate| {
                candidate.arity() == param_types.len()
                    && candidate
                        .params()
                        .iter()
                        .zip(param_types)
                        .all(|(declared, requested)| declared.is_assignable_from(requested))
            })
            .ok_or_else(|| ProbeError::NoSuchConstructor {
                type_name: ty.to_string(),
            })
    }

    /// Every constructor with at least one parameter accepting `param_type`
    pub fn find_constructors_accepting_param(
        &self,
        ty: &TypeDescriptor,
        param_type: &TypeDescriptor,
    ) -> Vec<ConstructorCandidate> {
        self.constructors(ty)
            .into_iter()
            .filter(|candidate| {
                candidate
                    .params()
                    .iter()
                    .any(|declared| declared.is_assignable_from(param_type))
            })
            .collect()
    }

    /// Instantiate `ty` through its best constructor
    ///
    /// Without explicit arguments every parameter gets its type's default value.
    pub fn create_bean(&self, ty: &TypeDescriptor, args: Option<&[Value]>) -> Result<Value> {
        let candidate = self
            .find_best_constructor(ty)
            .ok_or_else(|| ProbeError::NoSuchConstructor {
                type_name: ty.to_string(),
            })?;
        match args {
            Some(args) => self.create_with(&candidate, args),
            None => {
                let defaults: Vec<Value> =
                    candidate.params().iter().map(Value::default_for).collect();
                self.create_with(&candidate, &defaults)
            }
        }
    }

    /// Invoke a specific constructor
    pub fn create_with(&self, candidate: &ConstructorCandidate, args: &[Value]) -> Result<Value> {
        Ok(self.host.construct(candidate.handle(), args)?)
    }
}
