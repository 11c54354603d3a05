//! Exception constructor verification
//!
//! An exception type should offer the four conventional constructors. Each
//! one present is used to build an instance, which is then raised and caught;
//! the shape passes when the caught value is an instance of the type.

use beancheck_reflect::{lang, ExceptionShape, InvokeError, ReflectionHost, TypeDescriptor, Value};
use tracing::{debug, error};

use super::report::{BatchReport, ExceptionReport, ShapeResult, ShapeVerdict};
use crate::error::{ProbeError, Result};
use crate::resolve::ConstructorResolver;

/// Message passed to message-taking constructors
pub const EXCEPTION_MESSAGE: &str = "Exception message";
/// Message of the cause passed to cause-taking constructors
pub const CAUSE_MESSAGE: &str = "Exception cause";

/// Checks the conventional constructors of exception types
pub struct ExceptionContractVerifier<'h> {
    host: &'h dyn ReflectionHost,
}

fn raise(exception: Value) -> std::result::Result<(), InvokeError> {
    Err(InvokeError::Thrown(exception))
}

impl<'h> ExceptionContractVerifier<'h> {
    /// Create a verifier over `host`
    pub fn new(host: &'h dyn ReflectionHost) -> Self {
        Self { host }
    }

    /// The cause handed to cause-taking constructors
    fn make_cause(&self) -> Result<Value> {
        let resolver = ConstructorResolver::new(self.host);
        let candidate =
            resolver.find_constructor_matching_params(&lang::throwable(), &[lang::string()])?;
        resolver.create_with(&candidate, &[Value::from(CAUSE_MESSAGE)])
    }

    fn arguments(shape: ExceptionShape, cause: &Value) -> Vec<Value> {
        match shape {
            ExceptionShape::NoArgs => Vec::new(),
            ExceptionShape::Message => vec![Value::from(EXCEPTION_MESSAGE)],
            ExceptionShape::Cause => vec![cause.clone()],
            ExceptionShape::MessageAndCause => {
                vec![Value::from(EXCEPTION_MESSAGE), cause.clone()]
            }
        }
    }

    /// Verify every conventional constructor of `ty`
    pub fn verify(&self, ty: &TypeDescriptor) -> Result<ExceptionReport> {
        if !lang::throwable().is_assignable_from(ty) {
            return Err(ProbeError::precondition(format!(
                "{} is not a subtype of {}",
                ty,
                lang::throwable()
            )));
        }

        let cause = self.make_cause()?;
        let resolver = ConstructorResolver::new(self.host);
        let mut report = ExceptionReport {
            type_name: ty.name().to_string(),
            shapes: Vec::new(),
        };

        for shape in ExceptionShape::ALL {
            let verdict = match resolver.find_constructor_matching_params(ty, &shape.params()) {
                Err(_) => {
                    debug!(ty = %ty, shape = shape.as_str(), "constructor shape not declared");
                    ShapeVerdict::Skipped
                }
                Ok(candidate) => {
                    let args = Self::arguments(shape, &cause);
                    match resolver.create_with(&candidate, &args) {
                        Ok(exception) => self.raise_and_catch(ty, exception),
                        Err(err) => ShapeVerdict::Failed {
                            message: format!("construction failed: {}", err),
                        },
                    }
                }
            };
            if let ShapeVerdict::Failed { message } = &verdict {
                error!(ty = %ty, shape = shape.as_str(), "{}", message);
            }
            report.shapes.push(ShapeResult {
                shape: shape.as_str().to_string(),
                verdict,
            });
        }

        Ok(report)
    }

    fn raise_and_catch(&self, ty: &TypeDescriptor, exception: Value) -> ShapeVerdict {
        let caught = match raise(exception) {
            Ok(()) => {
                return ShapeVerdict::Failed {
                    message: "nothing was raised".to_string(),
                }
            }
            Err(err) => err,
        };
        match caught.thrown() {
            Some(value) if self.host.is_instance(value, ty) => ShapeVerdict::Passed,
            Some(value) => ShapeVerdict::Failed {
                message: format!("caught {} instead of an instance of {}", value, ty),
            },
            None => ShapeVerdict::Failed {
                message: format!("caught {} instead of a thrown value", caught),
            },
        }
    }

    /// Verify several types; a type that cannot be verified is recorded, not fatal
    pub fn verify_all(&self, types: &[TypeDescriptor]) -> BatchReport<ExceptionReport> {
        let mut batch = BatchReport::default();
        for ty in types {
            match self.verify(ty) {
                Ok(report) => batch.push_completed(report),
                Err(err) => batch.push_errored(ty.name(), err),
            }
        }
        batch
    }
}
