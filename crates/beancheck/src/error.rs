//! Engine errors

use beancheck_reflect::InvokeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by synthesis, resolution, scanning and verification
#[derive(Debug, Error)]
pub enum ProbeError {
    /// An argument or input violates a precondition of the operation
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// No constructor fits the request
    #[error("No matching constructor found for type {type_name}")]
    NoSuchConstructor {
        /// Type whose constructors were searched
        type_name: String,
    },

    /// Every synthesis strategy failed
    #[error(
        "Cannot create an instance of {type_name}: {reason}. \
         Register a custom rule for this type with TypeSynthesisFactory::add_rule"
    )]
    ObjectInstantiation {
        /// Requested type
        type_name: String,
        /// Why the last strategy failed
        reason: String,
    },

    /// Neither an explicit nor a context namespace loader is available
    #[error("No namespace loader available: pass one explicitly or set a context loader")]
    LoaderUnavailable,

    /// A directory could not be read during a scan
    #[error("Failed to scan {path}: {source}")]
    Scan {
        /// Directory or file being visited
        path: PathBuf,
        /// Underlying walk error
        #[source]
        source: walkdir::Error,
    },

    /// An artifact was found but could not be resolved to a type
    #[error("Failed to load type {name}: {reason}")]
    ArtifactLoad {
        /// Qualified name derived from the artifact
        name: String,
        /// Why loading failed
        reason: String,
    },

    /// The target declares no field with the given name
    #[error("Type {type_name} has no field '{field}'")]
    NoSuchField {
        /// Target type
        type_name: String,
        /// Requested field
        field: String,
    },

    /// The target declares no method with the given name and arity
    #[error("Type {type_name} has no method '{method}'")]
    NoSuchMethod {
        /// Target type
        type_name: String,
        /// Requested method, rendered as `name/arity`
        method: String,
    },

    /// Invocation of host code failed
    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl ProbeError {
    /// Shorthand for [`ProbeError::PreconditionViolation`]
    pub fn precondition(message: impl Into<String>) -> Self {
        ProbeError::PreconditionViolation(message.into())
    }

    /// Check for a precondition violation
    pub fn is_precondition(&self) -> bool {
        matches!(self, ProbeError::PreconditionViolation(_))
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, ProbeError>;
