//! Errors raised by the host type system

use thiserror::Error;

use crate::lang;
use crate::value::Value;

/// Errors raised while invoking methods and constructors
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    /// The invoked code threw an exception
    #[error("{}", describe_thrown(.0))]
    Thrown(Value),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {member}: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Member being invoked
        member: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// Argument does not conform to the declared parameter type
    #[error("Argument {index} of {member} must be {expected}, got {actual}")]
    ArgumentType {
        /// Member being invoked
        member: String,
        /// Zero-based argument position
        index: usize,
        /// Declared parameter type
        expected: String,
        /// Supplied value
        actual: String,
    },

    /// Instance method invoked on something that is not an object
    #[error("Cannot invoke {member} on non-object value {target}")]
    NotAnObject {
        /// Member being invoked
        member: String,
        /// Rendered target value
        target: String,
    },

    /// Attempt to instantiate an abstract type, interface or unknown type
    #[error("Type {type_name} cannot be instantiated")]
    NotInstantiable {
        /// Type name
        type_name: String,
    },
}

impl InvokeError {
    /// The thrown value, if this error carries one
    pub fn thrown(&self) -> Option<&Value> {
        match self {
            InvokeError::Thrown(value) => Some(value),
            _ => None,
        }
    }
}

fn describe_thrown(value: &Value) -> String {
    lang::describe_throwable(value).unwrap_or_else(|| format!("thrown value {}", value))
}

/// Errors raised while registering types in a [`TypeCatalog`](crate::TypeCatalog)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// A type with the same qualified name is already registered
    #[error("Type already defined: {0}")]
    DuplicateType(String),

    /// Referenced type is not registered
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Accessor or constructor refers to a field that is not declared
    #[error("Type {type_name} declares no field '{field}'")]
    UnknownField {
        /// Type being defined
        type_name: String,
        /// Missing field
        field: String,
    },

    /// Builder was configured inconsistently
    #[error("Invalid definition of {type_name}: {reason}")]
    InvalidDefinition {
        /// Type being defined
        type_name: String,
        /// What is wrong
        reason: String,
    },
}
