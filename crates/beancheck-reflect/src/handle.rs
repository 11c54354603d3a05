//! Callable handles for methods and constructors

use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::error::InvokeError;
use crate::object::ObjectRef;
use crate::value::Value;

/// Body of an instance method: receives the target object and the arguments
pub type MethodBody = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<Value, InvokeError> + Send + Sync>;

/// Body of a constructor: initializes a freshly allocated instance
pub type ConstructorBody = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<(), InvokeError> + Send + Sync>;

/// Member visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Accessible everywhere
    #[default]
    Public,
    /// Accessible to subtypes
    Protected,
    /// Accessible within the namespace
    Package,
    /// Accessible within the declaring type
    Private,
}

impl Visibility {
    /// Check for public visibility
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// Handle to a method
#[derive(Clone)]
pub struct MethodHandle {
    name: String,
    declaring_type: TypeDescriptor,
    params: Vec<TypeDescriptor>,
    return_type: TypeDescriptor,
    visibility: Visibility,
    is_static: bool,
    body: MethodBody,
}

impl MethodHandle {
    /// Create a method handle
    pub fn new(
        name: impl Into<String>,
        declaring_type: TypeDescriptor,
        params: Vec<TypeDescriptor>,
        return_type: TypeDescriptor,
        visibility: Visibility,
        is_static: bool,
        body: MethodBody,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            params,
            return_type,
            visibility,
            is_static,
            body,
        }
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type declaring the method
    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring_type
    }

    /// Parameter types in order
    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    /// Declared return type (`void` for none)
    pub fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }

    /// Visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the method is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Check whether another handle has the same name and parameter types
    pub fn same_signature(&self, other: &MethodHandle) -> bool {
        self.name == other.name && self.params == other.params
    }

    /// Run the body without argument checks
    pub(crate) fn call(&self, target: &ObjectRef, args: &[Value]) -> Result<Value, InvokeError> {
        (self.body)(target, args)
    }

    /// Human-readable signature, e.g. `acme.Person.setName(lang.String)`
    pub fn signature(&self) -> String {
        format!(
            "{}.{}({})",
            self.declaring_type,
            self.name,
            join_types(&self.params)
        )
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodHandle({} -> {})", self.signature(), self.return_type)
    }
}

/// Handle to a constructor
#[derive(Clone)]
pub struct ConstructorHandle {
    declaring_type: TypeDescriptor,
    params: Vec<TypeDescriptor>,
    visibility: Visibility,
    body: ConstructorBody,
}

impl ConstructorHandle {
    /// Create a constructor handle
    pub fn new(
        declaring_type: TypeDescriptor,
        params: Vec<TypeDescriptor>,
        visibility: Visibility,
        body: ConstructorBody,
    ) -> Self {
        Self {
            declaring_type,
            params,
            visibility,
            body,
        }
    }

    /// Type the constructor instantiates
    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring_type
    }

    /// Parameter types in order
    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub(crate) fn call(&self, target: &ObjectRef, args: &[Value]) -> Result<(), InvokeError> {
        (self.body)(target, args)
    }

    /// Human-readable signature, e.g. `acme.Person(lang.String, int)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.declaring_type, join_types(&self.params))
    }
}

impl fmt::Debug for ConstructorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructorHandle({})", self.signature())
    }
}

fn join_types(types: &[TypeDescriptor]) -> String {
    types
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check an argument list against declared parameter types
pub(crate) fn check_arguments(
    member: &str,
    params: &[TypeDescriptor],
    args: &[Value],
) -> Result<(), InvokeError> {
    if params.len() != args.len() {
        return Err(InvokeError::ArityMismatch {
            member: member.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }
    for (index, (param, arg)) in params.iter().zip(args).enumerate() {
        if !arg.conforms_to(param) {
            return Err(InvokeError::ArgumentType {
                member: member.to_string(),
                index,
                expected: param.to_string(),
                actual: arg.to_string(),
            });
        }
    }
    Ok(())
}
