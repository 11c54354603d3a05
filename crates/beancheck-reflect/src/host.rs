//! The reflection capability interface
//!
//! [`ReflectionHost`] is everything the verification engine needs from a type
//! system: member listing, instantiation and invocation. The engine is written
//! purely against this trait; [`TypeCatalog`](crate::TypeCatalog) is the
//! in-memory implementation.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use crate::descriptor::TypeDescriptor;
use crate::error::InvokeError;
use crate::handle::{check_arguments, ConstructorHandle, MethodHandle};
use crate::object::ObjectRef;
use crate::value::Value;

/// A declared field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeDescriptor,
    /// Type declaring the field
    pub declaring_type: TypeDescriptor,
}

/// Reflection capabilities over a host type system
pub trait ReflectionHost: Send + Sync {
    /// Look up a type by qualified name
    ///
    /// Primitive names (`int`) and array names (`lang.String[]`) resolve too.
    fn resolve(&self, name: &str) -> Option<TypeDescriptor>;

    /// Methods declared directly on `ty`, every visibility, in declaration order
    fn declared_methods(&self, ty: &TypeDescriptor) -> Vec<MethodHandle>;

    /// Constructors declared on `ty`, every visibility, in declaration order
    fn declared_constructors(&self, ty: &TypeDescriptor) -> Vec<ConstructorHandle>;

    /// Fields declared directly on `ty`
    fn declared_fields(&self, ty: &TypeDescriptor) -> Vec<FieldInfo>;

    /// Constants of an enum type in declaration order; empty for other types
    fn enum_constants(&self, ty: &TypeDescriptor) -> Vec<Value>;

    /// Allocate an instance with every field set to its default value
    ///
    /// With `stub` set the instance is a stand-in whose methods answer with
    /// default values instead of running their bodies.
    fn allocate(&self, ty: &TypeDescriptor, stub: bool) -> Result<ObjectRef, InvokeError>;

    /// Methods visible on `ty`: declared ones first, then inherited ones not
    /// overridden by a method of the same signature
    fn list_methods(&self, ty: &TypeDescriptor) -> Vec<MethodHandle> {
        let mut methods: Vec<MethodHandle> = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([ty.clone()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.name().to_string()) {
                continue;
            }
            for method in self.declared_methods(&current) {
                if !methods.iter().any(|known| known.same_signature(&method)) {
                    methods.push(method);
                }
            }
            queue.extend(current.supertypes().iter().cloned());
        }

        methods
    }

    /// Fields of `ty` including inherited ones
    fn instance_fields(&self, ty: &TypeDescriptor) -> Vec<FieldInfo> {
        let mut fields = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([ty.clone()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.name().to_string()) {
                continue;
            }
            fields.extend(self.declared_fields(&current));
            queue.extend(current.supertypes().iter().cloned());
        }

        fields
    }

    /// Check whether `value` is a non-null instance of `ty`
    fn is_instance(&self, value: &Value, ty: &TypeDescriptor) -> bool {
        !value.is_null() && value.conforms_to(ty)
    }

    /// Create a stub standing in for a non-final type
    fn new_stub(&self, ty: &TypeDescriptor) -> Result<Value, InvokeError> {
        if ty.is_final() {
            return Err(InvokeError::NotInstantiable {
                type_name: ty.to_string(),
            });
        }
        self.allocate(ty, true).map(Value::Object)
    }

    /// Invoke `method` on `target`
    ///
    /// Methods invoked on a stub return the default value of their return type.
    fn invoke(
        &self,
        method: &MethodHandle,
        target: &Value,
        args: &[Value],
    ) -> Result<Value, InvokeError> {
        let object = target.as_object().ok_or_else(|| InvokeError::NotAnObject {
            member: method.signature(),
            target: target.to_string(),
        })?;
        check_arguments(&method.signature(), method.params(), args)?;
        if object.is_stub() {
            return Ok(Value::default_for(method.return_type()));
        }
        method.call(object, args)
    }

    /// Allocate an instance of the constructor's type and run the constructor
    fn construct(&self, ctor: &ConstructorHandle, args: &[Value]) -> Result<Value, InvokeError> {
        check_arguments(&ctor.signature(), ctor.params(), args)?;
        if ctor.declaring_type().is_abstract() {
            return Err(InvokeError::NotInstantiable {
                type_name: ctor.declaring_type().to_string(),
            });
        }
        let object = self.allocate(ctor.declaring_type(), false)?;
        ctor.call(&object, args)?;
        Ok(Value::Object(object))
    }
}
