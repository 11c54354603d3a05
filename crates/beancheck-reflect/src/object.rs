//! Heap objects of the host type system
//!
//! An [`Instance`] is an object of a declared type holding named fields.
//! Instances are shared through [`ObjectRef`], whose equality is identity.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::value::Value;

/// An object instance
pub struct Instance {
    ty: TypeDescriptor,
    fields: RwLock<FxHashMap<String, Value>>,
    stub: bool,
}

impl Instance {
    /// Runtime type of the instance
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Whether this instance is a stub standing in for a type without a real implementation
    pub fn is_stub(&self) -> bool {
        self.stub
    }
}

/// Shared reference to an [`Instance`]
#[derive(Clone)]
pub struct ObjectRef(Arc<Instance>);

impl ObjectRef {
    /// Allocate a new instance with the given fields
    pub fn new(ty: TypeDescriptor, fields: FxHashMap<String, Value>) -> Self {
        ObjectRef(Arc::new(Instance {
            ty,
            fields: RwLock::new(fields),
            stub: false,
        }))
    }

    /// Allocate a stub instance
    pub fn new_stub(ty: TypeDescriptor, fields: FxHashMap<String, Value>) -> Self {
        ObjectRef(Arc::new(Instance {
            ty,
            fields: RwLock::new(fields),
            stub: true,
        }))
    }

    /// Runtime type of the referenced instance
    pub fn ty(&self) -> &TypeDescriptor {
        self.0.ty()
    }

    /// Whether the referenced instance is a stub
    pub fn is_stub(&self) -> bool {
        self.0.is_stub()
    }

    /// Read a field value
    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.0.fields.read().get(name).cloned()
    }

    /// Check whether the instance declares a field
    pub fn has_field(&self, name: &str) -> bool {
        self.0.fields.read().contains_key(name)
    }

    /// Write a field value, returning `false` if the field does not exist
    pub fn set_field(&self, name: &str, value: Value) -> bool {
        let mut fields = self.0.fields.write();
        match fields.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Names of all fields, sorted
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.fields.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.is_stub() { "stub:" } else { "" };
        write!(f, "{}{}@{:p}", prefix, self.ty(), Arc::as_ptr(&self.0))
    }
}
