//! In-memory type registry
//!
//! [`TypeCatalog`] is the reference [`ReflectionHost`]. Types are registered
//! through [`ClassBuilder`] and looked up by qualified name. Methods and
//! constructors can still be added after registration; reflective listings
//! always reflect the current state.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::builder::ClassBuilder;
use crate::descriptor::{PrimitiveKind, TypeDescriptor, TypeKind};
use crate::error::{CatalogError, InvokeError};
use crate::handle::{ConstructorHandle, MethodHandle, Visibility};
use crate::host::{FieldInfo, ReflectionHost};
use crate::lang;
use crate::object::ObjectRef;
use crate::value::Value;

/// A registered type with its members
pub struct ClassDef {
    /// Registered descriptor
    descriptor: TypeDescriptor,
    /// Fields declared by this type
    fields: Vec<FieldInfo>,
    /// Methods declared by this type
    methods: RwLock<Vec<MethodHandle>>,
    /// Constructors declared by this type
    constructors: RwLock<Vec<ConstructorHandle>>,
    /// Enum constants
    constants: Vec<Value>,
}

impl ClassDef {
    pub(crate) fn new(
        descriptor: TypeDescriptor,
        fields: Vec<FieldInfo>,
        methods: Vec<MethodHandle>,
        constructors: Vec<ConstructorHandle>,
        constants: Vec<Value>,
    ) -> Self {
        Self {
            descriptor,
            fields,
            methods: RwLock::new(methods),
            constructors: RwLock::new(constructors),
            constants,
        }
    }

    /// Registered descriptor
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

/// Registry of types keyed by qualified name
pub struct TypeCatalog {
    types: RwLock<FxHashMap<String, Arc<ClassDef>>>,
    order: RwLock<Vec<String>>,
}

impl TypeCatalog {
    /// Create a catalog holding the built-in types
    pub fn new() -> Self {
        let catalog = Self {
            types: RwLock::new(FxHashMap::default()),
            order: RwLock::new(Vec::new()),
        };
        lang::install(&catalog).expect("built-in types must register cleanly");
        catalog
    }

    /// Validate and register a type, returning its descriptor
    pub fn define(&self, builder: ClassBuilder) -> Result<TypeDescriptor, CatalogError> {
        let def = builder.build(self)?;
        let name = def.descriptor.name().to_string();

        let mut types = self.types.write();
        if types.contains_key(&name) {
            return Err(CatalogError::DuplicateType(name));
        }
        let descriptor = def.descriptor.clone();
        types.insert(name.clone(), Arc::new(def));
        self.order.write().push(name);
        Ok(descriptor)
    }

    /// Look up a registered type
    pub fn get(&self, name: &str) -> Option<TypeDescriptor> {
        self.types.read().get(name).map(|def| def.descriptor.clone())
    }

    /// Check whether a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Registered types in registration order
    pub fn types(&self) -> Vec<TypeDescriptor> {
        let types = self.types.read();
        self.order
            .read()
            .iter()
            .filter_map(|name| types.get(name).map(|def| def.descriptor.clone()))
            .collect()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check for an empty catalog
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    fn def(&self, name: &str) -> Option<Arc<ClassDef>> {
        self.types.read().get(name).cloned()
    }

    fn require(&self, ty: &TypeDescriptor) -> Result<Arc<ClassDef>, CatalogError> {
        self.def(ty.name())
            .ok_or_else(|| CatalogError::UnknownType(ty.name().to_string()))
    }

    /// Add a constructor to a registered class
    pub fn add_constructor<F>(
        &self,
        ty: &TypeDescriptor,
        visibility: Visibility,
        params: &[TypeDescriptor],
        body: F,
    ) -> Result<(), CatalogError>
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        let def = self.require(ty)?;
        if def.descriptor.kind() != TypeKind::Class {
            return Err(CatalogError::InvalidDefinition {
                type_name: ty.name().to_string(),
                reason: "only classes declare constructors".to_string(),
            });
        }
        def.constructors.write().push(ConstructorHandle::new(
            def.descriptor.clone(),
            params.to_vec(),
            visibility,
            Arc::new(body),
        ));
        Ok(())
    }

    /// Add a method to a registered type
    pub fn add_method<F>(
        &self,
        ty: &TypeDescriptor,
        visibility: Visibility,
        name: &str,
        params: &[TypeDescriptor],
        return_type: &TypeDescriptor,
        body: F,
    ) -> Result<(), CatalogError>
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        let def = self.require(ty)?;
        def.methods.write().push(MethodHandle::new(
            name,
            def.descriptor.clone(),
            params.to_vec(),
            return_type.clone(),
            visibility,
            false,
            Arc::new(body),
        ));
        Ok(())
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflectionHost for TypeCatalog {
    fn resolve(&self, name: &str) -> Option<TypeDescriptor> {
        if let Some(component) = name.strip_suffix("[]") {
            return self.resolve(component).map(|c| lang::array_of(&c));
        }
        if let Some(kind) = PrimitiveKind::ALL.iter().find(|k| k.type_name() == name) {
            return Some(lang::primitive(*kind));
        }
        self.get(name)
    }

    fn declared_methods(&self, ty: &TypeDescriptor) -> Vec<MethodHandle> {
        self.def(ty.name())
            .map(|def| def.methods.read().clone())
            .unwrap_or_default()
    }

    fn declared_constructors(&self, ty: &TypeDescriptor) -> Vec<ConstructorHandle> {
        self.def(ty.name())
            .map(|def| def.constructors.read().clone())
            .unwrap_or_default()
    }

    fn declared_fields(&self, ty: &TypeDescriptor) -> Vec<FieldInfo> {
        self.def(ty.name())
            .map(|def| def.fields.clone())
            .unwrap_or_default()
    }

    fn enum_constants(&self, ty: &TypeDescriptor) -> Vec<Value> {
        self.def(ty.name())
            .map(|def| def.constants.clone())
            .unwrap_or_default()
    }

    fn allocate(&self, ty: &TypeDescriptor, stub: bool) -> Result<ObjectRef, InvokeError> {
        let not_instantiable = || InvokeError::NotInstantiable {
            type_name: ty.to_string(),
        };
        let def = self.def(ty.name()).ok_or_else(not_instantiable)?;
        if stub {
            return Ok(ObjectRef::new_stub(def.descriptor.clone(), FxHashMap::default()));
        }
        if def.descriptor.is_abstract() || def.descriptor.is_enum() {
            return Err(not_instantiable());
        }
        let fields = self
            .instance_fields(&def.descriptor)
            .into_iter()
            .map(|field| {
                let value = Value::default_for(&field.ty);
                (field.name, value)
            })
            .collect();
        Ok(ObjectRef::new(def.descriptor.clone(), fields))
    }
}
