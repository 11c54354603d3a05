//! Fluent registration of types
//!
//! [`ClassBuilder`] describes a type (its kind, supertypes, fields, methods
//! and constructors) and is handed to
//! [`TypeCatalog::define`](crate::TypeCatalog::define), which validates it
//! and registers it.
//!
//! ```ignore
//! let person = catalog.define(
//!     ClassBuilder::class("acme.Person")
//!         .property("name", &lang::string())
//!         .property("age", &lang::primitive(PrimitiveKind::Int))
//!         .field_constructor(&["name", "age"]),
//! )?;
//! ```

use std::sync::Arc;

use crate::catalog::{ClassDef, TypeCatalog};
use crate::descriptor::{Modifiers, PrimitiveKind, TypeDescriptor, TypeKind};
use crate::error::{CatalogError, InvokeError};
use crate::handle::{ConstructorBody, ConstructorHandle, MethodBody, MethodHandle, Visibility};
use crate::host::{FieldInfo, ReflectionHost};
use crate::lang;
use crate::object::ObjectRef;
use crate::value::{EnumConstant, Value};

/// The four conventional constructor shapes of a throwable type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionShape {
    /// `()`
    NoArgs,
    /// `(String message)`
    Message,
    /// `(Throwable cause)`
    Cause,
    /// `(String message, Throwable cause)`
    MessageAndCause,
}

impl ExceptionShape {
    /// All shapes in canonical order
    pub const ALL: [ExceptionShape; 4] = [
        ExceptionShape::NoArgs,
        ExceptionShape::Message,
        ExceptionShape::Cause,
        ExceptionShape::MessageAndCause,
    ];

    /// Parameter types of the shape
    pub fn params(self) -> Vec<TypeDescriptor> {
        match self {
            ExceptionShape::NoArgs => Vec::new(),
            ExceptionShape::Message => vec![lang::string()],
            ExceptionShape::Cause => vec![lang::throwable()],
            ExceptionShape::MessageAndCause => vec![lang::string(), lang::throwable()],
        }
    }

    /// Parameter list as written in a signature
    pub fn as_str(self) -> &'static str {
        match self {
            ExceptionShape::NoArgs => "()",
            ExceptionShape::Message => "(String)",
            ExceptionShape::Cause => "(Throwable)",
            ExceptionShape::MessageAndCause => "(String, Throwable)",
        }
    }

    /// Standard initialization: record the message and cause; a cause-only
    /// constructor derives the message from the cause
    fn body(self) -> ConstructorBody {
        match self {
            ExceptionShape::NoArgs => Arc::new(|_, _| Ok(())),
            ExceptionShape::Message => Arc::new(|this, args| {
                this.set_field("message", arg(args, 0));
                Ok(())
            }),
            ExceptionShape::Cause => Arc::new(|this, args| {
                let cause = arg(args, 0);
                let message = lang::describe_throwable(&cause)
                    .map(Value::from)
                    .unwrap_or(Value::Null);
                this.set_field("message", message);
                this.set_field("cause", cause);
                Ok(())
            }),
            ExceptionShape::MessageAndCause => Arc::new(|this, args| {
                this.set_field("message", arg(args, 0));
                this.set_field("cause", arg(args, 1));
                Ok(())
            }),
        }
    }
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn void() -> TypeDescriptor {
    lang::primitive(PrimitiveKind::Void)
}

/// A method waiting to be attached to its declaring type
struct MethodSpec {
    name: String,
    params: Vec<TypeDescriptor>,
    return_type: TypeDescriptor,
    visibility: Visibility,
    is_static: bool,
    body: MethodBody,
}

/// Constructor parameters, given either as types or as fields to assign
enum ParamSpec {
    Types(Vec<TypeDescriptor>),
    Fields(Vec<String>),
}

struct ConstructorSpec {
    params: ParamSpec,
    visibility: Visibility,
    body: Option<ConstructorBody>,
}

/// Builder describing a type to register
pub struct ClassBuilder {
    /// Qualified name
    name: String,
    /// Kind of type
    kind: TypeKind,
    /// Declaration modifiers
    modifiers: Modifiers,
    /// Generic parameter names
    type_params: Vec<String>,
    /// Explicit superclass; classes default to the root object type
    superclass: Option<TypeDescriptor>,
    /// Implemented interfaces
    interfaces: Vec<TypeDescriptor>,
    /// Existing descriptor to register instead of building one
    predefined: Option<TypeDescriptor>,
    /// Whether a class without constructors gets a public no-arg one
    implicit_constructor: bool,
    /// Declared fields
    fields: Vec<(String, TypeDescriptor)>,
    /// Declared methods
    methods: Vec<MethodSpec>,
    /// Declared constructors
    constructors: Vec<ConstructorSpec>,
    /// Enum constant names
    constants: Vec<String>,
    /// Fields referenced by accessors, checked at registration
    field_refs: Vec<String>,
}

impl ClassBuilder {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::default(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            predefined: None,
            implicit_constructor: kind == TypeKind::Class,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            constants: Vec::new(),
            field_refs: Vec::new(),
        }
    }

    /// Describe a class
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Describe an interface
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// Describe an annotation type
    pub fn annotation(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Annotation)
    }

    /// Describe an enum with the given constants, in declaration order
    pub fn enumeration(name: impl Into<String>, constants: &[&str]) -> Self {
        let mut builder = Self::new(name, TypeKind::Enum);
        builder.constants = constants.iter().map(|c| c.to_string()).collect();
        builder
    }

    /// Describe a checked exception type with the four conventional constructors
    pub fn exception(name: impl Into<String>) -> Self {
        Self::class(name)
            .extends(&lang::exception())
            .exception_constructors(&ExceptionShape::ALL)
    }

    /// Register an existing descriptor
    pub(crate) fn predefined(descriptor: TypeDescriptor) -> Self {
        let mut builder = Self::new(descriptor.name().to_string(), descriptor.kind());
        builder.predefined = Some(descriptor);
        builder
    }

    /// Do not add a public no-arg constructor when none is declared
    pub fn without_implicit_constructor(mut self) -> Self {
        self.implicit_constructor = false;
        self
    }

    /// Mark the type final
    pub fn make_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    /// Mark the type abstract
    pub fn make_abstract(mut self) -> Self {
        self.modifiers.is_abstract = true;
        self
    }

    /// Declare generic type parameters
    pub fn generic(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Set the superclass
    pub fn extends(mut self, superclass: &TypeDescriptor) -> Self {
        self.superclass = Some(superclass.clone());
        self
    }

    /// Add an implemented interface
    pub fn implements(mut self, interface: &TypeDescriptor) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Declare a field
    pub fn field(mut self, name: impl Into<String>, ty: &TypeDescriptor) -> Self {
        self.fields.push((name.into(), ty.clone()));
        self
    }

    /// Declare a field with a conventional getter and setter
    ///
    /// The getter is `isName` for primitive `boolean` fields and `getName`
    /// otherwise.
    pub fn property(self, name: &str, ty: &TypeDescriptor) -> Self {
        self.field(name, ty)
            .conventional_getter(name, ty)
            .setter(&format!("set{}", capitalize(name)), name, ty)
    }

    /// Declare a field with a conventional getter only
    pub fn read_only(self, name: &str, ty: &TypeDescriptor) -> Self {
        self.field(name, ty).conventional_getter(name, ty)
    }

    /// Declare a field with a conventional setter only
    pub fn write_only(self, name: &str, ty: &TypeDescriptor) -> Self {
        self.field(name, ty)
            .setter(&format!("set{}", capitalize(name)), name, ty)
    }

    fn conventional_getter(self, name: &str, ty: &TypeDescriptor) -> Self {
        let prefix = if ty.primitive_kind() == Some(PrimitiveKind::Boolean) {
            "is"
        } else {
            "get"
        };
        self.getter(&format!("{}{}", prefix, capitalize(name)), name, ty)
    }

    /// Add a method returning the value of `field`
    pub fn getter(mut self, method: &str, field: &str, ty: &TypeDescriptor) -> Self {
        self.field_refs.push(field.to_string());
        let field = field.to_string();
        self.method(method, &[], ty, move |this, _| {
            Ok(this.get_field(&field).unwrap_or(Value::Null))
        })
    }

    /// Add a one-argument method assigning `field`
    pub fn setter(mut self, method: &str, field: &str, ty: &TypeDescriptor) -> Self {
        self.field_refs.push(field.to_string());
        let field = field.to_string();
        self.method(method, &[ty.clone()], &void(), move |this, args| {
            this.set_field(&field, arg(args, 0));
            Ok(Value::Null)
        })
    }

    /// Add a public instance method
    pub fn method<F>(
        self,
        name: &str,
        params: &[TypeDescriptor],
        return_type: &TypeDescriptor,
        body: F,
    ) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.method_with(Visibility::Public, name, params, return_type, body)
    }

    /// Add a private instance method
    pub fn private_method<F>(
        self,
        name: &str,
        params: &[TypeDescriptor],
        return_type: &TypeDescriptor,
        body: F,
    ) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.method_with(Visibility::Private, name, params, return_type, body)
    }

    /// Add an instance method with explicit visibility
    pub fn method_with<F>(
        mut self,
        visibility: Visibility,
        name: &str,
        params: &[TypeDescriptor],
        return_type: &TypeDescriptor,
        body: F,
    ) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.methods.push(MethodSpec {
            name: name.to_string(),
            params: params.to_vec(),
            return_type: return_type.clone(),
            visibility,
            is_static: false,
            body: Arc::new(body),
        });
        self
    }

    /// Add a public static method; the target passed to the body is ignored
    pub fn static_method<F>(
        mut self,
        name: &str,
        params: &[TypeDescriptor],
        return_type: &TypeDescriptor,
        body: F,
    ) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.methods.push(MethodSpec {
            name: name.to_string(),
            params: params.to_vec(),
            return_type: return_type.clone(),
            visibility: Visibility::Public,
            is_static: true,
            body: Arc::new(body),
        });
        self
    }

    /// Add a public constructor with a custom body
    pub fn constructor<F>(self, params: &[TypeDescriptor], body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        self.constructor_with(Visibility::Public, params, body)
    }

    /// Add a constructor with explicit visibility and a custom body
    pub fn constructor_with<F>(
        mut self,
        visibility: Visibility,
        params: &[TypeDescriptor],
        body: F,
    ) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorSpec {
            params: ParamSpec::Types(params.to_vec()),
            visibility,
            body: Some(Arc::new(body)),
        });
        self
    }

    /// Add a public constructor assigning its arguments to `fields` in order
    pub fn field_constructor(self, fields: &[&str]) -> Self {
        self.field_constructor_with(Visibility::Public, fields)
    }

    /// Add a constructor with explicit visibility assigning its arguments to `fields`
    pub fn field_constructor_with(mut self, visibility: Visibility, fields: &[&str]) -> Self {
        self.constructors.push(ConstructorSpec {
            params: ParamSpec::Fields(fields.iter().map(|f| f.to_string()).collect()),
            visibility,
            body: None,
        });
        self
    }

    /// Add the conventional throwable constructors for the given shapes
    pub fn exception_constructors(mut self, shapes: &[ExceptionShape]) -> Self {
        if !shapes.is_empty() {
            self.field_refs.push("message".to_string());
            self.field_refs.push("cause".to_string());
        }
        for shape in shapes {
            self.constructors.push(ConstructorSpec {
                params: ParamSpec::Types(shape.params()),
                visibility: Visibility::Public,
                body: Some(shape.body()),
            });
        }
        self
    }

    fn invalid(&self, reason: impl Into<String>) -> CatalogError {
        CatalogError::InvalidDefinition {
            type_name: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn check_shape(&self) -> Result<(), CatalogError> {
        if self.modifiers.is_final && self.modifiers.is_abstract {
            return Err(self.invalid("a type cannot be both final and abstract"));
        }
        if !self.constants.is_empty() && self.kind != TypeKind::Enum {
            return Err(self.invalid("only enums declare constants"));
        }
        let interface_like = matches!(self.kind, TypeKind::Interface | TypeKind::Annotation);
        if interface_like && !self.constructors.is_empty() {
            return Err(self.invalid("interfaces cannot declare constructors"));
        }
        if interface_like && !self.fields.is_empty() {
            return Err(self.invalid("interfaces cannot declare fields"));
        }
        if let Some(superclass) = &self.superclass {
            if interface_like {
                return Err(self.invalid("interfaces cannot extend a class"));
            }
            if superclass.kind() != TypeKind::Class {
                return Err(self.invalid(format!("{} is not a class", superclass)));
            }
            if superclass.is_final() {
                return Err(self.invalid(format!("cannot extend final type {}", superclass)));
            }
        }
        for interface in &self.interfaces {
            if !interface.is_interface() {
                return Err(self.invalid(format!("{} is not an interface", interface)));
            }
        }
        for (index, (name, _)) in self.fields.iter().enumerate() {
            if self.fields[..index].iter().any(|(other, _)| other == name) {
                return Err(self.invalid(format!("field '{}' declared twice", name)));
            }
        }
        Ok(())
    }

    /// Validate the description and turn it into a registered definition
    pub(crate) fn build(self, catalog: &TypeCatalog) -> Result<ClassDef, CatalogError> {
        if self.predefined.is_none() {
            self.check_shape()?;
        }

        let descriptor = match &self.predefined {
            Some(descriptor) => descriptor.clone(),
            None => {
                let mut supertypes = Vec::new();
                match &self.superclass {
                    Some(superclass) => supertypes.push(superclass.clone()),
                    None if matches!(self.kind, TypeKind::Class | TypeKind::Enum) => {
                        supertypes.push(lang::object())
                    }
                    None => {}
                }
                supertypes.extend(self.interfaces.iter().cloned());
                TypeDescriptor::new(
                    self.name.clone(),
                    self.kind,
                    self.modifiers,
                    self.type_params.clone(),
                    supertypes,
                )
            }
        };

        for supertype in descriptor.supertypes() {
            if !catalog.contains(supertype.name()) {
                return Err(CatalogError::UnknownType(supertype.name().to_string()));
            }
        }

        let fields: Vec<FieldInfo> = self
            .fields
            .iter()
            .map(|(name, ty)| FieldInfo {
                name: name.clone(),
                ty: ty.clone(),
                declaring_type: descriptor.clone(),
            })
            .collect();
        let mut available = fields.clone();
        for supertype in descriptor.supertypes() {
            available.extend(catalog.instance_fields(supertype));
        }
        let lookup_field = |name: &str| -> Result<TypeDescriptor, CatalogError> {
            available
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.ty.clone())
                .ok_or_else(|| CatalogError::UnknownField {
                    type_name: descriptor.name().to_string(),
                    field: name.to_string(),
                })
        };
        for field in &self.field_refs {
            lookup_field(field)?;
        }

        let methods = self
            .methods
            .into_iter()
            .map(|spec| {
                MethodHandle::new(
                    spec.name,
                    descriptor.clone(),
                    spec.params,
                    spec.return_type,
                    spec.visibility,
                    spec.is_static,
                    spec.body,
                )
            })
            .collect();

        let mut constructors = Vec::new();
        for spec in self.constructors {
            let (params, body) = match spec.params {
                ParamSpec::Types(params) => {
                    let body = spec.body.unwrap_or_else(|| Arc::new(|_, _| Ok(())));
                    (params, body)
                }
                ParamSpec::Fields(names) => {
                    let params = names
                        .iter()
                        .map(|name| lookup_field(name))
                        .collect::<Result<Vec<_>, _>>()?;
                    let body: ConstructorBody = Arc::new(move |this, args| {
                        for (name, value) in names.iter().zip(args) {
                            this.set_field(name, value.clone());
                        }
                        Ok(())
                    });
                    (params, body)
                }
            };
            constructors.push(ConstructorHandle::new(
                descriptor.clone(),
                params,
                spec.visibility,
                body,
            ));
        }
        if constructors.is_empty() && self.implicit_constructor && self.kind == TypeKind::Class {
            constructors.push(ConstructorHandle::new(
                descriptor.clone(),
                Vec::new(),
                Visibility::Public,
                Arc::new(|_, _| Ok(())),
            ));
        }

        let constants = self
            .constants
            .iter()
            .enumerate()
            .map(|(ordinal, name)| {
                Value::Enum(EnumConstant::new(descriptor.clone(), ordinal, name.as_str()))
            })
            .collect();

        Ok(ClassDef::new(descriptor, fields, methods, constructors, constants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("name"), "Name");
        assert_eq!(capitalize("URL"), "URL");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_property_accessor_names() {
        let catalog = TypeCatalog::new();
        let ty = catalog
            .define(
                ClassBuilder::class("acme.Flags")
                    .property("active", &lang::primitive(PrimitiveKind::Boolean))
                    .property("boxed", &lang::boxed(PrimitiveKind::Boolean).unwrap()),
            )
            .unwrap();

        let names: Vec<String> = catalog
            .declared_methods(&ty)
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["isActive", "setActive", "getBoxed", "setBoxed"]);
    }

    #[test]
    fn test_implicit_constructor() {
        let catalog = TypeCatalog::new();
        let plain = catalog.define(ClassBuilder::class("acme.Plain")).unwrap();
        let iface = catalog.define(ClassBuilder::interface("acme.Shape")).unwrap();
        let color = catalog
            .define(ClassBuilder::enumeration("acme.Color", &["RED"]))
            .unwrap();

        assert_eq!(catalog.declared_constructors(&plain).len(), 1);
        assert!(catalog.declared_constructors(&iface).is_empty());
        assert!(catalog.declared_constructors(&color).is_empty());
    }

    #[test]
    fn test_invalid_definitions() {
        let catalog = TypeCatalog::new();
        let err = catalog
            .define(ClassBuilder::class("acme.Bad").getter("getX", "x", &lang::string()))
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownField { .. }));

        let err = catalog
            .define(ClassBuilder::class("acme.Sub").extends(&lang::string()))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDefinition { .. }));

        let err = catalog
            .define(
                ClassBuilder::interface("acme.Iface")
                    .constructor(&[], |_, _| Ok(())),
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_field_constructor_uses_inherited_fields() {
        let catalog = TypeCatalog::new();
        let base = catalog
            .define(ClassBuilder::class("acme.Base").property("id", &lang::string()))
            .unwrap();
        let derived = catalog
            .define(
                ClassBuilder::class("acme.Derived")
                    .extends(&base)
                    .property("size", &lang::primitive(PrimitiveKind::Int))
                    .field_constructor(&["id", "size"]),
            )
            .unwrap();

        let ctor = catalog.declared_constructors(&derived).remove(0);
        assert_eq!(ctor.params(), &[lang::string(), lang::primitive(PrimitiveKind::Int)]);

        let value = catalog
            .construct(&ctor, &[Value::from("x"), Value::Int(4)])
            .unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get_field("id"), Some(Value::from("x")));
        assert_eq!(object.get_field("size"), Some(Value::Int(4)));
    }

    #[test]
    fn test_exception_constructors() {
        let catalog = TypeCatalog::new();
        let ty = catalog.define(ClassBuilder::exception("acme.Failure")).unwrap();
        let ctors = catalog.declared_constructors(&ty);
        assert_eq!(ctors.len(), 4);

        let cause = catalog.construct(&ctors[1], &[Value::from("inner")]).unwrap();
        let wrapped = catalog.construct(&ctors[2], &[cause.clone()]).unwrap();
        let object = wrapped.as_object().unwrap();
        assert_eq!(
            object.get_field("message"),
            Some(Value::from("acme.Failure: inner"))
        );
        assert!(object.get_field("cause").unwrap().same(&cause));
    }
}
