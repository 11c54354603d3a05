//! Type descriptors for the host type system
//!
//! A [`TypeDescriptor`] is an immutable, cheaply cloned handle naming a type
//! and carrying its shape flags (interface, enum, annotation, array, member
//! type, generic parameters) together with its direct supertypes. Members
//! (methods, constructors, enum constants) are not part of the descriptor;
//! they are looked up through a [`ReflectionHost`](crate::ReflectionHost).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Separator between namespace segments in a qualified type name
pub const NAMESPACE_SEPARATOR: char = '.';

/// Separator between an enclosing type and a member type name
pub const MEMBER_SEPARATOR: char = '$';

/// Qualified name of the root object type
pub const OBJECT_TYPE_NAME: &str = "lang.Object";

/// Primitive (non-reference) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `boolean`
    Boolean,
    /// `byte` (8-bit signed)
    Byte,
    /// `short` (16-bit signed)
    Short,
    /// `int` (32-bit signed)
    Int,
    /// `long` (64-bit signed)
    Long,
    /// `float` (32-bit IEEE 754)
    Float,
    /// `double` (64-bit IEEE 754)
    Double,
    /// `char` (a Unicode scalar value)
    Char,
    /// `void` (method return type only)
    Void,
}

impl PrimitiveKind {
    /// All primitive kinds in declaration order
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Char,
        PrimitiveKind::Void,
    ];

    /// Name of the primitive type as it appears in signatures
    pub fn type_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Void => "void",
        }
    }

    /// Qualified name of the boxed reference type for this primitive
    ///
    /// `void` has no boxed counterpart.
    pub fn boxed_name(self) -> Option<&'static str> {
        match self {
            PrimitiveKind::Boolean => Some("lang.Boolean"),
            PrimitiveKind::Byte => Some("lang.Byte"),
            PrimitiveKind::Short => Some("lang.Short"),
            PrimitiveKind::Int => Some("lang.Integer"),
            PrimitiveKind::Long => Some("lang.Long"),
            PrimitiveKind::Float => Some("lang.Float"),
            PrimitiveKind::Double => Some("lang.Double"),
            PrimitiveKind::Char => Some("lang.Character"),
            PrimitiveKind::Void => None,
        }
    }

    /// Inverse of [`boxed_name`](Self::boxed_name)
    pub fn from_boxed_name(name: &str) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.boxed_name() == Some(name))
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// What kind of type a descriptor names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A primitive type
    Primitive(PrimitiveKind),
    /// A class (concrete or abstract)
    Class,
    /// An interface
    Interface,
    /// An enumeration
    Enum,
    /// An annotation (marker) type; annotations are interfaces too
    Annotation,
    /// An array type
    Array,
}

/// Declaration modifiers relevant to instantiation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Type cannot be subclassed (and therefore cannot be stubbed)
    pub is_final: bool,
    /// Type cannot be instantiated directly
    pub is_abstract: bool,
}

struct TypeData {
    name: String,
    kind: TypeKind,
    modifiers: Modifiers,
    type_params: Vec<String>,
    supertypes: Vec<TypeDescriptor>,
    component: Option<TypeDescriptor>,
}

/// Immutable handle identifying a type in the host type system
///
/// Equality and hashing use the qualified name only.
#[derive(Clone)]
pub struct TypeDescriptor(Arc<TypeData>);

impl TypeDescriptor {
    /// Create a descriptor
    ///
    /// Array descriptors should be created with [`array_of`](Self::array_of)
    /// and primitives with [`primitive`](Self::primitive).
    pub fn new(
        name: impl Into<String>,
        kind: TypeKind,
        modifiers: Modifiers,
        type_params: Vec<String>,
        supertypes: Vec<TypeDescriptor>,
    ) -> Self {
        TypeDescriptor(Arc::new(TypeData {
            name: name.into(),
            kind,
            modifiers,
            type_params,
            supertypes,
            component: None,
        }))
    }

    /// Create a primitive type descriptor
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor(Arc::new(TypeData {
            name: kind.type_name().to_string(),
            kind: TypeKind::Primitive(kind),
            modifiers: Modifiers {
                is_final: true,
                is_abstract: false,
            },
            type_params: Vec::new(),
            supertypes: Vec::new(),
            component: None,
        }))
    }

    /// Create an array type descriptor with the given component type
    ///
    /// `object` is the root object type every array extends.
    pub fn array_of(component: &TypeDescriptor, object: &TypeDescriptor) -> Self {
        TypeDescriptor(Arc::new(TypeData {
            name: format!("{}[]", component.name()),
            kind: TypeKind::Array,
            modifiers: Modifiers {
                is_final: true,
                is_abstract: false,
            },
            type_params: Vec::new(),
            supertypes: vec![object.clone()],
            component: Some(component.clone()),
        }))
    }

    /// Qualified name (e.g. `acme.model.Person` or `acme.model.Person$Address`)
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Name without the namespace (member types keep their `Outer$Inner` form)
    pub fn simple_name(&self) -> &str {
        match self.0.name.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) if !self.is_array() => &self.0.name[idx + 1..],
            _ => &self.0.name,
        }
    }

    /// Namespace the type lives in, empty for primitives, arrays and root-level types
    pub fn namespace(&self) -> &str {
        if self.is_array() || self.is_primitive() {
            return "";
        }
        match self.0.name.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.0.name[..idx],
            None => "",
        }
    }

    /// Kind of the type
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Declaration modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.0.modifiers
    }

    /// Primitive kind if this is a primitive type
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.0.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Check for a primitive type
    pub fn is_primitive(&self) -> bool {
        matches!(self.0.kind, TypeKind::Primitive(_))
    }

    /// Check for the `void` pseudo-type
    pub fn is_void(&self) -> bool {
        self.0.kind == TypeKind::Primitive(PrimitiveKind::Void)
    }

    /// Check for an interface; annotation types report `true` as well
    pub fn is_interface(&self) -> bool {
        matches!(self.0.kind, TypeKind::Interface | TypeKind::Annotation)
    }

    /// Check for an annotation type
    pub fn is_annotation(&self) -> bool {
        self.0.kind == TypeKind::Annotation
    }

    /// Check for an enumeration
    pub fn is_enum(&self) -> bool {
        self.0.kind == TypeKind::Enum
    }

    /// Check for an array type
    pub fn is_array(&self) -> bool {
        self.0.kind == TypeKind::Array
    }

    /// Check for a member (nested) type
    pub fn is_member(&self) -> bool {
        self.enclosing_name().is_some()
    }

    /// Qualified name of the enclosing type for member types
    pub fn enclosing_name(&self) -> Option<&str> {
        if self.is_array() {
            return None;
        }
        let simple = self.simple_name();
        let idx = simple.rfind(MEMBER_SEPARATOR)?;
        let namespace_len = self.0.name.len() - simple.len();
        Some(&self.0.name[..namespace_len + idx])
    }

    /// Check whether the type may not be subclassed
    ///
    /// Primitives, arrays and enums are always final.
    pub fn is_final(&self) -> bool {
        self.0.modifiers.is_final
            || self.is_primitive()
            || self.is_array()
            || self.is_enum()
    }

    /// Check whether the type cannot be instantiated directly
    pub fn is_abstract(&self) -> bool {
        self.0.modifiers.is_abstract || self.is_interface()
    }

    /// Check for generic type parameters
    pub fn is_generic(&self) -> bool {
        !self.0.type_params.is_empty()
    }

    /// Names of generic type parameters
    pub fn type_params(&self) -> &[String] {
        &self.0.type_params
    }

    /// Direct supertypes (superclass first, then interfaces)
    pub fn supertypes(&self) -> &[TypeDescriptor] {
        &self.0.supertypes
    }

    /// Component type of an array
    pub fn component_type(&self) -> Option<&TypeDescriptor> {
        self.0.component.as_ref()
    }

    /// Check for a reference (non-primitive) type
    pub fn is_reference(&self) -> bool {
        !self.is_primitive()
    }

    /// Check whether a value of type `source` can be used where `self` is expected
    ///
    /// Reflexive. Primitives are only assignable from themselves. The root
    /// object type accepts every reference type. Arrays are covariant in
    /// their reference component types. Everything else goes through the
    /// supertype closure of `source`.
    pub fn is_assignable_from(&self, source: &TypeDescriptor) -> bool {
        if self == source {
            return true;
        }
        if self.is_primitive() || source.is_primitive() {
            return false;
        }
        if self.name() == OBJECT_TYPE_NAME {
            return true;
        }
        if let (Some(target_component), Some(source_component)) =
            (self.component_type(), source.component_type())
        {
            return target_component.is_reference()
                && source_component.is_reference()
                && target_component.is_assignable_from(source_component);
        }
        source
            .supertypes()
            .iter()
            .any(|supertype| self.is_assignable_from(supertype))
    }

    /// Check whether `self` and `other` are the same allocation
    pub fn ptr_eq(&self, other: &TypeDescriptor) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.0.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}
