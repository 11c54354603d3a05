//! Runtime values
//!
//! [`Value`] is the value domain every reflective call works with. Equality
//! is *simple equality*: primitives, strings, enum constants, date/time values
//! and class literals compare by value, collections compare element-wise, and
//! arrays and objects compare by identity. [`Value::same`] is pure identity.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::lang;
use crate::object::ObjectRef;

/// A runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent reference
    Null,
    /// `boolean` / `Boolean`
    Bool(bool),
    /// `char` / `Character`
    Char(char),
    /// `byte` / `Byte`
    Byte(i8),
    /// `short` / `Short`
    Short(i16),
    /// `int` / `Integer`
    Int(i32),
    /// `long` / `Long`
    Long(i64),
    /// `float` / `Float`
    Float(f32),
    /// `double` / `Double`
    Double(f64),
    /// String
    Str(Arc<str>),
    /// Mutable collection of a concrete collection type
    Collection(CollectionRef),
    /// Fixed-length array
    Array(ArrayRef),
    /// Enumeration constant
    Enum(EnumConstant),
    /// Date/time value
    Temporal(Temporal),
    /// Class literal
    Type(TypeDescriptor),
    /// Object reference
    Object(ObjectRef),
}

impl Value {
    /// Default value for a field or parameter of the given type
    ///
    /// Zero for numeric primitives, `false` for `boolean`, `'\0'` for `char`,
    /// `Null` for every reference type.
    pub fn default_for(ty: &TypeDescriptor) -> Value {
        match ty.primitive_kind() {
            Some(PrimitiveKind::Boolean) => Value::Bool(false),
            Some(PrimitiveKind::Byte) => Value::Byte(0),
            Some(PrimitiveKind::Short) => Value::Short(0),
            Some(PrimitiveKind::Int) => Value::Int(0),
            Some(PrimitiveKind::Long) => Value::Long(0),
            Some(PrimitiveKind::Float) => Value::Float(0.0),
            Some(PrimitiveKind::Double) => Value::Double(0.0),
            Some(PrimitiveKind::Char) => Value::Char('\0'),
            Some(PrimitiveKind::Void) | None => Value::Null,
        }
    }

    /// Check for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Primitive kind of a primitive value
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Bool(_) => Some(PrimitiveKind::Boolean),
            Value::Char(_) => Some(PrimitiveKind::Char),
            Value::Byte(_) => Some(PrimitiveKind::Byte),
            Value::Short(_) => Some(PrimitiveKind::Short),
            Value::Int(_) => Some(PrimitiveKind::Int),
            Value::Long(_) => Some(PrimitiveKind::Long),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    /// Runtime type of the value; `None` for `Null`
    ///
    /// Primitive values report their boxed type.
    pub fn type_descriptor(&self) -> Option<TypeDescriptor> {
        if let Some(kind) = self.primitive_kind() {
            return lang::boxed(kind);
        }
        match self {
            Value::Null => None,
            Value::Str(_) => Some(lang::string()),
            Value::Collection(c) => Some(c.ty().clone()),
            Value::Array(a) => Some(lang::array_of(a.component())),
            Value::Enum(e) => Some(e.ty().clone()),
            Value::Temporal(t) => Some(t.type_descriptor()),
            Value::Type(_) => Some(lang::class()),
            Value::Object(o) => Some(o.ty().clone()),
            _ => None,
        }
    }

    /// Check whether this value can be passed where `ty` is expected
    ///
    /// `Null` conforms to every reference type. Primitive values conform to
    /// their primitive type and to every supertype of their boxed type.
    pub fn conforms_to(&self, ty: &TypeDescriptor) -> bool {
        if self.is_null() {
            return ty.is_reference();
        }
        if let Some(kind) = ty.primitive_kind() {
            return self.primitive_kind() == Some(kind);
        }
        self.type_descriptor()
            .map(|runtime| ty.is_assignable_from(&runtime))
            .unwrap_or(false)
    }

    /// Identity comparison
    ///
    /// Values without identity (primitives, strings, enum constants, date/time
    /// values, class literals) are identical when equal.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Collection(a), Value::Collection(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => self == other,
        }
    }

    /// Borrow the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the object payload
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Extract a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an `int`
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Collection(a), Value::Collection(b)) => a.elements_eq(b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Temporal(a), Value::Temporal(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Byte(b) => write!(f, "{}", b),
            Value::Short(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Float(x) => write!(f, "{}", x),
            Value::Double(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::Collection(c) => write!(f, "{}(len={})", c.ty(), c.len()),
            Value::Array(a) => write!(f, "{}[{}]", a.component(), a.len()),
            Value::Enum(e) => write!(f, "{}.{}", e.ty(), e.name()),
            Value::Temporal(t) => write!(f, "{}", t),
            Value::Type(t) => write!(f, "class {}", t),
            Value::Object(o) => write!(f, "{}", o),
        }
    }
}

// ============================================================================
// Collections and arrays
// ============================================================================

/// Shared, mutable collection of a concrete collection type
#[derive(Clone)]
pub struct CollectionRef {
    ty: TypeDescriptor,
    items: Arc<RwLock<Vec<Value>>>,
}

impl CollectionRef {
    /// Create an empty collection
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Concrete collection type
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Check for an empty collection
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Append an element
    pub fn push(&self, value: Value) {
        self.items.write().push(value);
    }

    /// Copy of the current elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.read().clone()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &CollectionRef) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    fn elements_eq(&self, other: &CollectionRef) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        *self.items.read() == *other.items.read()
    }
}

impl fmt::Debug for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionRef")
            .field("ty", &self.ty)
            .field("len", &self.len())
            .finish()
    }
}

/// Shared, fixed-length array
#[derive(Clone)]
pub struct ArrayRef {
    component: TypeDescriptor,
    items: Arc<RwLock<Vec<Value>>>,
}

impl ArrayRef {
    /// Create an array of `len` default-valued elements
    pub fn new(component: TypeDescriptor, len: usize) -> Self {
        let items = vec![Value::default_for(&component); len];
        Self {
            component,
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Component type
    pub fn component(&self) -> &TypeDescriptor {
        &self.component
    }

    /// Array length
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Check for a zero-length array
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Read an element
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read().get(index).cloned()
    }

    /// Write an element, returning `false` when out of bounds or of the wrong type
    pub fn set(&self, index: usize, value: Value) -> bool {
        if !value.conforms_to(&self.component) {
            return false;
        }
        match self.items.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRef")
            .field("component", &self.component)
            .field("len", &self.len())
            .finish()
    }
}

/// An enumeration constant
#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    ty: TypeDescriptor,
    ordinal: usize,
    name: Arc<str>,
}

impl EnumConstant {
    /// Create a constant of enum type `ty`
    pub fn new(ty: TypeDescriptor, ordinal: usize, name: impl Into<Arc<str>>) -> Self {
        Self {
            ty,
            ordinal,
            name: name.into(),
        }
    }

    /// Declaring enum type
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Declaration position
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Constant name
    pub fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Date/time values
// ============================================================================

/// Date/time values of the built-in `util` and `time` types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Temporal {
    /// `util.Date`: an instant
    Instant(DateTime<Utc>),
    /// `util.Calendar`: an instant with a zone offset
    Calendar(DateTime<FixedOffset>),
    /// `time.LocalDate`
    LocalDate(NaiveDate),
    /// `time.LocalTime`
    LocalTime(NaiveTime),
    /// `time.LocalDateTime`
    LocalDateTime(NaiveDateTime),
    /// `time.ZonedDateTime`
    ZonedDateTime(DateTime<FixedOffset>),
    /// `time.OffsetTime`
    OffsetTime(NaiveTime, FixedOffset),
    /// `time.Period`, in days
    Period(i32),
    /// `time.Duration`
    Duration(chrono::Duration),
}

impl Temporal {
    /// Built-in type of the value
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            Temporal::Instant(_) => lang::date(),
            Temporal::Calendar(_) => lang::calendar(),
            Temporal::LocalDate(_) => lang::local_date(),
            Temporal::LocalTime(_) => lang::local_time(),
            Temporal::LocalDateTime(_) => lang::local_date_time(),
            Temporal::ZonedDateTime(_) => lang::zoned_date_time(),
            Temporal::OffsetTime(..) => lang::offset_time(),
            Temporal::Period(_) => lang::period(),
            Temporal::Duration(_) => lang::duration(),
        }
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::Instant(t) => write!(f, "{}", t.to_rfc3339()),
            Temporal::Calendar(t) | Temporal::ZonedDateTime(t) => write!(f, "{}", t.to_rfc3339()),
            Temporal::LocalDate(d) => write!(f, "{}", d),
            Temporal::LocalTime(t) => write!(f, "{}", t),
            Temporal::LocalDateTime(t) => write!(f, "{}", t),
            Temporal::OffsetTime(t, offset) => write!(f, "{}{}", t, offset),
            Temporal::Period(days) => write!(f, "P{}D", days),
            Temporal::Duration(d) => write!(f, "PT{}S", d.num_seconds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(Value::default_for(&lang::primitive(PrimitiveKind::Int)), Value::Int(0));
        assert_eq!(
            Value::default_for(&lang::primitive(PrimitiveKind::Boolean)),
            Value::Bool(false)
        );
        assert_eq!(Value::default_for(&lang::string()), Value::Null);
    }

    #[test]
    fn test_conforms_to() {
        let int = lang::primitive(PrimitiveKind::Int);
        let integer = lang::boxed(PrimitiveKind::Int).unwrap();

        assert!(Value::Int(1).conforms_to(&int));
        assert!(Value::Int(1).conforms_to(&integer));
        assert!(Value::Int(1).conforms_to(&lang::number()));
        assert!(Value::Int(1).conforms_to(&lang::object()));
        assert!(!Value::Long(1).conforms_to(&int));
        assert!(!Value::Null.conforms_to(&int));
        assert!(Value::Null.conforms_to(&integer));
        assert!(Value::from("x").conforms_to(&lang::string()));
        assert!(!Value::from("x").conforms_to(&integer));
    }

    #[test]
    fn test_simple_equality() {
        assert_eq!(Value::from("a"), Value::from("a".to_string()));
        assert_ne!(Value::Int(1), Value::Long(1));

        let list = CollectionRef::new(lang::array_list());
        let other = CollectionRef::new(lang::array_list());
        assert_eq!(Value::Collection(list.clone()), Value::Collection(other.clone()));
        assert!(!Value::Collection(list.clone()).same(&Value::Collection(other)));
        list.push(Value::Int(1));
        assert_eq!(list.len(), 1);

        let a = ArrayRef::new(lang::string(), 1);
        let b = ArrayRef::new(lang::string(), 1);
        assert_ne!(Value::Array(a.clone()), Value::Array(b));
        assert_eq!(Value::Array(a.clone()), Value::Array(a));
    }

    #[test]
    fn test_array_set_checks_type() {
        let array = ArrayRef::new(lang::primitive(PrimitiveKind::Int), 1);
        assert_eq!(array.get(0), Some(Value::Int(0)));
        assert!(array.set(0, Value::Int(7)));
        assert!(!array.set(0, Value::from("seven")));
        assert!(!array.set(1, Value::Int(8)));
        assert_eq!(array.get(0), Some(Value::Int(7)));
    }

    #[test]
    fn test_runtime_types() {
        assert_eq!(Value::Bool(true).type_descriptor(), lang::boxed(PrimitiveKind::Boolean));
        assert_eq!(Value::Null.type_descriptor(), None);
        assert_eq!(
            Value::Temporal(Temporal::Period(3)).type_descriptor(),
            Some(lang::period())
        );
        assert_eq!(
            Value::Array(ArrayRef::new(lang::string(), 0))
                .type_descriptor()
                .unwrap()
                .name(),
            "lang.String[]"
        );
    }
}
