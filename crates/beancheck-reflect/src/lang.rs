//! Built-in types
//!
//! Every [`TypeCatalog`](crate::TypeCatalog) starts out with these types
//! registered: the root object type, class literals, strings, the boxed
//! primitives, the collection family, the date/time family and the
//! throwable hierarchy. Descriptors are process-wide singletons.

use once_cell::sync::Lazy;

use crate::builder::{ClassBuilder, ExceptionShape};
use crate::catalog::TypeCatalog;
use crate::descriptor::{Modifiers, PrimitiveKind, TypeDescriptor, TypeKind, OBJECT_TYPE_NAME};
use crate::error::CatalogError;
use crate::value::Value;

/// Name of the class literal type
pub const CLASS_TYPE_NAME: &str = "lang.Class";
/// Name of the string type
pub const STRING_TYPE_NAME: &str = "lang.String";
/// Name of the root of the throwable hierarchy
pub const THROWABLE_TYPE_NAME: &str = "lang.Throwable";

const FINAL: Modifiers = Modifiers {
    is_final: true,
    is_abstract: false,
};

const ABSTRACT: Modifiers = Modifiers {
    is_final: false,
    is_abstract: true,
};

fn class_of(name: &str, modifiers: Modifiers, supertypes: Vec<TypeDescriptor>) -> TypeDescriptor {
    TypeDescriptor::new(name, TypeKind::Class, modifiers, Vec::new(), supertypes)
}

fn generic(
    name: &str,
    kind: TypeKind,
    supertypes: Vec<TypeDescriptor>,
) -> TypeDescriptor {
    TypeDescriptor::new(name, kind, Modifiers::default(), vec!["E".to_string()], supertypes)
}

static OBJECT: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of(OBJECT_TYPE_NAME, Modifiers::default(), Vec::new()));
static CLASS: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of(CLASS_TYPE_NAME, FINAL, vec![object()]));
static STRING: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of(STRING_TYPE_NAME, FINAL, vec![object()]));
static NUMBER: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("lang.Number", ABSTRACT, vec![object()]));

static PRIMITIVES: Lazy<Vec<TypeDescriptor>> = Lazy::new(|| {
    PrimitiveKind::ALL
        .iter()
        .map(|kind| TypeDescriptor::primitive(*kind))
        .collect()
});

static BOXED: Lazy<Vec<(PrimitiveKind, TypeDescriptor)>> = Lazy::new(|| {
    PrimitiveKind::ALL
        .iter()
        .filter_map(|kind| {
            let name = kind.boxed_name()?;
            let parent = match kind {
                PrimitiveKind::Boolean | PrimitiveKind::Char => object(),
                _ => number(),
            };
            Some((*kind, class_of(name, FINAL, vec![parent])))
        })
        .collect()
});

static COLLECTION: Lazy<TypeDescriptor> =
    Lazy::new(|| generic("util.Collection", TypeKind::Interface, Vec::new()));
static LIST: Lazy<TypeDescriptor> =
    Lazy::new(|| generic("util.List", TypeKind::Interface, vec![collection()]));
static ARRAY_LIST: Lazy<TypeDescriptor> =
    Lazy::new(|| generic("util.ArrayList", TypeKind::Class, vec![object(), list()]));
static SET: Lazy<TypeDescriptor> =
    Lazy::new(|| generic("util.Set", TypeKind::Interface, vec![collection()]));
static HASH_SET: Lazy<TypeDescriptor> =
    Lazy::new(|| generic("util.HashSet", TypeKind::Class, vec![object(), set()]));

static DATE: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("util.Date", Modifiers::default(), vec![object()]));
static CALENDAR: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("util.Calendar", ABSTRACT, vec![object()]));
static LOCAL_DATE: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("time.LocalDate", FINAL, vec![object()]));
static LOCAL_TIME: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("time.LocalTime", FINAL, vec![object()]));
static LOCAL_DATE_TIME: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("time.LocalDateTime", FINAL, vec![object()]));
static ZONED_DATE_TIME: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("time.ZonedDateTime", FINAL, vec![object()]));
static OFFSET_TIME: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("time.OffsetTime", FINAL, vec![object()]));
static PERIOD: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("time.Period", FINAL, vec![object()]));
static DURATION: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("time.Duration", FINAL, vec![object()]));

static THROWABLE: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of(THROWABLE_TYPE_NAME, Modifiers::default(), vec![object()]));
static EXCEPTION: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("lang.Exception", Modifiers::default(), vec![throwable()]));
static RUNTIME_EXCEPTION: Lazy<TypeDescriptor> =
    Lazy::new(|| class_of("lang.RuntimeException", Modifiers::default(), vec![exception()]));

/// `lang.Object`, the root of every reference type
pub fn object() -> TypeDescriptor {
    OBJECT.clone()
}

/// `lang.Class`, the type of class literals
pub fn class() -> TypeDescriptor {
    CLASS.clone()
}

/// `lang.String`
pub fn string() -> TypeDescriptor {
    STRING.clone()
}

/// `lang.Number`, the abstract parent of the numeric boxed types
pub fn number() -> TypeDescriptor {
    NUMBER.clone()
}

/// Primitive type descriptor
pub fn primitive(kind: PrimitiveKind) -> TypeDescriptor {
    PRIMITIVES
        .iter()
        .find(|ty| ty.primitive_kind() == Some(kind))
        .cloned()
        .unwrap_or_else(|| TypeDescriptor::primitive(kind))
}

/// Boxed counterpart of a primitive kind; `None` for `void`
pub fn boxed(kind: PrimitiveKind) -> Option<TypeDescriptor> {
    BOXED
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, ty)| ty.clone())
}

/// Array of `component`
pub fn array_of(component: &TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::array_of(component, &OBJECT)
}

/// `util.Collection<E>`
pub fn collection() -> TypeDescriptor {
    COLLECTION.clone()
}

/// `util.List<E>`
pub fn list() -> TypeDescriptor {
    LIST.clone()
}

/// `util.ArrayList<E>`
pub fn array_list() -> TypeDescriptor {
    ARRAY_LIST.clone()
}

/// `util.Set<E>`
pub fn set() -> TypeDescriptor {
    SET.clone()
}

/// `util.HashSet<E>`
pub fn hash_set() -> TypeDescriptor {
    HASH_SET.clone()
}

/// `util.Date`
pub fn date() -> TypeDescriptor {
    DATE.clone()
}

/// `util.Calendar`
pub fn calendar() -> TypeDescriptor {
    CALENDAR.clone()
}

/// `time.LocalDate`
pub fn local_date() -> TypeDescriptor {
    LOCAL_DATE.clone()
}

/// `time.LocalTime`
pub fn local_time() -> TypeDescriptor {
    LOCAL_TIME.clone()
}

/// `time.LocalDateTime`
pub fn local_date_time() -> TypeDescriptor {
    LOCAL_DATE_TIME.clone()
}

/// `time.ZonedDateTime`
pub fn zoned_date_time() -> TypeDescriptor {
    ZONED_DATE_TIME.clone()
}

/// `time.OffsetTime`
pub fn offset_time() -> TypeDescriptor {
    OFFSET_TIME.clone()
}

/// `time.Period`
pub fn period() -> TypeDescriptor {
    PERIOD.clone()
}

/// `time.Duration`
pub fn duration() -> TypeDescriptor {
    DURATION.clone()
}

/// `lang.Throwable`
pub fn throwable() -> TypeDescriptor {
    THROWABLE.clone()
}

/// `lang.Exception`
pub fn exception() -> TypeDescriptor {
    EXCEPTION.clone()
}

/// `lang.RuntimeException`
pub fn runtime_exception() -> TypeDescriptor {
    RUNTIME_EXCEPTION.clone()
}

/// Every built-in reference type, supertypes before subtypes
pub fn builtin_types() -> Vec<TypeDescriptor> {
    let mut types = vec![object(), class(), string(), number()];
    types.extend(BOXED.iter().map(|(_, ty)| ty.clone()));
    types.extend([
        collection(),
        list(),
        array_list(),
        set(),
        hash_set(),
        date(),
        calendar(),
        local_date(),
        local_time(),
        local_date_time(),
        zoned_date_time(),
        offset_time(),
        period(),
        duration(),
    ]);
    types
}

/// Render a throwable the way its cause-only constructor records it:
/// `Type: message`, or just `Type` without a message
pub fn describe_throwable(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    Some(match object.get_field("message") {
        Some(Value::Str(message)) => format!("{}: {}", object.ty(), message),
        _ => object.ty().to_string(),
    })
}

/// Register the built-in types in `catalog`
pub(crate) fn install(catalog: &TypeCatalog) -> Result<(), CatalogError> {
    catalog.define(
        ClassBuilder::predefined(object())
            .method("getClass", &[], &class(), |this, _| {
                Ok(Value::Type(this.ty().clone()))
            }),
    )?;

    for ty in builtin_types().into_iter().skip(1) {
        catalog.define(ClassBuilder::predefined(ty).without_implicit_constructor())?;
    }

    catalog.define(
        ClassBuilder::predefined(throwable())
            .field("message", &string())
            .field("cause", &throwable())
            .getter("getMessage", "message", &string())
            .getter("getCause", "cause", &throwable())
            .exception_constructors(&ExceptionShape::ALL),
    )?;
    catalog.define(ClassBuilder::predefined(exception()).exception_constructors(&ExceptionShape::ALL))?;
    catalog.define(
        ClassBuilder::predefined(runtime_exception()).exception_constructors(&ExceptionShape::ALL),
    )?;

    Ok(())
}
