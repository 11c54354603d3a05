//! Basic-type rules
//!
//! A [`BasicTypeRule`] pairs a predicate with a generator. The
//! [`RuleRegistry`] keeps rules in order and the first matching rule wins.
//! Built-in rules cover the root object type, class literals, strings,
//! primitives and their boxes, collections, arrays, enums and the date/time
//! family; callers may append their own.

use beancheck_reflect::{
    lang, ArrayRef, CollectionRef, PrimitiveKind, ReflectionHost, TypeDescriptor, Value,
    OBJECT_TYPE_NAME,
};
use std::fmt;
use std::sync::Arc;

use super::temporal;
use crate::error::Result;

/// Decides whether a rule applies to a requested type
pub type Predicate = Arc<dyn Fn(&TypeDescriptor, &dyn ReflectionHost) -> bool + Send + Sync>;

/// Produces a value of a requested type
pub type Generator = Arc<dyn Fn(&TypeDescriptor, &dyn ReflectionHost) -> Result<Value> + Send + Sync>;

/// String produced for every requested string
pub const STRING_VALUE: &str = "whatever";
/// Integral numbers produced for `int`, `long` and `short`
pub const INTEGRAL_VALUE: i32 = 1337;
/// Floating point numbers produced for `float` and `double`
pub const FLOATING_VALUE: f64 = 13.37;
/// Value produced for `byte`
pub const BYTE_VALUE: i8 = 13;
/// Value produced for `char`
pub const CHAR_VALUE: char = 'Y';

/// A named predicate/generator pair
#[derive(Clone)]
pub struct BasicTypeRule {
    name: String,
    predicate: Predicate,
    generator: Generator,
}

impl BasicTypeRule {
    /// Create a rule
    pub fn new<P, G>(name: impl Into<String>, predicate: P, generator: G) -> Self
    where
        P: Fn(&TypeDescriptor, &dyn ReflectionHost) -> bool + Send + Sync + 'static,
        G: Fn(&TypeDescriptor, &dyn ReflectionHost) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
            generator: Arc::new(generator),
        }
    }

    /// Create a rule that applies to exactly one type
    pub fn for_type<G>(ty: &TypeDescriptor, generator: G) -> Self
    where
        G: Fn(&TypeDescriptor, &dyn ReflectionHost) -> Result<Value> + Send + Sync + 'static,
    {
        let target = ty.clone();
        Self::new(ty.name(), move |requested, _| *requested == target, generator)
    }

    /// Rule name, for logging
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether the rule applies
    pub fn matches(&self, ty: &TypeDescriptor, host: &dyn ReflectionHost) -> bool {
        (self.predicate)(ty, host)
    }

    /// Produce a value
    pub fn generate(&self, ty: &TypeDescriptor, host: &dyn ReflectionHost) -> Result<Value> {
        (self.generator)(ty, host)
    }
}

impl fmt::Debug for BasicTypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BasicTypeRule({})", self.name)
    }
}

/// Ordered, append-only list of rules
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<BasicTypeRule>,
}

impl RuleRegistry {
    /// Registry holding no rules
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the built-in rules
    pub fn with_builtins() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Append a rule after every existing one
    pub fn push(&mut self, rule: BasicTypeRule) {
        self.rules.push(rule);
    }

    /// First rule matching `ty`
    pub fn find(&self, ty: &TypeDescriptor, host: &dyn ReflectionHost) -> Option<&BasicTypeRule> {
        self.rules.iter().find(|rule| rule.matches(ty, host))
    }

    /// Rule names in order
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check for an empty registry
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Matches a primitive kind and its boxed type
fn primitive_rule(kind: PrimitiveKind, value: Value) -> BasicTypeRule {
    let boxed = lang::boxed(kind);
    BasicTypeRule::new(
        kind.type_name(),
        move |ty, _| ty.primitive_kind() == Some(kind) || boxed.as_ref() == Some(ty),
        move |_, _| Ok(value.clone()),
    )
}

/// Matches the requested type when it is a supertype of `concrete` inside `family`
fn collection_rule(name: &str, concrete: TypeDescriptor, family: TypeDescriptor) -> BasicTypeRule {
    let produced = concrete.clone();
    BasicTypeRule::new(
        name,
        move |ty, _| ty.is_assignable_from(&concrete) && family.is_assignable_from(ty),
        move |_, _| Ok(Value::Collection(CollectionRef::new(produced.clone()))),
    )
}

fn builtin_rules() -> Vec<BasicTypeRule> {
    let mut rules = vec![
        BasicTypeRule::new(
            "object",
            |ty, _| ty.name() == OBJECT_TYPE_NAME,
            |ty, host| Ok(Value::Object(host.allocate(ty, false)?)),
        ),
        BasicTypeRule::new(
            "class",
            |ty, _| *ty == lang::class(),
            |ty, _| Ok(Value::Type(ty.clone())),
        ),
        BasicTypeRule::new(
            "string",
            |ty, _| lang::string().is_assignable_from(ty),
            |_, _| Ok(Value::from(STRING_VALUE)),
        ),
        primitive_rule(PrimitiveKind::Boolean, Value::Bool(true)),
        primitive_rule(PrimitiveKind::Int, Value::Int(INTEGRAL_VALUE)),
        primitive_rule(PrimitiveKind::Long, Value::Long(INTEGRAL_VALUE as i64)),
        primitive_rule(PrimitiveKind::Double, Value::Double(FLOATING_VALUE)),
        primitive_rule(PrimitiveKind::Float, Value::Float(FLOATING_VALUE as f32)),
        primitive_rule(PrimitiveKind::Char, Value::Char(CHAR_VALUE)),
        primitive_rule(PrimitiveKind::Byte, Value::Byte(BYTE_VALUE)),
        primitive_rule(PrimitiveKind::Short, Value::Short(INTEGRAL_VALUE as i16)),
        collection_rule("list", lang::array_list(), lang::collection()),
        collection_rule("set", lang::hash_set(), lang::set()),
        BasicTypeRule::new(
            "array",
            |ty, _| ty.is_array(),
            |ty, _| match ty.component_type() {
                Some(component) => Ok(Value::Array(ArrayRef::new(component.clone(), 1))),
                None => Err(crate::ProbeError::ObjectInstantiation {
                    type_name: ty.to_string(),
                    reason: "array type without a component type".to_string(),
                }),
            },
        ),
        BasicTypeRule::new(
            "enum",
            |ty, host| ty.is_enum() && !host.enum_constants(ty).is_empty(),
            |ty, host| {
                host.enum_constants(ty)
                    .into_iter()
                    .next()
                    .ok_or_else(|| crate::ProbeError::ObjectInstantiation {
                        type_name: ty.to_string(),
                        reason: "enum declares no constants".to_string(),
                    })
            },
        ),
    ];
    rules.extend(temporal::rules());
    rules
}
