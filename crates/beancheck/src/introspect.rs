//! Property discovery
//!
//! Properties follow the bean naming convention over public instance methods,
//! inherited ones included:
//!
//! - `getX()` with a non-void return type reads `x`
//! - `isX()` returning primitive `boolean` reads `x`
//! - `setX(value)` returning void writes `x`
//!
//! The property name is the decapitalized suffix, except that a suffix
//! starting with two capitals is kept as is (`getURL` names `URL`).

use beancheck_reflect::{lang, MethodHandle, PrimitiveKind, ReflectionHost, TypeDescriptor};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::error::{ProbeError, Result};

/// Name of the synthetic property every type exposes through `getClass`
pub const CLASS_PROPERTY: &str = "class";

/// A getter/setter pair addressing the same property
#[derive(Debug, Clone)]
pub struct PropertyPair {
    /// Property name
    pub name: String,
    /// Type the properties were discovered on
    pub declaring_type: TypeDescriptor,
    /// Reader
    pub getter: MethodHandle,
    /// Writer; its parameter type equals the getter's return type
    pub setter: MethodHandle,
}

impl PropertyPair {
    /// Property type
    pub fn property_type(&self) -> &TypeDescriptor {
        self.getter.return_type()
    }
}

/// A property with a getter and no setter
#[derive(Debug, Clone)]
pub struct ReadOnlyProperty {
    /// Property name
    pub name: String,
    /// Type the property was discovered on
    pub declaring_type: TypeDescriptor,
    /// Reader
    pub getter: MethodHandle,
}

impl ReadOnlyProperty {
    /// Property type
    pub fn property_type(&self) -> &TypeDescriptor {
        self.getter.return_type()
    }
}

/// Properties left out of verification
///
/// The synthetic `class` property is always excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCriteria {
    excluded: BTreeSet<String>,
}

impl Default for FieldCriteria {
    fn default() -> Self {
        Self {
            excluded: BTreeSet::from([CLASS_PROPERTY.to_string()]),
        }
    }
}

impl FieldCriteria {
    /// Start from the default criteria
    pub fn builder() -> FieldCriteriaBuilder {
        FieldCriteriaBuilder {
            criteria: Self::default(),
        }
    }

    /// Check whether a property is excluded
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    /// Excluded names, sorted
    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }
}

/// Builder for [`FieldCriteria`]
#[derive(Debug, Clone)]
pub struct FieldCriteriaBuilder {
    criteria: FieldCriteria,
}

impl FieldCriteriaBuilder {
    /// Exclude properties by name
    pub fn exclude_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria
            .excluded
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Remove names from the exclusion set; `class` stays excluded
    pub fn include_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if name != CLASS_PROPERTY {
                self.criteria.excluded.remove(&name);
            }
        }
        self
    }

    /// Freeze the criteria
    pub fn build(self) -> FieldCriteria {
        self.criteria
    }
}

/// Turn an accessor suffix into a property name
pub fn decapitalize(suffix: &str) -> String {
    let mut chars = suffix.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if let Some(second) = suffix.chars().nth(1) {
        if first.is_uppercase() && second.is_uppercase() {
            return suffix.to_string();
        }
    }
    first.to_lowercase().chain(chars).collect()
}

/// Turn a property name into an accessor suffix
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_primitive_boolean(ty: &TypeDescriptor) -> bool {
    ty.primitive_kind() == Some(PrimitiveKind::Boolean)
}

fn is_boxed_boolean(ty: &TypeDescriptor) -> bool {
    lang::boxed(PrimitiveKind::Boolean).as_ref() == Some(ty)
}

/// Readers and writers of one type, keyed by property name
struct Accessors {
    readers: BTreeMap<String, MethodHandle>,
    writers: BTreeMap<String, Vec<MethodHandle>>,
    /// Zero-argument methods not matching the convention, for the boxed boolean lookup
    others: Vec<MethodHandle>,
}

/// Discovers bean properties of a type
pub struct PropertyIntrospector<'h> {
    host: &'h dyn ReflectionHost,
}

impl<'h> PropertyIntrospector<'h> {
    /// Create an introspector over `host`
    pub fn new(host: &'h dyn ReflectionHost) -> Self {
        Self { host }
    }

    fn accessors(&self, ty: &TypeDescriptor) -> Result<Accessors> {
        if ty.is_primitive() || ty.is_array() {
            return Err(ProbeError::precondition(format!(
                "{} has no properties: primitive and array types are not beans",
                ty
            )));
        }

        let mut accessors = Accessors {
            readers: BTreeMap::new(),
            writers: BTreeMap::new(),
            others: Vec::new(),
        };
        for method in self.host.list_methods(ty) {
            if !method.visibility().is_public() || method.is_static() {
                continue;
            }
            let name = method.name();
            let returns_void = method.return_type().is_void();
            match method.params().len() {
                0 if !returns_void => {
                    if let Some(suffix) = name.strip_prefix("get").filter(|s| !s.is_empty()) {
                        let property = decapitalize(suffix);
                        // an `is` reader wins over `get` for primitive booleans
                        let has_is_reader = accessors
                            .readers
                            .get(&property)
                            .is_some_and(|reader| reader.name().starts_with("is"));
                        if !has_is_reader {
                            accessors.readers.insert(property, method.clone());
                        }
                    } else if let Some(suffix) = name
                        .strip_prefix("is")
                        .filter(|s| !s.is_empty() && is_primitive_boolean(method.return_type()))
                    {
                        accessors.readers.insert(decapitalize(suffix), method.clone());
                    } else {
                        accessors.others.push(method.clone());
                    }
                }
                1 if returns_void => {
                    if let Some(suffix) = name.strip_prefix("set").filter(|s| !s.is_empty()) {
                        accessors
                            .writers
                            .entry(decapitalize(suffix))
                            .or_default()
                            .push(method.clone());
                    }
                }
                _ => {}
            }
        }
        Ok(accessors)
    }

    /// Reader of a boxed `Boolean` property named `isX`
    fn boxed_boolean_reader(accessors: &Accessors, property: &str) -> Option<MethodHandle> {
        let name = format!("is{}", capitalize(property));
        accessors
            .others
            .iter()
            .find(|m| m.name() == name && is_boxed_boolean(m.return_type()))
            .cloned()
    }

    /// Walk the writers, sorting each property into a pair or a mismatch
    fn classify(
        &self,
        ty: &TypeDescriptor,
        excluded: &FieldCriteria,
    ) -> Result<(Vec<PropertyPair>, Vec<String>)> {
        let accessors = self.accessors(ty)?;
        let mut pairs = Vec::new();
        let mut mismatched = Vec::new();

        for (name, setters) in &accessors.writers {
            if excluded.is_excluded(name) {
                info!(ty = %ty, property = %name, "skipping excluded property");
                continue;
            }
            let getter = match accessors.readers.get(name) {
                Some(getter) => Some(getter.clone()),
                None if setters.iter().any(|s| is_boxed_boolean(&s.params()[0])) => {
                    Self::boxed_boolean_reader(&accessors, name)
                }
                None => None,
            };
            let Some(getter) = getter else {
                debug!(ty = %ty, property = %name, "setter without getter");
                continue;
            };
            match setters
                .iter()
                .find(|setter| setter.params()[0] == *getter.return_type())
            {
                Some(setter) => pairs.push(PropertyPair {
                    name: name.clone(),
                    declaring_type: ty.clone(),
                    getter,
                    setter: setter.clone(),
                }),
                None => {
                    debug!(
                        ty = %ty,
                        property = %name,
                        getter = %getter.return_type(),
                        setter = %setters[0].params()[0],
                        "getter and setter types differ"
                    );
                    mismatched.push(name.clone());
                }
            }
        }

        Ok((pairs, mismatched))
    }

    /// Properties with a getter and a setter of the same type, sorted by name
    pub fn find_accessor_pairs(
        &self,
        ty: &TypeDescriptor,
        excluded: &FieldCriteria,
    ) -> Result<Vec<PropertyPair>> {
        Ok(self.classify(ty, excluded)?.0)
    }

    /// Properties whose setter type differs from the getter type, sorted by name
    pub fn find_mismatched_properties(
        &self,
        ty: &TypeDescriptor,
        excluded: &FieldCriteria,
    ) -> Result<Vec<String>> {
        Ok(self.classify(ty, excluded)?.1)
    }

    /// Properties with a getter and no setter, sorted by name
    pub fn find_read_only_properties(
        &self,
        ty: &TypeDescriptor,
        excluded: &FieldCriteria,
    ) -> Result<Vec<ReadOnlyProperty>> {
        let accessors = self.accessors(ty)?;
        Ok(accessors
            .readers
            .into_iter()
            .filter(|(name, _)| !accessors.writers.contains_key(name))
            .filter(|(name, _)| !excluded.is_excluded(name))
            .map(|(name, getter)| ReadOnlyProperty {
                name,
                declaring_type: ty.clone(),
                getter,
            })
            .collect())
    }
}
