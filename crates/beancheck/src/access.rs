//! Direct access to internals
//!
//! Bypasses accessors and visibility: fields are written directly and methods
//! of any visibility are invoked by name.

use beancheck_reflect::{ObjectRef, ReflectionHost, Value};

use crate::error::{ProbeError, Result};

fn target_object<'v>(target: &'v Value, action: &str) -> Result<&'v ObjectRef> {
    target.as_object().ok_or_else(|| {
        ProbeError::precondition(format!("cannot {} on non-object value {}", action, target))
    })
}

/// Assign a declared field of `target`, inherited fields included
pub fn set_internal_field(
    host: &dyn ReflectionHost,
    target: &Value,
    name: &str,
    value: Value,
) -> Result<()> {
    let object = target_object(target, "set a field")?;
    let field = host
        .instance_fields(object.ty())
        .into_iter()
        .find(|field| field.name == name)
        .filter(|_| object.has_field(name))
        .ok_or_else(|| ProbeError::NoSuchField {
            type_name: object.ty().to_string(),
            field: name.to_string(),
        })?;
    if !value.conforms_to(&field.ty) {
        return Err(ProbeError::precondition(format!(
            "value {} cannot be assigned to field {} of type {}",
            value, name, field.ty
        )));
    }
    object.set_field(name, value);
    Ok(())
}

/// Invoke a method of any visibility by name and argument count
pub fn invoke_private_method(
    host: &dyn ReflectionHost,
    target: &Value,
    name: &str,
    args: &[Value],
) -> Result<Value> {
    let object = target_object(target, "invoke a method")?;
    let method = host
        .list_methods(object.ty())
        .into_iter()
        .find(|method| method.name() == name && method.params().len() == args.len())
        .ok_or_else(|| ProbeError::NoSuchMethod {
            type_name: object.ty().to_string(),
            method: format!("{}/{}", name, args.len()),
        })?;
    Ok(host.invoke(&method, target, args)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beancheck_reflect::{lang, ClassBuilder, PrimitiveKind, TypeCatalog};

    fn vault(catalog: &TypeCatalog) -> Value {
        let ty = catalog
            .define(
                ClassBuilder::class("acme.Vault")
                    .field("code", &lang::primitive(PrimitiveKind::Int))
                    .private_method(
                        "peek",
                        &[],
                        &lang::primitive(PrimitiveKind::Int),
                        |this, _| Ok(this.get_field("code").unwrap_or(Value::Null)),
                    ),
            )
            .unwrap();
        catalog.allocate(&ty, false).map(Value::Object).unwrap()
    }

    #[test]
    fn test_set_field_then_invoke_private() {
        let catalog = TypeCatalog::new();
        let target = vault(&catalog);

        set_internal_field(&catalog, &target, "code", Value::Int(42)).unwrap();
        assert_eq!(
            invoke_private_method(&catalog, &target, "peek", &[]).unwrap(),
            Value::Int(42)
        );
    }

    #[test]
    fn test_missing_members() {
        let catalog = TypeCatalog::new();
        let target = vault(&catalog);

        assert!(matches!(
            set_internal_field(&catalog, &target, "missing", Value::Int(1)),
            Err(ProbeError::NoSuchField { .. })
        ));
        assert!(matches!(
            invoke_private_method(&catalog, &target, "peek", &[Value::Int(1)]),
            Err(ProbeError::NoSuchMethod { .. })
        ));
    }

    #[test]
    fn test_type_and_target_checks() {
        let catalog = TypeCatalog::new();
        let target = vault(&catalog);

        let err = set_internal_field(&catalog, &target, "code", Value::from("x")).unwrap_err();
        assert!(err.is_precondition());
        let err = set_internal_field(&catalog, &Value::Int(3), "code", Value::Int(1)).unwrap_err();
        assert!(err.is_precondition());
    }
}
