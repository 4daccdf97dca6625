//! Type-argument inference for generic methods.

use crate::catalog::TypeCatalog;
use crate::errors::{ResolutionError, ResolutionResult};
use specimen_types::{TypeRef, Value};
use std::collections::BTreeMap;

/// Bind every generic parameter in `generic_params` by unifying each open
/// parameter type with the runtime type of its argument.
///
/// Unification walks nested generic arguments, arrays and pointers, and
/// looks through the argument's base types and interfaces to find the
/// instantiation a parameter type names. When a parameter is bound more than
/// once, the most derived candidate that every other candidate is assignable
/// from wins; conflicting or missing bindings fail with
/// [`ResolutionError::TypeInference`].
pub fn infer_type_arguments(
    catalog: &TypeCatalog,
    method: &str,
    generic_params: &[String],
    param_types: &[TypeRef],
    args: &[Value],
) -> ResolutionResult<BTreeMap<String, TypeRef>> {
    let mut candidates: BTreeMap<String, Vec<TypeRef>> = BTreeMap::new();
    for (param, arg) in param_types.iter().zip(args) {
        if let Some(actual) = arg.runtime_type() {
            unify(catalog, param, &actual, &mut candidates);
        }
    }

    let mut bindings = BTreeMap::new();
    let mut unbound = Vec::new();
    for name in generic_params {
        match candidates.get(name).and_then(|c| most_derived(catalog, c)) {
            Some(ty) => {
                bindings.insert(name.clone(), ty);
            }
            None => unbound.push(name.clone()),
        }
    }

    if !unbound.is_empty() {
        return Err(ResolutionError::TypeInference {
            method: method.to_string(),
            unbound,
        });
    }
    Ok(bindings)
}

fn unify(
    catalog: &TypeCatalog,
    param: &TypeRef,
    actual: &TypeRef,
    out: &mut BTreeMap<String, Vec<TypeRef>>,
) {
    match param {
        TypeRef::Param(name) => {
            let slot = out.entry(name.clone()).or_default();
            if !slot.contains(actual) {
                slot.push(actual.clone());
            }
        }
        TypeRef::Named { args, .. } if param.is_open() => {
            let instantiation = if actual.same_definition(param) {
                Some(actual.clone())
            } else {
                catalog
                    .ancestors(actual)
                    .into_iter()
                    .find(|a| a.same_definition(param))
            };
            if let Some(found) = instantiation {
                for (p, a) in args.iter().zip(found.generic_args()) {
                    unify(catalog, p, a, out);
                }
            }
        }
        TypeRef::Array { element, rank } => {
            if let TypeRef::Array {
                element: actual_element,
                rank: actual_rank,
            } = actual
            {
                if rank == actual_rank {
                    unify(catalog, element, actual_element, out);
                }
            }
        }
        TypeRef::Pointer(target) => {
            if let TypeRef::Pointer(actual_target) = actual {
                unify(catalog, target, actual_target, out);
            }
        }
        _ => {}
    }
}

fn most_derived(catalog: &TypeCatalog, candidates: &[TypeRef]) -> Option<TypeRef> {
    candidates
        .iter()
        .find(|c| candidates.iter().all(|other| catalog.is_assignable(other, c)))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeDefinition;
    use crate::well_known::{enumerable, list};
    use specimen_types::{CollectionValue, Instance};
    use std::sync::Arc;

    fn animals() -> TypeCatalog {
        let mut catalog = TypeCatalog::with_well_known();
        catalog
            .register(TypeDefinition::class("Animal"))
            .register(TypeDefinition::class("Dog").base(TypeRef::named("Animal")));
        catalog
    }

    fn object(name: &str) -> Value {
        Value::Object(Arc::new(Instance::new(TypeRef::named(name))))
    }

    #[test]
    fn test_prefers_most_derived_binding() {
        let catalog = animals();
        let t = TypeRef::param("T");
        let bindings = infer_type_arguments(
            &catalog,
            "pair",
            &["T".to_string()],
            &[t.clone(), t],
            &[object("Animal"), object("Dog")],
        )
        .unwrap();
        assert_eq!(bindings["T"], TypeRef::named("Dog"));
    }

    #[test]
    fn test_looks_through_interfaces() {
        let catalog = animals();
        let items = Value::Collection(CollectionValue::new(list(TypeRef::named("Dog")), vec![]));
        let bindings = infer_type_arguments(
            &catalog,
            "first",
            &["T".to_string()],
            &[enumerable(TypeRef::param("T"))],
            &[items],
        )
        .unwrap();
        assert_eq!(bindings["T"], TypeRef::named("Dog"));
    }

    #[test]
    fn test_conflicting_bindings_fail() {
        let catalog = animals();
        let t = TypeRef::param("T");
        let err = infer_type_arguments(
            &catalog,
            "pair",
            &["T".to_string(), "U".to_string()],
            &[t.clone(), t],
            &[Value::I32(1), Value::from("x")],
        )
        .unwrap_err();
        match err {
            ResolutionError::TypeInference { method, unbound } => {
                assert_eq!(method, "pair");
                assert_eq!(unbound, vec!["T".to_string(), "U".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
