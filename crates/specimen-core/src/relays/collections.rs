//! Relays from abstract collection and sequence shapes to concrete ones.

use crate::builder::SpecimenBuilder;
use crate::builders::TypeRelay;
use crate::context::SpecimenContext;
use crate::errors::{ResolutionError, ResolutionResult};
use crate::well_known::{
    self, collection, dictionary, enumerable, hash_set, indexed_list, list, map, set,
    sorted_dictionary,
};
use specimen_types::{MapValue, Request, SequenceShape, SequenceValue, Specimen, TypeRef, Value};

fn t() -> TypeRef {
    TypeRef::param("T")
}

/// `Collection<T>` -> `List<T>`.
pub fn collection_relay() -> TypeRelay {
    TypeRelay::from_parts(collection(t()), list(t()))
}

/// `IndexedList<T>` -> `List<T>`.
pub fn list_relay() -> TypeRelay {
    TypeRelay::from_parts(indexed_list(t()), list(t()))
}

/// `Set<T>` -> `HashSet<T>`.
pub fn set_relay() -> TypeRelay {
    TypeRelay::from_parts(set(t()), hash_set(t()))
}

/// `Map<K, V>` -> `Dictionary<K, V>`.
pub fn dictionary_relay() -> TypeRelay {
    let (k, v) = (TypeRef::param("K"), TypeRef::param("V"));
    TypeRelay::from_parts(map(k.clone(), v.clone()), dictionary(k, v))
}

/// Item type of a closed request for the single-argument shape `name`.
fn closed_item<'a>(request: &'a Request, name: &str) -> Option<&'a TypeRef> {
    let ty = request.as_type()?;
    match (ty.definition_name(), ty.generic_args()) {
        (Some(n), [item]) if n == name && !ty.is_open() => Some(item),
        _ => None,
    }
}

/// Present a resolved value as a sequence of the given shape.
fn reshape(result: Specimen, element: &TypeRef, shape: SequenceShape) -> ResolutionResult<Specimen> {
    match result {
        Specimen::Value(Value::Sequence(s)) => Ok(Specimen::Value(Value::Sequence(s.with_shape(shape)))),
        Specimen::Value(other) => {
            let items = other
                .items()
                .map_err(ResolutionError::from_sequence_error)?
                .ok_or_else(|| {
                    ResolutionError::contract(format!(
                        "expected a sequence of {} but got {}",
                        element, other
                    ))
                })?;
            Ok(Specimen::Value(Value::Sequence(
                SequenceValue::stable(element.clone(), items).with_shape(shape),
            )))
        }
        sentinel => Ok(sentinel),
    }
}

/// `Enumerable<T>` -> many `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerableRelay;

impl SpecimenBuilder for EnumerableRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Some(item) = closed_item(request, well_known::ENUMERABLE) else {
            return Ok(Specimen::none_for(request));
        };
        let result = context.resolve(&Request::multiple(Request::of(item.clone())))?;
        reshape(result, item, SequenceShape::Enumerable)
    }
}

/// `Queryable<T>` -> `Enumerable<T>`, presented as queryable.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryableRelay;

impl SpecimenBuilder for QueryableRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Some(item) = closed_item(request, well_known::QUERYABLE) else {
            return Ok(Specimen::none_for(request));
        };
        let result = context.resolve(&Request::of(enumerable(item.clone())))?;
        reshape(result, item, SequenceShape::Queryable)
    }
}

/// `Enumerator<T>` -> `Enumerable<T>`, presented as an enumerator.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumeratorRelay;

impl SpecimenBuilder for EnumeratorRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Some(item) = closed_item(request, well_known::ENUMERATOR) else {
            return Ok(Specimen::none_for(request));
        };
        let result = context.resolve(&Request::of(enumerable(item.clone())))?;
        reshape(result, item, SequenceShape::Enumerator)
    }
}

/// `SortedList<K, V>` -> the entries of a `SortedDictionary<K, V>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedListRelay;

impl SpecimenBuilder for SortedListRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Some(ty) = request.as_type() else {
            return Ok(Specimen::none_for(request));
        };
        let (key, value) = match (ty.definition_name(), ty.generic_args()) {
            (Some(well_known::SORTED_LIST), [k, v]) if !ty.is_open() => (k, v),
            _ => return Ok(Specimen::none_for(request)),
        };

        let source = sorted_dictionary(key.clone(), value.clone());
        match context.resolve(&Request::of(source))? {
            Specimen::Value(Value::Map(resolved)) => {
                let mut entries = resolved.entries;
                entries.sort_by(|a, b| a.0.sort_cmp(&b.0));
                let mut sorted = MapValue::new(ty.clone());
                for (k, v) in entries {
                    sorted.insert(k, v);
                }
                Ok(Specimen::Value(Value::Map(sorted)))
            }
            Specimen::Value(other) => Err(ResolutionError::contract(format!(
                "expected a sorted dictionary for {} but got {}",
                ty, other
            ))),
            sentinel => Ok(sentinel),
        }
    }
}
