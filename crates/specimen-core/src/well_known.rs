//! Well-known collection and sequence shapes.
//!
//! Abstract shapes (`Enumerable<T>`, `Collection<T>`, `Map<K, V>`, ...) have
//! no constructors; relays map them onto the concrete containers registered
//! here. Concrete containers expose an empty constructor plus one that takes
//! the items, so the enumerable-favoring query can populate them.

use crate::catalog::{Invocation, MethodDef, ParamDef, TypeCatalog, TypeDefinition};
use crate::errors::{ResolutionError, ResolutionResult};
use specimen_types::{CollectionValue, MapValue, TypeRef, Value};

pub const ENUMERABLE: &str = "Enumerable";
pub const QUERYABLE: &str = "Queryable";
pub const ENUMERATOR: &str = "Enumerator";
pub const COLLECTION: &str = "Collection";
pub const INDEXED_LIST: &str = "IndexedList";
pub const SET: &str = "Set";
pub const MAP: &str = "Map";
pub const KEY_VALUE_PAIR: &str = "KeyValuePair";
pub const LIST: &str = "List";
pub const HASH_SET: &str = "HashSet";
pub const OBSERVABLE_COLLECTION: &str = "ObservableCollection";
pub const DICTIONARY: &str = "Dictionary";
pub const SORTED_DICTIONARY: &str = "SortedDictionary";
pub const SORTED_LIST: &str = "SortedList";

pub fn enumerable(item: TypeRef) -> TypeRef {
    TypeRef::generic(ENUMERABLE, vec![item])
}

pub fn queryable(item: TypeRef) -> TypeRef {
    TypeRef::generic(QUERYABLE, vec![item])
}

pub fn enumerator(item: TypeRef) -> TypeRef {
    TypeRef::generic(ENUMERATOR, vec![item])
}

pub fn collection(item: TypeRef) -> TypeRef {
    TypeRef::generic(COLLECTION, vec![item])
}

pub fn indexed_list(item: TypeRef) -> TypeRef {
    TypeRef::generic(INDEXED_LIST, vec![item])
}

pub fn set(item: TypeRef) -> TypeRef {
    TypeRef::generic(SET, vec![item])
}

pub fn map(key: TypeRef, value: TypeRef) -> TypeRef {
    TypeRef::generic(MAP, vec![key, value])
}

pub fn key_value_pair(key: TypeRef, value: TypeRef) -> TypeRef {
    TypeRef::generic(KEY_VALUE_PAIR, vec![key, value])
}

pub fn list(item: TypeRef) -> TypeRef {
    TypeRef::generic(LIST, vec![item])
}

pub fn hash_set(item: TypeRef) -> TypeRef {
    TypeRef::generic(HASH_SET, vec![item])
}

pub fn observable_collection(item: TypeRef) -> TypeRef {
    TypeRef::generic(OBSERVABLE_COLLECTION, vec![item])
}

pub fn dictionary(key: TypeRef, value: TypeRef) -> TypeRef {
    TypeRef::generic(DICTIONARY, vec![key, value])
}

pub fn sorted_dictionary(key: TypeRef, value: TypeRef) -> TypeRef {
    TypeRef::generic(SORTED_DICTIONARY, vec![key, value])
}

pub fn sorted_list(key: TypeRef, value: TypeRef) -> TypeRef {
    TypeRef::generic(SORTED_LIST, vec![key, value])
}

/// Add every well-known shape to `catalog`, replacing same-named entries.
pub fn register_well_known(catalog: &mut TypeCatalog) {
    let t = || TypeRef::param("T");
    let k = || TypeRef::param("K");
    let v = || TypeRef::param("V");

    catalog
        .register(TypeDefinition::interface(ENUMERABLE).generic(["T"]))
        .register(
            TypeDefinition::interface(QUERYABLE)
                .generic(["T"])
                .implements(enumerable(t())),
        )
        .register(TypeDefinition::interface(ENUMERATOR).generic(["T"]))
        .register(
            TypeDefinition::interface(COLLECTION)
                .generic(["T"])
                .implements(enumerable(t())),
        )
        .register(
            TypeDefinition::interface(INDEXED_LIST)
                .generic(["T"])
                .implements(collection(t())),
        )
        .register(
            TypeDefinition::interface(SET)
                .generic(["T"])
                .implements(collection(t())),
        )
        .register(
            TypeDefinition::interface(MAP)
                .generic(["K", "V"])
                .implements(collection(key_value_pair(k(), v()))),
        )
        .register(
            TypeDefinition::class(KEY_VALUE_PAIR)
                .generic(["K", "V"])
                .constructor([("key", k()), ("value", v())]),
        )
        .register(sequence_class(LIST, indexed_list(t()), enumerable(t()), false))
        .register(sequence_class(HASH_SET, set(t()), enumerable(t()), true))
        .register(sequence_class(
            OBSERVABLE_COLLECTION,
            indexed_list(t()),
            list(t()),
            false,
        ))
        .register(map_class(DICTIONARY, false))
        .register(map_class(SORTED_DICTIONARY, true))
        .register(
            TypeDefinition::class(SORTED_LIST)
                .generic(["K", "V"])
                .implements(map(k(), v()))
                .method(MethodDef::constructor(vec![]).with_body(empty_map)),
        );
}

fn sequence_class(name: &str, implements: TypeRef, source: TypeRef, distinct: bool) -> TypeDefinition {
    TypeDefinition::class(name)
        .generic(["T"])
        .implements(implements)
        .method(MethodDef::constructor(vec![]).with_body(|inv| {
            Ok(Value::Collection(CollectionValue::new(
                inv.declaring.clone(),
                Vec::new(),
            )))
        }))
        .method(
            MethodDef::constructor(vec![ParamDef::new("items", source)])
                .named("from_items")
                .with_body(move |inv| {
                    let mut items = items_arg(inv, "items")?;
                    if distinct {
                        let mut seen = std::collections::HashSet::new();
                        items.retain(|item| seen.insert(item.clone()));
                    }
                    Ok(Value::Collection(CollectionValue::new(
                        inv.declaring.clone(),
                        items,
                    )))
                }),
        )
}

fn map_class(name: &str, sorted: bool) -> TypeDefinition {
    let k = || TypeRef::param("K");
    let v = || TypeRef::param("V");
    TypeDefinition::class(name)
        .generic(["K", "V"])
        .implements(map(k(), v()))
        .method(MethodDef::constructor(vec![]).with_body(empty_map))
        .method(
            MethodDef::constructor(vec![ParamDef::new(
                "pairs",
                enumerable(key_value_pair(k(), v())),
            )])
            .named("from_pairs")
            .with_body(move |inv| {
                let mut map = MapValue::new(inv.declaring.clone());
                for pair in items_arg(inv, "pairs")? {
                    let entry = pair.as_object().ok_or_else(|| {
                        ResolutionError::invocation(
                            format!("{}::from_pairs", inv.declaring),
                            format!("expected a key/value pair, got {}", pair),
                        )
                    })?;
                    let key = entry.get("key").unwrap_or(Value::Null);
                    let value = entry.get("value").unwrap_or(Value::Null);
                    map.insert(key, value);
                }
                if sorted {
                    map.entries.sort_by(|a, b| a.0.sort_cmp(&b.0));
                }
                Ok(Value::Map(map))
            }),
        )
}

fn empty_map(inv: &Invocation<'_>) -> ResolutionResult<Value> {
    Ok(Value::Map(MapValue::new(inv.declaring.clone())))
}

fn items_arg(inv: &Invocation<'_>, name: &str) -> ResolutionResult<Vec<Value>> {
    let arg = inv.arg(name).ok_or_else(|| {
        ResolutionError::invocation(inv.method, format!("missing argument {}", name))
    })?;
    arg.items()
        .map_err(ResolutionError::from_sequence_error)?
        .ok_or_else(|| {
            ResolutionError::invocation(inv.method, format!("{} is not a sequence: {}", name, arg))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::Method;
    use specimen_types::{Instance, SequenceValue};
    use std::sync::Arc;

    fn pair(key: i32, value: &str) -> Value {
        Value::Object(Arc::new(Instance::pair(Value::I32(key), Value::from(value))))
    }

    #[test]
    fn test_hash_set_drops_duplicates() {
        let catalog = TypeCatalog::with_well_known();
        let ty = hash_set(TypeRef::i32());
        let ctor = catalog
            .constructors(&ty)
            .into_iter()
            .find(|m| m.parameters().len() == 1)
            .unwrap();
        let items = Value::Sequence(SequenceValue::stable(
            TypeRef::i32(),
            vec![Value::I32(1), Value::I32(1), Value::I32(2)],
        ));
        match ctor.invoke(&[items]).unwrap() {
            Value::Collection(c) => {
                assert_eq!(c.items, vec![Value::I32(1), Value::I32(2)]);
                assert_eq!(c.ty, ty);
            }
            other => panic!("expected collection, got {:?}", other),
        }
    }

    #[test]
    fn test_sorted_dictionary_orders_keys() {
        let catalog = TypeCatalog::with_well_known();
        let ty = sorted_dictionary(TypeRef::i32(), TypeRef::string());
        let ctor = catalog
            .constructors(&ty)
            .into_iter()
            .find(|m| m.parameters().len() == 1)
            .unwrap();
        let pairs = Value::Sequence(SequenceValue::stable(
            key_value_pair(TypeRef::i32(), TypeRef::string()),
            vec![pair(3, "c"), pair(1, "a"), pair(2, "b")],
        ));
        match ctor.invoke(&[pairs]).unwrap() {
            Value::Map(m) => {
                let keys: Vec<Value> = m.entries.iter().map(|(k, _)| k.clone()).collect();
                assert_eq!(keys, vec![Value::I32(1), Value::I32(2), Value::I32(3)]);
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_map_implements_enumerable_of_pairs() {
        let catalog = TypeCatalog::with_well_known();
        let ty = dictionary(TypeRef::string(), TypeRef::i32());
        assert!(catalog.implements(
            &ty,
            &enumerable(key_value_pair(TypeRef::string(), TypeRef::i32()))
        ));
        assert!(catalog.is_abstract(&map(TypeRef::string(), TypeRef::i32())));
    }
}
