//! Array requests.

use crate::builder::SpecimenBuilder;
use crate::context::SpecimenContext;
use crate::errors::{ResolutionError, ResolutionResult};
use specimen_types::{ArrayValue, Request, Specimen, TypeRef, Value};

/// `T[]` -> many `T`, repacked as an array.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayRelay;

impl SpecimenBuilder for ArrayRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let element = match request.as_type() {
            Some(TypeRef::Array { element, rank: 1 }) if !element.is_open() => element,
            _ => return Ok(Specimen::none_for(request)),
        };

        match context.resolve(&Request::multiple(Request::of((**element).clone())))? {
            Specimen::Value(v) => {
                let items = v
                    .items()
                    .map_err(ResolutionError::from_sequence_error)?
                    .ok_or_else(|| {
                        ResolutionError::contract(format!(
                            "expected a sequence of {} but got {}",
                            element, v
                        ))
                    })?;
                Ok(Specimen::Value(Value::Array(ArrayValue::new(
                    (**element).clone(),
                    items,
                ))))
            }
            sentinel => Ok(sentinel),
        }
    }
}

/// `T[,]`, `T[,,]`, ... -> a jagged `T[][]...` resolved through the ordinary
/// array relay, trimmed to the shortest row and copied row-major into a
/// rectangular array with equal extents.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultidimensionalArrayRelay;

impl SpecimenBuilder for MultidimensionalArrayRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let (element, rank) = match request.as_type() {
            Some(TypeRef::Array { element, rank }) if *rank > 1 && !element.is_open() => {
                (element, *rank)
            }
            _ => return Ok(Specimen::none_for(request)),
        };

        let mut jagged = (**element).clone();
        for _ in 0..rank {
            jagged = TypeRef::array(jagged);
        }

        let value = match context.resolve(&Request::of(jagged))? {
            Specimen::Value(v) => v,
            sentinel => return Ok(sentinel),
        };

        let extent = shortest(&value, rank)?;
        let mut items = Vec::with_capacity(extent.pow(rank as u32));
        flatten(&value, rank, extent, &mut items)?;
        Ok(Specimen::Value(Value::Array(ArrayValue {
            element: (**element).clone(),
            dims: vec![extent; rank],
            items,
        })))
    }
}

fn rows(value: &Value) -> ResolutionResult<&[Value]> {
    match value {
        Value::Array(a) => Ok(&a.items),
        other => Err(ResolutionError::contract(format!(
            "expected a nested array but got {}",
            other
        ))),
    }
}

/// Smallest length among all nested arrays down to `levels` deep.
fn shortest(value: &Value, levels: usize) -> ResolutionResult<usize> {
    let items = rows(value)?;
    let mut min = items.len();
    if levels > 1 {
        for item in items {
            min = min.min(shortest(item, levels - 1)?);
        }
    }
    Ok(min)
}

fn flatten(value: &Value, levels: usize, extent: usize, out: &mut Vec<Value>) -> ResolutionResult<()> {
    if levels == 0 {
        out.push(value.clone());
        return Ok(());
    }
    for item in rows(value)?.iter().take(extent) {
        flatten(item, levels - 1, extent, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderRef;
    use crate::builders::{CompositeBuilder, DelegatingBuilder};
    use crate::context::ResolutionContext;
    use crate::relays::{FiniteSequenceRelay, MultipleRelay};
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    fn graph(count: usize) -> ResolutionContext {
        let next = Arc::new(AtomicI32::new(0));
        let numbers: BuilderRef = Arc::new(DelegatingBuilder::new(move |request, _| {
            Ok(match request.as_type() {
                Some(t) if t == &TypeRef::i32() => {
                    Specimen::Value(Value::I32(next.fetch_add(1, Ordering::SeqCst)))
                }
                _ => Specimen::none_for(request),
            })
        }));
        ResolutionContext::new(Arc::new(CompositeBuilder::new(vec![
            Arc::new(ArrayRelay),
            Arc::new(MultidimensionalArrayRelay),
            Arc::new(MultipleRelay::new(count)),
            Arc::new(FiniteSequenceRelay::default()),
            numbers,
        ])))
    }

    fn array(specimen: Specimen) -> ArrayValue {
        match specimen {
            Specimen::Value(Value::Array(a)) => a,
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_single_rank_array() {
        let mut ctx = graph(3);
        let a = array(ctx.resolve(&Request::of(TypeRef::array(TypeRef::i32()))).unwrap());
        assert_eq!(a.dims, vec![3]);
        assert_eq!(a.items, vec![Value::I32(0), Value::I32(1), Value::I32(2)]);
    }

    #[test]
    fn test_rectangular_array_is_row_major() {
        let mut ctx = graph(2);
        let a = array(
            ctx.resolve(&Request::of(TypeRef::array_of_rank(TypeRef::i32(), 2)))
                .unwrap(),
        );
        assert_eq!(a.dims, vec![2, 2]);
        assert_eq!(a.array_type(), TypeRef::array_of_rank(TypeRef::i32(), 2));
        assert_eq!(a.get(&[0, 0]), Some(&Value::I32(0)));
        assert_eq!(a.get(&[0, 1]), Some(&Value::I32(1)));
        assert_eq!(a.get(&[1, 0]), Some(&Value::I32(2)));
        assert_eq!(a.get(&[1, 1]), Some(&Value::I32(3)));
    }

    #[test]
    fn test_shortest_row_sets_extent() {
        let jagged = Value::Array(ArrayValue::new(
            TypeRef::array(TypeRef::i32()),
            vec![
                Value::Array(ArrayValue::new(TypeRef::i32(), vec![Value::I32(1), Value::I32(2), Value::I32(3)])),
                Value::Array(ArrayValue::new(TypeRef::i32(), vec![Value::I32(4), Value::I32(5)])),
            ],
        ));
        assert_eq!(shortest(&jagged, 2).unwrap(), 2);
        let mut out = Vec::new();
        flatten(&jagged, 2, 2, &mut out).unwrap();
        assert_eq!(out, vec![Value::I32(1), Value::I32(2), Value::I32(4), Value::I32(5)]);
    }
}
