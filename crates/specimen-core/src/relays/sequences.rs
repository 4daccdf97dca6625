//! Multiple, finite and ranged sequence requests.

use crate::builder::{BuilderRef, SpecimenBuilder};
use crate::context::{ResolutionContext, SpecimenContext};
use crate::errors::{RequestPath, ResolutionError, ResolutionResult};
use serde::{Deserialize, Serialize};
use specimen_types::{
    FiniteSequenceRequest, Request, RequestError, SequenceError, SequenceSource, SequenceValue,
    Specimen, TypeRef, Value,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

/// Items produced for a request for "many" values.
pub const DEFAULT_REPEAT_COUNT: usize = 3;

/// Whether a finite sequence is materialized once or re-resolved on every
/// enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencePolicy {
    #[default]
    Stable,
    Dynamic,
}

impl FromStr for SequencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stable" => Ok(SequencePolicy::Stable),
            "dynamic" => Ok(SequencePolicy::Dynamic),
            other => Err(format!("unknown sequence policy '{}' (expected stable or dynamic)", other)),
        }
    }
}

impl fmt::Display for SequencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencePolicy::Stable => write!(f, "stable"),
            SequencePolicy::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// "Many" -> exactly `count` items.
#[derive(Debug, Clone, Copy)]
pub struct MultipleRelay {
    count: usize,
}

impl MultipleRelay {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn try_new(count: i64) -> ResolutionResult<Self> {
        let count = usize::try_from(count).map_err(|_| RequestError::NegativeCount { count })?;
        Ok(Self::new(count))
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Default for MultipleRelay {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_COUNT)
    }
}

impl SpecimenBuilder for MultipleRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        match request {
            Request::Multiple(inner) => {
                context.resolve(&Request::finite((**inner).clone(), self.count))
            }
            _ => Ok(Specimen::none_for(request)),
        }
    }
}

/// Older name of [`MultipleRelay`].
#[deprecated(note = "use MultipleRelay")]
pub type MultipleToEnumerableRelay = MultipleRelay;

/// Resolves the inner request `count` times.
///
/// Omitted items are dropped. Any unanswered item makes the whole sequence
/// unanswered; for dynamic sequences that surfaces as an error when the
/// sequence is enumerated.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteSequenceRelay {
    policy: SequencePolicy,
}

impl FiniteSequenceRelay {
    pub fn new(policy: SequencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SequencePolicy {
        self.policy
    }
}

impl SpecimenBuilder for FiniteSequenceRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Request::FiniteSequence(sequence) = request else {
            return Ok(Specimen::none_for(request));
        };
        let element = element_type(&sequence.inner);

        match self.policy {
            SequencePolicy::Stable => match collect_items(sequence, context)? {
                Some(items) => Ok(Specimen::Value(Value::Sequence(SequenceValue::stable(
                    element, items,
                )))),
                None => Ok(Specimen::none_for(request)),
            },
            SequencePolicy::Dynamic => {
                let source = DynamicSequence {
                    root: context.detach().root().clone(),
                    sequence: sequence.clone(),
                };
                Ok(Specimen::Value(Value::Sequence(SequenceValue::dynamic(
                    element,
                    Arc::new(source),
                ))))
            }
        }
    }
}

fn element_type(inner: &Request) -> TypeRef {
    inner
        .target_type()
        .cloned()
        .unwrap_or_else(|| TypeRef::named("object"))
}

/// `None` when some item had no specimen.
fn collect_items(
    sequence: &FiniteSequenceRequest,
    context: &mut dyn SpecimenContext,
) -> ResolutionResult<Option<Vec<Value>>> {
    let mut items = Vec::with_capacity(sequence.count);
    for _ in 0..sequence.count {
        match context.resolve(&sequence.inner)? {
            Specimen::Value(v) => items.push(v),
            Specimen::Omit(_) => trace!(request = %sequence.inner, "dropping omitted item"),
            Specimen::NoSpecimen(_) => return Ok(None),
        }
    }
    Ok(Some(items))
}

/// Lazily re-resolved items. Each enumeration runs in a fresh session over
/// the graph that created the sequence.
struct DynamicSequence {
    root: BuilderRef,
    sequence: FiniteSequenceRequest,
}

impl SequenceSource for DynamicSequence {
    fn enumerate(&self) -> Result<Vec<Value>, SequenceError> {
        let mut context = ResolutionContext::new(self.root.clone());
        match collect_items(&self.sequence, &mut context)? {
            Some(items) => Ok(items),
            None => {
                let inner = (*self.sequence.inner).clone();
                Err(Box::new(ResolutionError::Unsatisfiable {
                    path: RequestPath::new(vec![inner.clone()]),
                    request: inner,
                }))
            }
        }
    }
}

/// Picks a length in `[min, max]` through a ranged-number request, then
/// delegates to a finite sequence of that length.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangedSequenceRelay;

impl SpecimenBuilder for RangedSequenceRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Request::RangedSequence(range) = request else {
            return Ok(Specimen::none_for(request));
        };

        let length = if range.min_length() == range.max_length() {
            range.min_length()
        } else {
            let too_long = || {
                ResolutionError::contract(format!(
                    "sequence lengths for {} exceed the numeric range",
                    request
                ))
            };
            let min = i64::try_from(range.min_length()).map_err(|_| too_long())?;
            // Ranged numbers exclude their maximum.
            let max = i64::try_from(range.max_length())
                .ok()
                .and_then(|m| m.checked_add(1))
                .ok_or_else(too_long)?;
            let number = Request::ranged_number(TypeRef::i32(), Value::I64(min), Value::I64(max))?;
            match context.resolve(&number)? {
                Specimen::Value(v) => v
                    .as_i64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| {
                        ResolutionError::contract(format!(
                            "sequence length for {} must be a non-negative integer, got {}",
                            request, v
                        ))
                    })?,
                other => return Ok(other),
            }
        };

        context.resolve(&Request::finite(range.inner().clone(), length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{CompositeBuilder, DelegatingBuilder};
    use std::sync::atomic::{AtomicI32, Ordering};

    fn counter() -> BuilderRef {
        let next = Arc::new(AtomicI32::new(0));
        Arc::new(DelegatingBuilder::new(move |request, _| {
            Ok(match request.as_type() {
                Some(t) if t == &TypeRef::i32() => {
                    Specimen::Value(Value::I32(next.fetch_add(1, Ordering::SeqCst) + 1))
                }
                Some(t) if t == &TypeRef::named("Skipped") => Specimen::omit(),
                _ => Specimen::none_for(request),
            })
        }))
    }

    fn graph(policy: SequencePolicy, extra: Vec<BuilderRef>) -> ResolutionContext {
        let mut builders: Vec<BuilderRef> = vec![
            Arc::new(MultipleRelay::default()),
            Arc::new(FiniteSequenceRelay::new(policy)),
            Arc::new(RangedSequenceRelay),
        ];
        builders.extend(extra);
        builders.push(counter());
        ResolutionContext::new(Arc::new(CompositeBuilder::new(builders)))
    }

    fn items(specimen: Specimen) -> Vec<Value> {
        match specimen {
            Specimen::Value(Value::Sequence(s)) => s.items().unwrap(),
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_uses_repeat_count() {
        let mut ctx = graph(SequencePolicy::Stable, vec![]);
        let got = items(ctx.resolve(&Request::multiple(Request::of(TypeRef::i32()))).unwrap());
        assert_eq!(got, vec![Value::I32(1), Value::I32(2), Value::I32(3)]);
    }

    #[test]
    fn test_zero_count_and_omitted_items() {
        let mut ctx = graph(SequencePolicy::Stable, vec![]);
        assert!(items(ctx.resolve(&Request::finite(Request::of(TypeRef::i32()), 0)).unwrap()).is_empty());
        let skipped = Request::finite(Request::of(TypeRef::named("Skipped")), 4);
        assert!(items(ctx.resolve(&skipped).unwrap()).is_empty());
    }

    #[test]
    fn test_unanswered_item_fails_whole_sequence() {
        let mut ctx = graph(SequencePolicy::Stable, vec![]);
        let unknown = Request::finite(Request::of(TypeRef::named("Unknown")), 2);
        assert!(ctx.resolve(&unknown).unwrap().is_no_specimen());
    }

    #[test]
    fn test_dynamic_sequence_re_resolves() {
        let mut ctx = graph(SequencePolicy::Dynamic, vec![]);
        let specimen = ctx.resolve(&Request::finite(Request::of(TypeRef::i32()), 2)).unwrap();
        let Specimen::Value(Value::Sequence(seq)) = specimen else {
            panic!("expected sequence");
        };
        assert!(!seq.is_stable());
        let first = seq.items().unwrap();
        let second = seq.items().unwrap();
        assert_eq!(first.len(), 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_dynamic_enumeration_reports_unsatisfiable() {
        let mut ctx = graph(SequencePolicy::Dynamic, vec![]);
        let specimen = ctx
            .resolve(&Request::finite(Request::of(TypeRef::named("Unknown")), 1))
            .unwrap();
        let Specimen::Value(Value::Sequence(seq)) = specimen else {
            panic!("expected sequence");
        };
        let err = ResolutionError::from_sequence_error(seq.items().unwrap_err());
        assert_eq!(err.code(), "UNSATISFIABLE");
    }

    #[test]
    fn test_ranged_sequence_uses_number_request() {
        let fixed: BuilderRef = Arc::new(DelegatingBuilder::new(|request, _| {
            Ok(match request {
                Request::RangedNumber(r) => {
                    assert_eq!(r.maximum().as_i64(), Some(5));
                    Specimen::Value(Value::I32(4))
                }
                _ => Specimen::none_for(request),
            })
        }));
        let mut ctx = graph(SequencePolicy::Stable, vec![fixed]);
        let request = Request::ranged_sequence(Request::of(TypeRef::i32()), 1, 4).unwrap();
        assert_eq!(items(ctx.resolve(&request).unwrap()).len(), 4);

        let degenerate = Request::ranged_sequence(Request::of(TypeRef::i32()), 2, 2).unwrap();
        assert_eq!(items(ctx.resolve(&degenerate).unwrap()).len(), 2);
    }

    #[test]
    fn test_ranged_sequence_rejects_fractional_length() {
        let fractional: BuilderRef = Arc::new(DelegatingBuilder::new(|request, _| {
            Ok(match request {
                Request::RangedNumber(_) => Specimen::Value(Value::F64(2.5)),
                _ => Specimen::none_for(request),
            })
        }));
        let mut ctx = graph(SequencePolicy::Stable, vec![fractional]);
        let request = Request::ranged_sequence(Request::of(TypeRef::i32()), 1, 4).unwrap();
        assert_eq!(ctx.resolve(&request).unwrap_err().code(), "CONTRACT_VIOLATION");
    }

    #[test]
    fn test_ranged_sequence_length_overflow_is_a_contract_violation() {
        let mut ctx = graph(SequencePolicy::Stable, vec![]);
        for max in [i64::MAX as usize, usize::MAX] {
            let request = Request::ranged_sequence(Request::of(TypeRef::i32()), 0, max).unwrap();
            assert_eq!(ctx.resolve(&request).unwrap_err().code(), "CONTRACT_VIOLATION");
        }
    }

    #[test]
    fn test_negative_repeat_count_rejected() {
        assert!(MultipleRelay::try_new(-1).is_err());
        assert_eq!(MultipleRelay::try_new(5).unwrap().count(), 5);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Dynamic".parse::<SequencePolicy>().unwrap(), SequencePolicy::Dynamic);
        assert!("lazy".parse::<SequencePolicy>().is_err());
    }
}
