//! Requests: descriptions of the kind of value needed.
//!
//! Requests are immutable and compare structurally, so the same request
//! occurring twice on a resolution path can be detected.

use crate::member::{MemberInfo, ParameterInfo};
use crate::types::{Primitive, TypeRef};
use crate::value::Value;
use std::fmt;

/// Invalid arguments supplied to a request constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Minimum length greater than maximum length.
    InvertedLengthRange { min: usize, max: usize },
    /// Range bounds not strictly increasing.
    EmptyNumberRange { minimum: String, maximum: String },
    /// Range bound that is not a number.
    NonNumericBound { bound: String },
    /// NaN or infinite range bound.
    NonFiniteBound { bound: String },
    /// Range with no value the operand type can represent.
    BoundsOutsideOperand {
        operand: TypeRef,
        minimum: String,
        maximum: String,
    },
    /// Operand type that cannot hold numbers.
    NonNumericOperand { operand: TypeRef },
    /// Negative count where only non-negative counts make sense.
    NegativeCount { count: i64 },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvertedLengthRange { min, max } => write!(
                f,
                "minimum length {} is greater than maximum length {}",
                min, max
            ),
            RequestError::EmptyNumberRange { minimum, maximum } => write!(
                f,
                "minimum {} must be strictly less than maximum {}",
                minimum, maximum
            ),
            RequestError::NonNumericBound { bound } => {
                write!(f, "range bound {} is not a number", bound)
            }
            RequestError::NonFiniteBound { bound } => {
                write!(f, "range bound {} is not finite", bound)
            }
            RequestError::BoundsOutsideOperand {
                operand,
                minimum,
                maximum,
            } => write!(f, "no {} value lies in [{}, {})", operand, minimum, maximum),
            RequestError::NonNumericOperand { operand } => {
                write!(f, "operand type {} is not numeric", operand)
            }
            RequestError::NegativeCount { count } => {
                write!(f, "count must be non-negative, got {}", count)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Produce a value for `inner`, optionally derived from `seed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeededRequest {
    pub inner: Box<Request>,
    pub seed: Value,
}

/// Produce exactly `count` values of `inner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FiniteSequenceRequest {
    pub inner: Box<Request>,
    pub count: usize,
}

impl FiniteSequenceRequest {
    pub fn new(inner: Request, count: usize) -> Self {
        Self {
            inner: Box::new(inner),
            count,
        }
    }

    /// Construct from a signed count, rejecting negatives.
    pub fn try_new(inner: Request, count: i64) -> Result<Self, RequestError> {
        let count = usize::try_from(count).map_err(|_| RequestError::NegativeCount { count })?;
        Ok(Self::new(inner, count))
    }
}

/// Produce between `min_length` and `max_length` values of `inner`, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangedSequenceRequest {
    inner: Box<Request>,
    min_length: usize,
    max_length: usize,
}

impl RangedSequenceRequest {
    pub fn new(inner: Request, min_length: usize, max_length: usize) -> Result<Self, RequestError> {
        if min_length > max_length {
            return Err(RequestError::InvertedLengthRange {
                min: min_length,
                max: max_length,
            });
        }
        Ok(Self {
            inner: Box::new(inner),
            min_length,
            max_length,
        })
    }

    pub fn inner(&self) -> &Request {
        &self.inner
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Produce a number of `operand` type in `[minimum, maximum)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangedNumberRequest {
    operand: TypeRef,
    minimum: Value,
    maximum: Value,
}

impl RangedNumberRequest {
    pub fn new(
        operand: TypeRef,
        minimum: impl Into<Value>,
        maximum: impl Into<Value>,
    ) -> Result<Self, RequestError> {
        let minimum = minimum.into();
        let maximum = maximum.into();

        let Some(p) = operand.as_primitive().filter(|p| p.is_numeric()) else {
            return Err(RequestError::NonNumericOperand { operand });
        };
        let lo = minimum.as_f64().ok_or_else(|| RequestError::NonNumericBound {
            bound: minimum.to_string(),
        })?;
        let hi = maximum.as_f64().ok_or_else(|| RequestError::NonNumericBound {
            bound: maximum.to_string(),
        })?;
        for (bound, n) in [(&minimum, lo), (&maximum, hi)] {
            if !n.is_finite() {
                return Err(RequestError::NonFiniteBound {
                    bound: bound.to_string(),
                });
            }
        }
        if lo >= hi {
            return Err(RequestError::EmptyNumberRange {
                minimum: minimum.to_string(),
                maximum: maximum.to_string(),
            });
        }
        let outside = match p.integral_range() {
            Some(r) => hi <= r.start as f64 || lo >= r.end as f64,
            None => p == Primitive::F32 && (hi <= f32::MIN as f64 || lo > f32::MAX as f64),
        };
        if outside {
            return Err(RequestError::BoundsOutsideOperand {
                operand,
                minimum: minimum.to_string(),
                maximum: maximum.to_string(),
            });
        }

        Ok(Self {
            operand,
            minimum,
            maximum,
        })
    }

    pub fn operand(&self) -> &TypeRef {
        &self.operand
    }

    pub fn minimum(&self) -> &Value {
        &self.minimum
    }

    pub fn maximum(&self) -> &Value {
        &self.maximum
    }
}

/// What a resolution is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    /// A value assignable to the type.
    Type(TypeRef),
    Seeded(SeededRequest),
    /// An unspecified number of values of the inner request.
    Multiple(Box<Request>),
    FiniteSequence(FiniteSequenceRequest),
    RangedSequence(RangedSequenceRequest),
    RangedNumber(RangedNumberRequest),
    Parameter(ParameterInfo),
    Property(MemberInfo),
    Field(MemberInfo),
}

impl Request {
    pub fn of(ty: TypeRef) -> Self {
        Request::Type(ty)
    }

    pub fn seeded(inner: Request, seed: impl Into<Value>) -> Self {
        Request::Seeded(SeededRequest {
            inner: Box::new(inner),
            seed: seed.into(),
        })
    }

    pub fn multiple(inner: Request) -> Self {
        Request::Multiple(Box::new(inner))
    }

    pub fn finite(inner: Request, count: usize) -> Self {
        Request::FiniteSequence(FiniteSequenceRequest::new(inner, count))
    }

    pub fn ranged_sequence(
        inner: Request,
        min_length: usize,
        max_length: usize,
    ) -> Result<Self, RequestError> {
        RangedSequenceRequest::new(inner, min_length, max_length).map(Request::RangedSequence)
    }

    pub fn ranged_number(
        operand: TypeRef,
        minimum: impl Into<Value>,
        maximum: impl Into<Value>,
    ) -> Result<Self, RequestError> {
        RangedNumberRequest::new(operand, minimum, maximum).map(Request::RangedNumber)
    }

    /// The type for a plain type request.
    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            Request::Type(t) => Some(t),
            _ => None,
        }
    }

    /// The type a value for this request would need to have, looking through
    /// seeds and member metadata.
    pub fn target_type(&self) -> Option<&TypeRef> {
        match self {
            Request::Type(t) => Some(t),
            Request::Seeded(s) => s.inner.target_type(),
            Request::RangedNumber(r) => Some(&r.operand),
            Request::Parameter(p) => Some(&p.ty),
            Request::Property(m) | Request::Field(m) => Some(&m.ty),
            Request::Multiple(_) | Request::FiniteSequence(_) | Request::RangedSequence(_) => None,
        }
    }

    /// Name of the member for parameter, property and field requests.
    pub fn member_name(&self) -> Option<&str> {
        match self {
            Request::Parameter(p) => Some(&p.name),
            Request::Property(m) | Request::Field(m) => Some(&m.name),
            _ => None,
        }
    }
}

impl From<TypeRef> for Request {
    fn from(ty: TypeRef) -> Self {
        Request::Type(ty)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Type(t) => write!(f, "{}", t),
            Request::Seeded(s) => write!(f, "{} (seed {})", s.inner, s.seed),
            Request::Multiple(inner) => write!(f, "many {}", inner),
            Request::FiniteSequence(s) => write!(f, "{} x {}", s.count, s.inner),
            Request::RangedSequence(s) => {
                write!(f, "{}..={} x {}", s.min_length, s.max_length, s.inner)
            }
            Request::RangedNumber(r) => {
                write!(f, "{} in [{}, {})", r.operand, r.minimum, r.maximum)
            }
            Request::Parameter(p) => write!(f, "{}", p),
            Request::Property(m) => write!(f, "property {}", m),
            Request::Field(m) => write!(f, "field {}", m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_compare_structurally() {
        let a = Request::seeded(Request::of(TypeRef::string()), "name");
        let b = Request::seeded(Request::of(TypeRef::string()), "name");
        assert_eq!(a, b);
        assert_ne!(a, Request::of(TypeRef::string()));
    }

    #[test]
    fn test_ranged_number_requires_increasing_bounds() {
        let err = RangedNumberRequest::new(TypeRef::i32(), 5, 5).unwrap_err();
        assert!(matches!(err, RequestError::EmptyNumberRange { .. }));
        assert!(RangedNumberRequest::new(TypeRef::i32(), 5, 6).is_ok());
        assert!(RangedNumberRequest::new(TypeRef::string(), 1, 2).is_err());
        assert!(RangedNumberRequest::new(TypeRef::primitive(Primitive::F64), "a", 2).is_err());
    }

    #[test]
    fn test_ranged_number_rejects_non_finite_bounds() {
        let f64_ty = TypeRef::primitive(Primitive::F64);
        let bounds = [
            (f64::NAN, 1.0),
            (0.0, f64::NAN),
            (f64::NEG_INFINITY, 0.0),
            (0.0, f64::INFINITY),
        ];
        for (lo, hi) in bounds {
            let err = RangedNumberRequest::new(f64_ty.clone(), lo, hi).unwrap_err();
            assert!(matches!(err, RequestError::NonFiniteBound { .. }), "{:?}", err);
        }
        assert!(RangedNumberRequest::new(f64_ty, -1e308, 1e308).is_ok());
    }

    #[test]
    fn test_ranged_number_rejects_bounds_outside_operand() {
        let u8_ty = TypeRef::primitive(Primitive::U8);
        let err = RangedNumberRequest::new(u8_ty.clone(), -50, -10).unwrap_err();
        assert!(matches!(err, RequestError::BoundsOutsideOperand { .. }));
        assert!(RangedNumberRequest::new(u8_ty.clone(), 256, 300).is_err());
        // Partial overlap is kept; draws are clamped to the operand.
        assert!(RangedNumberRequest::new(u8_ty, -50, 10).is_ok());
        assert!(RangedNumberRequest::new(TypeRef::i32(), 1e10, 2e10).is_err());
    }

    #[test]
    fn test_ranged_sequence_allows_degenerate_range() {
        let inner = Request::of(TypeRef::i32());
        assert!(RangedSequenceRequest::new(inner.clone(), 2, 2).is_ok());
        assert_eq!(
            RangedSequenceRequest::new(inner, 3, 2).unwrap_err(),
            RequestError::InvertedLengthRange { min: 3, max: 2 }
        );
    }

    #[test]
    fn test_finite_sequence_rejects_negative_count() {
        let inner = Request::of(TypeRef::i32());
        assert!(FiniteSequenceRequest::try_new(inner.clone(), -1).is_err());
        assert_eq!(FiniteSequenceRequest::try_new(inner, 4).unwrap().count, 4);
    }

    #[test]
    fn test_target_type_looks_through_seeds() {
        let r = Request::seeded(Request::of(TypeRef::named("Widget")), "w");
        assert_eq!(r.target_type(), Some(&TypeRef::named("Widget")));
        assert_eq!(Request::multiple(r).target_type(), None);
    }
}
