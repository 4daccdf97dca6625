//! Leaf builders for primitive values.
//!
//! These keep the engine usable end to end: numbers count up, booleans
//! alternate, strings are unique, and ranged numbers are drawn from a
//! seedable generator.

use crate::builder::SpecimenBuilder;
use crate::context::SpecimenContext;
use crate::errors::{ResolutionError, ResolutionResult};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use specimen_types::{Primitive, RangedNumberRequest, Request, Specimen, TypeRef, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::trace;

fn primitive_of(request: &Request) -> Option<Primitive> {
    request.as_type().and_then(TypeRef::as_primitive)
}

/// 1, 2, 3, ... shared across all numeric primitives. `u8` wraps within
/// `1..=255`.
#[derive(Debug)]
pub struct NumericSequenceGenerator {
    next: AtomicU64,
}

impl NumericSequenceGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Default for NumericSequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecimenBuilder for NumericSequenceGenerator {
    fn create(
        &self,
        request: &Request,
        _context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Some(p) = primitive_of(request).filter(Primitive::is_numeric) else {
            return Ok(Specimen::none_for(request));
        };
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let n = if p == Primitive::U8 { (n - 1) % 255 + 1 } else { n };
        Ok(Value::numeric(p, n as f64).map_or_else(|| Specimen::none_for(request), Specimen::Value))
    }
}

/// `true`, `false`, `true`, ...
#[derive(Debug, Default)]
pub struct BooleanSwitch {
    last: AtomicBool,
}

impl SpecimenBuilder for BooleanSwitch {
    fn create(
        &self,
        request: &Request,
        _context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        if primitive_of(request) != Some(Primitive::Bool) {
            return Ok(Specimen::none_for(request));
        }
        let previous = self.last.fetch_xor(true, Ordering::Relaxed);
        Ok(Specimen::Value(Value::Bool(!previous)))
    }
}

/// Printable ASCII characters in order, starting over after `~`.
#[derive(Debug, Default)]
pub struct CharGenerator {
    next: AtomicU64,
}

impl CharGenerator {
    const FIRST: u64 = b'!' as u64;
    const SPAN: u64 = (b'~' - b'!') as u64 + 1;
}

impl SpecimenBuilder for CharGenerator {
    fn create(
        &self,
        request: &Request,
        _context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        if primitive_of(request) != Some(Primitive::Char) {
            return Ok(Specimen::none_for(request));
        }
        let offset = self.next.fetch_add(1, Ordering::Relaxed) % Self::SPAN;
        let c = char::from_u32((Self::FIRST + offset) as u32).unwrap_or('!');
        Ok(Specimen::Value(Value::Char(c)))
    }
}

/// Unique strings. A string request seeded with a string (usually a member
/// name) yields `seed` followed by a uuid, so generated values are traceable
/// to the member they were made for.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringGenerator;

impl StringGenerator {
    fn fresh() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl SpecimenBuilder for StringGenerator {
    fn create(
        &self,
        request: &Request,
        _context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let value = match request {
            Request::Type(TypeRef::Primitive(Primitive::String)) => Self::fresh(),
            Request::Seeded(s) if s.inner.as_type() == Some(&TypeRef::string()) => {
                match s.seed.as_str() {
                    Some(seed) => format!("{}{}", seed, Self::fresh()),
                    None => Self::fresh(),
                }
            }
            _ => return Ok(Specimen::none_for(request)),
        };
        Ok(Specimen::Value(Value::Str(value)))
    }
}

/// Answers ranged-number requests with a uniformly drawn number in the
/// half-open range `[minimum, maximum)`.
#[derive(Debug)]
pub struct RandomRangedNumberGenerator {
    rng: Mutex<StdRng>,
}

impl RandomRangedNumberGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible draws.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self, range: &RangedNumberRequest) -> ResolutionResult<Value> {
        let p = range.operand().as_primitive().ok_or_else(|| {
            ResolutionError::contract(format!("{} is not a numeric type", range.operand()))
        })?;
        let bounds = range.minimum().as_f64().zip(range.maximum().as_f64());
        let Some((lo, hi)) = bounds else {
            return Err(ResolutionError::contract(format!(
                "non-numeric bounds for {}",
                p.as_str()
            )));
        };

        let empty = || {
            ResolutionError::contract(format!(
                "no {} lies in [{}, {})",
                p.as_str(),
                range.minimum(),
                range.maximum()
            ))
        };
        if let Some(repr) = p.integral_range() {
            // Float bounds saturate at the i128 edges, well outside any operand.
            let lo = (lo.ceil() as i128).max(repr.start);
            let hi = (hi.ceil() as i128).min(repr.end);
            if lo >= hi {
                return Err(empty());
            }
            let n = self.rng.lock().gen_range(lo..hi);
            return Value::integral(p, n).ok_or_else(empty);
        }

        if !(hi - lo).is_finite() {
            return Err(ResolutionError::contract(format!(
                "range [{}, {}) is too wide to draw from",
                range.minimum(),
                range.maximum()
            )));
        }

        let n = if p == Primitive::F32 {
            let (lo, hi) = (lo as f32, hi as f32);
            if !(lo < hi && (hi - lo).is_finite()) {
                return Err(empty());
            }
            self.rng.lock().gen_range(lo..hi) as f64
        } else {
            self.rng.lock().gen_range(lo..hi)
        };
        Value::numeric(p, n).ok_or_else(empty)
    }
}

impl Default for RandomRangedNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecimenBuilder for RandomRangedNumberGenerator {
    fn create(
        &self,
        request: &Request,
        _context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Request::RangedNumber(range) = request else {
            return Ok(Specimen::none_for(request));
        };
        let value = self.draw(range)?;
        trace!(%request, %value, "drew ranged number");
        Ok(Specimen::Value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderRef;
    use crate::context::ResolutionContext;
    use std::sync::Arc;

    fn ctx_for(builder: BuilderRef) -> ResolutionContext {
        ResolutionContext::new(builder)
    }

    fn value(ctx: &mut ResolutionContext, request: Request) -> Value {
        ctx.resolve(&request).unwrap().into_value().unwrap()
    }

    #[test]
    fn test_numbers_count_up_per_primitive_type() {
        let mut ctx = ctx_for(Arc::new(NumericSequenceGenerator::new()));
        assert_eq!(value(&mut ctx, Request::of(TypeRef::i32())), Value::I32(1));
        assert_eq!(
            value(&mut ctx, Request::of(TypeRef::primitive(Primitive::F64))),
            Value::F64(2.0)
        );
        assert!(ctx
            .resolve(&Request::of(TypeRef::string()))
            .unwrap()
            .is_no_specimen());
    }

    #[test]
    fn test_boolean_switch_alternates() {
        let mut ctx = ctx_for(Arc::new(BooleanSwitch::default()));
        let request = Request::of(TypeRef::primitive(Primitive::Bool));
        let seen: Vec<Value> = (0..3).map(|_| value(&mut ctx, request.clone())).collect();
        assert_eq!(seen, vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)]);
    }

    #[test]
    fn test_chars_are_printable() {
        let mut ctx = ctx_for(Arc::new(CharGenerator::default()));
        let request = Request::of(TypeRef::primitive(Primitive::Char));
        assert_eq!(value(&mut ctx, request.clone()), Value::Char('!'));
        for _ in 0..200 {
            match value(&mut ctx, request.clone()) {
                Value::Char(c) => assert!(c.is_ascii_graphic(), "{:?}", c),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_seeded_strings_carry_the_seed() {
        let mut ctx = ctx_for(Arc::new(StringGenerator));
        let a = value(&mut ctx, Request::of(TypeRef::string()));
        let b = value(&mut ctx, Request::of(TypeRef::string()));
        assert_ne!(a, b);

        let named = value(&mut ctx, Request::seeded(Request::of(TypeRef::string()), "name"));
        let named = named.as_str().unwrap();
        assert!(named.starts_with("name"));
        assert_eq!(named.len(), "name".len() + 36);
    }

    #[test]
    fn test_ranged_numbers_stay_in_half_open_range() {
        let mut ctx = ctx_for(Arc::new(RandomRangedNumberGenerator::with_seed(7)));
        let request = Request::ranged_number(TypeRef::i32(), 5, 6).unwrap();
        for _ in 0..20 {
            assert_eq!(value(&mut ctx, request.clone()), Value::I32(5));
        }

        let floats = Request::ranged_number(TypeRef::primitive(Primitive::F64), 0.5, 1.5).unwrap();
        for _ in 0..20 {
            let n = value(&mut ctx, floats.clone()).as_f64().unwrap();
            assert!((0.5..1.5).contains(&n), "{} out of range", n);
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let draw = |seed| {
            let mut ctx = ctx_for(Arc::new(RandomRangedNumberGenerator::with_seed(seed)));
            let request = Request::ranged_number(TypeRef::i32(), 0, 1000).unwrap();
            (0..5).map(|_| value(&mut ctx, request.clone())).collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn test_wide_float_range_is_a_contract_violation() {
        let mut ctx = ctx_for(Arc::new(RandomRangedNumberGenerator::with_seed(1)));
        let request =
            Request::ranged_number(TypeRef::primitive(Primitive::F64), -1e308, 1e308).unwrap();
        let err = ctx.resolve(&request).unwrap_err();
        assert_eq!(err.code(), "CONTRACT_VIOLATION");

        let f32_ty = TypeRef::primitive(Primitive::F32);
        let err = ctx
            .resolve(&Request::ranged_number(f32_ty.clone(), -3e38, 3e38).unwrap())
            .unwrap_err();
        assert_eq!(err.code(), "CONTRACT_VIOLATION");
        let n = value(&mut ctx, Request::ranged_number(f32_ty, 1.0, 2.0).unwrap());
        assert!(matches!(n, Value::F32(v) if (1.0..2.0).contains(&v)), "{:?}", n);
    }

    #[test]
    fn test_integral_draws_are_clamped_to_operand() {
        let mut ctx = ctx_for(Arc::new(RandomRangedNumberGenerator::with_seed(3)));
        let u8_ty = TypeRef::primitive(Primitive::U8);
        let request = Request::ranged_number(u8_ty, -50, 2).unwrap();
        for _ in 0..20 {
            let v = value(&mut ctx, request.clone());
            assert!(matches!(v, Value::U8(0) | Value::U8(1)), "{:?}", v);
        }

        let request = Request::ranged_number(TypeRef::i32(), 2_147_483_000i64, 1e10).unwrap();
        for _ in 0..20 {
            let n = value(&mut ctx, request.clone()).as_i64().unwrap();
            assert!(n >= 2_147_483_000 && n <= i32::MAX as i64, "{}", n);
        }

        let wide = Request::ranged_number(TypeRef::primitive(Primitive::U64), -1e30, 1e30).unwrap();
        assert!(matches!(value(&mut ctx, wide), Value::U64(_)));
        let widest =
            Request::ranged_number(TypeRef::primitive(Primitive::I64), -1e308, 1e308).unwrap();
        assert!(matches!(value(&mut ctx, widest), Value::I64(_)));
    }

    #[test]
    fn test_integral_range_without_integers_is_rejected() {
        let mut ctx = ctx_for(Arc::new(RandomRangedNumberGenerator::with_seed(1)));
        let request = Request::ranged_number(TypeRef::i32(), 0.2, 0.8).unwrap();
        let err = ctx.resolve(&request).unwrap_err();
        assert_eq!(err.code(), "CONTRACT_VIOLATION");
    }
}
