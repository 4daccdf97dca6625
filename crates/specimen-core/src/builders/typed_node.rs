use crate::builder::{BuilderRef, SpecimenBuilder};
use crate::builders::single;
use crate::context::SpecimenContext;
use crate::errors::ResolutionResult;
use specimen_types::{Request, Specimen, TypeRef, Value};
use std::fmt;
use std::sync::Arc;

type SeededFn = Arc<dyn Fn(Option<&Value>) -> ResolutionResult<Value> + Send + Sync>;

/// Produces values of one type from a closure, passing the seed through when
/// the request carries one.
#[derive(Clone)]
pub struct SeededFactory {
    target: TypeRef,
    factory: SeededFn,
}

impl SeededFactory {
    pub fn new<F>(target: TypeRef, factory: F) -> Self
    where
        F: Fn(Option<&Value>) -> ResolutionResult<Value> + Send + Sync + 'static,
    {
        Self {
            target,
            factory: Arc::new(factory),
        }
    }
}

impl SpecimenBuilder for SeededFactory {
    fn create(
        &self,
        request: &Request,
        _context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let seed = match request {
            Request::Type(t) if t == &self.target => None,
            Request::Seeded(s) if s.inner.as_type() == Some(&self.target) => Some(&s.seed),
            _ => return Ok(Specimen::none_for(request)),
        };
        (self.factory)(seed).map(Specimen::Value)
    }
}

impl fmt::Debug for SeededFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededFactory")
            .field("target", &self.target)
            .finish()
    }
}

/// Scopes a builder to one type: it only sees plain or seeded requests for
/// `target`.
#[derive(Debug, Clone)]
pub struct TypedNode {
    target: TypeRef,
    builder: BuilderRef,
}

impl TypedNode {
    pub fn new(target: TypeRef, builder: BuilderRef) -> Self {
        Self { target, builder }
    }

    pub fn target(&self) -> &TypeRef {
        &self.target
    }

    fn accepts(&self, request: &Request) -> bool {
        match request {
            Request::Type(t) => t == &self.target,
            Request::Seeded(s) => s.inner.as_type() == Some(&self.target),
            _ => false,
        }
    }
}

impl SpecimenBuilder for TypedNode {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        if !self.accepts(request) {
            return Ok(Specimen::none_for(request));
        }
        self.builder.create(request, context)
    }

    fn children(&self) -> Vec<BuilderRef> {
        vec![self.builder.clone()]
    }

    fn compose(&self, children: Vec<BuilderRef>) -> Option<BuilderRef> {
        Some(Arc::new(TypedNode::new(self.target.clone(), single(children))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResolutionContext;

    #[test]
    fn test_seed_reaches_factory() {
        let factory = SeededFactory::new(TypeRef::string(), |seed| {
            Ok(Value::from(match seed.and_then(Value::as_str) {
                Some(s) => format!("seeded:{}", s),
                None => "plain".to_string(),
            }))
        });
        let node: BuilderRef = Arc::new(TypedNode::new(TypeRef::string(), Arc::new(factory)));
        let mut ctx = ResolutionContext::new(node);

        let plain = ctx.resolve(&Request::of(TypeRef::string())).unwrap();
        assert_eq!(plain, Specimen::Value(Value::from("plain")));
        let seeded = ctx
            .resolve(&Request::seeded(Request::of(TypeRef::string()), "name"))
            .unwrap();
        assert_eq!(seeded, Specimen::Value(Value::from("seeded:name")));
        assert!(ctx.resolve(&Request::of(TypeRef::i32())).unwrap().is_no_specimen());
    }
}
