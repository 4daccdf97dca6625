use crate::builder::{BuilderRef, SpecimenBuilder};
use crate::builders::CompositeBuilder;
use crate::context::SpecimenContext;
use crate::errors::ResolutionResult;
use crate::specification::SpecificationRef;
use specimen_types::{Request, Specimen};
use std::sync::Arc;

/// Consults the inner builder only for requests the specification accepts.
#[derive(Debug, Clone)]
pub struct FilteringBuilder {
    builder: BuilderRef,
    specification: SpecificationRef,
}

impl FilteringBuilder {
    pub fn new(builder: BuilderRef, specification: SpecificationRef) -> Self {
        Self {
            builder,
            specification,
        }
    }

    pub fn specification(&self) -> &SpecificationRef {
        &self.specification
    }
}

impl SpecimenBuilder for FilteringBuilder {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        if !self.specification.is_satisfied_by(request) {
            return Ok(Specimen::none_for(request));
        }
        self.builder.create(request, context)
    }

    fn children(&self) -> Vec<BuilderRef> {
        vec![self.builder.clone()]
    }

    fn compose(&self, children: Vec<BuilderRef>) -> Option<BuilderRef> {
        Some(Arc::new(FilteringBuilder::new(
            single(children),
            self.specification.clone(),
        )))
    }
}

/// The one child, or a composite when there are several.
pub(crate) fn single(mut children: Vec<BuilderRef>) -> BuilderRef {
    if children.len() == 1 {
        if let Some(only) = children.pop() {
            return only;
        }
    }
    Arc::new(CompositeBuilder::new(children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::DelegatingBuilder;
    use crate::context::ResolutionContext;
    use crate::specification::ExactTypeSpecification;
    use specimen_types::{TypeRef, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_rejected_requests_never_reach_inner_builder() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let inner: BuilderRef = Arc::new(DelegatingBuilder::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Specimen::Value(Value::I32(7)))
        }));
        let filter: BuilderRef = Arc::new(FilteringBuilder::new(
            inner,
            Arc::new(ExactTypeSpecification::new(TypeRef::i32())),
        ));
        let mut ctx = ResolutionContext::new(filter);

        assert!(ctx.resolve(&Request::of(TypeRef::string())).unwrap().is_no_specimen());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            ctx.resolve(&Request::of(TypeRef::i32())).unwrap(),
            Specimen::Value(Value::I32(7))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
