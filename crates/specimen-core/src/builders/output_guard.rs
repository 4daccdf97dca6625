use crate::builder::{BuilderRef, SpecimenBuilder};
use crate::builders::single;
use crate::context::SpecimenContext;
use crate::errors::{ResolutionError, ResolutionResult};
use crate::specification::{SpecificationRef, TrueSpecification};
use specimen_types::{Request, Specimen};
use std::sync::Arc;
use tracing::debug;

/// Turns an unanswered request into an [`ResolutionError::Unsatisfiable`]
/// carrying the resolution path, for requests the specification covers.
#[derive(Debug, Clone)]
pub struct NoSpecimenOutputGuard {
    builder: BuilderRef,
    specification: SpecificationRef,
}

impl NoSpecimenOutputGuard {
    pub fn new(builder: BuilderRef) -> Self {
        Self::with_specification(builder, Arc::new(TrueSpecification))
    }

    pub fn with_specification(builder: BuilderRef, specification: SpecificationRef) -> Self {
        Self {
            builder,
            specification,
        }
    }
}

impl SpecimenBuilder for NoSpecimenOutputGuard {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let result = self.builder.create(request, context)?;
        if result.is_no_specimen() && self.specification.is_satisfied_by(request) {
            let path = context.session().path();
            debug!(%request, %path, "no builder answered");
            return Err(ResolutionError::Unsatisfiable {
                request: request.clone(),
                path,
            });
        }
        Ok(result)
    }

    fn children(&self) -> Vec<BuilderRef> {
        vec![self.builder.clone()]
    }

    fn compose(&self, children: Vec<BuilderRef>) -> Option<BuilderRef> {
        Some(Arc::new(NoSpecimenOutputGuard::with_specification(
            single(children),
            self.specification.clone(),
        )))
    }
}
