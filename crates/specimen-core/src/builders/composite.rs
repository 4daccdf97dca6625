use crate::builder::{BuilderRef, SpecimenBuilder};
use crate::context::SpecimenContext;
use crate::errors::ResolutionResult;
use specimen_types::{Request, Specimen};

/// Ordered children; the first result that is not `NoSpecimen` wins.
#[derive(Debug, Clone, Default)]
pub struct CompositeBuilder {
    builders: Vec<BuilderRef>,
}

impl CompositeBuilder {
    pub fn new(builders: Vec<BuilderRef>) -> Self {
        Self { builders }
    }

    pub fn builders(&self) -> &[BuilderRef] {
        &self.builders
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl SpecimenBuilder for CompositeBuilder {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        for builder in &self.builders {
            let result = builder.create(request, context)?;
            if !result.is_no_specimen() {
                return Ok(result);
            }
        }
        Ok(Specimen::none_for(request))
    }

    fn children(&self) -> Vec<BuilderRef> {
        self.builders.clone()
    }

    fn compose(&self, children: Vec<BuilderRef>) -> Option<BuilderRef> {
        Some(std::sync::Arc::new(CompositeBuilder::new(children)))
    }
}
