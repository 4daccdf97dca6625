use crate::builder::SpecimenBuilder;
use crate::context::SpecimenContext;
use crate::errors::ResolutionResult;
use specimen_types::{Request, Specimen};
use std::fmt;
use std::sync::Arc;

type CreateFn =
    Arc<dyn Fn(&Request, &mut dyn SpecimenContext) -> ResolutionResult<Specimen> + Send + Sync>;

/// Leaf builder backed by a closure.
#[derive(Clone)]
pub struct DelegatingBuilder {
    create: CreateFn,
}

impl DelegatingBuilder {
    pub fn new<F>(create: F) -> Self
    where
        F: Fn(&Request, &mut dyn SpecimenContext) -> ResolutionResult<Specimen> + Send + Sync + 'static,
    {
        Self {
            create: Arc::new(create),
        }
    }
}

impl SpecimenBuilder for DelegatingBuilder {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        (self.create)(request, context)
    }
}

impl fmt::Debug for DelegatingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DelegatingBuilder")
    }
}
