use crate::builder::SpecimenBuilder;
use crate::context::SpecimenContext;
use crate::errors::{ResolutionError, ResolutionResult};
use specimen_types::{Request, Specimen};
use tracing::warn;

/// Refuses raw handles and pointers outright.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsafeRequestGuard;

impl SpecimenBuilder for UnsafeRequestGuard {
    fn create(
        &self,
        request: &Request,
        _context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        match request.target_type() {
            Some(ty) if ty.is_unsafe() => {
                warn!(%request, "refusing unsafe request");
                Err(ResolutionError::IllegalRequest {
                    request: request.clone(),
                    reason: format!("{} is a raw handle or pointer type", ty),
                })
            }
            _ => Ok(Specimen::none_for(request)),
        }
    }
}
