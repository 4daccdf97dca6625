use crate::builder::SpecimenBuilder;
use crate::context::SpecimenContext;
use crate::errors::ResolutionResult;
use specimen_types::{Request, Specimen, TypeRef, Value};
use tracing::trace;

fn seeded_by_name(ty: &TypeRef, name: &str) -> Request {
    trace!(member = name, %ty, "relaying member request");
    Request::seeded(Request::of(ty.clone()), Value::from(name))
}

/// Parameter request -> seeded request for the parameter type, seeded with
/// the parameter name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterRequestRelay;

impl SpecimenBuilder for ParameterRequestRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        match request {
            Request::Parameter(p) => context.resolve(&seeded_by_name(&p.ty, &p.name)),
            _ => Ok(Specimen::none_for(request)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyRequestRelay;

impl SpecimenBuilder for PropertyRequestRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        match request {
            Request::Property(m) => context.resolve(&seeded_by_name(&m.ty, &m.name)),
            _ => Ok(Specimen::none_for(request)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRequestRelay;

impl SpecimenBuilder for FieldRequestRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        match request {
            Request::Field(m) => context.resolve(&seeded_by_name(&m.ty, &m.name)),
            _ => Ok(Specimen::none_for(request)),
        }
    }
}

/// Drops the seed from a seeded request nobody handled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedIgnoringRelay;

impl SpecimenBuilder for SeedIgnoringRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        match request {
            Request::Seeded(s) => context.resolve(&s.inner),
            _ => Ok(Specimen::none_for(request)),
        }
    }
}
