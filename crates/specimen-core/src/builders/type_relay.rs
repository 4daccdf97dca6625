use crate::builder::SpecimenBuilder;
use crate::context::SpecimenContext;
use crate::errors::{ResolutionError, ResolutionResult};
use specimen_types::{Request, Specimen, TypeRef};
use std::collections::BTreeMap;
use tracing::trace;

/// Answers a request for `from` with the result of requesting `to`.
///
/// Both types must be closed, or both open. An open mapping such as
/// `Collection<T> -> List<T>` binds the parameters from the requested type
/// and closes `to` over them.
#[derive(Debug, Clone)]
pub struct TypeRelay {
    from: TypeRef,
    to: TypeRef,
}

impl TypeRelay {
    pub fn new(from: TypeRef, to: TypeRef) -> ResolutionResult<Self> {
        if from.is_open() != to.is_open() {
            return Err(ResolutionError::contract(format!(
                "cannot relay {} to {}: both types must be open generics or both closed",
                from, to
            )));
        }
        let bound = from.params();
        if let Some(missing) = to.params().into_iter().find(|p| !bound.contains(p)) {
            return Err(ResolutionError::contract(format!(
                "cannot relay {} to {}: parameter {} is not bound by the source type",
                from, to, missing
            )));
        }
        Ok(Self::from_parts(from, to))
    }

    /// Skip validation for mappings known to be well formed.
    pub(crate) fn from_parts(from: TypeRef, to: TypeRef) -> Self {
        Self { from, to }
    }

    pub fn from_type(&self) -> &TypeRef {
        &self.from
    }

    pub fn to_type(&self) -> &TypeRef {
        &self.to
    }

    fn target_for(&self, requested: &TypeRef) -> Option<TypeRef> {
        if !self.from.is_open() {
            return (requested == &self.from).then(|| self.to.clone());
        }
        let mut bindings = BTreeMap::new();
        self.from.bind(requested, &mut bindings).then(|| self.to.substitute(&bindings))
    }
}

impl SpecimenBuilder for TypeRelay {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        match request.as_type().and_then(|t| self.target_for(t)) {
            Some(target) => {
                trace!(%request, %target, "relaying type");
                context.resolve(&Request::of(target))
            }
            None => Ok(Specimen::none_for(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderRef;
    use crate::builders::{CompositeBuilder, DelegatingBuilder};
    use crate::context::ResolutionContext;
    use crate::well_known::{collection, list};
    use specimen_types::Value;
    use std::sync::Arc;

    #[test]
    fn test_mixed_open_and_closed_is_rejected() {
        let err = TypeRelay::new(collection(TypeRef::param("T")), list(TypeRef::i32())).unwrap_err();
        assert_eq!(err.code(), "CONTRACT_VIOLATION");
        assert!(TypeRelay::new(collection(TypeRef::param("T")), list(TypeRef::param("U"))).is_err());
        assert!(TypeRelay::new(TypeRef::named("Shape"), TypeRef::named("Square")).is_ok());
    }

    #[test]
    fn test_open_relay_closes_target() {
        let relay: BuilderRef = Arc::new(
            TypeRelay::new(collection(TypeRef::param("T")), list(TypeRef::param("T"))).unwrap(),
        );
        let echo: BuilderRef = Arc::new(DelegatingBuilder::new(|request, _| {
            Ok(match request.as_type() {
                Some(t) if t.definition_name() == Some("List") => {
                    Specimen::Value(Value::from(t.to_string()))
                }
                _ => Specimen::none_for(request),
            })
        }));
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![relay, echo]));
        let mut ctx = ResolutionContext::new(root);

        let result = ctx.resolve(&Request::of(collection(TypeRef::string()))).unwrap();
        assert_eq!(result, Specimen::Value(Value::from("List<string>")));
        assert!(ctx.resolve(&Request::of(TypeRef::i32())).unwrap().is_no_specimen());
    }
}
