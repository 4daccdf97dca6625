use crate::builder::SpecimenBuilder;
use crate::catalog::{MethodKind, TypeCatalog};
use crate::context::SpecimenContext;
use crate::errors::{ResolutionError, ResolutionResult};
use crate::methods::{Method, MethodQuery, MethodRef};
use specimen_types::{Request, Specimen, Value};
use std::sync::Arc;
use tracing::{debug, trace};

/// Leaf builder that creates a type by invoking the first candidate method
/// whose parameters all resolve.
///
/// Candidates come from the query in order. Every parameter is resolved
/// through the context before anything is invoked, so a candidate is never
/// called with a partial argument list.
#[derive(Debug, Clone)]
pub struct MethodInvoker {
    query: Arc<dyn MethodQuery>,
    catalog: Arc<TypeCatalog>,
}

impl MethodInvoker {
    pub fn new(query: Arc<dyn MethodQuery>, catalog: Arc<TypeCatalog>) -> Self {
        Self { query, catalog }
    }

    pub fn query(&self) -> &Arc<dyn MethodQuery> {
        &self.query
    }

    /// Arguments for every parameter, or `None` as soon as one is missing or
    /// omitted.
    fn resolve_arguments(
        &self,
        method: &MethodRef,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Option<Vec<Value>>> {
        let mut args = Vec::with_capacity(method.parameters().len());
        for param in method.parameters() {
            match context.resolve(&Request::Parameter(param.clone()))? {
                Specimen::Value(v) => args.push(v),
                other => {
                    trace!(method = method.name(), parameter = %param.name, outcome = ?other, "candidate skipped");
                    return Ok(None);
                }
            }
        }
        Ok(Some(args))
    }
}

impl SpecimenBuilder for MethodInvoker {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let Some(ty) = request.as_type() else {
            return Ok(Specimen::none_for(request));
        };

        let candidates = self.query.select_methods(ty);
        if self.catalog.is_abstract(ty)
            && candidates.iter().any(|m| m.kind() == MethodKind::Constructor)
        {
            return Err(ResolutionError::contract(format!(
                "{} is abstract but exposes a public constructor",
                ty
            )));
        }

        for method in &candidates {
            if let Some(args) = self.resolve_arguments(method, context)? {
                debug!(method = method.name(), "invoking candidate");
                return method.invoke(&args).map(Specimen::Value);
            }
        }
        Ok(Specimen::none_for(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderRef;
    use crate::builders::{CompositeBuilder, DelegatingBuilder};
    use crate::catalog::{MethodDef, ParamDef, TypeDefinition};
    use crate::context::ResolutionContext;
    use crate::methods::ModestConstructorQuery;
    use specimen_types::TypeRef;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog(calls: Arc<AtomicUsize>) -> Arc<TypeCatalog> {
        let mut catalog = TypeCatalog::new();
        catalog.register(
            TypeDefinition::class("Point")
                .constructor([("x", TypeRef::i32()), ("y", TypeRef::string())])
                .method(
                    MethodDef::constructor(vec![ParamDef::new("blob", TypeRef::named("Unknown"))])
                    .with_body(move |_| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(Value::Null)
                    }),
                ),
        );
        catalog.register(
            TypeDefinition::abstract_class("Shape").constructor([("sides", TypeRef::i32())]),
        );
        Arc::new(catalog)
    }

    /// i32 -> 7, string -> "text" for plain and member requests.
    fn primitives() -> BuilderRef {
        Arc::new(DelegatingBuilder::new(|request, _| {
            if matches!(request, Request::Seeded(_)) {
                return Ok(Specimen::none_for(request));
            }
            Ok(match request.target_type() {
                Some(t) if t == &TypeRef::i32() => Specimen::Value(Value::I32(7)),
                Some(t) if t == &TypeRef::string() => Specimen::Value(Value::from("text")),
                _ => Specimen::none_for(request),
            })
        }))
    }

    fn context(invoker: MethodInvoker) -> ResolutionContext {
        let root: BuilderRef = Arc::new(CompositeBuilder::new(vec![
            primitives(),
            Arc::new(invoker),
        ]));
        ResolutionContext::new(root)
    }

    #[test]
    fn test_first_satisfiable_candidate_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let catalog = catalog(calls.clone());
        let query = Arc::new(ModestConstructorQuery::new(catalog.clone()));
        let mut ctx = context(MethodInvoker::new(query, catalog));

        let point = ctx.resolve(&Request::of(TypeRef::named("Point"))).unwrap();
        let point = point.value().and_then(Value::as_object).unwrap().clone();
        assert_eq!(point.get("x"), Some(Value::I32(7)));
        assert_eq!(point.get("y"), Some(Value::from("text")));
        assert_eq!(calls.load(Ordering::SeqCst), 0, "unresolvable candidate never invoked");
    }

    #[test]
    fn test_no_candidate_returns_no_specimen() {
        let catalog = catalog(Arc::new(AtomicUsize::new(0)));
        let query = Arc::new(ModestConstructorQuery::new(catalog.clone()));
        let mut ctx = context(MethodInvoker::new(query, catalog));

        assert!(ctx
            .resolve(&Request::of(TypeRef::named("Missing")))
            .unwrap()
            .is_no_specimen());
        assert!(ctx
            .resolve(&Request::seeded(Request::of(TypeRef::named("Point")), "p"))
            .unwrap()
            .is_no_specimen());
    }

    #[test]
    fn test_abstract_type_with_constructor_is_contract_violation() {
        let catalog = catalog(Arc::new(AtomicUsize::new(0)));
        let query = Arc::new(ModestConstructorQuery::new(catalog.clone()));
        let mut ctx = context(MethodInvoker::new(query, catalog));

        let err = ctx.resolve(&Request::of(TypeRef::named("Shape"))).unwrap_err();
        assert_eq!(err.code(), "CONTRACT_VIOLATION");
    }
}
