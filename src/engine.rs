//! The default resolution graph and the `Engine` that drives it.
//!
//! [`EngineBuilder`] assembles the standard graph from an [`EngineConfig`]
//! and a [`TypeCatalog`]. From the outside in:
//!
//! ```text
//! DisposalTracker                  (when track_disposables)
//!   NoSpecimenOutputGuard          unanswered requests become errors
//!     RecursionGuard               cycle handling per config
//!       CompositeBuilder
//!         UnsafeRequestGuard
//!         customizations           registered factories and relays
//!         primitives               numbers, bools, chars, strings, ranges
//!         member relays            parameter / property / field
//!         shape relays             arrays, sequences, collection interfaces
//!         collection invoker       enumerable-favoring constructors
//!         object invoker           constructors + auto-properties
//!         abstract factories       static factories on abstract types
//!         SeedIgnoringRelay
//! ```

use rayon::prelude::*;
use specimen_core::builder::BuilderRef;
use specimen_core::builders::{
    AutoPropertiesCommand, CompositeBuilder, FilteringBuilder, NoSpecimenOutputGuard,
    Postprocessor, SeededFactory, TypeRelay, UnsafeRequestGuard,
};
use specimen_core::catalog::{TypeCatalog, TypeDefinition};
use specimen_core::config::{ConstructorQueryKind, EngineConfig};
use specimen_core::context::{ResolutionContext, SpecimenContext};
use specimen_core::disposal::DisposalTracker;
use specimen_core::errors::{RequestPath, ResolutionError, ResolutionResult};
use specimen_core::graph;
use specimen_core::methods::{
    CompositeMethodQuery, FactoryMethodQuery, FavoringConstructorQuery, GreedyConstructorQuery,
    MethodInvoker, MethodQuery, MethodRef, ModestConstructorQuery,
};
use specimen_core::primitives::{
    BooleanSwitch, CharGenerator, NumericSequenceGenerator, RandomRangedNumberGenerator,
    StringGenerator,
};
use specimen_core::recursion::RecursionGuard;
use specimen_core::relays::{
    collection_relay, dictionary_relay, list_relay, set_relay, ArrayRelay, EnumerableRelay,
    EnumeratorRelay, FieldRequestRelay, FiniteSequenceRelay, MultidimensionalArrayRelay,
    MultipleRelay, ParameterRequestRelay, PropertyRequestRelay, QueryableRelay,
    RangedSequenceRelay, SeedIgnoringRelay, SortedListRelay,
};
use specimen_core::specification::{
    AbstractTypeSpecification, AndSpecification, ImplementedInterfaceSpecification,
    NotSpecification, SpecificationRef,
};
use specimen_core::well_known::enumerable;
use specimen_types::{Request, Specimen, TypeRef, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Collects a catalog, a configuration and customizations, then builds an
/// [`Engine`].
#[derive(Debug)]
pub struct EngineBuilder {
    catalog: TypeCatalog,
    config: EngineConfig,
    customizations: Vec<BuilderRef>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            catalog: TypeCatalog::with_well_known(),
            config: EngineConfig::default(),
            customizations: Vec::new(),
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog. The well-known shapes are not added back.
    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn register_type(mut self, definition: TypeDefinition) -> Self {
        self.catalog.register(definition);
        self
    }

    /// Add a builder that is consulted before any built-in one. Later
    /// customizations win over earlier ones.
    pub fn customize(mut self, builder: BuilderRef) -> Self {
        self.customizations.insert(0, builder);
        self
    }

    /// Produce values of `ty` from a closure. The closure sees the seed of
    /// seeded requests, typically the member name.
    pub fn register<F>(self, ty: TypeRef, factory: F) -> Self
    where
        F: Fn(Option<&Value>) -> ResolutionResult<Value> + Send + Sync + 'static,
    {
        self.customize(Arc::new(SeededFactory::new(ty, factory)))
    }

    /// Answer requests for `from` by resolving `to`. Open generic pairs
    /// carry their type arguments across.
    pub fn relay(self, from: TypeRef, to: TypeRef) -> ResolutionResult<Self> {
        let relay = TypeRelay::new(from, to)?;
        Ok(self.customize(Arc::new(relay)))
    }

    pub fn build(self) -> Engine {
        let catalog = Arc::new(self.catalog);
        let config = self.config;
        let core = assemble_core(&catalog, &config, self.customizations);

        let guarded: BuilderRef = Arc::new(NoSpecimenOutputGuard::new(Arc::new(
            RecursionGuard::with_handler(core, config.recursion.handler())
                .with_depth(config.recursion_depth),
        )));

        let (root, tracker) = if config.track_disposables {
            let tracker = Arc::new(DisposalTracker::new(guarded));
            let root: BuilderRef = tracker.clone();
            (root, Some(tracker))
        } else {
            (guarded, None)
        };

        info!(
            types = catalog.len(),
            repeat_count = config.repeat_count,
            recursion = %config.recursion,
            sequence_policy = %config.sequence_policy,
            "engine assembled"
        );
        Engine {
            catalog,
            config,
            root,
            tracker,
        }
    }
}

fn constructor_query(catalog: &Arc<TypeCatalog>, kind: ConstructorQueryKind) -> Arc<dyn MethodQuery> {
    match kind {
        ConstructorQueryKind::Modest => Arc::new(ModestConstructorQuery::new(catalog.clone())),
        ConstructorQueryKind::Greedy => Arc::new(GreedyConstructorQuery::new(catalog.clone())),
    }
}

/// Constructors first, then static factories.
fn object_query(catalog: &Arc<TypeCatalog>, kind: ConstructorQueryKind) -> Arc<dyn MethodQuery> {
    Arc::new(CompositeMethodQuery::new(vec![
        constructor_query(catalog, kind),
        Arc::new(FactoryMethodQuery::new(catalog.clone())),
    ]))
}

fn collection_query(catalog: &Arc<TypeCatalog>) -> Arc<dyn MethodQuery> {
    Arc::new(CompositeMethodQuery::new(vec![
        Arc::new(FavoringConstructorQuery::enumerables(catalog.clone())),
        Arc::new(FactoryMethodQuery::new(catalog.clone())),
    ]))
}

fn assemble_core(
    catalog: &Arc<TypeCatalog>,
    config: &EngineConfig,
    customizations: Vec<BuilderRef>,
) -> BuilderRef {
    let is_abstract: SpecificationRef = Arc::new(AbstractTypeSpecification::new(catalog.clone()));
    let is_concrete: SpecificationRef = Arc::new(NotSpecification::new(is_abstract.clone()));
    let is_collection: SpecificationRef = Arc::new(AndSpecification::new(vec![
        Arc::new(ImplementedInterfaceSpecification::new(
            catalog.clone(),
            enumerable(TypeRef::param("T")),
        )),
        is_concrete.clone(),
    ]));
    let ranged: BuilderRef = match config.random_seed {
        Some(seed) => Arc::new(RandomRangedNumberGenerator::with_seed(seed)),
        None => Arc::new(RandomRangedNumberGenerator::new()),
    };

    let mut nodes: Vec<BuilderRef> = vec![Arc::new(UnsafeRequestGuard)];
    nodes.extend(customizations);
    nodes.extend([
        Arc::new(NumericSequenceGenerator::new()) as BuilderRef,
        Arc::new(BooleanSwitch::default()),
        Arc::new(CharGenerator::default()),
        Arc::new(StringGenerator),
        ranged,
        Arc::new(ParameterRequestRelay),
        Arc::new(PropertyRequestRelay),
        Arc::new(FieldRequestRelay),
        Arc::new(ArrayRelay),
        Arc::new(MultidimensionalArrayRelay),
        Arc::new(EnumerableRelay),
        Arc::new(QueryableRelay),
        Arc::new(EnumeratorRelay),
        Arc::new(collection_relay()),
        Arc::new(list_relay()),
        Arc::new(set_relay()),
        Arc::new(dictionary_relay()),
        Arc::new(SortedListRelay),
        Arc::new(MultipleRelay::new(config.repeat_count)),
        Arc::new(FiniteSequenceRelay::new(config.sequence_policy)),
        Arc::new(RangedSequenceRelay),
        Arc::new(FilteringBuilder::new(
            Arc::new(MethodInvoker::new(collection_query(catalog), catalog.clone())),
            is_collection,
        )),
        Arc::new(FilteringBuilder::new(
            Arc::new(Postprocessor::new(
                Arc::new(MethodInvoker::new(
                    object_query(catalog, config.constructor_query),
                    catalog.clone(),
                )),
                Arc::new(AutoPropertiesCommand::new(catalog.clone())),
            )),
            is_concrete,
        )),
        Arc::new(FilteringBuilder::new(
            Arc::new(MethodInvoker::new(
                Arc::new(FactoryMethodQuery::new(catalog.clone())),
                catalog.clone(),
            )),
            is_abstract,
        )),
        Arc::new(SeedIgnoringRelay),
    ]);
    Arc::new(CompositeBuilder::new(nodes))
}

/// A catalog plus the default resolution graph built over it.
///
/// The graph is immutable and shared; every call gets its own
/// [`ResolutionContext`], so one engine can serve many threads.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<TypeCatalog>,
    config: EngineConfig,
    root: BuilderRef,
    tracker: Option<Arc<DisposalTracker>>,
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::new().build()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn root(&self) -> &BuilderRef {
        &self.root
    }

    /// A fresh context over the engine's graph.
    pub fn context(&self) -> ResolutionContext {
        ResolutionContext::new(self.root.clone())
    }

    /// Create a value of `ty`.
    pub fn create(&self, ty: &TypeRef) -> ResolutionResult<Value> {
        self.resolve(&Request::of(ty.clone()))
    }

    /// Resolve any request to a value. A top-level omission counts as
    /// unsatisfiable since there is nothing to return.
    pub fn resolve(&self, request: &Request) -> ResolutionResult<Value> {
        debug!(%request, "resolving");
        match self.context().resolve(request)? {
            Specimen::Value(v) => Ok(v),
            Specimen::Omit(_) | Specimen::NoSpecimen(_) => Err(ResolutionError::Unsatisfiable {
                request: request.clone(),
                path: RequestPath::new(vec![request.clone()]),
            }),
        }
    }

    /// `count` values of `ty`, resolved as one finite-sequence request.
    pub fn create_many(&self, ty: &TypeRef, count: usize) -> ResolutionResult<Vec<Value>> {
        let sequence = self.resolve(&Request::finite(Request::of(ty.clone()), count))?;
        sequence
            .items()
            .map_err(ResolutionError::from_sequence_error)?
            .ok_or_else(|| {
                ResolutionError::contract(format!("expected a sequence of {}, got {}", ty, sequence))
            })
    }

    /// Resolve independent requests concurrently, each in its own context.
    pub fn create_many_parallel(&self, types: &[TypeRef]) -> Vec<ResolutionResult<Value>> {
        types.par_iter().map(|ty| self.create(ty)).collect()
    }

    /// Constructor and factory candidates for `ty`, in the order the object
    /// invoker would try them.
    pub fn candidates(&self, ty: &TypeRef) -> Vec<MethodRef> {
        if self.catalog.implements(ty, &enumerable(TypeRef::param("T")))
            && !self.catalog.is_abstract(ty)
        {
            collection_query(&self.catalog).select_methods(ty)
        } else if self.catalog.is_abstract(ty) {
            FactoryMethodQuery::new(self.catalog.clone()).select_methods(ty)
        } else {
            object_query(&self.catalog, self.config.constructor_query).select_methods(ty)
        }
    }

    /// Dispose every disposable object created so far. Returns how many were
    /// disposed; always 0 without disposal tracking.
    pub fn dispose_all(&self) -> usize {
        self.tracker.as_ref().map_or(0, |t| t.dispose_all())
    }

    /// Disposable objects awaiting [`Engine::dispose_all`].
    pub fn tracked_count(&self) -> usize {
        self.tracker.as_ref().map_or(0, |t| t.tracked_count())
    }

    /// Indented outline of the resolution graph.
    pub fn describe(&self) -> String {
        graph::describe(&self.root)
    }
}
