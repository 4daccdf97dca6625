//! Specimen Core
//!
//! Recursive specimen resolution engine.
//!
//! A resolution graph is a tree of [`SpecimenBuilder`] nodes. A caller asks a
//! [`ResolutionContext`] for a [`Request`](specimen_types::Request); the
//! context hands it to the root node, and nodes either answer, decline with
//! `NoSpecimen`, or resolve further requests through the same context.
//!
//! # Features
//!
//! - **Composition**: composites, filters, postprocessors, output guards
//! - **Cycle detection**: per-session recursion guards with pluggable handlers
//! - **Shape relays**: arrays, collections, sequences and member requests
//! - **Constructor selection**: modest, greedy and shape-favoring queries,
//!   factory methods and generic type-argument inference
//! - **Disposal tracking**: bulk disposal of everything a graph produced
//!
//! # Core Modules
//!
//! - [`catalog`]: type definitions the engine resolves against
//! - [`context`]: resolution contexts and per-resolution sessions
//! - [`builders`]: general-purpose builder nodes
//! - [`relays`]: request-rewriting builders
//! - [`methods`]: constructor/factory queries and the method invoker
//! - [`recursion`]: recursion guard and handlers
//! - [`graph`]: walking and rewriting builder graphs
//!
//! # Example
//!
//! ```
//! use specimen_core::builders::CompositeBuilder;
//! use specimen_core::builder::BuilderRef;
//! use specimen_core::context::{ResolutionContext, SpecimenContext};
//! use specimen_core::primitives::NumericSequenceGenerator;
//! use specimen_types::{Request, Specimen, TypeRef, Value};
//! use std::sync::Arc;
//!
//! let numbers: BuilderRef = Arc::new(NumericSequenceGenerator::new());
//! let root = Arc::new(CompositeBuilder::new(vec![numbers]));
//! let mut ctx = ResolutionContext::new(root);
//! let first = ctx.resolve(&Request::of(TypeRef::i32())).unwrap();
//! assert_eq!(first, Specimen::Value(Value::I32(1)));
//! ```

#![allow(clippy::result_large_err)]
#![allow(clippy::type_complexity)]

pub mod builder;
pub mod builders;
pub mod catalog;
pub mod config;
pub mod context;
pub mod disposal;
pub mod errors;
pub mod graph;
pub mod methods;
pub mod primitives;
pub mod recursion;
pub mod relays;
pub mod specification;
pub mod well_known;

pub use builder::{BuilderRef, SpecimenBuilder};
pub use catalog::{MethodDef, MethodKind, ParamDef, TypeCatalog, TypeDefinition};
pub use config::{ConstructorQueryKind, EngineConfig, RecursionPolicy};
pub use context::{ResolutionContext, Session, SpecimenContext};
pub use disposal::DisposalTracker;
pub use errors::{RequestPath, ResolutionError, ResolutionResult};
pub use recursion::{
    NullRecursionHandler, OmitOnRecursionHandler, RecursionGuard, RecursionHandler,
    ThrowingRecursionHandler,
};
pub use specification::{RequestSpecification, SpecificationRef};
