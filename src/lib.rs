//! Specimen
//!
//! Build populated object graphs from type descriptors.
//!
//! - **Engine**: the default resolution graph over a type catalog, see [`engine`]
//! - **Catalog schema**: describe types in JSON, see [`schema`]
//!
//! The engine itself lives in `specimen-core`; the shared data model in
//! `specimen-types`.
//!
//! # Example
//!
//! ```
//! use specimen::Engine;
//! use specimen_core::catalog::TypeDefinition;
//! use specimen_types::{TypeRef, Value};
//!
//! let engine = Engine::builder()
//!     .register_type(
//!         TypeDefinition::class("Point")
//!             .constructor([("x", TypeRef::i32()), ("y", TypeRef::i32())]),
//!     )
//!     .build();
//! let point = engine.create(&TypeRef::named("Point")).unwrap();
//! assert!(matches!(point.as_object().unwrap().get("x"), Some(Value::I32(_))));
//! ```

#![allow(clippy::result_large_err)]

pub mod engine;
pub mod schema;

pub use engine::{Engine, EngineBuilder};
pub use schema::CatalogSchema;
