//! Shared model for the specimen workspace.
//!
//! This crate holds the vocabulary the engine and its callers exchange:
//!
//! - [`types`]: structural type descriptors ([`TypeRef`], [`Primitive`])
//! - [`type_parsing`]: `List<Widget>[]`-style type strings
//! - [`request`]: what is being asked for ([`Request`] and its payloads)
//! - [`value`]: what gets produced ([`Value`], [`Instance`], sequences)
//! - [`specimen`]: resolution outcomes and the [`NoSpecimen`] / [`OmitSpecimen`] sentinels
//! - [`member`]: parameter, property and field metadata
//! - [`env_utils`]: environment overrides for configuration

pub mod env_utils;
pub mod member;
pub mod request;
pub mod specimen;
pub mod type_parsing;
pub mod types;
pub mod value;

pub use member::{MemberInfo, ParameterInfo};
pub use request::{
    FiniteSequenceRequest, RangedNumberRequest, RangedSequenceRequest, Request, RequestError,
    SeededRequest,
};
pub use specimen::{NoSpecimen, OmitSpecimen, Specimen};
pub use type_parsing::{parse_type_ref, parse_type_ref_with_params, TypeParseError};
pub use types::{Primitive, TypeRef};
pub use value::{
    ArrayValue, CollectionValue, Instance, MapValue, SequenceError, SequenceItems, SequenceShape,
    SequenceSource, SequenceValue, Value,
};
