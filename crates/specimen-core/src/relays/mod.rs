//! Relays: builders that answer one request by resolving another.

mod arrays;
mod collections;
mod members;
mod sequences;

pub use arrays::{ArrayRelay, MultidimensionalArrayRelay};
pub use collections::{
    collection_relay, dictionary_relay, list_relay, set_relay, EnumerableRelay, EnumeratorRelay,
    QueryableRelay, SortedListRelay,
};
pub use members::{FieldRequestRelay, ParameterRequestRelay, PropertyRequestRelay, SeedIgnoringRelay};
#[allow(deprecated)]
pub use sequences::MultipleToEnumerableRelay;
pub use sequences::{
    FiniteSequenceRelay, MultipleRelay, RangedSequenceRelay, SequencePolicy, DEFAULT_REPEAT_COUNT,
};
