//! General-purpose builder nodes.

mod composite;
mod delegating;
mod filtering;
mod output_guard;
mod postprocessor;
mod type_relay;
mod typed_node;
mod unsafe_guard;

pub use composite::CompositeBuilder;
pub use delegating::DelegatingBuilder;
pub use filtering::FilteringBuilder;
pub use output_guard::NoSpecimenOutputGuard;
pub use postprocessor::{
    ActionCommand, AutoPropertiesCommand, BindingCommand, Postprocessor, SpecimenCommand,
};
pub use type_relay::TypeRelay;
pub use typed_node::{SeededFactory, TypedNode};
pub use unsafe_guard::UnsafeRequestGuard;

pub(crate) use filtering::single;
