//! Constructor and factory selection and invocation.

mod inference;
mod invoker;
mod method;
mod queries;

pub use inference::infer_type_arguments;
pub use invoker::MethodInvoker;
pub use method::{CatalogMethod, GenericMethod, Method, MethodRef};
pub use queries::{
    CompositeMethodQuery, FactoryMethodQuery, FavoredShape, FavoringConstructorQuery,
    GreedyConstructorQuery, MethodQuery, MethodTemplate, ModestConstructorQuery,
    TemplateMethodQuery,
};
