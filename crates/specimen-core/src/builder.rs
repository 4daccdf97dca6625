//! The builder abstraction every node of a resolution graph implements.

use crate::context::SpecimenContext;
use crate::errors::ResolutionResult;
use specimen_types::{Request, Specimen};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a node in a builder graph.
pub type BuilderRef = Arc<dyn SpecimenBuilder>;

/// One node of the resolution graph.
///
/// `create` returns [`Specimen::NoSpecimen`] for requests the node does not
/// handle; errors are reserved for requests it recognized but could not
/// honor. Nodes that wrap other builders expose them through `children` and
/// rebuild themselves around new children in `compose`, which is what the
/// [`crate::graph`] utilities use to rewrite a graph without mutating it.
pub trait SpecimenBuilder: Send + Sync + fmt::Debug {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen>;

    fn children(&self) -> Vec<BuilderRef> {
        Vec::new()
    }

    /// A copy of this node around `children`; `None` for leaves.
    fn compose(&self, _children: Vec<BuilderRef>) -> Option<BuilderRef> {
        None
    }

    fn node_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}
