//! Cycle detection for self-referential object graphs.
//!
//! A [`RecursionGuard`] keeps a stack of the requests it is currently
//! forwarding in the session of the context driving the resolution. When an
//! incoming request already appears on that stack `depth` times it is a
//! cycle and the configured [`RecursionHandler`] decides what to return
//! instead of recursing.

use crate::builder::{BuilderRef, SpecimenBuilder};
use crate::builders::single;
use crate::context::{GuardId, SpecimenContext};
use crate::errors::{RequestPath, ResolutionError, ResolutionResult};
use specimen_types::{Request, Specimen, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Equality used to recognize a repeated request.
pub trait RequestEquality: Send + Sync + fmt::Debug {
    fn equals(&self, a: &Request, b: &Request) -> bool;
}

/// Plain structural equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEquality;

impl RequestEquality for StructuralEquality {
    fn equals(&self, a: &Request, b: &Request) -> bool {
        a == b
    }
}

/// Decides the outcome of a detected cycle.
pub trait RecursionHandler: Send + Sync + fmt::Debug {
    fn handle_recursive_request(
        &self,
        request: &Request,
        in_flight: &[Request],
        path: &RequestPath,
    ) -> ResolutionResult<Specimen>;
}

/// Fails with [`ResolutionError::RecursionCycle`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowingRecursionHandler;

impl RecursionHandler for ThrowingRecursionHandler {
    fn handle_recursive_request(
        &self,
        request: &Request,
        _in_flight: &[Request],
        path: &RequestPath,
    ) -> ResolutionResult<Specimen> {
        let mut cycle = path.requests().to_vec();
        if cycle.last() != Some(request) {
            cycle.push(request.clone());
        }
        Err(ResolutionError::RecursionCycle {
            request: request.clone(),
            path: RequestPath::new(cycle),
        })
    }
}

/// Leaves the recursive slot out.
#[derive(Debug, Clone, Copy, Default)]
pub struct OmitOnRecursionHandler;

impl RecursionHandler for OmitOnRecursionHandler {
    fn handle_recursive_request(
        &self,
        _request: &Request,
        _in_flight: &[Request],
        _path: &RequestPath,
    ) -> ResolutionResult<Specimen> {
        Ok(Specimen::omit())
    }
}

/// Fills the recursive slot with the neutral value of its type.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecursionHandler;

impl RecursionHandler for NullRecursionHandler {
    fn handle_recursive_request(
        &self,
        request: &Request,
        _in_flight: &[Request],
        _path: &RequestPath,
    ) -> ResolutionResult<Specimen> {
        let value = request
            .target_type()
            .map(Value::neutral_for)
            .unwrap_or(Value::Null);
        Ok(Specimen::Value(value))
    }
}

#[derive(Debug, Clone)]
pub struct RecursionGuard {
    id: GuardId,
    builder: BuilderRef,
    handler: Arc<dyn RecursionHandler>,
    comparer: Arc<dyn RequestEquality>,
    depth: usize,
}

impl RecursionGuard {
    /// Guard with the throwing handler and depth 1.
    pub fn new(builder: BuilderRef) -> Self {
        Self::with_handler(builder, Arc::new(ThrowingRecursionHandler))
    }

    pub fn with_handler(builder: BuilderRef, handler: Arc<dyn RecursionHandler>) -> Self {
        Self {
            id: GuardId::next(),
            builder,
            handler,
            comparer: Arc::new(StructuralEquality),
            depth: 1,
        }
    }

    pub fn with_comparer(mut self, comparer: Arc<dyn RequestEquality>) -> Self {
        self.comparer = comparer;
        self
    }

    /// How many times a request may already be in flight before it counts as
    /// a cycle. Values below 1 are treated as 1.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth.max(1);
        self
    }

    pub fn id(&self) -> GuardId {
        self.id
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl SpecimenBuilder for RecursionGuard {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let occurrences = context
            .session()
            .in_flight(self.id)
            .iter()
            .filter(|r| self.comparer.equals(r, request))
            .count();

        if occurrences >= self.depth {
            let session = context.session();
            let in_flight = session.in_flight(self.id).clone();
            let path = session.path();
            debug!(%request, %path, occurrences, "recursion detected");
            return self
                .handler
                .handle_recursive_request(request, &in_flight, &path);
        }

        context.session().in_flight(self.id).push(request.clone());
        let result = self.builder.create(request, context);
        context.session().in_flight(self.id).pop();
        result
    }

    fn children(&self) -> Vec<BuilderRef> {
        vec![self.builder.clone()]
    }

    fn compose(&self, children: Vec<BuilderRef>) -> Option<BuilderRef> {
        Some(Arc::new(
            RecursionGuard::with_handler(single(children), self.handler.clone())
                .with_comparer(self.comparer.clone())
                .with_depth(self.depth),
        ))
    }
}
