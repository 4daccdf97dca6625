//! Resolution contexts and per-resolution session state.
//!
//! A builder graph is immutable and may be shared across threads. Everything
//! that changes while a single resolution runs (the request path used for
//! diagnostics and the per-guard in-flight stacks used for cycle detection)
//! lives in a [`Session`] owned by the context driving that resolution.

use crate::builder::BuilderRef;
use crate::errors::{RequestPath, ResolutionResult};
use specimen_types::{Request, Specimen};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

static NEXT_GUARD_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a recursion guard within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardId(u64);

impl GuardId {
    pub fn next() -> Self {
        GuardId(NEXT_GUARD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Mutable state for one top-level resolution.
#[derive(Debug, Default)]
pub struct Session {
    path: Vec<Request>,
    in_flight: HashMap<GuardId, Vec<Request>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests currently being resolved, outermost first.
    pub fn path(&self) -> RequestPath {
        RequestPath::new(self.path.clone())
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// In-flight stack for one recursion guard.
    pub fn in_flight(&mut self, guard: GuardId) -> &mut Vec<Request> {
        self.in_flight.entry(guard).or_default()
    }

    /// Number of requests a guard currently has in flight.
    pub fn in_flight_len(&self, guard: GuardId) -> usize {
        self.in_flight.get(&guard).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.in_flight.clear();
    }

    fn enter(&mut self, request: &Request) {
        self.path.push(request.clone());
    }

    fn leave(&mut self) {
        self.path.pop();
    }
}

/// What builders use to resolve nested requests.
pub trait SpecimenContext {
    /// Resolve `request` from the root of the graph.
    fn resolve(&mut self, request: &Request) -> ResolutionResult<Specimen>;

    fn session(&mut self) -> &mut Session;

    /// A fresh context over the same graph with an empty session, for work
    /// that outlives the current resolution (lazy sequences).
    fn detach(&self) -> ResolutionContext;
}

/// Context rooted at a builder graph.
pub struct ResolutionContext {
    root: BuilderRef,
    session: Session,
}

impl ResolutionContext {
    pub fn new(root: BuilderRef) -> Self {
        Self {
            root,
            session: Session::new(),
        }
    }

    pub fn root(&self) -> &BuilderRef {
        &self.root
    }
}

impl SpecimenContext for ResolutionContext {
    fn resolve(&mut self, request: &Request) -> ResolutionResult<Specimen> {
        // A previous top-level call that bailed out with an error may have
        // left guard stacks behind.
        if self.session.depth() == 0 {
            self.session.clear();
        }

        trace!(depth = self.session.depth(), %request, "resolving");
        self.session.enter(request);
        let root = Arc::clone(&self.root);
        let result = root.create(request, self);
        self.session.leave();
        result
    }

    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    fn detach(&self) -> ResolutionContext {
        ResolutionContext::new(Arc::clone(&self.root))
    }
}

impl std::fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("root", &self.root.node_name())
            .field("session", &self.session)
            .finish()
    }
}
