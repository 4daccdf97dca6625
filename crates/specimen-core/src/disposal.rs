//! Tracking of disposable specimens.

use crate::builder::{BuilderRef, SpecimenBuilder};
use crate::builders::single;
use crate::context::SpecimenContext;
use crate::errors::ResolutionResult;
use parking_lot::Mutex;
use specimen_types::{Instance, Request, Specimen, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Records every disposable object the inner builder produces so they can be
/// disposed together.
#[derive(Debug)]
pub struct DisposalTracker {
    builder: BuilderRef,
    tracked: Mutex<Registry>,
}

/// Tracked objects in creation order, plus their addresses for O(1)
/// membership. Holding the `Arc` keeps each address from being reused.
#[derive(Debug, Default)]
struct Registry {
    order: Vec<Arc<Instance>>,
    seen: HashSet<usize>,
}

impl DisposalTracker {
    pub fn new(builder: BuilderRef) -> Self {
        Self {
            builder,
            tracked: Mutex::new(Registry::default()),
        }
    }

    /// Objects currently awaiting disposal.
    pub fn tracked(&self) -> Vec<Arc<Instance>> {
        self.tracked.lock().order.clone()
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.lock().order.len()
    }

    /// Dispose everything tracked so far and forget it. Returns how many
    /// objects were disposed; a second call disposes nothing.
    pub fn dispose_all(&self) -> usize {
        let drained = std::mem::take(&mut *self.tracked.lock()).order;
        for instance in &drained {
            instance.dispose();
        }
        debug!(count = drained.len(), "disposed tracked specimens");
        drained.len()
    }

    fn track(&self, instance: &Arc<Instance>) {
        let mut tracked = self.tracked.lock();
        if tracked.seen.insert(Arc::as_ptr(instance) as usize) {
            trace!(ty = %instance.ty(), "tracking disposable");
            tracked.order.push(instance.clone());
        }
    }
}

impl SpecimenBuilder for DisposalTracker {
    fn create(
        &self,
        request: &Request,
        context: &mut dyn SpecimenContext,
    ) -> ResolutionResult<Specimen> {
        let result = self.builder.create(request, context)?;
        if let Specimen::Value(Value::Object(instance)) = &result {
            if instance.is_disposable() {
                self.track(instance);
            }
        }
        Ok(result)
    }

    fn children(&self) -> Vec<BuilderRef> {
        vec![self.builder.clone()]
    }

    /// The recomposed tracker starts with an empty registry.
    fn compose(&self, children: Vec<BuilderRef>) -> Option<BuilderRef> {
        Some(Arc::new(DisposalTracker::new(single(children))))
    }
}
