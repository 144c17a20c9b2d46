//! Context-scoped builder registry.
//!
//! # Design
//! Call sites that want implicit reuse get one builder per logical execution
//! context (a test worker, a task id) through an explicit mapping instead of
//! thread-local lifetime. Creation happens on first `obtain`, teardown
//! through `release`/`clear`, so ownership stays visible. Contexts never
//! share a builder, which is the whole concurrency story: isolation, not
//! locking. Explicit `RequestBuilder::new` remains the primary path; the
//! registry is a convenience, never a requirement.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::builder::RequestBuilder;

type Slot = Arc<Mutex<RequestBuilder>>;

/// Mapping from execution-context id to its cached builder.
#[derive(Default)]
pub struct BuilderRegistry {
    contexts: Mutex<HashMap<String, Slot>>,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the builder for `context`, creating one over the real ureq
    /// transport on first call. `log` only matters for that first call;
    /// later calls return the cached instance regardless of the flag.
    pub fn obtain(&self, context: &str, log: bool) -> Slot {
        self.obtain_with(context, || RequestBuilder::new(log))
    }

    /// Like [`obtain`](Self::obtain), with a caller-supplied constructor for
    /// the first call. Lets tests register builders over transport doubles.
    pub fn obtain_with<F>(&self, context: &str, create: F) -> Slot
    where
        F: FnOnce() -> RequestBuilder,
    {
        let mut contexts = self.contexts.lock().expect("registry mutex poisoned");
        contexts
            .entry(context.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(create())))
            .clone()
    }

    /// Teardown hook: drop the builder cached for `context`. Returns whether
    /// one existed.
    pub fn release(&self, context: &str) -> bool {
        let mut contexts = self.contexts.lock().expect("registry mutex poisoned");
        contexts.remove(context).is_some()
    }

    /// Drop every cached builder.
    pub fn clear(&self) {
        self.contexts
            .lock()
            .expect("registry mutex poisoned")
            .clear();
    }
}

/// The process-wide registry, for call sites that want implicit reuse
/// without passing a registry around.
pub fn shared() -> &'static BuilderRegistry {
    static SHARED: OnceLock<BuilderRegistry> = OnceLock::new();
    SHARED.get_or_init(BuilderRegistry::new)
}
