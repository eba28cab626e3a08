//! Single-slot holder for the current graph snapshot.
//!
//! Writers replace the whole snapshot; readers clone the `Arc` that is
//! current when their query starts and keep using it even if a newer
//! build lands in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::info;

use super::engine::DependencyGraph;

#[derive(Debug)]
pub struct GraphSlot {
    current: RwLock<Arc<DependencyGraph>>,
    generation: AtomicU64,
}

impl GraphSlot {
    /// A slot holding an empty graph (no build seen yet).
    pub fn new() -> Self {
        Self::with_graph(DependencyGraph::new())
    }

    pub fn with_graph(graph: DependencyGraph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
            generation: AtomicU64::new(0),
        }
    }

    /// The snapshot current at the time of the call.
    pub fn snapshot(&self) -> Arc<DependencyGraph> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Atomically swap in a new snapshot. Returns the new generation.
    pub fn replace(&self, graph: DependencyGraph) -> u64 {
        let stats = graph.stats();
        let next = Arc::new(graph);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, %stats, "graph snapshot replaced");
        generation
    }

    /// Number of replacements so far. `0` means no build has been ingested.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Default for GraphSlot {
    fn default() -> Self {
        Self::new()
    }
}
