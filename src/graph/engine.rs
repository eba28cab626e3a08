//! The dependency graph snapshot.
//!
//! Uses petgraph to store component relationships. A snapshot is built
//! once from a set of edges and never mutated afterwards; a new bundler
//! build produces a new snapshot.

use chrono::{DateTime, Utc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use tracing::debug;

use super::types::*;

/// Immutable component dependency graph.
///
/// `B` is a dependency of `A` exactly when `A` is a dependent of `B`:
/// both directions are read from the same directed edge.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Edges point from importer to importee.
    graph: DiGraph<ComponentRef, ()>,
    /// Index: component -> node index.
    index: HashMap<ComponentRef, NodeIndex>,
    built_at: DateTime<Utc>,
}

impl DependencyGraph {
    /// Create an empty graph (no build output available yet).
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            built_at: Utc::now(),
        }
    }

    /// Build a snapshot from edges alone.
    pub fn from_edges(edges: impl IntoIterator<Item = DependencyEdge>) -> Self {
        Self::from_parts(std::iter::empty(), edges)
    }

    /// Build a snapshot from known components (which may have no edges)
    /// and edges between them.
    pub fn from_parts(
        components: impl IntoIterator<Item = ComponentRef>,
        edges: impl IntoIterator<Item = DependencyEdge>,
    ) -> Self {
        let mut graph = Self::new();
        for component in components {
            graph.add_component(component);
        }
        for edge in edges {
            graph.add_edge(edge);
        }
        debug!(
            components = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "dependency graph assembled"
        );
        graph
    }

    pub(crate) fn with_built_at(mut self, built_at: DateTime<Utc>) -> Self {
        self.built_at = built_at;
        self
    }

    // ─── Construction ───────────────────────────────────────────

    fn add_component(&mut self, component: ComponentRef) -> NodeIndex {
        if let Some(&idx) = self.index.get(&component) {
            return idx;
        }
        let idx = self.graph.add_node(component.clone());
        self.index.insert(component, idx);
        idx
    }

    /// Add an edge once; repeated edges collapse.
    fn add_edge(&mut self, edge: DependencyEdge) {
        if edge.importer == edge.importee {
            return;
        }
        let from = self.add_component(edge.importer);
        let to = self.add_component(edge.importee);
        self.graph.update_edge(from, to, ());
    }

    // ─── Query Operations ───────────────────────────────────────

    pub fn contains(&self, component: &ComponentRef) -> bool {
        self.index.contains_key(component)
    }

    /// Components imported by `component`. Empty when unknown.
    pub fn dependencies(&self, component: &ComponentRef) -> Vec<&ComponentRef> {
        self.neighbors(component, Direction::Outgoing)
    }

    /// Components importing `component`. Empty when unknown.
    pub fn dependents(&self, component: &ComponentRef) -> Vec<&ComponentRef> {
        self.neighbors(component, Direction::Incoming)
    }

    fn neighbors(&self, component: &ComponentRef, direction: Direction) -> Vec<&ComponentRef> {
        match self.index.get(component) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, direction)
                .map(|n| &self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    /// All components, sorted.
    pub fn components(&self) -> Vec<&ComponentRef> {
        let mut components: Vec<&ComponentRef> = self.graph.node_weights().collect();
        components.sort();
        components
    }

    /// All edges, sorted.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(from, to)| DependencyEdge {
                importer: self.graph[from].clone(),
                importee: self.graph[to].clone(),
            })
            .collect();
        edges.sort();
        edges
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    // ─── Stats ──────────────────────────────────────────────────

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            components: self.graph.node_count(),
            edges: self.graph.edge_count(),
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
