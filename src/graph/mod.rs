//! Component dependency graph.
//!
//! Provides the graph data model, path normalization, builders for
//! bundler output, the immutable snapshot engine, and the single-slot
//! holder that swaps snapshots after each build.

pub mod builder;
pub mod engine;
pub mod normalize;
pub mod persistence;
pub mod slot;
pub mod types;

pub use builder::{
    BuildOutput, EdgeExtraction, EdgeSource, ModuleGraphBuilder, ModuleNameIndex, NameIndex,
    NameIndexEntry, NameIndexed, ReasonGraph, StatsModule, StatsReason,
};
pub use engine::DependencyGraph;
pub use normalize::ComponentPathNormalizer;
pub use slot::GraphSlot;
pub use types::{ComponentRef, DependencyEdge, DependencyLink, GraphStats, ModuleId, ModuleRecord};
