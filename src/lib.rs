//! # Specimen
//!
//! Living documentation for UI component libraries.
//!
//! Specimen reads a module bundler's finished build output, reduces it to a
//! dependency graph between components (`type/name`), and assembles
//! per-component documentation: rendered examples, the readme with
//! `example:<name>` references inlined, and links to the components it
//! depends on and that depend on it.
//!
//! ## Key Features
//!
//! - **Bundler agnostic**: reason-graph and name-indexed stats both feed the same graph
//! - **Snapshots**: each build swaps in a new immutable graph, readers never block
//! - **Readme expansion**: inline example substitution and highlighted code blocks
//! - **Watch mode**: the graph follows the bundler as it rebuilds
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use specimen::{query_dependency_info, BuildOutput, ModuleGraphBuilder, SpecimenConfig};
//! use std::path::Path;
//!
//! let config = SpecimenConfig::default();
//! let builder = ModuleGraphBuilder::from_config(&config).unwrap();
//! let stats = BuildOutput::from_file(Path::new("stats.json")).unwrap();
//! let graph = builder.build(Some(&stats));
//!
//! let report = query_dependency_info(&graph, "atoms", "button", &config.components_url());
//! // report.dependents: components importing atoms/button
//! ```

pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod graph;
pub mod query;
pub mod render;
pub mod watcher;

// Re-exports for convenience
pub use config::SpecimenConfig;
pub use error::{BoxError, Result, SpecimenError};

// Graph re-exports
pub use graph::{
    BuildOutput, ComponentPathNormalizer, ComponentRef, DependencyEdge, DependencyGraph,
    DependencyLink, EdgeSource, GraphSlot, GraphStats, ModuleGraphBuilder,
};
pub use query::{query_dependencies, query_dependency_info, DependencyReport};

// Documentation pipeline
pub use docs::{Component, ComponentResolver, DocumentationAssembler, DocumentationPayload};
pub use render::{expand_readme, render_markdown, Example, ExampleRenderer, ReadmeDocument, TemplateEngine};
pub use watcher::{BuildWatcher, WatchHandle};
