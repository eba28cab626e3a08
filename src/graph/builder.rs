//! Graph builder: turns bundler build output into a dependency graph.
//!
//! Bundlers describe their module graph in different shapes. Each shape is
//! an [`EdgeSource`] that yields normalized component edges; the builder
//! only ever sees those edges.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info};

use super::engine::DependencyGraph;
use super::normalize::ComponentPathNormalizer;
use super::types::{ComponentRef, DependencyEdge, ModuleId, ModuleRecord};
use crate::config::SpecimenConfig;
use crate::error::Result;

/// Normalized output of an edge source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeExtraction {
    /// Every component seen in the build, with or without edges.
    pub components: BTreeSet<ComponentRef>,
    pub edges: Vec<DependencyEdge>,
}

/// Capability: yield normalized component edges from raw build output.
pub trait EdgeSource {
    fn extract(&self, builder: &ModuleGraphBuilder) -> EdgeExtraction;
}

/// Builds dependency graph snapshots from bundler output.
#[derive(Debug, Clone)]
pub struct ModuleGraphBuilder {
    normalizer: ComponentPathNormalizer,
    source_extensions: Vec<String>,
}

impl ModuleGraphBuilder {
    pub fn new(normalizer: ComponentPathNormalizer, source_extensions: Vec<String>) -> Self {
        Self {
            normalizer,
            source_extensions,
        }
    }

    pub fn from_config(config: &SpecimenConfig) -> Result<Self> {
        Ok(Self::new(
            ComponentPathNormalizer::new(&config.components_root)?,
            config.source_extensions.clone(),
        ))
    }

    pub fn normalizer(&self) -> &ComponentPathNormalizer {
        &self.normalizer
    }

    /// Build a graph snapshot. No build output yields an empty graph.
    pub fn build(&self, output: Option<&dyn EdgeSource>) -> DependencyGraph {
        let Some(output) = output else {
            debug!("no build output available, using empty graph");
            return DependencyGraph::new();
        };
        let extraction = output.extract(self);
        let graph = DependencyGraph::from_parts(extraction.components, extraction.edges);
        info!(stats = %graph.stats(), "dependency graph built");
        graph
    }

    /// Resolve a component's entry module name by the
    /// `<type>/<name>/js/<name>.<ext>` convention. `sorted_names` must be
    /// sorted so the choice is stable.
    pub fn entry_point<'n>(
        &self,
        sorted_names: &'n [String],
        component: &ComponentRef,
    ) -> Option<&'n str> {
        sorted_names
            .iter()
            .find(|name| {
                self.normalizer
                    .is_entry_point(name, component, &self.source_extensions)
            })
            .map(String::as_str)
    }
}

// ─── Reason-graph form ──────────────────────────────────────────

/// Module list where every module names the modules importing it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReasonGraph {
    pub modules: Vec<StatsModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsModule {
    #[serde(default)]
    pub id: Option<ModuleId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    /// Importers of this module.
    #[serde(default)]
    pub reasons: Vec<StatsReason>,
}

impl StatsModule {
    /// The most precise path the bundler reported for this module.
    pub fn resolvable_path(&self) -> &str {
        self.resource
            .as_deref()
            .or(self.identifier.as_deref())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReason {
    #[serde(default)]
    pub module_id: Option<ModuleId>,
}

impl EdgeSource for ReasonGraph {
    fn extract(&self, builder: &ModuleGraphBuilder) -> EdgeExtraction {
        let records: HashMap<&ModuleId, ModuleRecord> = self
            .modules
            .iter()
            .filter_map(|module| {
                let id = module.id.as_ref()?;
                let raw_path = module.resolvable_path().to_string();
                let component = builder.normalizer.normalize(&raw_path);
                Some((
                    id,
                    ModuleRecord {
                        id: id.clone(),
                        raw_path,
                        component,
                    },
                ))
            })
            .collect();

        let mut extraction = EdgeExtraction::default();
        let mut skipped = 0usize;

        for module in &self.modules {
            let Some(record) = module.id.as_ref().and_then(|id| records.get(id)) else {
                skipped += 1;
                continue;
            };
            let Some(importee) = &record.component else {
                skipped += 1;
                continue;
            };
            extraction.components.insert(importee.clone());

            for reason in &module.reasons {
                let importer = reason
                    .module_id
                    .as_ref()
                    .and_then(|id| records.get(id))
                    .and_then(|r| r.component.clone());
                if let Some(edge) = importer.and_then(|i| DependencyEdge::new(i, importee.clone())) {
                    extraction.edges.push(edge);
                }
            }
        }

        debug!(
            modules = self.modules.len(),
            skipped,
            edges = extraction.edges.len(),
            "extracted edges from module reasons"
        );
        extraction
    }
}

// ─── Name-indexed form ──────────────────────────────────────────

/// Accessors over a bundler module graph keyed by module name.
pub trait ModuleNameIndex {
    fn module_names(&self) -> Vec<String>;
    fn dependencies_of(&self, module_name: &str) -> Vec<String>;
    fn dependents_of(&self, module_name: &str) -> Vec<String>;
}

/// Serialized name-indexed module graph.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameIndex {
    pub by_name: BTreeMap<String, NameIndexEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameIndexEntry {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub dependents: Vec<String>,
}

impl ModuleNameIndex for NameIndex {
    fn module_names(&self) -> Vec<String> {
        self.by_name.keys().cloned().collect()
    }

    fn dependencies_of(&self, module_name: &str) -> Vec<String> {
        self.by_name
            .get(module_name)
            .map(|e| e.dependencies.clone())
            .unwrap_or_default()
    }

    fn dependents_of(&self, module_name: &str) -> Vec<String> {
        self.by_name
            .get(module_name)
            .map(|e| e.dependents.clone())
            .unwrap_or_default()
    }
}

/// Adapter turning any [`ModuleNameIndex`] into an [`EdgeSource`].
#[derive(Debug, Clone)]
pub struct NameIndexed<I>(pub I);

impl<I: ModuleNameIndex> EdgeSource for NameIndexed<I> {
    fn extract(&self, builder: &ModuleGraphBuilder) -> EdgeExtraction {
        extract_name_indexed(&self.0, builder)
    }
}

fn extract_name_indexed<I: ModuleNameIndex + ?Sized>(
    index: &I,
    builder: &ModuleGraphBuilder,
) -> EdgeExtraction {
    let normalizer = &builder.normalizer;
    let mut module_names = index.module_names();
    module_names.sort();
    let mut extraction = EdgeExtraction {
        components: module_names
            .iter()
            .filter_map(|name| normalizer.normalize(name))
            .collect(),
        edges: Vec::new(),
    };

    for component in &extraction.components {
        let Some(entry) = builder.entry_point(&module_names, component) else {
            debug!(component = %component, "no entry module, skipping");
            continue;
        };

        for name in index.dependencies_of(entry) {
            if let Some(edge) = normalizer
                .normalize(&name)
                .and_then(|dep| DependencyEdge::new(component.clone(), dep))
            {
                extraction.edges.push(edge);
            }
        }
        for name in index.dependents_of(entry) {
            if let Some(edge) = normalizer
                .normalize(&name)
                .and_then(|dependent| DependencyEdge::new(dependent, component.clone()))
            {
                extraction.edges.push(edge);
            }
        }
    }

    debug!(
        components = extraction.components.len(),
        edges = extraction.edges.len(),
        "extracted edges from name index"
    );
    extraction
}

// ─── Serialized build output ────────────────────────────────────

/// Bundler stats in either supported shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BuildOutput {
    ReasonGraph(ReasonGraph),
    NameIndexed(NameIndex),
}

impl BuildOutput {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

impl EdgeSource for BuildOutput {
    fn extract(&self, builder: &ModuleGraphBuilder) -> EdgeExtraction {
        match self {
            BuildOutput::ReasonGraph(graph) => graph.extract(builder),
            BuildOutput::NameIndexed(index) => extract_name_indexed(index, builder),
        }
    }
}
