//! Core types for the component dependency graph.
//!
//! Components are the vertices; an edge points from the importing
//! component to the imported one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identity of a component: `type/name`. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentRef {
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
}

impl ComponentRef {
    pub fn new(component_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            name: name.into(),
        }
    }

    /// Parse a canonical `type/name` path.
    pub fn parse(path: &str) -> Option<Self> {
        let (component_type, name) = path.split_once('/')?;
        if component_type.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(component_type, name))
    }

    /// The canonical `type/name` path.
    pub fn path(&self) -> String {
        format!("{}/{}", self.component_type, self.name)
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component_type, self.name)
    }
}

/// Opaque bundler module id. Bundlers emit either numeric or string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleId {
    Number(u64),
    Name(String),
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleId::Number(n) => write!(f, "{}", n),
            ModuleId::Name(s) => write!(f, "{}", s),
        }
    }
}

/// A bundler module after path normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub raw_path: String,
    /// `None` when the path is outside the component naming convention.
    pub component: Option<ComponentRef>,
}

/// Directed `importer -> importee` edge. Never a self-loop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub importer: ComponentRef,
    pub importee: ComponentRef,
}

impl DependencyEdge {
    /// Returns `None` for a self-reference.
    pub fn new(importer: ComponentRef, importee: ComponentRef) -> Option<Self> {
        if importer == importee {
            return None;
        }
        Some(Self { importer, importee })
    }
}

/// A related component with a link to its documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyLink {
    pub name: String,
    pub url: String,
}

/// Size of a graph snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub components: usize,
    pub edges: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} components, {} edges", self.components, self.edges)
    }
}
