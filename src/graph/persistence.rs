//! Snapshot cache: save and load a graph with bincode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

use super::engine::DependencyGraph;
use super::types::{ComponentRef, DependencyEdge};
use crate::error::Result;

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    built_at: DateTime<Utc>,
    components: Vec<ComponentRef>,
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Write the snapshot to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = SnapshotFile {
            built_at: self.built_at(),
            components: self.components().into_iter().cloned().collect(),
            edges: self.edges(),
        };
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &file)?;
        debug!(path = %path.display(), stats = %self.stats(), "graph snapshot saved");
        Ok(())
    }

    /// Read a snapshot previously written by [`DependencyGraph::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let file: SnapshotFile = bincode::deserialize_from(reader)?;
        let graph = DependencyGraph::from_parts(file.components, file.edges)
            .with_built_at(file.built_at);
        debug!(path = %path.display(), stats = %graph.stats(), "graph snapshot loaded");
        Ok(graph)
    }
}
