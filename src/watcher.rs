//! Build output watching.
//!
//! Re-reads the bundler stats file whenever it changes and swaps a freshly
//! built snapshot into the [`GraphSlot`]. A stats file that fails to parse
//! leaves the previous snapshot in place.

use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Result, SpecimenError};
use crate::graph::{BuildOutput, GraphSlot, ModuleGraphBuilder};

/// Rebuilds the graph from one stats file.
pub struct BuildWatcher {
    stats_path: PathBuf,
    builder: ModuleGraphBuilder,
    slot: Arc<GraphSlot>,
    cache_path: Option<PathBuf>,
}

/// Keeps the file watch alive. Dropping it stops watching.
pub struct WatchHandle {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    watcher: Arc<BuildWatcher>,
}

impl WatchHandle {
    pub fn stats_path(&self) -> &Path {
        &self.watcher.stats_path
    }
}

impl BuildWatcher {
    pub fn new(stats_path: PathBuf, builder: ModuleGraphBuilder, slot: Arc<GraphSlot>) -> Self {
        Self {
            stats_path,
            builder,
            slot,
            cache_path: None,
        }
    }

    /// Also write every new snapshot to `cache_path`.
    pub fn with_cache(mut self, cache_path: PathBuf) -> Self {
        self.cache_path = Some(cache_path);
        self
    }

    /// Read the stats file, build and swap in a new snapshot.
    ///
    /// Returns the new generation. On error the slot is untouched.
    pub fn ingest(&self) -> Result<u64> {
        let output = BuildOutput::from_file(&self.stats_path)?;
        let graph = self.builder.build(Some(&output));

        if let Some(cache_path) = &self.cache_path {
            if let Err(e) = graph.save(cache_path) {
                warn!(path = %cache_path.display(), error = %e, "failed to write graph cache");
            }
        }

        Ok(self.slot.replace(graph))
    }

    /// Watch the stats file, re-ingesting after each debounced change.
    ///
    /// The parent directory is watched so that bundlers replacing the file
    /// (write to temp, then rename) are still seen.
    pub fn start(self, debounce_ms: u64) -> Result<WatchHandle> {
        let file_name: OsString = self
            .stats_path
            .file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                SpecimenError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", self.stats_path.display()),
                ))
            })?;
        let directory = match self.stats_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let watcher = Arc::new(self);
        let handler = Arc::clone(&watcher);
        let mut debouncer = new_debouncer(
            Duration::from_millis(debounce_ms),
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    if !events
                        .iter()
                        .any(|event| event.path.file_name() == Some(file_name.as_os_str()))
                    {
                        return;
                    }
                    debug!(path = %handler.stats_path.display(), "build output changed");
                    match handler.ingest() {
                        Ok(generation) => info!(generation, "graph refreshed from build output"),
                        Err(e) => warn!(
                            path = %handler.stats_path.display(),
                            error = %e,
                            "build output rejected, keeping previous graph"
                        ),
                    }
                }
                Err(e) => warn!(error = %e, "watch error"),
            },
        )?;
        debouncer
            .watcher()
            .watch(&directory, RecursiveMode::NonRecursive)?;

        info!(
            path = %watcher.stats_path.display(),
            debounce_ms,
            "watching build output"
        );
        Ok(WatchHandle {
            _debouncer: debouncer,
            watcher,
        })
    }
}
