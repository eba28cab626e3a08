//! Error types for Specimen.

use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by collaborators (component resolver, template engine).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while building graphs or assembling documentation.
#[derive(Debug, Error)]
pub enum SpecimenError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bundler build output: {0}")]
    BuildOutput(#[from] serde_json::Error),

    #[error("graph snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid components root pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{operation} failed for '{target}': {source}")]
    Resolver {
        operation: &'static str,
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("template '{view}' failed to render: {source}")]
    Template {
        view: String,
        #[source]
        source: BoxError,
    },

    #[error("readme rendering failed: {0}")]
    Markdown(String),

    #[error("example file has no component directory: {}", .0.display())]
    ExamplePath(PathBuf),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl SpecimenError {
    pub(crate) fn resolver(operation: &'static str, target: impl Into<String>, source: BoxError) -> Self {
        SpecimenError::Resolver {
            operation,
            target: target.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpecimenError>;
