//! Project configuration, read from `.specimen/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

/// Default debounce for the build-output watcher.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecimenConfig {
    /// Path segment marking the components root (`.../components/<type>/<name>/...`).
    pub components_root: String,
    /// Mount path of the documentation site.
    pub base_href: String,
    pub page_title: String,
    /// View id handed to the template engine for examples.
    pub example_view: String,
    /// Pretty-print rendered example HTML.
    pub pretty_print: bool,
    /// Bundler stats JSON to ingest.
    pub stats_path: Option<PathBuf>,
    /// Snapshot cache file. Relative paths resolve against `.specimen/`.
    pub cache_path: Option<PathBuf>,
    pub debounce_ms: u64,
    /// Extensions accepted for `<type>/<name>/js/<name>.<ext>` entry points.
    pub source_extensions: Vec<String>,
}

impl Default for SpecimenConfig {
    fn default() -> Self {
        Self {
            components_root: "components".to_string(),
            base_href: String::new(),
            page_title: "Pattern".to_string(),
            example_view: "example.hbs".to_string(),
            pretty_print: true,
            stats_path: None,
            cache_path: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            source_extensions: ["js", "ts", "jsx", "tsx", "mjs"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SpecimenConfig {
    /// Load config from a TOML file. Missing or invalid files fall back to defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from a TOML file, surfacing read and parse errors.
    pub fn try_load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let mut config: SpecimenConfig = toml::from_str(raw)?;
        config.base_href = config.base_href.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// URL prefix for component pages, e.g. `/docs/components/`.
    pub fn components_url(&self) -> String {
        format!("{}/components/", self.base_href)
    }

    /// Resolve the snapshot cache location under the given `.specimen` directory.
    pub fn resolve_cache_path(&self, specimen_dir: &Path) -> PathBuf {
        match &self.cache_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => specimen_dir.join(p),
            None => specimen_dir.join("graph.bin"),
        }
    }

    /// Resolve the stats file against the project root.
    pub fn resolve_stats_path(&self, root: &Path) -> Option<PathBuf> {
        self.stats_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpecimenConfig::default();
        assert_eq!(config.components_root, "components");
        assert_eq!(config.page_title, "Pattern");
        assert_eq!(config.components_url(), "/components/");
        assert!(config.pretty_print);
    }

    #[test]
    fn test_parse_partial_strips_trailing_slash() {
        let config = SpecimenConfig::parse(
            r#"
base_href = "/patterns/"
example_view = "partials/example.j2"
"#,
        )
        .unwrap();
        assert_eq!(config.base_href, "/patterns");
        assert_eq!(config.components_url(), "/patterns/components/");
        assert_eq!(config.example_view, "partials/example.j2");
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpecimenConfig::load(&dir.path().join("config.toml"));
        assert_eq!(config, SpecimenConfig::default());
    }

    #[test]
    fn test_load_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "pretty_print = \"maybe\"").unwrap();
        assert!(SpecimenConfig::try_load(&path).is_err());
        assert_eq!(SpecimenConfig::load(&path), SpecimenConfig::default());
    }

    #[test]
    fn test_resolve_paths() {
        let config = SpecimenConfig {
            stats_path: Some(PathBuf::from("dist/stats.json")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_cache_path(Path::new("/p/.specimen")),
            PathBuf::from("/p/.specimen/graph.bin")
        );
        assert_eq!(
            config.resolve_stats_path(Path::new("/p")),
            Some(PathBuf::from("/p/dist/stats.json"))
        );
    }
}
