//! Command line interface for Specimen.
//!
//! Commands:
//! - Graph: build, deps, stats, watch
//! - Docs: readme

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "specimen")]
#[command(about = "Living documentation for UI component libraries")]
#[command(override_help = HELP_TEXT)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

const HELP_TEXT: &str = "
specimen - living documentation for UI component libraries

Graph:
  build [--stats <FILE>]          Build the dependency graph from bundler stats
  deps <type> <name>              Dependencies and dependents of a component
  stats                           Graph statistics
  watch [--stats <FILE>]          Rebuild the graph whenever the stats file changes

Docs:
  readme <FILE> [--examples <DIR>] Render a readme, inlining `example:<name>` spans

Options:
  -r, --root <PATH>               Project root (default: .)

Config is read from <root>/.specimen/config.toml. Set RUST_LOG for log output.
";

#[derive(Subcommand)]
pub enum Commands {
    // ─── Graph ────────────────────────────────────────────────────
    /// Build the dependency graph and write the snapshot cache
    Build {
        /// Bundler stats JSON (overrides `stats_path` from config)
        #[arg(short, long)]
        stats: Option<PathBuf>,
    },

    /// Show what a component depends on and what depends on it
    Deps {
        /// Component type, e.g. `atoms`
        component_type: String,

        /// Component name, e.g. `button`
        name: String,

        /// URL prefix for links (default: `<base_href>/components/`)
        #[arg(short, long)]
        base_url: Option<String>,
    },

    /// Show graph statistics
    Stats,

    /// Keep the snapshot cache in sync with the stats file
    Watch {
        /// Bundler stats JSON (overrides `stats_path` from config)
        #[arg(short, long)]
        stats: Option<PathBuf>,
    },

    // ─── Docs ─────────────────────────────────────────────────────
    /// Render a readme to HTML
    Readme {
        /// Markdown file
        file: PathBuf,

        /// Directory of pre-rendered `<example name>.html` fragments
        #[arg(short, long)]
        examples: Option<PathBuf>,
    },
}
