//! Specimen CLI - living documentation for UI component libraries.
//!
//! Usage:
//!   specimen build                   # Ingest bundler stats, write graph cache
//!   specimen deps atoms button       # Dependency report as JSON
//!   specimen stats                   # Graph statistics
//!   specimen watch                   # Rebuild on every bundler run
//!   specimen readme README.md        # Render a readme to HTML

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use specimen::cli::{Cli, Commands};
use specimen::config::SpecimenConfig;
use specimen::graph::{BuildOutput, DependencyGraph, EdgeSource, GraphSlot, ModuleGraphBuilder};
use specimen::query::query_dependency_info;
use specimen::render::{expand_readme, Example, ReadmeDocument};
use specimen::watcher::BuildWatcher;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let specimen_dir = root.join(".specimen");
    let config = SpecimenConfig::load(&specimen_dir.join("config.toml"));
    let cache_path = config.resolve_cache_path(&specimen_dir);

    match cli.command {
        Commands::Build { stats } => {
            let stats_path = stats.or_else(|| config.resolve_stats_path(&root));
            let graph = build_graph(&config, stats_path.as_deref())?;
            graph
                .save(&cache_path)
                .with_context(|| format!("writing {}", cache_path.display()))?;

            let stats = graph.stats();
            println!("✓ Graph built");
            println!("  Components: {}", stats.components);
            println!("  Edges:      {}", stats.edges);
            println!("  Cache:      {}", cache_path.display());
        }

        Commands::Deps {
            component_type,
            name,
            base_url,
        } => {
            let graph = load_cached(&cache_path);
            let base_url = base_url.unwrap_or_else(|| config.components_url());
            let report = query_dependency_info(&graph, &component_type, &name, &base_url);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Stats => {
            let graph = load_cached(&cache_path);
            let stats = graph.stats();
            println!("Specimen - Dependency Graph");
            println!("═══════════════════════════");
            println!("Components: {}", stats.components);
            println!("Edges:      {}", stats.edges);
            if !graph.is_empty() {
                println!("Built at:   {}", graph.built_at().to_rfc3339());
            }
        }

        Commands::Watch { stats } => {
            let stats_path = stats
                .or_else(|| config.resolve_stats_path(&root))
                .context("no stats file given; pass --stats or set stats_path in config")?;

            let slot = Arc::new(GraphSlot::with_graph(load_cached(&cache_path)));
            let watcher = BuildWatcher::new(
                stats_path.clone(),
                ModuleGraphBuilder::from_config(&config)?,
                Arc::clone(&slot),
            )
            .with_cache(cache_path.clone());

            if stats_path.exists() {
                if let Err(e) = watcher.ingest() {
                    warn!(error = %e, "initial build output rejected");
                }
            }

            let _handle = watcher.start(config.debounce_ms)?;
            eprintln!("Watching {} (Ctrl-C to stop)", stats_path.display());
            tokio::signal::ctrl_c().await?;
            info!(generation = slot.generation(), stats = %slot.snapshot().stats(), "watch stopped");
        }

        Commands::Readme { file, examples } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut readme = ReadmeDocument::new(raw);
            readme.filepath = Some(file);

            let examples = match examples {
                Some(dir) => load_fragments(&dir)?,
                None => Vec::new(),
            };
            let readme = expand_readme(readme, &examples).await?;
            print!("{}", readme.rendered_html);
        }
    }

    Ok(())
}

fn build_graph(config: &SpecimenConfig, stats_path: Option<&Path>) -> Result<DependencyGraph> {
    let builder = ModuleGraphBuilder::from_config(config)?;
    let output = match stats_path {
        Some(path) => Some(
            BuildOutput::from_file(path).with_context(|| format!("reading {}", path.display()))?,
        ),
        None => {
            warn!("no stats file configured, building an empty graph");
            None
        }
    };
    Ok(builder.build(output.as_ref().map(|o| o as &dyn EdgeSource)))
}

/// The cached graph, or an empty one when nothing has been built yet.
fn load_cached(cache_path: &Path) -> DependencyGraph {
    if !cache_path.exists() {
        return DependencyGraph::new();
    }
    match DependencyGraph::load(cache_path) {
        Ok(graph) => graph,
        Err(e) => {
            warn!(path = %cache_path.display(), error = %e, "unreadable graph cache, run `specimen build`");
            DependencyGraph::new()
        }
    }
}

/// Pre-rendered example fragments: every `*.html` file, named by file stem.
fn load_fragments(dir: &Path) -> Result<Vec<Example>> {
    let mut examples = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path: PathBuf = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let mut example = Example::new(name, path.clone());
        example.content = std::fs::read_to_string(&path)?;
        examples.push(example);
    }
    examples.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(examples)
}
