//! Documentation assembly.
//!
//! Pulls a component, its examples and its readme from the resolver,
//! renders the examples, expands the readme against them and attaches the
//! component's dependencies from the current graph snapshot.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SpecimenConfig;
use crate::error::{BoxError, Result, SpecimenError};
use crate::graph::{ComponentRef, DependencyLink, GraphSlot};
use crate::query::query_dependencies;
use crate::render::{expand_readme, Example, ExampleRenderer, ReadmeDocument, TemplateEngine};

/// Component metadata as produced by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    pub directory: PathBuf,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Component {
    pub fn component_ref(&self) -> ComponentRef {
        ComponentRef::new(&self.component_type, &self.name)
    }
}

/// Component discovery. Any error fails the current request.
#[async_trait]
pub trait ComponentResolver: Send + Sync {
    /// Look up a component by `type/name`.
    async fn component(&self, path: &str) -> std::result::Result<Component, BoxError>;

    /// Unrendered examples in a component directory.
    async fn component_examples(&self, directory: &Path) -> std::result::Result<Vec<Example>, BoxError>;

    /// The component's readme, if it has one.
    async fn component_readme(
        &self,
        directory: &Path,
    ) -> std::result::Result<Option<ReadmeDocument>, BoxError>;

    async fn component_types(&self) -> std::result::Result<Vec<String>, BoxError>;

    async fn components(&self, component_type: &str) -> std::result::Result<Vec<Component>, BoxError>;
}

/// Everything a presentation layer needs to show one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationPayload {
    pub page_title: String,
    pub component: Component,
    pub examples: Vec<Example>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_example: Option<Example>,
    pub readme: Option<ReadmeDocument>,
    pub component_dependencies: Vec<DependencyLink>,
    pub component_dependents: Vec<DependencyLink>,
}

pub struct DocumentationAssembler {
    resolver: Arc<dyn ComponentResolver>,
    renderer: ExampleRenderer,
    graph: Arc<GraphSlot>,
    components_url: String,
    page_title: String,
}

impl DocumentationAssembler {
    pub fn new(
        resolver: Arc<dyn ComponentResolver>,
        templates: Arc<dyn TemplateEngine>,
        graph: Arc<GraphSlot>,
        config: &SpecimenConfig,
    ) -> Self {
        Self {
            resolver,
            renderer: ExampleRenderer::from_config(templates, config),
            graph,
            components_url: config.components_url(),
            page_title: config.page_title.clone(),
        }
    }

    /// Assemble the payload for `component_type/name`, optionally narrowed
    /// to the example called `example_filter`.
    ///
    /// The readme always sees every example, even when narrowed.
    pub async fn assemble(
        &self,
        component_type: &str,
        name: &str,
        example_filter: Option<&str>,
    ) -> Result<DocumentationPayload> {
        let target = ComponentRef::new(component_type, name);
        // queries for this request all see the snapshot current at its start
        let snapshot = self.graph.snapshot();

        let path = target.path();
        let component = self
            .resolver
            .component(&path)
            .await
            .map_err(|e| SpecimenError::resolver("component", &path, e))?;
        let directory = component.directory.as_path();

        let examples = async {
            let raw = self
                .resolver
                .component_examples(directory)
                .await
                .map_err(|e| {
                    SpecimenError::resolver("component_examples", directory.display().to_string(), e)
                })?;
            try_join_all(raw.into_iter().map(|example| self.renderer.render(example))).await
        };
        let readme = async {
            self.resolver
                .component_readme(directory)
                .await
                .map_err(|e| {
                    SpecimenError::resolver("component_readme", directory.display().to_string(), e)
                })
        };
        let (examples, readme) = futures::try_join!(examples, readme)?;

        let readme = match readme {
            Some(readme) => Some(expand_readme(readme, &examples).await?),
            None => None,
        };

        let report = query_dependencies(&snapshot, &target, &self.components_url);

        let (examples, selected_example) = match example_filter {
            Some(filter) => {
                let matching: Vec<Example> =
                    examples.into_iter().filter(|e| e.name == filter).collect();
                let selected = match matching.as_slice() {
                    [only] => Some(only.clone()),
                    _ => None,
                };
                (matching, selected)
            }
            None => (examples, None),
        };

        info!(
            component = %target,
            examples = examples.len(),
            dependencies = report.dependencies.len(),
            dependents = report.dependents.len(),
            "documentation assembled"
        );

        Ok(DocumentationPayload {
            page_title: self.page_title(&target, example_filter),
            component,
            examples,
            selected_example,
            readme,
            component_dependencies: report.dependencies,
            component_dependents: report.dependents,
        })
    }

    /// Components grouped by type, each group sorted by name. `None` lists
    /// every type the resolver knows.
    pub async fn navigation(
        &self,
        component_type: Option<&str>,
    ) -> Result<BTreeMap<String, Vec<Component>>> {
        let types = match component_type {
            Some(component_type) => vec![component_type.to_string()],
            None => self
                .resolver
                .component_types()
                .await
                .map_err(|e| SpecimenError::resolver("component_types", "*", e))?,
        };

        let groups = try_join_all(types.into_iter().map(|component_type| async move {
            let mut components = self
                .resolver
                .components(&component_type)
                .await
                .map_err(|e| SpecimenError::resolver("components", &component_type, e))?;
            components.sort_by(|a, b| a.name.cmp(&b.name));
            Ok::<_, SpecimenError>((component_type, components))
        }))
        .await?;

        debug!(types = groups.len(), "navigation listed");
        Ok(groups.into_iter().collect())
    }

    /// Title for the overview page.
    pub fn overview_title(&self) -> String {
        format!("{} - overview", self.page_title)
    }

    fn page_title(&self, component: &ComponentRef, example: Option<&str>) -> String {
        match example {
            Some(example) => format!(
                "{} {} - {} [{}]",
                self.page_title, component.name, example, component.component_type
            ),
            None => format!(
                "{} {} [{}]",
                self.page_title, component.name, component.component_type
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyEdge, DependencyGraph};
    use std::collections::HashMap;

    /// In-memory resolver over a fixed component library.
    #[derive(Default)]
    struct LibraryResolver {
        components: Vec<Component>,
        examples: HashMap<PathBuf, Vec<Example>>,
        readmes: HashMap<PathBuf, String>,
    }

    impl LibraryResolver {
        fn with_component(mut self, component_type: &str, name: &str, examples: &[&str]) -> Self {
            let directory = PathBuf::from(format!("/lib/components/{}/{}", component_type, name));
            let list = examples
                .iter()
                .map(|example| {
                    Example::new(*example, directory.join("_example").join(format!("{}.hbs", example)))
                })
                .collect();
            self.examples.insert(directory.clone(), list);
            self.components.push(Component {
                component_type: component_type.to_string(),
                name: name.to_string(),
                directory,
                metadata: serde_json::json!({"name": name}),
            });
            self
        }

        fn with_readme(mut self, component_type: &str, name: &str, markdown: &str) -> Self {
            let directory = PathBuf::from(format!("/lib/components/{}/{}", component_type, name));
            self.readmes.insert(directory, markdown.to_string());
            self
        }
    }

    #[async_trait]
    impl ComponentResolver for LibraryResolver {
        async fn component(&self, path: &str) -> std::result::Result<Component, BoxError> {
            self.components
                .iter()
                .find(|c| c.component_ref().path() == path)
                .cloned()
                .ok_or_else(|| format!("no component {}", path).into())
        }

        async fn component_examples(&self, directory: &Path) -> std::result::Result<Vec<Example>, BoxError> {
            Ok(self.examples.get(directory).cloned().unwrap_or_default())
        }

        async fn component_readme(
            &self,
            directory: &Path,
        ) -> std::result::Result<Option<ReadmeDocument>, BoxError> {
            Ok(self.readmes.get(directory).map(|raw| ReadmeDocument::new(raw.as_str())))
        }

        async fn component_types(&self) -> std::result::Result<Vec<String>, BoxError> {
            let mut types: Vec<String> = self
                .components
                .iter()
                .map(|c| c.component_type.clone())
                .collect();
            types.sort();
            types.dedup();
            Ok(types)
        }

        async fn components(&self, component_type: &str) -> std::result::Result<Vec<Component>, BoxError> {
            Ok(self
                .components
                .iter()
                .filter(|c| c.component_type == component_type)
                .cloned()
                .collect())
        }
    }

    struct NameTemplates;

    #[async_trait]
    impl TemplateEngine for NameTemplates {
        async fn render(&self, _view: &str, data: &serde_json::Value) -> std::result::Result<String, BoxError> {
            match data["name"].as_str() {
                Some("broken") => Err("bad template".into()),
                Some(name) => Ok(format!("<button>{}</button>", name)),
                None => Err("missing name".into()),
            }
        }
    }

    fn assembler(resolver: LibraryResolver, graph: DependencyGraph) -> DocumentationAssembler {
        let config = SpecimenConfig::parse("pretty_print = false").unwrap();
        DocumentationAssembler::new(
            Arc::new(resolver),
            Arc::new(NameTemplates),
            Arc::new(GraphSlot::with_graph(graph)),
            &config,
        )
    }

    fn form_uses_button() -> DependencyGraph {
        DependencyGraph::from_edges(vec![DependencyEdge::new(
            ComponentRef::new("molecules", "form"),
            ComponentRef::new("atoms", "button"),
        )
        .unwrap()])
    }

    #[tokio::test]
    async fn test_assemble_full_payload() {
        let resolver = LibraryResolver::default()
            .with_component("atoms", "button", &["primary", "submit"])
            .with_readme("atoms", "button", "# Button\n\n`example:submit`");
        let docs = assembler(resolver, form_uses_button());

        let payload = docs.assemble("atoms", "button", None).await.unwrap();
        assert_eq!(payload.page_title, "Pattern button [atoms]");
        assert_eq!(payload.examples.len(), 2);
        assert_eq!(
            payload.examples[0].url.as_deref(),
            Some("/components/atoms/button/primary")
        );
        assert!(payload.selected_example.is_none());
        let readme = payload.readme.unwrap();
        assert!(readme.rendered_html.contains("<button>submit</button>"));
        assert!(payload.component_dependencies.is_empty());
        assert_eq!(payload.component_dependents[0].name, "molecules/form");
        assert_eq!(payload.component_dependents[0].url, "/components/molecules/form");
    }

    #[tokio::test]
    async fn test_filter_single_match_selects() {
        let resolver = LibraryResolver::default()
            .with_component("atoms", "button", &["primary", "submit"])
            .with_readme("atoms", "button", "`example:primary`");
        let docs = assembler(resolver, DependencyGraph::new());

        let payload = docs.assemble("atoms", "button", Some("submit")).await.unwrap();
        assert_eq!(payload.examples.len(), 1);
        assert_eq!(payload.selected_example.as_ref().unwrap().name, "submit");
        assert_eq!(payload.page_title, "Pattern button - submit [atoms]");
        // readme still sees the filtered-out example
        assert!(payload
            .readme
            .unwrap()
            .rendered_html
            .contains("<button>primary</button>"));
    }

    #[tokio::test]
    async fn test_filter_zero_matches_is_not_an_error() {
        let resolver =
            LibraryResolver::default().with_component("atoms", "button", &["primary"]);
        let docs = assembler(resolver, DependencyGraph::new());

        let payload = docs.assemble("atoms", "button", Some("missing")).await.unwrap();
        assert!(payload.examples.is_empty());
        assert!(payload.selected_example.is_none());
        assert!(payload.readme.is_none());
    }

    #[tokio::test]
    async fn test_unknown_component_fails() {
        let docs = assembler(LibraryResolver::default(), DependencyGraph::new());
        let err = docs.assemble("atoms", "ghost", None).await.unwrap_err();
        assert!(matches!(
            err,
            SpecimenError::Resolver { operation: "component", ref target, .. } if target == "atoms/ghost"
        ));
    }

    #[tokio::test]
    async fn test_template_failure_aborts() {
        let resolver =
            LibraryResolver::default().with_component("atoms", "button", &["primary", "broken"]);
        let docs = assembler(resolver, DependencyGraph::new());
        let err = docs.assemble("atoms", "button", None).await.unwrap_err();
        assert!(matches!(err, SpecimenError::Template { .. }));
    }

    #[tokio::test]
    async fn test_graph_replacement_visible_to_next_request() {
        let resolver = LibraryResolver::default().with_component("atoms", "button", &[]);
        let slot = Arc::new(GraphSlot::with_graph(form_uses_button()));
        let config = SpecimenConfig::default();
        let docs = DocumentationAssembler::new(
            Arc::new(resolver),
            Arc::new(NameTemplates),
            slot.clone(),
            &config,
        );

        let before = docs.assemble("atoms", "button", None).await.unwrap();
        assert_eq!(before.component_dependents.len(), 1);

        slot.replace(DependencyGraph::new());
        let after = docs.assemble("atoms", "button", None).await.unwrap();
        assert!(after.component_dependents.is_empty());
    }

    #[tokio::test]
    async fn test_navigation_groups_and_sorts() {
        let resolver = LibraryResolver::default()
            .with_component("molecules", "form", &[])
            .with_component("atoms", "icon", &[])
            .with_component("atoms", "button", &[]);
        let docs = assembler(resolver, DependencyGraph::new());

        let all = docs.navigation(None).await.unwrap();
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["atoms", "molecules"]);
        let atoms: Vec<&str> = all["atoms"].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(atoms, vec!["button", "icon"]);

        let molecules = docs.navigation(Some("molecules")).await.unwrap();
        assert_eq!(molecules.len(), 1);
        assert_eq!(molecules["molecules"][0].name, "form");
        assert_eq!(docs.overview_title(), "Pattern - overview");
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = DocumentationPayload {
            page_title: "Pattern button [atoms]".to_string(),
            component: Component {
                component_type: "atoms".to_string(),
                name: "button".to_string(),
                directory: PathBuf::from("/c/atoms/button"),
                metadata: serde_json::Value::Null,
            },
            examples: vec![],
            selected_example: None,
            readme: None,
            component_dependencies: vec![],
            component_dependents: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["component"]["type"], "atoms");
        assert!(json.get("componentDependencies").is_some());
        assert!(json.get("selectedExample").is_none());
    }
}
