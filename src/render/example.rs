//! Example rendering through an external template engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::pretty::PrettyPrinter;
use crate::config::SpecimenConfig;
use crate::error::{BoxError, Result, SpecimenError};
use crate::graph::ComponentRef;

/// A usage sample of one component. `content` holds HTML once rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub name: String,
    pub filepath: PathBuf,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Example {
    pub fn new(name: impl Into<String>, filepath: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            filepath: filepath.into(),
            content: String::new(),
            url: None,
        }
    }

    /// The component owning this example: the directory two levels above
    /// the example file (`<type>/<name>/<examples dir>/<file>`).
    pub fn owner(&self) -> Result<ComponentRef> {
        let missing = || SpecimenError::ExamplePath(self.filepath.clone());
        let component_dir = self
            .filepath
            .parent()
            .and_then(Path::parent)
            .ok_or_else(missing)?;
        let name = base_name(component_dir).ok_or_else(missing)?;
        let component_type = component_dir
            .parent()
            .and_then(base_name)
            .ok_or_else(missing)?;
        Ok(ComponentRef::new(component_type, name))
    }
}

fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// External template engine used to render example views.
#[async_trait]
pub trait TemplateEngine: Send + Sync {
    async fn render(&self, view: &str, data: &serde_json::Value) -> std::result::Result<String, BoxError>;
}

/// Renders examples and derives their canonical URLs.
#[derive(Clone)]
pub struct ExampleRenderer {
    templates: Arc<dyn TemplateEngine>,
    view: String,
    base_url: String,
    pretty: Option<PrettyPrinter>,
}

impl ExampleRenderer {
    pub fn new(
        templates: Arc<dyn TemplateEngine>,
        view: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            view: view.into(),
            base_url: base_url.into(),
            pretty: None,
        }
    }

    pub fn from_config(templates: Arc<dyn TemplateEngine>, config: &SpecimenConfig) -> Self {
        let renderer = Self::new(templates, &config.example_view, config.components_url());
        if config.pretty_print {
            renderer.with_pretty(PrettyPrinter::default())
        } else {
            renderer
        }
    }

    pub fn with_pretty(mut self, printer: PrettyPrinter) -> Self {
        self.pretty = Some(printer);
        self
    }

    /// Render `example` with the configured view.
    ///
    /// The template receives the example itself as data. A template failure
    /// is returned as is; nothing partial is kept.
    pub async fn render(&self, mut example: Example) -> Result<Example> {
        let owner = example.owner()?;
        let data = json!({
            "name": example.name,
            "filepath": example.filepath.to_string_lossy(),
            "content": example.content,
            "component": owner,
        });

        let html = self
            .templates
            .render(&self.view, &data)
            .await
            .map_err(|source| SpecimenError::Template {
                view: self.view.clone(),
                source,
            })?;

        example.url = Some(format!("{}{}/{}", self.base_url, owner.path(), example.name));
        example.content = match &self.pretty {
            Some(printer) => printer.print(&html),
            None => html,
        };
        debug!(component = %owner, example = %example.name, "example rendered");
        Ok(example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Echoes the example name and records the view it was asked for.
    #[derive(Default)]
    struct EchoTemplates {
        views: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TemplateEngine for EchoTemplates {
        async fn render(&self, view: &str, data: &serde_json::Value) -> std::result::Result<String, BoxError> {
            self.views.lock().unwrap().push(view.to_string());
            let name = data["name"].as_str().unwrap_or_default();
            Ok(format!("<div><p>{}</p></div>", name))
        }
    }

    struct FailingTemplates;

    #[async_trait]
    impl TemplateEngine for FailingTemplates {
        async fn render(&self, _view: &str, _data: &serde_json::Value) -> std::result::Result<String, BoxError> {
            Err("template exploded".into())
        }
    }

    fn button_example() -> Example {
        Example::new("primary", "/lib/components/atoms/button/_example/primary.hbs")
    }

    #[test]
    fn test_owner_two_levels_up() {
        assert_eq!(
            button_example().owner().unwrap(),
            ComponentRef::new("atoms", "button")
        );
    }

    #[test]
    fn test_owner_too_shallow() {
        for path in ["x.hbs", "_example/x.hbs", "button/_example/x.hbs"] {
            let example = Example::new("x", path);
            assert!(
                matches!(example.owner(), Err(SpecimenError::ExamplePath(_))),
                "{path}"
            );
        }
    }

    #[tokio::test]
    async fn test_render_sets_url_and_content() {
        let templates = Arc::new(EchoTemplates::default());
        let renderer = ExampleRenderer::new(templates.clone(), "example.hbs", "/components/");

        let example = renderer.render(button_example()).await.unwrap();
        assert_eq!(example.url.as_deref(), Some("/components/atoms/button/primary"));
        assert_eq!(example.content, "<div><p>primary</p></div>");
        assert_eq!(*templates.views.lock().unwrap(), vec!["example.hbs".to_string()]);
    }

    #[tokio::test]
    async fn test_render_pretty_prints() {
        let renderer = ExampleRenderer::new(Arc::new(EchoTemplates::default()), "v", "")
            .with_pretty(PrettyPrinter::default());
        let example = renderer.render(button_example()).await.unwrap();
        assert_eq!(example.content, "<div>\n  <p>primary</p>\n</div>");
    }

    #[tokio::test]
    async fn test_render_failure_propagates() {
        let renderer = ExampleRenderer::new(Arc::new(FailingTemplates), "example.hbs", "/");
        let err = renderer.render(button_example()).await.unwrap_err();
        match err {
            SpecimenError::Template { view, source } => {
                assert_eq!(view, "example.hbs");
                assert_eq!(source.to_string(), "template exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_config_uses_components_url() {
        let config = SpecimenConfig::parse("base_href = \"/styleguide/\"\npretty_print = false").unwrap();
        let renderer = ExampleRenderer::from_config(Arc::new(FailingTemplates), &config);
        assert_eq!(renderer.base_url, "/styleguide/components/");
        assert_eq!(renderer.view, "example.hbs");
        assert!(renderer.pretty.is_none());
    }
}
