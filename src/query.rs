//! Dependency queries against a graph snapshot.
//!
//! Results are sorted by component path, deduplicated, free of the
//! queried component itself, and carry a documentation link.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{ComponentRef, DependencyGraph, DependencyLink};

/// What a component depends on and what depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub dependencies: Vec<DependencyLink>,
    pub dependents: Vec<DependencyLink>,
}

/// Dependencies and dependents of `component`, linked under `base_url`.
pub fn query_dependencies(
    graph: &DependencyGraph,
    component: &ComponentRef,
    base_url: &str,
) -> DependencyReport {
    let report = DependencyReport {
        dependencies: link_list(graph.dependencies(component), component, base_url),
        dependents: link_list(graph.dependents(component), component, base_url),
    };
    debug!(
        component = %component,
        dependencies = report.dependencies.len(),
        dependents = report.dependents.len(),
        "dependency query"
    );
    report
}

/// Query by component type and name.
pub fn query_dependency_info(
    graph: &DependencyGraph,
    component_type: &str,
    component_name: &str,
    base_url: &str,
) -> DependencyReport {
    query_dependencies(
        graph,
        &ComponentRef::new(component_type, component_name),
        base_url,
    )
}

fn link_list(
    related: Vec<&ComponentRef>,
    component: &ComponentRef,
    base_url: &str,
) -> Vec<DependencyLink> {
    let own_path = component.path();
    let mut names: Vec<String> = related.into_iter().map(ComponentRef::path).collect();
    // dedup only removes adjacent duplicates, so sort first
    names.sort();
    names.retain(|name| *name != own_path);
    names.dedup();
    names
        .into_iter()
        .map(|name| DependencyLink {
            url: format!("{}{}", base_url, name),
            name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyEdge;

    fn c(path: &str) -> ComponentRef {
        ComponentRef::parse(path).unwrap()
    }

    fn edge(from: &str, to: &str) -> DependencyEdge {
        DependencyEdge::new(c(from), c(to)).unwrap()
    }

    #[test]
    fn test_button_and_form() {
        let graph = DependencyGraph::from_edges(vec![edge("molecules/form", "atoms/button")]);
        let base = "/components/";

        let report = query_dependency_info(&graph, "atoms", "button", base);
        assert!(report.dependencies.is_empty());
        assert_eq!(
            report.dependents,
            vec![DependencyLink {
                name: "molecules/form".to_string(),
                url: "/components/molecules/form".to_string(),
            }]
        );

        let report = query_dependency_info(&graph, "molecules", "form", base);
        assert_eq!(
            report.dependencies,
            vec![DependencyLink {
                name: "atoms/button".to_string(),
                url: "/components/atoms/button".to_string(),
            }]
        );
        assert!(report.dependents.is_empty());
    }

    #[test]
    fn test_empty_graph_empty_report() {
        let report = query_dependency_info(&DependencyGraph::new(), "atoms", "button", "/");
        assert_eq!(report, DependencyReport::default());
    }

    #[test]
    fn test_sorted_regardless_of_edge_order() {
        let graph = DependencyGraph::from_edges(vec![
            edge("pages/home", "organisms/nav"),
            edge("pages/home", "atoms/link"),
            edge("pages/home", "molecules/teaser"),
            edge("pages/home", "atoms/button"),
        ]);
        let report = query_dependency_info(&graph, "pages", "home", "");
        let names: Vec<&str> = report.dependencies.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["atoms/button", "atoms/link", "molecules/teaser", "organisms/nav"]
        );
    }

    #[test]
    fn test_link_list_sorts_dedups_and_drops_self() {
        let button = c("atoms/button");
        let form = c("molecules/form");
        let icon = c("atoms/icon");
        // unsorted with non-adjacent duplicates and a self reference
        let related = vec![&form, &icon, &button, &form, &icon];
        let links = link_list(related, &button, "/c/");
        let names: Vec<&str> = links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["atoms/icon", "molecules/form"]);
        assert_eq!(links[0].url, "/c/atoms/icon");
    }

    #[test]
    fn test_serializes_as_name_url_pairs() {
        let graph = DependencyGraph::from_edges(vec![edge("molecules/form", "atoms/button")]);
        let report = query_dependency_info(&graph, "atoms", "button", "/components/");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "dependencies": [],
                "dependents": [{"name": "molecules/form", "url": "/components/molecules/form"}]
            })
        );
    }
}
