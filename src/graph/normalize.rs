//! Maps bundler module identifiers and file paths to component paths.
//!
//! A module belongs to a component when its path runs through the
//! components root followed by `<type>/<name>/...`. Bundler-relative
//! module names (`./atoms/button/js/button.ts`) are already relative to
//! the components root.

use regex::Regex;

use super::types::ComponentRef;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ComponentPathNormalizer {
    /// Matches `<root>/`; callers check the segment boundary before it.
    root: Regex,
}

impl ComponentPathNormalizer {
    /// Create a normalizer for the given components root segment(s),
    /// e.g. `components` or `src/patterns`.
    pub fn new(components_root: &str) -> Result<Self> {
        let root = components_root.replace('\\', "/");
        let root = root.trim_matches('/');
        let root = Regex::new(&format!("{}/", regex::escape(root)))?;
        Ok(Self { root })
    }

    /// Normalize a module path to its component, or `None` if the path
    /// does not follow the component convention.
    pub fn normalize(&self, path: &str) -> Option<ComponentRef> {
        self.split(path).map(|(component, _)| component)
    }

    /// True when `path` is the entry module `<type>/<name>/js/<name>.<ext>`
    /// of `component` for one of the given extensions.
    pub fn is_entry_point(&self, path: &str, component: &ComponentRef, extensions: &[String]) -> bool {
        let Some((owner, rest)) = self.split(path) else {
            return false;
        };
        if &owner != component {
            return false;
        }
        let Some(file) = rest.strip_prefix("js/") else {
            return false;
        };
        file.strip_prefix(component.name.as_str())
            .and_then(|tail| tail.strip_prefix('.'))
            .is_some_and(|ext| extensions.iter().any(|e| e == ext))
    }

    /// Split a path into its component and the remainder below the
    /// component directory.
    fn split(&self, path: &str) -> Option<(ComponentRef, String)> {
        let cleaned = clean_module_path(path);
        if cleaned.starts_with("node_modules/") || cleaned.contains("/node_modules/") {
            return None;
        }

        // A component may share the root's name, so the innermost root
        // occurrence is not always the right one.
        let roots: Vec<usize> = self
            .root
            .find_iter(&cleaned)
            .filter(|m| m.start() == 0 || cleaned.as_bytes()[m.start() - 1] == b'/')
            .map(|m| m.end())
            .collect();
        roots
            .into_iter()
            .rev()
            .find_map(|end| split_relative(&cleaned[end..]))
            .or_else(|| split_relative(cleaned.strip_prefix("./")?))
    }
}

/// `<type>/<name>/<rest>` relative to the components root.
fn split_relative(relative: &str) -> Option<(ComponentRef, String)> {
    let mut segments = relative.splitn(3, '/');
    let component_type = segments.next()?;
    let name = segments.next()?;
    let rest = segments.next()?;
    if !is_plain_segment(component_type) || !is_plain_segment(name) || rest.is_empty() {
        return None;
    }
    Some((ComponentRef::new(component_type, name), rest.to_string()))
}

/// Unify separators and drop loader chains (`a!b!path`) and query strings.
fn clean_module_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let resource = unified.rsplit('!').next().unwrap_or(&unified);
    let resource = resource.split('?').next().unwrap_or(resource);
    resource.trim().to_string()
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> ComponentPathNormalizer {
        ComponentPathNormalizer::new("components").unwrap()
    }

    fn exts() -> Vec<String> {
        vec!["js".to_string(), "ts".to_string()]
    }

    #[test]
    fn test_relative_module_name() {
        let n = normalizer();
        assert_eq!(
            n.normalize("./atoms/button/js/button.ts"),
            Some(ComponentRef::new("atoms", "button"))
        );
        assert_eq!(
            n.normalize("./molecules/form/css/form.scss"),
            Some(ComponentRef::new("molecules", "form"))
        );
    }

    #[test]
    fn test_absolute_paths_both_separators() {
        let n = normalizer();
        assert_eq!(
            n.normalize("/home/app/src/components/atoms/button/js/button.ts"),
            Some(ComponentRef::new("atoms", "button"))
        );
        assert_eq!(
            n.normalize(r"C:\app\src\components\organisms\header\js\header.js"),
            Some(ComponentRef::new("organisms", "header"))
        );
    }

    #[test]
    fn test_loader_chain_and_query_dropped() {
        let n = normalizer();
        assert_eq!(
            n.normalize("babel-loader!/app/components/atoms/icon/js/icon.js?cache=1"),
            Some(ComponentRef::new("atoms", "icon"))
        );
    }

    #[test]
    fn test_non_component_paths() {
        let n = normalizer();
        assert_eq!(n.normalize("./node_modules/lodash/index.js"), None);
        assert_eq!(n.normalize("/app/components/node_modules/x/y/z.js"), None);
        assert_eq!(n.normalize("/app/src/main.ts"), None);
        assert_eq!(n.normalize("./atoms/button"), None);
        assert_eq!(n.normalize("./../atoms/x.js"), None);
        assert_eq!(n.normalize(""), None);
    }

    #[test]
    fn test_last_root_occurrence_wins() {
        let n = normalizer();
        assert_eq!(
            n.normalize("/srv/components/site/components/atoms/link/js/link.js"),
            Some(ComponentRef::new("atoms", "link"))
        );
    }

    #[test]
    fn test_component_named_like_root() {
        let n = normalizer();
        assert_eq!(
            n.normalize("/app/src/components/molecules/components/js/components.ts"),
            Some(ComponentRef::new("molecules", "components"))
        );
        assert_eq!(
            n.normalize("./atoms/components/js/components.ts"),
            Some(ComponentRef::new("atoms", "components"))
        );
        // `mycomponents/` is not the root
        assert_eq!(n.normalize("/app/mycomponents/a/b.js"), None);
    }

    #[test]
    fn test_multi_segment_root() {
        let n = ComponentPathNormalizer::new("src/patterns/").unwrap();
        assert_eq!(
            n.normalize("/repo/src/patterns/atoms/button/index.ts"),
            Some(ComponentRef::new("atoms", "button"))
        );
    }

    #[test]
    fn test_entry_point() {
        let n = normalizer();
        let button = ComponentRef::new("atoms", "button");
        assert!(n.is_entry_point("./atoms/button/js/button.ts", &button, &exts()));
        assert!(n.is_entry_point("/x/components/atoms/button/js/button.js", &button, &exts()));
        assert!(!n.is_entry_point("./atoms/button/js/button.scss", &button, &exts()));
        assert!(!n.is_entry_point("./atoms/button/js/helper.ts", &button, &exts()));
        assert!(!n.is_entry_point("./atoms/button/js/button.spec.ts", &button, &exts()));
        assert!(!n.is_entry_point("./atoms/link/js/link.ts", &button, &exts()));
    }
}
