//! Languages recognized in readme code blocks, with their tree-sitter
//! grammars and highlight queries.

use serde::{Deserialize, Serialize};
use tree_sitter::Language;

/// Supported code block languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedLanguage {
    Json,
    Html,
    Css,
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Rust,
}

impl SupportedLanguage {
    /// Candidates for automatic detection, in tie-break priority order.
    pub const DETECTION_ORDER: [SupportedLanguage; 8] = [
        SupportedLanguage::Json,
        SupportedLanguage::Html,
        SupportedLanguage::Css,
        SupportedLanguage::JavaScript,
        SupportedLanguage::TypeScript,
        SupportedLanguage::Tsx,
        SupportedLanguage::Python,
        SupportedLanguage::Rust,
    ];

    /// Map a fenced code block info string (`js`, `html`, `scss` ...) to a language.
    pub fn from_fence(info: &str) -> Option<Self> {
        let tag = info.split_whitespace().next()?.to_ascii_lowercase();
        match tag.as_str() {
            "json" | "jsonc" => Some(SupportedLanguage::Json),
            "html" | "htm" | "xml" | "svg" | "hbs" | "handlebars" | "twig" => {
                Some(SupportedLanguage::Html)
            }
            "css" | "scss" | "less" => Some(SupportedLanguage::Css),
            "js" | "javascript" | "mjs" | "cjs" | "jsx" => Some(SupportedLanguage::JavaScript),
            "ts" | "typescript" | "mts" | "cts" => Some(SupportedLanguage::TypeScript),
            "tsx" => Some(SupportedLanguage::Tsx),
            "py" | "python" => Some(SupportedLanguage::Python),
            "rs" | "rust" => Some(SupportedLanguage::Rust),
            _ => None,
        }
    }

    /// Get the tree-sitter Language for this language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SupportedLanguage::Json => tree_sitter_json::LANGUAGE.into(),
            SupportedLanguage::Html => tree_sitter_html::LANGUAGE.into(),
            SupportedLanguage::Css => tree_sitter_css::LANGUAGE.into(),
            SupportedLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            SupportedLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SupportedLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            SupportedLanguage::Python => tree_sitter_python::LANGUAGE.into(),
            SupportedLanguage::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    /// Highlight query. TypeScript grammars extend the JavaScript queries.
    pub fn highlights_query(&self) -> String {
        match self {
            SupportedLanguage::Json => tree_sitter_json::HIGHLIGHTS_QUERY.to_string(),
            SupportedLanguage::Html => tree_sitter_html::HIGHLIGHTS_QUERY.to_string(),
            SupportedLanguage::Css => tree_sitter_css::HIGHLIGHTS_QUERY.to_string(),
            SupportedLanguage::JavaScript => format!(
                "{}\n{}",
                tree_sitter_javascript::JSX_HIGHLIGHT_QUERY,
                tree_sitter_javascript::HIGHLIGHT_QUERY
            ),
            SupportedLanguage::TypeScript => format!(
                "{}\n{}",
                tree_sitter_typescript::HIGHLIGHTS_QUERY,
                tree_sitter_javascript::HIGHLIGHT_QUERY
            ),
            SupportedLanguage::Tsx => format!(
                "{}\n{}\n{}",
                tree_sitter_typescript::HIGHLIGHTS_QUERY,
                tree_sitter_javascript::JSX_HIGHLIGHT_QUERY,
                tree_sitter_javascript::HIGHLIGHT_QUERY
            ),
            SupportedLanguage::Python => tree_sitter_python::HIGHLIGHTS_QUERY.to_string(),
            SupportedLanguage::Rust => tree_sitter_rust::HIGHLIGHTS_QUERY.to_string(),
        }
    }

    /// Identifier used in `language-*` CSS classes.
    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::Json => "json",
            SupportedLanguage::Html => "html",
            SupportedLanguage::Css => "css",
            SupportedLanguage::JavaScript => "javascript",
            SupportedLanguage::TypeScript => "typescript",
            SupportedLanguage::Tsx => "tsx",
            SupportedLanguage::Python => "python",
            SupportedLanguage::Rust => "rust",
        }
    }
}
