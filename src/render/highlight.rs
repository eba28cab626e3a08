//! Tree-sitter syntax highlighting for readme code blocks.
//!
//! When a code block does not name its language, every grammar parses the
//! code and the one producing the fewest syntax errors wins.

use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser};
use tree_sitter_highlight::{Highlight, HighlightConfiguration, Highlighter, HtmlRenderer};
use tracing::{debug, warn};

use super::escape_html;
use super::language::SupportedLanguage;

/// Capture names we assign CSS classes to. The index into this array
/// becomes the `Highlight` id.
const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "embedded",
    "function",
    "function.builtin",
    "function.method",
    "keyword",
    "number",
    "operator",
    "property",
    "punctuation.bracket",
    "punctuation.delimiter",
    "punctuation.special",
    "string",
    "string.special",
    "tag",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

/// Precomputed span attributes: `class="hl-keyword"` etc.
/// Dots in capture names become hyphens in CSS classes.
fn span_attrs() -> &'static [Vec<u8>] {
    static ATTRS: OnceLock<Vec<Vec<u8>>> = OnceLock::new();
    ATTRS.get_or_init(|| {
        HIGHLIGHT_NAMES
            .iter()
            .map(|name| format!("class=\"hl-{}\"", name.replace('.', "-")).into_bytes())
            .collect()
    })
}

fn configs() -> &'static HashMap<SupportedLanguage, HighlightConfiguration> {
    static CONFIGS: OnceLock<HashMap<SupportedLanguage, HighlightConfiguration>> = OnceLock::new();
    CONFIGS.get_or_init(|| {
        SupportedLanguage::DETECTION_ORDER
            .iter()
            .filter_map(|&lang| {
                match HighlightConfiguration::new(
                    lang.tree_sitter_language(),
                    lang.name(),
                    &lang.highlights_query(),
                    "",
                    "",
                ) {
                    Ok(mut config) => {
                        config.configure(HIGHLIGHT_NAMES);
                        Some((lang, config))
                    }
                    Err(e) => {
                        warn!(language = lang.name(), error = %e, "highlight query rejected");
                        None
                    }
                }
            })
            .collect()
    })
}

/// Parse result used to rank candidate languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParseScore {
    errors: usize,
    /// Named nodes below the root, not counting plain `text`.
    structure: usize,
}

fn score(lang: SupportedLanguage, code: &str) -> Option<ParseScore> {
    let mut parser = Parser::new();
    parser.set_language(&lang.tree_sitter_language()).ok()?;
    let tree = parser.parse(code, None)?;
    let mut score = ParseScore {
        errors: 0,
        structure: 0,
    };
    let root = tree.root_node();
    if root.is_error() {
        score.errors += 1;
    }
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        count_nodes(child, &mut score);
    }
    Some(score)
}

fn count_nodes(node: Node, score: &mut ParseScore) {
    if node.is_error() || node.is_missing() {
        score.errors += 1;
    } else if node.is_named() && node.kind() != "text" {
        score.structure += 1;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count_nodes(child, score);
    }
}

/// Guess the language of a code snippet.
///
/// The grammar with the fewest syntax errors wins, ties going to the
/// earlier entry of [`SupportedLanguage::DETECTION_ORDER`]. A grammar that
/// sees nothing but plain text is not a candidate. Returns `None` when
/// every grammar mostly fails.
pub fn detect_language(code: &str) -> Option<SupportedLanguage> {
    if code.trim().is_empty() {
        return None;
    }
    let (priority, lang, best) = SupportedLanguage::DETECTION_ORDER
        .par_iter()
        .enumerate()
        .filter_map(|(priority, &lang)| score(lang, code).map(|s| (priority, lang, s)))
        .filter(|(_, _, s)| s.structure > 0)
        .min_by_key(|(priority, _, s)| (s.errors, *priority))?;

    debug!(language = lang.name(), priority, errors = best.errors, "detected code block language");
    // more than one error node per ten recognized nodes is not a match
    if best.errors * 10 > best.structure {
        return None;
    }
    Some(lang)
}

/// Highlight `code` as `lang`, returning inner HTML with `<span class="hl-*">`.
///
/// Falls back to HTML-escaped plain text if highlighting fails.
pub fn highlight(code: &str, lang: SupportedLanguage) -> String {
    let Some(config) = configs().get(&lang) else {
        return escape_html(code);
    };
    let attrs = span_attrs();

    let mut highlighter = Highlighter::new();
    let highlights = match highlighter.highlight(config, code.as_bytes(), None, |_| None) {
        Ok(highlights) => highlights,
        Err(_) => return escape_html(code),
    };

    let mut renderer = HtmlRenderer::new();
    let rendered = renderer.render(highlights, code.as_bytes(), &|h: Highlight, html: &mut Vec<u8>| {
        html.extend_from_slice(&attrs[h.0])
    });
    if rendered.is_err() {
        return escape_html(code);
    }

    // the renderer always ends its output with a newline
    let mut html = String::from_utf8_lossy(&renderer.html).into_owned();
    if !code.ends_with('\n') && html.ends_with('\n') {
        html.pop();
    }
    html
}

/// Render a code block as `<pre><code class="hljs language-*">`.
///
/// A recognized fence language is used as-is; otherwise the language is
/// detected from the code.
pub fn render_code_block(code: &str, fence: Option<&str>) -> String {
    let lang = fence
        .and_then(SupportedLanguage::from_fence)
        .or_else(|| detect_language(code));
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"hljs language-{}\">{}</code></pre>\n",
            lang.name(),
            highlight(code, lang)
        ),
        None => format!("<pre><code class=\"hljs\">{}</code></pre>\n", escape_html(code)),
    }
}
