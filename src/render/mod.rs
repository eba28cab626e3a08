//! Example rendering and readme expansion.

pub mod example;
pub mod highlight;
pub mod language;
pub mod markdown;
pub mod pretty;

pub use example::{Example, ExampleRenderer, TemplateEngine};
pub use highlight::{detect_language, render_code_block};
pub use language::SupportedLanguage;
pub use markdown::{expand_readme, render_markdown, ExampleLookup, ReadmeDocument};
pub use pretty::PrettyPrinter;

/// Escape for HTML element content. Quotes are left alone.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
