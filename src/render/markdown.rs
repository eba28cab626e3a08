//! Readme markdown to HTML, with inline example substitution and
//! highlighted code blocks.
//!
//! An inline code span written as `` `example:<name>` `` is replaced by the
//! rendered HTML of the example called `<name>`. The name ends at the next
//! `:`. Unknown names render as ordinary inline code.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

use super::example::Example;
use super::{escape_html, highlight};
use crate::error::{Result, SpecimenError};

const EXAMPLE_PREFIX: &str = "example:";

/// A component's readme, before and after rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadmeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<PathBuf>,
    pub raw_markdown: String,
    #[serde(default)]
    pub rendered_html: String,
}

impl ReadmeDocument {
    pub fn new(raw_markdown: impl Into<String>) -> Self {
        Self {
            filepath: None,
            raw_markdown: raw_markdown.into(),
            rendered_html: String::new(),
        }
    }
}

/// Name to rendered-HTML lookup used while expanding a readme.
pub trait ExampleLookup {
    fn rendered(&self, name: &str) -> Option<&str>;
}

/// First example with exactly this name wins.
impl ExampleLookup for [Example] {
    fn rendered(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|example| example.name == name)
            .map(|example| example.content.as_str())
    }
}

impl ExampleLookup for HashMap<String, String> {
    fn rendered(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Render readme markdown to HTML.
pub fn render_markdown<L: ExampleLookup + ?Sized>(markdown: &str, examples: &L) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let events = ReadmeEvents::new(parser, examples);

    let mut html_output = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut html_output, events);
    html_output
}

/// Render `readme.raw_markdown` against the rendered `examples`, filling in
/// `rendered_html`.
///
/// Parsing and highlighting run on the blocking pool.
pub async fn expand_readme(mut readme: ReadmeDocument, examples: &[Example]) -> Result<ReadmeDocument> {
    let mut lookup: HashMap<String, String> = HashMap::with_capacity(examples.len());
    for example in examples {
        lookup
            .entry(example.name.clone())
            .or_insert_with(|| example.content.clone());
    }

    let raw = readme.raw_markdown.clone();
    let rendered = tokio::task::spawn_blocking(move || render_markdown(&raw, &lookup))
        .await
        .map_err(|e| SpecimenError::Markdown(e.to_string()))?;

    debug!(
        bytes = rendered.len(),
        examples = examples.len(),
        "readme expanded"
    );
    readme.rendered_html = rendered;
    Ok(readme)
}

/// Iterator adapter that substitutes example references and highlights
/// code blocks.
struct ReadmeEvents<'a, 'l, I, L: ?Sized> {
    inner: I,
    examples: &'l L,
    code_block: Option<CodeBlock>,
    _marker: std::marker::PhantomData<Event<'a>>,
}

struct CodeBlock {
    fence: Option<String>,
    buffer: String,
}

impl<'a, 'l, I, L> ReadmeEvents<'a, 'l, I, L>
where
    I: Iterator<Item = Event<'a>>,
    L: ExampleLookup + ?Sized,
{
    fn new(inner: I, examples: &'l L) -> Self {
        Self {
            inner,
            examples,
            code_block: None,
            _marker: std::marker::PhantomData,
        }
    }

    fn code_span(&self, text: &str) -> CowStr<'a> {
        if let Some(reference) = text.strip_prefix(EXAMPLE_PREFIX) {
            // `example:<name>:<anything>` still refers to `<name>`
            let name = reference.split(':').next().unwrap_or("");
            if let Some(content) = self.examples.rendered(name) {
                return content.to_string().into();
            }
            debug!(example = name, "no example for inline reference");
        }
        format!("<code class=\"inline-code\">{}</code>", escape_html(text)).into()
    }
}

impl<'a, 'l, I, L> Iterator for ReadmeEvents<'a, 'l, I, L>
where
    I: Iterator<Item = Event<'a>>,
    L: ExampleLookup + ?Sized,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.inner.next()?;

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let fence = match kind {
                        CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                            Some(info.to_string())
                        }
                        _ => None,
                    };
                    self.code_block = Some(CodeBlock {
                        fence,
                        buffer: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    let Some(block) = self.code_block.take() else {
                        continue;
                    };
                    let html = highlight::render_code_block(&block.buffer, block.fence.as_deref());
                    return Some(Event::Html(html.into()));
                }
                Event::Text(text) if self.code_block.is_some() => {
                    if let Some(block) = self.code_block.as_mut() {
                        block.buffer.push_str(&text);
                    }
                }
                Event::Code(text) => return Some(Event::InlineHtml(self.code_span(&text))),
                other => return Some(other),
            }
        }
    }
}
