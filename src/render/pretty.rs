//! HTML pretty printer for rendered examples.
//!
//! Block elements go on their own lines, indented by nesting depth.
//! Inline elements and text are word-wrapped at a soft column limit.
//! `pre`, `textarea`, `script` and `style` bodies are copied verbatim.

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "button", "cite", "code", "data", "dfn", "em", "i", "img",
    "input", "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup",
    "svg", "time", "u", "var", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["pre", "textarea", "script", "style"];

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Open {
        name: String,
        raw: &'a str,
        self_closing: bool,
    },
    Close {
        name: String,
        raw: &'a str,
    },
    Text(&'a str),
    /// Comments and `<!doctype>`-style declarations.
    Markup(&'a str),
    /// A raw text element including its tags.
    Verbatim(&'a str),
}

/// Reformats HTML fragments with fixed indentation and a soft wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyPrinter {
    indent: usize,
    max_width: usize,
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self {
            indent: 2,
            max_width: 80,
        }
    }
}

impl PrettyPrinter {
    pub fn new(indent: usize, max_width: usize) -> Self {
        Self { indent, max_width }
    }

    /// Pretty-print `html`. Tag and attribute text is never altered.
    pub fn print(&self, html: &str) -> String {
        let mut state = PrintState::new(*self);
        for token in tokenize(html) {
            match token {
                Token::Open {
                    name,
                    raw,
                    self_closing,
                } => {
                    if is_inline(&name) {
                        state.push_atom(raw);
                    } else if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                        state.flush_inline();
                        state.push_line(raw);
                    } else {
                        state.open_block(raw);
                    }
                }
                Token::Close { name, raw } => {
                    if is_inline(&name) {
                        state.push_atom(raw);
                    } else {
                        state.close_block(raw);
                    }
                }
                Token::Text(text) => state.push_text(text),
                Token::Markup(raw) | Token::Verbatim(raw) => {
                    state.flush_inline();
                    state.push_line(raw);
                }
            }
        }
        state.finish()
    }
}

fn is_inline(name: &str) -> bool {
    INLINE_ELEMENTS.contains(&name)
}

struct PrintState {
    printer: PrettyPrinter,
    lines: Vec<String>,
    words: Vec<String>,
    pending_space: bool,
    depth: usize,
    /// Index of the last line if it is a block opener with nothing after it yet.
    open_line: Option<usize>,
}

impl PrintState {
    fn new(printer: PrettyPrinter) -> Self {
        Self {
            printer,
            lines: Vec::new(),
            words: Vec::new(),
            pending_space: false,
            depth: 0,
            open_line: None,
        }
    }

    fn indentation(&self) -> String {
        " ".repeat(self.depth * self.printer.indent)
    }

    fn push_line(&mut self, content: &str) {
        let line = format!("{}{}", self.indentation(), content);
        self.lines.push(line);
        self.open_line = None;
    }

    fn open_block(&mut self, raw: &str) {
        self.flush_inline();
        self.push_line(raw);
        self.open_line = Some(self.lines.len() - 1);
        self.depth += 1;
    }

    fn close_block(&mut self, raw: &str) {
        self.depth = self.depth.saturating_sub(1);

        // keep short elements like `<p>text</p>` on one line
        if let Some(index) = self.open_line {
            if index + 1 == self.lines.len() {
                let candidate = format!("{}{}{}", self.lines[index], self.words.join(" "), raw);
                if candidate.len() <= self.printer.max_width {
                    self.lines[index] = candidate;
                    self.words.clear();
                    self.pending_space = false;
                    self.open_line = None;
                    return;
                }
            }
        }

        self.depth += 1;
        self.flush_inline();
        self.depth -= 1;
        self.push_line(raw);
    }

    fn push_text(&mut self, text: &str) {
        if text.starts_with(char::is_whitespace) {
            self.pending_space = true;
        }
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 {
                self.pending_space = true;
            }
            self.push_atom(word);
        }
        if text.ends_with(char::is_whitespace) {
            self.pending_space = true;
        }
    }

    /// Append a word or inline tag, gluing it to the previous one unless
    /// whitespace separated them in the source.
    fn push_atom(&mut self, atom: &str) {
        match self.words.last_mut() {
            Some(last) if !self.pending_space => last.push_str(atom),
            _ => self.words.push(atom.to_string()),
        }
        self.pending_space = false;
    }

    fn flush_inline(&mut self) {
        self.pending_space = false;
        if self.words.is_empty() {
            return;
        }
        let indentation = self.indentation();
        let mut line = String::new();
        for word in std::mem::take(&mut self.words) {
            if !line.is_empty()
                && indentation.len() + line.len() + 1 + word.len() > self.printer.max_width
            {
                self.lines.push(format!("{}{}", indentation, line));
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        self.lines.push(format!("{}{}", indentation, line));
        self.open_line = None;
    }

    fn finish(mut self) -> String {
        self.flush_inline();
        self.lines.join("\n")
    }
}

fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];
        if !rest.starts_with('<') {
            let end = rest.find('<').unwrap_or(rest.len());
            tokens.push(Token::Text(&rest[..end]));
            pos += end;
            continue;
        }

        if rest.starts_with("<!--") {
            let end = rest.find("-->").map(|i| i + 3).unwrap_or(rest.len());
            tokens.push(Token::Markup(&rest[..end]));
            pos += end;
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
            tokens.push(Token::Markup(&rest[..end]));
            pos += end;
            continue;
        }

        let Some(end) = tag_end(rest) else {
            // a stray `<` is text
            tokens.push(Token::Text(&rest[..1]));
            pos += 1;
            continue;
        };
        let raw = &rest[..end];
        let name = tag_name(raw);

        if raw.starts_with("</") {
            tokens.push(Token::Close { name, raw });
            pos += end;
            continue;
        }

        let self_closing = raw.ends_with("/>");
        if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            let body = &rest[end..];
            let closing = format!("</{}", name);
            let stop = match body.to_ascii_lowercase().find(&closing) {
                Some(at) => {
                    let after = &body[at..];
                    at + after.find('>').map(|i| i + 1).unwrap_or(after.len())
                }
                None => body.len(),
            };
            tokens.push(Token::Verbatim(&rest[..end + stop]));
            pos += end + stop;
            continue;
        }

        tokens.push(Token::Open {
            name,
            raw,
            self_closing,
        });
        pos += end;
    }
    tokens
}

/// Byte length of the tag at the start of `rest`, honoring quoted
/// attribute values. `None` if `rest` does not start a tag.
fn tag_end(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let name_start = if bytes.get(1) == Some(&b'/') { 2 } else { 1 };
    if !bytes.get(name_start)?.is_ascii_alphabetic() {
        return None;
    }

    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(name_start) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i + 1),
            None => {}
        }
    }
    None
}

fn tag_name(raw: &str) -> String {
    raw.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase()
}
