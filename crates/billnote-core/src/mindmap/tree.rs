//! Markdown to mind-map tree.
//!
//! Headings nest by level. List items sit below every heading level and nest
//! by list depth. Paragraphs, code blocks, tables and HTML blocks become leaf
//! nodes under whatever heading or item is open. Node content is an HTML
//! fragment with inline markup preserved.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

use super::entities::strip_html;

/// List items open at this level plus their list depth.
const LIST_BASE_LEVEL: usize = 6;

/// One node of the mind map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindNode {
    /// HTML fragment shown for the node
    pub content: String,
    #[serde(default)]
    pub children: Vec<MindNode>,
}

impl MindNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            children: Vec::new(),
        }
    }

    /// Node text with tags removed and entities decoded.
    pub fn plain_text(&self) -> String {
        strip_html(&self.content)
    }

    /// Number of nodes in this subtree, itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.children.is_empty()
    }
}

struct OpenNode {
    level: usize,
    node: MindNode,
}

/// Block whose inline content is being collected into a new leaf.
enum Leaf {
    Text(String),
    Code { class: String, code: String },
}

struct TreeBuilder {
    stack: Vec<OpenNode>,
    leaf: Option<Leaf>,
    list_depth: usize,
    /// Open images; their text lands inside an `alt` attribute.
    image_depth: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![OpenNode {
                level: 0,
                node: MindNode::default(),
            }],
            leaf: None,
            list_depth: 0,
            image_depth: 0,
        }
    }

    /// Closes every open node at `level` or deeper.
    fn close_to(&mut self, level: usize) {
        while self.stack.len() > 1 && self.stack.last().is_some_and(|open| open.level >= level) {
            if let Some(open) = self.stack.pop() {
                if let Some(parent) = self.stack.last_mut() {
                    parent.node.children.push(open.node);
                }
            }
        }
    }

    fn open(&mut self, level: usize) {
        self.close_to(level);
        self.stack.push(OpenNode {
            level,
            node: MindNode::default(),
        });
    }

    fn top(&mut self) -> &mut MindNode {
        let last = self.stack.len() - 1;
        &mut self.stack[last].node
    }

    /// Whether the innermost open node is a list item still without text.
    fn item_awaits_content(&self) -> bool {
        self.stack.last().is_some_and(|open| {
            open.level > LIST_BASE_LEVEL
                && open.node.content.is_empty()
                && open.node.children.is_empty()
        })
    }

    fn begin_leaf(&mut self) {
        if !self.item_awaits_content() {
            self.leaf = Some(Leaf::Text(String::new()));
        }
    }

    fn finish_leaf(&mut self) {
        let content = match self.leaf.take() {
            Some(Leaf::Text(html)) => html.trim().to_string(),
            Some(Leaf::Code { class, code }) => {
                let code = code.trim_end_matches('\n');
                if code.is_empty() {
                    return;
                }
                format!("<pre><code{class}>{code}</code></pre>")
            }
            None => return,
        };
        if !content.is_empty() {
            self.top().children.push(MindNode::new(content));
        }
    }

    fn push_inline(&mut self, html: &str) {
        match &mut self.leaf {
            Some(Leaf::Text(buffer) | Leaf::Code { code: buffer, .. }) => buffer.push_str(html),
            None => {
                if self.stack.len() > 1 {
                    self.top().content.push_str(html);
                }
            }
        }
    }

    /// Inline markup, dropped while inside an image's alt text.
    fn push_markup(&mut self, html: &str) {
        if self.image_depth == 0 {
            self.push_inline(html);
        }
    }

    fn push_text(&mut self, text: &str) {
        let escaped = if self.image_depth > 0 {
            escape_attr(text)
        } else {
            escape_text(text)
        };
        self.push_inline(&escaped);
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.finish_leaf();
                self.list_depth = 0;
                self.open(heading_level(level));
            }
            Tag::List(_) => {
                self.finish_leaf();
                self.list_depth += 1;
            }
            Tag::Item => self.open(LIST_BASE_LEVEL + self.list_depth.max(1)),
            Tag::Paragraph | Tag::HtmlBlock | Tag::Table(_) | Tag::BlockQuote(_) => {
                if self.leaf.is_none() {
                    self.begin_leaf();
                }
            }
            Tag::CodeBlock(kind) => {
                self.finish_leaf();
                let class = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.trim().is_empty() => {
                        format!(" class=\"language-{}\"", escape_text(lang.trim()))
                    }
                    _ => String::new(),
                };
                self.leaf = Some(Leaf::Code {
                    class,
                    code: String::new(),
                });
            }
            Tag::Emphasis => self.push_markup("<em>"),
            Tag::Strong => self.push_markup("<strong>"),
            Tag::Strikethrough => self.push_markup("<del>"),
            Tag::Link { dest_url, .. } => {
                self.push_markup(&format!("<a href=\"{}\">", escape_attr(&dest_url)));
            }
            Tag::Image { dest_url, .. } => {
                self.push_markup(&format!("<img src=\"{}\" alt=\"", escape_attr(&dest_url)));
                self.image_depth += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {}
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            TagEnd::Item => {
                self.finish_leaf();
                self.close_to(LIST_BASE_LEVEL + self.list_depth.max(1));
            }
            TagEnd::Paragraph
            | TagEnd::HtmlBlock
            | TagEnd::Table
            | TagEnd::BlockQuote(_)
            | TagEnd::CodeBlock => self.finish_leaf(),
            TagEnd::TableCell => self.push_inline(" "),
            TagEnd::TableHead | TagEnd::TableRow => self.push_inline("<br>"),
            TagEnd::Emphasis => self.push_markup("</em>"),
            TagEnd::Strong => self.push_markup("</strong>"),
            TagEnd::Strikethrough => self.push_markup("</del>"),
            TagEnd::Link => self.push_markup("</a>"),
            TagEnd::Image => {
                self.image_depth = self.image_depth.saturating_sub(1);
                self.push_markup("\">");
            }
            _ => {}
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) if self.image_depth > 0 => self.push_text(&code),
            Event::Code(code) => self.push_inline(&format!("<code>{}</code>", escape_text(&code))),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.push_text(&math),
            Event::InlineHtml(html) if self.image_depth > 0 => self.push_text(&html),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.push_inline(" "),
            Event::HardBreak => self.push_markup("<br>"),
            Event::TaskListMarker(checked) => {
                self.push_inline(if checked { "[x] " } else { "[ ] " });
            }
            Event::Rule | Event::FootnoteReference(_) => {}
        }
    }

    fn finish(mut self) -> MindNode {
        self.finish_leaf();
        self.close_to(1);
        let mut root = self.stack.pop().map(|open| open.node).unwrap_or_default();
        trim_content(&mut root);
        if root.content.is_empty() && root.children.len() == 1 {
            root = root.children.remove(0);
        }
        root
    }
}

fn trim_content(node: &mut MindNode) {
    let trimmed = node.content.trim();
    if trimmed.len() != node.content.len() {
        node.content = trimmed.to_string();
    }
    for child in &mut node.children {
        trim_content(child);
    }
}

const fn heading_level(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Escapes `&`, `<` and `>`; everything else, non-ASCII included, is kept.
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            ch => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Parses markdown into a mind-map tree.
///
/// When the document has exactly one top-level node, that node becomes the
/// root.
pub fn transform(markdown: &str) -> MindNode {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, options) {
        builder.event(event);
    }
    builder.finish()
}
