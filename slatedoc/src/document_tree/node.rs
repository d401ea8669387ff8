//! Node kinds of the document tree
//!
//! The tree is owned by whoever built it; the renderer only walks it
//! depth-first through shared references.

use crate::escape::escape_html;
use std::collections::BTreeMap;

/// A single node of the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A heading with level (1 = h1, 2 = h2, etc.) and inline children
    Heading {
        /// Heading level
        level: u8,
        /// Inline content of the heading
        children: Vec<Node>,
    },

    /// A paragraph of inline content
    Paragraph(Vec<Node>),

    /// A block quote containing other blocks
    Quote(Vec<Node>),

    /// A fenced or indented code block
    BlockCode {
        /// Language tag from the fence info string
        language: Option<String>,
        /// Raw code content
        content: String,
    },

    /// An ordered or unordered list
    List {
        /// Starting number for ordered lists, None for unordered lists
        start: Option<u64>,
        /// Whether any item is separated by blank lines or holds several blocks
        loose: bool,
        /// List items
        children: Vec<Node>,
    },

    /// A list item, which may contain multiple blocks
    ListItem(Vec<Node>),

    /// A pipe table
    Table {
        /// Header row, when the table declares one
        header: Option<TableRow>,
        /// Body rows
        rows: Vec<TableRow>,
    },

    /// A horizontal rule
    ThematicBreak,

    /// Raw HTML block, passed through unmodified
    HtmlBlock(String),

    /// Strong emphasis
    Strong(Vec<Node>),

    /// Emphasis
    Emphasis(Vec<Node>),

    /// Strikethrough
    Strikethrough(Vec<Node>),

    /// Inline code span
    InlineCode(String),

    /// An inline or reference link
    Link {
        /// Link destination as written
        target: String,
        /// Optional title attribute
        title: Option<String>,
        /// Link text
        children: Vec<Node>,
    },

    /// An autolink (`<https://...>` or `<user@example.com>`)
    AutoLink {
        /// Link destination as written
        target: String,
        /// Whether the destination is an email address
        mailto: bool,
        /// Link text
        children: Vec<Node>,
    },

    /// An image
    Image {
        /// Image source URL
        src: String,
        /// Optional title attribute
        title: Option<String>,
        /// Alt text content
        children: Vec<Node>,
    },

    /// Plain text
    RawText(String),

    /// Inline raw HTML
    HtmlSpan(String),

    /// A soft (newline) or hard (`<br>`) line break
    LineBreak {
        /// True for a soft break
        soft: bool,
    },
}

/// Horizontal alignment of a single table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellAlign {
    /// No explicit alignment; rendered left-aligned
    #[default]
    Unset,
    /// Centered (`:---:`)
    Center,
    /// Right-aligned (`---:`)
    Right,
}

impl CellAlign {
    /// CSS `text-align` value for this alignment
    pub fn css_value(self) -> &'static str {
        match self {
            CellAlign::Unset => "left",
            CellAlign::Center => "center",
            CellAlign::Right => "right",
        }
    }
}

impl From<pulldown_cmark::Alignment> for CellAlign {
    fn from(align: pulldown_cmark::Alignment) -> Self {
        match align {
            pulldown_cmark::Alignment::None | pulldown_cmark::Alignment::Left => CellAlign::Unset,
            pulldown_cmark::Alignment::Center => CellAlign::Center,
            pulldown_cmark::Alignment::Right => CellAlign::Right,
        }
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    /// Cells in column order
    pub cells: Vec<TableCell>,
}

/// A table cell carrying its own alignment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    /// Alignment copied from the column when the table was built
    pub align: CellAlign,
    /// Inline content of the cell
    pub children: Vec<Node>,
}

/// A link reference definition (`[label]: dest "title"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefinition {
    /// Destination URL
    pub dest: String,
    /// Optional title
    pub title: Option<String>,
}

/// Root of a parsed document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Top-level blocks in source order
    pub children: Vec<Node>,
    /// Link reference definitions collected by the parser, keyed by label
    pub footnotes: BTreeMap<String, LinkDefinition>,
}

/// How far [`Node::project_text`] descends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextScope {
    /// Only direct `RawText` children contribute
    Direct,
    /// Leaf content of every descendant contributes
    Deep,
}

impl Node {
    /// Child nodes of a container node; empty for leaves and tables
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading { children, .. }
            | Node::List { children, .. }
            | Node::Link { children, .. }
            | Node::AutoLink { children, .. }
            | Node::Image { children, .. } => children,
            Node::Paragraph(children)
            | Node::Quote(children)
            | Node::ListItem(children)
            | Node::Strong(children)
            | Node::Emphasis(children)
            | Node::Strikethrough(children) => children,
            Node::BlockCode { .. }
            | Node::Table { .. }
            | Node::ThematicBreak
            | Node::HtmlBlock(_)
            | Node::InlineCode(_)
            | Node::RawText(_)
            | Node::HtmlSpan(_)
            | Node::LineBreak { .. } => &[],
        }
    }

    /// Textual content carried by a leaf node
    fn leaf_content(&self) -> Option<&str> {
        match self {
            Node::BlockCode { content, .. } => Some(content.as_str()),
            Node::HtmlBlock(content)
            | Node::InlineCode(content)
            | Node::RawText(content)
            | Node::HtmlSpan(content) => Some(content.as_str()),
            _ => None,
        }
    }

    /// Whether this node is inline (span-level) content
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Node::Strong(_)
                | Node::Emphasis(_)
                | Node::Strikethrough(_)
                | Node::InlineCode(_)
                | Node::Link { .. }
                | Node::AutoLink { .. }
                | Node::Image { .. }
                | Node::RawText(_)
                | Node::HtmlSpan(_)
                | Node::LineBreak { .. }
        )
    }

    /// Whether this node is a paragraph
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Node::Paragraph(_))
    }

    /// Plain-text projection of this node, HTML-escaped, with all markup dropped
    pub fn project_text(&self, scope: TextScope) -> String {
        let mut out = String::new();
        match scope {
            TextScope::Direct => {
                for child in self.children() {
                    if let Node::RawText(content) = child {
                        out.push_str(&escape_html(content));
                    }
                }
            }
            TextScope::Deep => self.push_deep_text(&mut out),
        }
        out
    }

    fn push_deep_text(&self, out: &mut String) {
        if let Some(content) = self.leaf_content() {
            out.push_str(&escape_html(content));
            return;
        }

        if let Node::Table { header, rows } = self {
            for cell in header.iter().chain(rows).flat_map(|row| &row.cells) {
                for child in &cell.children {
                    child.push_deep_text(out);
                }
            }
            return;
        }

        for child in self.children() {
            child.push_deep_text(out);
        }
    }
}
