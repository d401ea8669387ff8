//! Markdown event stream to document tree
//!
//! Folds pulldown-cmark's flat event stream into nested [`Node`]s. Each open
//! tag pushes a frame; the matching end event pops it and attaches the
//! finished node to its parent.

use super::error::TreeError;
use super::node::{CellAlign, Document, LinkDefinition, Node, TableCell, TableRow};
use crate::escape::encode_ampersands;
use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};

/// Parser extensions the renderer has node kinds for
pub const PARSER_OPTIONS: Options = Options::ENABLE_TABLES.union(Options::ENABLE_STRIKETHROUGH);

/// Deepest nesting of open nodes accepted below the document root
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parse markdown text and build its document tree
///
/// Link reference definitions found by the parser are collected into
/// [`Document::footnotes`].
pub fn build_document(markdown: &str) -> Result<Document, TreeError> {
    let parser = Parser::new_ext(markdown, PARSER_OPTIONS);

    let footnotes = parser
        .reference_definitions()
        .iter()
        .map(|(label, def)| {
            (
                label.to_string(),
                LinkDefinition {
                    dest: def.dest.to_string(),
                    title: def.title.as_ref().map(|t| t.to_string()),
                },
            )
        })
        .collect();

    let mut document = DocumentBuilder::new().build(parser)?;
    document.footnotes = footnotes;
    Ok(document)
}

/// Builder state for converting markdown events to a tree
pub struct DocumentBuilder {
    /// Open frames, innermost last; the bottom frame is always the document
    stack: Vec<Frame>,
}

/// A node under construction
struct Frame {
    kind: FrameKind,
    children: Vec<Node>,
}

enum FrameKind {
    Document,
    Paragraph,
    Heading(u8),
    Quote,
    BlockCode {
        language: Option<String>,
        content: String,
    },
    HtmlBlock(String),
    List {
        start: Option<u64>,
        loose: bool,
    },
    Item {
        /// Set when the parser emitted an explicit paragraph inside the item
        has_paragraph: bool,
    },
    Table {
        alignments: Vec<CellAlign>,
        header: Option<TableRow>,
        rows: Vec<TableRow>,
    },
    TableHead(Vec<TableCell>),
    TableRow(Vec<TableCell>),
    TableCell,
    Strong,
    Emphasis,
    Strikethrough,
    Link {
        target: String,
        title: Option<String>,
    },
    AutoLink {
        target: String,
        mailto: bool,
    },
    Image {
        src: String,
        title: Option<String>,
    },
}

impl FrameKind {
    fn name(&self) -> &'static str {
        match self {
            FrameKind::Document => "Document",
            FrameKind::Paragraph => "Paragraph",
            FrameKind::Heading(_) => "Heading",
            FrameKind::Quote => "Quote",
            FrameKind::BlockCode { .. } => "BlockCode",
            FrameKind::HtmlBlock(_) => "HtmlBlock",
            FrameKind::List { .. } => "List",
            FrameKind::Item { .. } => "ListItem",
            FrameKind::Table { .. } => "Table",
            FrameKind::TableHead(_) => "TableHead",
            FrameKind::TableRow(_) => "TableRow",
            FrameKind::TableCell => "TableCell",
            FrameKind::Strong => "Strong",
            FrameKind::Emphasis => "Emphasis",
            FrameKind::Strikethrough => "Strikethrough",
            FrameKind::Link { .. } => "Link",
            FrameKind::AutoLink { .. } => "AutoLink",
            FrameKind::Image { .. } => "Image",
        }
    }

    /// Whether `end` is the closing event for this frame
    fn is_closed_by(&self, end: &TagEnd) -> bool {
        matches!(
            (self, end),
            (FrameKind::Paragraph, TagEnd::Paragraph)
                | (FrameKind::Heading(_), TagEnd::Heading(_))
                | (FrameKind::Quote, TagEnd::BlockQuote(_))
                | (FrameKind::BlockCode { .. }, TagEnd::CodeBlock)
                | (FrameKind::HtmlBlock(_), TagEnd::HtmlBlock)
                | (FrameKind::List { .. }, TagEnd::List(_))
                | (FrameKind::Item { .. }, TagEnd::Item)
                | (FrameKind::Table { .. }, TagEnd::Table)
                | (FrameKind::TableHead(_), TagEnd::TableHead)
                | (FrameKind::TableRow(_), TagEnd::TableRow)
                | (FrameKind::TableCell, TagEnd::TableCell)
                | (FrameKind::Strong, TagEnd::Strong)
                | (FrameKind::Emphasis, TagEnd::Emphasis)
                | (FrameKind::Strikethrough, TagEnd::Strikethrough)
                | (FrameKind::Link { .. }, TagEnd::Link)
                | (FrameKind::AutoLink { .. }, TagEnd::Link)
                | (FrameKind::Image { .. }, TagEnd::Image)
        )
    }
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

impl DocumentBuilder {
    /// Create a new builder
    ///
    /// # Returns
    /// * `DocumentBuilder` - A builder holding only the empty document frame
    pub fn new() -> Self {
        Self {
            stack: vec![Frame::new(FrameKind::Document)],
        }
    }

    /// Consume an event stream and return the finished document
    ///
    /// # Parameters
    /// * `events` - Events from a pulldown-cmark parser
    ///
    /// # Returns
    /// * `Ok(Document)` - The document tree (with no footnotes attached)
    /// * `Err(TreeError)` - An event has no node kind, or the stream is unbalanced
    pub fn build<'a, I>(mut self, events: I) -> Result<Document, TreeError>
    where
        I: IntoIterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event)?;
        }

        if self.stack.len() != 1 {
            let open = self.stack.last().map_or("Document", |f| f.kind.name());
            return Err(TreeError::Unbalanced {
                expected: open.to_string(),
                found: "end of input".to_string(),
            });
        }

        let root = self.stack.pop().map(|f| f.children).unwrap_or_default();
        log::debug!("Built document tree with {} top-level blocks", root.len());

        Ok(Document {
            children: root,
            ..Document::default()
        })
    }

    /// Process a single markdown event
    fn process_event(&mut self, event: Event<'_>) -> Result<(), TreeError> {
        match event {
            Event::Start(tag) => self.handle_start_tag(tag)?,
            Event::End(tag_end) => self.handle_end_tag(tag_end)?,
            Event::Text(text) => self.handle_text(&text),
            Event::Code(code) => self.push_node(Node::InlineCode(code.to_string())),
            Event::Html(html) => self.handle_html(&html),
            Event::InlineHtml(html) => self.push_node(Node::HtmlSpan(html.to_string())),
            Event::SoftBreak => self.push_node(Node::LineBreak { soft: true }),
            Event::HardBreak => self.push_node(Node::LineBreak { soft: false }),
            Event::Rule => self.push_node(Node::ThematicBreak),
            Event::FootnoteReference(_) => return Err(TreeError::unsupported("FootnoteReference")),
            Event::TaskListMarker(_) => return Err(TreeError::unsupported("TaskListMarker")),
            Event::InlineMath(_) => return Err(TreeError::unsupported("InlineMath")),
            Event::DisplayMath(_) => return Err(TreeError::unsupported("DisplayMath")),
        }
        Ok(())
    }

    /// Handle opening tags
    fn handle_start_tag(&mut self, tag: Tag<'_>) -> Result<(), TreeError> {
        let kind = match tag {
            Tag::Paragraph => FrameKind::Paragraph,
            Tag::Heading { level, .. } => FrameKind::Heading(level as u8),
            Tag::BlockQuote(_) => FrameKind::Quote,
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                FrameKind::BlockCode {
                    language,
                    content: String::new(),
                }
            }
            Tag::HtmlBlock => FrameKind::HtmlBlock(String::new()),
            Tag::List(start) => FrameKind::List {
                start,
                loose: false,
            },
            Tag::Item => FrameKind::Item {
                has_paragraph: false,
            },
            Tag::Table(alignments) => FrameKind::Table {
                alignments: alignments.into_iter().map(CellAlign::from).collect(),
                header: None,
                rows: Vec::new(),
            },
            Tag::TableHead => FrameKind::TableHead(Vec::new()),
            Tag::TableRow => FrameKind::TableRow(Vec::new()),
            Tag::TableCell => FrameKind::TableCell,
            Tag::Emphasis => FrameKind::Emphasis,
            Tag::Strong => FrameKind::Strong,
            Tag::Strikethrough => FrameKind::Strikethrough,
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => match link_type {
                LinkType::Autolink => FrameKind::AutoLink {
                    target: encode_ampersands(&dest_url).into_owned(),
                    mailto: false,
                },
                LinkType::Email => FrameKind::AutoLink {
                    target: encode_ampersands(&dest_url).into_owned(),
                    mailto: true,
                },
                LinkType::WikiLink { .. } => return Err(TreeError::unsupported("WikiLink")),
                _ => FrameKind::Link {
                    target: encode_ampersands(&dest_url).into_owned(),
                    title: non_empty(&title),
                },
            },
            Tag::Image {
                dest_url, title, ..
            } => FrameKind::Image {
                src: encode_ampersands(&dest_url).into_owned(),
                title: non_empty(&title),
            },
            Tag::FootnoteDefinition(_) => return Err(TreeError::unsupported("FootnoteDefinition")),
            Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {
                return Err(TreeError::unsupported("DefinitionList"))
            }
            Tag::Superscript => return Err(TreeError::unsupported("Superscript")),
            Tag::Subscript => return Err(TreeError::unsupported("Subscript")),
            Tag::MetadataBlock(_) => return Err(TreeError::unsupported("MetadataBlock")),
        };

        if self.stack.len() > MAX_NESTING_DEPTH {
            return Err(TreeError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }

        self.stack.push(Frame::new(kind));
        Ok(())
    }

    /// Handle closing tags
    fn handle_end_tag(&mut self, tag_end: TagEnd) -> Result<(), TreeError> {
        let frame = self.pop_frame(&tag_end)?;
        let children = frame.children;

        let node = match frame.kind {
            FrameKind::Paragraph => {
                if let Some(FrameKind::Item { has_paragraph }) = self.top_kind_mut() {
                    *has_paragraph = true;
                }
                Node::Paragraph(children)
            }
            FrameKind::Heading(level) => Node::Heading { level, children },
            FrameKind::Quote => Node::Quote(children),
            FrameKind::BlockCode { language, content } => Node::BlockCode { language, content },
            FrameKind::HtmlBlock(content) => {
                Node::HtmlBlock(content.trim_end_matches('\n').to_string())
            }
            FrameKind::List { start, loose } => Node::List {
                start,
                loose,
                children,
            },
            FrameKind::Item { has_paragraph } => {
                if has_paragraph {
                    if let Some(FrameKind::List { loose, .. }) = self.top_kind_mut() {
                        *loose = true;
                    }
                }
                Node::ListItem(wrap_inline_runs(children))
            }
            FrameKind::Table { header, rows, .. } => Node::Table { header, rows },
            FrameKind::TableHead(cells) => {
                if let Some(FrameKind::Table { header, .. }) = self.top_kind_mut() {
                    *header = Some(TableRow { cells });
                }
                return Ok(());
            }
            FrameKind::TableRow(cells) => {
                if let Some(FrameKind::Table { rows, .. }) = self.top_kind_mut() {
                    rows.push(TableRow { cells });
                }
                return Ok(());
            }
            FrameKind::TableCell => {
                self.finish_table_cell(children);
                return Ok(());
            }
            FrameKind::Strong => Node::Strong(children),
            FrameKind::Emphasis => Node::Emphasis(children),
            FrameKind::Strikethrough => Node::Strikethrough(children),
            FrameKind::Link { target, title } => Node::Link {
                target,
                title,
                children,
            },
            FrameKind::AutoLink { target, mailto } => Node::AutoLink {
                target,
                mailto,
                children,
            },
            FrameKind::Image { src, title } => Node::Image {
                src,
                title,
                children,
            },
            FrameKind::Document => {
                return Err(TreeError::Unbalanced {
                    expected: "Document".to_string(),
                    found: format!("{tag_end:?}"),
                })
            }
        };

        self.push_node(node);
        Ok(())
    }

    /// Pop the innermost frame, checking it is the one `tag_end` closes
    fn pop_frame(&mut self, tag_end: &TagEnd) -> Result<Frame, TreeError> {
        let matches = self
            .stack
            .last()
            .is_some_and(|frame| frame.kind.is_closed_by(tag_end));

        if self.stack.len() < 2 || !matches {
            let expected = self.stack.last().map_or("Document", |f| f.kind.name());
            return Err(TreeError::Unbalanced {
                expected: expected.to_string(),
                found: format!("{tag_end:?}"),
            });
        }

        self.stack.pop().ok_or_else(|| TreeError::Unbalanced {
            expected: "Document".to_string(),
            found: format!("{tag_end:?}"),
        })
    }

    /// Attach a finished cell to the open row, aligning it by column
    fn finish_table_cell(&mut self, children: Vec<Node>) {
        let column = match self.top_kind_mut() {
            Some(FrameKind::TableHead(cells) | FrameKind::TableRow(cells)) => cells.len(),
            _ => return,
        };
        let align = self.column_alignment(column);

        if let Some(FrameKind::TableHead(cells) | FrameKind::TableRow(cells)) = self.top_kind_mut()
        {
            cells.push(TableCell { align, children });
        }
    }

    /// Alignment of `column` in the innermost open table
    fn column_alignment(&self, column: usize) -> CellAlign {
        self.stack
            .iter()
            .rev()
            .find_map(|frame| match &frame.kind {
                FrameKind::Table { alignments, .. } => Some(alignments.get(column).copied()),
                _ => None,
            })
            .flatten()
            .unwrap_or_default()
    }

    /// Handle text content
    fn handle_text(&mut self, text: &str) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };

        match &mut frame.kind {
            FrameKind::BlockCode { content, .. } | FrameKind::HtmlBlock(content) => {
                content.push_str(text);
            }
            _ => {
                // Adjacent text events are merged into a single run
                let text = encode_ampersands(text);
                if let Some(Node::RawText(previous)) = frame.children.last_mut() {
                    previous.push_str(&text);
                } else {
                    frame.children.push(Node::RawText(text.into_owned()));
                }
            }
        }
    }

    /// Handle block-level HTML
    fn handle_html(&mut self, html: &str) {
        if let Some(FrameKind::HtmlBlock(content)) = self.top_kind_mut() {
            content.push_str(html);
        } else {
            self.push_node(Node::HtmlBlock(html.trim_end_matches('\n').to_string()));
        }
    }

    fn push_node(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn top_kind_mut(&mut self) -> Option<&mut FrameKind> {
        self.stack.last_mut().map(|frame| &mut frame.kind)
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap runs of inline content in paragraphs
///
/// Tight list items carry their text without paragraph events; wrapping it
/// gives every item block-level children.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut blocks = Vec::with_capacity(children.len());
    let mut run = Vec::new();

    for child in children {
        if child.is_inline() {
            run.push(child);
            continue;
        }
        if !run.is_empty() {
            blocks.push(Node::Paragraph(std::mem::take(&mut run)));
        }
        blocks.push(child);
    }

    if !run.is_empty() {
        blocks.push(Node::Paragraph(run));
    }

    blocks
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(encode_ampersands(s).into_owned())
    }
}
