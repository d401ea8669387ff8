//! Slate HTML renderer
//!
//! Walks a [`Document`] tree and emits HTML for the Slate theme. Each
//! renderer instance is one render session: it owns the navigation index
//! filled in by headings, the paragraph-suppression stack used for tight
//! lists, and the footnote table merged in from the document.

use crate::document_tree::{Document, LinkDefinition, Node, TableRow, TextScope};
use crate::escape::{escape_code, escape_html, escape_url};
use crate::navigation::{NavigationError, NavigationIndex};
use crate::page_chrome::PageChrome;
use itertools::Itertools;
use std::collections::BTreeMap;

/// Stateful renderer for a single document
#[derive(Debug)]
pub struct SlateRenderer {
    /// Whether paragraphs drop their `<p>` wrapper; base entry is always `false`
    suppress_ptag: Vec<bool>,
    navigation: NavigationIndex,
    footnotes: BTreeMap<String, LinkDefinition>,
    warnings: Vec<NavigationError>,
}

impl SlateRenderer {
    pub fn new() -> Self {
        Self {
            suppress_ptag: vec![false],
            navigation: NavigationIndex::new(),
            footnotes: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Headings indexed so far
    pub fn navigation(&self) -> &NavigationIndex {
        &self.navigation
    }

    /// Take the navigation index, leaving an empty one for the next session
    pub fn take_navigation(&mut self) -> NavigationIndex {
        std::mem::take(&mut self.navigation)
    }

    /// Link reference definitions merged from rendered documents
    pub fn footnotes(&self) -> &BTreeMap<String, LinkDefinition> {
        &self.footnotes
    }

    /// Non-fatal problems met while indexing headings
    pub fn warnings(&self) -> &[NavigationError] {
        &self.warnings
    }

    /// Render a whole document wrapped in page chrome
    ///
    /// Starts a new session: the navigation index and warnings left by a
    /// previous document are cleared. Returns an empty string when the
    /// document has no content.
    pub fn render_document(&mut self, document: &Document, chrome: &PageChrome) -> String {
        log::debug!(
            "Rendering document with {} top-level blocks",
            document.children.len()
        );
        self.navigation = NavigationIndex::new();
        self.warnings.clear();
        self.footnotes.extend(
            document
                .footnotes
                .iter()
                .map(|(label, def)| (label.clone(), def.clone())),
        );

        let inner = self.render_blocks(&document.children);
        if inner.is_empty() {
            return String::new();
        }

        let header = chrome.header(&self.navigation);
        let footer = chrome.footer();
        format!("{}\n{}\n{}\n", header, inner, footer)
    }

    /// Render a single node to HTML
    pub fn render(&mut self, node: &Node) -> String {
        match node {
            Node::Heading { level, children } => self.render_heading(node, *level, children),
            Node::Paragraph(children) => self.render_paragraph(children),
            Node::Quote(children) => self.render_quote(children),
            Node::BlockCode { language, content } => render_block_code(language, content),
            Node::List {
                start,
                loose,
                children,
            } => self.render_list(*start, *loose, children),
            Node::ListItem(children) => self.render_list_item(children),
            Node::Table { header, rows } => self.render_table(header.as_ref(), rows),
            Node::ThematicBreak => "<hr />".to_string(),
            Node::HtmlBlock(content) | Node::HtmlSpan(content) => content.clone(),
            Node::Strong(children) => format!("<strong>{}</strong>", self.render_inner(children)),
            Node::Emphasis(children) => format!("<em>{}</em>", self.render_inner(children)),
            Node::Strikethrough(children) => format!("<del>{}</del>", self.render_inner(children)),
            Node::InlineCode(content) => format!("<code>{}</code>", escape_code(content)),
            Node::Link {
                target,
                title,
                children,
            } => format!(
                "<a href=\"{}\"{}>{}</a>",
                escape_url(target),
                title_attr(title.as_deref()),
                self.render_inner(children)
            ),
            Node::AutoLink {
                target,
                mailto,
                children,
            } => {
                let href = if *mailto {
                    format!("mailto:{}", escape_url(target))
                } else {
                    escape_url(target)
                };
                format!("<a href=\"{}\">{}</a>", href, self.render_inner(children))
            }
            Node::Image { src, title, .. } => format!(
                "<img src=\"{}\" alt=\"{}\"{} />",
                escape_url(src),
                node.project_text(TextScope::Deep),
                title_attr(title.as_deref())
            ),
            Node::RawText(content) => escape_html(content),
            Node::LineBreak { soft: true } => "\n".to_string(),
            Node::LineBreak { soft: false } => "<br />\n".to_string(),
        }
    }

    /// Concatenate the renderings of `children`
    pub fn render_inner(&mut self, children: &[Node]) -> String {
        children.iter().map(|child| self.render(child)).collect()
    }

    /// Render block children, one per line
    fn render_blocks(&mut self, children: &[Node]) -> String {
        children.iter().map(|child| self.render(child)).join("\n")
    }

    /// Run `f` with `suppress` on top of the suppression stack
    fn with_suppression<F>(&mut self, suppress: bool, f: F) -> String
    where
        F: FnOnce(&mut Self) -> String,
    {
        self.suppress_ptag.push(suppress);
        let rendered = f(self);
        self.suppress_ptag.pop();
        rendered
    }

    fn is_suppressed(&self) -> bool {
        self.suppress_ptag.last().copied().unwrap_or(false)
    }

    fn render_heading(&mut self, node: &Node, level: u8, children: &[Node]) -> String {
        let inner = self.render_inner(children);
        let id = node
            .project_text(TextScope::Direct)
            .replace(' ', "-")
            .to_lowercase();
        self.index_heading(node, level, children);
        format!("<h{level} id=\"{id}\">{inner}</h{level}>")
    }

    /// Record H1/H2 headings in the navigation index
    ///
    /// An H2 whose content has several children is indexed by its second
    /// child, e.g. `## <marker> Label`; otherwise by its full text.
    fn index_heading(&mut self, node: &Node, level: u8, children: &[Node]) {
        match level {
            1 => self.navigation.push_topic(node.project_text(TextScope::Deep)),
            2 => {
                let label = match children.get(1) {
                    Some(second) => self.render(second),
                    None => node.project_text(TextScope::Deep),
                };
                let label = label.replace("<code>", "").replace("</code>", "");

                if let Err(err) = self.navigation.push_subtopic(label) {
                    log::warn!("Skipping navigation entry: {}", err);
                    self.warnings.push(err);
                }
            }
            _ => {}
        }
    }

    fn render_paragraph(&mut self, children: &[Node]) -> String {
        let inner = self.render_inner(children);
        if self.is_suppressed() {
            inner
        } else {
            format!("<p>{}</p>", inner)
        }
    }

    fn render_quote(&mut self, children: &[Node]) -> String {
        let inner = self.with_suppression(false, |r| r.render_blocks(children));
        if inner.is_empty() {
            "<blockquote>\n</blockquote>".to_string()
        } else {
            format!("<blockquote>\n{}\n</blockquote>", inner)
        }
    }

    fn render_list(&mut self, start: Option<u64>, loose: bool, children: &[Node]) -> String {
        let (tag, attr) = match start {
            Some(1) => ("ol", String::new()),
            Some(n) => ("ol", format!(" start=\"{}\"", n)),
            None => ("ul", String::new()),
        };
        let inner = self.with_suppression(!loose, |r| r.render_blocks(children));
        format!("<{tag}{attr}>\n{inner}\n</{tag}>")
    }

    fn render_list_item(&mut self, children: &[Node]) -> String {
        if children.is_empty() {
            return "<li></li>".to_string();
        }

        let inner = self.render_blocks(children);
        let suppressed = self.is_suppressed();
        let lead = if suppressed && children.first().is_some_and(Node::is_paragraph) {
            ""
        } else {
            "\n"
        };
        let trail = if suppressed && children.last().is_some_and(Node::is_paragraph) {
            ""
        } else {
            "\n"
        };
        format!("<li>{lead}{inner}{trail}</li>")
    }

    fn render_table(&mut self, header: Option<&TableRow>, rows: &[TableRow]) -> String {
        let head = match header {
            Some(row) => format!("<thead>\n{}</thead>\n", self.render_table_row(row, true)),
            None => String::new(),
        };
        let body: String = rows
            .iter()
            .map(|row| self.render_table_row(row, false))
            .collect();
        format!("<table>\n{}<tbody>\n{}</tbody>\n</table>", head, body)
    }

    fn render_table_row(&mut self, row: &TableRow, in_header: bool) -> String {
        let tag = if in_header { "th" } else { "td" };
        let mut output = String::from("<tr>\n");
        for cell in &row.cells {
            output.push_str(&format!(
                "<{tag} style=\"text-align: {}\">{}</{tag}>\n",
                cell.align.css_value(),
                self.render_inner(&cell.children)
            ));
        }
        output.push_str("</tr>\n");
        output
    }
}

impl Default for SlateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_block_code(language: &Option<String>, content: &str) -> String {
    let attr = match language {
        Some(lang) => format!(" class=\"language-{}\"", escape_html(lang)),
        None => String::new(),
    };
    format!("<pre><code{}>{}</code></pre>", attr, escape_code(content))
}

fn title_attr(title: Option<&str>) -> String {
    match title {
        Some(title) => format!(" title=\"{}\"", escape_html(title)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_tree::{build_document, CellAlign, TableCell};
    use crate::page_chrome::ChromeTemplate;
    use crate::render_config::RenderConfig;

    fn text(s: &str) -> Node {
        Node::RawText(s.to_string())
    }

    fn render_body(markdown: &str) -> (String, SlateRenderer) {
        let document = build_document(markdown).unwrap();
        let mut renderer = SlateRenderer::new();
        let body = renderer.render_blocks(&document.children);
        (body, renderer)
    }

    #[test]
    fn test_heading_id_and_index() {
        let (body, renderer) = render_body("# Foo Bar");

        assert_eq!(body, "<h1 id=\"foo-bar\">Foo Bar</h1>");
        let entries = renderer.navigation().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Foo Bar");
        assert!(entries[0].subtopics.is_empty());
    }

    #[test]
    fn test_heading_id_ignores_markup_children() {
        let (body, renderer) = render_body("# Create *new* user");

        assert_eq!(
            body,
            "<h1 id=\"create--user\">Create <em>new</em> user</h1>"
        );
        assert_eq!(renderer.navigation().entries()[0].title, "Create new user");
    }

    #[test]
    fn test_intro_scenario() {
        let (body, renderer) = render_body("# Intro\n\nHello **world**");

        assert_eq!(
            body,
            "<h1 id=\"intro\">Intro</h1>\n<p>Hello <strong>world</strong></p>"
        );
        let entries = renderer.navigation().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Intro");
    }

    #[test]
    fn test_h2_uses_second_child_without_code_tags() {
        let (_, renderer) = render_body("# Users\n\n## `GET`**List users**\n\n## Plain Title");

        let entry = &renderer.navigation().entries()[0];
        assert_eq!(
            entry.subtopics,
            vec!["<strong>List users</strong>", "Plain Title"]
        );
    }

    #[test]
    fn test_h2_second_child_code_tags_stripped() {
        let (_, renderer) = render_body("# Routes\n\n## Route `/users`");

        let entry = &renderer.navigation().entries()[0];
        assert_eq!(entry.subtopics, vec!["/users"]);
    }

    #[test]
    fn test_h2_before_h1_is_skipped() {
        let (body, renderer) = render_body("## Orphan\n\n# First\n\n## Child");

        assert!(body.starts_with("<h2 id=\"orphan\">Orphan</h2>"));
        let entries = renderer.navigation().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[0].subtopics, vec!["Child"]);
        assert_eq!(
            renderer.warnings(),
            &[NavigationError::Underflow {
                subtopic: "Orphan".to_string()
            }]
        );
    }

    #[test]
    fn test_h3_not_indexed() {
        let (body, renderer) = render_body("# Top\n\n### Deep");

        assert!(body.contains("<h3 id=\"deep\">Deep</h3>"));
        assert!(renderer.navigation().entries()[0].subtopics.is_empty());
    }

    #[test]
    fn test_tight_unordered_list() {
        let (body, _) = render_body("- one\n- two\n");
        assert_eq!(body, "<ul>\n<li>one</li>\n<li>two</li>\n</ul>");
    }

    #[test]
    fn test_loose_unordered_list() {
        let (body, _) = render_body("- one\n\n- two\n");
        assert_eq!(
            body,
            "<ul>\n<li>\n<p>one</p>\n</li>\n<li>\n<p>two</p>\n</li>\n</ul>"
        );
    }

    #[test]
    fn test_tight_ordered_list_with_start() {
        let (body, _) = render_body("3. three\n4. four\n");
        assert_eq!(body, "<ol start=\"3\">\n<li>three</li>\n<li>four</li>\n</ol>");
    }

    #[test]
    fn test_loose_ordered_list() {
        let (body, _) = render_body("1. one\n\n2. two\n");
        assert_eq!(
            body,
            "<ol>\n<li>\n<p>one</p>\n</li>\n<li>\n<p>two</p>\n</li>\n</ol>"
        );
    }

    #[test]
    fn test_tight_item_with_nested_list_keeps_trailing_newline() {
        let (body, _) = render_body("- outer\n  - inner\n");
        assert_eq!(
            body,
            "<ul>\n<li>outer\n<ul>\n<li>inner</li>\n</ul>\n</li>\n</ul>"
        );
    }

    #[test]
    fn test_quote_inside_tight_list_restores_paragraphs() {
        let (body, _) = render_body("- > quoted\n");
        assert_eq!(
            body,
            "<ul>\n<li>\n<blockquote>\n<p>quoted</p>\n</blockquote>\n</li>\n</ul>"
        );
    }

    #[test]
    fn test_suppression_stack_balanced() {
        let (_, renderer) = render_body("- a\n  - b\n    > c\n\n1. x\n\n2. y\n");
        assert_eq!(renderer.suppress_ptag, vec![false]);
    }

    #[test]
    fn test_empty_list_item() {
        let mut renderer = SlateRenderer::new();
        assert_eq!(renderer.render(&Node::ListItem(Vec::new())), "<li></li>");
    }

    #[test]
    fn test_table_rendering() {
        let (body, _) = render_body("| a | b |\n|---|--:|\n| 1 | 2 |\n");
        assert_eq!(
            body,
            "<table>\n<thead>\n<tr>\n<th style=\"text-align: left\">a</th>\n<th style=\"text-align: right\">b</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td style=\"text-align: left\">1</td>\n<td style=\"text-align: right\">2</td>\n</tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn test_center_alignment_is_per_cell() {
        let table = Node::Table {
            header: None,
            rows: vec![TableRow {
                cells: vec![
                    TableCell {
                        align: CellAlign::Unset,
                        children: vec![text("a")],
                    },
                    TableCell {
                        align: CellAlign::Center,
                        children: vec![text("b")],
                    },
                    TableCell {
                        align: CellAlign::Unset,
                        children: vec![text("c")],
                    },
                ],
            }],
        };

        let html = SlateRenderer::new().render(&table);
        assert!(html.contains("<td style=\"text-align: center\">b</td>"));
        assert!(!html.contains("<thead>"));
        assert!(html.contains("<td style=\"text-align: left\">c</td>"));
    }

    #[test]
    fn test_block_code() {
        let (body, _) = render_body("```rust\nlet s = \"<a>\";\n```\n");
        assert_eq!(
            body,
            "<pre><code class=\"language-rust\">let s = &quot;&lt;a&gt;&quot;;\n</code></pre>"
        );

        let (body, _) = render_body("    plain 'code'\n");
        assert_eq!(body, "<pre><code>plain &#x27;code&#x27;\n</code></pre>");
    }

    #[test]
    fn test_inline_code() {
        let (body, _) = render_body("Use `a && b`");
        assert_eq!(body, "<p>Use <code>a &amp;&amp; b</code></p>");
    }

    #[test]
    fn test_links() {
        let (body, _) = render_body("[docs](</api docs> \"API & more\")");
        assert_eq!(
            body,
            "<p><a href=\"/api%20docs\" title=\"API &amp; more\">docs</a></p>"
        );
    }

    #[test]
    fn test_autolinks() {
        let (body, _) = render_body("<https://example.com/a?b=1&c=2> <me@example.com>");
        assert_eq!(
            body,
            "<p><a href=\"https://example.com/a?b=1&amp;c=2\">https://example.com/a?b=1&amp;c=2</a> <a href=\"mailto:me@example.com\">me@example.com</a></p>"
        );
    }

    #[test]
    fn test_image() {
        let (body, _) = render_body("![The *logo*](/img/logo.png \"Logo\")");
        assert_eq!(
            body,
            "<p><img src=\"/img/logo.png\" alt=\"The logo\" title=\"Logo\" /></p>"
        );
    }

    #[test]
    fn test_raw_text_escaping() {
        let (body, _) = render_body("Tom's \"quote\" & <b>bold</b>");
        assert_eq!(
            body,
            "<p>Tom's &quot;quote&quot; &amp; <b>bold</b></p>"
        );
    }

    #[test]
    fn test_breaks_and_rule() {
        let (body, _) = render_body("one\ntwo  \nthree\n\n---\n");
        assert_eq!(body, "<p>one\ntwo<br />\nthree</p>\n<hr />");
    }

    #[test]
    fn test_strikethrough() {
        let (body, _) = render_body("~~gone~~");
        assert_eq!(body, "<p><del>gone</del></p>");
    }

    #[test]
    fn test_render_document_wraps_chrome() {
        let document = build_document("# Intro\n\nText").unwrap();
        let chrome = PageChrome::new(
            RenderConfig::default(),
            ChromeTemplate::from_source("<head></head>\n"),
        );

        let html = SlateRenderer::new().render_document(&document, &chrome);

        assert!(html.starts_with("<head></head>\n<body class=\"index\""));
        assert!(html.contains("<div class=\"content\">\n<h1 id=\"intro\">Intro</h1>\n<p>Text</p>\n</div>\n"));
        assert!(html.contains("data-title=\"Intro\">Intro</a>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_render_empty_document() {
        let chrome = PageChrome::new(RenderConfig::default(), ChromeTemplate::embedded());
        let html = SlateRenderer::new().render_document(&Document::default(), &chrome);
        assert_eq!(html, "");
    }

    #[test]
    fn test_render_document_merges_footnotes() {
        let document = build_document("[a]\n\n[a]: /target\n").unwrap();
        let chrome = PageChrome::new(RenderConfig::default(), ChromeTemplate::embedded());

        let mut renderer = SlateRenderer::new();
        renderer.render_document(&document, &chrome);

        assert_eq!(renderer.footnotes().len(), 1);
        assert_eq!(renderer.footnotes().values().next().unwrap().dest, "/target");
    }

    #[test]
    fn test_reused_renderer_starts_each_document_fresh() {
        let chrome = PageChrome::new(RenderConfig::default(), ChromeTemplate::embedded());
        let first = build_document("## Orphan\n\n# One\n").unwrap();
        let second = build_document("# Two\n").unwrap();

        let mut renderer = SlateRenderer::new();
        renderer.render_document(&first, &chrome);
        assert_eq!(renderer.warnings().len(), 1);

        let html = renderer.render_document(&second, &chrome);

        let titles: Vec<&str> = renderer
            .navigation()
            .entries()
            .iter()
            .map(|entry| entry.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Two"]);
        assert!(renderer.warnings().is_empty());
        assert!(!html.contains("href=\"#one\""));
        assert!(html.contains("href=\"#two\""));
    }

    #[test]
    fn test_author_escaped_text_stays_escaped() {
        let (body, _) = render_body("Write &amp;lt; for a less-than sign");
        assert_eq!(body, "<p>Write &amp;lt; for a less-than sign</p>");

        let (body, _) = render_body("Escaped \\&lt;b\\&gt;");
        assert_eq!(body, "<p>Escaped &amp;lt;b&amp;gt;</p>");

        let (body, _) = render_body("A &lt; B");
        assert_eq!(body, "<p>A &lt; B</p>");
    }

    #[test]
    fn test_link_target_entities_decoded_once() {
        let (body, _) = render_body("[go](/q?x=&amp;amp;y)");
        assert_eq!(body, "<p><a href=\"/q?x=&amp;amp%3By\">go</a></p>");

        let (body, _) = render_body("[go](/q?a=1&amp;b=2)");
        assert_eq!(body, "<p><a href=\"/q?a=1&amp;b=2\">go</a></p>");
    }

    #[test]
    fn test_take_navigation_resets_index() {
        let (_, mut renderer) = render_body("# One");
        let index = renderer.take_navigation();

        assert_eq!(index.len(), 1);
        assert!(renderer.navigation().is_empty());
    }
}
