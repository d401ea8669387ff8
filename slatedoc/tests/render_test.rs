use pulldown_cmark::{Options, Parser};
use slatedoc::document_tree::{DocumentBuilder, PARSER_OPTIONS};
use slatedoc::escape::{escape_html, unescape_html};
use slatedoc::{
    build_document, render_markdown, ChromeTemplate, PageChrome, RenderConfig, SlateRenderer,
    TreeError,
};

fn render(markdown: &str) -> slatedoc::RenderedPage {
    render_markdown(markdown, &RenderConfig::default(), ChromeTemplate::embedded()).unwrap()
}

#[test]
fn test_no_headings_gives_empty_toc() {
    let page = render("Just a paragraph.\n");

    assert!(page.navigation.is_empty());
    assert!(page
        .html
        .contains("<ul id=\"toc\" class=\"toc-list-h1\">\n</ul>\n"));
    assert!(page.html.contains("<p>Just a paragraph.</p>"));
}

#[test]
fn test_h1_order_is_preserved() {
    let page = render("# Zebra\n\n# Apple\n\n# Mango\n");

    let titles: Vec<&str> = page
        .navigation
        .entries()
        .iter()
        .map(|entry| entry.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Zebra", "Apple", "Mango"]);

    let zebra = page.html.find("href=\"#zebra\"").unwrap();
    let apple = page.html.find("href=\"#apple\"").unwrap();
    let mango = page.html.find("href=\"#mango\"").unwrap();
    assert!(zebra < apple && apple < mango);
}

#[test]
fn test_heading_id_matches_toc_anchor() {
    let page = render("# Foo Bar\n");

    assert!(page.html.contains("<h1 id=\"foo-bar\">Foo Bar</h1>"));
    assert!(page.html.contains(
        "<a href=\"#foo-bar\" class=\"toc-h1 toc-link\" data-title=\"Foo Bar\">Foo Bar</a>"
    ));
}

#[test]
fn test_escape_is_stable_for_plain_text() {
    for text in ["plain words", "a < b & c > d", "say \"hi\"", "it's"] {
        let once = escape_html(text);
        assert_eq!(escape_html(&unescape_html(&once)), once);
    }
}

#[test]
fn test_intro_body() {
    let page = render("# Intro\n\nHello **world**");

    assert!(page.html.contains(
        "<div class=\"content\">\n<h1 id=\"intro\">Intro</h1>\n<p>Hello <strong>world</strong></p>\n</div>"
    ));
    assert_eq!(page.navigation.len(), 1);
}

#[test]
fn test_tight_and_loose_lists() {
    let tight = render("- a\n- b\n");
    assert!(tight.html.contains("<ul>\n<li>a</li>\n<li>b</li>\n</ul>"));

    let loose = render("1. a\n\n2. b\n");
    assert!(loose
        .html
        .contains("<ol>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ol>"));
}

#[test]
fn test_center_cell_any_column() {
    let page = render("| a | b | c |\n|---|---|:-:|\n| 1 | 2 | 3 |\n");

    assert!(page
        .html
        .contains("<td style=\"text-align: left\">2</td>\n<td style=\"text-align: center\">3</td>"));
    assert!(page.html.contains("<th style=\"text-align: center\">c</th>"));
}

#[test]
fn test_h2_before_h1_does_not_corrupt_index() {
    let page = render("## Early\n\n# Topic\n\n## Late\n");

    assert_eq!(page.navigation.len(), 1);
    assert_eq!(page.navigation.entries()[0].title, "Topic");
    assert_eq!(page.navigation.entries()[0].subtopics, vec!["Late"]);
    assert_eq!(page.warnings.len(), 1);
    assert!(page.html.contains("<h2 id=\"early\">Early</h2>"));
}

#[test]
fn test_empty_source_renders_nothing() {
    let page = render("");
    assert_eq!(page.html, "");
    assert!(page.navigation.is_empty());
}

#[test]
fn test_unsupported_construct_is_rejected() {
    let options = PARSER_OPTIONS.union(Options::ENABLE_FOOTNOTES);
    let parser = Parser::new_ext("Text with a note[^1].\n\n[^1]: The note.\n", options);

    let err = DocumentBuilder::new().build(parser).unwrap_err();

    assert_eq!(
        err,
        TreeError::UnsupportedNodeKind {
            kind: "FootnoteReference".to_string()
        }
    );
}

#[test]
fn test_renderer_sessions_are_independent() {
    let chrome = PageChrome::new(RenderConfig::default(), ChromeTemplate::embedded());
    let first = build_document("# One\n").unwrap();
    let second = build_document("# Two\n").unwrap();

    let mut a = SlateRenderer::new();
    let mut b = SlateRenderer::new();
    a.render_document(&first, &chrome);
    b.render_document(&second, &chrome);

    assert_eq!(a.navigation().entries()[0].title, "One");
    assert_eq!(b.navigation().entries()[0].title, "Two");
    assert_eq!(a.navigation().len(), 1);
}
