//! Source-to-page pipeline
//!
//! Orchestrates one build:
//! 1. **Template**: load the header fragment (fails before anything is rendered)
//! 2. **Sources**: read the main markdown file and append its includes
//! 3. **Render**: build the document tree and render it with page chrome

use crate::document_tree::{build_document, TreeError};
use crate::navigation::{NavigationError, NavigationIndex};
use crate::page_chrome::{ChromeError, ChromeTemplate, PageChrome};
use crate::render_config::RenderConfig;
use crate::slate_renderer::SlateRenderer;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory searched first for include files, relative to the main source
const INCLUDES_DIR: &str = "includes";

/// Errors that can occur while building a page
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error for {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Template(#[from] ChromeError),
}

/// Result of rendering one page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Complete HTML document, or empty for an empty source
    pub html: String,
    /// Headings indexed while rendering
    pub navigation: NavigationIndex,
    /// Non-fatal indexing problems
    pub warnings: Vec<NavigationError>,
}

/// Render markdown text into a full page
///
/// # Parameters
/// * `markdown` - Markdown source
/// * `config` - Page options
/// * `template` - Header fragment placed before the sidebar
///
/// # Returns
/// * `Ok(RenderedPage)` - The rendered page and its navigation index
/// * `Err(BuildError::Tree)` - The source contains a construct with no rendering rule
pub fn render_markdown(
    markdown: &str,
    config: &RenderConfig,
    template: ChromeTemplate,
) -> Result<RenderedPage, BuildError> {
    let document = build_document(markdown)?;
    let chrome = PageChrome::new(config.clone(), template);

    let mut renderer = SlateRenderer::new();
    let html = renderer.render_document(&document, &chrome);

    Ok(RenderedPage {
        html,
        warnings: renderer.warnings().to_vec(),
        navigation: renderer.take_navigation(),
    })
}

/// Build a page from a markdown file
///
/// # Parameters
/// * `input` - Main markdown file
/// * `config` - Page options
/// * `base_dir` - Directory that `config.template_top` is relative to
///
/// # Returns
/// * `Ok(RenderedPage)` - Successfully rendered page
/// * `Err(BuildError)` - The template or a source file could not be read, or the tree could not be built
pub fn build_page(
    input: &Path,
    config: &RenderConfig,
    base_dir: &Path,
) -> Result<RenderedPage, BuildError> {
    let template = ChromeTemplate::load(&base_dir.join(&config.template_top))?;
    let markdown = read_source(input, &config.includes)?;
    render_markdown(&markdown, config, template)
}

/// Read the main source and append each include file
///
/// Includes are looked up in `<input dir>/includes/` first, then next to the
/// input. Missing includes are skipped with a warning.
pub fn read_source(input: &Path, includes: &[String]) -> Result<String, BuildError> {
    let mut markdown = read_file(input)?;
    let dir = input.parent().unwrap_or_else(|| Path::new("."));

    for name in includes {
        let Some(path) = resolve_include(dir, name) else {
            log::warn!("Include file '{}' not found, skipping", name);
            continue;
        };

        log::info!("Including {}", path.display());
        let content = read_file(&path)?;
        if !markdown.ends_with('\n') {
            markdown.push('\n');
        }
        markdown.push('\n');
        markdown.push_str(&content);
    }

    Ok(markdown)
}

/// Write a rendered page, creating parent directories as needed
pub fn write_page(page: &RenderedPage, output: &Path) -> Result<(), BuildError> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(output, &page.html).map_err(|source| BuildError::Io {
        path: output.to_path_buf(),
        source,
    })
}

fn resolve_include(dir: &Path, name: &str) -> Option<PathBuf> {
    [dir.join(INCLUDES_DIR).join(name), dir.join(name)]
        .into_iter()
        .find(|path| path.is_file())
}

fn read_file(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}
