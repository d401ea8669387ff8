//! slatedoc - Slate-style API reference pages from Markdown
//!
//! Markdown is parsed with pulldown-cmark, folded into a [`Document`] tree
//! and rendered by [`SlateRenderer`]. Level-1 and level-2 headings feed a
//! [`NavigationIndex`] that [`PageChrome`] turns into the sidebar table of
//! contents and search list.
//!
//! # Example
//!
//! ```
//! use slatedoc::{render_markdown, ChromeTemplate, RenderConfig};
//!
//! let page = render_markdown(
//!     "# Intro\n\nHello **world**",
//!     &RenderConfig::default(),
//!     ChromeTemplate::embedded(),
//! )
//! .unwrap();
//!
//! assert!(page.html.contains("<h1 id=\"intro\">Intro</h1>"));
//! assert_eq!(page.navigation.entries()[0].title, "Intro");
//! ```

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod document_tree;
pub mod escape;
pub mod navigation;
pub mod page_chrome;
pub mod pipeline;
pub mod render_config;
pub mod slate_renderer;

pub use document_tree::{build_document, Document, Node, TreeError};
pub use navigation::{NavigationError, NavigationIndex, TopicEntry};
pub use page_chrome::{ChromeError, ChromeTemplate, PageChrome};
pub use pipeline::{build_page, render_markdown, write_page, BuildError, RenderedPage};
pub use render_config::{RenderConfig, RenderConfigError};
pub use slate_renderer::SlateRenderer;
