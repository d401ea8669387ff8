//! Page chrome around the rendered body
//!
//! Produces the Slate header (template preamble, language tabs, sidebar with
//! search box and table of contents) and the matching footer.

use crate::escape::escape_html;
use crate::navigation::{subtopic_slug, topic_slug, NavigationIndex, TopicEntry};
use crate::render_config::RenderConfig;
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header template shipped with the crate, written out by `slatedoc init`
pub const DEFAULT_TEMPLATE_TOP: &str = include_str!("slate_files/template_top.html");

/// Placeholder in the header template replaced with the page title
const TITLE_PLACEHOLDER: &str = "{{TITLE}}";

/// Errors that can occur while preparing page chrome
#[derive(Error, Debug)]
pub enum ChromeError {
    #[error("Missing template asset {path}: {source}", path = .path.display())]
    MissingTemplateAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Static header fragment emitted before the generated sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeTemplate {
    source: String,
}

impl ChromeTemplate {
    /// Read the header fragment from disk
    ///
    /// # Returns
    /// * `Ok(ChromeTemplate)` - The template contents
    /// * `Err(ChromeError::MissingTemplateAsset)` - The file could not be read
    pub fn load(path: &Path) -> Result<Self, ChromeError> {
        let source =
            fs::read_to_string(path).map_err(|source| ChromeError::MissingTemplateAsset {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded header template from {}", path.display());
        Ok(Self { source })
    }

    /// Use an in-memory template
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The template compiled into the crate
    pub fn embedded() -> Self {
        Self::from_source(DEFAULT_TEMPLATE_TOP)
    }

    /// Raw template text
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Header and footer generator for one configuration
#[derive(Debug, Clone)]
pub struct PageChrome {
    config: RenderConfig,
    template: ChromeTemplate,
}

impl PageChrome {
    pub fn new(config: RenderConfig, template: ChromeTemplate) -> Self {
        Self { config, template }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Everything before the rendered body, with the sidebar built from `index`
    pub fn header(&self, index: &NavigationIndex) -> String {
        let mut output = self
            .template
            .source()
            .replace(TITLE_PLACEHOLDER, &escape_html(&self.config.title));

        output.push_str(&self.body_open());
        output.push_str("<div class=\"toc-wrapper\">\n");
        output.push_str(&format!(
            "<img src=\"{}\" class=\"logo\" alt=\"Logo\"/>\n",
            escape_html(&self.config.logo)
        ));
        output.push_str(&self.language_selector());
        if self.config.search {
            output.push_str(SEARCH_BOX);
        }
        output.push_str(&toc_list(index));
        output.push_str(&self.toc_footers());
        output.push_str("</div>\n");
        output.push_str("<div class=\"page-wrapper\">\n");
        output.push_str("<div class=\"dark-box\"></div>\n");
        output.push_str("<div class=\"content\">");
        output
    }

    /// Everything after the rendered body
    pub fn footer(&self) -> String {
        let mut output = String::from("</div>\n");
        output.push_str("<div class=\"dark-box\">\n");
        output.push_str(&self.language_selector());
        output.push_str("</div>\n");
        output.push_str("</div>\n");
        output.push_str("</body>\n");
        output.push_str("</html>");
        output
    }

    /// Opening `<body>` tag listing the tab languages
    fn body_open(&self) -> String {
        let languages = self
            .config
            .language_tabs
            .iter()
            .map(|language| format!("&quot;{}&quot;", escape_html(language)))
            .join(",");
        format!("<body class=\"index\" data-languages=\"[{}]\">\n", languages)
    }

    /// Language-tab selector; identical in header and footer
    fn language_selector(&self) -> String {
        let mut output = String::from("<div class=\"lang-selector\">\n");
        for language in &self.config.language_tabs {
            let language = escape_html(language);
            output.push_str(&format!(
                "<a href=\"#\" data-language-name=\"{}\">{}</a>\n",
                language, language
            ));
        }
        output.push_str("</div>\n");
        output
    }

    fn toc_footers(&self) -> String {
        let mut output = String::from("<ul class=\"toc-footer\">\n");
        for footer in &self.config.toc_footers {
            output.push_str(&format!("<li>{}</li>\n", footer));
        }
        output.push_str("</ul>\n");
        output
    }
}

const SEARCH_BOX: &str = "<div class=\"search\">\n\
<input type=\"text\" class=\"search\" id=\"input-search\" placeholder=\"Search\">\n\
</div>\n\
<ul class=\"search-results\"></ul>\n";

/// Table of contents; always present, empty when there are no topics
fn toc_list(index: &NavigationIndex) -> String {
    let mut output = String::from("<ul id=\"toc\" class=\"toc-list-h1\">\n");
    for entry in index.entries() {
        output.push_str(&toc_entry(entry));
    }
    output.push_str("</ul>\n");
    output
}

fn toc_entry(entry: &TopicEntry) -> String {
    let mut output = String::from("<li>\n");
    output.push_str(&format!(
        "<a href=\"#{}\" class=\"toc-h1 toc-link\" data-title=\"{}\">{}</a>\n",
        topic_slug(&entry.title),
        entry.title,
        entry.title
    ));

    if !entry.subtopics.is_empty() {
        output.push_str("<ul class=\"toc-list-h2\">\n");
        for subtopic in &entry.subtopics {
            output.push_str("<li>\n");
            output.push_str(&format!(
                "<a href=\"#{}\" class=\"toc-h2 toc-link\" data-title=\"{}\"><u>{}</u></a>\n",
                subtopic_slug(subtopic),
                subtopic,
                subtopic
            ));
            output.push_str("</li>\n");
        }
        output.push_str("</ul>\n");
    }

    output.push_str("</li>\n");
    output
}
