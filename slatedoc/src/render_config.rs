//! Render configuration from slate.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "slate.toml";

/// Page options read by the chrome assembler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Page title, substituted into the header template
    pub title: String,

    /// Code languages offered by the language-tab selector
    pub language_tabs: Vec<String>,

    /// HTML fragments listed below the table of contents
    pub toc_footers: Vec<String>,

    /// Markdown files appended to the main source, in order
    pub includes: Vec<String>,

    /// Whether the sidebar shows the search box
    pub search: bool,

    /// Header template fragment, relative to the configuration file
    pub template_top: PathBuf,

    /// Logo image shown at the top of the sidebar
    pub logo: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "API Reference".to_string(),
            language_tabs: Vec::new(),
            toc_footers: vec![
                "<a href='https://github.com/tripit/slate'>Documentation Powered by Slate</a>"
                    .to_string(),
            ],
            includes: Vec::new(),
            search: true,
            template_top: PathBuf::from("slate_files/template_top.html"),
            logo: "images/logo.png".to_string(),
        }
    }
}

impl RenderConfig {
    /// Load configuration from a slate.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the slate.toml configuration file
    ///
    /// # Returns
    /// * `Ok(RenderConfig)` - Successfully loaded configuration; missing keys take defaults
    /// * `Err(RenderConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RenderConfigError> {
        let content = fs::read_to_string(&path).map_err(RenderConfigError::IoError)?;

        let config: RenderConfig =
            toml::from_str(&content).map_err(RenderConfigError::ParseError)?;

        Ok(config)
    }

    /// Save configuration to a slate.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the slate.toml file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(RenderConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderConfigError> {
        let content = toml::to_string_pretty(self).map_err(RenderConfigError::SerializeError)?;

        fs::write(&path, content).map_err(RenderConfigError::IoError)?;

        Ok(())
    }
}

/// Errors that can occur when loading or saving render configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum RenderConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for RenderConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderConfigError::IoError(e) => write!(f, "IO error: {}", e),
            RenderConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            RenderConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for RenderConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderConfigError::IoError(e) => Some(e),
            RenderConfigError::ParseError(e) => Some(e),
            RenderConfigError::SerializeError(e) => Some(e),
        }
    }
}
