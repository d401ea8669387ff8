//! slatedoc - Slate-style API reference pages from Markdown
//!
//! A CLI tool that renders a Markdown source and its includes into a single
//! three-pane HTML page with a navigable table of contents.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use slatedoc::page_chrome::DEFAULT_TEMPLATE_TOP;
use slatedoc::pipeline::{self, RenderedPage};
use slatedoc::render_config::CONFIG_FILE_NAME;
use slatedoc::{ChromeTemplate, NavigationIndex, RenderConfig};
use std::path::{Path, PathBuf};

/// Starter source written by `slatedoc init`
const STARTER_MARKDOWN: &str = "# Introduction

Welcome to the API reference.

# Authentication

> To authorize, use this code:

```shell
curl \"api_endpoint_here\" -H \"Authorization: meowmeowmeow\"
```

## Get An API Key

Pass your key in the `Authorization` header.
";

/// Main entry point for the slatedoc CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force, title } => {
            handle_init_command(path, force, title)?;
        }

        Commands::Build {
            input,
            output,
            config,
            verbose,
        } => {
            handle_build_command(input, output, config, verbose)?;
        }

        Commands::Toc { input, config } => {
            handle_toc_command(input, config)?;
        }
    }

    Ok(())
}

/// Handle the init command
fn handle_init_command(path: Option<PathBuf>, force: bool, title: Option<String>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from("."));

    println!("Initializing Slate documentation in {}", target_path.display());

    // Create the target directory if it doesn't exist
    if !target_path.exists() {
        std::fs::create_dir_all(&target_path)
            .with_context(|| format!("Failed to create directory {}", target_path.display()))?;
    }

    if !force {
        check_directory_empty(&target_path)?;
    }

    let mut config = RenderConfig::default();
    if let Some(title_text) = title {
        println!("Title: {}", title_text);
        config.title = title_text;
    }

    let config_path = target_path.join(CONFIG_FILE_NAME);
    config
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let template_path = target_path.join(&config.template_top);
    create_file(&template_path, DEFAULT_TEMPLATE_TOP)?;

    let index_path = target_path.join("index.md");
    create_file(&index_path, STARTER_MARKDOWN)?;

    println!("\n✓ Successfully created 3 files");
    println!("\nNext steps:");
    println!("  1. Edit {} to configure your page", CONFIG_FILE_NAME);
    println!("  2. Write your reference in index.md");
    println!("  3. Run 'slatedoc build' to generate index.html");

    Ok(())
}

/// Handle the build command
fn handle_build_command(
    input: PathBuf,
    output: PathBuf,
    config_path: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    // Initialize logging if verbose
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    println!("Building documentation...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    println!("\n[Stage 1/3] Loading configuration...");
    let (config, base_dir) = load_config(&input, config_path)?;
    println!("✓ Using title '{}'", config.title);

    println!("\n[Stage 2/3] Rendering page...");
    let page = render_page(&input, &config, base_dir.as_deref())?;
    println!("✓ Rendered {} topics", page.navigation.len());
    for warning in &page.warnings {
        println!("  ! {}", warning);
    }

    println!("\n[Stage 3/3] Writing HTML...");
    pipeline::write_page(&page, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("✓ Wrote {} bytes to {}", page.html.len(), output.display());

    Ok(())
}

/// Handle the toc command
fn handle_toc_command(input: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let (config, _) = load_config(&input, config_path)?;

    let markdown = pipeline::read_source(&input, &config.includes)
        .with_context(|| format!("Failed to read sources from {}", input.display()))?;
    let page = pipeline::render_markdown(&markdown, &config, ChromeTemplate::embedded())
        .with_context(|| format!("Failed to render {}", input.display()))?;

    print_outline(&page.navigation);
    Ok(())
}

/// Load the configuration and the directory its paths are relative to
///
/// An explicit path must exist. Without one, `slate.toml` next to the input is
/// used when present; otherwise defaults apply and the base directory is `None`.
fn load_config(
    input: &Path,
    config_path: Option<PathBuf>,
) -> Result<(RenderConfig, Option<PathBuf>)> {
    let input_dir = input.parent().unwrap_or_else(|| Path::new("."));
    let path = match config_path {
        Some(path) => path,
        None => {
            let candidate = input_dir.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                log::info!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok((RenderConfig::default(), None));
            }
            candidate
        }
    };

    let config = RenderConfig::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    let base_dir = path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    log::info!("Loaded configuration from {}", path.display());
    Ok((config, Some(base_dir)))
}

/// Render with the configured template, or the embedded one when unconfigured
fn render_page(
    input: &Path,
    config: &RenderConfig,
    base_dir: Option<&Path>,
) -> Result<RenderedPage> {
    match base_dir {
        Some(base_dir) => pipeline::build_page(input, config, base_dir)
            .with_context(|| format!("Failed to build {}", input.display())),
        None => {
            let markdown = pipeline::read_source(input, &config.includes)
                .with_context(|| format!("Failed to read sources from {}", input.display()))?;
            pipeline::render_markdown(&markdown, config, ChromeTemplate::embedded())
                .with_context(|| format!("Failed to render {}", input.display()))
        }
    }
}

/// Print the navigation index as an indented outline
fn print_outline(index: &NavigationIndex) {
    if index.is_empty() {
        println!("(no topics)");
        return;
    }

    for entry in index.entries() {
        println!("{}", entry.title);
        for subtopic in &entry.subtopics {
            println!("  {}", subtopic);
        }
    }
}

/// Check if a directory is empty
fn check_directory_empty(path: &Path) -> Result<()> {
    if let Ok(mut entries) = std::fs::read_dir(path) {
        if entries.next().is_some() {
            anyhow::bail!("Target directory is not empty. Use --force to overwrite existing files");
        }
    }
    Ok(())
}

/// Write a starter file, creating parent directories if needed
fn create_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file {}", path.display()))?;

    Ok(())
}
