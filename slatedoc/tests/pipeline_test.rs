use slatedoc::page_chrome::DEFAULT_TEMPLATE_TOP;
use slatedoc::render_config::CONFIG_FILE_NAME;
use slatedoc::{build_page, write_page, BuildError, RenderConfig};
use std::fs;
use std::path::Path;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn setup_project(dir: &Path, config: &RenderConfig) {
    config.save(dir.join(CONFIG_FILE_NAME)).unwrap();
    write(&dir.join(&config.template_top), DEFAULT_TEMPLATE_TOP);
}

#[test]
fn test_build_page_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        title: "Kittn API".to_string(),
        language_tabs: vec!["shell".to_string(), "ruby".to_string()],
        includes: vec!["_errors.md".to_string()],
        ..RenderConfig::default()
    };
    setup_project(dir.path(), &config);
    write(
        &dir.path().join("index.md"),
        "# Introduction\n\nWelcome.\n\n# Kittens\n\n## Get All Kittens\n",
    );
    write(
        &dir.path().join("includes").join("_errors.md"),
        "# Errors\n\nCode | Meaning\n---- | -------\n400 | Bad Request\n",
    );

    let loaded = RenderConfig::load(dir.path().join(CONFIG_FILE_NAME)).unwrap();
    let page = build_page(&dir.path().join("index.md"), &loaded, dir.path()).unwrap();

    assert!(page.html.contains("<title>Kittn API</title>"));
    assert!(page
        .html
        .contains("data-languages=\"[&quot;shell&quot;,&quot;ruby&quot;]\""));
    assert!(page.html.contains("<h1 id=\"errors\">Errors</h1>"));
    assert!(page.html.contains("<td style=\"text-align: left\">Bad Request</td>"));
    assert!(page.html.ends_with("</body>\n</html>\n"));

    let titles: Vec<&str> = page
        .navigation
        .entries()
        .iter()
        .map(|entry| entry.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Introduction", "Kittens", "Errors"]);
    assert_eq!(page.navigation.entries()[1].subtopics, vec!["Get All Kittens"]);

    let output = dir.path().join("build").join("index.html");
    write_page(&page, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), page.html);
}

#[test]
fn test_missing_template_fails_before_reading_sources() {
    let dir = tempfile::tempdir().unwrap();

    // Neither the template nor the input exist; the template is reported
    let err = build_page(
        &dir.path().join("index.md"),
        &RenderConfig::default(),
        dir.path(),
    )
    .unwrap_err();

    assert!(matches!(err, BuildError::Template(_)));
}

#[test]
fn test_missing_include_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        includes: vec!["_missing.md".to_string(), "_auth.md".to_string()],
        ..RenderConfig::default()
    };
    setup_project(dir.path(), &config);
    write(&dir.path().join("index.md"), "# Intro\n");
    write(&dir.path().join("_auth.md"), "# Authentication\n");

    let page = build_page(&dir.path().join("index.md"), &config, dir.path()).unwrap();

    assert_eq!(page.navigation.len(), 2);
    assert_eq!(page.navigation.entries()[1].title, "Authentication");
}
