use std::fs;

use docsmith_pipeline::{BatchOptions, PipelineConfig, ProjectSource, gather, run};
use tempfile::TempDir;

fn write(dir: &TempDir, relative: &str, contents: &str) {
    let path = dir.path().join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, contents).expect("write file");
}

fn config(name: &str) -> PipelineConfig {
    PipelineConfig {
        project_name: Some(name.to_string()),
        ..PipelineConfig::default()
    }
}

#[test]
fn runs_docs_tree() {
    let dir = TempDir::new().expect("tempdir");
    write(
        &dir,
        "documentation/docs/01-introduction.md",
        "---\ntitle: Introduction\n---\n\n### Getting started\n\n#### Install\n\n___\n\nRun this:\n\n```sh\nnpm i\n```\n",
    );
    write(&dir, "documentation/docs/02-template-syntax.md", "### Tags\n\n### Attributes\n");
    write(&dir, "documentation/docs/xx-draft.md", "# ignored\n");
    write(&dir, "documentation/faq/01-why.md", "### Why not\n");
    write(&dir, "documentation/tutorials/01-basics/text.md", "### Basics\n");
    write(&dir, "documentation/assets/logo.svg", "<svg/>");

    let result = run(dir.path(), &config("svelte"), &BatchOptions::default()).expect("run");

    assert!(!result.has_failures());
    assert_eq!(result.stats.projects, 1);
    assert_eq!(result.stats.succeeded, 3);
    assert_eq!(result.stats.skipped, 1);

    let keys: Vec<_> = result.entries().map(|entry| entry.key.as_str()).collect();
    assert_eq!(
        keys,
        [
            "svelte@docs@Introduction",
            "svelte@docs@Template_syntax",
            "svelte@faq@Why"
        ]
    );

    let intro: serde_json::Value =
        serde_json::from_str(&result.projects[0].entries[0].value).expect("json");
    assert_eq!(intro["file"], "docs/01-introduction.md");
    assert_eq!(intro["sections"][0]["slug"], "Introduction-Getting-started");
    assert_eq!(
        intro["sections"][0]["sections"][0]["slug"],
        "Introduction-Getting-started-Install"
    );
    let content = intro["content"].as_str().expect("content");
    assert!(content.contains("<div class=\"side-by-side\">"));
    assert!(content.contains("<pre class='language-bash'><code>npm i</code></pre>"));
    assert!(content.contains("href=\"docs#Introduction-Getting-started\""));
}

#[test]
fn reports_failing_documents() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir, "documentation/docs/01-a.md", "## Setup\n");
    write(&dir, "documentation/docs/02-b.md", "### Fine\n");

    let result = run(dir.path(), &config("svelte"), &BatchOptions::default()).expect("run");

    assert!(result.has_failures());
    let messages: Vec<_> = result
        .failures()
        .map(|(_, failure)| failure.error.to_string())
        .collect();
    assert_eq!(
        messages,
        ["docs/01-a.md: Only level 3, 4, and 5 headings are allowed. Got level 2 heading \"Setup\"."]
    );
    assert_eq!(result.entries().count(), 1);
}

#[test]
fn falls_back_to_readmes() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir, "package.json", r#"{ "name": "@sveltejs/kit" }"#);
    write(&dir, "README.md", "# kit\n\n## Install\n\n```sh\n# not a heading\n```\n");
    write(&dir, "packages/adapter/package.json", r#"{ "name": "@sveltejs/adapter" }"#);
    write(&dir, "packages/adapter/README.md", "# adapter\n");
    write(&dir, "packages/internal/package.json", r#"{ "name": "internal", "private": true }"#);

    let config = PipelineConfig::default();
    let sources = gather(dir.path(), &config).expect("gather");
    assert_eq!(
        sources,
        [
            ProjectSource::Readme {
                name: "kit".into(),
                readme: "### kit\n\n#### Install\n\n```sh\n# not a heading\n```\n".into(),
            },
            ProjectSource::Readme {
                name: "adapter".into(),
                readme: "### adapter\n".into(),
            },
        ]
    );

    let result = run(dir.path(), &config, &BatchOptions::default()).expect("run");
    let keys: Vec<_> = result.entries().map(|entry| entry.key.as_str()).collect();
    assert_eq!(keys, ["kit@docs@README", "adapter@docs@README"]);
}

#[test]
fn readme_projects_sharing_a_name_keep_the_root() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir, "package.json", r#"{ "name": "svelte" }"#);
    write(&dir, "README.md", "# svelte\n\n## Root\n");
    write(&dir, "packages/svelte/package.json", r#"{ "name": "svelte" }"#);
    write(&dir, "packages/svelte/README.md", "# svelte\n\n## Package\n");
    write(&dir, "packages/kit/package.json", r#"{ "name": "@sveltejs/kit" }"#);
    write(&dir, "packages/kit/README.md", "# kit\n");

    let config = PipelineConfig::default();
    let names: Vec<_> = gather(dir.path(), &config)
        .expect("gather")
        .iter()
        .map(|source| source.name().to_string())
        .collect();
    assert_eq!(names, ["svelte", "kit"]);

    let result = run(dir.path(), &config, &BatchOptions::default()).expect("run");
    let keys: Vec<_> = result.entries().map(|entry| entry.key.as_str()).collect();
    assert_eq!(keys, ["svelte@docs@README", "kit@docs@README"]);
    let root: serde_json::Value =
        serde_json::from_str(&result.projects[0].entries[0].value).expect("json");
    assert!(root["content"].as_str().expect("content").contains("Root"));
}

#[test]
fn empty_repository_yields_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let result = run(dir.path(), &config("empty"), &BatchOptions::default()).expect("run");
    assert_eq!(result.stats.projects, 0);
    assert!(!result.has_failures());
}

#[test]
fn config_file_is_loaded() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir, "docsmith.json", r#"{ "docs_path": "site", "ignore_packages": ["kit"] }"#);

    let config = PipelineConfig::load(&dir.path().join("docsmith.json")).expect("config");
    assert_eq!(config.docs_path, "site");
    assert_eq!(config.ignore_packages, ["kit"]);

    let err = PipelineConfig::load(&dir.path().join("missing.json")).expect_err("missing file");
    assert!(err.to_string().starts_with("Invalid configuration"));
}
