//! Starter project written by `etomyte new`.
//!
//! The skeleton exercises every fragment class: a default template that
//! pulls in a script snippet, Markdown and HTML content, and a `404` page.

use std::path::PathBuf;

use etomyte_core::domain::ProjectSkeleton;

/// Name of the project configuration file at the project root.
pub const CONFIG_FILE: &str = "etomyte.toml";

// ── File contents ─────────────────────────────────────────────────────────────

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
</head>
<body>
  <main>
{{content}}
  </main>
  <footer>&copy; [[year]] {{title}}</footer>
</body>
</html>
"#;

const INDEX_CONTENT: &str = r#"# Welcome

[[greet?name=world]]

This page lives in `contents/index.md`. Add more pages under `contents/`,
layouts under `templates/` and reusable fragments under `snippets/`.
"#;

const NOT_FOUND_CONTENT: &str = r#"<h1>Page not found</h1>
<p>[[greet?name=traveller]] There is nothing here yet.</p>
"#;

const YEAR_SNIPPET: &str = r#"# Current year, for the footer.
result = now("%Y")
"#;

const GREET_SNIPPET: &str = r#"# Usage: [[greet?name=Ana]]
who = param("name", "stranger")
result = "Hello, " + who.title() + "!"
"#;

/// Build the starter skeleton rooted at `root`.
///
/// `config` is the serialized `etomyte.toml`; the CLI owns its format.
pub fn starter_project(root: impl Into<PathBuf>, title: &str, config: &str) -> ProjectSkeleton {
    ProjectSkeleton::new(root)
        .with_directory("contents")
        .with_directory("templates")
        .with_directory("snippets")
        .with_file(CONFIG_FILE, config)
        .with_file("templates/index.html", INDEX_TEMPLATE.replace("{{title}}", title))
        .with_file("contents/index.md", INDEX_CONTENT)
        .with_file("contents/404.html", NOT_FOUND_CONTENT)
        .with_file("snippets/year.snip", YEAR_SNIPPET)
        .with_file("snippets/greet.snip", GREET_SNIPPET)
}
