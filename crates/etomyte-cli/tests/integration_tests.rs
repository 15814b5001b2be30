//! Integration tests for the `etomyte` binary.

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::{Command, cargo};
use predicates::prelude::*;
use tempfile::TempDir;

fn etomyte(dir: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("etomyte");
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("ETOMYTE_PROJECT")
        .env("NO_COLOR", "1");
    cmd
}

fn new_site(temp: &TempDir) -> PathBuf {
    etomyte(temp.path())
        .args(["new", "site", "--title", "My Site"])
        .assert()
        .success();
    temp.path().join("site")
}

// ── help / version ────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    etomyte(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("renders pages from plain files"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    etomyte(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ── new ───────────────────────────────────────────────────────────────────────

#[test]
fn test_new_site_success() {
    let temp = TempDir::new().unwrap();
    etomyte(temp.path())
        .args(["new", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let site = temp.path().join("site");
    for file in [
        "etomyte.toml",
        "templates/index.html",
        "contents/index.md",
        "contents/404.html",
        "snippets/year.snip",
        "snippets/greet.snip",
    ] {
        assert!(site.join(file).is_file(), "missing {file}");
    }
    let config = fs::read_to_string(site.join("etomyte.toml")).unwrap();
    assert!(config.contains("name = \"site\""));
}

#[test]
fn test_new_site_dry_run() {
    let temp = TempDir::new().unwrap();
    etomyte(temp.path())
        .args(["new", "site", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("templates/index.html"));

    assert!(!temp.path().join("site").exists());
}

#[test]
fn test_new_site_quiet() {
    let temp = TempDir::new().unwrap();
    etomyte(temp.path())
        .args(["-q", "new", "site"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(temp.path().join("site/etomyte.toml").exists());
}

#[test]
fn test_new_site_force_keeps_existing_files() {
    let temp = TempDir::new().unwrap();
    let site = temp.path().join("site");
    fs::create_dir(&site).unwrap();
    fs::write(site.join("notes.txt"), "keep me").unwrap();

    etomyte(temp.path())
        .args(["new", "site", "--force"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(site.join("notes.txt")).unwrap(), "keep me");
    assert!(site.join("templates/index.html").exists());
}

// ── render ────────────────────────────────────────────────────────────────────

#[test]
fn test_render_home_page() {
    let temp = TempDir::new().unwrap();
    new_site(&temp);

    etomyte(temp.path())
        .args(["-p", "site", "render", "/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>My Site</title>"))
        .stdout(predicate::str::contains("<h1>Welcome</h1>"))
        .stdout(predicate::str::contains("Hello, World!"))
        .stdout(predicate::str::contains("[[").not())
        .stderr(predicate::str::contains("status: 200"));
}

#[test]
fn test_render_missing_page_uses_404_content() {
    let temp = TempDir::new().unwrap();
    new_site(&temp);

    etomyte(temp.path())
        .args(["-p", "site", "render", "/no/such/page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello, Traveller!"))
        .stderr(predicate::str::contains("status: 404"));
}

#[test]
fn test_render_json() {
    let temp = TempDir::new().unwrap();
    new_site(&temp);

    let output = etomyte(temp.path())
        .args(["-p", "site", "render", "/missing", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["status"], 404);
    assert!(page["body"].as_str().unwrap().contains("Page not found"));
}

#[test]
fn test_render_uses_site_context() {
    let temp = TempDir::new().unwrap();
    let site = new_site(&temp);
    fs::write(site.join("snippets/brand.snip"), "result = app.name + ' ' + app.motto").unwrap();
    fs::write(site.join("contents/about.html"), "<p>[[brand]]</p>").unwrap();

    etomyte(temp.path())
        .args(["-p", "site", "render", "/about"])
        .env("ETOMYTE__SITE__CONTEXT__MOTTO", "rocks")
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>My Site rocks</p>"));
}

#[test]
fn test_render_nested_template() {
    let temp = TempDir::new().unwrap();
    let site = new_site(&temp);
    fs::create_dir_all(site.join("contents/product/cars")).unwrap();
    fs::write(site.join("contents/product/cars/MyCar.md"), "Test").unwrap();
    fs::write(site.join("templates/product.html"), "<h1>{{content}}</h1>").unwrap();

    etomyte(temp.path())
        .args(["-p", "site", "render", "/product/cars/MyCar"])
        .assert()
        .success()
        .stdout(predicate::str::diff("<h1><p>Test</p>\n</h1>\n"));
}

// ── list ──────────────────────────────────────────────────────────────────────

#[test]
fn test_list_json() {
    let temp = TempDir::new().unwrap();
    new_site(&temp);

    let output = etomyte(temp.path())
        .args(["-p", "site", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["pages"], serde_json::json!(["404", "index"]));
    assert_eq!(listing["templates"], serde_json::json!(["index"]));
    assert_eq!(listing["snippets"], serde_json::json!(["greet", "year"]));
}

#[test]
fn test_list_single_kind() {
    let temp = TempDir::new().unwrap();
    new_site(&temp);

    etomyte(temp.path())
        .args(["-p", "site", "list", "snippets", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("greet\nyear\n"));
}

// ── config ────────────────────────────────────────────────────────────────────

#[test]
fn test_config_layers() {
    let temp = TempDir::new().unwrap();
    let site = new_site(&temp);
    fs::write(site.join("etomyte.toml"), "[server]\nport = 9000\n").unwrap();

    etomyte(temp.path())
        .args(["-p", "site", "config", "get", "server.port"])
        .assert()
        .success()
        .stdout("9000\n");

    etomyte(temp.path())
        .args(["-p", "site", "config", "get", "server.port"])
        .env("ETOMYTE__SERVER__PORT", "9100")
        .assert()
        .success()
        .stdout("9100\n");

    etomyte(temp.path())
        .args(["config", "get", "server.port"])
        .assert()
        .success()
        .stdout("8000\n");
}

#[test]
fn test_config_path() {
    let temp = TempDir::new().unwrap();
    etomyte(temp.path())
        .args(["-p", "site", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("etomyte.toml"));
}

// ── completions ───────────────────────────────────────────────────────────────

#[test]
fn test_shell_completions() {
    let temp = TempDir::new().unwrap();
    etomyte(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("etomyte"));
}
