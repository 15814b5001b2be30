//! Project-directory content provider.
//!
//! # Directory layout expected
//!
//! ```text
//! my-site/
//! ├── etomyte.toml
//! ├── contents/
//! │   ├── index.md             ← "/"
//! │   ├── 404.html             ← body for absent pages
//! │   └── product/cars.md      ← "/product/cars"
//! ├── templates/
//! │   ├── index.html           ← default template
//! │   └── product.html         ← everything under "/product"
//! └── snippets/
//!     ├── year.snip            ← script, used as [[year]]
//!     └── nav.html             ← static fragment, used as [[nav]]
//! ```
//!
//! For each lookup the configured extensions are tried in order and the first
//! existing file wins. `.md` files are converted to HTML. In `snippets/`, the
//! `.snip` extension marks a script; every other extension is static text.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, instrument, trace, warn};
use walkdir::WalkDir;

use etomyte_core::{
    application::ports::{ContentProvider, output::snippet_key},
    domain::{Fragment, FragmentClass, FragmentFormat, RequestPath},
};

use crate::markdown;

/// Extension marking a snippet file as a script.
pub const SCRIPT_EXTENSION: &str = ".snip";

/// File extensions tried per fragment class, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    pub content: Vec<String>,
    pub template: Vec<String>,
    pub snippet: Vec<String>,
}

impl Default for Extensions {
    fn default() -> Self {
        let html_md = || vec![".html".to_string(), ".md".to_string()];
        Self {
            content: html_md(),
            template: html_md(),
            snippet: vec![SCRIPT_EXTENSION.to_string(), ".html".into(), ".md".into()],
        }
    }
}

impl Extensions {
    pub fn for_class(&self, class: FragmentClass) -> &[String] {
        match class {
            FragmentClass::Content => &self.content,
            FragmentClass::Template => &self.template,
            FragmentClass::Snippet => &self.snippet,
        }
    }
}

/// Storage failures. Logged, then reported to the engine as absence.
#[derive(Debug, Error)]
enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to read outside the project: {0}")]
    Escape(String),
}

/// Reads fragments from a project directory.
#[derive(Debug, Clone)]
pub struct FileSystemProvider {
    root: PathBuf,
    extensions: Extensions,
}

impl FileSystemProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: Extensions::default(),
        }
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Directory holding fragments of `class`.
    pub fn class_dir(&self, class: FragmentClass) -> PathBuf {
        self.root.join(class.dir_name())
    }

    #[instrument(level = "trace", skip(self), fields(root = %self.root.display()))]
    fn find(&self, class: FragmentClass, logical: &str) -> Option<Fragment> {
        match self.try_find(class, logical) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, %class, name = logical, "Treating unreadable fragment as absent");
                None
            }
        }
    }

    fn try_find(&self, class: FragmentClass, logical: &str) -> Result<Option<Fragment>, ReadError> {
        if logical
            .split('/')
            .any(|s| s.is_empty() || s == "." || s == ".." || s.contains(['\\', ':']))
        {
            return Err(ReadError::Escape(logical.to_string()));
        }

        let dir = self.class_dir(class);
        for ext in self.extensions.for_class(class) {
            let candidate = dir.join(format!("{logical}{ext}"));
            let raw = match fs::read_to_string(&candidate) {
                Ok(raw) => raw,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(ReadError::Io {
                        path: candidate,
                        source,
                    });
                }
            };

            debug!(file = %candidate.display(), "Fragment found");
            return Ok(Some(Self::fragment(class, logical, ext, raw)));
        }

        trace!(%class, name = logical, "Fragment absent");
        Ok(None)
    }

    fn fragment(class: FragmentClass, logical: &str, ext: &str, raw: String) -> Fragment {
        if class == FragmentClass::Snippet && ext.eq_ignore_ascii_case(SCRIPT_EXTENSION) {
            return Fragment::new(class, logical, raw).with_format(FragmentFormat::Script);
        }
        let body = if markdown::is_markdown(ext) {
            markdown::to_html(&raw)
        } else {
            raw
        };
        Fragment::new(class, logical, body)
    }
}

impl ContentProvider for FileSystemProvider {
    fn get_content(&self, path: &RequestPath) -> Option<Fragment> {
        self.find(FragmentClass::Content, &path.logical_name())
    }

    fn get_template(&self, path: &RequestPath) -> Option<Fragment> {
        self.find(FragmentClass::Template, &path.logical_name())
    }

    fn get_snippet(&self, name: &str) -> Option<Fragment> {
        let key = snippet_key(name);
        if key.is_empty() {
            return None;
        }
        self.find(FragmentClass::Snippet, key)
    }

    /// Logical names of every file under the class directory whose extension
    /// is configured for that class.
    fn list(&self, class: FragmentClass) -> Vec<String> {
        let dir = self.class_dir(class);
        let extensions = self.extensions.for_class(class);
        let mut names = BTreeSet::new();
        if !dir.is_dir() {
            return Vec::new();
        }

        for entry in WalkDir::new(&dir).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, dir = %dir.display(), "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let rel = rel.to_string_lossy().replace('\\', "/");
            if let Some(name) = extensions
                .iter()
                .find_map(|ext| rel.strip_suffix(ext.as_str()))
                .filter(|name| !name.is_empty())
            {
                names.insert(name.to_string());
            }
        }

        names.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let full = temp.path().join(rel);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        temp
    }

    fn path(raw: &str) -> RequestPath {
        RequestPath::parse(raw).unwrap()
    }

    #[test]
    fn root_maps_to_index() {
        let temp = project(&[("contents/index.html", "<p>home</p>")]);
        let provider = FileSystemProvider::new(temp.path());

        let home = provider.get_content(&RequestPath::root()).unwrap();
        assert_eq!(home.body, "<p>home</p>");
        assert_eq!(home.path, "index");
    }

    #[test]
    fn markdown_is_converted() {
        let temp = project(&[("contents/product/cars/MyCar.md", "# Test")]);
        let provider = FileSystemProvider::new(temp.path());

        let car = provider.get_content(&path("/product/cars/MyCar")).unwrap();
        assert_eq!(car.body, "<h1>Test</h1>\n");
        assert_eq!(car.format, FragmentFormat::Text);
    }

    #[test]
    fn extension_order_decides() {
        let temp = project(&[
            ("templates/index.html", "html"),
            ("templates/index.md", "md"),
        ]);
        let provider = FileSystemProvider::new(temp.path());
        assert_eq!(provider.get_template(&RequestPath::root()).unwrap().body, "html");

        let md_first = FileSystemProvider::new(temp.path()).with_extensions(Extensions {
            template: vec![".md".into(), ".html".into()],
            ..Extensions::default()
        });
        assert_eq!(
            md_first.get_template(&RequestPath::root()).unwrap().body,
            "<p>md</p>\n"
        );
    }

    #[test]
    fn lookups_are_exact() {
        let temp = project(&[("templates/product.html", "T")]);
        let provider = FileSystemProvider::new(temp.path());
        assert!(provider.get_template(&path("product")).is_some());
        assert!(provider.get_template(&path("product/cars")).is_none());
    }

    #[test]
    fn snippet_formats() {
        let temp = project(&[
            ("snippets/year.snip", "result = now('%Y')"),
            ("snippets/nav.html", "<nav></nav>"),
            ("snippets/note.md", "*hi*"),
        ]);
        let provider = FileSystemProvider::new(temp.path());

        let year = provider.get_snippet("year").unwrap();
        assert!(year.is_script());
        assert_eq!(year.body, "result = now('%Y')");

        assert!(!provider.get_snippet("nav").unwrap().is_script());
        assert_eq!(provider.get_snippet("note").unwrap().body, "<p><em>hi</em></p>\n");
        assert_eq!(provider.get_snippet("/year/extra").unwrap().path, "year");
        assert!(provider.get_snippet("missing").is_none());
    }

    #[test]
    fn snippet_names_cannot_escape() {
        let temp = project(&[("secret.snip", "result = 'leak'")]);
        let provider = FileSystemProvider::new(temp.path());
        assert!(provider.get_snippet("..").is_none());
        assert!(provider.get_snippet("").is_none());
    }

    #[test]
    fn unreadable_fragment_is_absent() {
        // A directory where a file is expected fails to read.
        let temp = project(&[("contents/page.html/inner.html", "x")]);
        let provider = FileSystemProvider::new(temp.path());
        assert!(provider.get_content(&path("page")).is_none());
    }

    #[test]
    fn list_strips_configured_extensions() {
        let temp = project(&[
            ("contents/index.md", ""),
            ("contents/about.html", ""),
            ("contents/about.md", ""),
            ("contents/product/cars.md", ""),
            ("contents/notes.txt", ""),
        ]);
        let provider = FileSystemProvider::new(temp.path());

        assert_eq!(
            provider.list(FragmentClass::Content),
            vec!["about", "index", "product/cars"]
        );
        assert!(provider.list(FragmentClass::Template).is_empty());
    }
}
