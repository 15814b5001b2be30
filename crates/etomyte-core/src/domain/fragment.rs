//! Fragments: the units of retrievable text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which lookup namespace a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentClass {
    Content,
    Template,
    Snippet,
}

impl FragmentClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Template => "template",
            Self::Snippet => "snippet",
        }
    }

    /// Directory holding this class in the on-disk project layout.
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::Content => "contents",
            Self::Template => "templates",
            Self::Snippet => "snippets",
        }
    }
}

impl fmt::Display for FragmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a fragment body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentFormat {
    /// Ready-to-insert text (HTML, or Markdown already converted by the adapter).
    #[default]
    Text,
    /// Snippet script run by the restricted evaluator.
    Script,
}

/// A fragment as returned by a content provider.
///
/// Immutable once retrieved; owned by the render call that fetched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub class: FragmentClass,
    /// Logical path used for the lookup (`"product/cars"`, `"index"`, a snippet name).
    pub path: String,
    pub format: FragmentFormat,
    pub body: String,
}

impl Fragment {
    pub fn new(class: FragmentClass, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            class,
            path: path.into(),
            format: FragmentFormat::Text,
            body: body.into(),
        }
    }

    pub fn content(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(FragmentClass::Content, path, body)
    }

    pub fn template(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(FragmentClass::Template, path, body)
    }

    /// A static snippet, inserted verbatim.
    pub fn snippet_text(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(FragmentClass::Snippet, name, body)
    }

    /// A scripted snippet.
    pub fn snippet_script(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(FragmentClass::Snippet, name, source).with_format(FragmentFormat::Script)
    }

    pub fn with_format(mut self, format: FragmentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn is_script(&self) -> bool {
        self.format == FragmentFormat::Script
    }
}

/// Outcome of rendering one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    pub status: u16,
    pub body: String,
}

impl RenderResult {
    pub const OK: u16 = 200;
    pub const NOT_FOUND: u16 = 404;

    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: Self::OK,
            body: body.into(),
        }
    }

    pub fn not_found(body: impl Into<String>) -> Self {
        Self {
            status: Self::NOT_FOUND,
            body: body.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Self::NOT_FOUND
    }
}
