//! Snippet marker grammar.
//!
//! ```text
//! [[name]]
//! [[name?key1=val1,key2=val2]]
//! ```
//!
//! A marker runs from `[[` to the first `]]`; its inner text contains no `]`.
//! The name is everything before the first `?` and may not be empty or contain
//! `,`. Parameter parts lacking `=` are dropped silently. A repeated key keeps
//! its first position and takes its last value.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("marker pattern is valid"));

/// One parsed marker: a snippet name and its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetInvocation {
    pub name: String,
    pub params: Vec<(String, String)>,
}

impl SnippetInvocation {
    /// Parse the text between `[[` and `]]`.
    ///
    /// Returns `None` when the text does not name a snippet.
    pub fn parse(inner: &str) -> Option<Self> {
        let inner = inner.trim();
        let (name, param_str) = match inner.split_once('?') {
            Some((name, rest)) => (name.trim(), Some(rest)),
            None => (inner, None),
        };

        if name.is_empty() || name.contains(',') {
            return None;
        }

        let params = param_str.map(parse_params).unwrap_or_default();

        Some(Self {
            name: name.to_string(),
            params,
        })
    }

    /// Value of the parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn parse_params(raw: &str) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    let pairs = raw
        .split(',')
        .filter_map(|part| part.split_once('='))
        .map(|(k, v)| (k.trim(), v))
        .filter(|(k, _)| !k.is_empty());
    for (key, value) in pairs {
        match params.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value.to_string(),
            None => params.push((key.to_string(), value.to_string())),
        }
    }
    params
}

/// A marker occurrence inside a body of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Byte range of the whole `[[...]]` in the scanned text.
    pub span: Range<usize>,
    pub invocation: SnippetInvocation,
}

/// All non-overlapping markers, left to right.
pub fn scan(text: &str) -> Vec<Marker> {
    MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            SnippetInvocation::parse(inner.as_str()).map(|invocation| Marker {
                span: whole.range(),
                invocation,
            })
        })
        .collect()
}
