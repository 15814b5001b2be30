//! Normalized request paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Logical name of the site root.
pub const ROOT_NAME: &str = "index";

/// A normalized, slash-separated logical path.
///
/// Invariant: no leading or trailing slashes, no empty segments and no `.` or
/// `..` segments. The empty path is the site root and has the logical name
/// [`ROOT_NAME`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestPath {
    segments: Vec<String>,
}

impl RequestPath {
    /// Normalize a raw request string such as `"/products//cars/"`.
    ///
    /// Backslashes are treated as separators. `.` segments are dropped; `..`
    /// segments are rejected rather than resolved so a request can never
    /// address anything above the site root.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let mut segments = Vec::new();
        for segment in raw.split(['/', '\\']) {
            match segment.trim() {
                "" | "." => {}
                ".." => {
                    return Err(DomainError::InvalidPath {
                        path: raw.to_string(),
                        reason: "parent segments ('..') are not allowed".into(),
                    });
                }
                s => segments.push(s.to_string()),
            }
        }
        Ok(Self { segments })
    }

    /// The site root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from a logical name known to be well-formed
    /// (e.g. `"404"` or a configured default template name).
    pub fn named(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The name used for lookups: the joined segments, or `"index"` at the root.
    pub fn logical_name(&self) -> String {
        if self.is_root() {
            ROOT_NAME.to_string()
        } else {
            self.segments.join("/")
        }
    }

    /// Drop the last segment. Returns `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Every non-empty prefix, longest first: `a/b/c`, `a/b`, `a`.
    ///
    /// The root itself is not yielded; callers fall back to a default name.
    pub fn ancestors(&self) -> impl Iterator<Item = RequestPath> + '_ {
        (1..=self.segments.len()).rev().map(|len| Self {
            segments: self.segments[..len].to_vec(),
        })
    }

    /// True when `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &RequestPath) -> bool {
        other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl FromStr for RequestPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RequestPath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RequestPath> for String {
    fn from(path: RequestPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_and_collapses_slashes() {
        let path = RequestPath::parse("//product//cars/MyCar/").unwrap();
        assert_eq!(path.segments(), ["product", "cars", "MyCar"]);
        assert_eq!(path.logical_name(), "product/cars/MyCar");
        assert_eq!(path.to_string(), "/product/cars/MyCar");
    }

    #[test]
    fn empty_path_is_index() {
        for raw in ["", "/", "///", "./"] {
            let path = RequestPath::parse(raw).unwrap();
            assert!(path.is_root(), "{raw:?} should be root");
            assert_eq!(path.logical_name(), "index");
        }
    }

    #[test]
    fn parent_segments_rejected() {
        assert!(matches!(
            RequestPath::parse("/a/../../etc/passwd"),
            Err(DomainError::InvalidPath { .. })
        ));
    }

    #[test]
    fn backslashes_are_separators() {
        let path = RequestPath::parse("a\\b").unwrap();
        assert_eq!(path.segments(), ["a", "b"]);
    }

    #[test]
    fn ancestors_longest_first() {
        let path = RequestPath::parse("/a/b/c").unwrap();
        let names: Vec<_> = path.ancestors().map(|p| p.logical_name()).collect();
        assert_eq!(names, ["a/b/c", "a/b", "a"]);
        assert_eq!(RequestPath::root().ancestors().count(), 0);
    }

    #[test]
    fn prefix_relation() {
        let full = RequestPath::parse("a/b/c").unwrap();
        assert!(RequestPath::parse("a/b").unwrap().is_prefix_of(&full));
        assert!(RequestPath::root().is_prefix_of(&full));
        assert!(!RequestPath::parse("a/x").unwrap().is_prefix_of(&full));
    }

    #[test]
    fn parent_of_root_is_none() {
        assert!(RequestPath::root().parent().is_none());
        assert_eq!(
            RequestPath::named("a/b").parent(),
            Some(RequestPath::named("a"))
        );
    }
}
