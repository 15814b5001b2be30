//! In-memory content provider.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard},
};

use tracing::warn;

use etomyte_core::{
    application::{ApplicationError, ports::ContentProvider, ports::output::snippet_key},
    domain::{Fragment, FragmentClass, ROOT_NAME, RequestPath},
    error::EtomyteResult,
};

type Store = HashMap<FragmentClass, HashMap<String, Fragment>>;

/// Thread-safe in-memory provider.
///
/// Keys are normalized the same way request paths are, so `"/a/b/"` and
/// `"a/b"` name the same fragment and `""` names the root.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    inner: Arc<RwLock<Store>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(self, path: &str, body: impl Into<String>) -> Self {
        self.with(Fragment::content(normalize(path), body))
    }

    pub fn with_template(self, path: &str, body: impl Into<String>) -> Self {
        self.with(Fragment::template(normalize(path), body))
    }

    /// A static snippet, inserted verbatim.
    pub fn with_snippet(self, name: &str, body: impl Into<String>) -> Self {
        self.with(Fragment::snippet_text(snippet_key(name), body))
    }

    /// A scripted snippet.
    pub fn with_script(self, name: &str, source: impl Into<String>) -> Self {
        self.with(Fragment::snippet_script(snippet_key(name), source))
    }

    fn with(self, fragment: Fragment) -> Self {
        if let Err(e) = self.insert(fragment) {
            warn!(error = %e, "Dropping fragment");
        }
        self
    }

    /// Insert or replace a fragment. Its `path` is normalized first.
    pub fn insert(&self, mut fragment: Fragment) -> EtomyteResult<()> {
        fragment.path = match fragment.class {
            FragmentClass::Snippet => snippet_key(&fragment.path).to_string(),
            _ => normalize(&fragment.path),
        };
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::ProviderLockError)?;
        inner
            .entry(fragment.class)
            .or_default()
            .insert(fragment.path.clone(), fragment);
        Ok(())
    }

    /// Remove a fragment, returning whether it existed.
    pub fn remove(&self, class: FragmentClass, path: &str) -> EtomyteResult<bool> {
        let key = match class {
            FragmentClass::Snippet => snippet_key(path).to_string(),
            _ => normalize(path),
        };
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::ProviderLockError)?;
        Ok(inner
            .get_mut(&class)
            .and_then(|m| m.remove(&key))
            .is_some())
    }

    fn read(&self) -> Option<RwLockReadGuard<'_, Store>> {
        match self.inner.read() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("In-memory provider lock poisoned");
                None
            }
        }
    }

    fn lookup(&self, class: FragmentClass, key: &str) -> Option<Fragment> {
        self.read()?.get(&class)?.get(key).cloned()
    }
}

impl ContentProvider for InMemoryProvider {
    fn get_content(&self, path: &RequestPath) -> Option<Fragment> {
        self.lookup(FragmentClass::Content, &path.logical_name())
    }

    fn get_template(&self, path: &RequestPath) -> Option<Fragment> {
        self.lookup(FragmentClass::Template, &path.logical_name())
    }

    fn get_snippet(&self, name: &str) -> Option<Fragment> {
        self.lookup(FragmentClass::Snippet, snippet_key(name))
    }

    fn list(&self, class: FragmentClass) -> Vec<String> {
        let Some(inner) = self.read() else {
            return Vec::new();
        };
        let mut names: Vec<String> = inner
            .get(&class)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

/// Collapse separators the way `RequestPath` does. `..` is kept literally,
/// which leaves such a key unreachable through a parsed request path.
fn normalize(path: &str) -> String {
    let joined = path
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        ROOT_NAME.to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_normalized() {
        let provider = InMemoryProvider::new()
            .with_content("/product/cars/", "Cars")
            .with_content("", "Home");

        let cars = provider
            .get_content(&RequestPath::parse("product//cars").unwrap())
            .unwrap();
        assert_eq!(cars.body, "Cars");
        assert_eq!(cars.path, "product/cars");
        assert_eq!(
            provider.get_content(&RequestPath::root()).unwrap().body,
            "Home"
        );
    }

    #[test]
    fn classes_are_separate() {
        let provider = InMemoryProvider::new().with_template("a", "T");
        let a = RequestPath::parse("a").unwrap();
        assert!(provider.get_content(&a).is_none());
        assert!(provider.get_template(&a).is_some());
    }

    #[test]
    fn snippets_use_first_segment_and_keep_format() {
        let provider = InMemoryProvider::new()
            .with_script("year", "result = now('%Y')")
            .with_snippet("nav", "<nav></nav>");

        assert!(provider.get_snippet("year/ignored").unwrap().is_script());
        assert!(!provider.get_snippet("nav").unwrap().is_script());
        assert_eq!(provider.list(FragmentClass::Snippet), vec!["nav", "year"]);
    }

    #[test]
    fn shared_clones_see_inserts_and_removals() {
        let provider = InMemoryProvider::new();
        let handle = provider.clone();

        handle.insert(Fragment::content("/x/", "body")).unwrap();
        let x = RequestPath::parse("x").unwrap();
        assert_eq!(provider.get_content(&x).unwrap().body, "body");

        assert!(handle.remove(FragmentClass::Content, "x").unwrap());
        assert!(provider.get_content(&x).is_none());
        assert!(!handle.remove(FragmentClass::Content, "x").unwrap());
    }
}
