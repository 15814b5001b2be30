//! Immutable engine configuration, threaded in at construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{EvalLimits, ROOT_NAME};

/// Body used for absent pages when the project has no `404` content.
pub const BUILTIN_NOT_FOUND_BODY: &str = "<h1>404 &mdash; Page not found</h1>";

/// Read-only key/value map exposed to snippet scripts as `app.<key>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppContext(BTreeMap<String, String>);

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AppContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Settings shared by every render.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Template tried after every ancestor of the request path.
    pub default_template: String,
    /// Body for absent pages when there is no `404` content.
    pub not_found_body: String,
    pub limits: EvalLimits,
    pub context: AppContext,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_template: ROOT_NAME.to_string(),
            not_found_body: BUILTIN_NOT_FOUND_BODY.to_string(),
            limits: EvalLimits::default(),
            context: AppContext::default(),
        }
    }
}

impl EngineSettings {
    pub fn with_default_template(mut self, name: impl Into<String>) -> Self {
        self.default_template = name.into();
        self
    }

    pub fn with_limits(mut self, limits: EvalLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_context(mut self, context: AppContext) -> Self {
        self.context = context;
        self
    }
}
