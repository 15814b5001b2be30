//! Template Resolver - closest-ancestor template lookup.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::ContentProvider},
    domain::{Fragment, ROOT_NAME, RequestPath},
    error::EtomyteResult,
};

/// The literal a template uses to mark where content goes.
pub const CONTENT_MARKER: &str = "{{content}}";

/// Outcome of a template lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTemplate {
    /// A template at the request path or one of its ancestors.
    Found { path: RequestPath, fragment: Fragment },
    /// The configured default template.
    Defaulted(Fragment),
    /// Built-in `{{content}}` template, used only for the site root or the
    /// default name.
    Placeholder,
}

impl ResolvedTemplate {
    pub fn body(&self) -> &str {
        match self {
            Self::Found { fragment, .. } | Self::Defaulted(fragment) => &fragment.body,
            Self::Placeholder => CONTENT_MARKER,
        }
    }

    /// Where the template came from, for logs and `--verbose` output.
    pub fn source(&self) -> String {
        match self {
            Self::Found { path, .. } => path.to_string(),
            Self::Defaulted(fragment) => format!("default ({})", fragment.path),
            Self::Placeholder => "built-in placeholder".to_string(),
        }
    }
}

/// Walks a request path upward to find the nearest template.
pub struct TemplateResolver {
    provider: Arc<dyn ContentProvider>,
    default_template: RequestPath,
}

impl TemplateResolver {
    pub fn new(provider: Arc<dyn ContentProvider>, default_template: &str) -> Self {
        Self {
            provider,
            default_template: RequestPath::named(default_template),
        }
    }

    pub fn default_template(&self) -> &RequestPath {
        &self.default_template
    }

    /// Try the full path, then each shorter prefix, then the default name.
    ///
    /// When nothing is found and the request is for the site root or the
    /// default name itself, the placeholder is returned. The root therefore
    /// renders even when `default_template` names a file that does not exist.
    #[instrument(skip(self), fields(path = %path))]
    pub fn resolve(&self, path: &RequestPath) -> EtomyteResult<ResolvedTemplate> {
        for candidate in path.ancestors() {
            if let Some(fragment) = self.provider.get_template(&candidate) {
                debug!(template = %candidate, "Template found");
                return Ok(ResolvedTemplate::Found {
                    path: candidate,
                    fragment,
                });
            }
        }

        // Already tried when the path itself is the default name.
        let tried_default = path == &self.default_template;
        if !tried_default {
            if let Some(fragment) = self.provider.get_template(&self.default_template) {
                debug!(template = %self.default_template, "Using default template");
                return Ok(ResolvedTemplate::Defaulted(fragment));
            }
        }

        let name = path.logical_name();
        if name == ROOT_NAME || name == self.default_template.logical_name() {
            debug!("No templates present, using placeholder");
            return Ok(ResolvedTemplate::Placeholder);
        }

        Err(ApplicationError::TemplateNotFound {
            path: path.to_string(),
        }
        .into())
    }
}
