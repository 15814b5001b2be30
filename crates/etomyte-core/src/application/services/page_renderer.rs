//! Page Renderer - main application orchestrator.
//!
//! This service coordinates a render:
//! 1. Look up content (falling back to the `404` page when absent)
//! 2. Expand snippets in the content
//! 3. Resolve and expand the template
//! 4. Merge content into the template

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::ContentProvider,
        services::{
            snippet_engine::SnippetEngine,
            template_resolver::{CONTENT_MARKER, TemplateResolver},
        },
        settings::EngineSettings,
    },
    domain::{RenderResult, RequestPath},
    error::EtomyteResult,
};

/// Logical name of the page rendered for absent content.
pub const NOT_FOUND_PAGE: &str = "404";

/// Renders request paths into complete pages.
///
/// Holds no mutable state: rendering the same path twice against unchanged
/// provider data yields the same result.
pub struct PageRenderer {
    provider: Arc<dyn ContentProvider>,
    resolver: TemplateResolver,
    snippets: SnippetEngine,
    not_found_body: String,
}

impl PageRenderer {
    pub fn new(provider: Arc<dyn ContentProvider>, settings: EngineSettings) -> Self {
        let EngineSettings {
            default_template,
            not_found_body,
            limits,
            context,
        } = settings;

        Self {
            resolver: TemplateResolver::new(Arc::clone(&provider), &default_template),
            snippets: SnippetEngine::new(Arc::clone(&provider), context, limits),
            provider,
            not_found_body,
        }
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    pub fn snippets(&self) -> &SnippetEngine {
        &self.snippets
    }

    /// Render one request path.
    ///
    /// Absent content yields a 404 result, not an error. Missing templates,
    /// missing snippets and failing snippet scripts are errors.
    #[instrument(skip(self), fields(path = %path, status = tracing::field::Empty))]
    pub fn render(&self, path: &RequestPath) -> EtomyteResult<RenderResult> {
        let (status, content) = match self.provider.get_content(path) {
            Some(fragment) => (RenderResult::OK, self.snippets.expand(&fragment.body)?),
            None => {
                debug!("Content absent, rendering not-found page");
                let body = match self.provider.get_content(&RequestPath::named(NOT_FOUND_PAGE)) {
                    Some(fragment) => self.snippets.expand(&fragment.body)?,
                    None => self.not_found_body.clone(),
                };
                (RenderResult::NOT_FOUND, body)
            }
        };
        tracing::Span::current().record("status", status);

        let template = self.resolver.resolve(path)?;
        debug!(template = %template.source(), "Template resolved");
        let layout = self.snippets.expand(template.body())?;

        let body = layout.replace(CONTENT_MARKER, &content);

        info!(status, bytes = body.len(), "Rendered");
        Ok(RenderResult { status, body })
    }

    /// Normalize `raw` and render it.
    pub fn render_str(&self, raw: &str) -> EtomyteResult<RenderResult> {
        let path = RequestPath::parse(raw)?;
        self.render(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::MockContentProvider;
    use crate::application::settings::{AppContext, BUILTIN_NOT_FOUND_BODY};
    use crate::domain::{DomainError, Fragment};
    use crate::error::EtomyteError;

    fn renderer(provider: MockContentProvider) -> PageRenderer {
        PageRenderer::new(Arc::new(provider), EngineSettings::default())
    }

    #[test]
    fn content_merged_into_ancestor_template() {
        let mut provider = MockContentProvider::new();
        provider
            .expect_get_content()
            .returning(|p| {
                (p.logical_name() == "product/cars/MyCar")
                    .then(|| Fragment::content("product/cars/MyCar", "Test"))
            });
        provider
            .expect_get_template()
            .returning(|p| {
                (p.logical_name() == "product")
                    .then(|| Fragment::template("product", "<h1>{{content}}</h1>"))
            });

        let page = renderer(provider).render_str("/product/cars/MyCar").unwrap();
        assert_eq!(page, RenderResult::ok("<h1>Test</h1>"));
    }

    #[test]
    fn missing_content_uses_404_page_with_snippets() {
        let mut provider = MockContentProvider::new();
        provider
            .expect_get_content()
            .returning(|p| {
                (p.logical_name() == "404")
                    .then(|| Fragment::content("404", "Not found: [[page_name]]"))
            });
        provider
            .expect_get_template()
            .returning(|p| {
                (p.logical_name() == "index").then(|| Fragment::template("index", "{{content}}"))
            });
        provider
            .expect_get_snippet()
            .returning(|n| Some(Fragment::snippet_script(n, "result = \"missing\"")));

        let page = renderer(provider).render_str("/missing").unwrap();
        assert_eq!(page, RenderResult::not_found("Not found: missing"));
    }

    #[test]
    fn missing_content_without_404_page_uses_builtin_body() {
        let mut provider = MockContentProvider::new();
        provider.expect_get_content().returning(|_| None);
        provider.expect_get_template().returning(|_| None);

        let page = renderer(provider).render(&RequestPath::root()).unwrap();
        assert_eq!(page.status, 404);
        assert_eq!(page.body, BUILTIN_NOT_FOUND_BODY);
    }

    #[test]
    fn root_renders_with_no_templates() {
        let mut provider = MockContentProvider::new();
        provider
            .expect_get_content()
            .returning(|p| p.is_root().then(|| Fragment::content("index", "<p>home</p>")));
        provider.expect_get_template().returning(|_| None);

        assert_eq!(
            renderer(provider).render_str("/").unwrap(),
            RenderResult::ok("<p>home</p>")
        );
    }

    #[test]
    fn template_snippets_expanded_and_content_inserted_everywhere() {
        let mut provider = MockContentProvider::new();
        provider
            .expect_get_content()
            .returning(|_| Some(Fragment::content("page", "C")));
        provider
            .expect_get_template()
            .returning(|_| Some(Fragment::template("index", "[[brand]]:{{content}}/{{content}}")));
        provider
            .expect_get_snippet()
            .returning(|n| Some(Fragment::snippet_script(n, "result = app.site")));

        let renderer = PageRenderer::new(
            Arc::new(provider),
            EngineSettings::default().with_context(AppContext::new().with("site", "Acme")),
        );
        assert_eq!(renderer.render_str("page").unwrap().body, "Acme:C/C");
    }

    #[test]
    fn snippet_output_containing_content_marker_is_merged() {
        let mut provider = MockContentProvider::new();
        provider
            .expect_get_content()
            .returning(|_| Some(Fragment::content("page", "C")));
        provider
            .expect_get_template()
            .returning(|_| Some(Fragment::template("index", "<main>[[slot]]</main>")));
        provider
            .expect_get_snippet()
            .returning(|n| Some(Fragment::snippet_text(n, "{{content}}")));

        assert_eq!(
            renderer(provider).render_str("page").unwrap().body,
            "<main>C</main>"
        );
    }

    #[test]
    fn missing_template_is_an_error_not_a_404() {
        let mut provider = MockContentProvider::new();
        provider
            .expect_get_content()
            .returning(|_| Some(Fragment::content("x", "body")));
        provider.expect_get_template().returning(|_| None);

        let err = renderer(provider).render_str("/x").unwrap_err();
        assert!(matches!(
            err,
            EtomyteError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn parent_segments_rejected() {
        let provider = MockContentProvider::new();
        let err = renderer(provider).render_str("/../secret").unwrap_err();
        assert!(matches!(
            err,
            EtomyteError::Domain(DomainError::InvalidPath { .. })
        ));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut provider = MockContentProvider::new();
        provider
            .expect_get_content()
            .returning(|_| Some(Fragment::content("a", "[[n?v=x]]")));
        provider
            .expect_get_template()
            .returning(|_| Some(Fragment::template("index", "<b>{{content}}</b>")));
        provider
            .expect_get_snippet()
            .returning(|n| Some(Fragment::snippet_script(n, "result = v.upper()")));

        let renderer = renderer(provider);
        let first = renderer.render_str("a").unwrap();
        let second = renderer.render_str("a").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.body, "<b>X</b>");
    }
}
