//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "render a page" or "create a project".

pub mod page_renderer;
pub mod project_service;
pub mod snippet_engine;
pub mod template_resolver;

pub use page_renderer::PageRenderer;
pub use project_service::ProjectService;
pub use snippet_engine::SnippetEngine;
pub use template_resolver::{CONTENT_MARKER, ResolvedTemplate, TemplateResolver};
