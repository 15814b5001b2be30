//! Content resolution and templating engine for the Etomyte flat-file CMS.
//!
//! Layers, innermost first:
//!
//! - [`domain`]: request paths, fragments, `[[snippet]]` markers and the
//!   snippet script evaluator. No I/O.
//! - [`application`]: the [`ContentProvider`](application::ports::ContentProvider)
//!   and [`Filesystem`](application::ports::Filesystem) ports plus the services
//!   built on them: template resolution, snippet expansion, page rendering and
//!   project scaffolding.
//!
//! Storage lives behind the ports; `etomyte-adapters` supplies the
//! filesystem-backed and in-memory implementations.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use etomyte_core::prelude::*;
//!
//! # fn provider() -> Arc<dyn ContentProvider> { unimplemented!() }
//! let renderer = PageRenderer::new(provider(), EngineSettings::default());
//! let page = renderer.render_str("/products/cars")?;
//! println!("{} {}", page.status, page.body);
//! # Ok::<(), EtomyteError>(())
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        AppContext, EngineSettings, PageRenderer, ProjectService, ResolvedTemplate,
        SnippetEngine, TemplateResolver,
        ports::{ContentProvider, Filesystem},
    };
    pub use crate::domain::{
        EvalLimits, Fragment, FragmentClass, FragmentFormat, ProjectSkeleton, RenderResult,
        RequestPath, SnippetInvocation,
    };
    pub use crate::error::{EtomyteError, EtomyteResult};
}
