//! Implementation of the `etomyte render` command.

use tracing::instrument;

use etomyte_core::domain::RenderResult;

use crate::{
    cli::{RenderArgs, RenderFormat, global::GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Render one request path and write it to stdout.
///
/// A missing page is not a failure: the 404 body is printed and the status
/// is reported on stderr (or in the JSON document).
#[instrument(skip_all, fields(path = %args.path))]
pub fn execute(
    args: RenderArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let renderer = super::site_renderer(&global.project_dir(), &config)?;
    let page = renderer.render_str(&args.path)?;
    write_page(&page, args.format, &output)
}

fn write_page(page: &RenderResult, format: RenderFormat, output: &OutputManager) -> CliResult<()> {
    if format == RenderFormat::Json || output.wants_json() {
        return output.json(page);
    }
    output.emit(&page.body)?;
    output.note(&format!("status: {}", page.status))?;
    Ok(())
}
