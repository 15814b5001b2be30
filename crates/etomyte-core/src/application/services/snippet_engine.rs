//! Snippet Engine - marker substitution.
//!
//! One left-to-right pass over the markers in a text. Each marker is resolved
//! on its own and its replacement is inserted literally, so markers appearing
//! in snippet output are never expanded.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::{
    application::{ApplicationError, ports::ContentProvider, settings::AppContext},
    domain::{
        Bindings, EvalLimits, Script, SnippetInvocation,
        marker::{self, Marker},
    },
    error::EtomyteResult,
};

pub struct SnippetEngine {
    provider: Arc<dyn ContentProvider>,
    context: AppContext,
    limits: EvalLimits,
}

impl SnippetEngine {
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        context: AppContext,
        limits: EvalLimits,
    ) -> Self {
        Self {
            provider,
            context,
            limits,
        }
    }

    /// Replace every marker in `text`.
    ///
    /// Markers whose script leaves `result` unbound stay in the output as
    /// written.
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn expand(&self, text: &str) -> EtomyteResult<String> {
        let markers = marker::scan(text);
        if markers.is_empty() {
            return Ok(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for Marker { span, invocation } in markers {
            out.push_str(&text[last..span.start]);
            match self.invoke(&invocation)? {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(&text[span.clone()]),
            }
            last = span.end;
        }
        out.push_str(&text[last..]);

        Ok(out)
    }

    /// Resolve one invocation to its replacement text.
    ///
    /// `Ok(None)` means the snippet ran but produced nothing.
    pub fn invoke(&self, invocation: &SnippetInvocation) -> EtomyteResult<Option<String>> {
        let name = &invocation.name;
        let fragment =
            self.provider
                .get_snippet(name)
                .ok_or_else(|| ApplicationError::SnippetNotFound {
                    name: name.clone(),
                })?;

        if !fragment.is_script() {
            trace!(snippet = %name, "Inserting static snippet");
            return Ok(Some(fragment.body));
        }

        let bindings = Bindings {
            params: &invocation.params,
            app: self.context.as_map(),
        };
        let output = Script::parse(&fragment.body)
            .and_then(|script| script.run(bindings, &self.limits))
            .map_err(|source| ApplicationError::SnippetEvaluation {
                name: name.clone(),
                source,
            })?;

        if output.is_none() {
            debug!(snippet = %name, "Snippet left result unbound");
        }
        Ok(output)
    }
}
