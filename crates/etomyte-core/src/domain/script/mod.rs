//! Restricted evaluator for snippet scripts.
//!
//! Snippet scripts are site code: they are trusted to the same degree as the
//! project's templates, but they run with nothing beyond the enumerated
//! [`Bindings`] (marker parameters and the read-only `app` map) and are
//! bounded by [`EvalLimits`]. A script produces output by binding
//! [`OUTPUT_VAR`]:
//!
//! ```text
//! # snippets/greet.snip
//! who = param("name", "stranger")
//! result = "Hello, " + who.title() + "!"
//! ```
//!
//! A script that never binds `result` yields `None`.

mod eval;
mod lexer;
mod parser;

use std::time::Duration;

use crate::domain::error::ScriptError;

pub use eval::{Bindings, Value};

/// Variable whose final value becomes the snippet's replacement text.
pub const OUTPUT_VAR: &str = "result";

/// Hard bounds on a single script evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalLimits {
    /// Maximum number of evaluated expressions.
    pub max_steps: usize,
    /// Wall-clock budget, checked on every step.
    pub timeout: Duration,
    /// Maximum length in bytes of any string produced by the script.
    pub max_len: usize,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            timeout: Duration::from_millis(250),
            max_len: 1024 * 1024,
        }
    }
}

/// A parsed snippet script.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    stmts: Vec<parser::Stmt>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let tokens = lexer::tokenize(source)?;
        let stmts = parser::parse(tokens)?;
        Ok(Self { stmts })
    }

    /// Run the script and return the string bound to [`OUTPUT_VAR`], if any.
    pub fn run(
        &self,
        bindings: Bindings<'_>,
        limits: &EvalLimits,
    ) -> Result<Option<String>, ScriptError> {
        let locals = eval::Evaluator::new(bindings, limits).run(&self.stmts)?;
        Ok(locals.get(OUTPUT_VAR).map(Value::to_string))
    }
}

/// Parse and run `source` in one step.
pub fn evaluate(
    source: &str,
    bindings: Bindings<'_>,
    limits: &EvalLimits,
) -> Result<Option<String>, ScriptError> {
    Script::parse(source)?.run(bindings, limits)
}
