//! Tree-walking evaluator.
//!
//! The evaluator sees exactly three things: script locals, snippet parameters
//! and the read-only `app` map. There are no builtins that touch the
//! filesystem, network, environment or process.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write as _};
use std::time::Instant;

use crate::domain::error::ScriptError;

use super::EvalLimits;
use super::parser::{BinOp, Expr, Stmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Inputs visible to a script.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    pub params: &'a [(String, String)],
    pub app: &'a BTreeMap<String, String>,
}

pub struct Evaluator<'a> {
    bindings: Bindings<'a>,
    limits: &'a EvalLimits,
    locals: HashMap<String, Value>,
    started: Instant,
    steps: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(bindings: Bindings<'a>, limits: &'a EvalLimits) -> Self {
        Self {
            bindings,
            limits,
            locals: HashMap::new(),
            started: Instant::now(),
            steps: 0,
        }
    }

    pub fn run(mut self, stmts: &[Stmt]) -> Result<HashMap<String, Value>, ScriptError> {
        for stmt in stmts {
            match stmt {
                Stmt::Assign { name, value } => {
                    let value = self.eval(value)?;
                    self.locals.insert(name.clone(), value);
                }
                Stmt::Expr(expr) => {
                    self.eval(expr)?;
                }
            }
        }
        Ok(self.locals)
    }

    fn tick(&mut self) -> Result<(), ScriptError> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(ScriptError::StepLimit(self.limits.max_steps));
        }
        if self.started.elapsed() >= self.limits.timeout {
            return Err(ScriptError::Timeout(self.limits.timeout.as_millis()));
        }
        Ok(())
    }

    /// Refuse a string of `len` bytes before it is allocated.
    fn fits(&self, len: usize) -> Result<(), ScriptError> {
        if len > self.limits.max_len {
            return Err(ScriptError::LengthLimit(self.limits.max_len));
        }
        Ok(())
    }

    fn checked(&self, s: String) -> Result<Value, ScriptError> {
        self.fits(s.len())?;
        Ok(Value::Str(s))
    }

    fn writer(&self) -> BoundedWriter {
        BoundedWriter {
            buf: String::new(),
            max: self.limits.max_len,
            overflowed: false,
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, ScriptError> {
        self.tick()?;
        match expr {
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Var { name, .. } => self.lookup(name),
            Expr::App { key, .. } => self
                .bindings
                .app
                .get(key)
                .map(|v| Value::Str(v.clone()))
                .ok_or_else(|| ScriptError::UnknownVariable(format!("app.{key}"))),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                self.binary(*op, lhs, rhs)
            }
            Expr::Call { name, args, .. } => {
                let args = self.eval_args(args)?;
                self.call(name, args)
            }
            Expr::Method {
                receiver,
                method,
                args,
                ..
            } => {
                let receiver = self.eval(receiver)?;
                let args = self.eval_args(args)?;
                self.method(receiver, method, args)
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, ScriptError> {
        args.iter().map(|a| self.eval(a)).collect()
    }

    fn lookup(&self, name: &str) -> Result<Value, ScriptError> {
        if let Some(v) = self.locals.get(name) {
            return Ok(v.clone());
        }
        self.param(name)
            .map(|v| Value::Str(v.to_string()))
            .ok_or_else(|| ScriptError::UnknownVariable(name.to_string()))
    }

    /// A repeated parameter resolves to its last value.
    fn param(&self, name: &str) -> Option<&str> {
        self.bindings
            .params
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn binary(&self, op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ScriptError> {
        match (op, lhs, rhs) {
            (BinOp::Add, Value::Str(a), Value::Str(b)) => {
                self.fits(a.len().saturating_add(b.len()))?;
                self.checked(a + &b)
            }
            (BinOp::Add, Value::Int(a), Value::Int(b)) => a
                .checked_add(b)
                .map(Value::Int)
                .ok_or_else(|| ScriptError::Type("integer overflow".into())),
            (BinOp::Add, a, b) => Err(ScriptError::Type(format!(
                "cannot add {} and {}; convert with str()",
                a.type_name(),
                b.type_name()
            ))),
            (BinOp::Eq, a, b) => Ok(Value::Bool(a == b)),
            (BinOp::Ne, a, b) => Ok(Value::Bool(a != b)),
        }
    }

    fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, ScriptError> {
        match name {
            "now" => {
                let format = match args.as_slice() {
                    [] => "%Y-%m-%d".to_string(),
                    [Value::Str(f)] => f.clone(),
                    [other] => return Err(expected("now", "string", other)),
                    _ => return Err(arity("now", "0 or 1", args.len())),
                };
                let mut out = self.writer();
                if write!(out, "{}", chrono::Local::now().format(&format)).is_err() {
                    return Err(if out.overflowed {
                        ScriptError::LengthLimit(self.limits.max_len)
                    } else {
                        ScriptError::Type(format!("invalid date format '{format}'"))
                    });
                }
                self.checked(out.buf)
            }
            "param" => match args.as_slice() {
                [Value::Str(key)] => Ok(Value::Str(self.param(key).unwrap_or_default().into())),
                [Value::Str(key), default] => Ok(self
                    .param(key)
                    .map(|v| Value::Str(v.to_string()))
                    .unwrap_or_else(|| default.clone())),
                [other, ..] if !matches!(other, Value::Str(_)) => {
                    Err(expected("param", "string", other))
                }
                _ => Err(arity("param", "1 or 2", args.len())),
            },
            "str" => match args.as_slice() {
                [v] => self.checked(v.to_string()),
                _ => Err(arity("str", "1", args.len())),
            },
            "if_else" => match <[Value; 3]>::try_from(args) {
                Ok([Value::Bool(cond), a, b]) => Ok(if cond { a } else { b }),
                Ok([other, _, _]) => Err(expected("if_else", "boolean", &other)),
                Err(args) => Err(arity("if_else", "3", args.len())),
            },
            "concat" => {
                let mut out = self.writer();
                for arg in &args {
                    write!(out, "{arg}")
                        .map_err(|_| ScriptError::LengthLimit(self.limits.max_len))?;
                }
                self.checked(out.buf)
            }
            "escape" => match args.as_slice() {
                [Value::Str(s)] => {
                    self.fits(escaped_len(s))?;
                    self.checked(escape_html(s))
                }
                [other] => Err(expected("escape", "string", other)),
                _ => Err(arity("escape", "1", args.len())),
            },
            other => Err(ScriptError::UnknownFunction(other.to_string())),
        }
    }

    fn method(
        &self,
        receiver: Value,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, ScriptError> {
        let s = match receiver {
            Value::Str(s) => s,
            other => {
                return Err(ScriptError::UnknownMethod {
                    receiver: other.type_name(),
                    method: method.to_string(),
                });
            }
        };

        let no_args = |v: Value| {
            if args.is_empty() {
                Ok(v)
            } else {
                Err(arity(method, "0", args.len()))
            }
        };

        match (method, args.as_slice()) {
            ("upper", []) => {
                self.fits(cased_len(&s, |c| c.to_uppercase().map(char::len_utf8).sum()))?;
                self.checked(s.to_uppercase())
            }
            ("lower", []) => {
                self.fits(cased_len(&s, |c| c.to_lowercase().map(char::len_utf8).sum()))?;
                self.checked(s.to_lowercase())
            }
            ("title", []) => {
                self.fits(cased_len(&s, |c| {
                    let upper: usize = c.to_uppercase().map(char::len_utf8).sum();
                    let lower: usize = c.to_lowercase().map(char::len_utf8).sum();
                    upper.max(lower)
                }))?;
                self.checked(title_case(&s))
            }
            ("trim", []) => self.checked(s.trim().to_string()),
            ("len", _) => no_args(Value::Int(s.chars().count() as i64)),
            ("replace", [Value::Str(from), Value::Str(to)]) => {
                if from.is_empty() {
                    return Err(ScriptError::Type("replace() pattern cannot be empty".into()));
                }
                let hits = s.matches(from.as_str()).count();
                let kept = s.len() - hits * from.len();
                self.fits(kept.saturating_add(hits.saturating_mul(to.len())))?;
                self.checked(s.replace(from.as_str(), to))
            }
            ("contains", [Value::Str(needle)]) => Ok(Value::Bool(s.contains(needle.as_str()))),
            ("starts_with", [Value::Str(p)]) => Ok(Value::Bool(s.starts_with(p.as_str()))),
            ("ends_with", [Value::Str(p)]) => Ok(Value::Bool(s.ends_with(p.as_str()))),
            ("or", [default]) => Ok(if s.is_empty() {
                default.clone()
            } else {
                Value::Str(s)
            }),
            ("replace", _) => Err(arity("replace", "2 string", args.len())),
            ("contains" | "starts_with" | "ends_with", _) => {
                Err(arity(method, "1 string", args.len()))
            }
            ("or", _) => Err(arity("or", "1", args.len())),
            ("upper" | "lower" | "title" | "trim", _) => Err(arity(method, "0", args.len())),
            (other, _) => Err(ScriptError::UnknownMethod {
                receiver: "string",
                method: other.to_string(),
            }),
        }
    }
}

fn arity(function: &str, expected: &str, got: usize) -> ScriptError {
    ScriptError::Arity {
        function: function.to_string(),
        expected: expected.to_string(),
        got,
    }
}

fn expected(function: &str, want: &str, got: &Value) -> ScriptError {
    ScriptError::Type(format!(
        "{function}() expects a {want}, got {}",
        got.type_name()
    ))
}

/// `fmt::Write` sink that stops at `max` bytes.
struct BoundedWriter {
    buf: String,
    max: usize,
    overflowed: bool,
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.buf.len().saturating_add(s.len()) > self.max {
            self.overflowed = true;
            return Err(fmt::Error);
        }
        self.buf.push_str(s);
        Ok(())
    }
}

/// Byte length of `s` after mapping every char to `width(c)` bytes.
fn cased_len(s: &str, width: impl Fn(char) -> usize) -> usize {
    s.chars().map(width).fold(0, usize::saturating_add)
}

fn escaped_len(s: &str) -> usize {
    s.bytes().fold(0, |len, b| {
        len.saturating_add(match b {
            b'&' => 5,
            b'<' | b'>' => 4,
            b'"' => 6,
            b'\'' => 5,
            _ => 1,
        })
    })
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("hello WORLD  again"), "Hello World  Again");
    }

    #[test]
    fn escaped_len_matches_output() {
        let s = "<a href=\"x\">'&'</a>";
        assert_eq!(escaped_len(s), escape_html(s).len());
    }

    #[test]
    fn escape_html_specials() {
        assert_eq!(
            escape_html("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }
}
