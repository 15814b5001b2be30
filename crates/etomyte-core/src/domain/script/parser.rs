//! Recursive-descent parser for snippet scripts.
//!
//! ```text
//! program  := (stmt? SEP)* EOF
//! stmt     := IDENT '=' expr | expr
//! expr     := additive (('==' | '!=') additive)*
//! additive := postfix ('+' postfix)*
//! postfix  := primary ('.' IDENT '(' args ')')*
//! primary  := STR | INT | 'true' | 'false'
//!           | 'app' '.' IDENT
//!           | IDENT ('(' args ')')?
//!           | '(' expr ')'
//! ```
//!
//! Expressions deeper than [`MAX_DEPTH`] are a syntax error. Parsing,
//! evaluation and drop of the tree all recurse on it.

use crate::domain::error::ScriptError;

use super::lexer::{Pos, Tok, Token};

/// Name of the read-only application binding.
pub const APP_BINDING: &str = "app";

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { name: String, value: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Bool(bool),
    Var {
        name: String,
        pos: Pos,
    },
    App {
        key: String,
        pos: Pos,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        pos: Pos,
    },
    Method {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
        pos: Pos,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Deepest expression a script may contain, counting both the nodes of the
/// tree (operators, calls, method chains) and parenthesised groups.
pub const MAX_DEPTH: usize = 64;

/// An expression and the height of its tree.
type Parsed = Result<(Expr, usize), ScriptError>;

pub fn parse(tokens: Vec<Token>) -> Result<Vec<Stmt>, ScriptError> {
    let mut parser = Parser {
        tokens,
        idx: 0,
        nesting: 0,
    };
    parser.program()
}

struct Parser {
    tokens: Vec<Token>,
    idx: usize,
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        &self.tokens[self.idx.min(self.tokens.len() - 1)].tok
    }

    fn peek_at(&self, offset: usize) -> &Tok {
        &self.tokens[(self.idx + offset).min(self.tokens.len() - 1)].tok
    }

    fn pos(&self) -> Pos {
        self.tokens[self.idx.min(self.tokens.len() - 1)].pos
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.idx.min(self.tokens.len() - 1)].clone();
        if self.idx < self.tokens.len() - 1 {
            self.idx += 1;
        }
        token
    }

    fn expect(&mut self, want: Tok, what: &str) -> Result<(), ScriptError> {
        if *self.peek() == want {
            self.advance();
            Ok(())
        } else {
            Err(self.pos().error(format!("expected {what}")))
        }
    }

    fn too_deep(pos: Pos) -> ScriptError {
        pos.error(format!("expression nested deeper than {MAX_DEPTH} levels"))
    }

    /// Height of a new node whose deepest child has height `child`.
    fn node(child: usize, pos: Pos) -> Result<usize, ScriptError> {
        let depth = child + 1;
        if depth > MAX_DEPTH {
            return Err(Self::too_deep(pos));
        }
        Ok(depth)
    }

    /// Parse a sub-expression one nesting level down.
    fn nested(&mut self) -> Parsed {
        let pos = self.pos();
        self.nesting += 1;
        if self.nesting + 1 > MAX_DEPTH {
            return Err(Self::too_deep(pos));
        }
        let parsed = self.expr();
        self.nesting -= 1;
        parsed
    }

    fn program(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                Tok::Eof => break,
                Tok::Sep => {
                    self.advance();
                }
                _ => {
                    stmts.push(self.stmt()?);
                    match self.peek() {
                        Tok::Sep | Tok::Eof => {}
                        _ => return Err(self.pos().error("expected end of statement")),
                    }
                }
            }
        }
        Ok(stmts)
    }

    fn stmt(&mut self) -> Result<Stmt, ScriptError> {
        if let (Tok::Ident(name), Tok::Assign) = (self.peek(), self.peek_at(1)) {
            let name = name.clone();
            let pos = self.pos();
            if name == APP_BINDING {
                return Err(pos.error("'app' is read-only"));
            }
            self.advance();
            self.advance();
            let (value, _) = self.expr()?;
            return Ok(Stmt::Assign { name, value });
        }
        let (expr, _) = self.expr()?;
        Ok(Stmt::Expr(expr))
    }

    fn expr(&mut self) -> Parsed {
        let (mut lhs, mut depth) = self.additive()?;
        loop {
            let op = match self.peek() {
                Tok::EqEq => BinOp::Eq,
                Tok::NotEq => BinOp::Ne,
                _ => return Ok((lhs, depth)),
            };
            let pos = self.pos();
            self.advance();
            let (rhs, rhs_depth) = self.additive()?;
            depth = Self::node(depth.max(rhs_depth), pos)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn additive(&mut self) -> Parsed {
        let (mut lhs, mut depth) = self.postfix()?;
        while *self.peek() == Tok::Plus {
            let pos = self.pos();
            self.advance();
            let (rhs, rhs_depth) = self.postfix()?;
            depth = Self::node(depth.max(rhs_depth), pos)?;
            lhs = Expr::Binary {
                op: BinOp::Add,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok((lhs, depth))
    }

    fn postfix(&mut self) -> Parsed {
        let (mut expr, mut depth) = self.primary()?;
        while *self.peek() == Tok::Dot {
            self.advance();
            let pos = self.pos();
            let method = match self.advance().tok {
                Tok::Ident(name) => name,
                _ => return Err(pos.error("expected method name after '.'")),
            };
            if *self.peek() != Tok::LParen {
                return Err(self.pos().error(format!("expected '(' after '.{method}'")));
            }
            let (args, args_depth) = self.args()?;
            depth = Self::node(depth.max(args_depth), pos)?;
            expr = Expr::Method {
                receiver: Box::new(expr),
                method,
                args,
                pos,
            };
        }
        Ok((expr, depth))
    }

    fn primary(&mut self) -> Parsed {
        let Token { tok, pos } = self.advance();
        let leaf = |expr: Expr| -> Parsed { Ok((expr, 1)) };
        match tok {
            Tok::Str(s) => leaf(Expr::Str(s)),
            Tok::Int(n) => leaf(Expr::Int(n)),
            Tok::True => leaf(Expr::Bool(true)),
            Tok::False => leaf(Expr::Bool(false)),
            Tok::Ident(name) if name == APP_BINDING => {
                self.expect(Tok::Dot, "'.' after 'app'")?;
                let key_pos = self.pos();
                match self.advance().tok {
                    Tok::Ident(key) => leaf(Expr::App { key, pos: key_pos }),
                    _ => Err(key_pos.error("expected key after 'app.'")),
                }
            }
            Tok::Ident(name) => {
                if *self.peek() == Tok::LParen {
                    let (args, args_depth) = self.args()?;
                    Ok((Expr::Call { name, args, pos }, Self::node(args_depth, pos)?))
                } else {
                    leaf(Expr::Var { name, pos })
                }
            }
            Tok::LParen => {
                let inner = self.nested()?;
                self.expect(Tok::RParen, "')'")?;
                Ok(inner)
            }
            Tok::Eof => Err(pos.error("unexpected end of script")),
            other => Err(pos.error(format!("unexpected token {other:?}"))),
        }
    }

    /// Argument list and the height of its deepest argument.
    fn args(&mut self) -> Result<(Vec<Expr>, usize), ScriptError> {
        self.expect(Tok::LParen, "'('")?;
        let mut args = Vec::new();
        let mut depth = 0;
        if *self.peek() == Tok::RParen {
            self.advance();
            return Ok((args, depth));
        }
        loop {
            let (arg, arg_depth) = self.nested()?;
            args.push(arg);
            depth = depth.max(arg_depth);
            match self.peek() {
                Tok::Comma => {
                    self.advance();
                }
                Tok::RParen => {
                    self.advance();
                    return Ok((args, depth));
                }
                _ => return Err(self.pos().error("expected ',' or ')'")),
            }
        }
    }
}
