//! Tokenizer for snippet scripts.

use crate::domain::error::ScriptError;

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub(crate) fn error(self, message: impl Into<String>) -> ScriptError {
        ScriptError::Syntax {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tok {
    Ident(String),
    Str(String),
    Int(i64),
    True,
    False,
    Assign,
    EqEq,
    NotEq,
    Plus,
    Dot,
    Comma,
    LParen,
    RParen,
    /// Newline or `;`.
    Sep,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub tok: Tok,
    pub pos: Pos,
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, ScriptError> {
    let mut lexer = Lexer {
        chars: src.chars().collect(),
        idx: 0,
        line: 1,
        column: 1,
    };
    lexer.run()
}

struct Lexer {
    chars: Vec<char>,
    idx: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.idx).copied()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn run(&mut self) -> Result<Vec<Token>, ScriptError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            let pos = self.pos();
            let tok = match c {
                ' ' | '\t' | '\r' => {
                    self.bump();
                    continue;
                }
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                    continue;
                }
                '\n' | ';' => {
                    self.bump();
                    Tok::Sep
                }
                '"' | '\'' => self.string(c)?,
                '0'..='9' => self.int()?,
                c if c.is_alphabetic() || c == '_' => self.word(),
                '=' => {
                    self.bump();
                    if self.peek() == Some('=') {
                        self.bump();
                        Tok::EqEq
                    } else {
                        Tok::Assign
                    }
                }
                '!' => {
                    self.bump();
                    if self.peek() == Some('=') {
                        self.bump();
                        Tok::NotEq
                    } else {
                        return Err(pos.error("expected '=' after '!'"));
                    }
                }
                '+' => self.single(Tok::Plus),
                '.' => self.single(Tok::Dot),
                ',' => self.single(Tok::Comma),
                '(' => self.single(Tok::LParen),
                ')' => self.single(Tok::RParen),
                other => return Err(pos.error(format!("unexpected character '{other}'"))),
            };
            tokens.push(Token { tok, pos });
        }
        tokens.push(Token {
            tok: Tok::Eof,
            pos: self.pos(),
        });
        Ok(tokens)
    }

    fn single(&mut self, tok: Tok) -> Tok {
        self.bump();
        tok
    }

    fn string(&mut self, quote: char) -> Result<Tok, ScriptError> {
        let start = self.pos();
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(start.error("unterminated string literal")),
                Some(c) if c == quote => return Ok(Tok::Str(out)),
                Some('\\') => {
                    let esc_pos = self.pos();
                    match self.bump() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some('\\') => out.push('\\'),
                        Some('"') => out.push('"'),
                        Some('\'') => out.push('\''),
                        Some(other) => {
                            return Err(esc_pos.error(format!("unknown escape '\\{other}'")));
                        }
                        None => return Err(start.error("unterminated string literal")),
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn int(&mut self) -> Result<Tok, ScriptError> {
        let start = self.pos();
        let mut digits = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            digits.push(c);
            self.bump();
        }
        digits
            .parse()
            .map(Tok::Int)
            .map_err(|_| start.error(format!("integer literal '{digits}' is out of range")))
    }

    fn word(&mut self) -> Tok {
        let mut word = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            word.push(c);
            self.bump();
        }
        match word.as_str() {
            "true" => Tok::True,
            "false" => Tok::False,
            _ => Tok::Ident(word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Tok> {
        tokenize(src).unwrap().into_iter().map(|t| t.tok).collect()
    }

    #[test]
    fn assignment_tokens() {
        assert_eq!(
            kinds("result = a.upper()"),
            vec![
                Tok::Ident("result".into()),
                Tok::Assign,
                Tok::Ident("a".into()),
                Tok::Dot,
                Tok::Ident("upper".into()),
                Tok::LParen,
                Tok::RParen,
                Tok::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\n""#),
            vec![Tok::Str("a\"b\n".into()), Tok::Eof]
        );
        assert_eq!(kinds("'it\\'s'"), vec![Tok::Str("it's".into()), Tok::Eof]);
    }

    #[test]
    fn comments_and_separators() {
        assert_eq!(
            kinds("# header\nx = 1; y = 2"),
            vec![
                Tok::Sep,
                Tok::Ident("x".into()),
                Tok::Assign,
                Tok::Int(1),
                Tok::Sep,
                Tok::Ident("y".into()),
                Tok::Assign,
                Tok::Int(2),
                Tok::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = tokenize("x = \"abc").unwrap_err();
        assert_eq!(
            err,
            ScriptError::Syntax {
                line: 1,
                column: 5,
                message: "unterminated string literal".into()
            }
        );
    }

    #[test]
    fn comparison_operators() {
        assert_eq!(
            kinds("a == b != c"),
            vec![
                Tok::Ident("a".into()),
                Tok::EqEq,
                Tok::Ident("b".into()),
                Tok::NotEq,
                Tok::Ident("c".into()),
                Tok::Eof,
            ]
        );
    }
}
