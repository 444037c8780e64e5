//! Hand-written scanner for the snippet language.

use super::{ScriptError, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Plus,
    Minus,
    Star,
    Slash,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Assign,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

pub fn lex(source: &str) -> Result<Vec<Token>, ScriptError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    col: u32,
    // Newlines inside parens/brackets do not terminate statements.
    depth: u32,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            col: 1,
            depth: 0,
            tokens: Vec::new(),
        }
    }

    fn span(&self) -> Span {
        Span { line: self.line, col: self.col }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens.push(Token { kind, span });
    }

    fn run(mut self) -> Result<Vec<Token>, ScriptError> {
        while let Some(&c) = self.chars.peek() {
            let span = self.span();
            match c {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '\n' | ';' => {
                    self.bump();
                    if self.depth == 0 {
                        self.push(TokenKind::Newline, span);
                    }
                }
                '#' => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                '"' | '\'' => self.string(span)?,
                '0'..='9' => self.number(span)?,
                c if c.is_alphabetic() || c == '_' => self.ident(span),
                _ => self.operator(span)?,
            }
        }
        let span = self.span();
        self.push(TokenKind::Eof, span);
        Ok(self.tokens)
    }

    fn string(&mut self, span: Span) -> Result<(), ScriptError> {
        let quote = self.bump().unwrap_or('"');
        let mut text = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(ScriptError::at(span, "unterminated string literal"));
                }
                Some(c) if c == quote => break,
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c @ ('\\' | '"' | '\'')) => text.push(c),
                    other => {
                        return Err(ScriptError::at(
                            span,
                            format!(
                                "unknown escape sequence '\\{}'",
                                other.map(String::from).unwrap_or_default()
                            ),
                        ));
                    }
                },
                Some(c) => text.push(c),
            }
        }
        self.push(TokenKind::Str(text), span);
        Ok(())
    }

    fn number(&mut self, span: Span) -> Result<(), ScriptError> {
        let mut text = String::new();
        let mut is_float = false;
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.bump();
            } else if c == '.' && !is_float {
                // A dot is part of the number only when a digit follows;
                // otherwise it is a method-call dot (e.g. `5.head()` never
                // occurs, but `df.head` must not eat the dot).
                let mut ahead = self.chars.clone();
                ahead.next();
                if ahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                    is_float = true;
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
        let kind = if is_float {
            TokenKind::Float(
                text.parse()
                    .map_err(|_| ScriptError::at(span, format!("invalid number '{text}'")))?,
            )
        } else {
            TokenKind::Int(
                text.parse()
                    .map_err(|_| ScriptError::at(span, format!("invalid number '{text}'")))?,
            )
        };
        self.push(kind, span);
        Ok(())
    }

    fn ident(&mut self, span: Span) {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let kind = match text.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident(text),
        };
        self.push(kind, span);
    }

    fn operator(&mut self, span: Span) -> Result<(), ScriptError> {
        let c = self.bump().unwrap_or_default();
        let next_is = |lexer: &mut Self, expected: char| {
            if lexer.chars.peek() == Some(&expected) {
                lexer.bump();
                true
            } else {
                false
            }
        };
        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '(' => {
                self.depth += 1;
                TokenKind::LParen
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RParen
            }
            '[' => {
                self.depth += 1;
                TokenKind::LBracket
            }
            ']' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RBracket
            }
            '=' => {
                if next_is(self, '=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if next_is(self, '=') {
                    TokenKind::NotEq
                } else {
                    return Err(ScriptError::at(span, "unexpected character '!'"));
                }
            }
            '<' => {
                if next_is(self, '=') {
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if next_is(self, '=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            other => {
                return Err(ScriptError::at(span, format!("unexpected character '{other}'")));
            }
        };
        self.push(kind, span);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_a_method_call() {
        assert_eq!(
            kinds("print(df.head())"),
            vec![
                TokenKind::Ident("print".into()),
                TokenKind::LParen,
                TokenKind::Ident("df".into()),
                TokenKind::Dot,
                TokenKind::Ident("head".into()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_numbers_and_strings() {
        assert_eq!(
            kinds("x = 1.5 + 2\ny = \"a b\""),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Float(1.5),
                TokenKind::Plus,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Ident("y".into()),
                TokenKind::Assign,
                TokenKind::Str("a b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newlines_inside_brackets_do_not_break_statements() {
        let toks = kinds("plt.scatter(df[\"a\"],\n    df[\"b\"])");
        assert!(!toks.contains(&TokenKind::Newline));
    }

    #[test]
    fn comments_and_semicolons() {
        assert_eq!(
            kinds("# a comment\nx = 1; y = 2"),
            vec![
                TokenKind::Newline,
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Ident("y".into()),
                TokenKind::Assign,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_positioned() {
        let err = lex("x = \"oops").unwrap_err();
        assert_eq!(err.span.map(|s| (s.line, s.col)), Some((1, 5)));
    }

    #[test]
    fn comparison_operators() {
        assert_eq!(
            kinds("a >= 1 == 2 != 3"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ge,
                TokenKind::Int(1),
                TokenKind::EqEq,
                TokenKind::Int(2),
                TokenKind::NotEq,
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }
}
