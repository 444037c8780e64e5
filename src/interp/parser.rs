//! Recursive-descent parser producing the statement list.

use crate::dataset::{ArithOp, CmpOp};

use super::lexer::{Token, TokenKind};
use super::{Expr, ExprKind, ScriptError, Stmt};

pub fn parse(tokens: Vec<Token>) -> Result<Vec<Stmt>, ScriptError> {
    Parser { tokens, pos: 0 }.program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, ScriptError> {
        if &self.peek().kind == kind {
            Ok(self.bump())
        } else {
            Err(ScriptError::at(self.peek().span, format!("expected {what}")))
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline) {
            self.bump();
        }
    }

    fn program(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if matches!(self.peek().kind, TokenKind::Eof) {
                return Ok(stmts);
            }
            stmts.push(self.statement()?);
            match self.peek().kind {
                TokenKind::Newline | TokenKind::Eof => {}
                _ => {
                    return Err(ScriptError::at(
                        self.peek().span,
                        "expected end of statement",
                    ));
                }
            }
        }
    }

    fn statement(&mut self) -> Result<Stmt, ScriptError> {
        let expr = self.expression()?;
        if !matches!(self.peek().kind, TokenKind::Assign) {
            return Ok(Stmt::Expr(expr));
        }
        let span = self.bump().span;
        let value = self.expression()?;
        match expr.kind {
            ExprKind::Ident(name) => Ok(Stmt::Assign { name, value, span }),
            ExprKind::Index { recv, index } => Ok(Stmt::IndexAssign {
                recv: *recv,
                index: *index,
                value,
                span,
            }),
            _ => Err(ScriptError::at(
                span,
                "only names and bracket expressions can be assigned to",
            )),
        }
    }

    fn expression(&mut self) -> Result<Expr, ScriptError> {
        let lhs = self.additive()?;
        let op = match self.peek().kind {
            TokenKind::EqEq => CmpOp::Eq,
            TokenKind::NotEq => CmpOp::Ne,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Le => CmpOp::Le,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::Ge => CmpOp::Ge,
            _ => return Ok(lhs),
        };
        let span = self.bump().span;
        let rhs = self.additive()?;
        Ok(Expr {
            kind: ExprKind::Compare { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
            span,
        })
    }

    fn additive(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => ArithOp::Add,
                TokenKind::Minus => ArithOp::Sub,
                _ => return Ok(lhs),
            };
            let span = self.bump().span;
            let rhs = self.term()?;
            lhs = Expr {
                kind: ExprKind::Arith { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            };
        }
    }

    fn term(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => ArithOp::Mul,
                TokenKind::Slash => ArithOp::Div,
                _ => return Ok(lhs),
            };
            let span = self.bump().span;
            let rhs = self.unary()?;
            lhs = Expr {
                kind: ExprKind::Arith { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, ScriptError> {
        if matches!(self.peek().kind, TokenKind::Minus) {
            let span = self.bump().span;
            let inner = self.unary()?;
            return Ok(Expr { kind: ExprKind::Neg(Box::new(inner)), span });
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    let span = self.bump().span;
                    let name = self.ident("method name")?;
                    self.expect(&TokenKind::LParen, "'(' after method name")?;
                    let args = self.arguments()?;
                    expr = Expr {
                        kind: ExprKind::Method { recv: Box::new(expr), name, args },
                        span,
                    };
                }
                TokenKind::LParen => {
                    let span = self.bump().span;
                    let args = self.arguments()?;
                    expr = Expr {
                        kind: ExprKind::Call { callee: Box::new(expr), args },
                        span,
                    };
                }
                TokenKind::LBracket => {
                    let span = self.bump().span;
                    let index = self.expression()?;
                    self.expect(&TokenKind::RBracket, "']'")?;
                    expr = Expr {
                        kind: ExprKind::Index {
                            recv: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated expressions up to a closing paren (already past the
    /// opening one).
    fn arguments(&mut self) -> Result<Vec<Expr>, ScriptError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RParen, "')' or ','")?;
            return Ok(args);
        }
    }

    fn primary(&mut self) -> Result<Expr, ScriptError> {
        let token = self.bump();
        let span = token.span;
        let kind = match token.kind {
            TokenKind::Int(v) => ExprKind::Int(v),
            TokenKind::Float(v) => ExprKind::Float(v),
            TokenKind::Str(v) => ExprKind::Str(v),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LParen => {
                let inner = self.expression()?;
                self.expect(&TokenKind::RParen, "')'")?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                let mut items = Vec::new();
                if !self.eat(&TokenKind::RBracket) {
                    loop {
                        items.push(self.expression()?);
                        if self.eat(&TokenKind::Comma) {
                            continue;
                        }
                        self.expect(&TokenKind::RBracket, "']' or ','")?;
                        break;
                    }
                }
                ExprKind::List(items)
            }
            TokenKind::Eof => {
                return Err(ScriptError::at(span, "unexpected end of snippet"));
            }
            other => {
                return Err(ScriptError::at(span, format!("unexpected token {other:?}")));
            }
        };
        Ok(Expr { kind, span })
    }

    fn ident(&mut self, what: &str) -> Result<String, ScriptError> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.bump();
                Ok(name)
            }
            _ => Err(ScriptError::at(self.peek().span, format!("expected {what}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    fn one(source: &str) -> Stmt {
        let mut stmts = parse(source).unwrap();
        assert_eq!(stmts.len(), 1, "expected one statement in {source:?}");
        stmts.remove(0)
    }

    #[test]
    fn parses_call_with_method_receiver() {
        let stmt = one("print(df.head())");
        let Stmt::Expr(expr) = stmt else { panic!("expected expression") };
        let ExprKind::Call { callee, args } = expr.kind else { panic!("expected call") };
        assert_eq!(callee.kind, ExprKind::Ident("print".into()));
        assert_eq!(args.len(), 1);
        assert!(matches!(args[0].kind, ExprKind::Method { .. }));
    }

    #[test]
    fn parses_assignment_and_index_assignment() {
        assert!(matches!(one("x = 1 + 2"), Stmt::Assign { .. }));
        assert!(matches!(one("df[\"new\"] = df[\"a\"] * 2"), Stmt::IndexAssign { .. }));
    }

    #[test]
    fn rejects_assignment_to_literals() {
        assert!(parse("1 = 2").is_err());
    }

    #[test]
    fn precedence_binds_products_tighter() {
        let Stmt::Expr(expr) = one("1 + 2 * 3") else { panic!() };
        let ExprKind::Arith { op, rhs, .. } = expr.kind else { panic!() };
        assert_eq!(op, ArithOp::Add);
        assert!(matches!(rhs.kind, ExprKind::Arith { op: ArithOp::Mul, .. }));
    }

    #[test]
    fn comparison_is_lowest_precedence() {
        let Stmt::Expr(expr) = one("df[\"a\"] + 1 > 10") else { panic!() };
        assert!(matches!(expr.kind, ExprKind::Compare { op: CmpOp::Gt, .. }));
    }

    #[test]
    fn mask_index_parses_nested() {
        let Stmt::Expr(expr) = one("df[df[\"a\"] > 10]") else { panic!() };
        let ExprKind::Index { index, .. } = expr.kind else { panic!() };
        assert!(matches!(index.kind, ExprKind::Compare { .. }));
    }

    #[test]
    fn list_index_parses() {
        let Stmt::Expr(expr) = one("df[[\"a\", \"b\"]]") else { panic!() };
        let ExprKind::Index { index, .. } = expr.kind else { panic!() };
        assert!(matches!(index.kind, ExprKind::List(_)));
    }

    #[test]
    fn multiple_statements_split_on_newlines() {
        let stmts = parse("x = 1\n\ny = x + 1\nprint(y)").unwrap();
        assert_eq!(stmts.len(), 3);
    }

    #[test]
    fn errors_carry_position() {
        let err = parse("print(]").unwrap_err();
        assert_eq!(err.span.map(|s| s.line), Some(1));
    }
}
