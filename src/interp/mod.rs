//! The snippet language: lexer, parser, and evaluator.
//!
//! Snippets are statement lists over a small expression language with
//! frames and columns as first-class values. Evaluation happens in an
//! explicit environment that binds exactly the capability set handed to a
//! run (`print`, `df`, `plt`, `num`) plus whatever names the snippet
//! introduces; the retained bindings are inspected afterwards by the
//! runner.

use thiserror::Error;

use crate::dataset::{ArithOp, CmpOp, Column, Frame, Grouped};

mod eval;
mod lexer;
mod parser;

pub use eval::{format_value, Evaluator};

/// Source position, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub col: u32,
}

/// Any lexing, parsing, or evaluation failure, with the source position
/// where it was raised when one is known.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ScriptError {
    pub message: String,
    pub span: Option<Span>,
}

impl ScriptError {
    pub fn at(span: Span, message: impl Into<String>) -> Self {
        Self { message: message.into(), span: Some(span) }
    }

    pub fn unpositioned(message: impl Into<String>) -> Self {
        Self { message: message.into(), span: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    List(Vec<Expr>),
    Ident(String),
    Neg(Box<Expr>),
    Arith { op: ArithOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Compare { op: CmpOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Method { recv: Box<Expr>, name: String, args: Vec<Expr> },
    Index { recv: Box<Expr>, index: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { name: String, value: Expr, span: Span },
    IndexAssign { recv: Expr, index: Expr, value: Expr, span: Span },
    Expr(Expr),
}

/// Parse a snippet into its statement list.
pub fn parse(source: &str) -> Result<Vec<Stmt>, ScriptError> {
    parser::parse(lexer::lex(source)?)
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Frame(Frame),
    Column(Column),
    Grouped(Grouped),
    /// The `print` capability.
    Print,
    /// The `plt` capability.
    Plot,
    /// The `num` capability.
    Num,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Frame(_) => "frame",
            Value::Column(_) => "column",
            Value::Grouped(_) => "grouped frame",
            Value::Print => "print",
            Value::Plot => "plot handle",
            Value::Num => "numeric handle",
        }
    }

    /// Whether the value renders as a table.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Value::Frame(_) | Value::Column(_))
    }
}

/// The evaluation environment: the fixed capability bindings plus the
/// snippet's own bindings. Lookup prefers snippet bindings, so a snippet
/// may shadow a capability; assignment always lands in the snippet layer,
/// which is what the runner scans afterwards.
#[derive(Debug, Clone)]
pub struct Env {
    caps: Vec<(String, Value)>,
    vars: Vec<(String, Value)>,
}

impl Env {
    /// The standard capability set over a dataset.
    pub fn with_capabilities(frame: Frame) -> Self {
        Self {
            caps: vec![
                ("print".to_string(), Value::Print),
                ("df".to_string(), Value::Frame(frame)),
                ("plt".to_string(), Value::Plot),
                ("num".to_string(), Value::Num),
            ],
            vars: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .or_else(|| self.caps.iter().find(|(n, _)| n == name))
            .map(|(_, v)| v)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        match self.vars.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.vars.push((name.to_string(), value)),
        }
    }

    /// Bindings the snippet itself introduced (or rebound), in insertion
    /// order. Capability bindings never appear here.
    pub fn user_bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn frame() -> Frame {
        Frame::new(vec![Column::new("a", vec![Cell::Int(1)])])
    }

    #[test]
    fn capability_lookup_and_shadowing() {
        let mut env = Env::with_capabilities(frame());
        assert!(matches!(env.get("df"), Some(Value::Frame(_))));
        assert!(matches!(env.get("print"), Some(Value::Print)));
        assert!(env.get("missing").is_none());

        env.set("df", Value::Int(1));
        assert!(matches!(env.get("df"), Some(Value::Int(1))));
        let names: Vec<&str> = env.user_bindings().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["df"]);
    }

    #[test]
    fn user_bindings_keep_insertion_order() {
        let mut env = Env::with_capabilities(frame());
        env.set("x", Value::Int(1));
        env.set("y", Value::Int(2));
        env.set("x", Value::Int(3));
        let names: Vec<&str> = env.user_bindings().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}
