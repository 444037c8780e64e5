//! Tree-walking evaluator for the snippet language.

use crate::chart::{histogram, FigureKind, FigureRegistry};
use crate::dataset::{
    format_float, ArithOp, Cell, CmpOp, Column, Frame, RenderOptions,
};

use super::{Env, Expr, ExprKind, ScriptError, Span, Stmt, Value};

/// Evaluates statements against an environment, writing `print` output to
/// the sink and figures to the registry. Both are borrowed from the
/// caller, so the evaluator itself holds no cross-run state.
pub struct Evaluator<'a> {
    sink: &'a mut String,
    figures: &'a mut FigureRegistry,
    render: RenderOptions,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        sink: &'a mut String,
        figures: &'a mut FigureRegistry,
        render: RenderOptions,
    ) -> Self {
        Self { sink, figures, render }
    }

    pub fn run(&mut self, stmts: &[Stmt], env: &mut Env) -> Result<(), ScriptError> {
        for stmt in stmts {
            self.stmt(stmt, env)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt, env: &mut Env) -> Result<(), ScriptError> {
        match stmt {
            Stmt::Assign { name, value, .. } => {
                let value = self.expr(value, env)?;
                env.set(name, value);
                Ok(())
            }
            Stmt::IndexAssign { recv, index, value, span } => {
                self.index_assign(recv, index, value, *span, env)
            }
            Stmt::Expr(expr) => {
                self.expr(expr, env)?;
                Ok(())
            }
        }
    }

    /// `name[index] = value`: derived-column assignment on a frame binding.
    fn index_assign(
        &mut self,
        recv: &Expr,
        index: &Expr,
        value: &Expr,
        span: Span,
        env: &mut Env,
    ) -> Result<(), ScriptError> {
        let ExprKind::Ident(name) = &recv.kind else {
            return Err(ScriptError::at(span, "assignment target must be a name"));
        };
        let Some(Value::Frame(frame)) = env.get(name).cloned() else {
            return Err(ScriptError::at(
                span,
                format!("'{name}' is not a frame; only frame columns can be assigned"),
            ));
        };
        let Value::Str(column) = self.expr(index, env)? else {
            return Err(ScriptError::at(span, "column assignment needs a string index"));
        };
        let cells = match self.expr(value, env)? {
            Value::Column(col) => col.cells,
            Value::List(items) => items
                .iter()
                .map(|v| {
                    value_to_cell(v).ok_or_else(|| {
                        ScriptError::at(span, format!("cannot store a {} in a column", v.type_name()))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            scalar => {
                let cell = value_to_cell(&scalar).ok_or_else(|| {
                    ScriptError::at(
                        span,
                        format!("cannot store a {} in a column", scalar.type_name()),
                    )
                })?;
                vec![cell; frame.n_rows()]
            }
        };
        let updated = frame
            .with_column(&column, cells)
            .map_err(|e| ScriptError::at(span, e.to_string()))?;
        env.set(name, Value::Frame(updated));
        Ok(())
    }

    fn expr(&mut self, expr: &Expr, env: &mut Env) -> Result<Value, ScriptError> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Int(v) => Ok(Value::Int(*v)),
            ExprKind::Float(v) => Ok(Value::Float(*v)),
            ExprKind::Str(v) => Ok(Value::Str(v.clone())),
            ExprKind::Bool(v) => Ok(Value::Bool(*v)),
            ExprKind::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.expr(item, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(values))
            }
            ExprKind::Ident(name) => env
                .get(name)
                .cloned()
                .ok_or_else(|| ScriptError::at(span, format!("name '{name}' is not defined"))),
            ExprKind::Neg(inner) => {
                let value = self.expr(inner, env)?;
                match value {
                    Value::Int(v) => Ok(Value::Int(-v)),
                    Value::Float(v) => Ok(Value::Float(-v)),
                    Value::Column(col) => col
                        .arith_scalar(ArithOp::Mul, &Cell::Int(-1), false)
                        .map(Value::Column)
                        .map_err(|e| ScriptError::at(span, e.to_string())),
                    other => Err(ScriptError::at(
                        span,
                        format!("cannot negate a {}", other.type_name()),
                    )),
                }
            }
            ExprKind::Arith { op, lhs, rhs } => {
                let lhs = self.expr(lhs, env)?;
                let rhs = self.expr(rhs, env)?;
                self.arith(*op, lhs, rhs, span)
            }
            ExprKind::Compare { op, lhs, rhs } => {
                let lhs = self.expr(lhs, env)?;
                let rhs = self.expr(rhs, env)?;
                self.compare(*op, lhs, rhs, span)
            }
            ExprKind::Call { callee, args } => {
                let callee = self.expr(callee, env)?;
                match callee {
                    Value::Print => {
                        let rendered = args
                            .iter()
                            .map(|arg| {
                                self.expr(arg, env).map(|v| format_value(&v, &self.render))
                            })
                            .collect::<Result<Vec<_>, _>>()?;
                        self.sink.push_str(&rendered.join(" "));
                        self.sink.push('\n');
                        Ok(Value::Unit)
                    }
                    other => Err(ScriptError::at(
                        span,
                        format!("a {} is not callable", other.type_name()),
                    )),
                }
            }
            ExprKind::Method { recv, name, args } => {
                let recv = self.expr(recv, env)?;
                let args = args
                    .iter()
                    .map(|arg| self.expr(arg, env))
                    .collect::<Result<Vec<_>, _>>()?;
                self.method(recv, name, args, span)
            }
            ExprKind::Index { recv, index } => {
                let recv = self.expr(recv, env)?;
                let index = self.expr(index, env)?;
                self.index(recv, index, span)
            }
        }
    }

    fn arith(&self, op: ArithOp, lhs: Value, rhs: Value, span: Span) -> Result<Value, ScriptError> {
        let fail = |e: crate::dataset::FrameError| ScriptError::at(span, e.to_string());
        match (&lhs, &rhs) {
            (Value::Column(a), Value::Column(b)) => {
                a.arith(op, b).map(Value::Column).map_err(fail)
            }
            (Value::Column(a), _) => {
                let cell = value_to_cell(&rhs).ok_or_else(|| type_err(op, &lhs, &rhs, span))?;
                a.arith_scalar(op, &cell, false).map(Value::Column).map_err(fail)
            }
            (_, Value::Column(b)) => {
                let cell = value_to_cell(&lhs).ok_or_else(|| type_err(op, &lhs, &rhs, span))?;
                b.arith_scalar(op, &cell, true).map(Value::Column).map_err(fail)
            }
            (Value::Int(a), Value::Int(b)) => Ok(match op {
                ArithOp::Add => Value::Int(a + b),
                ArithOp::Sub => Value::Int(a - b),
                ArithOp::Mul => Value::Int(a * b),
                ArithOp::Div => Value::Float(*a as f64 / *b as f64),
            }),
            (Value::Str(a), Value::Str(b)) if op == ArithOp::Add => {
                Ok(Value::Str(format!("{a}{b}")))
            }
            _ => match (as_f64(&lhs), as_f64(&rhs)) {
                (Some(a), Some(b)) => Ok(Value::Float(match op {
                    ArithOp::Add => a + b,
                    ArithOp::Sub => a - b,
                    ArithOp::Mul => a * b,
                    ArithOp::Div => a / b,
                })),
                _ => Err(type_err(op, &lhs, &rhs, span)),
            },
        }
    }

    fn compare(&self, op: CmpOp, lhs: Value, rhs: Value, span: Span) -> Result<Value, ScriptError> {
        let fail = |e: crate::dataset::FrameError| ScriptError::at(span, e.to_string());
        match (&lhs, &rhs) {
            (Value::Column(a), Value::Column(b)) => {
                a.compare(op, b).map(Value::Column).map_err(fail)
            }
            (Value::Column(a), _) => {
                let cell = value_to_cell(&rhs).ok_or_else(|| cmp_err(&lhs, &rhs, span))?;
                Ok(Value::Column(a.compare_scalar(op, &cell)))
            }
            (_, Value::Column(b)) => {
                let cell = value_to_cell(&lhs).ok_or_else(|| cmp_err(&lhs, &rhs, span))?;
                Ok(Value::Column(b.compare_scalar(flip(op), &cell)))
            }
            (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(cmp_ordering(op, a.cmp(b)))),
            (Value::Bool(a), Value::Bool(b)) => match op {
                CmpOp::Eq => Ok(Value::Bool(a == b)),
                CmpOp::Ne => Ok(Value::Bool(a != b)),
                _ => Err(cmp_err(&lhs, &rhs, span)),
            },
            _ => match (as_f64(&lhs), as_f64(&rhs)) {
                (Some(a), Some(b)) => {
                    let ord = a.partial_cmp(&b);
                    Ok(Value::Bool(match (op, ord) {
                        (CmpOp::Ne, None) => true,
                        (_, None) => false,
                        (op, Some(ord)) => cmp_ordering(op, ord),
                    }))
                }
                _ => Err(cmp_err(&lhs, &rhs, span)),
            },
        }
    }

    fn index(&self, recv: Value, index: Value, span: Span) -> Result<Value, ScriptError> {
        let fail = |e: crate::dataset::FrameError| ScriptError::at(span, e.to_string());
        match (recv, index) {
            (Value::Frame(frame), Value::Str(name)) => {
                frame.column(&name).cloned().map(Value::Column).map_err(fail)
            }
            (Value::Frame(frame), Value::List(items)) => {
                let names = items
                    .iter()
                    .map(|v| match v {
                        Value::Str(s) => Ok(s.clone()),
                        other => Err(ScriptError::at(
                            span,
                            format!("column list must hold strings, not {}", other.type_name()),
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                frame.select(&names).map(Value::Frame).map_err(fail)
            }
            (Value::Frame(frame), Value::Column(mask)) => {
                frame.filter(&mask).map(Value::Frame).map_err(fail)
            }
            (Value::Column(col), Value::Int(i)) => {
                let i = usize::try_from(i)
                    .ok()
                    .filter(|&i| i < col.len())
                    .ok_or_else(|| {
                        ScriptError::at(span, format!("row {i} is out of range (0..{})", col.len()))
                    })?;
                Ok(cell_to_value(&col.cells[i]))
            }
            (recv, index) => Err(ScriptError::at(
                span,
                format!(
                    "cannot index a {} with a {}",
                    recv.type_name(),
                    index.type_name()
                ),
            )),
        }
    }

    fn method(
        &mut self,
        recv: Value,
        name: &str,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, ScriptError> {
        match recv {
            Value::Frame(frame) => self.frame_method(frame, name, args, span),
            Value::Column(col) => self.column_method(col, name, args, span),
            Value::Grouped(grouped) => {
                let fail = |e: crate::dataset::FrameError| ScriptError::at(span, e.to_string());
                match name {
                    "mean" => {
                        let col = one_str(&args, span, "groupby mean expects a column name")?;
                        grouped.mean(&col).map(Value::Frame).map_err(fail)
                    }
                    "sum" => {
                        let col = one_str(&args, span, "groupby sum expects a column name")?;
                        grouped.sum(&col).map(Value::Frame).map_err(fail)
                    }
                    "count" => grouped.count().map(Value::Frame).map_err(fail),
                    _ => Err(unknown_method("grouped frame", name, span)),
                }
            }
            Value::Plot => self.plot_method(name, args, span),
            Value::Num => num_method(name, &args, span),
            other => Err(unknown_method(other.type_name(), name, span)),
        }
    }

    fn frame_method(
        &mut self,
        frame: Frame,
        name: &str,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, ScriptError> {
        let fail = |e: crate::dataset::FrameError| ScriptError::at(span, e.to_string());
        match name {
            "head" => {
                let n = match args.first() {
                    None => 5,
                    Some(Value::Int(n)) => usize::try_from(*n).unwrap_or(0),
                    Some(other) => {
                        return Err(ScriptError::at(
                            span,
                            format!("head expects an int, not a {}", other.type_name()),
                        ));
                    }
                };
                Ok(Value::Frame(frame.head(n)))
            }
            "shape" => Ok(Value::Str(format!("({}, {})", frame.n_rows(), frame.n_cols()))),
            "columns" => Ok(Value::List(
                frame
                    .column_names()
                    .iter()
                    .map(|n| Value::Str(n.to_string()))
                    .collect(),
            )),
            "null_counts" => Ok(Value::Frame(frame.null_counts())),
            "dropna" => Ok(Value::Frame(frame.dropna())),
            "describe" => frame.describe().map(Value::Frame).map_err(fail),
            "select" => {
                let names = match args.as_slice() {
                    [Value::List(items)] => items.clone(),
                    _ => args.clone(),
                };
                let names = names
                    .iter()
                    .map(|v| match v {
                        Value::Str(s) => Ok(s.clone()),
                        other => Err(ScriptError::at(
                            span,
                            format!("select expects column names, not a {}", other.type_name()),
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                frame.select(&names).map(Value::Frame).map_err(fail)
            }
            "filter" => match args.as_slice() {
                [Value::Column(mask)] => frame.filter(mask).map(Value::Frame).map_err(fail),
                _ => Err(ScriptError::at(span, "filter expects a boolean mask column")),
            },
            "groupby" => {
                let key = one_str(&args, span, "groupby expects a column name")?;
                frame.groupby(&key).map(Value::Grouped).map_err(fail)
            }
            "sort" => {
                let (by, descending) = match args.as_slice() {
                    [Value::Str(by)] => (by.clone(), false),
                    [Value::Str(by), Value::Bool(desc)] => (by.clone(), *desc),
                    _ => {
                        return Err(ScriptError::at(
                            span,
                            "sort expects a column name and an optional descending flag",
                        ));
                    }
                };
                frame.sort(&by, descending).map(Value::Frame).map_err(fail)
            }
            "rename" => match args.as_slice() {
                [Value::Str(old), Value::Str(new)] => {
                    frame.rename(old, new).map(Value::Frame).map_err(fail)
                }
                _ => Err(ScriptError::at(span, "rename expects the old and new column names")),
            },
            _ => Err(unknown_method("frame", name, span)),
        }
    }

    fn column_method(
        &mut self,
        col: Column,
        name: &str,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, ScriptError> {
        let fail = |e: crate::dataset::FrameError| ScriptError::at(span, e.to_string());
        match name {
            "head" => {
                let n = match args.first() {
                    None => 5,
                    Some(Value::Int(n)) => usize::try_from(*n).unwrap_or(0),
                    Some(other) => {
                        return Err(ScriptError::at(
                            span,
                            format!("head expects an int, not a {}", other.type_name()),
                        ));
                    }
                };
                Ok(Value::Column(col.head(n)))
            }
            "value_counts" => Ok(Value::Frame(col.value_counts())),
            "mean" => col.mean().map(Value::Float).map_err(fail),
            "sum" => col.sum().map(Value::Float).map_err(fail),
            "min" => col.min().map(Value::Float).map_err(fail),
            "max" => col.max().map(Value::Float).map_err(fail),
            "count" => Ok(Value::Int((col.len() - col.null_count()) as i64)),
            _ => Err(unknown_method("column", name, span)),
        }
    }

    fn plot_method(
        &mut self,
        name: &str,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, ScriptError> {
        match name {
            "line" => {
                let col = one_column(&args, span, "plt.line expects a column")?;
                let points = col
                    .cells
                    .iter()
                    .enumerate()
                    .filter_map(|(i, c)| c.as_f64().map(|v| (i as f64, v)))
                    .filter(|(_, v)| v.is_finite())
                    .collect();
                self.figures.add(FigureKind::Line { name: col.name.clone(), points });
                Ok(Value::Unit)
            }
            "scatter" => match args.as_slice() {
                [Value::Column(x), Value::Column(y)] => {
                    let points = x
                        .cells
                        .iter()
                        .zip(&y.cells)
                        .filter_map(|(a, b)| Some((a.as_f64()?, b.as_f64()?)))
                        .filter(|(a, b)| a.is_finite() && b.is_finite())
                        .collect();
                    self.figures.add(FigureKind::Scatter {
                        x_name: x.name.clone(),
                        y_name: y.name.clone(),
                        points,
                    });
                    Ok(Value::Unit)
                }
                _ => Err(ScriptError::at(span, "plt.scatter expects two columns")),
            },
            "bar" => {
                let (name, bars) = match args.as_slice() {
                    [Value::Frame(frame)] => {
                        let cols = frame.columns();
                        if cols.len() < 2 {
                            return Err(ScriptError::at(
                                span,
                                "plt.bar expects a two-column frame (labels, values)",
                            ));
                        }
                        let bars = cols[0]
                            .cells
                            .iter()
                            .zip(&cols[1].cells)
                            .filter_map(|(label, value)| {
                                value
                                    .as_f64()
                                    .map(|v| (label.render(self.render.precision), v))
                            })
                            .collect();
                        (cols[1].name.clone(), bars)
                    }
                    [Value::Column(col)] => {
                        let bars = col
                            .cells
                            .iter()
                            .enumerate()
                            .filter_map(|(i, c)| c.as_f64().map(|v| (i.to_string(), v)))
                            .collect();
                        (col.name.clone(), bars)
                    }
                    _ => {
                        return Err(ScriptError::at(
                            span,
                            "plt.bar expects a value-counts frame or a column",
                        ));
                    }
                };
                self.figures.add(FigureKind::Bar { name, bars });
                Ok(Value::Unit)
            }
            "hist" => {
                let (col, bins) = match args.as_slice() {
                    [Value::Column(col)] => (col, 10usize),
                    [Value::Column(col), Value::Int(bins)] => {
                        (col, usize::try_from(*bins).unwrap_or(0).max(1))
                    }
                    _ => {
                        return Err(ScriptError::at(
                            span,
                            "plt.hist expects a column and an optional bin count",
                        ));
                    }
                };
                let values = col.numeric_values();
                if values.is_empty() {
                    return Err(ScriptError::at(
                        span,
                        format!("column '{}' has no numeric values to bin", col.name),
                    ));
                }
                self.figures.add(FigureKind::Histogram {
                    name: col.name.clone(),
                    bins: histogram(&values, bins),
                });
                Ok(Value::Unit)
            }
            "title" => match args.as_slice() {
                [Value::Str(title)] => {
                    self.figures.set_title(title.clone());
                    Ok(Value::Unit)
                }
                _ => Err(ScriptError::at(span, "plt.title expects a string")),
            },
            "size" => match args.as_slice() {
                [Value::Int(w), Value::Int(h)] => {
                    let clamp = |v: &i64| {
                        if *v <= 0 {
                            1
                        } else {
                            u16::try_from(*v).unwrap_or(u16::MAX)
                        }
                    };
                    self.figures.set_size(clamp(w), clamp(h));
                    Ok(Value::Unit)
                }
                _ => Err(ScriptError::at(span, "plt.size expects a width and a height")),
            },
            _ => Err(unknown_method("plot handle", name, span)),
        }
    }
}

fn num_method(name: &str, args: &[Value], span: Span) -> Result<Value, ScriptError> {
    let values = |v: &Value| -> Result<Vec<f64>, ScriptError> {
        match v {
            Value::Column(col) => Ok(col.numeric_values()),
            Value::List(items) => items
                .iter()
                .map(|item| {
                    as_f64(item).ok_or_else(|| {
                        ScriptError::at(span, format!("expected numbers, found a {}", item.type_name()))
                    })
                })
                .collect(),
            other => Err(ScriptError::at(
                span,
                format!("num.{name} expects a column or a list, not a {}", other.type_name()),
            )),
        }
    };
    match (name, args) {
        ("mean", [v]) => {
            let values = values(v)?;
            if values.is_empty() {
                return Ok(Value::Float(f64::NAN));
            }
            Ok(Value::Float(values.iter().sum::<f64>() / values.len() as f64))
        }
        ("sum", [v]) => Ok(Value::Float(values(v)?.iter().sum())),
        ("min", [v]) => Ok(Value::Float(values(v)?.iter().copied().fold(f64::NAN, f64::min))),
        ("max", [v]) => Ok(Value::Float(values(v)?.iter().copied().fold(f64::NAN, f64::max))),
        ("abs", [Value::Int(v)]) => Ok(Value::Int(v.abs())),
        ("abs", [Value::Float(v)]) => Ok(Value::Float(v.abs())),
        ("round", [v]) => match as_f64(v) {
            Some(v) => Ok(Value::Float(v.round())),
            None => Err(ScriptError::at(span, "num.round expects a number")),
        },
        ("round", [v, Value::Int(digits)]) => match as_f64(v) {
            Some(v) => {
                let factor = 10f64.powi(*digits as i32);
                Ok(Value::Float((v * factor).round() / factor))
            }
            None => Err(ScriptError::at(span, "num.round expects a number")),
        },
        ("mean" | "sum" | "min" | "max" | "abs" | "round", _) => Err(ScriptError::at(
            span,
            format!("wrong arguments for num.{name}"),
        )),
        _ => Err(unknown_method("numeric handle", name, span)),
    }
}

/// Render a value the way `print` does.
pub fn format_value(value: &Value, render: &RenderOptions) -> String {
    fmt(value, render, false)
}

fn fmt(value: &Value, render: &RenderOptions, quoted: bool) -> String {
    match value {
        Value::Unit => "null".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => format_float(*v, render.precision),
        Value::Str(v) => {
            if quoted {
                format!("\"{v}\"")
            } else {
                v.clone()
            }
        }
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(|v| fmt(v, render, true)).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Frame(frame) => frame.to_text(render),
        Value::Column(col) => col.to_frame().to_text(render),
        Value::Grouped(grouped) => format!("<grouped by '{}'>", grouped.key()),
        Value::Print => "<print>".to_string(),
        Value::Plot => "<plot>".to_string(),
        Value::Num => "<num>".to_string(),
    }
}

fn cell_to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Unit,
        Cell::Int(v) => Value::Int(*v),
        Cell::Float(v) => Value::Float(*v),
        Cell::Bool(v) => Value::Bool(*v),
        Cell::Str(v) => Value::Str(v.clone()),
    }
}

fn value_to_cell(value: &Value) -> Option<Cell> {
    match value {
        Value::Int(v) => Some(Cell::Int(*v)),
        Value::Float(v) => Some(Cell::Float(*v)),
        Value::Bool(v) => Some(Cell::Bool(*v)),
        Value::Str(v) => Some(Cell::Str(v.clone())),
        Value::Unit => Some(Cell::Null),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        _ => None,
    }
}

fn flip(op: CmpOp) -> CmpOp {
    match op {
        CmpOp::Lt => CmpOp::Gt,
        CmpOp::Le => CmpOp::Ge,
        CmpOp::Gt => CmpOp::Lt,
        CmpOp::Ge => CmpOp::Le,
        CmpOp::Eq | CmpOp::Ne => op,
    }
}

fn cmp_ordering(op: CmpOp, ord: std::cmp::Ordering) -> bool {
    match op {
        CmpOp::Eq => ord.is_eq(),
        CmpOp::Ne => !ord.is_eq(),
        CmpOp::Lt => ord.is_lt(),
        CmpOp::Le => ord.is_le(),
        CmpOp::Gt => ord.is_gt(),
        CmpOp::Ge => ord.is_ge(),
    }
}

fn one_str(args: &[Value], span: Span, what: &str) -> Result<String, ScriptError> {
    match args {
        [Value::Str(s)] => Ok(s.clone()),
        _ => Err(ScriptError::at(span, what)),
    }
}

fn one_column<'v>(args: &'v [Value], span: Span, what: &str) -> Result<&'v Column, ScriptError> {
    match args {
        [Value::Column(col)] => Ok(col),
        _ => Err(ScriptError::at(span, what)),
    }
}

fn unknown_method(kind: &str, name: &str, span: Span) -> ScriptError {
    ScriptError::at(span, format!("{kind} has no method '{name}'"))
}

fn type_err(op: ArithOp, lhs: &Value, rhs: &Value, span: Span) -> ScriptError {
    let word = match op {
        ArithOp::Add => "add",
        ArithOp::Sub => "subtract",
        ArithOp::Mul => "multiply",
        ArithOp::Div => "divide",
    };
    ScriptError::at(
        span,
        format!("cannot {word} a {} and a {}", lhs.type_name(), rhs.type_name()),
    )
}

fn cmp_err(lhs: &Value, rhs: &Value, span: Span) -> ScriptError {
    ScriptError::at(
        span,
        format!("cannot compare a {} and a {}", lhs.type_name(), rhs.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;
    use crate::dataset::read_csv;

    fn run(source: &str) -> (String, Env) {
        let frame = read_csv("a,b,city\n1,2,oslo\n3,4,bergen\n5,6,oslo\n".as_bytes()).unwrap();
        let mut env = Env::with_capabilities(frame);
        let mut sink = String::new();
        let mut figures = FigureRegistry::new();
        let stmts = parse(source).unwrap();
        Evaluator::new(&mut sink, &mut figures, RenderOptions::default())
            .run(&stmts, &mut env)
            .unwrap();
        (sink, env)
    }

    fn run_err(source: &str) -> ScriptError {
        let frame = read_csv("a,b\n1,2\n".as_bytes()).unwrap();
        let mut env = Env::with_capabilities(frame);
        let mut sink = String::new();
        let mut figures = FigureRegistry::new();
        let stmts = parse(source).unwrap();
        Evaluator::new(&mut sink, &mut figures, RenderOptions::default())
            .run(&stmts, &mut env)
            .unwrap_err()
    }

    #[test]
    fn print_joins_arguments_with_spaces() {
        let (sink, _) = run("print(\"rows:\", 1 + 2)");
        assert_eq!(sink, "rows: 3\n");
    }

    #[test]
    fn shape_formats_as_pair() {
        let (sink, _) = run("print(df.shape())");
        assert_eq!(sink, "(3, 3)\n");
    }

    #[test]
    fn mask_filtering_via_bracket_index() {
        let (sink, _) = run("print(df[df[\"a\"] > 2].shape())");
        assert_eq!(sink, "(2, 3)\n");
    }

    #[test]
    fn scalar_on_the_left_flips_the_comparison() {
        let (sink, _) = run("print(df[2 < df[\"a\"]].shape())");
        assert_eq!(sink, "(2, 3)\n");
    }

    #[test]
    fn derived_column_assignment_rebinds_df() {
        let (_, env) = run("df[\"double\"] = df[\"a\"] * 2\n");
        let Some(Value::Frame(frame)) = env.get("df") else { panic!("df missing") };
        assert_eq!(frame.n_cols(), 4);
        assert_eq!(
            frame.column("double").unwrap().cells[2],
            crate::dataset::Cell::Int(10)
        );
    }

    #[test]
    fn assignment_retains_binding() {
        let (_, env) = run("df_cleaned = df.dropna()");
        let names: Vec<&str> = env.user_bindings().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["df_cleaned"]);
        assert!(env.get("df_cleaned").unwrap().is_tabular());
    }

    #[test]
    fn string_concatenation() {
        let (sink, _) = run("print(\"a\" + \"b\")");
        assert_eq!(sink, "ab\n");
    }

    #[test]
    fn integer_division_is_true_division() {
        let (sink, _) = run("print(7 / 2)");
        assert_eq!(sink, "3.5\n");
    }

    #[test]
    fn plots_land_in_the_registry() {
        let frame = read_csv("a,b\n1,2\n3,4\n".as_bytes()).unwrap();
        let mut env = Env::with_capabilities(frame);
        let mut sink = String::new();
        let mut figures = FigureRegistry::new();
        let stmts = parse("plt.line(df[\"a\"])\nplt.title(\"Line Plot\")").unwrap();
        Evaluator::new(&mut sink, &mut figures, RenderOptions::default())
            .run(&stmts, &mut env)
            .unwrap();
        let fig = figures.take_current().unwrap();
        assert_eq!(fig.title.as_deref(), Some("Line Plot"));
        assert!(matches!(fig.kind, FigureKind::Line { ref points, .. } if points.len() == 2));
    }

    #[test]
    fn unknown_name_is_positioned() {
        let err = run_err("print(nope)");
        assert!(err.message.contains("'nope' is not defined"));
        assert_eq!(err.span.map(|s| s.line), Some(1));
    }

    #[test]
    fn unknown_column_is_an_execution_failure() {
        let err = run_err("print(df[\"zzz\"])");
        assert!(err.message.contains("unknown column"));
    }

    #[test]
    fn unknown_method_is_reported_with_receiver_kind() {
        let err = run_err("df.explode()");
        assert!(err.message.contains("frame has no method 'explode'"));
    }

    #[test]
    fn groupby_chain() {
        let (sink, _) = run("print(df.groupby(\"city\").mean(\"a\"))");
        assert!(sink.contains("oslo"));
        assert!(sink.contains("3.0"));
    }

    #[test]
    fn num_helpers() {
        let (sink, _) = run("print(num.mean(df[\"a\"]), num.round(2.567, 1))");
        assert_eq!(sink, "3.0 2.6\n");
    }
}
