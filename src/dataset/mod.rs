//! In-memory tabular data: typed cells, named columns, frames.

use serde::Serialize;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

mod load;
mod ops;

pub use load::{load_csv, read_csv, InputError};
pub use ops::{ArithOp, CmpOp, Grouped};

/// A single typed cell. `Null` stands for a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn render(&self, precision: usize) -> String {
        match self {
            Cell::Null => "NaN".to_string(),
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => format_float(*v, precision),
            Cell::Bool(v) => v.to_string(),
            Cell::Str(v) => v.clone(),
        }
    }
}

/// Format a float at the given precision, trimming trailing zeros but
/// keeping one digit after the point so integral floats stay visibly float.
pub fn format_float(v: f64, precision: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let mut s = format!("{v:.precision$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.push('0');
        }
    }
    s
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self { name: name.into(), cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Non-null numeric values, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_f64).collect()
    }

    /// Whether the column holds at least one numeric cell and no
    /// non-numeric, non-null cells.
    pub fn is_numeric(&self) -> bool {
        let mut seen = false;
        for cell in &self.cells {
            match cell {
                Cell::Int(_) | Cell::Float(_) => seen = true,
                Cell::Null => {}
                _ => return false,
            }
        }
        seen
    }

    pub fn head(&self, n: usize) -> Column {
        Column::new(self.name.clone(), self.cells.iter().take(n).cloned().collect())
    }

    /// View the column as a one-column frame, for rendering.
    pub fn to_frame(&self) -> Frame {
        Frame::new(vec![self.clone()])
    }
}

/// An ordered collection of equal-length named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    /// Build a frame from columns. All columns must have the same length.
    pub fn new(columns: Vec<Column>) -> Self {
        if let Some(first) = columns.first() {
            debug_assert!(columns.iter().all(|c| c.len() == first.len()));
        }
        Self { columns }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column, FrameError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Row `i` as rendered strings, one per column.
    fn render_row(&self, i: usize, precision: usize) -> Vec<String> {
        self.columns.iter().map(|c| c.cells[i].render(precision)).collect()
    }

    /// Structured table value handed to the UI layer.
    pub fn to_table(&self, opts: &RenderOptions) -> TableData {
        let shown = self.n_rows().min(opts.max_rows);
        let mut headers = vec![String::new()];
        headers.extend(self.columns.iter().map(|c| c.name.clone()));
        let mut rows = Vec::with_capacity(shown);
        for i in 0..shown {
            let mut row = vec![i.to_string()];
            row.extend(self.render_row(i, opts.precision));
            rows.push(row);
        }
        TableData { headers, rows, total_rows: self.n_rows() }
    }

    /// Fixed-width text rendering, the shape `print` emits.
    pub fn to_text(&self, opts: &RenderOptions) -> String {
        if self.columns.is_empty() {
            return "Empty frame".to_string();
        }
        let table = self.to_table(opts);
        let ncols = table.headers.len();
        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.width()).collect();
        for row in &table.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.width());
            }
        }
        let mut out = String::new();
        let push_row = |cells: &[String], out: &mut String| {
            for (i, (cell, w)) in cells.iter().zip(&widths).enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                for _ in 0..w.saturating_sub(cell.width()) {
                    out.push(' ');
                }
                out.push_str(cell);
            }
            out.push('\n');
        };
        push_row(&table.headers, &mut out);
        for row in &table.rows {
            push_row(row, &mut out);
        }
        if table.total_rows > table.rows.len() {
            out.push_str(&format!("[{} rows x {} columns]\n", self.n_rows(), ncols - 1));
        }
        out.pop();
        out
    }
}

/// Rendering knobs shared by text and table output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub precision: usize,
    pub max_rows: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { precision: 4, max_rows: 60 }
    }
}

/// Rendering-ready table: headers plus stringified rows. The first header
/// is the unnamed row-index column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Failures raised by frame operations.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("unknown column: '{0}'")]
    UnknownColumn(String),
    #[error("column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("no numeric columns to describe")]
    NoNumericColumns,
    #[error("mask length {mask} does not match row count {rows}")]
    MaskLength { mask: usize, rows: usize },
    #[error("filter mask must be a boolean column")]
    MaskType,
    #[error("column length {len} does not match row count {rows}")]
    ColumnLength { len: usize, rows: usize },
    #[error("cannot {op} columns of lengths {left} and {right}")]
    ArithLength { op: &'static str, left: usize, right: usize },
    #[error("cannot {op} non-numeric values in column '{name}'")]
    ArithType { op: &'static str, name: String },
}
