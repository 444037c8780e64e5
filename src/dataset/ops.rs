//! Analysis operations over frames and columns.

use std::cmp::Ordering;

use super::{Cell, Column, Frame, FrameError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    fn word(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "subtract",
            ArithOp::Mul => "multiply",
            ArithOp::Div => "divide",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Frame {
    /// First `n` rows.
    pub fn head(&self, n: usize) -> Frame {
        Frame::new(self.columns().iter().map(|c| c.head(n)).collect())
    }

    /// Missing-value count per column, as a two-column frame.
    pub fn null_counts(&self) -> Frame {
        let names = self
            .columns()
            .iter()
            .map(|c| Cell::Str(c.name.clone()))
            .collect();
        let counts = self
            .columns()
            .iter()
            .map(|c| Cell::Int(c.null_count() as i64))
            .collect();
        Frame::new(vec![Column::new("column", names), Column::new("nulls", counts)])
    }

    /// Rows with no missing values.
    pub fn dropna(&self) -> Frame {
        let keep: Vec<usize> = (0..self.n_rows())
            .filter(|&i| self.columns().iter().all(|c| !c.cells[i].is_null()))
            .collect();
        self.take_rows(&keep)
    }

    /// Sub-frame with just the named columns, in the requested order.
    pub fn select(&self, names: &[String]) -> Result<Frame, FrameError> {
        let columns = names
            .iter()
            .map(|n| self.column(n).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Frame::new(columns))
    }

    /// Rows where the boolean mask is true. Nulls in the mask drop the row.
    pub fn filter(&self, mask: &Column) -> Result<Frame, FrameError> {
        if mask.len() != self.n_rows() {
            return Err(FrameError::MaskLength { mask: mask.len(), rows: self.n_rows() });
        }
        let mut keep = Vec::new();
        for (i, cell) in mask.cells.iter().enumerate() {
            match cell {
                Cell::Bool(true) => keep.push(i),
                Cell::Bool(false) | Cell::Null => {}
                _ => return Err(FrameError::MaskType),
            }
        }
        Ok(self.take_rows(&keep))
    }

    /// Summary statistics for the numeric columns.
    pub fn describe(&self) -> Result<Frame, FrameError> {
        const STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
        let numeric: Vec<&Column> = self.columns().iter().filter(|c| c.is_numeric()).collect();
        if numeric.is_empty() {
            return Err(FrameError::NoNumericColumns);
        }
        let stat_col = Column::new(
            "stat",
            STATS.iter().map(|s| Cell::Str(s.to_string())).collect(),
        );
        let mut columns = vec![stat_col];
        for col in numeric {
            let values = col.numeric_values();
            let cells = vec![
                Cell::Float(values.len() as f64),
                Cell::Float(mean(&values)),
                Cell::Float(sample_std(&values)),
                Cell::Float(values.iter().copied().fold(f64::NAN, f64::min)),
                Cell::Float(quantile(&values, 0.25)),
                Cell::Float(quantile(&values, 0.50)),
                Cell::Float(quantile(&values, 0.75)),
                Cell::Float(values.iter().copied().fold(f64::NAN, f64::max)),
            ];
            columns.push(Column::new(col.name.clone(), cells));
        }
        Ok(Frame::new(columns))
    }

    /// Group rows by the values of one column.
    pub fn groupby(&self, key: &str) -> Result<Grouped, FrameError> {
        self.column(key)?;
        Ok(Grouped { frame: self.clone(), key: key.to_string() })
    }

    /// Stable sort by one column. Nulls always sort last.
    pub fn sort(&self, by: &str, descending: bool) -> Result<Frame, FrameError> {
        let col = self.column(by)?;
        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        order.sort_by(|&a, &b| {
            let (ca, cb) = (&col.cells[a], &col.cells[b]);
            match (ca.is_null(), cb.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ord = compare_cells(ca, cb);
                    if descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                }
            }
        });
        Ok(self.take_rows(&order))
    }

    /// Add a column, replacing any existing column of the same name.
    pub fn with_column(&self, name: &str, cells: Vec<Cell>) -> Result<Frame, FrameError> {
        if !self.columns().is_empty() && cells.len() != self.n_rows() {
            return Err(FrameError::ColumnLength { len: cells.len(), rows: self.n_rows() });
        }
        let mut columns = self.columns().to_vec();
        let new = Column::new(name, cells);
        match columns.iter_mut().find(|c| c.name == name) {
            Some(slot) => *slot = new,
            None => columns.push(new),
        }
        Ok(Frame::new(columns))
    }

    /// Rename one column.
    pub fn rename(&self, old: &str, new: &str) -> Result<Frame, FrameError> {
        self.column(old)?;
        let columns = self
            .columns()
            .iter()
            .map(|c| {
                let mut c = c.clone();
                if c.name == old {
                    c.name = new.to_string();
                }
                c
            })
            .collect();
        Ok(Frame::new(columns))
    }

    fn take_rows(&self, indices: &[usize]) -> Frame {
        let columns = self
            .columns()
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    indices.iter().map(|&i| c.cells[i].clone()).collect(),
                )
            })
            .collect();
        Frame::new(columns)
    }
}

/// A frame grouped by one key column. Groups keep first-appearance order;
/// rows with a null key are excluded.
#[derive(Debug, Clone)]
pub struct Grouped {
    frame: Frame,
    key: String,
}

impl Grouped {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Per-group mean of a numeric column.
    pub fn mean(&self, col: &str) -> Result<Frame, FrameError> {
        self.aggregate(col, |values| mean(values))
    }

    /// Per-group sum of a numeric column.
    pub fn sum(&self, col: &str) -> Result<Frame, FrameError> {
        self.aggregate(col, |values| values.iter().sum())
    }

    /// Per-group row count.
    pub fn count(&self) -> Result<Frame, FrameError> {
        let groups = self.groups()?;
        let keys = groups.iter().map(|(k, _)| (*k).clone()).collect();
        let counts = groups
            .iter()
            .map(|(_, rows)| Cell::Int(rows.len() as i64))
            .collect();
        Ok(Frame::new(vec![
            Column::new(self.key.clone(), keys),
            Column::new("count", counts),
        ]))
    }

    fn aggregate(&self, col: &str, f: impl Fn(&[f64]) -> f64) -> Result<Frame, FrameError> {
        let target = self.frame.column(col)?;
        if !target.is_numeric() {
            return Err(FrameError::NotNumeric(col.to_string()));
        }
        let groups = self.groups()?;
        let keys = groups.iter().map(|(k, _)| (*k).clone()).collect();
        let aggregates = groups
            .iter()
            .map(|(_, rows)| {
                let values: Vec<f64> = rows
                    .iter()
                    .filter_map(|&i| target.cells[i].as_f64())
                    .collect();
                Cell::Float(f(&values))
            })
            .collect();
        Ok(Frame::new(vec![
            Column::new(self.key.clone(), keys),
            Column::new(col, aggregates),
        ]))
    }

    fn groups(&self) -> Result<Vec<(&Cell, Vec<usize>)>, FrameError> {
        let key_col = self.frame.column(&self.key)?;
        let mut groups: Vec<(&Cell, Vec<usize>)> = Vec::new();
        for (i, cell) in key_col.cells.iter().enumerate() {
            if cell.is_null() {
                continue;
            }
            match groups.iter_mut().find(|(k, _)| *k == cell) {
                Some((_, rows)) => rows.push(i),
                None => groups.push((cell, vec![i])),
            }
        }
        Ok(groups)
    }
}

impl Column {
    /// Occurrence count per distinct value, most frequent first; ties keep
    /// first-appearance order. Nulls are excluded.
    pub fn value_counts(&self) -> Frame {
        let mut entries: Vec<(&Cell, i64)> = Vec::new();
        for cell in &self.cells {
            if cell.is_null() {
                continue;
            }
            match entries.iter_mut().find(|(k, _)| *k == cell) {
                Some((_, n)) => *n += 1,
                None => entries.push((cell, 1)),
            }
        }
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        let values = entries.iter().map(|(k, _)| (*k).clone()).collect();
        let counts = entries.iter().map(|(_, n)| Cell::Int(*n)).collect();
        Frame::new(vec![
            Column::new(self.name.clone(), values),
            Column::new("count", counts),
        ])
    }

    pub fn mean(&self) -> Result<f64, FrameError> {
        self.require_numeric()?;
        Ok(mean(&self.numeric_values()))
    }

    pub fn sum(&self) -> Result<f64, FrameError> {
        self.require_numeric()?;
        Ok(self.numeric_values().iter().sum())
    }

    pub fn min(&self) -> Result<f64, FrameError> {
        self.require_numeric()?;
        Ok(self.numeric_values().iter().copied().fold(f64::NAN, f64::min))
    }

    pub fn max(&self) -> Result<f64, FrameError> {
        self.require_numeric()?;
        Ok(self.numeric_values().iter().copied().fold(f64::NAN, f64::max))
    }

    /// Element-wise arithmetic against another column.
    pub fn arith(&self, op: ArithOp, rhs: &Column) -> Result<Column, FrameError> {
        if self.len() != rhs.len() {
            return Err(FrameError::ArithLength {
                op: op.word(),
                left: self.len(),
                right: rhs.len(),
            });
        }
        let cells = self
            .cells
            .iter()
            .zip(&rhs.cells)
            .map(|(a, b)| arith_cells(op, a, b, &self.name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Column::new(self.name.clone(), cells))
    }

    /// Element-wise arithmetic against a scalar. `scalar_left` flips the
    /// operand order for non-commutative operators.
    pub fn arith_scalar(
        &self,
        op: ArithOp,
        scalar: &Cell,
        scalar_left: bool,
    ) -> Result<Column, FrameError> {
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                if scalar_left {
                    arith_cells(op, scalar, cell, &self.name)
                } else {
                    arith_cells(op, cell, scalar, &self.name)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Column::new(self.name.clone(), cells))
    }

    /// Element-wise comparison against a scalar, yielding a boolean mask.
    pub fn compare_scalar(&self, op: CmpOp, scalar: &Cell) -> Column {
        let cells = self
            .cells
            .iter()
            .map(|cell| compare_mask_cell(op, cell, scalar))
            .collect();
        Column::new(self.name.clone(), cells)
    }

    /// Element-wise comparison against another column.
    pub fn compare(&self, op: CmpOp, rhs: &Column) -> Result<Column, FrameError> {
        if self.len() != rhs.len() {
            return Err(FrameError::ArithLength {
                op: "compare",
                left: self.len(),
                right: rhs.len(),
            });
        }
        let cells = self
            .cells
            .iter()
            .zip(&rhs.cells)
            .map(|(a, b)| compare_mask_cell(op, a, b))
            .collect();
        Ok(Column::new(self.name.clone(), cells))
    }

    fn require_numeric(&self) -> Result<(), FrameError> {
        if self.is_numeric() {
            Ok(())
        } else {
            Err(FrameError::NotNumeric(self.name.clone()))
        }
    }
}

fn arith_cells(op: ArithOp, a: &Cell, b: &Cell, name: &str) -> Result<Cell, FrameError> {
    if a.is_null() || b.is_null() {
        return Ok(Cell::Null);
    }
    // Integer arithmetic stays integral except for division.
    if let (Cell::Int(x), Cell::Int(y)) = (a, b) {
        match op {
            ArithOp::Add => return Ok(Cell::Int(x + y)),
            ArithOp::Sub => return Ok(Cell::Int(x - y)),
            ArithOp::Mul => return Ok(Cell::Int(x * y)),
            ArithOp::Div => {}
        }
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Ok(Cell::Float(match op {
            ArithOp::Add => x + y,
            ArithOp::Sub => x - y,
            ArithOp::Mul => x * y,
            ArithOp::Div => x / y,
        })),
        _ => Err(FrameError::ArithType { op: op.word(), name: name.to_string() }),
    }
}

/// Missing values compare like NaN: unequal to everything, unordered.
fn compare_mask_cell(op: CmpOp, a: &Cell, b: &Cell) -> Cell {
    if a.is_null() || b.is_null() {
        return Cell::Bool(op == CmpOp::Ne);
    }
    let ord = compare_cells(a, b);
    let equal = cells_equal(a, b);
    Cell::Bool(match op {
        CmpOp::Eq => equal,
        CmpOp::Ne => !equal,
        CmpOp::Lt => !equal && ord == Ordering::Less,
        CmpOp::Le => equal || ord == Ordering::Less,
        CmpOp::Gt => !equal && ord == Ordering::Greater,
        CmpOp::Ge => equal || ord == Ordering::Greater,
    })
}

fn cells_equal(a: &Cell, b: &Cell) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Ordering across cell types: numbers by value, then everything else by
/// rendered text.
fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Str(x), Cell::Str(y)) => x.cmp(y),
        (Cell::Bool(x), Cell::Bool(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.render(6).cmp(&b.render(6)),
        },
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Linear-interpolation quantile over the sorted values.
fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if frac == 0.0 || lo + 1 >= sorted.len() {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[lo + 1] - sorted[lo]) * frac
    }
}
