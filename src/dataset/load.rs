//! CSV loading with per-column type inference.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::{Cell, Column, Frame};

/// A file that could not be interpreted as tabular data.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("not parseable as tabular data: {0}")]
    Csv(#[from] csv::Error),
    #[error("no header row found")]
    NoHeader,
    #[error("duplicate column name: '{0}'")]
    DuplicateColumn(String),
}

/// Load a frame from a CSV file. The first row is the header.
pub fn load_csv(path: &Path) -> Result<Frame, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let frame = read_csv(file)?;
    debug!(
        path = %path.display(),
        rows = frame.n_rows(),
        cols = frame.n_cols(),
        "loaded dataset"
    );
    Ok(frame)
}

/// Parse CSV text from any reader into a frame.
pub fn read_csv<R: Read>(reader: R) -> Result<Frame, InputError> {
    let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(InputError::NoHeader);
    }
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(InputError::DuplicateColumn(name.clone()));
        }
    }

    let mut raw: Vec<Vec<String>> = headers.iter().map(|_| Vec::new()).collect();
    for record in csv.records() {
        let record = record?;
        for (col, field) in raw.iter_mut().zip(record.iter()) {
            col.push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, values)| Column::new(name, infer_cells(&values)))
        .collect();
    Ok(Frame::new(columns))
}

/// Infer one column's cell type: int, else float, else bool, else string.
/// Empty fields become nulls whatever the column type.
fn infer_cells(values: &[String]) -> Vec<Cell> {
    let present: Vec<&str> = values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()).collect();
    let all = |pred: fn(&str) -> bool| !present.is_empty() && present.iter().all(|v| pred(v));

    let make: fn(&str) -> Cell = if all(|v| v.parse::<i64>().is_ok()) {
        |v| v.parse().map_or(Cell::Null, Cell::Int)
    } else if all(|v| v.parse::<f64>().is_ok()) {
        |v| v.parse().map_or(Cell::Null, Cell::Float)
    } else if all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false")) {
        |v| Cell::Bool(v.eq_ignore_ascii_case("true"))
    } else {
        |v| Cell::Str(v.to_string())
    };

    values
        .iter()
        .map(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                Cell::Null
            } else {
                make(trimmed)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_column_types() {
        let frame = read_csv("a,b,c,d\n1,1.5,x,true\n2,,y,false\n".as_bytes()).unwrap();
        assert_eq!(frame.column("a").unwrap().cells[0], Cell::Int(1));
        assert_eq!(frame.column("b").unwrap().cells[0], Cell::Float(1.5));
        assert_eq!(frame.column("b").unwrap().cells[1], Cell::Null);
        assert_eq!(frame.column("c").unwrap().cells[1], Cell::Str("y".to_string()));
        assert_eq!(frame.column("d").unwrap().cells[1], Cell::Bool(false));
    }

    #[test]
    fn mixed_numbers_fall_back_to_float() {
        let frame = read_csv("n\n1\n2.5\n".as_bytes()).unwrap();
        assert_eq!(frame.column("n").unwrap().cells[0], Cell::Float(1.0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(matches!(
            read_csv("a,b\n1\n".as_bytes()),
            Err(InputError::Csv(_))
        ));
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        assert!(matches!(
            read_csv("a,a\n1,2\n".as_bytes()),
            Err(InputError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("not/here.csv"));
    }
}
