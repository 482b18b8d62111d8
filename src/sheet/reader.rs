//! Reading spreadsheet and CSV exports into raw, headerless rows

use crate::error::{Result, StandingsError};
use calamine::{open_workbook_auto, Data, Reader};
use std::fmt;
use std::path::Path;

/// A single cell value, independent of the source format
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed, lowercased text used for header matching
    pub fn normalized(&self) -> String {
        self.to_string().trim().to_lowercase()
    }

    /// Trimmed text for names and labels
    pub fn text(&self) -> String {
        self.to_string().trim().to_string()
    }

    /// Read the cell as a whole number, if it holds one.
    ///
    /// Accepts integer cells, floats with no fractional part and
    /// text such as " 3 " or "3.0". Anything else is not a rank.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            Cell::Float(v) => float_to_integer(*v),
            Cell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_integer))
            }
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

fn float_to_integer(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => {
                if let Some(i) = float_to_integer(*v) {
                    write!(f, "{}", i)
                } else {
                    write!(f, "{}", v)
                }
            }
            Cell::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(v) => Cell::Int(*v),
            Data::Float(v) => Cell::Float(*v),
            Data::Bool(v) => Cell::Bool(*v),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// Rows of cells with no header assumption. Row 0 is the first sheet row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a sheet from plain strings; empty strings become empty cells
    pub fn from_strings<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| {
                        let value = value.as_ref();
                        if value.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(value.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cell at a position; cells beyond a short row read as empty
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(EMPTY)
    }
}

/// Category name for a file: the file name without its extension
pub fn category_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Read the first worksheet of a spreadsheet, or a CSV file, as raw rows
pub fn read_raw_sheet(path: &Path) -> Result<RawSheet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => read_csv_sheet(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "xlam" | "ods" => read_workbook_sheet(path),
        _ => Err(StandingsError::UnsupportedFormat(format!(
            "{} (expected .xlsx, .xls, .ods or .csv)",
            path.display()
        ))),
    }
}

fn read_workbook_sheet(path: &Path) -> Result<RawSheet> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| StandingsError::EmptyWorkbook(path.display().to_string()))??;

    // calamine trims leading empty rows/columns; restore them so row
    // indices match the sheet as the user sees it
    let (first_row, first_col) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Ok(RawSheet::default()),
    };

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); first_row];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; first_col];
        cells.extend(row.iter().map(Cell::from));
        rows.push(cells);
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(RawSheet::new(rows))
}

fn read_csv_sheet(path: &Path) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(RawSheet::new(rows))
}
