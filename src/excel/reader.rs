//! Worksheet reader - Excel (.xlsx/.xls/.xlsb/.ods) → in-memory `SheetTable`

use crate::error::{LoadError, LoadResult};
use crate::types::{CellValue, Column, SheetTable};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads sheet metadata and sheet contents from a workbook on disk
pub struct WorkbookReader {
    path: PathBuf,
}

impl WorkbookReader {
    /// Create a reader for the workbook at `path` (nothing is opened yet)
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order.
    ///
    /// Only the workbook metadata is parsed; the handle is released on return.
    pub fn sheet_names(&self) -> LoadResult<Vec<String>> {
        let workbook = self.open()?;
        Ok(workbook.sheet_names())
    }

    /// Read the full contents of `sheet`, using its first row as column headers
    pub fn read_sheet(&self, sheet: &str) -> LoadResult<SheetTable> {
        let mut workbook = self.open()?;

        let available = workbook.sheet_names();
        if !available.iter().any(|name| name == sheet) {
            return Err(LoadError::SheetNotFound {
                sheet: sheet.to_string(),
                available,
            });
        }

        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| self.format_error(e))?;
        debug!(sheet, size = ?range.get_size(), "worksheet range loaded");

        sheet_from_range(sheet, &range)
    }

    fn open(&self) -> LoadResult<Sheets<BufReader<File>>> {
        open_workbook_auto(&self.path).map_err(|e| self.format_error(e))
    }

    fn format_error(&self, err: calamine::Error) -> LoadError {
        LoadError::FileFormat {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// First entry of a workbook's sheet-name sequence
pub fn first_sheet(names: &[String]) -> LoadResult<String> {
    names
        .first()
        .cloned()
        .ok_or_else(|| LoadError::NotFound("workbook contains no worksheets".to_string()))
}

/// Convert a worksheet range into a `SheetTable`.
///
/// Row 0 of the used range is the header. Entirely empty data rows are
/// skipped and short rows are padded with nulls.
pub fn sheet_from_range(sheet: &str, range: &Range<Data>) -> LoadResult<SheetTable> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LoadError::EmptySheet(sheet.to_string()))?;

    let width = range.get_size().1;
    let names = header_names(header, width);

    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); width];
    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        for (col, column_values) in values.iter_mut().enumerate() {
            let cell = row.get(col).unwrap_or(&Data::Empty);
            column_values.push(convert_cell(cell));
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Ok(SheetTable::new(sheet.to_string(), columns))
}

/// Column names from the header row.
///
/// Blank headers become `Unnamed: <index>`; repeated names get `.1`, `.2`, ...
fn header_names(header: &[Data], width: usize) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(width);

    for col in 0..width {
        let raw = header.get(col).map(header_text).unwrap_or_default();
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {}", col)
        } else {
            raw
        };

        let mut name = base.clone();
        if taken.contains(&name) {
            let suffix = suffixes.entry(base.clone()).or_insert(0);
            loop {
                *suffix += 1;
                name = format!("{}.{}", base, suffix);
                if !taken.contains(&name) {
                    break;
                }
            }
        }
        taken.insert(name.clone());
        names.push(name);
    }

    names
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => convert_cell(other).to_text().unwrap_or_default(),
    }
}

/// Classify one cell. Integral floats are integers: xlsx stores every number
/// as a float.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => match float_as_integer(*f) {
            Some(i) => CellValue::Integer(i),
            None => CellValue::Real(*f),
        },
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return CellValue::Text(dt.as_f64().to_string());
            }
            match dt.as_datetime() {
                Some(ndt) => CellValue::DateTime(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
                None => CellValue::Real(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn float_as_integer(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
