use serde::Serialize;

//==============================================================================
// Cell values
//==============================================================================

/// A single typed cell read from a worksheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell (or a cell holding an Excel error such as #N/A)
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    /// Date/time rendered as `YYYY-MM-DD HH:MM:SS` (or the workbook's ISO text)
    DateTime(String),
}

impl CellValue {
    /// Kind of this value, `None` for `Null`
    pub fn kind(&self) -> Option<ColumnKind> {
        match self {
            CellValue::Null => None,
            CellValue::Integer(_) => Some(ColumnKind::Integer),
            CellValue::Real(_) => Some(ColumnKind::Real),
            CellValue::Text(_) => Some(ColumnKind::Text),
            CellValue::Boolean(_) => Some(ColumnKind::Boolean),
            CellValue::DateTime(_) => Some(ColumnKind::DateTime),
        }
    }

    /// Render the value as text, used when a column falls back to TEXT
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Real(f) => Some(f.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Boolean(b) => Some(b.to_string()),
            CellValue::DateTime(s) => Some(s.clone()),
        }
    }
}

//==============================================================================
// Column kinds and storage types
//==============================================================================

/// Inferred kind of a whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
    Boolean,
    DateTime,
}

impl ColumnKind {
    /// Declared SQLite storage type for this kind
    ///
    /// | kind     | declared type |
    /// |----------|---------------|
    /// | Integer  | INTEGER       |
    /// | Real     | REAL          |
    /// | Text     | TEXT          |
    /// | Boolean  | INTEGER (0/1) |
    /// | DateTime | TIMESTAMP     |
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Real => "REAL",
            ColumnKind::Text => "TEXT",
            ColumnKind::Boolean => "INTEGER",
            ColumnKind::DateTime => "TIMESTAMP",
        }
    }

    /// Combine the kind seen so far with the kind of the next non-null cell.
    ///
    /// Integers widen to reals; every other mismatch falls back to text.
    pub fn merge(self, other: ColumnKind) -> ColumnKind {
        use ColumnKind::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Integer, Real) | (Real, Integer) => Real,
            _ => Text,
        }
    }

    /// Infer a column kind from its values. All-null columns are TEXT.
    pub fn infer(values: &[CellValue]) -> ColumnKind {
        values
            .iter()
            .filter_map(CellValue::kind)
            .reduce(ColumnKind::merge)
            .unwrap_or(ColumnKind::Text)
    }
}

//==============================================================================
// In-memory sheet table
//==============================================================================

/// A named column with its inferred kind and values (one per data row)
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Create a column, inferring its kind from the values
    pub fn new(name: String, values: Vec<CellValue>) -> Self {
        let kind = ColumnKind::infer(&values);
        Self { name, kind, values }
    }
}

/// Contents of one worksheet: header names plus column-major data
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<Column>,
}

impl SheetTable {
    pub fn new(sheet_name: String, columns: Vec<Column>) -> Self {
        Self {
            sheet_name,
            columns,
        }
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

//==============================================================================
// Destination schema
//==============================================================================

/// One row of `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    pub declared_type: String,
}

impl std::fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.declared_type)
    }
}
