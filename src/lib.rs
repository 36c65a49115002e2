//! Sheetload - load one Excel worksheet into a SQLite table
//!
//! This library reads a worksheet into a typed in-memory table, writes it to
//! a SQLite database (replacing any table of the same name) and reports the
//! resulting column schema.
//!
//! # Features
//!
//! - First-sheet default when no sheet name is given
//! - Table name derived from the sheet name (`"Sales Data-2024"` → `sales_data_2024`)
//! - Explicit cell kind → SQLite storage type mapping
//! - Replace-mode writes inside a single transaction
//!
//! # Example
//!
//! ```no_run
//! use royalbit_sheetload::importer::{ImportOutcome, ImportRequest, Importer};
//!
//! let request = ImportRequest::new("stock.xlsx", "stock.db");
//! let mut importer = Importer::new(request);
//!
//! if let ImportOutcome::Succeeded(report) = importer.run() {
//!     println!("{} rows → {}", report.row_count, report.table_name);
//!     for column in &report.columns {
//!         println!("{}", column);
//!     }
//! }
//! ```

pub mod cli;
pub mod db;
pub mod error;
pub mod excel;
pub mod importer;
pub mod types;

// Re-export commonly used types
pub use error::{LoadError, LoadResult};
pub use importer::{ImportOutcome, ImportReport, ImportRequest, Importer};
pub use types::{CellValue, Column, ColumnInfo, ColumnKind, SheetTable};
