//! Spreadsheet input
//!
//! Reads workbook metadata (sheet names) and the contents of one worksheet
//! into a typed, column-major [`SheetTable`](crate::types::SheetTable).

mod reader;

pub use reader::{first_sheet, sheet_from_range, WorkbookReader};
