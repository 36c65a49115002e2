//! Import pipeline - one worksheet → one SQLite table
//!
//! ```text
//! Start → Connected → SheetResolved → Loaded → TableResolved
//!       → Written → Committed → ReportedSchema → Closed
//! ```
//!
//! Any failure after `Connected` moves to `Failed → RolledBack → Closed`.
//! A connection failure goes straight to `Failed → Closed`.

use crate::db::SqliteWriter;
use crate::error::{LoadError, LoadResult};
use crate::excel::{first_sheet, WorkbookReader};
use crate::types::ColumnInfo;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inputs of one import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub excel_file: PathBuf,
    pub db_file: PathBuf,
    /// Destination table; derived from the sheet name when `None`
    pub table_name: Option<String>,
    /// Source worksheet; the workbook's first sheet when `None`
    pub sheet_name: Option<String>,
}

impl ImportRequest {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(excel_file: P, db_file: Q) -> Self {
        Self {
            excel_file: excel_file.as_ref().to_path_buf(),
            db_file: db_file.as_ref().to_path_buf(),
            table_name: None,
            sheet_name: None,
        }
    }

    /// Set the sheet name. Blank input counts as unspecified.
    pub fn with_sheet(mut self, sheet_name: Option<String>) -> Self {
        self.sheet_name = non_blank(sheet_name);
        self
    }

    /// Set the table name. Blank input counts as unspecified.
    pub fn with_table(mut self, table_name: Option<String>) -> Self {
        self.table_name = non_blank(table_name);
        self
    }
}

// names are kept verbatim: Excel allows leading/trailing spaces in sheet names
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Table name derived from a sheet name: spaces and hyphens become
/// underscores, letters are lower-cased. Nothing else is sanitized.
pub fn derive_table_name(sheet_name: &str) -> String {
    sheet_name.replace([' ', '-'], "_").to_lowercase()
}

/// Pick the worksheet to import from the workbook's sheet names.
///
/// A requested name is returned as-is (its existence is checked when the
/// sheet is loaded); otherwise the first sheet is used, and a workbook with
/// no sheets is `NotFound`.
pub fn resolve_sheet(requested: Option<&str>, available: &[String]) -> LoadResult<String> {
    match requested {
        Some(sheet) => Ok(sheet.to_string()),
        None => first_sheet(available),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Start,
    Connected,
    SheetResolved,
    Loaded,
    TableResolved,
    Written,
    Committed,
    ReportedSchema,
    Failed,
    RolledBack,
    Closed,
}

/// Progress notifications delivered while an import runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent<'a> {
    Reading { file: &'a Path, sheet: &'a str },
    Writing { table: &'a str },
    Committed { table: &'a str, rows: usize },
}

/// Result of a successful import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub sheet_name: String,
    pub table_name: String,
    pub row_count: usize,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug)]
pub enum ImportOutcome {
    Succeeded(ImportReport),
    Failed {
        /// Last stage reached before the failure
        stage: ImportStage,
        error: LoadError,
    },
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Succeeded(_))
    }

    pub fn report(&self) -> Option<&ImportReport> {
        match self {
            ImportOutcome::Succeeded(report) => Some(report),
            ImportOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            ImportOutcome::Succeeded(_) => None,
            ImportOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Runs one import and records the stages it passes through
pub struct Importer {
    request: ImportRequest,
    stage: ImportStage,
    history: Vec<ImportStage>,
}

impl Importer {
    pub fn new(request: ImportRequest) -> Self {
        Self {
            request,
            stage: ImportStage::Start,
            history: vec![ImportStage::Start],
        }
    }

    pub fn request(&self) -> &ImportRequest {
        &self.request
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    /// Every stage visited so far, in order
    pub fn history(&self) -> &[ImportStage] {
        &self.history
    }

    pub fn run(&mut self) -> ImportOutcome {
        self.run_with(|_| {})
    }

    /// Run the import, passing progress events to `observe`.
    ///
    /// Errors are never returned as `Err`: they end up in
    /// [`ImportOutcome::Failed`]. The database connection is closed before
    /// this returns, on every path.
    pub fn run_with<F>(&mut self, mut observe: F) -> ImportOutcome
    where
        F: FnMut(&ImportEvent<'_>),
    {
        let mut writer = match SqliteWriter::open(&self.request.db_file) {
            Ok(writer) => writer,
            Err(error) => {
                let stage = self.stage;
                // reported to the caller through the outcome
                info!(%error, "import failed before connecting");
                self.advance(ImportStage::Failed);
                self.advance(ImportStage::Closed);
                return ImportOutcome::Failed { stage, error };
            }
        };
        self.advance(ImportStage::Connected);

        let result = self.pipeline(&mut writer, &mut observe);
        drop(writer);

        match result {
            Ok(report) => {
                self.advance(ImportStage::Closed);
                ImportOutcome::Succeeded(report)
            }
            Err(error) => {
                let stage = self.stage;
                info!(?stage, %error, "import failed");
                self.advance(ImportStage::Failed);
                // the uncommitted transaction (if any) was dropped with the pipeline
                self.advance(ImportStage::RolledBack);
                self.advance(ImportStage::Closed);
                ImportOutcome::Failed { stage, error }
            }
        }
    }

    fn pipeline<F>(&mut self, writer: &mut SqliteWriter, observe: &mut F) -> LoadResult<ImportReport>
    where
        F: FnMut(&ImportEvent<'_>),
    {
        let reader = WorkbookReader::new(&self.request.excel_file);

        let available = reader.sheet_names()?;
        let sheet = resolve_sheet(self.request.sheet_name.as_deref(), &available)?;
        self.advance(ImportStage::SheetResolved);

        info!(file = %reader.path().display(), sheet = %sheet, "reading worksheet");
        observe(&ImportEvent::Reading {
            file: reader.path(),
            sheet: &sheet,
        });
        let data = reader.read_sheet(&sheet)?;
        self.advance(ImportStage::Loaded);

        let table = self
            .request
            .table_name
            .clone()
            .unwrap_or_else(|| derive_table_name(&sheet));
        self.advance(ImportStage::TableResolved);

        info!(table = %table, rows = data.row_count(), "importing into table");
        observe(&ImportEvent::Writing { table: &table });
        let pending = writer.write_table(&table, &data)?;
        self.advance(ImportStage::Written);

        let rows = pending.commit()?;
        self.advance(ImportStage::Committed);
        observe(&ImportEvent::Committed {
            table: &table,
            rows,
        });

        let columns = writer.table_info(&table)?;
        self.advance(ImportStage::ReportedSchema);

        Ok(ImportReport {
            sheet_name: sheet,
            table_name: table,
            row_count: rows,
            columns,
        })
    }

    fn advance(&mut self, next: ImportStage) {
        debug!(from = ?self.stage, to = ?next, "import stage");
        self.stage = next;
        self.history.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derive_table_name() {
        assert_eq!(derive_table_name("Sales Data-2024"), "sales_data_2024");
        assert_eq!(derive_table_name("Inventory"), "inventory");
        assert_eq!(derive_table_name("Q1 - Totals"), "q1___totals");
        // other characters pass through untouched
        assert_eq!(derive_table_name("P&L.Summary"), "p&l.summary");
    }

    #[test]
    fn test_request_blank_names_are_unspecified() {
        let request = ImportRequest::new("in.xlsx", "out.db")
            .with_sheet(Some("   ".to_string()))
            .with_table(Some(String::new()));
        assert_eq!(request.sheet_name, None);
        assert_eq!(request.table_name, None);

        let request = ImportRequest::new("in.xlsx", "out.db")
            .with_sheet(Some("Data ".to_string()))
            .with_table(Some(" sales".to_string()));
        assert_eq!(request.sheet_name.as_deref(), Some("Data "));
        assert_eq!(request.table_name.as_deref(), Some(" sales"));
    }

    #[test]
    fn test_resolve_sheet() {
        let names = vec!["Sales".to_string(), "Inventory".to_string()];
        assert_eq!(resolve_sheet(None, &names).unwrap(), "Sales");
        assert_eq!(resolve_sheet(Some("Inventory"), &names).unwrap(), "Inventory");
        assert_eq!(resolve_sheet(Some("Data "), &[]).unwrap(), "Data ");
    }

    #[test]
    fn test_resolve_sheet_empty_workbook() {
        match resolve_sheet(None, &[]) {
            Err(LoadError::NotFound(msg)) => assert!(msg.contains("no worksheets")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_failure_history() {
        let dir = TempDir::new().unwrap();
        let request = ImportRequest::new(
            dir.path().join("in.xlsx"),
            dir.path().join("no-such-dir").join("out.db"),
        );

        let mut importer = Importer::new(request);
        let outcome = importer.run();

        match outcome {
            ImportOutcome::Failed { stage, error } => {
                assert_eq!(stage, ImportStage::Start);
                assert!(matches!(error, LoadError::Connection { .. }));
            }
            ImportOutcome::Succeeded(_) => panic!("Expected connection failure"),
        }
        assert_eq!(
            importer.history(),
            &[ImportStage::Start, ImportStage::Failed, ImportStage::Closed]
        );
    }

    #[test]
    fn test_unreadable_workbook_rolls_back() {
        let dir = TempDir::new().unwrap();
        let excel = dir.path().join("broken.xlsx");
        std::fs::write(&excel, b"not a zip archive").unwrap();
        let request = ImportRequest::new(&excel, dir.path().join("out.db"));

        let mut events = 0;
        let mut importer = Importer::new(request);
        let outcome = importer.run_with(|_| events += 1);

        assert!(matches!(outcome.error(), Some(LoadError::FileFormat { .. })));
        assert_eq!(events, 0);
        assert_eq!(
            importer.history(),
            &[
                ImportStage::Start,
                ImportStage::Connected,
                ImportStage::Failed,
                ImportStage::RolledBack,
                ImportStage::Closed,
            ]
        );
        assert_eq!(importer.stage(), ImportStage::Closed);
    }
}
