use crate::cli::prompt;
use crate::db::SqliteWriter;
use crate::error::{LoadError, LoadResult};
use crate::excel::WorkbookReader;
use crate::importer::{ImportEvent, ImportOutcome, ImportRequest, Importer};
use crate::types::ColumnInfo;
use colored::Colorize;
use std::io;
use std::path::PathBuf;

/// Execute the import command
///
/// Import failures are printed, not returned: the outcome is handed back so
/// callers can inspect it, and only `--json` serialization can fail.
pub fn import(
    input: PathBuf,
    database: PathBuf,
    sheet: Option<String>,
    table: Option<String>,
    verbose: bool,
    json: bool,
) -> LoadResult<ImportOutcome> {
    let request = ImportRequest::new(&input, &database)
        .with_sheet(sheet)
        .with_table(table);
    run_import(request, verbose, json)
}

/// Execute the interactive command: prompt for inputs, then import
pub fn interactive(verbose: bool, json: bool) -> LoadResult<ImportOutcome> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let request = prompt::collect_request(&mut stdin.lock(), &mut stdout)?;
    println!();
    run_import(request, verbose, json)
}

fn run_import(request: ImportRequest, verbose: bool, json: bool) -> LoadResult<ImportOutcome> {
    if verbose {
        println!("{}", "🔥 Sheetload - Excel → SQLite".bold().green());
        println!("   Input:    {}", request.excel_file.display());
        println!("   Database: {}\n", request.db_file.display());
    }

    let mut importer = Importer::new(request);
    let outcome = importer.run_with(|event| match event {
        // keep stdout parseable in JSON mode
        _ if json => {}
        ImportEvent::Reading { file, sheet } => {
            println!(
                "{} {}, sheet {}",
                "📖 Reading".cyan(),
                file.display(),
                sheet.bright_blue()
            );
        }
        ImportEvent::Writing { table } => {
            println!("{} {}", "💾 Importing into table".cyan(), table.bright_blue());
        }
        ImportEvent::Committed { rows, .. } => {
            println!("{} ({} rows)", "✅ Import succeeded".bold().green(), rows);
        }
    });

    match &outcome {
        ImportOutcome::Succeeded(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                println!("\n{}", "Table schema:".bold());
                print_columns(&report.columns);
            }
        }
        ImportOutcome::Failed { error, .. } => {
            println!("{} {}", "❌ Import failed:".bold().red(), error);
        }
    }

    if verbose {
        let stages: Vec<String> = importer
            .history()
            .iter()
            .map(|stage| format!("{:?}", stage))
            .collect();
        println!("\n   Stages: {}", stages.join(" → "));
    }

    Ok(outcome)
}

/// Execute the schema command: describe an existing table
pub fn schema(database: PathBuf, table: String) -> LoadResult<()> {
    let writer = SqliteWriter::open_read_only(&database)?;
    let columns = writer.table_info(&table)?;
    if columns.is_empty() {
        return Err(LoadError::NotFound(format!(
            "table '{}' in {}",
            table,
            database.display()
        )));
    }
    let rows = writer.row_count(&table)?;

    println!(
        "{} {} ({} rows)",
        "📋 Table".bold().green(),
        table.bright_blue(),
        rows
    );
    print_columns(&columns);
    Ok(())
}

/// Execute the sheets command: list worksheet names in workbook order
pub fn sheets(input: PathBuf) -> LoadResult<()> {
    let reader = WorkbookReader::new(&input);
    let names = reader.sheet_names()?;
    if names.is_empty() {
        return Err(LoadError::NotFound(format!(
            "no worksheets in {}",
            input.display()
        )));
    }

    println!("{} {}", "📊 Worksheets in".bold().green(), input.display());
    for (idx, name) in names.iter().enumerate() {
        if idx == 0 {
            println!("   {}. {} {}", idx + 1, name, "(default)".dimmed());
        } else {
            println!("   {}. {}", idx + 1, name);
        }
    }
    Ok(())
}

fn print_columns(columns: &[ColumnInfo]) {
    for column in columns {
        println!("{}", column);
    }
}
