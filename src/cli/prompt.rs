//! Interactive input collection

use crate::error::{LoadError, LoadResult};
use crate::importer::ImportRequest;
use std::io::{self, BufRead, Write};

/// Ask for the import inputs one line at a time.
///
/// The Excel and database paths are required; blank sheet/table answers
/// leave those names unspecified.
pub fn collect_request<R, W>(input: &mut R, output: &mut W) -> LoadResult<ImportRequest>
where
    R: BufRead,
    W: Write,
{
    let excel_file = ask_required(input, output, "Excel file path")?;
    let db_file = ask_required(input, output, "SQLite database path (created if missing)")?;
    let sheet_name = ask(input, output, "Worksheet to import (blank = first sheet)")?;
    let table_name = ask(input, output, "Target table name (blank = sheet name)")?;

    Ok(ImportRequest::new(excel_file, db_file)
        .with_sheet(sheet_name)
        .with_table(table_name))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> LoadResult<Option<String>> {
    write!(output, "{}: ", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

fn ask_required<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> LoadResult<String> {
    ask(input, output, label)?.ok_or_else(|| {
        LoadError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is required", label),
        ))
    })
}
