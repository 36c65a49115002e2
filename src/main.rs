use clap::{Parser, Subcommand};
use royalbit_sheetload::cli;
use royalbit_sheetload::error::LoadResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetload")]
#[command(about = "Load one Excel worksheet into a SQLite table.")]
#[command(long_about = "Sheetload - Excel worksheet → SQLite table

Reads one worksheet (first row = column names), replaces the target table
with its rows and prints the resulting column schema.

COMMANDS:
  import       - Import a worksheet into a table
  interactive  - Prompt for paths and names, then import (default)
  schema       - Show the declared schema of an existing table
  sheets       - List worksheet names in a workbook

EXAMPLES:
  sheetload import stock.xlsx stock.db                  # first sheet → derived table
  sheetload import stock.xlsx stock.db -s \"Sales Data-2024\"   # → sales_data_2024
  sheetload import stock.xlsx stock.db -s Inventory -t items
  sheetload schema stock.db inventory

LOGGING:
  RUST_LOG=royalbit_sheetload=debug sheetload import ...   # stage transitions on stderr")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Import one worksheet into a SQLite table.

The database file is created if it does not exist. An existing table with
the same name is dropped and recreated; no index column is added.

NAMING:
  --sheet omitted  → the workbook's first worksheet
  --table omitted  → sheet name with spaces/hyphens → '_', lower-cased

TYPES (declared per column, inferred from the cells):
  whole numbers → INTEGER    other numbers → REAL
  text          → TEXT       booleans      → INTEGER (0/1)
  dates         → TIMESTAMP  mixed columns → TEXT

Failures are printed; the command still exits normally.")]
    /// Import an Excel worksheet into a SQLite table
    Import {
        /// Path to the workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
        input: PathBuf,

        /// Path to the SQLite database (created if missing)
        #[arg(env = "SHEETLOAD_DB")]
        database: PathBuf,

        /// Worksheet to import (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Target table name (default: derived from the sheet name)
        #[arg(short, long)]
        table: Option<String>,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,

        /// Print the import report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prompt for the import inputs, then import
    Interactive {
        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,

        /// Print the import report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the declared schema of an existing table
    Schema {
        /// Path to the SQLite database
        #[arg(env = "SHEETLOAD_DB")]
        database: PathBuf,

        /// Table name
        table: String,
    },

    /// List worksheet names in a workbook
    Sheets {
        /// Path to the workbook
        input: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "royalbit_sheetload=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> LoadResult<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Import {
            input,
            database,
            sheet,
            table,
            verbose,
            json,
        }) => cli::import(input, database, sheet, table, verbose, json).map(|_| ()),

        Some(Commands::Interactive { verbose, json }) => {
            cli::interactive(verbose, json).map(|_| ())
        }

        Some(Commands::Schema { database, table }) => cli::schema(database, table),

        Some(Commands::Sheets { input }) => cli::sheets(input),

        None => cli::interactive(false, false).map(|_| ()),
    }
}
