use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open database '{path}': {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Cannot read spreadsheet '{path}': {message}")]
    FileFormat { path: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Worksheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Worksheet '{0}' has no header row")]
    EmptySheet(String),

    #[error("Failed to write table '{table}': {source}")]
    Write {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
