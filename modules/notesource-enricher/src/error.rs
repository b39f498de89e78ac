use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnrichError>;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(String),

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column {column} has {found} values for {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
}
