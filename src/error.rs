use thiserror::Error;

/// Result alias used across the data layer.
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised while configuring, loading, or rescaling a dataset.
///
/// There is no retry path anywhere: a mis-sized or partially parsed vector
/// would corrupt every downstream training signal, so every failure aborts
/// the operation that raised it.
#[derive(Debug, Error)]
pub enum DataError {
    /// Invalid row ranges, maps, or a column that cannot be normalized.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The file ended before a configured range was satisfied.
    #[error("{partition} range exhausted the file: {rows_read} of {rows_expected} rows read")]
    DataShortfall {
        partition: &'static str,
        rows_read: usize,
        rows_expected: usize,
    },

    /// An accessor was called before `load()` populated the matrix it
    /// needs, or before the corresponding column map was set.
    #[error("not loaded: {0}")]
    NotLoaded(&'static str),

    /// A value fell outside the domain of a rescaling operation.
    #[error("value {value} outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    /// A column map referenced a column past the end of a source row.
    #[error("column {index} requested from a source row with {width} fields")]
    ColumnOutOfRange { index: usize, width: usize },

    /// A row accessor was given an index past the end of the matrix.
    #[error("row {index} requested from a matrix with {rows} rows")]
    RowOutOfRange { index: usize, rows: usize },

    /// A field did not parse as a floating-point number.
    #[error("line {line}, field {field}: '{text}' is not a number")]
    Parse {
        line: usize,
        field: usize,
        text: String,
    },

    /// Malformed delimited input underneath the field level.
    #[error("delimited read error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
