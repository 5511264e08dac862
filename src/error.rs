use thiserror::Error;

/// Errors raised while loading, cleaning, analysing or plotting the dataset
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[source] csv::Error),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("cannot parse '{value}' in column '{column}' (line {line}) as a number")]
    Parse {
        column: String,
        line: usize,
        value: String,
    },

    #[error("malformed date: {0}")]
    DateFormat(String),

    #[error("no data: {0}")]
    EmptyData(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("computation error: {0}")]
    ComputationError(String),

    #[error("visualization error: {0}")]
    Visualization(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

// Plotters drawing errors
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for Error
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Visualization(format!("drawing failed: {}", err))
    }
}
