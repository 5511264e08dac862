pub mod csv;

// Re-export commonly used functions
pub use self::csv::{is_na_token, read_csv, read_csv_from_reader, NA_TOKENS};
