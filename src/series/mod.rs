mod na_series;
mod string_accessor;

pub use self::na_series::NASeries;
pub use self::string_accessor::{title_case, StringAccessor};
