use crate::na::NA;
use crate::series::NASeries;

/// String operations over a text column, applied cell by cell
///
/// Missing cells stay missing.
#[derive(Clone, Copy)]
pub struct StringAccessor<'a> {
    series: &'a NASeries<String>,
}

impl<'a> StringAccessor<'a> {
    pub fn new(series: &'a NASeries<String>) -> Self {
        StringAccessor { series }
    }

    /// Removes leading and trailing whitespace
    pub fn strip(&self) -> NASeries<String> {
        self.series.map(|s| s.trim().to_string())
    }

    /// Converts every cell to title case
    pub fn title(&self) -> NASeries<String> {
        self.series.map(|s| title_case(s))
    }
}

impl NASeries<String> {
    /// String accessor for this column
    pub fn str(&self) -> StringAccessor<'_> {
        StringAccessor::new(self)
    }

    /// Turns blank cells into NA
    pub fn blank_to_na(&self) -> NASeries<String> {
        NASeries::new(
            self.values()
                .iter()
                .map(|v| v.and_then(|s| if s.is_empty() { NA::NA } else { NA::Value(s.clone()) }))
                .collect(),
            self.name().cloned(),
        )
    }
}

/// Title-cases a string: the first letter of every run of cased letters is
/// upper-cased and the rest lower-cased
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut previous_is_cased = false;

    for c in s.chars() {
        if is_cased(c) {
            if previous_is_cased {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_cased = true;
        } else {
            result.push(c);
            previous_is_cased = false;
        }
    }

    result
}

/// Letters with distinct upper and lower case forms
fn is_cased(c: char) -> bool {
    c.to_uppercase().ne(c.to_lowercase())
}
