use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::na::NA;

/// A named column whose cells may be missing
#[derive(Debug, Clone, PartialEq)]
pub struct NASeries<T>
where
    T: Debug + Clone,
{
    /// Cell values (NA-wrapped)
    values: Vec<NA<T>>,

    /// Column name
    name: Option<String>,
}

impl<T> NASeries<T>
where
    T: Debug + Clone,
{
    /// Creates a series from NA-wrapped values
    pub fn new(values: Vec<NA<T>>, name: Option<String>) -> Self {
        NASeries { values, name }
    }

    /// Creates a series with no missing cells
    pub fn from_vec(values: Vec<T>, name: Option<String>) -> Self {
        Self::new(values.into_iter().map(NA::Value).collect(), name)
    }

    /// Creates a series from options (None becomes NA)
    pub fn from_options(values: Vec<Option<T>>, name: Option<String>) -> Self {
        Self::new(values.into_iter().map(NA::from).collect(), name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a row position
    pub fn get(&self, pos: usize) -> Option<&NA<T>> {
        self.values.get(pos)
    }

    pub fn values(&self) -> &[NA<T>] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [NA<T>] {
        &mut self.values
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Number of missing cells
    pub fn na_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_na()).count()
    }

    /// Number of present cells
    pub fn value_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_value()).count()
    }

    pub fn has_na(&self) -> bool {
        self.values.iter().any(|v| v.is_na())
    }

    /// Present values only, in row order
    pub fn dropna(&self) -> Vec<T> {
        self.values
            .iter()
            .filter_map(|v| v.value().cloned())
            .collect()
    }

    /// Applies `f` to every present value
    pub fn map<U, F>(&self, f: F) -> NASeries<U>
    where
        U: Debug + Clone,
        F: Fn(&T) -> U,
    {
        NASeries::new(
            self.values.iter().map(|v| v.map(&f)).collect(),
            self.name.clone(),
        )
    }

    /// Rows at the given positions, in the given order
    pub fn take(&self, positions: &[usize]) -> Result<Self> {
        let mut values = Vec::with_capacity(positions.len());
        for &pos in positions {
            let value = self.values.get(pos).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "row {} out of bounds for column of length {}",
                    pos,
                    self.values.len()
                ))
            })?;
            values.push(value.clone());
        }
        Ok(NASeries::new(values, self.name.clone()))
    }
}

impl<T> NASeries<T>
where
    T: Debug + Clone + PartialEq,
{
    /// Distinct cells in order of first appearance (NA included once)
    pub fn unique(&self) -> Vec<NA<T>> {
        let mut seen: Vec<NA<T>> = Vec::new();
        for value in &self.values {
            if !seen.contains(value) {
                seen.push(value.clone());
            }
        }
        seen
    }
}

impl NASeries<f64> {
    /// Mean of the present values
    pub fn mean(&self) -> NA<f64> {
        let values = self.dropna();
        if values.is_empty() {
            return NA::NA;
        }
        NA::Value(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Minimum of the present values
    pub fn min(&self) -> NA<f64> {
        self.dropna().into_iter().reduce(f64::min).into()
    }

    /// Maximum of the present values
    pub fn max(&self) -> NA<f64> {
        self.dropna().into_iter().reduce(f64::max).into()
    }

    /// Whether every present value is a whole number
    pub fn is_integral(&self) -> bool {
        self.values
            .iter()
            .filter_map(|v| v.value())
            .all(|v| v.fract() == 0.0)
    }
}
