use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::NaiveDate;

use crate::dataframe::{FitnessFrame, Metric};
use crate::error::{Error, Result};
use crate::na::NA;
use crate::series::NASeries;

/// A numeric column split by key
///
/// Rows whose key is NA belong to no group. Groups iterate in key order;
/// `*_in_appearance_order` variants follow the first row of each key.
#[derive(Debug)]
pub struct GroupBy<'a, K>
where
    K: Debug + Ord + Clone,
{
    /// Keys in order of first appearance
    appearance: Vec<K>,

    /// Row positions per key
    groups: BTreeMap<K, Vec<usize>>,

    /// Grouped column
    source: &'a NASeries<f64>,
}

impl<'a, K> GroupBy<'a, K>
where
    K: Debug + Ord + Clone,
{
    /// Groups `source` by `keys`
    pub fn new(keys: &[NA<K>], source: &'a NASeries<f64>) -> Result<Self> {
        if keys.len() != source.len() {
            return Err(Error::DimensionMismatch(format!(
                "key length ({}) differs from column length ({})",
                keys.len(),
                source.len()
            )));
        }

        let mut appearance = Vec::new();
        let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            if let NA::Value(key) = key {
                let rows = groups.entry(key.clone()).or_insert_with(|| {
                    appearance.push(key.clone());
                    Vec::new()
                });
                rows.push(i);
            }
        }

        Ok(GroupBy {
            appearance,
            groups,
            source,
        })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<K> {
        self.groups.keys().cloned().collect()
    }

    /// Keys in order of first appearance
    pub fn keys_in_appearance_order(&self) -> &[K] {
        &self.appearance
    }

    /// Rows per group, NA values included
    pub fn size(&self) -> Vec<(K, usize)> {
        self.groups
            .iter()
            .map(|(k, rows)| (k.clone(), rows.len()))
            .collect()
    }

    /// Present values of one group (empty for an unknown key)
    pub fn values(&self, key: &K) -> Vec<f64> {
        self.groups
            .get(key)
            .map(|rows| {
                rows.iter()
                    .filter_map(|&i| self.source.get(i).and_then(|v| v.value().copied()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Present values of every group, by sorted key
    pub fn groups(&self) -> Vec<(K, Vec<f64>)> {
        self.groups
            .keys()
            .map(|k| (k.clone(), self.values(k)))
            .collect()
    }

    /// Present values of every group, by first appearance
    pub fn groups_in_appearance_order(&self) -> Vec<(K, Vec<f64>)> {
        self.appearance
            .iter()
            .map(|k| (k.clone(), self.values(k)))
            .collect()
    }

    /// Mean of every group (NA when a group has no present value)
    pub fn mean(&self) -> Vec<(K, NA<f64>)> {
        self.groups()
            .into_iter()
            .map(|(k, values)| {
                let mean = if values.is_empty() {
                    NA::NA
                } else {
                    NA::Value(values.iter().sum::<f64>() / values.len() as f64)
                };
                (k, mean)
            })
            .collect()
    }
}

/// Groups a numeric column by workout type
pub fn group_by_workout(frame: &FitnessFrame, metric: Metric) -> Result<GroupBy<'_, String>> {
    GroupBy::new(frame.workout_type().values(), frame.metric(metric)?)
}

/// Per-day averages of the three measured columns, ordered by date
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMeans {
    pub dates: Vec<NaiveDate>,
    pub steps: Vec<NA<f64>>,
    pub calories_burned: Vec<NA<f64>>,
    pub heart_rate_avg: Vec<NA<f64>>,
}

impl DailyMeans {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Averages of one measured column
    pub fn series(&self, metric: Metric) -> Option<&[NA<f64>]> {
        match metric {
            Metric::Steps => Some(&self.steps),
            Metric::CaloriesBurned => Some(&self.calories_burned),
            Metric::HeartRateAvg => Some(&self.heart_rate_avg),
            Metric::CaloriesPerStep => None,
        }
    }
}

/// Averages Steps, Calories_Burned and Heart_Rate_avg per date
///
/// Rows without a date are skipped; NA cells are skipped per column.
pub fn daily_means(frame: &FitnessFrame) -> Result<DailyMeans> {
    let dates = frame.dates().values();
    let steps = GroupBy::new(dates, frame.metric(Metric::Steps)?)?;
    let calories = GroupBy::new(dates, frame.metric(Metric::CaloriesBurned)?)?;
    let heart_rate = GroupBy::new(dates, frame.metric(Metric::HeartRateAvg)?)?;

    let unzip = |means: Vec<(NaiveDate, NA<f64>)>| -> Vec<NA<f64>> {
        means.into_iter().map(|(_, mean)| mean).collect()
    };

    Ok(DailyMeans {
        dates: steps.keys(),
        steps: unzip(steps.mean()),
        calories_burned: unzip(calories.mean()),
        heart_rate_avg: unzip(heart_rate.mean()),
    })
}
