use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::dataframe::{
    FitnessFrame, CALORIES_BURNED, DATE, HEART_RATE_AVG, REQUIRED_COLUMNS, STEPS, WORKOUT_TYPE,
};
use crate::error::{Error, Result};
use crate::na::NA;
use crate::series::NASeries;
use crate::temporal;

/// Cell contents read as missing
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
    "#NA",
];

/// Whether a (trimmed) cell denotes a missing value
pub fn is_na_token(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// Reads the fitness records from a CSV file
///
/// The header row must name the five source columns (in any order; extra
/// columns are ignored). Fields are trimmed, short rows are padded with NA
/// and the Date column is parsed with `date_format`, or with a format
/// inferred from the first date when `None`.
pub fn read_csv<P: AsRef<Path>>(path: P, date_format: Option<&str>) -> Result<FitnessFrame> {
    let path = path.as_ref();
    let file = File::open(path).map_err(Error::Io)?;
    let frame = read_csv_from_reader(file, date_format)?;
    log::info!(
        "loaded {} rows from {}",
        frame.row_count(),
        path.display()
    );
    Ok(frame)
}

/// Reads the fitness records from any CSV source
pub fn read_csv_from_reader<R: Read>(reader: R, date_format: Option<&str>) -> Result<FitnessFrame> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(Error::Csv)?.clone();
    let positions = required_positions(&headers)?;

    let mut raw: [Vec<NA<String>>; 5] = Default::default();
    // CSV line of every kept record, for error messages
    let mut lines = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(Error::Csv)?;
        // whitespace-only line; `,,,,` is a row of NA
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        lines.push(record.position().map_or(lines.len() + 2, |p| p.line() as usize));
        for (column, &pos) in raw.iter_mut().zip(positions.iter()) {
            let cell = match record.get(pos) {
                Some(field) if !is_na_token(field) => NA::Value(field.to_string()),
                _ => NA::NA,
            };
            column.push(cell);
        }
    }

    let [date, workout_type, steps, calories_burned, heart_rate_avg] = raw;

    let date = temporal::parse_dates_on_lines(
        &NASeries::new(date, Some(DATE.to_string())),
        date_format,
        &lines,
    )?;
    let workout_type = NASeries::new(workout_type, Some(WORKOUT_TYPE.to_string()));
    let steps = parse_numeric(STEPS, steps, &lines)?;
    let calories_burned = parse_numeric(CALORIES_BURNED, calories_burned, &lines)?;
    let heart_rate_avg = parse_numeric(HEART_RATE_AVG, heart_rate_avg, &lines)?;

    FitnessFrame::new(date, workout_type, steps, calories_burned, heart_rate_avg)
}

fn required_positions(headers: &StringRecord) -> Result<[usize; 5]> {
    let mut positions = [0usize; 5];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
        *slot = headers
            .iter()
            .position(|h| h == *name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
    }
    Ok(positions)
}

fn parse_numeric(name: &str, cells: Vec<NA<String>>, lines: &[usize]) -> Result<NASeries<f64>> {
    let mut values = Vec::with_capacity(cells.len());
    for (row, cell) in cells.into_iter().enumerate() {
        match cell {
            NA::Value(text) => {
                let value = text.parse::<f64>().map_err(|_| Error::Parse {
                    column: name.to_string(),
                    line: lines.get(row).copied().unwrap_or(row + 2),
                    value: text.clone(),
                })?;
                values.push(if value.is_nan() { NA::NA } else { NA::Value(value) });
            }
            NA::NA => values.push(NA::NA),
        }
    }
    Ok(NASeries::new(values, Some(name.to_string())))
}
