use std::io;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::model::{Measurement, Param, PendulumDataset};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Load failures. All of them abort the load attempt as a whole; the caller
/// keeps whatever dataset it had before.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file contains no data rows")]
    EmptyDataset,

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}, column '{column}': {message}")]
    MalformedRow {
        /// 1-based data row (the header is not counted).
        row: usize,
        column: &'static str,
        message: String,
    },

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

const DATE_COLUMN: &str = "date_recorded";
const TIME_COLUMN: &str = "time_recorded";

/// Load a pendulum dataset from a CSV file.
///
/// Expected layout: header row with at least `date_recorded` (YYYY-MM-DD),
/// `time_recorded` (HH:MM:SS, optional fractional seconds) and the four
/// parameter columns. Extra columns are ignored. The load is all-or-nothing:
/// any row that fails to parse fails the entire load.
pub fn load_csv(path: &Path) -> Result<PendulumDataset, LoadError> {
    read_rows(csv::Reader::from_path(path)?)
}

fn read_rows<R: io::Read>(mut reader: csv::Reader<R>) -> Result<PendulumDataset, LoadError> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let find = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };

    let date_idx = find(DATE_COLUMN)?;
    let time_idx = find(TIME_COLUMN)?;
    let mut value_idx = [0usize; Param::COUNT];
    for param in Param::ALL {
        value_idx[param.index()] = find(param.column_name())?;
    }

    let mut rows: Vec<(NaiveDateTime, [f64; Param::COUNT])> = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result?;

        let timestamp = parse_timestamp(&record, row, date_idx, time_idx)?;

        let mut values = [0.0; Param::COUNT];
        for param in Param::ALL {
            values[param.index()] =
                parse_value(&record, row, value_idx[param.index()], param.column_name())?;
        }

        rows.push((timestamp, values));
    }

    if rows.is_empty() {
        return Err(LoadError::EmptyDataset);
    }

    // Source files are not guaranteed to be time-ordered; the elapsed-seconds
    // axis requires it.
    rows.sort_by_key(|(ts, _)| *ts);

    let first = rows[0].0;
    let samples = rows
        .into_iter()
        .map(|(timestamp, values)| Measurement {
            timestamp,
            elapsed_seconds: (timestamp - first).num_milliseconds() as f64 / 1000.0,
            values,
        })
        .collect();

    Ok(PendulumDataset { samples })
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

fn field<'r>(
    record: &'r csv::StringRecord,
    row: usize,
    idx: usize,
    column: &'static str,
) -> Result<&'r str, LoadError> {
    record.get(idx).ok_or_else(|| LoadError::MalformedRow {
        row,
        column,
        message: "missing value".to_string(),
    })
}

fn parse_timestamp(
    record: &csv::StringRecord,
    row: usize,
    date_idx: usize,
    time_idx: usize,
) -> Result<NaiveDateTime, LoadError> {
    let date_str = field(record, row, date_idx, DATE_COLUMN)?.trim();
    let time_str = field(record, row, time_idx, TIME_COLUMN)?.trim();

    let date =
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| LoadError::MalformedRow {
            row,
            column: DATE_COLUMN,
            message: format!("'{date_str}': {e}"),
        })?;
    let time = NaiveTime::parse_from_str(time_str, "%H:%M:%S%.f").map_err(|e| {
        LoadError::MalformedRow {
            row,
            column: TIME_COLUMN,
            message: format!("'{time_str}': {e}"),
        }
    })?;

    Ok(NaiveDateTime::new(date, time))
}

fn parse_value(
    record: &csv::StringRecord,
    row: usize,
    idx: usize,
    column: &'static str,
) -> Result<f64, LoadError> {
    let raw = field(record, row, idx, column)?.trim();
    let value: f64 = raw.parse().map_err(|_| LoadError::MalformedRow {
        row,
        column,
        message: format!("'{raw}' is not a number"),
    })?;
    // "NaN" and "inf" parse as f64 but would poison the IQR suggestions.
    if !value.is_finite() {
        return Err(LoadError::MalformedRow {
            row,
            column,
            message: format!("'{raw}' is not finite"),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "date_recorded,time_recorded,semi_major_axis,semi_minor_axis,rotation_angle_deg,eccentricity";

    fn load(text: &str) -> Result<PendulumDataset, LoadError> {
        read_rows(csv::Reader::from_reader(text.as_bytes()))
    }

    #[test]
    fn loads_well_formed_csv() {
        let ds = load(&format!(
            "{HEADER}\n\
             2024-03-01,12:00:00,1.20,0.80,15.0,0.745\n\
             2024-03-01,12:00:00.500,1.19,0.79,15.2,0.746\n\
             2024-03-01,12:00:02,1.18,0.78,15.4,0.747\n"
        ))
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.samples[0].elapsed_seconds, 0.0);
        assert_eq!(ds.samples[1].elapsed_seconds, 0.5);
        assert_eq!(ds.samples[2].elapsed_seconds, 2.0);
        assert_eq!(ds.samples[0].value(Param::SemiMajorAxis), 1.20);
        assert_eq!(ds.samples[2].value(Param::RotationAngle), 15.4);
    }

    #[test]
    fn sorts_rows_by_timestamp_before_deriving_elapsed() {
        let ds = load(&format!(
            "{HEADER}\n\
             2024-03-01,12:00:02,3.0,0.8,15.0,0.7\n\
             2024-03-01,12:00:00,1.0,0.8,15.0,0.7\n\
             2024-03-01,12:00:01,2.0,0.8,15.0,0.7\n"
        ))
        .unwrap();

        let elapsed: Vec<f64> = ds.samples.iter().map(|m| m.elapsed_seconds).collect();
        assert_eq!(elapsed, vec![0.0, 1.0, 2.0]);
        // Values travel with their timestamps.
        assert_eq!(ds.column_values(Param::SemiMajorAxis), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn ignores_extra_columns() {
        let ds = load(
            "operator,date_recorded,time_recorded,semi_major_axis,semi_minor_axis,\
             rotation_angle_deg,eccentricity,notes\n\
             Ada,2024-03-01,12:00:00,1.2,0.8,15.0,0.745,ok\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.samples[0].value(Param::Eccentricity), 0.745);
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            load(&format!("{HEADER}\n")),
            Err(LoadError::EmptyDataset)
        ));
    }

    #[test]
    fn missing_column_is_named() {
        let err = load(
            "date_recorded,time_recorded,semi_major_axis,semi_minor_axis,rotation_angle_deg\n\
             2024-03-01,12:00:00,1.2,0.8,15.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("eccentricity")));
    }

    #[test]
    fn malformed_number_names_row_and_column() {
        let err = load(&format!(
            "{HEADER}\n\
             2024-03-01,12:00:00,1.2,0.8,15.0,0.745\n\
             2024-03-01,12:00:01,1.2,oops,15.0,0.745\n"
        ))
        .unwrap_err();
        match err {
            LoadError::MalformedRow { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "semi_minor_axis");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_timestamp_fails_the_load() {
        let err = load(&format!(
            "{HEADER}\n\
             2024-13-01,12:00:00,1.2,0.8,15.0,0.745\n"
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRow {
                row: 1,
                column: "date_recorded",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = load(&format!(
            "{HEADER}\n\
             2024-03-01,12:00:00,NaN,0.8,15.0,0.745\n"
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRow {
                column: "semi_major_axis",
                ..
            }
        ));
    }
}
