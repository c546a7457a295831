use ::csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::path::Path;

use crate::{error::InputError, signal::SampleSeries};

pub const TIME_COLUMN: &str = "time";
pub const VOLTAGE_COLUMN: &str = "voltage";

/// Load a CSV recording with named `time` and `voltage` columns. Other columns are ignored.
pub fn read_ecg_csv(path: &Path) -> Result<SampleSeries, InputError> {
    let read_err = |source| InputError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(read_err)?;
    let headers = reader.headers().map_err(read_err)?.clone();
    let time_idx = locate_column(&headers, TIME_COLUMN)?;
    let voltage_idx = locate_column(&headers, VOLTAGE_COLUMN)?;

    let mut time = Vec::new();
    let mut voltage = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(read_err)?;
        // header is line 1
        let row = idx + 2;
        time.push(parse_cell(&record, time_idx, row, TIME_COLUMN)?);
        voltage.push(parse_cell(&record, voltage_idx, row, VOLTAGE_COLUMN)?);
    }
    debug!("read {} sample(s) from {}", time.len(), path.display());
    SampleSeries::new(time, voltage)
}

fn locate_column(headers: &StringRecord, name: &'static str) -> Result<usize, InputError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(InputError::MissingColumn(name))
}

fn parse_cell(
    record: &StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> Result<f64, InputError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<f64>().map_err(|_| InputError::InvalidValue {
        row,
        column,
        value: raw.to_string(),
    })
}
