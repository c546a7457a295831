use std::path::PathBuf;
use thiserror::Error;

/// Problems with the recording itself. These are fatal for a run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("the input file must have '{0}' column")]
    MissingColumn(&'static str),
    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("sample series is empty")]
    Empty,
    #[error("time and voltage lengths differ ({time} vs {voltage})")]
    LengthMismatch { time: usize, voltage: usize },
    #[error("sample {index} is not a finite number")]
    NonFinite { index: usize },
    #[error("time must be strictly increasing (sample {index}: {previous} then {current})")]
    NonIncreasingTime {
        index: usize,
        previous: f64,
        current: f64,
    },
}

/// A rejected line of manual entry. The caller reports it and asks again.
#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("expected 'time voltage', got {0} field(s)")]
    FieldCount(usize),
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' is not a finite number")]
    NonFinite(String),
    #[error("time {current} must be greater than the previous time {previous}")]
    NonIncreasingTime { previous: f64, current: f64 },
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("peak index {index} is outside the time axis of {len} samples")]
    PeakOutOfRange { index: usize, len: usize },
    #[error("mean RR interval is {mean_s} s; heart rate is undefined")]
    DegenerateIntervals { mean_s: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("peak height must be a finite value >= 0, got {0}")]
    InvalidHeight(f64),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
