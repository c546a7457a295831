//! Line-by-line accumulation of hand-entered `time voltage` pairs.
//!
//! The accumulator never touches stdin itself; the caller feeds it lines and
//! decides how to prompt and how to report rejected entries.

use crate::{
    error::{EntryError, InputError},
    signal::SampleSeries,
};

/// Token that ends manual entry (matched case-insensitively).
pub const SENTINEL: &str = "done";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// A sample was stored.
    Accepted,
    /// Blank line, nothing stored.
    Skipped,
    /// The sentinel was entered.
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    time: Vec<f64>,
    voltage: Vec<f64>,
}

impl ManualEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Validate one line and store it. A rejected line leaves the accumulator unchanged.
    pub fn push_line(&mut self, line: &str) -> Result<EntryStatus, EntryError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(EntryStatus::Skipped);
        }
        if trimmed.eq_ignore_ascii_case(SENTINEL) {
            return Ok(EntryStatus::Finished);
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [t, v] = fields.as_slice() else {
            return Err(EntryError::FieldCount(fields.len()));
        };
        let time = parse_value(t)?;
        let voltage = parse_value(v)?;
        if let Some(&previous) = self.time.last() {
            if time <= previous {
                return Err(EntryError::NonIncreasingTime {
                    previous,
                    current: time,
                });
            }
        }
        self.time.push(time);
        self.voltage.push(voltage);
        Ok(EntryStatus::Accepted)
    }

    pub fn finish(self) -> Result<SampleSeries, InputError> {
        SampleSeries::new(self.time, self.voltage)
    }
}

fn parse_value(token: &str) -> Result<f64, EntryError> {
    let value: f64 = token
        .parse()
        .map_err(|_| EntryError::NotANumber(token.to_string()))?;
    if !value.is_finite() {
        return Err(EntryError::NonFinite(token.to_string()));
    }
    Ok(value)
}
