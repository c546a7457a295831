use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, InputError};

/// A captured single-lead recording: paired time (s) and voltage (mV) samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    time: Vec<f64>,
    voltage: Vec<f64>,
}

impl SampleSeries {
    /// Build a series, rejecting empty, mismatched, non-finite or non-monotonic input.
    pub fn new(time: Vec<f64>, voltage: Vec<f64>) -> Result<Self, InputError> {
        if time.len() != voltage.len() {
            return Err(InputError::LengthMismatch {
                time: time.len(),
                voltage: voltage.len(),
            });
        }
        if time.is_empty() {
            return Err(InputError::Empty);
        }
        if let Some(index) = time
            .iter()
            .zip(&voltage)
            .position(|(t, v)| !t.is_finite() || !v.is_finite())
        {
            return Err(InputError::NonFinite { index });
        }
        if let Some(k) = time.windows(2).position(|w| w[1] <= w[0]) {
            return Err(InputError::NonIncreasingTime {
                index: k + 1,
                previous: time[k],
                current: time[k + 1],
            });
        }
        Ok(Self { time, voltage })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn duration(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Accepted R-peak sample indices, strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakSet {
    pub indices: Vec<usize>,
}

impl PeakSet {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// RR intervals (seconds)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RRSeries {
    pub rr: Vec<f64>,
}

impl RRSeries {
    /// Time differences between consecutive peaks, read off the sample time axis.
    pub fn from_peaks(time: &[f64], peaks: &PeakSet) -> Result<Self, AnalysisError> {
        let stamps = peaks
            .indices
            .iter()
            .map(|&index| {
                time.get(index).copied().ok_or(AnalysisError::PeakOutOfRange {
                    index,
                    len: time.len(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        let rr = stamps.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self { rr })
    }

    pub fn len(&self) -> usize {
        self.rr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rr.is_empty()
    }
}
