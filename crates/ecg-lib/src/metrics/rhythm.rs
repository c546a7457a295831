use crate::{
    error::AnalysisError,
    metrics::classify::{classify, Consultation},
    signal::{PeakSet, RRSeries},
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of an RR series, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalSummary {
    pub count: usize,
    pub mean_s: f64,
    pub min_s: f64,
    pub max_s: f64,
    /// Population standard deviation.
    pub std_dev_s: f64,
    pub rmssd_s: f64,
}

impl IntervalSummary {
    pub fn from_rr(rr: &RRSeries) -> Self {
        let n = rr.len();
        if n == 0 {
            return Self::default();
        }
        let mean_s = rr.rr.iter().sum::<f64>() / n as f64;
        let min_s = rr.rr.iter().copied().fold(f64::INFINITY, f64::min);
        let max_s = rr.rr.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let std_dev_s =
            (rr.rr.iter().map(|x| (x - mean_s).powi(2)).sum::<f64>() / n as f64).sqrt();
        let rmssd_s = if n > 1 {
            let diffs = rr.rr.windows(2).map(|w| (w[1] - w[0]).powi(2));
            (diffs.sum::<f64>() / (n as f64 - 1.0)).sqrt()
        } else {
            0.0
        };
        Self {
            count: n,
            mean_s,
            min_s,
            max_s,
            std_dev_s,
            rmssd_s,
        }
    }

    /// Spread between the longest and shortest interval, in seconds.
    pub fn range_s(&self) -> f64 {
        self.max_s - self.min_s
    }
}

/// Rhythm summary of one recording. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmMetrics {
    /// Beats per minute.
    pub heart_rate: f64,
    /// Standard deviation of RR intervals, seconds.
    pub hr_variability: f64,
    /// RR range in milliseconds. Kept under its historical name; this is not a QRS width.
    pub qrs_duration: f64,
    pub consultation: Consultation,
}

impl RhythmMetrics {
    fn insufficient() -> Self {
        Self {
            heart_rate: 0.0,
            hr_variability: 0.0,
            qrs_duration: 0.0,
            consultation: Consultation::InsufficientData,
        }
    }
}

/// Derive heart rate, variability and RR range from peak positions on the time axis.
///
/// Fewer than two peaks yields all-zero metrics with [`Consultation::InsufficientData`].
pub fn compute_metrics(time: &[f64], peaks: &PeakSet) -> Result<RhythmMetrics, AnalysisError> {
    let rr = RRSeries::from_peaks(time, peaks)?;
    metrics_from_intervals(&IntervalSummary::from_rr(&rr))
}

/// Rhythm metrics of an already summarized RR series.
pub fn metrics_from_intervals(summary: &IntervalSummary) -> Result<RhythmMetrics, AnalysisError> {
    if summary.count == 0 {
        debug!("fewer than two peaks; no rhythm data");
        return Ok(RhythmMetrics::insufficient());
    }
    if !summary.mean_s.is_finite() || summary.mean_s <= 0.0 {
        return Err(AnalysisError::DegenerateIntervals {
            mean_s: summary.mean_s,
        });
    }
    let heart_rate = 60.0 / summary.mean_s;
    let hr_variability = summary.std_dev_s;
    let qrs_duration = summary.range_s() * 1000.0;
    debug!(
        "{} RR interval(s): mean {:.4} s, heart rate {:.2} bpm",
        summary.count, summary.mean_s, heart_rate
    );
    Ok(RhythmMetrics {
        heart_rate,
        hr_variability,
        qrs_duration,
        consultation: classify(heart_rate, hr_variability),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks(indices: &[usize]) -> PeakSet {
        PeakSet::from_indices(indices.to_vec())
    }

    #[test]
    fn one_second_beats_are_sixty_bpm() {
        let time = [0.0, 1.0, 2.0, 3.0];
        let m = compute_metrics(&time, &peaks(&[0, 1, 2, 3])).unwrap();
        assert_eq!(m.heart_rate, 60.0);
        assert_eq!(m.hr_variability, 0.0);
        assert_eq!(m.qrs_duration, 0.0);
        assert_eq!(m.consultation, Consultation::Normal);
    }

    #[test]
    fn slow_beats_are_bradycardia() {
        let time: Vec<f64> = (0..5).map(|i| i as f64 * (4.0 / 3.0)).collect();
        let m = compute_metrics(&time, &peaks(&[0, 1, 2, 3, 4])).unwrap();
        assert!((m.heart_rate - 45.0).abs() < 1e-9);
        assert_eq!(m.consultation, Consultation::Bradycardia);
    }

    #[test]
    fn fewer_than_two_peaks_gives_zeros() {
        let time = [0.0, 1.0, 2.0];
        for set in [peaks(&[]), peaks(&[1])] {
            let m = compute_metrics(&time, &set).unwrap();
            assert_eq!(m.heart_rate, 0.0);
            assert_eq!(m.hr_variability, 0.0);
            assert_eq!(m.qrs_duration, 0.0);
            assert_eq!(m.consultation, Consultation::InsufficientData);
        }
    }

    #[test]
    fn variability_is_population_std_dev() {
        // rr = [0.6, 1.0]: mean 0.8, std 0.2, range 400 ms
        let time = [0.0, 0.6, 1.6];
        let m = compute_metrics(&time, &peaks(&[0, 1, 2])).unwrap();
        assert!((m.heart_rate - 75.0).abs() < 1e-9);
        assert!((m.hr_variability - 0.2).abs() < 1e-12);
        assert!((m.qrs_duration - 400.0).abs() < 1e-9);
        assert_eq!(m.consultation, Consultation::PossibleArrhythmia);
    }

    #[test]
    fn duplicate_timestamps_are_degenerate() {
        let time = [1.0, 1.0, 1.0];
        let err = compute_metrics(&time, &peaks(&[0, 1, 2])).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateIntervals { .. }));
    }

    #[test]
    fn summary_of_irregular_intervals() {
        let rr = RRSeries {
            rr: vec![0.8, 0.9, 0.7],
        };
        let s = IntervalSummary::from_rr(&rr);
        assert_eq!(s.count, 3);
        assert!((s.mean_s - 0.8).abs() < 1e-12);
        assert!((s.range_s() - 0.2).abs() < 1e-12);
        // successive diffs 0.1 and -0.2
        assert!((s.rmssd_s - (0.05f64 / 2.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn summary_and_peak_paths_agree() {
        let time = [0.0, 0.6, 1.6, 2.3];
        let set = peaks(&[0, 1, 2, 3]);
        let rr = RRSeries::from_peaks(&time, &set).unwrap();
        let from_summary = metrics_from_intervals(&IntervalSummary::from_rr(&rr)).unwrap();
        assert_eq!(from_summary, compute_metrics(&time, &set).unwrap());
        assert_eq!(
            metrics_from_intervals(&IntervalSummary::default())
                .unwrap()
                .consultation,
            Consultation::InsufficientData
        );
    }

    #[test]
    fn empty_summary_is_zero() {
        assert_eq!(
            IntervalSummary::from_rr(&RRSeries::default()),
            IntervalSummary::default()
        );
    }
}
