use crate::{
    error::{AnalysisError, ConfigError},
    metrics::rhythm::{metrics_from_intervals, IntervalSummary, RhythmMetrics},
    signal::{PeakSet, RRSeries, SampleSeries},
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Parameters of the local-maximum R-peak detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakDetectorConfig {
    /// Minimum voltage (mV) a local maximum must reach.
    pub height: f64,
    /// Refractory distance in samples between accepted peaks.
    pub min_distance: usize,
}

impl Default for PeakDetectorConfig {
    fn default() -> Self {
        Self {
            height: 0.5,
            min_distance: 200,
        }
    }
}

impl PeakDetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(ConfigError::InvalidHeight(self.height));
        }
        if self.min_distance == 0 {
            warn!("min_distance of 0 samples is treated as 1");
        }
        Ok(())
    }
}

/// Result of running detection, interval extraction and metrics over one recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcgAnalysis {
    pub sample_count: usize,
    pub peaks: PeakSet,
    pub rr: RRSeries,
    pub intervals: IntervalSummary,
    pub metrics: RhythmMetrics,
}

impl EcgAnalysis {
    pub fn from_peaks(series: &SampleSeries, peaks: PeakSet) -> Result<Self, AnalysisError> {
        let rr = RRSeries::from_peaks(series.time(), &peaks)?;
        let intervals = IntervalSummary::from_rr(&rr);
        let metrics = metrics_from_intervals(&intervals)?;
        Ok(Self {
            sample_count: series.len(),
            peaks,
            rr,
            intervals,
            metrics,
        })
    }
}

/// Scan for interior local maxima at or above `height`, keeping only peaks at
/// least `min_distance` samples after the previously accepted one.
///
/// The first peak in scan order wins: a taller peak inside the refractory
/// window does not replace an earlier accepted one. A `min_distance` of 0
/// behaves like 1.
pub fn find_peaks(voltage: &[f64], height: f64, min_distance: usize) -> PeakSet {
    let min_distance = min_distance.max(1);
    let mut peaks: Vec<usize> = Vec::new();
    if voltage.len() < 3 {
        return PeakSet::from_indices(peaks);
    }
    for i in 1..voltage.len() - 1 {
        let v = voltage[i];
        if v < height || v <= voltage[i - 1] || v <= voltage[i + 1] {
            continue;
        }
        if peaks.last().map_or(true, |&last| i - last >= min_distance) {
            peaks.push(i);
        }
    }
    PeakSet::from_indices(peaks)
}

pub fn detect_r_peaks(series: &SampleSeries, cfg: &PeakDetectorConfig) -> PeakSet {
    let peaks = find_peaks(series.voltage(), cfg.height, cfg.min_distance);
    debug!(
        "detected {} R-peak(s) in {} samples (height {}, min distance {})",
        peaks.len(),
        series.len(),
        cfg.height,
        cfg.min_distance
    );
    peaks
}

/// Convenience helper that runs R-peak detection and derives rhythm metrics.
pub fn run_analysis(
    series: &SampleSeries,
    cfg: &PeakDetectorConfig,
) -> Result<EcgAnalysis, AnalysisError> {
    let peaks = detect_r_peaks(series, cfg);
    EcgAnalysis::from_peaks(series, peaks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::classify::Consultation;

    #[test]
    fn finds_both_peaks_with_unit_distance() {
        let voltage = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(find_peaks(&voltage, 0.5, 1).indices, vec![1, 3]);
    }

    #[test]
    fn refractory_window_drops_second_peak() {
        let voltage = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(find_peaks(&voltage, 0.5, 3).indices, vec![1]);
    }

    #[test]
    fn distance_equal_to_minimum_is_accepted() {
        let voltage = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(find_peaks(&voltage, 0.5, 2).indices, vec![1, 3]);
    }

    #[test]
    fn earlier_peak_wins_over_taller_neighbour() {
        let voltage = [0.0, 0.8, 0.0, 2.0, 0.0];
        assert_eq!(find_peaks(&voltage, 0.5, 3).indices, vec![1]);
    }

    #[test]
    fn zero_min_distance_behaves_like_one() {
        let voltage = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(
            find_peaks(&voltage, 0.5, 0),
            find_peaks(&voltage, 0.5, 1)
        );
    }

    #[test]
    fn flat_and_falling_signals_have_no_peaks() {
        assert!(find_peaks(&[0.0; 16], 0.0, 1).is_empty());
        let falling: Vec<f64> = (0..16).map(|i| 2.0 - i as f64 * 0.1).collect();
        assert!(find_peaks(&falling, 0.0, 1).is_empty());
        let stepped = [1.0, 1.0, 0.5, 0.5, 0.2];
        assert!(find_peaks(&stepped, 0.0, 1).is_empty());
    }

    #[test]
    fn boundary_samples_are_never_peaks() {
        assert!(find_peaks(&[5.0, 1.0, 5.0], 0.5, 1).is_empty());
        assert!(find_peaks(&[0.0, 5.0], 0.5, 1).is_empty());
        assert!(find_peaks(&[], 0.5, 1).is_empty());
    }

    #[test]
    fn plateau_is_not_a_peak() {
        let voltage = [0.0, 1.0, 1.0, 0.0];
        assert!(find_peaks(&voltage, 0.5, 1).is_empty());
    }

    #[test]
    fn height_threshold_is_inclusive() {
        let voltage = [0.0, 0.5, 0.0, 0.49, 0.0];
        assert_eq!(find_peaks(&voltage, 0.5, 1).indices, vec![1]);
    }

    #[test]
    fn accepted_peaks_satisfy_detector_invariants() {
        let voltage: Vec<f64> = (0..400)
            .map(|i| {
                let x = i as f64 * 0.37;
                x.sin() + 0.4 * (x * 3.1).cos()
            })
            .collect();
        let (height, min_distance) = (0.3, 7);
        let peaks = find_peaks(&voltage, height, min_distance);
        assert!(!peaks.is_empty());
        for &i in &peaks.indices {
            assert!(i > 0 && i < voltage.len() - 1);
            assert!(voltage[i] >= height);
            assert!(voltage[i] > voltage[i - 1] && voltage[i] > voltage[i + 1]);
        }
        for w in peaks.indices.windows(2) {
            assert!(w[1] - w[0] >= min_distance);
        }
    }

    #[test]
    fn default_config_rejects_negative_height() {
        assert!(PeakDetectorConfig::default().validate().is_ok());
        let cfg = PeakDetectorConfig {
            height: -0.1,
            ..PeakDetectorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidHeight(_))));
    }

    #[test]
    fn analysis_of_regular_rhythm() {
        let fs = 500.0;
        let beats = [0.5, 1.3, 2.1, 2.9, 3.7, 4.5];
        let series = synthetic_series(fs, &beats, 5.0);
        let analysis = run_analysis(&series, &PeakDetectorConfig::default()).unwrap();
        let expected: Vec<usize> = beats.iter().map(|b| (b * fs).round() as usize).collect();
        assert_eq!(analysis.peaks.indices, expected);
        assert_eq!(analysis.rr.len(), beats.len() - 1);
        assert_eq!(analysis.intervals.count, beats.len() - 1);
        assert!((analysis.metrics.heart_rate - 75.0).abs() < 1e-6);
        assert_eq!(analysis.metrics.consultation, Consultation::Normal);
        assert_eq!(
            analysis.metrics,
            crate::metrics::rhythm::compute_metrics(series.time(), &analysis.peaks).unwrap()
        );
    }

    #[test]
    fn analysis_without_beats_reports_insufficient_data() {
        let series = SampleSeries::new(
            (0..100).map(|i| i as f64 / 100.0).collect(),
            vec![0.0; 100],
        )
        .unwrap();
        let analysis = run_analysis(&series, &PeakDetectorConfig::default()).unwrap();
        assert!(analysis.peaks.is_empty());
        assert!(analysis.rr.is_empty());
        assert_eq!(analysis.metrics.heart_rate, 0.0);
        assert_eq!(
            analysis.metrics.consultation,
            Consultation::InsufficientData
        );
    }

    fn synthetic_series(fs: f64, beats: &[f64], duration: f64) -> SampleSeries {
        let samples = (duration * fs) as usize;
        let mut time = Vec::with_capacity(samples);
        let mut voltage = Vec::with_capacity(samples);
        for i in 0..samples {
            let t = i as f64 / fs;
            let mut v = 0.0;
            for &bt in beats {
                let width = 0.02;
                v += 1.2 * (-0.5 * ((t - bt) / width).powi(2)).exp();
            }
            time.push(t);
            voltage.push(v);
        }
        SampleSeries::new(time, voltage).expect("synthetic series")
    }
}
