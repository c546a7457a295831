pub mod ecg;

pub use ecg::{detect_r_peaks, find_peaks, run_analysis, EcgAnalysis, PeakDetectorConfig};
