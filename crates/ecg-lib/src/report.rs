use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::metrics::rhythm::RhythmMetrics;

pub const DEFAULT_REPORT_PATH: &str = "ecg_report.txt";

/// Four-line summary shared by the console output and the report file.
pub fn render_report(metrics: &RhythmMetrics) -> String {
    format!(
        "Heart Rate: {:.2} bpm\n\
         Heart Rate Variability: {:.4}\n\
         QRS Duration: {:.2} ms\n\
         Consultation: {}\n",
        metrics.heart_rate, metrics.hr_variability, metrics.qrs_duration, metrics.consultation
    )
}

pub fn write_report(path: &Path, metrics: &RhythmMetrics) -> Result<()> {
    fs::write(path, render_report(metrics))
        .with_context(|| format!("failed to write report {}", path.display()))
}
