pub mod classify;
pub mod rhythm;

pub use classify::{classify, Consultation};
pub use rhythm::{compute_metrics, metrics_from_intervals, IntervalSummary, RhythmMetrics};
