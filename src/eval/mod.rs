//! Evaluation core: confusion-matrix accumulation, smoothed metrics, and reports.

pub mod confusion;
pub mod report;

pub use confusion::{average_latency, ConfusionCounts, Label, Outcome, SMOOTHING};
pub use report::{render_confusion_table, MetricsReport};
