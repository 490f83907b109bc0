//! Per-run metrics snapshot and confusion-table rendering.

use crate::error::Result;
use crate::eval::confusion::{average_latency, ConfusionCounts};
use std::time::Duration;

/// Read-only metrics snapshot for one finished evaluation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsReport {
    pub precision: f64,
    pub recall: f64,
    pub accuracy: f64,
    pub f1_score: f64,
    pub avg_latency_seconds: f64,
}

impl MetricsReport {
    /// Derive the report from final counts plus the run's wall-clock time.
    ///
    /// Errors with [`crate::error::EdgevalError::EmptyRun`] when the run
    /// accumulated no outcomes.
    pub fn from_run(counts: &ConfusionCounts, elapsed: Duration) -> Result<Self> {
        let avg_latency_seconds = average_latency(elapsed, counts.total())?;
        Ok(Self {
            precision: counts.precision(),
            recall: counts.recall(),
            accuracy: counts.accuracy(),
            f1_score: counts.f1_score(),
            avg_latency_seconds,
        })
    }
}

/// Render the actual-vs-predicted grid as an aligned text table.
pub fn render_confusion_table(counts: &ConfusionCounts) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:-<47}\n", ""));
    out.push_str(&format!(
        "{:<15} {:>15} {:>15}\n",
        "", "predicted NEG", "predicted POS"
    ));
    out.push_str(&format!("{:-<47}\n", ""));
    out.push_str(&format!(
        "{:<15} {:>15} {:>15}\n",
        "actual NEG", counts.true_negatives, counts.false_positives
    ));
    out.push_str(&format!(
        "{:<15} {:>15} {:>15}\n",
        "actual POS", counts.false_negatives, counts.true_positives
    ));
    out.push_str(&format!("{:-<47}\n", ""));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdgevalError;

    fn sample_counts() -> ConfusionCounts {
        ConfusionCounts {
            true_positives: 7,
            false_positives: 3,
            true_negatives: 6,
            false_negatives: 4,
        }
    }

    #[test]
    fn report_matches_count_derivations() {
        let counts = sample_counts();
        let report = MetricsReport::from_run(&counts, Duration::from_secs(40)).unwrap();
        assert_eq!(report.precision, counts.precision());
        assert_eq!(report.recall, counts.recall());
        assert_eq!(report.accuracy, counts.accuracy());
        assert_eq!(report.f1_score, counts.f1_score());
        // 40s over 20 items
        assert!((report.avg_latency_seconds - 2.0).abs() < 1e-9);
    }

    #[test]
    fn report_rejects_empty_run() {
        let counts = ConfusionCounts::new();
        let err = MetricsReport::from_run(&counts, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, EdgevalError::EmptyRun));
    }

    #[test]
    fn table_places_counts_on_the_right_axes() {
        let table = render_confusion_table(&sample_counts());
        assert!(table.contains("predicted NEG"));
        assert!(table.contains("predicted POS"));
        let actual_neg = table.lines().find(|l| l.starts_with("actual NEG")).unwrap();
        let actual_pos = table.lines().find(|l| l.starts_with("actual POS")).unwrap();
        // actual NEG row: TN then FP; actual POS row: FN then TP
        let neg_cells: Vec<&str> = actual_neg.split_whitespace().collect();
        assert_eq!(neg_cells[2], "6");
        assert_eq!(neg_cells[3], "3");
        let pos_cells: Vec<&str> = actual_pos.split_whitespace().collect();
        assert_eq!(pos_cells[2], "4");
        assert_eq!(pos_cells[3], "7");
    }
}
