use crate::results::{format_time, ResultsDocument, TestRecord};

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total_tests: usize,
    /// Mean percent accurate before improvement, over tests with a score.
    pub mean_start_pct: Option<f64>,
    /// Mean percent accurate after improvement.
    pub mean_end_pct: Option<f64>,
    pub total_time_ms: f64,
    pub bad_runs: usize,
    /// Largest frontier speedup that is more accurate than the initial point.
    pub speedup: Option<f64>,
}

impl SummaryStats {
    pub fn time_label(&self) -> String {
        format_time(self.total_time_ms)
    }

    pub fn bad_runs_label(&self) -> String {
        format!("{}/{}", self.bad_runs, self.total_tests)
    }

    pub fn speedup_label(&self) -> String {
        match self.speedup {
            Some(s) => format!("{:.1}x", s),
            None => "-".to_string(),
        }
    }
}

/// Percent accurate for a score, or `None` when the test has no score.
pub fn percent_accurate(score: Option<f64>, max: f64) -> Option<f64> {
    score.map(|s| TestRecord::accuracy(s, max) * 100.0)
}

pub fn format_percent(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.1}%", p),
        None => "-".to_string(),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Compute the summary over every test, regardless of active filters.
pub fn compute_summary(doc: &ResultsDocument, max_score: f64) -> SummaryStats {
    let start: Vec<f64> = doc
        .tests
        .iter()
        .filter_map(|t| percent_accurate(t.start, t.max_score(max_score)))
        .collect();
    let end: Vec<f64> = doc
        .tests
        .iter()
        .filter_map(|t| percent_accurate(t.end, t.max_score(max_score)))
        .collect();

    let total_time_ms: f64 = doc.tests.iter().filter_map(|t| t.time.millis()).sum();
    let bad_runs = doc.tests.iter().filter(|t| t.status.is_bad_run()).count();

    let initial = doc.merged_cost_accuracy.initial();
    let speedup = doc
        .merged_cost_accuracy
        .frontier()
        .iter()
        .filter(|p| p.accuracy() > initial.accuracy())
        .map(|p| p.cost())
        .fold(None, |best: Option<f64>, c| Some(best.map_or(c, |b| b.max(c))));

    SummaryStats {
        total_tests: doc.tests.len(),
        mean_start_pct: mean(&start),
        mean_end_pct: mean(&end),
        total_time_ms,
        bad_runs,
        speedup,
    }
}
