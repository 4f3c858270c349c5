use crate::error::Result;
use crate::filter::FilterState;
use crate::results::ResultsDocument;
use crate::stats::{format_percent, percent_accurate};
use std::path::Path;

/// Save the visible table rows to CSV.
pub fn write_csv(
    doc: &ResultsDocument,
    filter: &FilterState,
    max_score: f64,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "name", "status", "start", "result", "target", "time", "link",
    ])?;

    let mut rows = 0;
    for t in filter.visible(&doc.tests) {
        let max = t.max_score(max_score);
        wtr.write_record(&[
            t.name.clone(),
            t.status.to_string(),
            format_percent(percent_accurate(t.start, max)),
            format_percent(percent_accurate(t.end, max)),
            format_percent(percent_accurate(t.target, max)),
            t.time.to_string(),
            t.detail_href(),
        ])?;
        rows += 1;
    }

    wtr.flush()?;
    Ok(rows)
}
