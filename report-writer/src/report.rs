use rumour_core::{CoreError, Report};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

pub const REPORT_FILE: &str = "report.txt";

/// Human-readable summary of one forum's run.
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Analysis Report for r/{}", report.forum);
    let _ = writeln!(
        out,
        "Date: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    out.push('\n');

    out.push_str("Signal Strengths:\n");
    for result in &report.categories {
        let _ = writeln!(
            out,
            "{}: {:.2}%",
            result.category.label(),
            result.signal_strength
        );
    }
    out.push('\n');

    out.push_str("Top Mentioned Companies:\n");
    if report.entities.is_empty() {
        out.push_str("None found\n");
    }
    for entity in &report.entities {
        let _ = writeln!(out, "{}: {}", entity.name, entity.frequency);
    }
    out.push('\n');

    out.push_str("Sentiment Analysis:\n");
    let _ = writeln!(
        out,
        "Posts: Average sentiment = {:.2}",
        report.post_sentiment
    );
    let _ = writeln!(
        out,
        "Comments: Average sentiment = {:.2}",
        report.comment_sentiment
    );

    out
}

pub fn write_report(path: &Path, report: &Report) -> Result<(), CoreError> {
    std::fs::write(path, render_report(report))?;
    debug!(path = %path.display(), "Report written");
    Ok(())
}
