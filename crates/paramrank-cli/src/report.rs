use std::fmt::Write as _;

use paramrank::AggregateReport;

/// Renders the report as plain text.
///
/// The first four lines are the admission threshold, the average score, the
/// top scores and the top indices. Summary lines follow when requested.
pub(crate) fn render_text(report: &AggregateReport, with_summary: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format_float(report.max_score));
    let _ = writeln!(out, "{}", format_float(report.average_score));
    let _ = writeln!(
        out,
        "{}",
        format_list(report.top_scores.iter().copied().map(format_float))
    );
    let _ = writeln!(
        out,
        "{}",
        format_list(report.top_indices.iter().map(usize::to_string))
    );

    if with_summary {
        let _ = writeln!(
            out,
            "files: {} (unique: {}, repeated: {}, missing fields: {})",
            report.files_processed,
            report.unique_count,
            report.duplicate_count,
            report.missing_count
        );
        if let Some(summary) = &report.summary {
            let _ = writeln!(
                out,
                "unique scores: min {}, max {}, mean {}, median {}, std dev {}",
                format_float(summary.min),
                format_float(summary.max),
                format_float(summary.mean),
                format_float(summary.median),
                format_float(summary.std_dev)
            );
        }
    }
    out
}

/// Formats a float so that integral values keep a trailing `.0`.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let text = if value.is_sign_positive() { "inf" } else { "-inf" };
        text.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn format_list<I>(items: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let items = items.into_iter().collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use paramrank::summary::ScoreSummary;

    use super::*;

    fn report() -> AggregateReport {
        AggregateReport {
            max_score: 5.0,
            average_score: 16.0 / 3.0,
            top_scores: vec![9.0, 5.0],
            top_indices: vec![1, 0],
            score_sum: 16.0,
            files_processed: 4,
            unique_count: 3,
            duplicate_count: 1,
            missing_count: 0,
            summary: ScoreSummary::new([5.0, 9.0, 2.0]),
        }
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(5.0), "5.0");
        assert_eq!(format_float(-12.0), "-12.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_render_four_lines() {
        let text = render_text(&report(), false);
        assert_eq!(text, "5.0\n5.333333333333333\n[9.0, 5.0]\n[1, 0]\n");
    }

    #[test]
    fn test_render_empty_lists() {
        let mut report = report();
        report.top_scores.clear();
        report.top_indices.clear();
        let text = render_text(&report, false);
        assert!(text.ends_with("[]\n[]\n"));
    }

    #[test]
    fn test_render_with_summary() {
        let text = render_text(&report(), true);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[4],
            "files: 4 (unique: 3, repeated: 1, missing fields: 0)"
        );
        assert!(lines[5].starts_with("unique scores: min 2.0, max 9.0, mean 5.333333333333333"));
    }
}
