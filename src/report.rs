//! Plain-text report rendering (§6): one section per `MatchResult` in input
//! order, followed by a summary block. Consumed by humans; callers that want
//! structured output use the aggregator's in-memory list directly instead.

use tabled::{Table, settings::Style};

use crate::types::{MatchResult, MatchStatus, ReportTableRow, Summary};

/// Renders `results` (already in input order) and `summary` as plain text
/// suitable for `--output-report`.
pub fn render(results: &[MatchResult], summary: &Summary) -> String {
    let rows: Vec<ReportTableRow> = results.iter().map(to_row).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());

    let mut out = String::new();
    out.push_str(&table.to_string());
    out.push_str("\n\n");
    out.push_str(&render_summary(summary));
    out
}

fn to_row(result: &MatchResult) -> ReportTableRow {
    let (artists, score) = match &result.matched {
        Some(matched) => (matched.artists.join(" / "), format!("{:.1}", matched.final_score)),
        None => (result.parsed_artists.join(" / "), "-".to_string()),
    };
    ReportTableRow {
        status: result.status.to_string(),
        title: if result.status == MatchStatus::InputFormatError {
            result.original_input_line.clone()
        } else {
            result.parsed_song_title.clone()
        },
        artists,
        score,
    }
}

fn render_summary(summary: &Summary) -> String {
    format!(
        "Summary: {} total, {} matched, {} low-confidence, {} not found, {} API errors, {} input format errors",
        summary.total_input_lines,
        summary.matched_count,
        summary.low_confidence_count,
        summary.not_found_count,
        summary.api_error_count,
        summary.input_format_error_count,
    )
}
