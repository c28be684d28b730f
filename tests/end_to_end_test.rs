use sporl::aggregator::aggregate;
use sporl::parser::{ParseOutcome, parse_lines};
use sporl::types::{MatchResult, MatchStatus, Summary};

fn result(sequence: usize, status: MatchStatus) -> MatchResult {
    MatchResult {
        sequence,
        original_input_line: format!("line {sequence}"),
        parsed_song_title: format!("title {sequence}"),
        parsed_artists: Vec::new(),
        status,
        matched: None,
        error_message: None,
    }
}

#[test]
fn malformed_line_alongside_a_valid_one_does_not_abort_the_stream() {
    let text = " - Ed Sheeran\nBohemian Rhapsody - Queen";
    let outcomes = parse_lines(text);
    assert_eq!(outcomes.len(), 2);

    let error_count = outcomes.iter().filter(|o| matches!(o, ParseOutcome::Error(_))).count();
    let song_count = outcomes.iter().filter(|o| matches!(o, ParseOutcome::Song(_))).count();
    assert_eq!(error_count, 1);
    assert_eq!(song_count, 1);
}

#[test]
fn aggregator_restores_input_order_regardless_of_completion_order() {
    // Simulates workers finishing out of order: sequence 2 resolves first.
    let out_of_order = vec![
        result(2, MatchStatus::NotFound),
        result(0, MatchStatus::Matched),
        result(1, MatchStatus::ApiError),
    ];

    let (ordered, _summary) = aggregate(out_of_order);
    let sequences: Vec<usize> = ordered.iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2]);
}

#[test]
fn summary_counts_match_the_result_statuses() {
    let results = vec![
        result(0, MatchStatus::Matched),
        result(1, MatchStatus::LowConfidenceMatch),
        result(2, MatchStatus::NotFound),
        result(3, MatchStatus::ApiError),
        result(4, MatchStatus::InputFormatError),
    ];

    let (_ordered, summary) = aggregate(results);
    assert_eq!(summary.total_input_lines, 5);
    assert_eq!(summary.matched_count, 1);
    assert_eq!(summary.low_confidence_count, 1);
    assert_eq!(summary.not_found_count, 1);
    assert_eq!(summary.api_error_count, 1);
    assert_eq!(summary.input_format_error_count, 1);
    assert!(summary.has_partial_failure());
}

#[test]
fn all_matched_summary_has_no_partial_failure() {
    let results = vec![result(0, MatchStatus::Matched), result(1, MatchStatus::Matched)];
    let (_ordered, summary) = aggregate(results);
    assert!(!summary.has_partial_failure());
}

#[test]
fn chunked_add_tracks_covers_237_uris_in_three_requests_of_100_100_37() {
    let uris: Vec<String> = (0..237).map(|i| format!("spotify:track:{i}")).collect();
    let chunks: Vec<&[String]> = uris.chunks(100).collect();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].len(), 100);
    assert_eq!(chunks[1].len(), 100);
    assert_eq!(chunks[2].len(), 37);

    let rejoined: Vec<String> = chunks.into_iter().flatten().cloned().collect();
    assert_eq!(rejoined, uris);
}

#[test]
fn empty_summary_defaults_have_no_partial_failure() {
    let summary = Summary::default();
    assert!(!summary.has_partial_failure());
    assert_eq!(summary.total_input_lines, 0);
}
