use sporl::parser::{ParseOutcome, parse_lines};

#[test]
fn title_and_artist_line_parses() {
    let outcomes = parse_lines("Bohemian Rhapsody - Queen");
    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        ParseOutcome::Song(song) => {
            assert_eq!(song.title, "Bohemian Rhapsody");
            assert_eq!(song.artists, vec!["Queen".to_string()]);
            assert_eq!(song.sequence, 0);
        }
        ParseOutcome::Error(_) => panic!("expected a parsed song"),
    }
}

#[test]
fn multiple_artists_split_on_slash() {
    let outcomes = parse_lines("See You Again - Wiz Khalifa / Charlie Puth");
    match &outcomes[0] {
        ParseOutcome::Song(song) => {
            assert_eq!(song.artists, vec!["Wiz Khalifa".to_string(), "Charlie Puth".to_string()]);
        }
        ParseOutcome::Error(_) => panic!("expected a parsed song"),
    }
}

#[test]
fn title_only_line_has_no_artists() {
    let outcomes = parse_lines("Totally Fictional Song XYZ123");
    match &outcomes[0] {
        ParseOutcome::Song(song) => {
            assert_eq!(song.title, "Totally Fictional Song XYZ123");
            assert!(song.artists.is_empty());
        }
        ParseOutcome::Error(_) => panic!("expected a parsed song"),
    }
}

#[test]
fn empty_title_is_a_parse_error() {
    let outcomes = parse_lines(" - Ed Sheeran");
    match &outcomes[0] {
        ParseOutcome::Error(err) => {
            assert_eq!(err.original_line, "- Ed Sheeran");
        }
        ParseOutcome::Song(_) => panic!("expected a parse error"),
    }
}

#[test]
fn blank_lines_are_skipped_and_sequence_stays_contiguous() {
    let text = "Bohemian Rhapsody - Queen\n\n  \n - Ed Sheeran\nStairway to Heaven - Led Zeppelin";
    let outcomes = parse_lines(text);
    assert_eq!(outcomes.len(), 3);

    let sequences: Vec<usize> = outcomes
        .iter()
        .map(|o| match o {
            ParseOutcome::Song(s) => s.sequence,
            ParseOutcome::Error(e) => e.sequence,
        })
        .collect();
    assert_eq!(sequences, vec![0, 1, 2]);
}

#[test]
fn mixed_errors_and_songs_never_both_or_neither() {
    let text = "Bohemian Rhapsody - Queen\n - Ed Sheeran\nStairway to Heaven - Led Zeppelin";
    let outcomes = parse_lines(text);
    assert_eq!(outcomes.len(), 3);
    let error_count = outcomes.iter().filter(|o| matches!(o, ParseOutcome::Error(_))).count();
    let song_count = outcomes.iter().filter(|o| matches!(o, ParseOutcome::Song(_))).count();
    assert_eq!(error_count, 1);
    assert_eq!(song_count, 2);
}
