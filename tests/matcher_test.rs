use sporl::config::Config;
use sporl::matcher::best_match;
use sporl::normalize::Normalizer;
use sporl::types::{Candidate, ParsedSong};

fn candidate(name: &str, artists: &[&str]) -> Candidate {
    Candidate {
        id: name.to_string(),
        name: name.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        uri: format!("spotify:track:{name}"),
        album: None,
        duration_ms: None,
        popularity: None,
    }
}

fn song(title: &str, artists: &[&str]) -> ParsedSong {
    ParsedSong {
        sequence: 0,
        original_line: format!("{title} - {}", artists.join(" / ")),
        title: title.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
    }
}

#[test]
fn simple_happy_path_matches_above_threshold() {
    let config = Config::default();
    let normalizer = Normalizer::default();
    let song = song("Bohemian Rhapsody", &["Queen"]);
    let candidates = vec![candidate("Bohemian Rhapsody", &["Queen"])];

    let matched = best_match(&normalizer, &config, &song, &candidates).expect("expected a match");
    assert!(matched.final_score >= config.match_threshold);
    assert!(!matched.is_low_confidence);
}

#[test]
fn multi_artist_order_insensitive_match() {
    let config = Config::default();
    let normalizer = Normalizer::default();
    let song = song("See You Again", &["Wiz Khalifa", "Charlie Puth"]);
    let candidates = vec![candidate("See You Again", &["Charlie Puth", "Wiz Khalifa"])];

    let matched = best_match(&normalizer, &config, &song, &candidates).expect("expected a match");
    assert_eq!(matched.uri, "spotify:track:See You Again");
}

#[test]
fn cjk_traditional_input_matches_simplified_candidate() {
    let config = Config::default();
    let normalizer = Normalizer::default();
    let song = song("愛我別走", &["張震嶽"]);
    let candidates = vec![candidate("爱我别走", &["张震岳"])];

    let matched = best_match(&normalizer, &config, &song, &candidates).expect("expected a match");
    assert!(matched.final_score >= config.match_threshold);
}

#[test]
fn bracketed_version_marker_lifts_matching_candidate_above_plain_one() {
    let config = Config::default();
    let normalizer = Normalizer::default();
    let song = song("Shape of You (Acoustic)", &["Ed Sheeran"]);
    let candidates = vec![
        candidate("Shape of You", &["Ed Sheeran"]),
        candidate("Shape of You (Acoustic Version)", &["Ed Sheeran"]),
    ];

    let matched = best_match(&normalizer, &config, &song, &candidates).expect("expected a match");
    assert_eq!(matched.uri, "spotify:track:Shape of You (Acoustic Version)");
}

#[test]
fn no_candidates_clearing_low_confidence_threshold_returns_none() {
    let config = Config::default();
    let normalizer = Normalizer::default();
    let song = song("Totally Fictional Song XYZ123", &["Nobody"]);
    let candidates = vec![candidate("Completely Unrelated Track", &["Someone Else"])];

    assert!(best_match(&normalizer, &config, &song, &candidates).is_none());
}

#[test]
fn final_score_always_in_range() {
    let config = Config::default();
    let normalizer = Normalizer::default();
    let song = song("Random Title", &["Random Artist"]);
    let candidates = vec![
        candidate("Random Title", &["Random Artist"]),
        candidate("Completely Different", &["Nobody At All"]),
    ];

    for candidate in &candidates {
        if let Some(matched) = best_match(&normalizer, &config, &song, std::slice::from_ref(candidate)) {
            assert!((0.0..=100.0).contains(&matched.final_score));
        }
    }
}

#[test]
fn raising_match_threshold_never_increases_matched_count() {
    let normalizer = Normalizer::default();
    let song = song("Shape of You", &["Ed Sheeran"]);
    let candidates = vec![candidate("Shape of You", &["Ed Sheeran"])];

    let mut low = Config::default();
    low.match_threshold = 1.0;
    low.low_confidence_threshold = 0.0;
    let mut high = Config::default();
    high.match_threshold = 99.9;
    high.low_confidence_threshold = 0.0;

    let low_matched = best_match(&normalizer, &low, &song, &candidates).map(|m| !m.is_low_confidence);
    let high_matched = best_match(&normalizer, &high, &song, &candidates).map(|m| !m.is_low_confidence);

    let low_count = if low_matched == Some(true) { 1 } else { 0 };
    let high_count = if high_matched == Some(true) { 1 } else { 0 };
    assert!(high_count <= low_count);
}
