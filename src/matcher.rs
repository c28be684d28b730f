//! Candidate scoring and selection (§4.4).
//!
//! `title_score`/`artist_score` follow the two precedents
//! `scrolltunes-scrolltunes`'s `scoring.rs` sets for each field: Jaccard
//! token overlap for artist comparison (`compute_artist_similarity`), and
//! (generalized here) `strsim`-backed token-set similarity for titles so
//! word order and minor edit distance are both tolerated. `popularity` is
//! used only as the bounded tiebreak that module documents for its own
//! popularity signal — it never overrides a score difference.

use std::collections::HashSet;

use crate::config::Config;
use crate::normalize::{Normalizer, BRACKET_KEYWORDS, MUTUALLY_EXCLUSIVE_MARKERS};
use crate::types::{Candidate, MatchedSong, ParsedSong};

/// Token-set similarity: symmetric, word-order-insensitive, scaled to
/// `[0, 100]`. Backed by `strsim::jaro_winkler` on the sorted-token
/// rejoining of each side, which collapses word reordering before the
/// edit-distance metric ever runs.
fn title_score(a: &str, b: &str) -> f64 {
    let sorted = |s: &str| -> String {
        let mut tokens: Vec<&str> = s.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    };
    strsim::jaro_winkler(&sorted(a), &sorted(b)) * 100.0
}

/// Jaccard similarity over whitespace tokens, scaled to `[0, 100]`.
fn jaccard(a: &str, b: &str) -> f64 {
    if a == b {
        return 100.0;
    }
    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    (intersection as f64 / union as f64) * 100.0
}

fn artist_score(
    normalizer: &Normalizer,
    config: &Config,
    input_artists: &[String],
    candidate_artists: &[String],
) -> f64 {
    if input_artists.is_empty() || candidate_artists.is_empty() {
        return 0.0;
    }

    let norm = |s: &str| normalizer.normalize(s, Default::default());
    let cand_norm: Vec<String> = candidate_artists.iter().map(|a| norm(a)).collect();

    let mut exact_match = false;
    let mut total = 0.0;
    for input_artist in input_artists {
        let input_norm = norm(input_artist);
        let mut best = 0.0f64;
        for c in &cand_norm {
            if *c == input_norm {
                exact_match = true;
            }
            best = best.max(jaccard(&input_norm, c));
        }
        if Normalizer::contains_cjk(&input_norm) && best < config.artist_exact_match_floor {
            let pinyin_input = normalizer.to_pinyin(&input_norm);
            for c in &cand_norm {
                let pinyin_cand = normalizer.to_pinyin(c);
                best = best.max(jaccard(&pinyin_input, &pinyin_cand));
            }
        }
        total += best;
    }

    let mut score = total / input_artists.len() as f64;
    if exact_match {
        score = score.max(config.artist_exact_match_floor);
    }
    score
}

/// Stage 2 bracket-group adjustment, bounded by `±BRACKET_WEIGHT*100`.
fn bracket_delta(config: &Config, input_groups: &[String], candidate_groups: &[String]) -> f64 {
    let keywords = |groups: &[String]| -> HashSet<&'static str> {
        let lower: Vec<String> = groups.iter().map(|g| g.to_lowercase()).collect();
        BRACKET_KEYWORDS
            .iter()
            .copied()
            .filter(|kw| lower.iter().any(|g| g.contains(kw)))
            .collect()
    };
    let input_kw = keywords(input_groups);
    let candidate_kw = keywords(candidate_groups);

    let mut delta = 0.0;
    for kw in input_kw.intersection(&candidate_kw) {
        let _ = kw;
        delta += config.keyword_bonus;
    }

    let has_feat = |groups: &[String]| groups.iter().any(|g| g.to_lowercase().contains("feat"));
    if has_feat(input_groups) && has_feat(candidate_groups) {
        delta += config.keyword_bonus;
    }

    for (a, b) in MUTUALLY_EXCLUSIVE_MARKERS {
        let input_has_a = input_groups.iter().any(|g| g.to_lowercase().contains(a));
        let candidate_has_b = candidate_groups.iter().any(|g| g.to_lowercase().contains(b));
        let input_has_b = input_groups.iter().any(|g| g.to_lowercase().contains(b));
        let candidate_has_a = candidate_groups.iter().any(|g| g.to_lowercase().contains(a));
        if (input_has_a && candidate_has_b) || (input_has_b && candidate_has_a) {
            delta -= config.keyword_bonus;
        }
    }

    let bound = config.bracket_weight * 100.0;
    delta.clamp(-bound, bound)
}

struct Scored<'a> {
    candidate: &'a Candidate,
    final_score: f64,
    main_title_len: usize,
    position: usize,
}

/// Scores every candidate against `song` and returns the best match, if any
/// clears `LOW_CONFIDENCE_THRESHOLD`. Pure given `config` and `normalizer`'s
/// cache contents (which never affect the result, only its cost).
pub fn best_match(
    normalizer: &Normalizer,
    config: &Config,
    song: &ParsedSong,
    candidates: &[Candidate],
) -> Option<MatchedSong> {
    let input_norm = normalizer.normalize(&song.title, Default::default());
    let (input_main, input_groups) = normalizer.split_main_and_bracketed(&input_norm);
    let input_main_len = input_main.chars().count();

    let mut scored = Vec::new();
    for (position, candidate) in candidates.iter().enumerate() {
        let cand_norm = normalizer.normalize(&candidate.name, Default::default());
        let (cand_main, cand_groups) = normalizer.split_main_and_bracketed(&cand_norm);
        let cand_main_len = cand_main.chars().count();

        if input_main_len > 0 {
            let diff = (cand_main_len as f64 - input_main_len as f64).abs() / input_main_len as f64;
            if diff > 0.5 {
                continue;
            }
        }

        let title = title_score(&input_main, &cand_main);
        let artist = artist_score(normalizer, config, &song.artists, &candidate.artists);
        let stage1 = config.title_weight * title + config.artist_weight * artist;
        let delta = bracket_delta(config, &input_groups, &cand_groups);
        let final_score = (stage1 + delta).clamp(0.0, 100.0);

        scored.push(Scored { candidate, final_score, main_title_len: cand_main_len, position });
    }

    scored.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap()
            .then(a.main_title_len.cmp(&b.main_title_len))
            .then(a.position.cmp(&b.position))
    });

    let best = scored.first()?;
    if best.final_score < config.low_confidence_threshold {
        return None;
    }
    let is_low_confidence = best.final_score < config.match_threshold;

    Some(MatchedSong {
        parsed_song: song.clone(),
        catalog_id: best.candidate.id.clone(),
        name: best.candidate.name.clone(),
        artists: best.candidate.artists.clone(),
        uri: best.candidate.uri.clone(),
        album_name: best.candidate.album.clone(),
        duration_ms: best.candidate.duration_ms,
        final_score: best.final_score,
        is_low_confidence,
    })
}
