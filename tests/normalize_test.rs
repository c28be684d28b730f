use sporl::normalize::{Normalizer, normalize_uncached, split_main_and_bracketed};

#[test]
fn idempotent_on_plain_ascii() {
    let once = normalize_uncached("Bohemian Rhapsody");
    let twice = normalize_uncached(&once);
    assert_eq!(once, twice);
}

#[test]
fn idempotent_on_mixed_width_and_cjk() {
    let once = normalize_uncached("Ｓｈａｐｅ of You 愛我別走");
    let twice = normalize_uncached(&once);
    assert_eq!(once, twice);
}

#[test]
fn full_width_folds_to_half_width() {
    let normalized = normalize_uncached("ＡＢＣ１２３");
    assert_eq!(normalized, "abc123");
}

#[test]
fn traditional_chinese_folds_to_simplified() {
    let input = normalize_uncached("愛我別走");
    let candidate = normalize_uncached("爱我别走");
    assert_eq!(input, candidate);
}

#[test]
fn diacritics_are_stripped_on_non_cjk_text() {
    let normalized = normalize_uncached("Café");
    assert_eq!(normalized, "cafe");
}

#[test]
fn bracket_groups_are_extracted_and_main_part_is_clean() {
    let normalized = normalize_uncached("Shape of You (Acoustic)");
    let (main, groups) = split_main_and_bracketed(&normalized);
    assert_eq!(main, "shape of you");
    assert_eq!(groups, vec!["(acoustic)".to_string()]);
}

#[test]
fn normalizer_cache_returns_same_result_as_uncached() {
    let normalizer = Normalizer::new(16);
    let cached = normalizer.normalize("Shape of You (Acoustic)", Default::default());
    let uncached = normalize_uncached("Shape of You (Acoustic)");
    assert_eq!(cached, uncached);
    // second call should hit the cache and still agree
    let cached_again = normalizer.normalize("Shape of You (Acoustic)", Default::default());
    assert_eq!(cached_again, uncached);
}
