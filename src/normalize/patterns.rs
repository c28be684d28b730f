//! Data-driven title/artist cleanup patterns.
//!
//! Kept as data (a static table), not inline string matching, per the
//! normalizer contract: patterns are configuration, not code. Grounded in the
//! pattern catalog `scrolltunes-scrolltunes`'s LRCLIB extractor maintains for
//! the same title-cleanup problem, trimmed to the markers spec.md names
//! (`feat.`, `remastered`, trailing year tags, live/acoustic/demo markers).

use std::sync::LazyLock;

use regex::Regex;

/// Applied in order, each removing (not replacing with meaningful text) a
/// recognized decoration from an already-lowercased title.
pub static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // "(feat. X)", "[ft. Y]", "featuring Z" to end of string
        Regex::new(r"(?i)\s*[\(\[](?:feat\.?|ft\.?|featuring)\s+[^)\]]+[\)\]]").unwrap(),
        Regex::new(r"(?i)\s+(?:feat\.?|ft\.?|featuring)\s+.+$").unwrap(),
        // remaster variants: "(2021 Remaster)", "- Remastered", "/ 1997 Remastered"
        Regex::new(r"(?i)\s*[\(\[](?:(?:\d{4}\s+)?remaster(?:ed)?(?:\s+\d{4})?)[\)\]]").unwrap(),
        Regex::new(r"(?i)\s*[-–—/]\s*(?:(?:\d{4}\s+)?remaster(?:ed)?(?:\s+\d{4})?)").unwrap(),
        // live / acoustic / demo / session markers: only the bare `- live`
        // trailer form is deleted here. Bracketed forms like "(Acoustic)" are
        // left untouched so the matcher's bracket-group stage (§4.4) can see
        // them; see `BRACKET_KEYWORDS` below.
        Regex::new(r"(?i)\s*[-–—]\s*(?:live(?:\s+(?:at|from|in)\s+.+)?|acoustic(?:\s+version)?|demo)").unwrap(),
        // edition / mix / version variants
        Regex::new(r"(?i)\s*[\(\[](?:deluxe|expanded|anniversary|special|bonus\s+track(?:s)?)(?:\s+edition)?[\)\]]").unwrap(),
        Regex::new(r"(?i)\s*[\(\[](?:radio\s+edit|single\s+version|album\s+version|extended(?:\s+(?:mix|version))?|original\s+mix|mono|stereo)[\)\]]").unwrap(),
        // trailing year tag: "- 2021", "- 1997 Version"
        Regex::new(r"(?i)\s*[-–—]\s*\d{4}(?:\s+(?:version|mix|edit))?$").unwrap(),
    ]
});

/// Recognized bracket-group keywords used by the matcher's Stage 2 bonus
/// rule. Each keyword that appears in a bracket group on both sides of a
/// comparison earns `KEYWORD_BONUS`.
pub static BRACKET_KEYWORDS: &[&str] = &[
    "live", "acoustic", "unplugged", "remix", "remixed", "instrumental",
    "demo", "karaoke", "cover", "mono", "stereo", "extended", "edit",
];

/// Mutually exclusive version-marker pairs. If one bracket set contains the
/// first member and the other contains the second (or vice versa), the
/// matcher applies a small penalty rather than staying neutral.
pub static MUTUALLY_EXCLUSIVE_MARKERS: &[(&str, &str)] = &[
    ("acoustic", "studio"),
    ("live", "studio"),
    ("instrumental", "vocal"),
];
