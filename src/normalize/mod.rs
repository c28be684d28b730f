//! Text normalization for comparison: case, width, script, whitespace,
//! bracketed groups (§4.1).
//!
//! `normalize` is deterministic, idempotent, and total. Results are memoized
//! in a bounded LRU cache owned by a `Normalizer` value (per spec.md §9's
//! design note against process-lifetime singletons): the coordinator
//! constructs one and shares it, via `Arc`, with every worker.

mod cjk;
mod patterns;

use std::sync::Mutex;
use std::sync::LazyLock;

use lru::LruCache;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

pub use patterns::{BRACKET_KEYWORDS, MUTUALLY_EXCLUSIVE_MARKERS};

/// Matches a combining diacritical mark left behind by NFKD decomposition.
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}

static BRACKET_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\(（][^\)）]*[\)）]|[\[【][^\]】]*[\]】]").unwrap()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Options that participate in the cache key. Empty today; carried so the
/// cache-key shape doesn't need to change if normalization ever becomes
/// config-sensitive (e.g. a toggle for pinyin folding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NormalizeOpts;

fn full_width_to_half_width(c: char) -> char {
    match c as u32 {
        0xFF01..=0xFF5E => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        0x3000 => ' ',
        _ => c,
    }
}

fn fold_diacritics(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Applies the §4.1 steps in order, without touching the cache. Exposed for
/// tests that want normalization without the memoization layer in the way.
pub fn normalize_uncached(text: &str) -> String {
    let lowered = text.to_lowercase();
    let half_width: String = lowered.chars().map(full_width_to_half_width).collect();
    let simplified = if cjk::contains_cjk(&half_width) {
        cjk::traditional_to_simplified(&half_width)
    } else {
        half_width
    };

    let mut result = simplified;
    for pattern in patterns::TITLE_PATTERNS.iter() {
        result = pattern.replace_all(&result, "").to_string();
    }

    let ascii_folded = if cjk::contains_cjk(&result) {
        result
    } else {
        fold_diacritics(&result)
    };

    WHITESPACE.replace_all(ascii_folded.trim(), " ").to_string()
}

/// Splits a normalized string into its bracket-stripped main part and the
/// ordered list of bracket-group substrings (including their delimiters).
pub fn split_main_and_bracketed(norm_text: &str) -> (String, Vec<String>) {
    let groups: Vec<String> = BRACKET_GROUP
        .find_iter(norm_text)
        .map(|m| m.as_str().to_string())
        .collect();
    let main = BRACKET_GROUP.replace_all(norm_text, " ");
    (WHITESPACE.replace_all(main.trim(), " ").to_string(), groups)
}

/// Owns the bounded normalization cache. One instance is constructed at
/// startup and shared across workers behind an `Arc`.
pub struct Normalizer {
    cache: Mutex<LruCache<String, String>>,
}

impl Normalizer {
    pub fn new(capacity: usize) -> Self {
        let capacity = std::num::NonZeroUsize::new(capacity.max(1)).unwrap();
        Normalizer { cache: Mutex::new(LruCache::new(capacity)) }
    }

    /// Normalizes `text`, consulting and populating the bounded cache.
    /// `opts` is part of the cache key even though it carries no fields
    /// today, so a future config-sensitive variant doesn't need a cache
    /// format change.
    pub fn normalize(&self, text: &str, _opts: NormalizeOpts) -> String {
        if let Some(hit) = self.cache.lock().unwrap().get(text) {
            return hit.clone();
        }
        let result = normalize_uncached(text);
        self.cache.lock().unwrap().put(text.to_string(), result.clone());
        result
    }

    pub fn split_main_and_bracketed(&self, norm_text: &str) -> (String, Vec<String>) {
        split_main_and_bracketed(norm_text)
    }

    /// Transliterates CJK artist text to pinyin for the matcher's low-score
    /// retry path (§4.4).
    pub fn to_pinyin(&self, text: &str) -> String {
        cjk::to_pinyin(text)
    }

    pub fn contains_cjk(text: &str) -> bool {
        cjk::contains_cjk(text)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(4096)
    }
}
