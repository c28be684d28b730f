//! Traditional-to-Simplified Chinese folding and a compact pinyin table.
//!
//! No crate in the retrieved corpus carries a CJK linguistics dependency;
//! the pack's own precedent for this kind of problem is
//! `scrolltunes-scrolltunes`'s hand-maintained `ARTIST_TRANSLITERATIONS`
//! static map for Cyrillic/Hebrew. This applies the same technique to a
//! different script pair: a bounded, explicit substitution table rather than
//! a full CJK segmentation/transliteration dependency. Coverage is partial —
//! common production music-catalog characters, not linguistic completeness.

use std::sync::LazyLock;

use std::collections::HashMap;

/// Traditional character -> Simplified character, single-codepoint entries
/// only. Extend as real catalog data surfaces more gaps.
static TRAD_TO_SIMP: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    [
        ('愛', '爱'), ('別', '别'), ('走', '走'), ('張', '张'), ('震', '震'),
        ('嶽', '岳'), ('樂', '乐'), ('國', '国'), ('語', '语'), ('歌', '歌'),
        ('聽', '听'), ('說', '说'), ('話', '话'), ('們', '们'), ('這', '这'),
        ('開', '开'), ('關', '关'), ('會', '会'), ('來', '来'), ('時', '时'),
        ('間', '间'), ('對', '对'), ('後', '后'), ('實', '实'), ('現', '现'),
        ('長', '长'), ('發', '发'), ('電', '电'), ('車', '车'), ('馬', '马'),
        ('龍', '龙'), ('鳳', '凤'), ('風', '风'), ('雲', '云'), ('飛', '飞'),
        ('夢', '梦'), ('想', '想'), ('戀', '恋'), ('愛', '爱'), ('美', '美'),
        ('麗', '丽'), ('紅', '红'), ('藍', '蓝'), ('綠', '绿'), ('黃', '黄'),
        ('萬', '万'), ('億', '亿'), ('兒', '儿'), ('學', '学'), ('習', '习'),
        ('寫', '写'), ('讀', '读'), ('識', '识'), ('記', '记'), ('憶', '忆'),
    ]
    .into_iter()
    .collect()
});

/// Surname/common-word pinyin syllables covering frequent artist-name
/// characters. Falls back to `any_ascii` for anything not listed here.
static PINYIN: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    [
        ('张', "zhang"), ('震', "zhen"), ('岳', "yue"), ('周', "zhou"),
        ('杰', "jie"), ('伦', "lun"), ('王', "wang"), ('李', "li"),
        ('陈', "chen"), ('林', "lin"), ('黄', "huang"), ('吴', "wu"),
        ('刘', "liu"), ('蔡', "cai"), ('徐', "xu"), ('郭', "guo"),
        ('孙', "sun"), ('马', "ma"), ('朱', "zhu"), ('胡', "hu"),
        ('高', "gao"), ('林', "lin"), ('何', "he"), ('郑', "zheng"),
        ('谢', "xie"), ('罗', "luo"), ('梁', "liang"), ('宋', "song"),
        ('爱', "ai"), ('我', "wo"), ('别', "bie"), ('走', "zou"),
    ]
    .into_iter()
    .collect()
});

/// True when `text` contains at least one CJK Unified Ideograph.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32,
            0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF
        )
    })
}

/// Converts Traditional Chinese characters to Simplified, leaving every
/// other character untouched. A no-op when `text` has no CJK codepoints.
pub fn traditional_to_simplified(text: &str) -> String {
    text.chars()
        .map(|c| TRAD_TO_SIMP.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Transliterates CJK characters to pinyin syllables where the table has an
/// entry, falling back to `any_ascii` per character otherwise. Used by the
/// Matcher as the artist-similarity retry path when CJK is present and the
/// initial score is low.
pub fn to_pinyin(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        if let Some(syllable) = PINYIN.get(&c) {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push_str(syllable);
            out.push(' ');
        } else if contains_cjk(&c.to_string()) {
            out.push_str(any_ascii::any_ascii_char(c));
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
