//! Chinese script classification for lookup queries.
//!
//! A string is accepted when every character is either a CJK ideograph from
//! one of the supported blocks, or punctuation, a digit, or whitespace.

// ── Ranges ───────────────────────────────────────────────────────────

const CJK_RANGES: &[(char, char)] = &[
    // CJK Radicals Supplement through Kangxi Radicals
    ('\u{2E80}', '\u{2FD5}'),
    // Kanbun
    ('\u{3190}', '\u{319F}'),
    // CJK Unified Ideographs Extension A
    ('\u{3400}', '\u{4DBF}'),
    // CJK Unified Ideographs
    ('\u{4E00}', '\u{9FCC}'),
    // CJK Compatibility Ideographs
    ('\u{F900}', '\u{FAAD}'),
];

/// Full-width and CJK punctuation accepted alongside ASCII punctuation.
const CJK_PUNCTUATION: &str = "。［］【】﹁﹂『』「」…、‧《》〈〉﹏—～，";

// ── Public API ───────────────────────────────────────────────────────

/// Returns `true` if every character of `text` is acceptable Chinese input.
///
/// Empty input is vacuously accepted; length bounds are enforced by the
/// caller before this check.
#[must_use]
pub fn is_chinese_text(text: &str) -> bool {
    text.chars().all(is_accepted_char)
}

/// Whether a single character is a supported ideograph or neutral symbol.
#[must_use]
pub fn is_accepted_char(c: char) -> bool {
    is_cjk_ideograph(c) || is_neutral_symbol(c)
}

fn is_cjk_ideograph(c: char) -> bool {
    CJK_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

// ASCII whitespace only, vertical tab and form feed included.
fn is_neutral_symbol(c: char) -> bool {
    c.is_ascii_punctuation()
        || c.is_ascii_digit()
        || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
        || CJK_PUNCTUATION.contains(c)
}
