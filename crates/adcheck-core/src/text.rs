//! Text measurement utilities.
//!
//! Lengths are counted in UTF-16 code units, the unit the workflow host uses
//! for string length. No normalization and no grapheme clustering: an emoji
//! outside the Basic Multilingual Plane counts as two.

/// Marker appended to text that has been cut short.
pub const ELLIPSIS: &str = "...";

/// Length of `text` in UTF-16 code units.
pub fn char_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Longest prefix of `text` that is at most `max` code units long.
///
/// Never splits a character: a surrogate pair that would straddle the
/// boundary is dropped entirely.
pub fn truncate(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += ch.len_utf16();
        if used > max {
            return &text[..idx];
        }
    }
    text
}

/// Suggest a shortened version of `text` that fits within `limit`.
///
/// Keeps as many leading whole words as fit, joined by single spaces. When not
/// even the first word fits, cuts the text and appends [`ELLIPSIS`].
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn suggest_shortening(text: &str, limit: usize) -> String {
    if char_len(text) <= limit {
        return text.to_string();
    }

    let mut shortened = String::new();
    for word in text.split_whitespace() {
        let extra = if shortened.is_empty() { 0 } else { 1 };
        if char_len(&shortened) + extra + char_len(word) > limit {
            break;
        }
        if extra == 1 {
            shortened.push(' ');
        }
        shortened.push_str(word);
    }

    if shortened.is_empty() {
        let ellipsis_len = char_len(ELLIPSIS);
        if limit <= ellipsis_len {
            return truncate(text, limit).to_string();
        }
        return format!("{}{ELLIPSIS}", truncate(text, limit - ellipsis_len));
    }

    shortened
}
