//! Text shaping helpers shared by the router: key decoding, analysis truncation,
//! preview extraction and relocation paths.

use chrono::{SecondsFormat, Utc};
use percent_encoding::percent_decode_str;

/// Upper bound for a synchronous `DetectSentiment` request, in UTF-8 bytes.
pub const MAX_ANALYSIS_BYTES: usize = 5000;

/// Length of the preview carried in queued messages, in characters.
pub const PREVIEW_CHARS: usize = 300;

/// Decodes an S3 notification key. Notifications form-encode keys, so `+` is a space
/// and must be replaced before percent-decoding (`%2B` is a literal plus).
///
/// # Examples
///
/// ```
/// use sentiment_router::core::text::decode_object_key;
///
/// assert_eq!(decode_object_key("inbox/my+note%21.txt"), "inbox/my note!.txt");
/// assert_eq!(decode_object_key("a%2Bb.txt"), "a+b.txt");
/// ```
#[must_use]
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Returns the longest prefix of `text` that fits in `max_bytes` without splitting a
/// code point.
#[must_use]
pub fn truncate_utf8_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// First [`PREVIEW_CHARS`] characters of the original text.
#[must_use]
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Destination key for a processed object: the first path segment is replaced by
/// `prefix`. Keys without a `/` are kept whole.
#[must_use]
pub fn processed_key(key: &str, prefix: &str) -> String {
    let rest = key.split_once('/').map_or(key, |(_, rest)| rest);
    format!("{prefix}{rest}")
}

/// Current UTC time as RFC 3339 with microseconds, e.g. `2024-05-01T12:00:00.000000+00:00`.
#[must_use]
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
