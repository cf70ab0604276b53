//! Text decoding and ordering helpers shared by the pipeline stages.

use std::borrow::Cow;
use std::cmp::Ordering;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Decode a stylesheet or page to text.
///
/// Valid UTF-8 (with or without a BOM) is borrowed as-is. Anything else is
/// decoded with the `declared` encoding label when it names one
/// `encoding_rs` knows, else as Windows-1252, which never fails.
pub fn decode_text<'a>(bytes: &'a [u8], declared: Option<&str>) -> Cow<'a, str> {
    let (text, malformed) = UTF_8.decode_with_bom_removal(bytes);
    if !malformed {
        return text;
    }

    let fallback = declared
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(WINDOWS_1252);
    fallback.decode_with_bom_removal(bytes).0
}

/// Decode a markup file, honouring the encoding named in its XML declaration.
pub fn decode_markup(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, declared_encoding(bytes))
}

/// The `encoding` pseudo-attribute of a leading `<?xml ...?>` declaration.
///
/// Only the first 100 bytes are searched.
pub fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(100)];
    let decl = &head[head.windows(5).position(|w| w == b"<?xml")?..];
    let decl = match decl.windows(2).position(|w| w == b"?>") {
        Some(close) => &decl[..close],
        None => decl,
    };

    let value_at = decl
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?
        + 9;
    let (&quote, rest) = decl[value_at..].split_first()?;
    if !matches!(quote, b'"' | b'\'') {
        return None;
    }
    let len = rest.iter().position(|&b| b == quote)?;
    std::str::from_utf8(&rest[..len]).ok()
}

// ============================================================================
// Natural Ordering
// ============================================================================

/// One run of a file name: either digits or everything between digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NaturalChunk<'a> {
    Text(&'a str),
    Number(u64),
}

impl Ord for NaturalChunk<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (NaturalChunk::Number(a), NaturalChunk::Number(b)) => a.cmp(b),
            (NaturalChunk::Text(a), NaturalChunk::Text(b)) => a.cmp(b),
            // Numbers sort ahead of text, so "page-2" < "page-x".
            (NaturalChunk::Number(_), NaturalChunk::Text(_)) => Ordering::Less,
            (NaturalChunk::Text(_), NaturalChunk::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for NaturalChunk<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a name into text and number chunks so that `page-9` sorts before
/// `page-10`.
///
/// Digit runs too long for a `u64` are kept as text.
pub fn natural_sort_key(name: &str) -> Vec<NaturalChunk<'_>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (i, c) in name.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                chunks.push(make_chunk(&name[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }

    if let Some(is_digit) = in_digits {
        chunks.push(make_chunk(&name[start..], is_digit));
    }

    chunks
}

fn make_chunk(run: &str, is_digit: bool) -> NaturalChunk<'_> {
    if is_digit && let Ok(n) = run.parse() {
        return NaturalChunk::Number(n);
    }
    NaturalChunk::Text(run)
}

/// Escape text for use in HTML element content or a quoted attribute.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
