//! Text normalization, splitting, and packing utilities shared by the
//! chunking strategies.

use std::sync::LazyLock;

use regex::Regex;

/// Character length (not bytes) — all size bounds are in characters.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Normalize line endings (CRLF→LF), expand tabs to two spaces, trim.
pub(crate) fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', "  ")
        .trim()
        .to_string()
}

/// Split `text` at sentence boundaries: `.`/`!`/`?` followed by whitespace
/// and an uppercase letter (or end of text). Returns non-empty fragments.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize; // byte offset

    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let after = chars.get(i + 1).map(|&(_, c)| c);
            let next = chars.get(i + 2).map(|&(_, c)| c);
            let boundary = match (after, next) {
                (Some(ws), Some(up)) if ws.is_whitespace() => up.is_uppercase() || up == '\n',
                (Some(ws), None) if ws.is_whitespace() => true,
                (None, _) => true,
                _ => false,
            };
            if boundary {
                let end = pos + c.len_utf8();
                let s = text[start..end].trim();
                if !s.is_empty() {
                    sentences.push(s.to_string());
                }
                start = end;
                i += 1;
                continue;
            }
        }
        i += 1;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Greedily pack `pieces` into chunks of at most `max_chars`, joining with
/// `sep`. A single piece longer than the cap is passed through intact.
pub(crate) fn pack_greedy(pieces: Vec<String>, max_chars: usize, sep: &str) -> Vec<String> {
    let mut packed = Vec::new();
    let mut buf = String::new();

    for piece in pieces {
        if buf.is_empty() {
            buf = piece;
        } else if char_len(&buf) + char_len(sep) + char_len(&piece) <= max_chars {
            buf.push_str(sep);
            buf.push_str(&piece);
        } else {
            packed.push(std::mem::take(&mut buf));
            buf = piece;
        }
    }
    if !buf.is_empty() {
        packed.push(buf);
    }
    packed
}

/// Sentence-split `text` and greedily pack the sentences up to `max_chars`.
pub(crate) fn pack_sentences(text: &str, max_chars: usize) -> Vec<String> {
    pack_greedy(split_sentences(text), max_chars, " ")
}

/// Slice `text` into `target`-character pieces, backing off to the nearest
/// preceding space within the last `backoff_fraction` of each slice so cuts
/// land between words.
pub(crate) fn slice_fixed_width(text: &str, target: usize, backoff_fraction: f64) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    if chars.is_empty() || target == 0 {
        return Vec::new();
    }

    let backoff = ((target as f64) * backoff_fraction) as usize;
    let mut slices = Vec::new();
    let mut start = 0usize; // index into `chars`

    while start < chars.len() {
        let mut end = (start + target).min(chars.len());
        if end < chars.len() {
            // Look backwards for a space, but never past the backoff window.
            let floor = end.saturating_sub(backoff).max(start + 1);
            if let Some(cut) = (floor..end).rev().find(|&j| chars[j].1 == ' ') {
                end = cut;
            }
        }
        let byte_start = chars[start].0;
        let byte_end = chars
            .get(end)
            .map(|&(pos, _)| pos)
            .unwrap_or(text.len());
        let piece = text[byte_start..byte_end].trim();
        if !piece.is_empty() {
            slices.push(piece.to_string());
        }
        // Skip the space we cut at.
        start = if end < chars.len() && chars[end].1 == ' ' { end + 1 } else { end };
    }
    slices
}

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Final cleanup applied to every structural chunk list: trim, collapse 3+
/// consecutive newlines to 2, strip per-line trailing whitespace, and drop
/// fragments below `min_chars`.
pub(crate) fn postprocess(chunks: Vec<String>, min_chars: usize) -> Vec<String> {
    chunks
        .into_iter()
        .map(|c| {
            let collapsed = EXCESS_NEWLINES.replace_all(&c, "\n\n");
            collapsed
                .lines()
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|c| char_len(c) >= min_chars)
        .collect()
}
