// src/repair/detect.rs

//! Mojibake sequence detection
//!
//! A run of characters is treated as mojibake when its sloppy Windows-1252
//! byte image is exactly one well-formed multi-byte UTF-8 sequence: a lead
//! byte in `0xC2..=0xF4` followed by the right number of continuation bytes
//! in `0x80..=0xBF`. Characters outside the codec's repertoire (CJK, emoji,
//! already-correct typographic dashes next to damage) simply break a run.

use serde::Serialize;
use std::ops::Range;

use crate::codec::SLOPPY_WINDOWS_1252;

/// One detected mojibake sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// Byte range of the damaged text
    pub range: Range<usize>,
    /// The character the sequence decodes to
    pub repaired: char,
}

/// A located sequence, as reported by `scan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    pub damaged: String,
    pub repaired: String,
}

/// Expected UTF-8 sequence length for a lead byte
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool {
    (0x80..=0xBF).contains(&byte)
}

/// Find every mojibake sequence in `text`, left to right, non-overlapping
pub fn find_sequences(text: &str) -> Vec<Sequence> {
    let codec = &*SLOPPY_WINDOWS_1252;
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut found = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, lead_char) = chars[i];
        let Some(len) = codec.encode_char(lead_char).and_then(sequence_len) else {
            i += 1;
            continue;
        };
        if i + len > chars.len() {
            i += 1;
            continue;
        }

        let mut bytes = Vec::with_capacity(len);
        for &(_, ch) in &chars[i..i + len] {
            match codec.encode_char(ch) {
                Some(b) if bytes.is_empty() || is_continuation(b) => bytes.push(b),
                _ => break,
            }
        }

        // from_utf8 also rejects overlong forms and surrogates
        let decoded = (bytes.len() == len)
            .then(|| std::str::from_utf8(&bytes).ok())
            .flatten()
            .and_then(|s| s.chars().next());

        match decoded {
            Some(repaired) => {
                let (last_start, last_char) = chars[i + len - 1];
                found.push(Sequence {
                    range: start..last_start + last_char.len_utf8(),
                    repaired,
                });
                i += len;
            }
            None => i += 1,
        }
    }

    found
}

/// Number of mojibake sequences in `text`; zero means it looks clean
pub fn score(text: &str) -> usize {
    find_sequences(text).len()
}

/// Locate every sequence with line and column for reporting
pub fn scan(text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut line = 1;
    let mut line_start = 0;
    let mut cursor = 0;

    for seq in find_sequences(text) {
        for (offset, ch) in text[cursor..seq.range.start].char_indices() {
            if ch == '\n' {
                line += 1;
                line_start = cursor + offset + 1;
            }
        }
        cursor = seq.range.start;

        findings.push(Finding {
            line,
            column: text[line_start..seq.range.start].chars().count() + 1,
            damaged: text[seq.range.clone()].to_string(),
            repaired: seq.repaired.to_string(),
        });
    }

    findings
}
