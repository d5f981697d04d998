// src/codec.rs

//! Byte/character codecs used by the repair strategies
//!
//! Two single-byte views of text are needed to undo mojibake:
//!
//! - Latin-1, where every character U+0000..=U+00FF is exactly one byte.
//!   This is what the blind re-decode uses.
//! - "Sloppy" Windows-1252, which is Windows-1252 with its five unassigned
//!   bytes (0x81, 0x8D, 0x8F, 0x90, 0x9D) mapped to the C1 control characters
//!   of the same number. Browsers and most editors decode this way, so it is
//!   the view in which real-world mojibake like `Ã¤` and `â€“` round-trips.

use encoding_rs::mem::{self, encode_latin1_lossy, str_latin1_up_to};
use encoding_rs::WINDOWS_1252;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors from encoding text to bytes or decoding bytes to text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A character has no byte in the target single-byte encoding
    #[error("character {ch:?} at index {index} cannot be encoded as {codec}")]
    Unencodable {
        ch: char,
        index: usize,
        codec: &'static str,
    },

    /// The byte sequence is not valid UTF-8
    #[error("invalid UTF-8 after {valid_up_to} valid bytes")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Encode text as Latin-1, failing on the first character above U+00FF
pub fn encode_latin1(text: &str) -> Result<Vec<u8>, DecodeError> {
    let valid_up_to = str_latin1_up_to(text);
    if let Some(ch) = text[valid_up_to..].chars().next() {
        return Err(DecodeError::Unencodable {
            ch,
            index: text[..valid_up_to].chars().count(),
            codec: "latin-1",
        });
    }
    Ok(encode_latin1_lossy(text).into_owned())
}

/// Decode Latin-1 bytes (infallible, one char per byte)
pub fn decode_latin1(bytes: &[u8]) -> String {
    mem::decode_latin1(bytes).into_owned()
}

/// Strictly decode UTF-8, reporting where the first invalid sequence starts
pub fn decode_utf8(bytes: Vec<u8>) -> Result<String, DecodeError> {
    String::from_utf8(bytes).map_err(|e| DecodeError::InvalidUtf8 {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// A single-byte codec where every byte value maps to a character
pub struct SloppyCodec {
    name: &'static str,
    decoded: [char; 256],
    encoded: HashMap<char, u8>,
}

impl SloppyCodec {
    fn from_encoding(name: &'static str, base: &'static encoding_rs::Encoding) -> Self {
        let mut decoded = ['\0'; 256];
        let mut encoded = HashMap::with_capacity(256);

        for byte in 0..=255u8 {
            let ch = base
                .decode_without_bom_handling(&[byte])
                .0
                .chars()
                .next()
                .filter(|&c| c != char::REPLACEMENT_CHARACTER)
                // Holes take the code point with the same number
                .unwrap_or(char::from(byte));
            decoded[usize::from(byte)] = ch;
            encoded.insert(ch, byte);
        }

        Self {
            name,
            decoded,
            encoded,
        }
    }

    /// Codec name, e.g. "sloppy-windows-1252"
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Character for one byte
    pub fn decode_byte(&self, byte: u8) -> char {
        self.decoded[usize::from(byte)]
    }

    /// Byte for one character, if the character is in the repertoire
    pub fn encode_char(&self, ch: char) -> Option<u8> {
        self.encoded.get(&ch).copied()
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.decode_byte(b)).collect()
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>, DecodeError> {
        text.chars()
            .enumerate()
            .map(|(index, ch)| {
                self.encode_char(ch).ok_or(DecodeError::Unencodable {
                    ch,
                    index,
                    codec: self.name,
                })
            })
            .collect()
    }

    /// Produce the mojibake a UTF-8 string turns into when its bytes are
    /// misread through this codec
    pub fn garble(&self, text: &str) -> String {
        self.decode(text.as_bytes())
    }
}

/// Sloppy Windows-1252, the codec behind almost all Western mojibake
pub static SLOPPY_WINDOWS_1252: LazyLock<SloppyCodec> =
    LazyLock::new(|| SloppyCodec::from_encoding("sloppy-windows-1252", WINDOWS_1252));
