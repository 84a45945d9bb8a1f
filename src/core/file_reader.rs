//! File reading under a configurable text encoding
//!
//! Decoding is strict: malformed input is a [`ReadError`], never silently replaced.
//! A leading byte-order mark is kept as part of the content.

use encoding_rs::{Encoding, UTF_8};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Failure to open or decode a file as text
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("'{encoding}' codec can't decode byte 0x{byte:02x} in position {position}: {reason}")]
    InvalidByte {
        encoding: &'static str,
        byte: u8,
        position: usize,
        reason: &'static str,
    },

    #[error("'{encoding}' codec can't decode file content: malformed input")]
    Malformed { encoding: &'static str },
}

/// A named text encoding (any WHATWG label: utf-8, latin1, shift_jis, utf-16le, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// Look up an encoding by label
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(TextEncoding)
    }

    /// Canonical lowercase name, used in error messages
    pub fn name(&self) -> &'static str {
        if self.0 == UTF_8 {
            "utf-8"
        } else {
            self.0.name()
        }
    }

    /// Decode bytes strictly
    pub fn decode(&self, bytes: Vec<u8>) -> Result<String, ReadError> {
        if self.0 == UTF_8 {
            return String::from_utf8(bytes).map_err(|e| {
                let err = e.utf8_error();
                let position = err.valid_up_to();
                let byte = e.as_bytes()[position];
                let reason = match err.error_len() {
                    Some(_) => "invalid utf-8 sequence",
                    None => "unexpected end of data",
                };
                ReadError::InvalidByte {
                    encoding: self.name(),
                    byte,
                    position,
                    reason,
                }
            });
        }

        self.0
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .map(|s| s.into_owned())
            .ok_or(ReadError::Malformed {
                encoding: self.name(),
            })
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding(UTF_8)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextEncoding::for_label(s).ok_or_else(|| format!("Unknown encoding: {}", s))
    }
}

/// Read a whole file and decode it; the handle is released before returning
pub fn read_text(path: &Path, encoding: TextEncoding) -> Result<String, ReadError> {
    let bytes = {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        buffer
    };

    encoding.decode(bytes)
}
