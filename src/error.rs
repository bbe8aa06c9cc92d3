//! Error types for wire encoding and decoding

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    /// The stream ended before the structure was complete.
    #[error("truncated input: needed {needed} bytes, got {got}")]
    TruncatedInput { needed: usize, got: usize },

    /// The sink stopped accepting bytes mid-field.
    #[error("short write: expected to write {expected} bytes, wrote {written}")]
    ShortWrite { expected: usize, written: usize },

    /// A varint used a wider tier than its value requires.
    #[error("varint not canonically packed: value {value} in {width}-byte encoding")]
    NonCanonicalEncoding { value: u64, width: usize },

    /// Fixed-width hash bytes could not construct the digest type.
    #[error("malformed digest: expected {expected} bytes, got {got}")]
    MalformedDigest { expected: usize, got: usize },

    /// Underlying stream failure, passed through unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, WireError>;
