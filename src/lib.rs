//! # Share-Wire
//!
//! Binary wire codec for a peer-to-peer mining-pool share protocol.
//!
//! This crate converts byte streams into strongly-typed share structures and
//! back, byte-for-byte. Share validation, sharechain assembly and peer
//! messaging all sit on top of it, so the codec enforces the protocol's
//! strict canonical-encoding rules: a value has exactly one byte form, and
//! non-minimal varint encodings are rejected outright. In a hash-chained
//! protocol, two byte strings decoding to the same logical value hash
//! differently, which is a malleability hole.
//!
//! ## Architecture
//!
//! Layered codecs, bottom-up:
//! - `wire` - primitives: canonical varints, byte strings, fixed-width
//!   fields over `std::io::Read`/`Write`
//! - `share` - composites (`SmallBlockHeader`, `SegwitData`, `HashLink`,
//!   `TransactionHashRef`) and the `ShareData`/`ShareInfo` aggregates
//!
//! The digest type is `bitcoin_hashes::sha256d::Hash`; this crate never
//! computes hashes, it only moves their 32 bytes.
//!
//! ## Usage
//!
//! ```rust
//! use share_wire::{null_hash, ShareCodec, ShareData, StaleInfo};
//!
//! let data = ShareData {
//!     previous_share_hash: null_hash(),
//!     coinbase: b"abcd".to_vec(),
//!     nonce: 42,
//!     pubkey_hash: [0u8; 20],
//!     pubkey_hash_version: 0,
//!     subsidy: 5_000_000_000,
//!     donation: 0,
//!     stale_info: StaleInfo::NotStale,
//!     desired_version: 17,
//! };
//!
//! let codec = ShareCodec::new(false);
//! let mut buf = Vec::new();
//! codec.write_share_data(&mut buf, &data).unwrap();
//!
//! let mut cursor = buf.as_slice();
//! let decoded = codec.read_share_data(&mut cursor).unwrap();
//! assert_eq!(decoded, data);
//! ```

pub mod constants;
pub mod error;
pub mod share;
pub mod types;
pub mod wire;

// Re-export commonly used types
pub use error::{Result, WireError};
pub use types::{
    null_hash, ChainHash, HashLink, PubKeyHash, SegwitData, ShareData, ShareInfo,
    SmallBlockHeader, StaleInfo, TransactionHashRef, U256,
};

use std::io::{Read, Write};

/// Share codec bound to a negotiated protocol variant.
///
/// The segwit flag is a protocol-version precondition established during
/// peer version negotiation, not a wire field: the stream itself records
/// nothing about whether segwit data is present. Holding the flag here keeps
/// every decode and encode on one connection consistent.
///
/// # Examples
///
/// ```
/// use share_wire::ShareCodec;
///
/// let codec = ShareCodec::new(true);
/// assert!(codec.segwit());
/// ```
pub struct ShareCodec {
    segwit: bool,
}

impl ShareCodec {
    /// Create a codec for the given protocol variant.
    pub fn new(segwit: bool) -> Self {
        Self { segwit }
    }

    /// Whether this codec expects segwit data in share payloads.
    pub fn segwit(&self) -> bool {
        self.segwit
    }

    /// Decode a full share payload from the stream.
    pub fn read_share_info<R: Read>(&self, r: &mut R) -> Result<ShareInfo> {
        share::read_share_info(r, self.segwit)
    }

    /// Encode a full share payload to the stream.
    pub fn write_share_info<W: Write>(&self, w: &mut W, info: &ShareInfo) -> Result<()> {
        share::write_share_info(w, info, self.segwit)
    }

    /// Decode share metadata from the stream.
    pub fn read_share_data<R: Read>(&self, r: &mut R) -> Result<ShareData> {
        share::read_share_data(r)
    }

    /// Encode share metadata to the stream.
    pub fn write_share_data<W: Write>(&self, w: &mut W, data: &ShareData) -> Result<()> {
        share::write_share_data(w, data)
    }
}

impl Default for ShareCodec {
    /// A codec for the pre-segwit protocol variant.
    fn default() -> Self {
        Self::new(false)
    }
}
