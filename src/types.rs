//! Share protocol structures carried on the wire

use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use serde::{Deserialize, Serialize};

use crate::constants::{HASH_LINK_STATE_SIZE, HASH_SIZE, PUBKEY_HASH_SIZE};

/// 256-bit chain digest. Wire byte order is preserved exactly; the string
/// form is the ecosystem's reversed-hex display.
pub type ChainHash = sha256d::Hash;

/// Public-key hash (HASH160 output)
pub type PubKeyHash = [u8; PUBKEY_HASH_SIZE];

/// The all-zero digest standing in for an absent hash reference.
pub fn null_hash() -> ChainHash {
    ChainHash::from_inner([0u8; HASH_SIZE])
}

/// 256-bit unsigned integer, 32 big-endian bytes on the wire.
///
/// Words are stored least-significant first. The wire form is always the
/// full 32 bytes, zero-left-padded; the logical value carries no leading
/// zero bytes by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct U256([u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0; 4]);

    pub fn from_u64(value: u64) -> Self {
        U256([value, 0, 0, 0])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&word| word == 0)
    }

    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut words = [0u64; 4];
        for (i, word) in words.iter_mut().enumerate() {
            let start = (3 - i) * 8;
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[start..start + 8]);
            *word = u64::from_be_bytes(chunk);
        }
        U256(words)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (i, &word) in self.0.iter().enumerate() {
            let start = (3 - i) * 8;
            bytes[start..start + 8].copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        for (a, b) in self.0.iter().rev().zip(other.0.iter().rev()) {
            match a.cmp(b) {
                std::cmp::Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        U256::from_u64(value)
    }
}

/// Reason code recording why a share went stale.
///
/// The wire carries a signed 8-bit code. Codes outside the known set are
/// preserved bit-exactly in `Unknown` so future reason codes survive a
/// decode/encode cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaleInfo {
    NotStale,
    Orphan,
    Doa,
    Unknown(i8),
}

impl StaleInfo {
    pub fn from_code(code: i8) -> Self {
        match code as u8 {
            0x00 => StaleInfo::NotStale,
            0xfd => StaleInfo::Orphan,
            0xfe => StaleInfo::Doa,
            _ => StaleInfo::Unknown(code),
        }
    }

    pub fn code(self) -> i8 {
        match self {
            StaleInfo::NotStale => 0x00,
            StaleInfo::Orphan => 0xfdu8 as i8,
            StaleInfo::Doa => 0xfeu8 as i8,
            StaleInfo::Unknown(code) => code,
        }
    }
}

/// Abbreviated block header carried inside a share.
///
/// `previous_block` is `None` when the wire field holds the null sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallBlockHeader {
    pub version: i32,
    pub previous_block: Option<ChainHash>,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

/// Segregated-witness auxiliary data: txid merkle authentication path plus
/// the wtxid merkle root. Present only under the segwit protocol variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegwitData {
    pub txid_merkle_link: Vec<ChainHash>,
    pub wtxid_merkle_root: ChainHash,
}

impl Default for SegwitData {
    fn default() -> Self {
        SegwitData {
            txid_merkle_link: Vec::new(),
            wtxid_merkle_root: null_hash(),
        }
    }
}

/// Miner-supplied share metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareData {
    pub previous_share_hash: ChainHash,
    /// Raw coinbase script bytes. Kept as bytes: coinbase content is
    /// arbitrary and must round-trip exactly.
    pub coinbase: Vec<u8>,
    pub nonce: u32,
    pub pubkey_hash: PubKeyHash,
    pub pubkey_hash_version: u8,
    pub subsidy: u64,
    pub donation: u16,
    pub stale_info: StaleInfo,
    pub desired_version: u64,
}

/// Locates a transaction by (share offset, tx offset) into the shared
/// transaction pool instead of repeating its hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHashRef {
    pub share_count: u64,
    pub tx_count: u64,
}

/// Carried partial-hash engine state plus absorbed-byte count, allowing
/// incremental hash resumption. The state is opaque and moved byte-for-byte,
/// never reinterpreted as a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashLink {
    pub state: [u8; HASH_LINK_STATE_SIZE],
    pub length: u64,
}

/// The top-level share payload exchanged between peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInfo {
    pub share_data: ShareData,
    /// Present iff the peer connection negotiated the segwit variant; the
    /// stream itself records nothing about its presence.
    pub segwit_data: Option<SegwitData>,
    pub new_transaction_hashes: Vec<ChainHash>,
    pub transaction_hash_refs: Vec<TransactionHashRef>,
    pub far_share_hash: ChainHash,
    pub max_bits: u32,
    pub bits: u32,
    pub timestamp: u32,
    pub abs_height: u32,
    /// Cumulative work, 16 big-endian bytes on the wire, zero-extended.
    pub abs_work: u128,
}
