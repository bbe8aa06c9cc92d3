//! Composite and aggregate share codecs.
//!
//! Each structure is a strict, ordered concatenation of primitive reads or
//! writes; field order is part of the wire contract. Decoding is a pure
//! function of the stream cursor, and the first failure aborts the whole
//! structure with the error propagated unchanged.

use std::io::{Read, Write};

use tracing::debug;

use crate::constants::{HASH_LINK_STATE_SIZE, PUBKEY_HASH_SIZE};
use crate::error::Result;
use crate::types::{
    null_hash, ChainHash, HashLink, SegwitData, ShareData, ShareInfo, SmallBlockHeader, StaleInfo,
    TransactionHashRef,
};
use crate::wire::{
    read_array, read_chain_hash, read_i32_le, read_i8, read_u128_be, read_u16_le, read_u32_le,
    read_u64_le, read_u8, read_var_int, read_var_string, write_all_bytes, write_chain_hash,
    write_i32_le, write_i8, write_u128_be, write_u16_le, write_u32_le, write_u64_le, write_u8,
    write_var_int, write_var_string,
};

/// Decode an abbreviated block header: version, previous block hash,
/// timestamp, bits, nonce. A null previous-block hash decodes to `None`.
pub fn read_small_block_header<R: Read>(r: &mut R) -> Result<SmallBlockHeader> {
    let version = read_i32_le(r)?;
    let previous_block = read_chain_hash(r)?;
    let previous_block = if previous_block == null_hash() {
        None
    } else {
        Some(previous_block)
    };
    let timestamp = read_u32_le(r)?;
    let bits = read_u32_le(r)?;
    let nonce = read_u32_le(r)?;
    Ok(SmallBlockHeader {
        version,
        previous_block,
        timestamp,
        bits,
        nonce,
    })
}

pub fn write_small_block_header<W: Write>(w: &mut W, header: &SmallBlockHeader) -> Result<()> {
    write_i32_le(w, header.version)?;
    write_chain_hash(w, header.previous_block.as_ref())?;
    write_u32_le(w, header.timestamp)?;
    write_u32_le(w, header.bits)?;
    write_u32_le(w, header.nonce)
}

/// Decode a varint-counted list of chain hashes.
///
/// The count is peer-supplied and unbounded at this layer; transports should
/// cap message sizes before handing bytes to this decoder (see
/// [`crate::constants::MAX_HASH_LIST_LEN`]).
pub fn read_chain_hash_list<R: Read>(r: &mut R) -> Result<Vec<ChainHash>> {
    let count = read_var_int(r)?;
    debug!(count, "reading chain hash list");
    let mut list = Vec::new();
    for _ in 0..count {
        list.push(read_chain_hash(r)?);
    }
    Ok(list)
}

pub fn write_chain_hash_list<W: Write>(w: &mut W, list: &[ChainHash]) -> Result<()> {
    write_var_int(w, list.len() as u64)?;
    for hash in list {
        write_chain_hash(w, Some(hash))?;
    }
    Ok(())
}

/// Decode segwit auxiliary data: the txid merkle authentication path and the
/// wtxid merkle root.
pub fn read_segwit_data<R: Read>(r: &mut R) -> Result<SegwitData> {
    let txid_merkle_link = read_chain_hash_list(r)?;
    let wtxid_merkle_root = read_chain_hash(r)?;
    Ok(SegwitData {
        txid_merkle_link,
        wtxid_merkle_root,
    })
}

pub fn write_segwit_data<W: Write>(w: &mut W, data: &SegwitData) -> Result<()> {
    write_chain_hash_list(w, &data.txid_merkle_link)?;
    write_chain_hash(w, Some(&data.wtxid_merkle_root))
}

/// Decode a hash link: 32 opaque state bytes, then the absorbed-byte count.
/// The state is moved byte-for-byte, never interpreted as a digest.
pub fn read_hash_link<R: Read>(r: &mut R) -> Result<HashLink> {
    let state: [u8; HASH_LINK_STATE_SIZE] = read_array(r)?;
    let length = read_var_int(r)?;
    Ok(HashLink { state, length })
}

pub fn write_hash_link<W: Write>(w: &mut W, link: &HashLink) -> Result<()> {
    write_all_bytes(w, &link.state)?;
    write_var_int(w, link.length)
}

/// Decode a transaction back-reference: two varints locating a transaction
/// by share offset and tx offset.
pub fn read_transaction_hash_ref<R: Read>(r: &mut R) -> Result<TransactionHashRef> {
    let share_count = read_var_int(r)?;
    let tx_count = read_var_int(r)?;
    Ok(TransactionHashRef {
        share_count,
        tx_count,
    })
}

pub fn write_transaction_hash_ref<W: Write>(w: &mut W, tx_ref: &TransactionHashRef) -> Result<()> {
    write_var_int(w, tx_ref.share_count)?;
    write_var_int(w, tx_ref.tx_count)
}

pub fn read_transaction_hash_ref_list<R: Read>(r: &mut R) -> Result<Vec<TransactionHashRef>> {
    let count = read_var_int(r)?;
    debug!(count, "reading transaction hash ref list");
    let mut list = Vec::new();
    for _ in 0..count {
        list.push(read_transaction_hash_ref(r)?);
    }
    Ok(list)
}

pub fn write_transaction_hash_ref_list<W: Write>(
    w: &mut W,
    list: &[TransactionHashRef],
) -> Result<()> {
    write_var_int(w, list.len() as u64)?;
    for tx_ref in list {
        write_transaction_hash_ref(w, tx_ref)?;
    }
    Ok(())
}

/// Decode miner-supplied share metadata. Stale-info codes outside the known
/// set decode to [`StaleInfo::Unknown`] rather than failing.
pub fn read_share_data<R: Read>(r: &mut R) -> Result<ShareData> {
    let previous_share_hash = read_chain_hash(r)?;
    let coinbase = read_var_string(r)?;
    let nonce = read_u32_le(r)?;
    let pubkey_hash: [u8; PUBKEY_HASH_SIZE] = read_array(r)?;
    let pubkey_hash_version = read_u8(r)?;
    let subsidy = read_u64_le(r)?;
    let donation = read_u16_le(r)?;
    let stale_info = StaleInfo::from_code(read_i8(r)?);
    let desired_version = read_var_int(r)?;
    Ok(ShareData {
        previous_share_hash,
        coinbase,
        nonce,
        pubkey_hash,
        pubkey_hash_version,
        subsidy,
        donation,
        stale_info,
        desired_version,
    })
}

pub fn write_share_data<W: Write>(w: &mut W, data: &ShareData) -> Result<()> {
    write_chain_hash(w, Some(&data.previous_share_hash))?;
    write_var_string(w, &data.coinbase)?;
    write_u32_le(w, data.nonce)?;
    write_all_bytes(w, &data.pubkey_hash)?;
    write_u8(w, data.pubkey_hash_version)?;
    write_u64_le(w, data.subsidy)?;
    write_u16_le(w, data.donation)?;
    write_i8(w, data.stale_info.code())?;
    write_var_int(w, data.desired_version)
}

/// Decode a full share payload.
///
/// `segwit` is the protocol-version precondition negotiated out of band:
/// nothing in the stream records whether segwit data is present. A wrong
/// flag desynchronizes every following field and is not locally detectable;
/// it typically surfaces later in the same message as a spurious
/// `TruncatedInput` or `NonCanonicalEncoding`.
pub fn read_share_info<R: Read>(r: &mut R, segwit: bool) -> Result<ShareInfo> {
    let share_data = read_share_data(r)?;
    debug!(
        nonce = share_data.nonce,
        coinbase_len = share_data.coinbase.len(),
        subsidy = share_data.subsidy,
        donation = share_data.donation,
        "share data read"
    );

    let segwit_data = if segwit {
        Some(read_segwit_data(r)?)
    } else {
        None
    };

    let new_transaction_hashes = read_chain_hash_list(r)?;
    let transaction_hash_refs = read_transaction_hash_ref_list(r)?;
    let far_share_hash = read_chain_hash(r)?;
    let max_bits = read_u32_le(r)?;
    let bits = read_u32_le(r)?;
    let timestamp = read_u32_le(r)?;
    let abs_height = read_u32_le(r)?;
    let abs_work = read_u128_be(r)?;

    Ok(ShareInfo {
        share_data,
        segwit_data,
        new_transaction_hashes,
        transaction_hash_refs,
        far_share_hash,
        max_bits,
        bits,
        timestamp,
        abs_height,
        abs_work,
    })
}

/// Encode a full share payload, the exact structural inverse of
/// [`read_share_info`].
///
/// The same out-of-band `segwit` flag decides whether segwit data is
/// written. If the flag is set and `segwit_data` is `None`, the null form
/// (empty merkle link, null root) is written; skipping the field would
/// desynchronize every following byte for the receiving peer.
pub fn write_share_info<W: Write>(w: &mut W, info: &ShareInfo, segwit: bool) -> Result<()> {
    write_share_data(w, &info.share_data)?;

    if segwit {
        match &info.segwit_data {
            Some(data) => write_segwit_data(w, data)?,
            None => write_segwit_data(w, &SegwitData::default())?,
        }
    }

    write_chain_hash_list(w, &info.new_transaction_hashes)?;
    write_transaction_hash_ref_list(w, &info.transaction_hash_refs)?;
    write_chain_hash(w, Some(&info.far_share_hash))?;
    write_u32_le(w, info.max_bits)?;
    write_u32_le(w, info.bits)?;
    write_u32_le(w, info.timestamp)?;
    write_u32_le(w, info.abs_height)?;
    write_u128_be(w, info.abs_work)
}
