//! End-to-end share structure scenarios

use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use share_wire::share::*;
use share_wire::{
    null_hash, ChainHash, SegwitData, ShareData, ShareInfo, StaleInfo, TransactionHashRef,
    WireError,
};

fn test_hash(tag: u8) -> ChainHash {
    sha256d::Hash::hash(&[tag])
}

fn baseline_share_data() -> ShareData {
    ShareData {
        previous_share_hash: null_hash(),
        coinbase: b"abcd".to_vec(),
        nonce: 42,
        pubkey_hash: [0u8; 20],
        pubkey_hash_version: 0,
        subsidy: 5_000_000_000,
        donation: 0,
        stale_info: StaleInfo::NotStale,
        desired_version: 17,
    }
}

fn sample_share_info(segwit_data: Option<SegwitData>) -> ShareInfo {
    ShareInfo {
        share_data: baseline_share_data(),
        segwit_data,
        new_transaction_hashes: vec![test_hash(1), test_hash(2)],
        transaction_hash_refs: vec![
            TransactionHashRef {
                share_count: 1,
                tx_count: 4,
            },
            TransactionHashRef {
                share_count: 0,
                tx_count: 500,
            },
        ],
        far_share_hash: test_hash(3),
        max_bits: 0x1d00ffff,
        bits: 0x1c2a1115,
        timestamp: 1_600_000_042,
        abs_height: 420_000,
        abs_work: 0x0123_4567_89ab_cdef_u128,
    }
}

#[test]
fn test_share_data_end_to_end() {
    let data = baseline_share_data();
    let mut buf = Vec::new();
    write_share_data(&mut buf, &data).unwrap();
    let decoded = read_share_data(&mut buf.as_slice()).unwrap();

    assert_eq!(decoded.previous_share_hash, data.previous_share_hash);
    assert_eq!(decoded.coinbase, b"abcd");
    assert_eq!(decoded.nonce, 42);
    assert_eq!(decoded.pubkey_hash, [0u8; 20]);
    assert_eq!(decoded.pubkey_hash_version, 0);
    assert_eq!(decoded.subsidy, 5_000_000_000);
    assert_eq!(decoded.donation, 0);
    assert_eq!(decoded.stale_info, StaleInfo::NotStale);
    assert_eq!(decoded.desired_version, 17);
    assert_eq!(decoded, data);
}

#[test]
fn test_share_data_exact_wire_bytes() {
    let mut buf = Vec::new();
    write_share_data(&mut buf, &baseline_share_data()).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&[0u8; 32]); // previous share hash (null)
    expected.extend_from_slice(&[0x04, b'a', b'b', b'c', b'd']); // coinbase
    expected.extend_from_slice(&42u32.to_le_bytes()); // nonce
    expected.extend_from_slice(&[0u8; 20]); // pubkey hash
    expected.push(0); // pubkey hash version
    expected.extend_from_slice(&5_000_000_000u64.to_le_bytes()); // subsidy
    expected.extend_from_slice(&[0, 0]); // donation
    expected.push(0); // stale info
    expected.push(17); // desired version
    assert_eq!(buf, expected);
}

#[test]
fn test_share_data_stale_variants_round_trip() {
    for stale in [
        StaleInfo::NotStale,
        StaleInfo::Orphan,
        StaleInfo::Doa,
        StaleInfo::Unknown(-7),
    ] {
        let mut data = baseline_share_data();
        data.stale_info = stale;
        let mut buf = Vec::new();
        write_share_data(&mut buf, &data).unwrap();
        let decoded = read_share_data(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded.stale_info, stale);
    }
}

#[test]
fn test_share_info_round_trip_non_segwit() {
    let info = sample_share_info(None);
    let mut buf = Vec::new();
    write_share_info(&mut buf, &info, false).unwrap();
    let decoded = read_share_info(&mut buf.as_slice(), false).unwrap();
    assert_eq!(decoded, info);
}

#[test]
fn test_share_info_round_trip_segwit() {
    let info = sample_share_info(Some(SegwitData {
        txid_merkle_link: vec![test_hash(10), test_hash(11), test_hash(12)],
        wtxid_merkle_root: test_hash(13),
    }));
    let mut buf = Vec::new();
    write_share_info(&mut buf, &info, true).unwrap();
    let decoded = read_share_info(&mut buf.as_slice(), true).unwrap();
    assert_eq!(decoded, info);
}

#[test]
fn test_share_info_segwit_adds_bytes_to_stream() {
    let plain = sample_share_info(None);
    let mut non_segwit = Vec::new();
    write_share_info(&mut non_segwit, &plain, false).unwrap();

    let segwit = sample_share_info(Some(SegwitData {
        txid_merkle_link: vec![test_hash(10)],
        wtxid_merkle_root: test_hash(13),
    }));
    let mut with_segwit = Vec::new();
    write_share_info(&mut with_segwit, &segwit, true).unwrap();

    // One link hash + root + the link count byte.
    assert_eq!(with_segwit.len(), non_segwit.len() + 1 + 32 + 32);
}

#[test]
fn test_share_info_absent_segwit_data_writes_null_form() {
    // Segwit negotiated but no segwit data on the share: the encoder emits
    // the null form (empty link, null root) instead of skipping the field.
    let info = sample_share_info(None);
    let mut buf = Vec::new();
    write_share_info(&mut buf, &info, true).unwrap();

    let decoded = read_share_info(&mut buf.as_slice(), true).unwrap();
    assert_eq!(
        decoded.segwit_data,
        Some(SegwitData {
            txid_merkle_link: Vec::new(),
            wtxid_merkle_root: null_hash(),
        })
    );
    assert_eq!(decoded.share_data, info.share_data);
    assert_eq!(decoded.abs_work, info.abs_work);
}

#[test]
fn test_share_info_segwit_flag_mismatch_desynchronizes() {
    // A non-segwit stream decoded with segwit=true misparses from the
    // segwit-data position onward. With these field values the bytes of
    // far_share_hash and the trailing fixed fields get consumed as phantom
    // list structure, and the decode fails once the stream runs dry. The
    // mismatch is not locally detectable; only the downstream error is.
    let info = ShareInfo {
        share_data: baseline_share_data(),
        segwit_data: None,
        new_transaction_hashes: Vec::new(),
        transaction_hash_refs: Vec::new(),
        far_share_hash: null_hash(),
        max_bits: 0x1d00ffff,
        bits: 0x1d00ffff,
        timestamp: 42,
        abs_height: 1,
        abs_work: 1,
    };
    let mut buf = Vec::new();
    write_share_info(&mut buf, &info, false).unwrap();

    let result = read_share_info(&mut buf.as_slice(), true);
    assert!(matches!(result, Err(WireError::TruncatedInput { .. })));
}

#[test]
fn test_share_info_lists_preserve_order() {
    let hashes: Vec<ChainHash> = (0..40).map(test_hash).collect();
    let mut info = sample_share_info(None);
    info.new_transaction_hashes = hashes.clone();
    let mut buf = Vec::new();
    write_share_info(&mut buf, &info, false).unwrap();
    let decoded = read_share_info(&mut buf.as_slice(), false).unwrap();
    assert_eq!(decoded.new_transaction_hashes, hashes);
}

#[test]
fn test_chain_hash_list_empty_and_large() {
    for len in [0usize, 1, 300] {
        let list: Vec<ChainHash> = (0..len).map(|i| test_hash((i % 251) as u8)).collect();
        let mut buf = Vec::new();
        write_chain_hash_list(&mut buf, &list).unwrap();
        let decoded = read_chain_hash_list(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, list);
    }
    // An empty list is exactly one zero byte.
    let mut buf = Vec::new();
    write_chain_hash_list(&mut buf, &[]).unwrap();
    assert_eq!(buf, [0x00]);
}

#[test]
fn test_coinbase_at_validation_limit_round_trips() {
    // The codec itself carries any length; MAX_COINBASE_SIZE binds the
    // validation layer above it.
    let mut data = baseline_share_data();
    data.coinbase = vec![0x6a; share_wire::constants::MAX_COINBASE_SIZE];
    let mut buf = Vec::new();
    write_share_data(&mut buf, &data).unwrap();
    let decoded = read_share_data(&mut buf.as_slice()).unwrap();
    assert_eq!(decoded.coinbase.len(), share_wire::constants::MAX_COINBASE_SIZE);
}

#[test]
fn test_transaction_hash_ref_uses_canonical_varints() {
    let tx_ref = TransactionHashRef {
        share_count: 0xfc,
        tx_count: 0xfd,
    };
    let mut buf = Vec::new();
    write_transaction_hash_ref(&mut buf, &tx_ref).unwrap();
    // 0xfc stays inline, 0xfd needs the 3-byte tier.
    assert_eq!(buf, [0xfc, 0xfd, 0xfd, 0x00]);
    let decoded = read_transaction_hash_ref(&mut buf.as_slice()).unwrap();
    assert_eq!(decoded, tx_ref);
}
