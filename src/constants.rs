//! Share protocol wire-format constants

/// Chain hash width: 256-bit digest
pub const HASH_SIZE: usize = 32;

/// Public-key hash width (HASH160)
pub const PUBKEY_HASH_SIZE: usize = 20;

/// IP address width: IPv6 octets, IPv4 carried in mapped form
pub const IP_ADDR_SIZE: usize = 16;

/// Big-endian unsigned integer width on the wire
pub const U256_SIZE: usize = 32;

/// Absolute-work width: 128-bit big-endian integer
pub const ABS_WORK_SIZE: usize = 16;

/// Partial-hash engine state carried by a hash link
pub const HASH_LINK_STATE_SIZE: usize = 32;

/// Small block header total width: version + hash + timestamp + bits + nonce
pub const SMALL_BLOCK_HEADER_SIZE: usize = 4 + HASH_SIZE + 4 + 4 + 4;

/// Maximum coinbase script length accepted by share validation.
/// The codec itself does not enforce this; it is a validation-layer rule.
pub const MAX_COINBASE_SIZE: usize = 100;

/// Suggested transport-layer cap on peer-supplied list counts. List decoders
/// allocate per element and enforce no bound themselves; transports should
/// reject messages implying more elements than this before decoding.
pub const MAX_HASH_LIST_LEN: u64 = 65_536;
