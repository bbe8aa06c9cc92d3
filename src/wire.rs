//! Primitive wire codec: canonical varints, length-prefixed byte strings,
//! fixed-width fields, and the exact-read/exact-write stream floor.
//!
//! Every decoder consumes exactly the bytes its value occupies and leaves
//! the stream cursor on the next field. Every encoder writes the one
//! canonical byte form of its value; non-minimal varint tiers are rejected
//! on decode with [`WireError::NonCanonicalEncoding`].

use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv6Addr};

use bitcoin_hashes::Hash as BitcoinHash;

use crate::constants::{ABS_WORK_SIZE, HASH_SIZE, IP_ADDR_SIZE, U256_SIZE};
use crate::error::{Result, WireError};
use crate::types::{ChainHash, U256};

/// Read exactly `buf.len()` bytes, looping over partial reads.
///
/// A single short read from a socket is normal, not an error; only zero-byte
/// progress (end of input) is terminal and reports how far the fill got.
pub fn read_exact_bytes<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(WireError::TruncatedInput {
                    needed: buf.len(),
                    got: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(WireError::Io(e)),
        }
    }
    Ok(())
}

/// Write all of `buf`, looping over partial writes. A sink that stops
/// accepting bytes mid-field is a fatal [`WireError::ShortWrite`].
pub fn write_all_bytes<W: Write>(w: &mut W, buf: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < buf.len() {
        match w.write(&buf[written..]) {
            Ok(0) => {
                return Err(WireError::ShortWrite {
                    expected: buf.len(),
                    written,
                })
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(WireError::Io(e)),
        }
    }
    Ok(())
}

/// Read exactly `N` bytes into a fixed array.
pub fn read_array<R: Read, const N: usize>(r: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    read_exact_bytes(r, &mut buf)?;
    Ok(buf)
}

pub fn read_u8<R: Read>(r: &mut R) -> Result<u8> {
    let buf: [u8; 1] = read_array(r)?;
    Ok(buf[0])
}

pub fn read_i8<R: Read>(r: &mut R) -> Result<i8> {
    Ok(read_u8(r)? as i8)
}

pub fn read_u16_le<R: Read>(r: &mut R) -> Result<u16> {
    Ok(u16::from_le_bytes(read_array(r)?))
}

pub fn read_u32_le<R: Read>(r: &mut R) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array(r)?))
}

pub fn read_i32_le<R: Read>(r: &mut R) -> Result<i32> {
    Ok(i32::from_le_bytes(read_array(r)?))
}

pub fn read_u64_le<R: Read>(r: &mut R) -> Result<u64> {
    Ok(u64::from_le_bytes(read_array(r)?))
}

pub fn write_u8<W: Write>(w: &mut W, value: u8) -> Result<()> {
    write_all_bytes(w, &[value])
}

pub fn write_i8<W: Write>(w: &mut W, value: i8) -> Result<()> {
    write_u8(w, value as u8)
}

pub fn write_u16_le<W: Write>(w: &mut W, value: u16) -> Result<()> {
    write_all_bytes(w, &value.to_le_bytes())
}

pub fn write_u32_le<W: Write>(w: &mut W, value: u32) -> Result<()> {
    write_all_bytes(w, &value.to_le_bytes())
}

pub fn write_i32_le<W: Write>(w: &mut W, value: i32) -> Result<()> {
    write_all_bytes(w, &value.to_le_bytes())
}

pub fn write_u64_le<W: Write>(w: &mut W, value: u64) -> Result<()> {
    write_all_bytes(w, &value.to_le_bytes())
}

/// Decode a canonical variable-length integer.
///
/// One discriminant byte selects the tier: values below 0xfd are inline;
/// 0xfd, 0xfe and 0xff prefix a little-endian u16, u32 and u64. A value
/// encoded in a wider tier than it needs is rejected: two byte strings must
/// never decode to the same logical value, or hash-chained messages become
/// malleable.
pub fn read_var_int<R: Read>(r: &mut R) -> Result<u64> {
    let discriminant = read_u8(r)?;
    match discriminant {
        0xff => {
            let value = read_u64_le(r)?;
            if value < 0x1_0000_0000 {
                return Err(WireError::NonCanonicalEncoding { value, width: 9 });
            }
            Ok(value)
        }
        0xfe => {
            let value = u64::from(read_u32_le(r)?);
            if value < 0x1_0000 {
                return Err(WireError::NonCanonicalEncoding { value, width: 5 });
            }
            Ok(value)
        }
        0xfd => {
            let value = u64::from(read_u16_le(r)?);
            if value < 0xfd {
                return Err(WireError::NonCanonicalEncoding { value, width: 3 });
            }
            Ok(value)
        }
        inline => Ok(u64::from(inline)),
    }
}

/// Encode a variable-length integer in its narrowest tier.
pub fn write_var_int<W: Write>(w: &mut W, value: u64) -> Result<()> {
    if value < 0xfd {
        write_u8(w, value as u8)
    } else if value <= 0xffff {
        write_u8(w, 0xfd)?;
        write_u16_le(w, value as u16)
    } else if value <= 0xffff_ffff {
        write_u8(w, 0xfe)?;
        write_u32_le(w, value as u32)
    } else {
        write_u8(w, 0xff)?;
        write_u64_le(w, value)
    }
}

/// Decode a varint-length-prefixed byte string.
///
/// The payload is raw bytes; coinbase scripts and peer-supplied text both
/// travel through here and must round-trip exactly, so no character-set
/// validation happens at this layer.
pub fn read_var_string<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    let len = read_var_int(r)? as usize;
    let mut buf = vec![0u8; len];
    read_exact_bytes(r, &mut buf)?;
    Ok(buf)
}

/// Encode a byte string as a varint length prefix plus the raw bytes.
pub fn write_var_string<W: Write>(w: &mut W, value: &[u8]) -> Result<()> {
    write_var_int(w, value.len() as u64)?;
    write_all_bytes(w, value)
}

/// Decode a 16-byte IP address. IPv4 travels in IPv6-mapped form and decodes
/// back to a plain V4 address.
pub fn read_ip_addr<R: Read>(r: &mut R) -> Result<IpAddr> {
    let octets: [u8; IP_ADDR_SIZE] = read_array(r)?;
    let v6 = Ipv6Addr::from(octets);
    Ok(match v6.to_ipv4_mapped() {
        Some(v4) => IpAddr::V4(v4),
        None => IpAddr::V6(v6),
    })
}

/// Encode an IP address as 16 bytes, mapping IPv4 into IPv6 form.
pub fn write_ip_addr<W: Write>(w: &mut W, addr: &IpAddr) -> Result<()> {
    let octets = match addr {
        IpAddr::V4(v4) => v4.to_ipv6_mapped().octets(),
        IpAddr::V6(v6) => v6.octets(),
    };
    write_all_bytes(w, &octets)
}

/// Decode a 32-byte big-endian unsigned integer. The wire width is fixed;
/// leading zero bytes vanish into the logical value.
pub fn read_u256<R: Read>(r: &mut R) -> Result<U256> {
    let bytes: [u8; U256_SIZE] = read_array(r)?;
    Ok(U256::from_be_bytes(bytes))
}

/// Encode a 256-bit integer as exactly 32 big-endian bytes, zero-left-padded
/// regardless of the value's natural length.
pub fn write_u256<W: Write>(w: &mut W, value: &U256) -> Result<()> {
    write_all_bytes(w, &value.to_be_bytes())
}

/// Decode a 16-byte big-endian unsigned 128-bit integer (the absolute-work
/// field width).
pub fn read_u128_be<R: Read>(r: &mut R) -> Result<u128> {
    let bytes: [u8; ABS_WORK_SIZE] = read_array(r)?;
    Ok(u128::from_be_bytes(bytes))
}

/// Encode a 128-bit integer as exactly 16 big-endian bytes.
pub fn write_u128_be<W: Write>(w: &mut W, value: u128) -> Result<()> {
    write_all_bytes(w, &value.to_be_bytes())
}

/// Decode a 32-byte chain hash, byte order preserved exactly.
pub fn read_chain_hash<R: Read>(r: &mut R) -> Result<ChainHash> {
    let bytes: [u8; HASH_SIZE] = read_array(r)?;
    ChainHash::from_slice(&bytes).map_err(|_| WireError::MalformedDigest {
        expected: HASH_SIZE,
        got: bytes.len(),
    })
}

/// Encode a chain hash as 32 raw bytes. An absent reference writes the null
/// sentinel; the field width never varies.
pub fn write_chain_hash<W: Write>(w: &mut W, hash: Option<&ChainHash>) -> Result<()> {
    let bytes = match hash {
        Some(h) => h.into_inner(),
        None => [0u8; HASH_SIZE],
    };
    write_all_bytes(w, &bytes)
}
