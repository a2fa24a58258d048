//! Hash functions for placing keys and virtual nodes on the ring.
//!
//! Every process that routes against the same ring must use the same
//! function, so these are pure functions of their input bytes.

/// Signature of a ring hash function.
pub type HashFn = fn(&[u8]) -> u32;

/// CRC32 checksum with the IEEE polynomial. This is the default.
pub fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// First four bytes of the BLAKE3 digest, little-endian.
pub fn blake3_32(data: &[u8]) -> u32 {
    let hash = blake3::hash(data);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
