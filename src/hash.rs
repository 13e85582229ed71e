//! Default key hashing.
//!
//! Any [`BuildHasher`] can drive a table; the key bytes are written once into
//! a fresh hasher and `finish()` is taken as the hash. The default is CRC32
//! via `crc32fast`, which picks a hardware implementation when available.

use core::hash::{BuildHasher, BuildHasherDefault, Hasher};

/// Hash builder used when a table is constructed without one.
pub type DefaultHashBuilder = BuildHasherDefault<crc32fast::Hasher>;

/// CRC32 of `key`, widened to `u64`.
#[inline]
pub fn crc32_hash(key: &[u8]) -> u64 {
    u64::from(crc32fast::hash(key))
}

/// Hashes raw key bytes with `builder`.
///
/// Unlike `BuildHasher::hash_one`, no length prefix is mixed in.
#[inline]
pub(crate) fn hash_key<S: BuildHasher>(builder: &S, key: &[u8]) -> u64 {
    let mut h = builder.build_hasher();
    h.write(key);
    h.finish()
}
