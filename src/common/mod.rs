//! Low level, cross-cutting helpers shared by every other module:
//! binary (de)serialization, the `VInt` varint codec, the doc id set
//! representations (`BitSet`, `SortedDocIdSet`, `HybridDocIdSet`), and
//! a composite-file abstraction for multiplexing several logical
//! per-field streams into one physical file.

mod bitset;
mod composite_file;
mod counting_writer;
mod serialize;
mod vint;

pub use self::bitset::{BitSet, DocIdSet, HybridDocIdSet, SortedDocIdSet};
pub use self::composite_file::{CompositeFile, CompositeWrite};
pub use self::counting_writer::CountingWriter;
pub use self::serialize::BinarySerializable;
pub use self::vint::VInt;

/// Computes the number of bits required to represent values up to `n` (inclusive).
pub fn compute_num_bits(n: u64) -> u8 {
    if n == 0 {
        0
    } else {
        64u8 - (n.leading_zeros() as u8)
    }
}

/// Splits a `u64` into its big-endian bytes. Used by numeric fields whose
/// sortable encoding must preserve ordering under plain byte comparison.
pub fn u64_to_be_bytes(val: u64) -> [u8; 8] {
    val.to_be_bytes()
}

pub fn be_bytes_to_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_num_bits() {
        assert_eq!(compute_num_bits(0), 0);
        assert_eq!(compute_num_bits(1), 1);
        assert_eq!(compute_num_bits(255), 8);
        assert_eq!(compute_num_bits(256), 9);
    }

    #[test]
    fn test_be_roundtrip() {
        for v in [0u64, 1, 42, u64::MAX, 1 << 40] {
            assert_eq!(be_bytes_to_u64(&u64_to_be_bytes(v)), v);
        }
    }
}
