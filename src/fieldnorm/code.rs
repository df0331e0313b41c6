use once_cell::sync::Lazy;

/// Lengths below this bound are stored exactly; beyond it, the byte code
/// switches to a log-scale bucketing (§4.1 "lengths larger than 255 are
/// bucketed into 1-byte log-scale codes"). Grounded on the teacher's
/// `fieldnorm` module, which reserves the same low range for exact
/// values before switching to an exponential code.
const MAX_EXACT_FIELD_NORM: u8 = 24;

fn compute_fieldnorm(id: u8) -> u32 {
    let id = u32::from(id);
    if id < u32::from(MAX_EXACT_FIELD_NORM) {
        id
    } else {
        let bits = (id - u32::from(MAX_EXACT_FIELD_NORM)) >> 3;
        let msb = 1u32 << (bits + 4);
        let embedded = (id - u32::from(MAX_EXACT_FIELD_NORM)) & 7;
        msb | (embedded << bits)
    }
}

static FIELD_NORMS_TABLE: Lazy<[u32; 256]> = Lazy::new(|| {
    let mut table = [0u32; 256];
    for (id, slot) in table.iter_mut().enumerate() {
        *slot = compute_fieldnorm(id as u8);
    }
    table
});

/// Decodes a stored field-norm byte code back into a document length.
pub fn id_to_fieldnorm(id: u8) -> u32 {
    FIELD_NORMS_TABLE[id as usize]
}

/// Encodes a document length into its nearest-below byte code. The
/// table is monotonically increasing, so every length maps to exactly
/// one code via binary search.
pub fn fieldnorm_to_id(fieldnorm: u32) -> u8 {
    match FIELD_NORMS_TABLE.binary_search(&fieldnorm) {
        Ok(id) => id as u8,
        Err(0) => 0,
        Err(id) => (id - 1) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_range_roundtrips() {
        for len in 0u32..24u32 {
            let id = fieldnorm_to_id(len);
            assert_eq!(id_to_fieldnorm(id), len);
        }
    }

    #[test]
    fn test_table_is_monotonic() {
        let mut prev = 0u32;
        for id in 0..=255u8 {
            let val = id_to_fieldnorm(id);
            assert!(val >= prev);
            prev = val;
        }
    }

    #[test]
    fn test_large_length_rounds_down() {
        let id = fieldnorm_to_id(10_000);
        assert!(id_to_fieldnorm(id) <= 10_000);
        let next_val = id_to_fieldnorm(id.saturating_add(1));
        assert!(next_val == id_to_fieldnorm(id) || next_val > 10_000);
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(fieldnorm_to_id(0), 0);
        assert_eq!(id_to_fieldnorm(0), 0);
    }
}
