use std::fmt;

use super::Field;

/// A `Term` is what the term dictionary actually keys on: a `Field`
/// followed by the field's indexable byte encoding of a value. Keeping
/// field and value concatenated (rather than indexed separately) is
/// what lets one term dictionary per segment serve every field: terms
/// from different fields never collide because the field id is the
/// common prefix.
///
/// Numeric values are mapped into an order-preserving unsigned domain
/// before being appended, so that lexicographic byte comparison of two
/// `Term`s agrees with the numeric ordering of the values they encode
/// (needed for range queries over the term dictionary).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term(Vec<u8>);

const FIELD_ID_LEN: usize = 4;

impl Term {
    fn with_field(field: Field) -> Term {
        let mut bytes = Vec::with_capacity(FIELD_ID_LEN + 8);
        bytes.extend_from_slice(&field.field_id().to_be_bytes());
        Term(bytes)
    }

    /// Starts a reusable term bound to `field`, with no value bytes yet.
    /// Paired with `set_text`, this lets a caller walking a token stream
    /// mutate one `Term` in place per token instead of allocating one
    /// `Term` per token (the facet indexing path in `SegmentWriter` does
    /// this).
    pub fn for_field(field: Field) -> Term {
        Term::with_field(field)
    }

    /// Overwrites this term's value bytes with `text`, keeping the field
    /// prefix untouched.
    pub fn set_text(&mut self, text: &str) {
        self.0.truncate(FIELD_ID_LEN);
        self.0.extend_from_slice(text.as_bytes());
    }

    pub fn from_field_text(field: Field, text: &str) -> Term {
        let mut term = Term::with_field(field);
        term.0.extend_from_slice(text.as_bytes());
        term
    }

    pub fn from_field_bytes(field: Field, bytes: &[u8]) -> Term {
        let mut term = Term::with_field(field);
        term.0.extend_from_slice(bytes);
        term
    }

    pub fn from_field_u64(field: Field, value: u64) -> Term {
        let mut term = Term::with_field(field);
        term.0.extend_from_slice(&value.to_be_bytes());
        term
    }

    pub fn from_field_i64(field: Field, value: i64) -> Term {
        Term::from_field_u64(field, i64_to_sortable_u64(value))
    }

    pub fn from_field_f64(field: Field, value: f64) -> Term {
        Term::from_field_u64(field, f64_to_sortable_u64(value))
    }

    pub fn field(&self) -> Field {
        let mut id_bytes = [0u8; FIELD_ID_LEN];
        id_bytes.copy_from_slice(&self.0[..FIELD_ID_LEN]);
        Field(u32::from_be_bytes(id_bytes))
    }

    pub fn value_bytes(&self) -> &[u8] {
        &self.0[FIELD_ID_LEN..]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Term(field={}, bytes={:?})",
            self.field().field_id(),
            self.value_bytes()
        )
    }
}

/// Maps a signed integer into the unsigned domain while preserving
/// order: flipping the sign bit moves the negative half below the
/// positive half in unsigned comparison.
pub fn i64_to_sortable_u64(value: i64) -> u64 {
    (value as u64) ^ (1u64 << 63)
}

pub fn sortable_u64_to_i64(encoded: u64) -> i64 {
    (encoded ^ (1u64 << 63)) as i64
}

/// Maps an `f64` into the unsigned domain while preserving order. IEEE
/// 754 floats already compare correctly as signed integers for positive
/// values; flipping every bit for negative values (rather than just the
/// sign bit) fixes up the reversed ordering of negative magnitudes.
pub fn f64_to_sortable_u64(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & (1u64 << 63) != 0 {
        !bits
    } else {
        bits | (1u64 << 63)
    }
}

pub fn sortable_u64_to_f64(encoded: u64) -> f64 {
    let bits = if encoded & (1u64 << 63) != 0 {
        encoded & !(1u64 << 63)
    } else {
        !encoded
    };
    f64::from_bits(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_field_roundtrip() {
        let term = Term::from_field_text(Field(3), "hello");
        assert_eq!(term.field(), Field(3));
        assert_eq!(term.value_bytes(), b"hello");
    }

    #[test]
    fn test_i64_sortable_preserves_order() {
        let values = [i64::MIN, -100, -1, 0, 1, 100, i64::MAX];
        let mut encoded: Vec<u64> = values.iter().map(|&v| i64_to_sortable_u64(v)).collect();
        let mut sorted_encoded = encoded.clone();
        sorted_encoded.sort();
        assert_eq!(encoded, sorted_encoded);
        encoded.iter().zip(values.iter()).for_each(|(&e, &v)| {
            assert_eq!(sortable_u64_to_i64(e), v);
        });
    }

    #[test]
    fn test_f64_sortable_preserves_order() {
        let values = [f64::NEG_INFINITY, -1.5, -0.0, 0.0, 1.5, f64::INFINITY];
        let encoded: Vec<u64> = values.iter().map(|&v| f64_to_sortable_u64(v)).collect();
        let mut sorted_encoded = encoded.clone();
        sorted_encoded.sort();
        assert_eq!(encoded, sorted_encoded);
        for &v in &values {
            assert_eq!(sortable_u64_to_f64(f64_to_sortable_u64(v)), v);
        }
    }

    #[test]
    fn test_term_ordering_matches_field_then_bytes() {
        let low = Term::from_field_u64(Field(0), 5);
        let high = Term::from_field_u64(Field(0), 10);
        assert!(low < high);
        let other_field = Term::from_field_u64(Field(1), 0);
        assert!(high < other_field);
    }
}
