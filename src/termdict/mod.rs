//! A single, whole-segment term dictionary (§4.2 "Term dictionary"),
//! keyed on the full `Term` byte encoding (field-id prefix + value
//! bytes) so that every field in the schema shares one FST rather than
//! paying a per-field FST's fixed overhead.
//!
//! On disk: `[VInt num_terms][serialized V; num_terms][FST bytes to EOF]`.
//! The FST (`tantivy_fst::Map`) maps a term's bytes to its ordinal, an
//! index into the side array of `V` -- grounded on the teacher's own
//! `termdict::fst` module, which keeps exactly this split between "where
//! is this term" (FST) and "what do we know about it" (a side array of
//! `TermInfo`) so the hot FST lookup never has to deserialize anything
//! bigger than a `u64`.

mod streamer;

pub use self::streamer::TermStreamer;

use std::io::{self, Write};
use std::marker::PhantomData;

use tantivy_fst::{self, Automaton, IntoStreamer, Map, MapBuilder, Streamer};

use crate::common::{BinarySerializable, VInt};
use crate::directory::ReadOnlySource;

fn fst_error_to_io(err: tantivy_fst::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// Builds a `TermDictionary`'s on-disk bytes. Terms must be inserted in
/// strictly ascending byte order -- the same order the FST itself
/// requires -- which is guaranteed upstream by `MultiFieldPostingsWriter`
/// sorting all recorded terms before serializing.
pub struct TermDictionaryBuilder<V> {
    fst_builder: MapBuilder<Vec<u8>>,
    values: Vec<u8>,
    num_terms: u64,
    _marker: PhantomData<V>,
}

impl<V: BinarySerializable> TermDictionaryBuilder<V> {
    pub fn new() -> io::Result<TermDictionaryBuilder<V>> {
        Ok(TermDictionaryBuilder {
            fst_builder: MapBuilder::new(Vec::new()).map_err(fst_error_to_io)?,
            values: Vec::new(),
            num_terms: 0,
            _marker: PhantomData,
        })
    }

    /// Inserts `key -> value`. `key` must be strictly greater than every
    /// previously inserted key.
    pub fn insert(&mut self, key: &[u8], value: &V) -> io::Result<()> {
        self.fst_builder
            .insert(key, self.num_terms)
            .map_err(fst_error_to_io)?;
        value.serialize(&mut self.values)?;
        self.num_terms += 1;
        Ok(())
    }

    pub fn finish(self) -> io::Result<Vec<u8>> {
        let fst_bytes = self.fst_builder.into_inner().map_err(fst_error_to_io)?;
        let mut buffer = Vec::new();
        VInt(self.num_terms).serialize(&mut buffer)?;
        buffer.write_all(&self.values)?;
        buffer.write_all(&fst_bytes)?;
        Ok(buffer)
    }
}

/// Read-only view over a serialized term dictionary.
#[derive(Clone)]
pub struct TermDictionary<V> {
    values: ReadOnlySource,
    value_offsets: Vec<usize>,
    fst_map: Map<ReadOnlySource>,
    _marker: PhantomData<V>,
}

impl<V: BinarySerializable> TermDictionary<V> {
    pub fn from_source(source: ReadOnlySource) -> io::Result<TermDictionary<V>> {
        let mut cursor = source.as_slice();
        let remaining_before = cursor.len();
        let num_terms = VInt::deserialize(&mut cursor)?.0 as usize;

        let mut value_offsets = Vec::with_capacity(num_terms + 1);
        let values_start = remaining_before - cursor.len();
        let mut offset = values_start;
        for _ in 0..num_terms {
            value_offsets.push(offset);
            V::deserialize(&mut cursor)?;
            offset = remaining_before - cursor.len();
        }
        value_offsets.push(offset);

        let fst_source = source.slice_from(offset);
        let fst_map = Map::new(fst_source).map_err(fst_error_to_io)?;
        Ok(TermDictionary {
            values: source,
            value_offsets,
            fst_map,
            _marker: PhantomData,
        })
    }

    pub fn num_terms(&self) -> usize {
        self.value_offsets.len().saturating_sub(1)
    }

    fn value_at_ordinal(&self, ord: u64) -> io::Result<V> {
        let idx = ord as usize;
        let start = self.value_offsets[idx];
        let stop = self.value_offsets[idx + 1];
        let mut cursor = self.values.slice(start, stop);
        V::deserialize(&mut cursor.as_slice())
    }

    pub fn get(&self, key: &[u8]) -> io::Result<Option<V>> {
        match self.fst_map.get(key) {
            Some(ord) => Ok(Some(self.value_at_ordinal(ord)?)),
            None => Ok(None),
        }
    }

    pub fn ord_for_key(&self, key: &[u8]) -> Option<u64> {
        self.fst_map.get(key)
    }

    pub fn value_for_ord(&self, ord: u64) -> io::Result<V> {
        self.value_at_ordinal(ord)
    }

    /// A cursor over every term, in ascending byte order, starting at
    /// `lower_bound` (inclusive) or at the very first term if `None`.
    pub fn range(&self, lower_bound: Option<&[u8]>) -> TermStreamer<'_, V> {
        let stream = match lower_bound {
            Some(bound) => self.fst_map.range().ge(bound).into_stream(),
            None => self.fst_map.stream(),
        };
        TermStreamer::new(stream, self)
    }

    /// A cursor that only visits terms `automaton` can still accept,
    /// intersecting it with the dictionary's FST rather than walking
    /// every term (§4.7 "Automata": `O(|dictionary ∩ DFA|)`). The
    /// automaton is responsible for scoping itself to a single field
    /// when the dictionary spans more than one, since the FST has no
    /// notion of fields of its own.
    pub fn search<A: Automaton>(&self, automaton: A) -> TermStreamer<'_, V, A> {
        let stream = self.fst_map.search(automaton).into_stream();
        TermStreamer::new(stream, self)
    }

    fn fetch(&self, ord: u64) -> V {
        self.value_at_ordinal(ord)
            .expect("term dictionary side array corrupted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termdict_roundtrip() {
        let mut builder = TermDictionaryBuilder::<u64>::new().unwrap();
        builder.insert(b"alpha", &1u64).unwrap();
        builder.insert(b"beta", &2u64).unwrap();
        builder.insert(b"gamma", &3u64).unwrap();
        let bytes = builder.finish().unwrap();

        let dict = TermDictionary::<u64>::from_source(ReadOnlySource::new(bytes)).unwrap();
        assert_eq!(dict.num_terms(), 3);
        assert_eq!(dict.get(b"beta").unwrap(), Some(2));
        assert_eq!(dict.get(b"delta").unwrap(), None);
    }

    #[test]
    fn test_termdict_range_cursor() {
        let mut builder = TermDictionaryBuilder::<u64>::new().unwrap();
        for (i, term) in ["a", "b", "c", "d"].iter().enumerate() {
            builder.insert(term.as_bytes(), &(i as u64)).unwrap();
        }
        let bytes = builder.finish().unwrap();
        let dict = TermDictionary::<u64>::from_source(ReadOnlySource::new(bytes)).unwrap();

        let mut seen = Vec::new();
        let mut cursor = dict.range(Some(b"b"));
        while let Some((key, value)) = cursor.next() {
            seen.push((key.to_vec(), value));
        }
        assert_eq!(
            seen,
            vec![(b"b".to_vec(), 1), (b"c".to_vec(), 2), (b"d".to_vec(), 3)]
        );
    }
}
