use tantivy_fst::automaton::AlwaysMatch;
use tantivy_fst::map::Stream;
use tantivy_fst::{Automaton, Streamer};

use crate::common::BinarySerializable;
use crate::termdict::TermDictionary;

/// A `term_cursor(field)` (§4.2): walks the dictionary's sorted term
/// bytes from wherever it was opened, decoding each term's side value
/// lazily as the caller asks for it. Generic over the FST automaton
/// driving the walk -- plain range cursors (`TermDictionary::range`)
/// use the default `AlwaysMatch` (visit everything in the bound), while
/// `TermDictionary::search` drives it with a real `Automaton` so only
/// the dictionary paths the automaton can still accept are visited
/// (§4.7 "Automata": `O(|dictionary ∩ DFA|)`, not a full scan).
pub struct TermStreamer<'a, V: BinarySerializable, A: Automaton = AlwaysMatch> {
    stream: Stream<'a, A>,
    dict: &'a TermDictionary<V>,
    current_key: Vec<u8>,
    current_value: Option<V>,
    current_ord: u64,
}

impl<'a, V: BinarySerializable, A: Automaton> TermStreamer<'a, V, A> {
    pub(crate) fn new(stream: Stream<'a, A>, dict: &'a TermDictionary<V>) -> TermStreamer<'a, V, A> {
        TermStreamer {
            stream,
            dict,
            current_key: Vec::new(),
            current_value: None,
            current_ord: 0,
        }
    }

    /// Advances to the next term, returning `(term_bytes, value)`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&[u8], V)>
    where
        V: Clone,
    {
        match self.stream.next() {
            Some((key, ord)) => {
                self.current_key.clear();
                self.current_key.extend_from_slice(key);
                self.current_ord = ord;
                let value = self.dict.fetch(ord);
                self.current_value = Some(value.clone());
                Some((&self.current_key[..], value))
            }
            None => {
                self.current_value = None;
                None
            }
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.current_key
    }

    /// This term's ordinal in the whole-segment dictionary -- the same
    /// ordinal a multi-valued (facet) fast field column stores per doc
    /// (§4.6; used by `collector::FacetCollector` to map a doc's facet
    /// ordinals back to facet paths).
    pub fn term_ord(&self) -> u64 {
        self.current_ord
    }
}
