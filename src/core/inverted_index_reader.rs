use tantivy_fst::Automaton;

use crate::core::SegmentReader;
use crate::postings::{IndexRecordOption, SegmentPostings, TermInfo};
use crate::schema::Term;
use crate::termdict::TermStreamer;
use crate::Result;

/// The read side of one field's posting data (§4.6 "Reader contract"):
/// `term_info` and `read_postings` both go through the segment's single
/// whole-segment term dictionary, filtering by this field's id prefix.
pub struct InvertedIndexReader<'a> {
    segment_reader: &'a SegmentReader,
    record_option: IndexRecordOption,
}

impl<'a> InvertedIndexReader<'a> {
    pub fn new(segment_reader: &'a SegmentReader, record_option: IndexRecordOption) -> InvertedIndexReader<'a> {
        InvertedIndexReader {
            segment_reader,
            record_option,
        }
    }

    pub fn term_info(&self, term: &Term) -> Result<Option<TermInfo>> {
        Ok(self.segment_reader.term_dictionary().get(term.as_slice())?)
    }

    /// A cursor over every term for `term`'s field whose bytes are `>=
    /// term`, used by prefix/range/fuzzy queries to enumerate candidate
    /// terms without materializing the whole dictionary.
    pub fn terms_ge(&self, term: &Term) -> TermStreamer<'_, TermInfo> {
        self.segment_reader.term_dictionary().range(Some(term.as_slice()))
    }

    /// A cursor over only the terms `automaton` can still accept,
    /// anywhere in the segment's shared dictionary -- used by
    /// `FuzzyTermQuery` to seek via DFA/FST intersection instead of
    /// scanning a field's whole dictionary slice.
    pub fn terms_matching<A: Automaton>(&self, automaton: A) -> TermStreamer<'_, TermInfo, A> {
        self.segment_reader.term_dictionary().search(automaton)
    }

    /// Opens a `SegmentPostings` over `term`'s posting list, or `None` if
    /// the term is absent from this segment.
    pub fn read_postings(&self, term: &Term) -> Result<Option<SegmentPostings>> {
        match self.term_info(term)? {
            Some(term_info) => {
                let postings = SegmentPostings::open(
                    &term_info,
                    self.record_option,
                    self.segment_reader.postings_source(),
                    self.segment_reader.positions_source(),
                )?;
                Ok(Some(postings))
            }
            None => Ok(None),
        }
    }
}
