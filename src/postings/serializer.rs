use std::io::Write;

use crate::directory::WritePtr;
use crate::postings::postings_writer::TermPostingsWriter;
use crate::postings::recorder::Recorder;
use crate::postings::term_info::TermInfo;
use crate::termdict::TermDictionaryBuilder;
use crate::Result;

/// Writes the three files a segment's postings live in: `TERMS` (one
/// whole-segment term dictionary, §4.2), `POSTINGS` (docid/frequency
/// blocks) and `POSITIONS` (per-doc position lists, only populated for
/// fields that index them). Terms must be handed to `write_term` in
/// ascending byte order.
pub struct PostingsSerializer {
    term_dictionary_builder: TermDictionaryBuilder<TermInfo>,
    postings_buffer: Vec<u8>,
    positions_buffer: Vec<u8>,
    terms_write: WritePtr,
    postings_write: WritePtr,
    positions_write: WritePtr,
}

impl PostingsSerializer {
    pub fn new(
        terms_write: WritePtr,
        postings_write: WritePtr,
        positions_write: WritePtr,
    ) -> Result<PostingsSerializer> {
        Ok(PostingsSerializer {
            term_dictionary_builder: TermDictionaryBuilder::new()?,
            postings_buffer: Vec::new(),
            positions_buffer: Vec::new(),
            terms_write,
            postings_write,
            positions_write,
        })
    }

    pub(crate) fn write_term(
        &mut self,
        key: &[u8],
        recorder: &TermPostingsWriter,
        field_length_codes: &[u8],
    ) -> Result<TermInfo> {
        let postings_offset = self.postings_buffer.len() as u64;
        let positions_offset = self.positions_buffer.len() as u64;
        let (postings_len, positions_len) =
            recorder.serialize(field_length_codes, &mut self.postings_buffer, &mut self.positions_buffer);
        let term_info = TermInfo {
            doc_freq: recorder.doc_freq(),
            postings_offset,
            postings_len,
            positions_offset,
            positions_len,
        };
        self.term_dictionary_builder.insert(key, &term_info)?;
        Ok(term_info)
    }

    /// Same contract as `write_term`, but generic over any `Recorder`
    /// rather than the module-private `TermPostingsWriter` dispatch enum.
    /// This is the seam the segment merger writes through: it builds a
    /// fresh recorder per merged term (replaying surviving postings from
    /// every contributing segment under the merged docid space) without
    /// needing access to `crate::postings`' internals.
    pub fn write_term_from_recorder<R: Recorder>(
        &mut self,
        key: &[u8],
        recorder: &R,
        field_length_codes: &[u8],
    ) -> Result<TermInfo> {
        let postings_offset = self.postings_buffer.len() as u64;
        let positions_offset = self.positions_buffer.len() as u64;
        let (postings_len, positions_len) =
            recorder.serialize(field_length_codes, &mut self.postings_buffer, &mut self.positions_buffer);
        let term_info = TermInfo {
            doc_freq: recorder.doc_freq(),
            postings_offset,
            postings_len,
            positions_offset,
            positions_len,
        };
        self.term_dictionary_builder.insert(key, &term_info)?;
        Ok(term_info)
    }

    pub fn close(mut self) -> Result<()> {
        let terms_bytes = self.term_dictionary_builder.finish()?;
        self.terms_write.write_all(&terms_bytes)?;
        self.terms_write.terminate()?;
        self.postings_write.write_all(&self.postings_buffer)?;
        self.postings_write.terminate()?;
        self.positions_write.write_all(&self.positions_buffer)?;
        self.positions_write.terminate()?;
        Ok(())
    }
}
