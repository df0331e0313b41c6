use std::collections::HashMap;

use crate::fieldnorm::{fieldnorm_to_id, FieldNormsWriter};
use crate::postings::recorder::{NothingRecorder, Recorder, TFAndPositionRecorder, TermFrequencyRecorder};
use crate::postings::serializer::PostingsSerializer;
use crate::postings::term_info::IndexRecordOption;
use crate::schema::{Field, Schema, Term};
use crate::tokenizer::TokenStream;
use crate::DocId;
use crate::Result;

/// Estimated bytes held by one slot of the per-field term hash table
/// (a term's small inline key plus one `Recorder`'s bookkeeping
/// overhead). Used only to size the initial table so indexing doesn't
/// thrash reallocating it; it does not bound actual memory use, which
/// is dominated by the term text and posting buffers themselves.
const BYTES_PER_TABLE_SLOT: usize = 16;

/// Computes the number of bytes a term hash table sized `2^num_bits`
/// slots is expected to occupy.
pub fn compute_table_size(num_bits: usize) -> usize {
    (1usize << num_bits) * BYTES_PER_TABLE_SLOT
}

pub(super) enum TermPostingsWriter {
    Basic(NothingRecorder),
    Freq(TermFrequencyRecorder),
    FreqAndPosition(TFAndPositionRecorder),
}

impl TermPostingsWriter {
    fn new(option: IndexRecordOption) -> TermPostingsWriter {
        match option {
            IndexRecordOption::Basic => TermPostingsWriter::Basic(NothingRecorder::default()),
            IndexRecordOption::WithFreqs => TermPostingsWriter::Freq(TermFrequencyRecorder::default()),
            IndexRecordOption::WithFreqsAndPositions => {
                TermPostingsWriter::FreqAndPosition(TFAndPositionRecorder::default())
            }
        }
    }

    fn current_doc(&self) -> DocId {
        match self {
            TermPostingsWriter::Basic(r) => r.current_doc(),
            TermPostingsWriter::Freq(r) => r.current_doc(),
            TermPostingsWriter::FreqAndPosition(r) => r.current_doc(),
        }
    }

    fn new_doc(&mut self, doc: DocId) {
        match self {
            TermPostingsWriter::Basic(r) => r.new_doc(doc),
            TermPostingsWriter::Freq(r) => r.new_doc(doc),
            TermPostingsWriter::FreqAndPosition(r) => r.new_doc(doc),
        }
    }

    fn record_position(&mut self, position: u32, offset_from: usize, offset_to: usize, payload: &[u8]) {
        match self {
            TermPostingsWriter::Basic(r) => r.record_position(position, offset_from, offset_to, payload),
            TermPostingsWriter::Freq(r) => r.record_position(position, offset_from, offset_to, payload),
            TermPostingsWriter::FreqAndPosition(r) => r.record_position(position, offset_from, offset_to, payload),
        }
    }

    fn doc_freq(&self) -> u32 {
        match self {
            TermPostingsWriter::Basic(r) => r.doc_freq(),
            TermPostingsWriter::Freq(r) => r.doc_freq(),
            TermPostingsWriter::FreqAndPosition(r) => r.doc_freq(),
        }
    }

    pub(super) fn serialize(
        &self,
        field_length_codes: &[u8],
        postings_out: &mut Vec<u8>,
        positions_out: &mut Vec<u8>,
    ) -> (u32, u32) {
        match self {
            TermPostingsWriter::Basic(r) => r.serialize(field_length_codes, postings_out, positions_out),
            TermPostingsWriter::Freq(r) => r.serialize(field_length_codes, postings_out, positions_out),
            TermPostingsWriter::FreqAndPosition(r) => r.serialize(field_length_codes, postings_out, positions_out),
        }
    }
}

struct FieldPostingsWriter {
    record_option: IndexRecordOption,
    term_index: HashMap<Vec<u8>, usize>,
    recorders: Vec<TermPostingsWriter>,
}

impl FieldPostingsWriter {
    fn new(record_option: IndexRecordOption) -> FieldPostingsWriter {
        FieldPostingsWriter {
            record_option,
            term_index: HashMap::new(),
            recorders: Vec::new(),
        }
    }

    fn get_or_create(&mut self, value_bytes: &[u8]) -> usize {
        if let Some(&idx) = self.term_index.get(value_bytes) {
            return idx;
        }
        let idx = self.recorders.len();
        self.recorders.push(TermPostingsWriter::new(self.record_option));
        self.term_index.insert(value_bytes.to_vec(), idx);
        idx
    }

    fn mem_usage(&self) -> usize {
        self.term_index.keys().map(|k| k.len() + 48).sum()
    }
}

/// Accumulates every field's in-memory postings for one segment being
/// built, keyed by field then by term value bytes. `subscribe` records
/// a bare term occurrence (numeric and facet fields); `index_text` runs
/// a tokenizer's output through the same bookkeeping. `serialize`
/// drains every field's terms into one sorted, whole-segment term
/// dictionary (§4.2) plus the `POSTINGS`/`POSITIONS` flat files.
pub struct MultiFieldPostingsWriter {
    per_field: Vec<FieldPostingsWriter>,
}

/// Maps a field's `UnorderedTermId` values (the insertion-order index
/// `subscribe` handed back for a facet term) to the term's final
/// ordinal in the sorted, whole-segment term dictionary. The facet fast
/// field is rewritten through this map as a last step of serialization.
pub type TermOrdinal = u64;

impl MultiFieldPostingsWriter {
    pub fn new(schema: &Schema, _table_num_bits: usize) -> MultiFieldPostingsWriter {
        let per_field = schema
            .fields()
            .map(|(_, entry)| FieldPostingsWriter::new(IndexRecordOption::for_field_type(entry.field_type())))
            .collect();
        MultiFieldPostingsWriter { per_field }
    }

    pub fn mem_usage(&self) -> usize {
        self.per_field.iter().map(FieldPostingsWriter::mem_usage).sum()
    }

    /// Records a bare occurrence of `term` in `doc`, returning the
    /// term's unordered (insertion-order) id within its field.
    pub fn subscribe(&mut self, doc: DocId, term: &Term) -> TermOrdinal {
        let field_writer = &mut self.per_field[term.field().field_id() as usize];
        let idx = field_writer.get_or_create(term.value_bytes());
        let recorder = &mut field_writer.recorders[idx];
        if recorder.doc_freq() == 0 || recorder.current_doc() != doc {
            recorder.new_doc(doc);
        }
        idx as TermOrdinal
    }

    /// Tokenizes `token_stream` and records each token's occurrence
    /// against `field` in `doc`. Returns the number of tokens seen
    /// (used as the field's length for field-norm purposes).
    pub fn index_text(
        &mut self,
        doc: DocId,
        field: Field,
        token_stream: &mut dyn TokenStream,
    ) -> u32 {
        let field_writer = &mut self.per_field[field.field_id() as usize];
        token_stream.process(&mut |token| {
            let idx = field_writer.get_or_create(token.text.as_bytes());
            let recorder = &mut field_writer.recorders[idx];
            if recorder.doc_freq() == 0 || recorder.current_doc() != doc {
                recorder.new_doc(doc);
            }
            recorder.record_position(token.position as u32, token.offset_from, token.offset_to, &token.payload);
        })
    }

    /// Drains all recorded terms into the segment's term dictionary and
    /// postings/positions files, in ascending `Term` byte order. Each
    /// term's per-doc length byte is looked up from `fieldnorms`
    /// (quantized fresh from its raw per-(field, doc) lengths), rather
    /// than tracked a second time during recording. Returns, for each
    /// field, the unordered-id -> final-ordinal mapping (used to
    /// rewrite facet fast-field values).
    pub fn serialize(
        &self,
        fieldnorms: &FieldNormsWriter,
        serializer: &mut PostingsSerializer,
    ) -> Result<HashMap<Field, Vec<TermOrdinal>>> {
        let mut entries: Vec<(Vec<u8>, &FieldPostingsWriter, usize)> = Vec::new();
        for (field_id, field_writer) in self.per_field.iter().enumerate() {
            for (value_bytes, &idx) in &field_writer.term_index {
                let mut key = Vec::with_capacity(4 + value_bytes.len());
                key.extend_from_slice(&(field_id as u32).to_be_bytes());
                key.extend_from_slice(value_bytes);
                entries.push((key, field_writer, idx));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut term_ord_maps: HashMap<Field, Vec<TermOrdinal>> = HashMap::new();
        for (field_id, field_writer) in self.per_field.iter().enumerate() {
            term_ord_maps.insert(Field(field_id as u32), vec![0; field_writer.recorders.len()]);
        }

        let length_codes_by_field: Vec<Vec<u8>> = (0..self.per_field.len())
            .map(|field_id| {
                fieldnorms
                    .field_lengths(Field(field_id as u32))
                    .iter()
                    .map(|&len| fieldnorm_to_id(len))
                    .collect()
            })
            .collect();

        for (ordinal, (key, field_writer, idx)) in entries.iter().enumerate() {
            let recorder = &field_writer.recorders[*idx];
            let field_id = u32::from_be_bytes(key[..4].try_into().expect("4-byte field prefix"));
            let field_length_codes = &length_codes_by_field[field_id as usize];
            let term_info = serializer.write_term(key, recorder, field_length_codes)?;
            let _ = term_info;
            term_ord_maps
                .get_mut(&Field(field_id))
                .expect("every field has an entry")[*idx] = ordinal as TermOrdinal;
        }
        Ok(term_ord_maps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_table_size_matches_expected_scale() {
        assert_eq!(compute_table_size(11), 2048 * 16);
        assert!(compute_table_size(12) > compute_table_size(11));
    }
}
