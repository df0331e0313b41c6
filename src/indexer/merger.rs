use std::collections::HashMap;
use std::convert::TryInto;
use std::io::Write as _;

use crate::common::CompositeWrite;
use crate::core::{Segment, SegmentReader, SerializableSegment};
use crate::indexer::SegmentSerializer;
use crate::postings::{
    IndexRecordOption, NothingRecorder, Recorder, SegmentPostings, TFAndPositionRecorder,
    TermFrequencyRecorder, TermInfo,
};
use crate::schema::{Field, FieldType, Schema};
use crate::DocId;
use crate::Result;

/// Union of the three `Recorder` impls, picked per merged term by the
/// owning field's `IndexRecordOption` (§4.1). Duplicates the dispatch
/// shape of `postings::postings_writer::TermPostingsWriter`, which is
/// private to `crate::postings` and so unreachable from here.
enum MergeRecorder {
    Nothing(NothingRecorder),
    Freq(TermFrequencyRecorder),
    FreqAndPosition(TFAndPositionRecorder),
}

impl MergeRecorder {
    fn for_record_option(record_option: IndexRecordOption) -> MergeRecorder {
        match record_option {
            IndexRecordOption::Basic => MergeRecorder::Nothing(NothingRecorder::default()),
            IndexRecordOption::WithFreqs => MergeRecorder::Freq(TermFrequencyRecorder::default()),
            IndexRecordOption::WithFreqsAndPositions => {
                MergeRecorder::FreqAndPosition(TFAndPositionRecorder::default())
            }
        }
    }
}

impl Default for MergeRecorder {
    fn default() -> MergeRecorder {
        MergeRecorder::Nothing(NothingRecorder::default())
    }
}

impl Recorder for MergeRecorder {
    fn new_doc(&mut self, doc: DocId) {
        match self {
            MergeRecorder::Nothing(r) => r.new_doc(doc),
            MergeRecorder::Freq(r) => r.new_doc(doc),
            MergeRecorder::FreqAndPosition(r) => r.new_doc(doc),
        }
    }

    fn record_position(&mut self, position: u32, offset_from: usize, offset_to: usize, payload: &[u8]) {
        match self {
            MergeRecorder::Nothing(r) => r.record_position(position, offset_from, offset_to, payload),
            MergeRecorder::Freq(r) => r.record_position(position, offset_from, offset_to, payload),
            MergeRecorder::FreqAndPosition(r) => r.record_position(position, offset_from, offset_to, payload),
        }
    }

    fn current_doc(&self) -> DocId {
        match self {
            MergeRecorder::Nothing(r) => r.current_doc(),
            MergeRecorder::Freq(r) => r.current_doc(),
            MergeRecorder::FreqAndPosition(r) => r.current_doc(),
        }
    }

    fn doc_freq(&self) -> u32 {
        match self {
            MergeRecorder::Nothing(r) => r.doc_freq(),
            MergeRecorder::Freq(r) => r.doc_freq(),
            MergeRecorder::FreqAndPosition(r) => r.doc_freq(),
        }
    }

    fn serialize(&self, field_length_codes: &[u8], postings_out: &mut Vec<u8>, positions_out: &mut Vec<u8>) -> (u32, u32) {
        match self {
            MergeRecorder::Nothing(r) => r.serialize(field_length_codes, postings_out, positions_out),
            MergeRecorder::Freq(r) => r.serialize(field_length_codes, postings_out, positions_out),
            MergeRecorder::FreqAndPosition(r) => r.serialize(field_length_codes, postings_out, positions_out),
        }
    }
}

/// Per segment (by position in `readers`), per old ordinal within that
/// segment's facet fast field: the ordinal the same term was assigned
/// in the merged segment's dictionary.
type FacetOrdRemap = HashMap<Field, Vec<HashMap<u64, u64>>>;

/// Merges several segments into one (§5 "Merging"): closes the gaps
/// left by deletions in the docid space, and rewrites every segment
/// component under that new, contiguous docid space. Grounded on the
/// teacher's own `IndexMerger`; simplified to a single in-memory pass
/// over already-decoded `SegmentPostings` rather than a streaming merge
/// over raw posting bytes, since this crate's `SegmentPostings` already
/// decodes eagerly (see `DESIGN.md`).
pub struct IndexMerger {
    schema: Schema,
    readers: Vec<SegmentReader>,
}

impl IndexMerger {
    pub fn open(schema: Schema, segments: &[Segment]) -> Result<IndexMerger> {
        log::info!("opening merger over {} segments", segments.len());
        let readers = segments
            .iter()
            .map(SegmentReader::open)
            .collect::<Result<Vec<_>>>()?;
        Ok(IndexMerger { schema, readers })
    }

    /// Per segment, per local docid: `Some(new_docid)` if the doc
    /// survives the merge (wasn't deleted), else `None`. `new_docid`s
    /// are assigned in segment order, then local-docid order within a
    /// segment -- every other merge step below walks in that same
    /// nested order so the two stay in lockstep.
    fn doc_id_mapping(&self) -> (Vec<Vec<Option<DocId>>>, DocId) {
        let mut mapping = Vec::with_capacity(self.readers.len());
        let mut next_doc_id: DocId = 0;
        for reader in &self.readers {
            let mut local = vec![None; reader.max_doc() as usize];
            for doc in 0..reader.max_doc() {
                if !reader.is_deleted(doc) {
                    local[doc as usize] = Some(next_doc_id);
                    next_doc_id += 1;
                }
            }
            mapping.push(local);
        }
        (mapping, next_doc_id)
    }

    fn write_store(
        &self,
        serializer: &mut SegmentSerializer,
        doc_id_mapping: &[Vec<Option<DocId>>],
    ) -> Result<()> {
        for (reader, mapping) in self.readers.iter().zip(doc_id_mapping) {
            let store_reader = reader.get_store_reader()?;
            for (local_doc, slot) in mapping.iter().enumerate() {
                if slot.is_some() {
                    let document = store_reader.get(local_doc as DocId)?;
                    serializer.get_store_writer().store(&document)?;
                }
            }
        }
        Ok(())
    }

    /// Computes, per indexed field, the merged segment's per-doc length
    /// codes directly from each contributing segment's already-
    /// quantized bytes, rather than re-deriving lengths through
    /// `FieldNormsWriter` (which would requantize an already-quantized
    /// value). Shared by `write_fieldnorms` (which flushes these bytes
    /// verbatim) and `write_postings` (which needs the same bytes to
    /// fill in each merged posting's length bucket).
    fn compute_fieldnorm_codes(
        &self,
        doc_id_mapping: &[Vec<Option<DocId>>],
        max_doc: DocId,
    ) -> HashMap<Field, Vec<u8>> {
        let mut codes = HashMap::new();
        for (field, field_entry) in self.schema.fields() {
            if !field_entry.is_indexed() {
                continue;
            }
            let mut bytes = vec![0u8; max_doc as usize];
            for (reader, mapping) in self.readers.iter().zip(doc_id_mapping) {
                if let Some(fieldnorm_reader) = reader.fieldnorm_reader(field) {
                    for (local_doc, slot) in mapping.iter().enumerate() {
                        if let Some(new_doc) = slot {
                            bytes[*new_doc as usize] = fieldnorm_reader.fieldnorm_id(local_doc as DocId);
                        }
                    }
                }
            }
            codes.insert(field, bytes);
        }
        codes
    }

    fn write_fieldnorms(
        &self,
        serializer: &mut SegmentSerializer,
        fieldnorm_codes: &HashMap<Field, Vec<u8>>,
    ) -> Result<()> {
        let write = serializer.get_fieldnorms_serializer();
        let mut composite_write = CompositeWrite::wrap(write);
        for (field, bytes) in fieldnorm_codes {
            composite_write.for_field(*field).write_all(bytes)?;
        }
        composite_write.close()?;
        Ok(())
    }

    fn write_fast_fields(
        &self,
        serializer: &mut SegmentSerializer,
        doc_id_mapping: &[Vec<Option<DocId>>],
        max_doc: DocId,
        facet_ord_remap: &FacetOrdRemap,
    ) -> Result<()> {
        let fast_field_serializer = serializer.get_fast_field_serializer();
        for (field, field_entry) in self.schema.fields() {
            match field_entry.field_type() {
                FieldType::HierarchicalFacet => {
                    let mut vals: Vec<u64> = Vec::new();
                    let mut doc_index: Vec<u64> = Vec::with_capacity(max_doc as usize + 1);
                    let remap_per_segment = facet_ord_remap.get(&field);
                    for (seg_idx, (reader, mapping)) in
                        self.readers.iter().zip(doc_id_mapping).enumerate()
                    {
                        let multi_reader = reader.multi_fast_field_reader(field);
                        for (local_doc, slot) in mapping.iter().enumerate() {
                            if slot.is_none() {
                                continue;
                            }
                            doc_index.push(vals.len() as u64);
                            if let Some(multi_reader) = &multi_reader {
                                for old_ord in multi_reader.get_vals(local_doc as DocId) {
                                    let new_ord = remap_per_segment
                                        .and_then(|segs| segs.get(seg_idx))
                                        .and_then(|m| m.get(&old_ord))
                                        .copied()
                                        .unwrap_or(old_ord);
                                    vals.push(new_ord);
                                }
                            }
                        }
                    }
                    doc_index.push(vals.len() as u64);
                    fast_field_serializer.write_column(field, 0, &vals)?;
                    fast_field_serializer.write_column(field, 1, &doc_index)?;
                }
                field_type if field_type.is_fast() => {
                    let mut vals = vec![0u64; max_doc as usize];
                    for (reader, mapping) in self.readers.iter().zip(doc_id_mapping) {
                        if let Some(column) = reader.fast_field_reader(field) {
                            for (local_doc, slot) in mapping.iter().enumerate() {
                                if let Some(new_doc) = slot {
                                    vals[*new_doc as usize] = column.get(local_doc as DocId);
                                }
                            }
                        }
                    }
                    fast_field_serializer.write_column(field, 0, &vals)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// K-way merges every contributing segment's whole-segment term
    /// dictionary by raw key bytes (already comparable across segments,
    /// since a `Term`'s field-id prefix plus value encoding is schema-
    /// determined, not segment-determined), replaying each surviving
    /// posting under the merged docid space. Returns the facet ordinal
    /// remap table `write_fast_fields` needs for the facet column.
    fn write_postings(
        &self,
        serializer: &mut SegmentSerializer,
        doc_id_mapping: &[Vec<Option<DocId>>],
        fieldnorm_codes: &HashMap<Field, Vec<u8>>,
    ) -> Result<FacetOrdRemap> {
        let num_segments = self.readers.len();
        let mut streamers: Vec<_> = self
            .readers
            .iter()
            .map(|reader| reader.term_dictionary().range(None))
            .collect();
        let mut heads: Vec<Option<(Vec<u8>, TermInfo)>> = streamers
            .iter_mut()
            .map(|streamer| streamer.next().map(|(key, value)| (key.to_vec(), value)))
            .collect();
        let mut old_ord_counters = vec![0u64; num_segments];
        let mut new_ord_counter: u64 = 0;
        let mut facet_ord_remap: FacetOrdRemap = HashMap::new();

        loop {
            let min_key = heads
                .iter()
                .filter_map(|head| head.as_ref().map(|(key, _)| key.clone()))
                .min();
            let min_key = match min_key {
                Some(key) => key,
                None => break,
            };

            let field = Field(u32::from_be_bytes(min_key[..4].try_into().unwrap()));
            let field_entry = self.schema.get_field_entry(field);
            let record_option = IndexRecordOption::for_field_type(field_entry.field_type());
            let is_facet = matches!(field_entry.field_type(), FieldType::HierarchicalFacet);

            let mut recorder = MergeRecorder::for_record_option(record_option);
            let mut contributing_facet_olds: Vec<(usize, u64)> = Vec::new();

            for seg_idx in 0..num_segments {
                let matches_min = heads[seg_idx]
                    .as_ref()
                    .map(|(key, _)| key == &min_key)
                    .unwrap_or(false);
                if !matches_min {
                    continue;
                }
                let (_, term_info) = heads[seg_idx].take().unwrap();
                let old_ord = old_ord_counters[seg_idx];
                old_ord_counters[seg_idx] += 1;
                if is_facet {
                    contributing_facet_olds.push((seg_idx, old_ord));
                }

                let mut postings = SegmentPostings::open(
                    &term_info,
                    record_option,
                    self.readers[seg_idx].postings_source(),
                    self.readers[seg_idx].positions_source(),
                )?;
                let mapping = &doc_id_mapping[seg_idx];
                while postings.advance() {
                    if let Some(new_doc) = mapping[postings.doc() as usize] {
                        recorder.new_doc(new_doc);
                        let positions = postings.positions();
                        for i in 0..postings.term_freq() as usize {
                            let position = positions.get(i).copied().unwrap_or(0);
                            let (offset_from, offset_to) =
                                postings.chars().get(i).copied().unwrap_or((0, 0));
                            recorder.record_position(
                                position,
                                offset_from as usize,
                                offset_to as usize,
                                postings.payload(i),
                            );
                        }
                    }
                }

                heads[seg_idx] = streamers[seg_idx]
                    .next()
                    .map(|(key, value)| (key.to_vec(), value));
            }

            if recorder.doc_freq() > 0 {
                let field_length_codes = fieldnorm_codes.get(&field).map(Vec::as_slice).unwrap_or(&[]);
                serializer
                    .get_postings_serializer()
                    .write_term_from_recorder(&min_key, &recorder, field_length_codes)?;
                let new_ord = new_ord_counter;
                new_ord_counter += 1;
                if is_facet {
                    let entry = facet_ord_remap
                        .entry(field)
                        .or_insert_with(|| (0..num_segments).map(|_| HashMap::new()).collect());
                    for (seg_idx, old_ord) in contributing_facet_olds {
                        entry[seg_idx].insert(old_ord, new_ord);
                    }
                }
            }
        }

        Ok(facet_ord_remap)
    }
}

impl SerializableSegment for IndexMerger {
    fn write(&self, mut serializer: SegmentSerializer) -> Result<u32> {
        let (doc_id_mapping, max_doc) = self.doc_id_mapping();
        let fieldnorm_codes = self.compute_fieldnorm_codes(&doc_id_mapping, max_doc);
        let facet_ord_remap =
            self.write_postings(&mut serializer, &doc_id_mapping, &fieldnorm_codes)?;
        self.write_fast_fields(&mut serializer, &doc_id_mapping, max_doc, &facet_ord_remap)?;
        self.write_fieldnorms(&mut serializer, &fieldnorm_codes)?;
        self.write_store(&mut serializer, &doc_id_mapping)?;
        serializer.close()?;
        log::info!("merged {} segments into one of {} docs", self.readers.len(), max_doc);
        Ok(max_doc)
    }
}
