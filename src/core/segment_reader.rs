use std::sync::Arc;

use crate::common::{BinarySerializable, BitSet, CompositeFile, VInt};
use crate::core::{Segment, SegmentComponent, SegmentId};
use crate::fastfield::{FastFieldReader, FastFieldsReader, MultiValueFastFieldReader};
use crate::fieldnorm::FieldNormReader;
use crate::postings::TermInfo;
use crate::schema::{Field, Schema};
use crate::store::StoreReader;
use crate::termdict::TermDictionary;
use crate::DocId;
use crate::Result;

/// One segment opened for reading: the whole-segment term dictionary
/// plus the composed set of per-component readers a matcher, collector
/// or document-retrieval call needs (§4.6 "Reader contract").
#[derive(Clone)]
pub struct SegmentReader {
    segment_id: SegmentId,
    max_doc: DocId,
    schema: Schema,
    term_dictionary: Arc<TermDictionary<TermInfo>>,
    postings_source: crate::directory::ReadOnlySource,
    positions_source: crate::directory::ReadOnlySource,
    fast_fields_reader: Arc<FastFieldsReader>,
    fieldnorms_composite: Arc<CompositeFile>,
    store_source: crate::directory::ReadOnlySource,
    delete_bitset: Option<Arc<BitSet>>,
}

impl SegmentReader {
    pub fn open(segment: &Segment) -> Result<SegmentReader> {
        let schema = segment.schema();
        let meta = segment.meta().clone();

        let terms_source = segment.open_read(SegmentComponent::TERMS)?;
        let term_dictionary = TermDictionary::from_source(terms_source)?;

        let postings_source = segment.open_read(SegmentComponent::POSTINGS)?;
        let positions_source = segment.open_read(SegmentComponent::POSITIONS)?;

        let fastfields_source = segment.open_read(SegmentComponent::FASTFIELDS)?;
        let fast_fields_reader = FastFieldsReader::open(fastfields_source)?;

        let fieldnorms_source = segment.open_read(SegmentComponent::FIELDNORMS)?;
        let fieldnorms_composite = CompositeFile::open(&fieldnorms_source)?;

        let store_source = segment.open_read(SegmentComponent::STORE)?;

        let delete_bitset = if meta.has_deletes() {
            let delete_source = segment.open_read(SegmentComponent::DELETE)?;
            Some(Arc::new(read_delete_bitset(&delete_source, meta.max_doc())?))
        } else {
            None
        };

        Ok(SegmentReader {
            segment_id: meta.id(),
            max_doc: meta.max_doc(),
            schema,
            term_dictionary: Arc::new(term_dictionary),
            postings_source,
            positions_source,
            fast_fields_reader: Arc::new(fast_fields_reader),
            fieldnorms_composite: Arc::new(fieldnorms_composite),
            store_source,
            delete_bitset,
        })
    }

    pub fn segment_id(&self) -> SegmentId {
        self.segment_id
    }

    /// Doc count including deleted documents; every local docid in
    /// `0..max_doc` is a valid address even if `is_deleted` for it.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    pub fn num_docs(&self) -> DocId {
        self.max_doc - self.delete_bitset.as_ref().map(|b| b.len() as u32).unwrap_or(0)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn is_deleted(&self, doc: DocId) -> bool {
        self.delete_bitset
            .as_ref()
            .map(|bitset| bitset.contains(doc))
            .unwrap_or(false)
    }

    pub fn has_deletes(&self) -> bool {
        self.delete_bitset.is_some()
    }

    pub fn term_dictionary(&self) -> &TermDictionary<TermInfo> {
        &self.term_dictionary
    }

    /// The posting-read side of `field`, with the record option implied
    /// by its schema entry (§4.6 "Reader contract").
    pub fn inverted_index(&self, field: Field) -> crate::core::InvertedIndexReader<'_> {
        let record_option =
            crate::postings::IndexRecordOption::for_field_type(self.schema.get_field_entry(field).field_type());
        crate::core::InvertedIndexReader::new(self, record_option)
    }

    pub fn postings_source(&self) -> &crate::directory::ReadOnlySource {
        &self.postings_source
    }

    pub fn positions_source(&self) -> &crate::directory::ReadOnlySource {
        &self.positions_source
    }

    /// The field-length code reader for `field`, if it carries field
    /// norms (i.e. it is indexed).
    pub fn fieldnorm_reader(&self, field: Field) -> Option<FieldNormReader> {
        let source = self.fieldnorms_composite.open_read(field)?;
        Some(FieldNormReader::open(source))
    }

    pub fn fast_field_reader(&self, field: Field) -> Option<FastFieldReader> {
        self.fast_fields_reader.u64_reader(field)
    }

    pub fn multi_fast_field_reader(&self, field: Field) -> Option<MultiValueFastFieldReader> {
        self.fast_fields_reader.multi_value_reader(field)
    }

    pub fn get_store_reader(&self) -> Result<StoreReader> {
        StoreReader::open(self.store_source.clone())
    }
}

/// The `DELETE` side file is a flat, sorted list of `VInt`-encoded
/// deleted local docids (§4.2 "Deletion representation"); rewritten
/// whole on each delete transaction rather than appended to, since the
/// whole point is that segment files otherwise never change.
pub(crate) fn read_delete_bitset(
    source: &crate::directory::ReadOnlySource,
    max_doc: DocId,
) -> Result<BitSet> {
    let mut bitset = BitSet::with_max_value(max_doc.max(1));
    let mut cursor = source.as_slice();
    while !cursor.is_empty() {
        let doc = VInt::deserialize(&mut cursor)?.0 as DocId;
        bitset.insert(doc);
    }
    Ok(bitset)
}

pub(crate) fn write_delete_bitset(bitset: &BitSet) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    for doc in bitset.iter() {
        VInt(u64::from(doc)).serialize(&mut buffer)?;
    }
    Ok(buffer)
}
