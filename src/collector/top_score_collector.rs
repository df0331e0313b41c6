use crate::collector::top_collector::{TopCollector, TopSegmentCollector};
use crate::collector::{Collector, SegmentCollector};
use crate::core::{DocAddress, SegmentLocalId, SegmentReader};
use crate::schema::Field;
use crate::DocId;
use crate::Result;
use crate::Score;
use crate::TantivyError;

/// Ranks matches by relevance score and keeps the top `limit` (§4.5
/// "top_K(n)"). The base collector every example in this crate's docs
/// builds on.
///
/// ```
/// use vellum::collector::TopDocs;
/// use vellum::query::TermQuery;
/// use vellum::schema::{Schema, TEXT};
/// use vellum::{doc, Index, Term};
///
/// # fn main() -> vellum::Result<()> {
/// let mut schema_builder = Schema::builder();
/// let title = schema_builder.add_text_field("title", TEXT);
/// let schema = schema_builder.build();
/// let index = Index::create_in_ram(schema);
/// let mut writer = index.writer_with_num_threads(1, 3_000_000)?;
/// writer.add_document(doc!(title => "the name of the wind"))?;
/// writer.add_document(doc!(title => "a diary of muadib"))?;
/// writer.commit()?;
///
/// let reader = index.reader()?;
/// let searcher = reader.searcher();
/// let query = TermQuery::new(Term::from_field_text(title, "diary"));
/// let top_docs = searcher.search(&query, &TopDocs::with_limit(2))?;
/// assert_eq!(top_docs.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct TopDocs(TopCollector<Score>);

impl TopDocs {
    /// Builds a top-K collector. Panics if `limit` is zero.
    pub fn with_limit(limit: usize) -> TopDocs {
        TopDocs(TopCollector::with_limit(limit))
    }

    /// Switches ranking from relevance score to a stored fast field's
    /// raw value (§4.5 "sort_by(facet)"). Numeric fields are ranked by
    /// their order-preserving `u64` encoding directly -- ascending for
    /// unsigned fields, and still correctly ordered (just not directly
    /// meaningful as a signed/float value without decoding) for signed
    /// and float fields, since `i64_to_sortable_u64`/`f64_to_sortable_u64`
    /// are themselves order-preserving.
    pub fn order_by_field(self, field: Field) -> TopDocsByField {
        TopDocsByField {
            field,
            collector: TopCollector::with_limit(self.0.limit()),
        }
    }
}

/// `TopDocs`'s per-segment accumulator.
pub struct TopScoreSegmentCollector(TopSegmentCollector<Score>);

impl SegmentCollector for TopScoreSegmentCollector {
    type Fruit = Vec<(Score, DocAddress)>;

    fn collect(&mut self, doc: DocId, score: Score) {
        self.0.collect_feature(doc, score);
    }

    fn current_threshold(&self) -> Option<Score> {
        self.0.current_threshold()
    }

    fn harvest(self) -> Vec<(Score, DocAddress)> {
        self.0.harvest_ranked()
    }
}

impl Collector for TopDocs {
    type Fruit = Vec<(Score, DocAddress)>;
    type Child = TopScoreSegmentCollector;

    fn for_segment(&self, segment_local_id: SegmentLocalId, _reader: &SegmentReader) -> Result<Self::Child> {
        Ok(TopScoreSegmentCollector(self.0.for_segment(segment_local_id)?))
    }

    fn requires_scoring(&self) -> bool {
        true
    }

    fn merge_fruits(&self, segment_fruits: Vec<Vec<(Score, DocAddress)>>) -> Result<Vec<(Score, DocAddress)>> {
        self.0.merge_fruits(segment_fruits)
    }
}

/// Top-K ranked by a stored fast field instead of relevance score
/// (§4.5 "sort_by(facet)"), built via `TopDocs::order_by_field`.
pub struct TopDocsByField {
    field: Field,
    collector: TopCollector<u64>,
}

impl TopDocsByField {
    pub fn new(field: Field, limit: usize) -> TopDocsByField {
        TopDocsByField {
            field,
            collector: TopCollector::with_limit(limit),
        }
    }
}

/// `TopDocsByField`'s per-segment accumulator: reads the fast field
/// directly rather than going through `Scorer::score`, so this
/// collector never needs scoring at all.
pub struct TopFieldSegmentCollector {
    reader: crate::fastfield::FastFieldReader,
    inner: TopSegmentCollector<u64>,
}

impl SegmentCollector for TopFieldSegmentCollector {
    type Fruit = Vec<(u64, DocAddress)>;

    fn collect(&mut self, doc: DocId, _score: Score) {
        self.inner.collect_feature(doc, self.reader.get(doc));
    }

    fn harvest(self) -> Vec<(u64, DocAddress)> {
        self.inner.harvest_ranked()
    }
}

impl Collector for TopDocsByField {
    type Fruit = Vec<(u64, DocAddress)>;
    type Child = TopFieldSegmentCollector;

    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<Self::Child> {
        let fast_field_reader = reader.fast_field_reader(self.field).ok_or_else(|| {
            TantivyError::SchemaError(format!(
                "field {:?} is not a single-valued fast field",
                self.field
            ))
        })?;
        Ok(TopFieldSegmentCollector {
            reader: fast_field_reader,
            inner: self.collector.for_segment(segment_local_id)?,
        })
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn merge_fruits(&self, segment_fruits: Vec<Vec<(u64, DocAddress)>>) -> Result<Vec<(u64, DocAddress)>> {
        self.collector.merge_fruits(segment_fruits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TermQuery;
    use crate::schema::{Schema, Term, FAST, TEXT};
    use crate::Index;

    #[test]
    fn test_top_docs_by_field_orders_by_fast_field() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let size = builder.add_u64_field("size", FAST);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for (text, value) in &[("bottle of beer", 12u64), ("growler of beer", 64), ("pint of beer", 16)] {
            let mut doc = crate::schema::Document::default();
            doc.add_text(title, text);
            doc.add(size, *value);
            writer.add_document(doc).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = TermQuery::new(Term::from_field_text(title, "beer"));
        let top_docs = searcher.search(&query, &TopDocs::with_limit(4).order_by_field(size)).unwrap();
        assert_eq!(
            top_docs,
            vec![(64, DocAddress(0, 1)), (16, DocAddress(0, 2)), (12, DocAddress(0, 0))]
        );
    }

    #[test]
    fn test_top_docs_by_field_rejects_non_fast_field() {
        let mut builder = Schema::builder();
        let size = builder.add_u64_field("size", crate::schema::INDEXED);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        let mut doc = crate::schema::Document::default();
        doc.add(size, 1u64);
        writer.add_document(doc).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let collector = TopDocs::with_limit(4).order_by_field(size);
        assert!(collector.for_segment(0, searcher.segment_reader(0)).is_err());
    }
}
