use crate::collector::{Collector, SegmentCollector};
use crate::core::{SegmentLocalId, SegmentReader};
use crate::query::Scorer;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Restricts an inner collector to docs a predicate accepts (§4.5
/// "filter(include?, exclude?)"). The predicate is built once per
/// segment (`predicate_factory`) so it can close over whatever
/// per-segment state it needs -- typically a `DocIdSet` built from a
/// separate filter `Query`'s matches, or a fast-field-backed check.
pub struct FilterCollector<C, P> {
    collector: C,
    predicate_factory: P,
}

impl<C, P, F> FilterCollector<C, P>
where
    C: Collector,
    P: Fn(&SegmentReader) -> F + Sync,
    F: Fn(DocId) -> bool + 'static,
{
    pub fn new(collector: C, predicate_factory: P) -> FilterCollector<C, P> {
        FilterCollector {
            collector,
            predicate_factory,
        }
    }
}

impl<C, P, F> Collector for FilterCollector<C, P>
where
    C: Collector,
    P: Fn(&SegmentReader) -> F + Sync,
    F: Fn(DocId) -> bool + 'static,
{
    type Fruit = C::Fruit;
    type Child = FilterSegmentCollector<C::Child, F>;

    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<Self::Child> {
        Ok(FilterSegmentCollector {
            inner: self.collector.for_segment(segment_local_id, reader)?,
            predicate: (self.predicate_factory)(reader),
        })
    }

    fn requires_scoring(&self) -> bool {
        self.collector.requires_scoring()
    }

    fn merge_fruits(&self, segment_fruits: Vec<C::Fruit>) -> Result<C::Fruit> {
        self.collector.merge_fruits(segment_fruits)
    }
}

pub struct FilterSegmentCollector<SC, F> {
    inner: SC,
    predicate: F,
}

impl<SC, F> SegmentCollector for FilterSegmentCollector<SC, F>
where
    SC: SegmentCollector,
    F: Fn(DocId) -> bool + 'static,
{
    type Fruit = SC::Fruit;

    fn collect(&mut self, doc: DocId, score: Score) {
        if (self.predicate)(doc) {
            self.inner.collect(doc, score);
        }
    }

    fn collect_scored(&mut self, doc: DocId, score: Score, scorer: &mut dyn Scorer) {
        if (self.predicate)(doc) {
            self.inner.collect_scored(doc, score, scorer);
        }
    }

    /// The predicate only ever narrows which docs the inner collector
    /// sees, never changes their score, so the inner collector's own
    /// threshold is still a sound bound to skip by.
    fn current_threshold(&self) -> Option<Score> {
        self.inner.current_threshold()
    }

    fn harvest(self) -> SC::Fruit {
        self.inner.harvest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Count;
    use crate::query::AllQuery;
    use crate::schema::{Schema, FAST};
    use crate::Index;

    #[test]
    fn test_filter_collector_restricts_by_fast_field() {
        let mut builder = Schema::builder();
        let even = builder.add_u64_field("even", FAST);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for value in 0u64..6 {
            let mut doc = crate::schema::Document::default();
            doc.add(even, value % 2);
            writer.add_document(doc).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let collector = FilterCollector::new(Count, |segment_reader: &SegmentReader| {
            let column = segment_reader.fast_field_reader(even).unwrap();
            move |doc: DocId| column.get(doc) == 0
        });
        let count = searcher.search(&AllQuery, &collector).unwrap();
        assert_eq!(count, 3);
    }
}
