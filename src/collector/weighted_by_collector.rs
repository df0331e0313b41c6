use crate::collector::{Collector, SegmentCollector};
use crate::core::{SegmentLocalId, SegmentReader};
use crate::query::Scorer;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Overrides the score an inner collector sees with an external model
/// (§4.5 "weighted_by(model)": "Override the scorer on the search
/// context"). `model` runs once per hit against the doc and the BM25
/// score the query tree produced, and its result replaces that score
/// before the inner collector ever sees it -- a reranking hook, not a
/// replacement for the matcher engine's own scoring.
pub struct WeightedByCollector<C, M> {
    collector: C,
    model: M,
}

impl<C, M> WeightedByCollector<C, M>
where
    C: Collector,
    M: Fn(DocId, Score) -> Score + Sync + Clone + 'static,
{
    pub fn new(collector: C, model: M) -> WeightedByCollector<C, M> {
        WeightedByCollector { collector, model }
    }
}

impl<C, M> Collector for WeightedByCollector<C, M>
where
    C: Collector,
    M: Fn(DocId, Score) -> Score + Sync + Clone + 'static,
{
    type Fruit = C::Fruit;
    type Child = WeightedBySegmentCollector<C::Child, M>;

    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<Self::Child> {
        Ok(WeightedBySegmentCollector {
            inner: self.collector.for_segment(segment_local_id, reader)?,
            model: self.model.clone(),
        })
    }

    fn requires_scoring(&self) -> bool {
        true
    }

    fn merge_fruits(&self, segment_fruits: Vec<C::Fruit>) -> Result<C::Fruit> {
        self.collector.merge_fruits(segment_fruits)
    }
}

pub struct WeightedBySegmentCollector<SC, M> {
    inner: SC,
    model: M,
}

impl<SC, M> SegmentCollector for WeightedBySegmentCollector<SC, M>
where
    SC: SegmentCollector,
    M: Fn(DocId, Score) -> Score + Sync + 'static,
{
    type Fruit = SC::Fruit;

    fn collect(&mut self, doc: DocId, score: Score) {
        self.inner.collect(doc, (self.model)(doc, score));
    }

    fn collect_scored(&mut self, doc: DocId, score: Score, scorer: &mut dyn Scorer) {
        self.inner.collect_scored(doc, (self.model)(doc, score), scorer);
    }

    // No `current_threshold` override: the inner collector's threshold
    // is a bound on `model`'s *output*, but block-max skipping prunes
    // by the matcher tree's own raw score. `model` can remap that
    // arbitrarily (the doc comment above already calls this out as "not
    // a replacement for the matcher engine's own scoring"), so forwarding
    // the inner threshold here could skip docs the model would have
    // ranked highly. Default `None` keeps this collector's results
    // correct at the cost of its optimization.

    fn harvest(self) -> SC::Fruit {
        self.inner.harvest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::TopDocs;
    use crate::query::TermQuery;
    use crate::schema::{Schema, Term, TEXT};
    use crate::Index;

    #[test]
    fn test_weighted_by_collector_overrides_the_score() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        writer.add_document(crate::doc!(title => "rust programming")).unwrap();
        writer.add_document(crate::doc!(title => "rust rust rust")).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = TermQuery::new(Term::from_field_text(title, "rust"));

        let plain = searcher.search(&query, &TopDocs::with_limit(2)).unwrap();
        let flipped = searcher
            .search(
                &query,
                &WeightedByCollector::new(TopDocs::with_limit(2), |_doc: DocId, score: Score| -score),
            )
            .unwrap();

        assert_eq!(plain.len(), flipped.len());
        let plain_addresses: Vec<_> = plain.iter().map(|(_, address)| *address).collect();
        let mut expected = plain_addresses.clone();
        expected.reverse();
        let flipped_addresses: Vec<_> = flipped.iter().map(|(_, address)| *address).collect();
        assert_eq!(flipped_addresses, expected);
    }
}
