use crate::collector::Collector;
use crate::core::{DocAddress, SegmentLocalId, SegmentReader};
use crate::query::{DocSet, Query, Scorer, SkipResult};
use crate::schema::{Document, Schema};
use crate::Result;

/// How often (in matched docs) the scored search loop re-checks the
/// collector's `current_threshold` and feeds it back into the scorer
/// tree (§4.5 "periodically calling `replace(current_min_score)`,
/// optionally `skip_to_quality(min_score)`"). Checking every doc would
/// pay the heap-peek/replace cost for no gain once the threshold has
/// stabilized; checking too rarely lets the matcher walk blocks it
/// could have skipped.
const QUALITY_CHECK_INTERVAL: u32 = 32;

/// Composes every live segment's reader into one logical view (§4.6
/// "Multi-reader"). `doc` turns a collector's `DocAddress` back into a
/// stored `Document`; query execution dispatches per-segment and relies
/// on `segment_readers` for the matcher/collector fan-out.
#[derive(Clone)]
pub struct Searcher {
    schema: Schema,
    segment_readers: Vec<SegmentReader>,
}

impl Searcher {
    pub fn new(schema: Schema, segment_readers: Vec<SegmentReader>) -> Searcher {
        Searcher { schema, segment_readers }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn segment_readers(&self) -> &[SegmentReader] {
        &self.segment_readers
    }

    pub fn segment_reader(&self, segment_ord: SegmentLocalId) -> &SegmentReader {
        &self.segment_readers[segment_ord as usize]
    }

    /// Total live (undeleted) document count across every segment.
    pub fn num_docs(&self) -> u64 {
        self.segment_readers.iter().map(|reader| u64::from(reader.num_docs())).sum()
    }

    /// Resolves a `DocAddress` into its stored field values.
    pub fn doc(&self, address: DocAddress) -> Result<Document> {
        let segment_reader = self.segment_reader(address.segment_ord());
        let store_reader = segment_reader.get_store_reader()?;
        store_reader.get(address.doc())
    }

    /// Runs `query` against every live segment and folds the per-segment
    /// `Fruit`s into one (§4.5 "Collector", §4.6 "Reader contract"): each
    /// segment gets its own scorer and its own `Collector::Child`, deleted
    /// docs are skipped before they ever reach `collect`, and the whole
    /// per-segment fan-out is independent of how many segments the index
    /// happens to be split into.
    pub fn search<C: Collector>(&self, query: &dyn Query, collector: &C) -> Result<C::Fruit> {
        let weight = query.weight(&self.schema)?;
        let mut segment_fruits = Vec::with_capacity(self.segment_readers.len());
        for (segment_ord, reader) in self.segment_readers.iter().enumerate() {
            let mut segment_collector = collector.for_segment(segment_ord as SegmentLocalId, reader)?;
            let mut scorer = weight.scorer(reader)?;
            if collector.requires_scoring() {
                let mut since_last_check: u32 = 0;
                while scorer.advance() {
                    since_last_check += 1;
                    if scorer.supports_block_quality() && since_last_check >= QUALITY_CHECK_INTERVAL {
                        since_last_check = 0;
                        if let Some(threshold) = segment_collector.current_threshold() {
                            scorer.replace(threshold);
                            if scorer.skip_to_quality(threshold) == SkipResult::End {
                                break;
                            }
                        }
                    }
                    let doc = scorer.doc();
                    if !reader.is_deleted(doc) {
                        let score = scorer.score();
                        segment_collector.collect_scored(doc, score, &mut *scorer);
                    }
                }
            } else {
                while scorer.advance() {
                    let doc = scorer.doc();
                    if !reader.is_deleted(doc) {
                        segment_collector.collect(doc, 0.0);
                    }
                }
            }
            segment_fruits.push(segment_collector.harvest());
        }
        collector.merge_fruits(segment_fruits)
    }
}
