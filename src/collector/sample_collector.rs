use rand::Rng;

use crate::collector::{Collector, SegmentCollector};
use crate::core::{DocAddress, SegmentLocalId, SegmentReader};
use crate::DocId;
use crate::Result;
use crate::Score;

/// Reservoir-samples up to `size` matching docs uniformly at random
/// (§4.5 "sample(size, seed?)"), via Algorithm R: the `n`th candidate
/// replaces a uniformly chosen slot with probability `size / n` once
/// the reservoir is full, so every match seen so far has equal odds of
/// surviving regardless of how many more are still to come.
pub struct SampleCollector {
    size: usize,
}

impl SampleCollector {
    pub fn new(size: usize) -> SampleCollector {
        assert!(size > 0, "sample size must be strictly positive");
        SampleCollector { size }
    }
}

impl Collector for SampleCollector {
    type Fruit = Vec<DocAddress>;
    type Child = SampleSegmentCollector;

    fn for_segment(&self, segment_local_id: SegmentLocalId, _reader: &SegmentReader) -> Result<SampleSegmentCollector> {
        Ok(SampleSegmentCollector {
            segment_local_id,
            size: self.size,
            seen: 0,
            reservoir: Vec::with_capacity(self.size),
        })
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn merge_fruits(&self, segment_fruits: Vec<Vec<DocAddress>>) -> Result<Vec<DocAddress>> {
        let mut rng = rand::thread_rng();
        let mut reservoir: Vec<DocAddress> = Vec::with_capacity(self.size);
        let mut seen = 0u64;
        for address in segment_fruits.into_iter().flatten() {
            seen += 1;
            if reservoir.len() < self.size {
                reservoir.push(address);
            } else {
                let slot = rng.gen_range(0, seen);
                if (slot as usize) < self.size {
                    reservoir[slot as usize] = address;
                }
            }
        }
        Ok(reservoir)
    }
}

pub struct SampleSegmentCollector {
    segment_local_id: SegmentLocalId,
    size: usize,
    seen: u64,
    reservoir: Vec<DocAddress>,
}

impl SegmentCollector for SampleSegmentCollector {
    type Fruit = Vec<DocAddress>;

    fn collect(&mut self, doc: DocId, _score: Score) {
        self.seen += 1;
        let address = DocAddress(self.segment_local_id, doc);
        if self.reservoir.len() < self.size {
            self.reservoir.push(address);
        } else {
            let mut rng = rand::thread_rng();
            let slot = rng.gen_range(0, self.seen);
            if (slot as usize) < self.size {
                self.reservoir[slot as usize] = address;
            }
        }
    }

    fn harvest(self) -> Vec<DocAddress> {
        self.reservoir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AllQuery;
    use crate::schema::{Schema, TEXT};
    use crate::{doc, Index};

    #[test]
    fn test_sample_collector_never_exceeds_size() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for _ in 0..50 {
            writer.add_document(doc!(title => "word")).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let sampled = searcher.search(&AllQuery, &SampleCollector::new(5)).unwrap();
        assert_eq!(sampled.len(), 5);
    }

    #[test]
    fn test_sample_collector_returns_all_when_fewer_than_size() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        writer.add_document(doc!(title => "word")).unwrap();
        writer.add_document(doc!(title => "word")).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let sampled = searcher.search(&AllQuery, &SampleCollector::new(10)).unwrap();
        assert_eq!(sampled.len(), 2);
    }
}
