use crate::collector::top_collector::{TopCollector, TopSegmentCollector};
use crate::collector::{Collector, SegmentCollector};
use crate::core::{DocAddress, SegmentLocalId, SegmentReader};
use crate::DocId;
use crate::Result;
use crate::Score;

/// Slices a score-ranked result set into one page (§4.5 "page(offset,
/// size)"): runs the same top-K machinery `TopDocs` does, just over
/// `offset + size` instead of `size`, then drops the first `offset`
/// once everything is merged and sorted. Cheap relative to re-running
/// the search per page since `offset + size` only needs to stay small
/// relative to the corpus for this to be worthwhile -- deep paging
/// still costs a top-`(offset + size)` collection.
pub struct PageCollector {
    offset: usize,
    size: usize,
    inner: TopCollector<Score>,
}

impl PageCollector {
    pub fn new(offset: usize, size: usize) -> PageCollector {
        assert!(size > 0, "page size must be strictly positive");
        PageCollector {
            offset,
            size,
            inner: TopCollector::with_limit(offset + size),
        }
    }
}

pub struct PageSegmentCollector(TopSegmentCollector<Score>);

impl SegmentCollector for PageSegmentCollector {
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

impl Collector for PageCollector {
    type Fruit = Vec<(Score, DocAddress)>;
    type Child = PageSegmentCollector;

    fn for_segment(&self, segment_local_id: SegmentLocalId, _reader: &SegmentReader) -> Result<PageSegmentCollector> {
        Ok(PageSegmentCollector(self.inner.for_segment(segment_local_id)?))
    }

    fn requires_scoring(&self) -> bool {
        true
    }

    fn merge_fruits(&self, segment_fruits: Vec<Vec<(Score, DocAddress)>>) -> Result<Vec<(Score, DocAddress)>> {
        let top = self.inner.merge_fruits(segment_fruits)?;
        Ok(top.into_iter().skip(self.offset).collect())
    }
}

/// Free-function form for call sites that already have a full
/// score-ranked `Vec` (e.g. chained behind another collector) and just
/// want the windowing, without paying for a second top-K pass.
pub fn paginate<T>(ranked: Vec<T>, offset: usize, size: usize) -> Vec<T> {
    ranked.into_iter().skip(offset).take(size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AllQuery;
    use crate::schema::{Schema, TEXT};
    use crate::{doc, Index};

    #[test]
    fn test_page_collector_windows_results() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for i in 0..10 {
            writer.add_document(doc!(title => format!("doc {}", i))).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let page0 = searcher.search(&AllQuery, &PageCollector::new(0, 3)).unwrap();
        let page1 = searcher.search(&AllQuery, &PageCollector::new(3, 3)).unwrap();
        assert_eq!(page0.len(), 3);
        assert_eq!(page1.len(), 3);
        let page0_docs: Vec<DocAddress> = page0.iter().map(|&(_, addr)| addr).collect();
        let page1_docs: Vec<DocAddress> = page1.iter().map(|&(_, addr)| addr).collect();
        for addr in &page1_docs {
            assert!(!page0_docs.contains(addr));
        }
    }

    #[test]
    fn test_paginate_helper_windows_a_vec() {
        let ranked = vec![1, 2, 3, 4, 5];
        assert_eq!(paginate(ranked, 2, 2), vec![3, 4]);
    }
}
