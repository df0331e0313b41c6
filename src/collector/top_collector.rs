use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{DocAddress, SegmentLocalId};
use crate::DocId;
use crate::Result;

/// One heap entry: `feature` is whatever `T` is being ranked by (a
/// `Score` for `TopDocs`, a fast-field value for `order_by_field`).
/// Ties break on ascending `DocAddress` so results are deterministic
/// regardless of heap internals (§8 property 9 footnote: "modulo ties
/// whose order is unspecified" -- here it *is* specified, just not by
/// the spec).
struct ComparableDoc<T> {
    feature: T,
    doc: DocAddress,
}

impl<T: PartialOrd> PartialEq for ComparableDoc<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<T: PartialOrd> Eq for ComparableDoc<T> {}

impl<T: PartialOrd> PartialOrd for ComparableDoc<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialOrd> Ord for ComparableDoc<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.feature
            .partial_cmp(&other.feature)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.doc.cmp(&self.doc))
    }
}

/// Keeps the `limit` highest-`feature` docs seen so far in a min-heap
/// (§4.5 "top_K(n)"): the heap root is always the current worst of the
/// kept set, so an incoming doc only needs comparing against it to
/// decide whether to displace it. Shared by `TopDocs` (feature =
/// `Score`) and `order_by_field` (feature = a fast field's raw `u64`);
/// each wraps this in its own `SegmentCollector` that knows how to
/// derive `feature` from a matched doc.
pub struct TopSegmentCollector<T> {
    segment_local_id: SegmentLocalId,
    limit: usize,
    heap: BinaryHeap<std::cmp::Reverse<ComparableDoc<T>>>,
}

impl<T: PartialOrd> TopSegmentCollector<T> {
    pub fn new(segment_local_id: SegmentLocalId, limit: usize) -> TopSegmentCollector<T> {
        assert!(limit > 0, "limit must be strictly positive");
        TopSegmentCollector {
            segment_local_id,
            limit,
            heap: BinaryHeap::with_capacity(limit),
        }
    }

    /// Records one `(feature, doc)` pair, evicting the current worst
    /// entry if the heap is already at capacity and `feature` beats it.
    pub fn collect_feature(&mut self, doc: DocId, feature: T) {
        let comparable = ComparableDoc {
            feature,
            doc: DocAddress(self.segment_local_id, doc),
        };
        if self.heap.len() < self.limit {
            self.heap.push(std::cmp::Reverse(comparable));
            return;
        }
        if let Some(std::cmp::Reverse(worst)) = self.heap.peek() {
            if comparable > *worst {
                self.heap.pop();
                self.heap.push(std::cmp::Reverse(comparable));
            }
        }
    }

    /// The current worst kept entry's feature, once the heap is full
    /// (§4.5 "top_K(n): on overflow, evict min and raise the
    /// collector's `min_score`, enabling block-max skipping"). `None`
    /// before the heap fills -- every remaining doc is still guaranteed
    /// a spot, so there is nothing yet to prune against.
    pub fn current_threshold(&self) -> Option<T>
    where
        T: Clone,
    {
        if self.heap.len() < self.limit {
            return None;
        }
        self.heap.peek().map(|std::cmp::Reverse(worst)| worst.feature.clone())
    }

    /// Drains the heap into a descending-by-feature `Vec`.
    pub fn harvest_ranked(self) -> Vec<(T, DocAddress)> {
        let mut ranked: Vec<(T, DocAddress)> = self
            .heap
            .into_vec()
            .into_iter()
            .map(|std::cmp::Reverse(comparable)| (comparable.feature, comparable.doc))
            .collect();
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal).then_with(|| a.1.cmp(&b.1)));
        ranked
    }
}

/// Whole-index top-K bookkeeping (§4.5 "top_K(n)"): holds only the
/// limit. `TopDocs` and `TopDocsByField` each implement `Collector`
/// around one of these, differing only in how a segment's `Child`
/// turns a matched doc into a `feature` value.
pub struct TopCollector<T> {
    limit: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TopCollector<T> {
    pub fn with_limit(limit: usize) -> TopCollector<T> {
        assert!(limit > 0, "limit must be strictly positive");
        TopCollector {
            limit,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<T: PartialOrd + Clone> TopCollector<T> {
    pub(crate) fn for_segment(&self, segment_local_id: SegmentLocalId) -> Result<TopSegmentCollector<T>> {
        Ok(TopSegmentCollector::new(segment_local_id, self.limit))
    }

    pub(crate) fn merge_fruits(&self, segment_fruits: Vec<Vec<(T, DocAddress)>>) -> Result<Vec<(T, DocAddress)>> {
        let mut merged: Vec<(T, DocAddress)> = segment_fruits.into_iter().flatten().collect();
        merged.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal).then_with(|| a.1.cmp(&b.1)));
        merged.truncate(self.limit);
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Score;

    #[test]
    fn test_top_segment_collector_keeps_best_n() {
        let mut collector = TopSegmentCollector::<Score>::new(0, 2);
        collector.collect_feature(0, 1.0);
        collector.collect_feature(1, 5.0);
        collector.collect_feature(2, 3.0);
        let ranked = collector.harvest_ranked();
        assert_eq!(ranked, vec![(5.0, DocAddress(0, 1)), (3.0, DocAddress(0, 2))]);
    }

    #[test]
    #[should_panic]
    fn test_zero_limit_panics() {
        TopSegmentCollector::<Score>::new(0, 0);
    }
}
