use crate::collector::Collector;
use crate::core::{SegmentLocalId, SegmentReader};
use crate::Result;

/// Reverses an inner collector's final, merged list (§4.5
/// "reversed()"). Segments still collect and merge exactly as the inner
/// collector would; only the finished `Vec` is flipped, so this only
/// makes sense stacked on a collector whose `Fruit` already *is* an
/// ordered list, such as `TopDocs`.
pub struct ReversedCollector<C>(pub C);

impl<C> ReversedCollector<C> {
    pub fn new(collector: C) -> ReversedCollector<C> {
        ReversedCollector(collector)
    }
}

impl<C, T> Collector for ReversedCollector<C>
where
    C: Collector<Fruit = Vec<T>>,
    T: Send,
{
    type Fruit = Vec<T>;
    type Child = C::Child;

    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<Self::Child> {
        self.0.for_segment(segment_local_id, reader)
    }

    fn requires_scoring(&self) -> bool {
        self.0.requires_scoring()
    }

    fn merge_fruits(&self, segment_fruits: Vec<Vec<T>>) -> Result<Vec<T>> {
        let mut merged = self.0.merge_fruits(segment_fruits)?;
        merged.reverse();
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::TopDocs;
    use crate::query::AllQuery;
    use crate::schema::{Schema, FAST};
    use crate::Index;

    #[test]
    fn test_reversed_collector_flips_the_final_order() {
        let mut builder = Schema::builder();
        let rank = builder.add_u64_field("rank", FAST);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for value in 0u64..4 {
            let mut doc = crate::schema::Document::default();
            doc.add(rank, value);
            writer.add_document(doc).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();

        let forward = searcher.search(&AllQuery, &TopDocs::with_limit(4)).unwrap();
        let reversed = searcher
            .search(&AllQuery, &ReversedCollector::new(TopDocs::with_limit(4)))
            .unwrap();

        let forward_addresses: Vec<_> = forward.iter().map(|(_, address)| *address).collect();
        let mut expected = forward_addresses.clone();
        expected.reverse();
        let reversed_addresses: Vec<_> = reversed.iter().map(|(_, address)| *address).collect();
        assert_eq!(reversed_addresses, expected);
    }
}
