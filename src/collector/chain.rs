use crate::collector::{Collector, SegmentCollector};
use crate::core::{SegmentLocalId, SegmentReader};
use crate::query::Scorer;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Runs several collectors over the same scorer walk in one pass
/// (§4.5 "Collector composition is ordinary function composition"),
/// rather than re-running the query once per collector. `MultiCollector`
/// is itself a `Collector` over a tuple of child collectors, mirroring
/// how `BooleanQuery` composes scorers rather than composing queries.
pub struct MultiCollector<T>(pub T);

macro_rules! impl_multi_collector {
    ($($name:ident: $idx:tt),+) => {
        impl<$($name: Collector),+> Collector for MultiCollector<($($name,)+)> {
            type Fruit = ($($name::Fruit,)+);
            type Child = ($($name::Child,)+);

            fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<Self::Child> {
                Ok(($((self.0).$idx.for_segment(segment_local_id, reader)?,)+))
            }

            fn requires_scoring(&self) -> bool {
                $((self.0).$idx.requires_scoring())||+
            }

            fn merge_fruits(&self, segment_fruits: Vec<Self::Fruit>) -> Result<Self::Fruit> {
                $(
                    let mut $name = Vec::with_capacity(segment_fruits.len());
                )+
                for fruit in segment_fruits {
                    $($name.push(fruit.$idx);)+
                }
                Ok(($((self.0).$idx.merge_fruits($name)?,)+))
            }
        }

        impl<$($name: SegmentCollector),+> SegmentCollector for ($($name,)+) {
            type Fruit = ($($name::Fruit,)+);

            fn collect(&mut self, doc: DocId, score: Score) {
                $(self.$idx.collect(doc, score);)+
            }

            fn collect_scored(&mut self, doc: DocId, score: Score, scorer: &mut dyn Scorer) {
                $(self.$idx.collect_scored(doc, score, scorer);)+
            }

            fn harvest(self) -> Self::Fruit {
                ($(self.$idx.harvest(),)+)
            }
        }
    };
}

impl_multi_collector!(A: 0, B: 1);
impl_multi_collector!(A: 0, B: 1, C: 2);
impl_multi_collector!(A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{Count, TopDocs};
    use crate::query::AllQuery;
    use crate::schema::{Schema, TEXT};
    use crate::{doc, Index};

    #[test]
    fn test_multi_collector_runs_both_in_one_pass() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        writer.add_document(doc!(title => "a")).unwrap();
        writer.add_document(doc!(title => "b")).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let collector = MultiCollector((Count, TopDocs::with_limit(10)));
        let (count, top_docs) = searcher.search(&AllQuery, &collector).unwrap();
        assert_eq!(count, 2);
        assert_eq!(top_docs.len(), 2);
    }
}
