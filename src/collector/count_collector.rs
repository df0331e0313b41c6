use crate::collector::{Collector, SegmentCollector};
use crate::core::{SegmentLocalId, SegmentReader};
use crate::DocId;
use crate::Result;
use crate::Score;

/// Counts matching documents without scoring or collecting addresses
/// (§4.5). Cheaper than `query::count` when run alongside other
/// collectors through a `MultiCollector`, since it shares the scorer
/// walk instead of repeating it.
///
/// ```
/// use vellum::collector::Count;
/// use vellum::query::AllQuery;
/// use vellum::schema::Schema;
/// use vellum::Index;
///
/// # fn main() -> vellum::Result<()> {
/// let schema = Schema::builder().build();
/// let index = Index::create_in_ram(schema);
/// let mut writer = index.writer_with_num_threads(1, 3_000_000)?;
/// writer.add_document(vellum::doc!())?;
/// writer.commit()?;
/// let searcher = index.reader()?.searcher();
/// assert_eq!(searcher.search(&AllQuery, &Count)?, 1);
/// # Ok(())
/// # }
/// ```
pub struct Count;

impl Collector for Count {
    type Fruit = usize;
    type Child = CountSegmentCollector;

    fn for_segment(&self, _segment_local_id: SegmentLocalId, _reader: &SegmentReader) -> Result<CountSegmentCollector> {
        Ok(CountSegmentCollector(0))
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn merge_fruits(&self, segment_fruits: Vec<usize>) -> Result<usize> {
        Ok(segment_fruits.into_iter().sum())
    }
}

pub struct CountSegmentCollector(usize);

impl SegmentCollector for CountSegmentCollector {
    type Fruit = usize;

    fn collect(&mut self, _doc: DocId, _score: Score) {
        self.0 += 1;
    }

    fn harvest(self) -> usize {
        self.0
    }
}
