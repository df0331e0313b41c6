use crate::core::SegmentReader;
use crate::query::Scorer;
use crate::DocId;
use crate::Result;

/// One query's per-segment executable form (§4.3/§4.4): a `Query` is
/// compiled into a `Weight` once per search (binding it to the
/// searcher's schema and whatever corpus-wide statistics it needs),
/// then asked for a fresh `Scorer` against each segment in turn.
pub trait Weight: Send + Sync {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>>;

    /// Number of matching docs in `reader`, without necessarily
    /// producing scores. Deleted docs never count (§8 property 5). The
    /// default just walks the scorer; weights with a cheaper path
    /// (e.g. a single term's `doc_freq`) override this, falling back to
    /// this same walk whenever `reader.has_deletes()`.
    fn count(&self, reader: &SegmentReader) -> Result<u32> {
        let mut scorer = self.scorer(reader)?;
        let mut count = 0u32;
        while scorer.advance() {
            if !reader.is_deleted(scorer.doc()) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Whether `doc` matches in `reader`, without needing to collect
    /// earlier docs first. Used by `Collector::filter`-style wrappers.
    fn matches(&self, reader: &SegmentReader, doc: DocId) -> Result<bool> {
        let mut scorer = self.scorer(reader)?;
        Ok(scorer.skip_to(doc) && scorer.doc() == doc)
    }
}
