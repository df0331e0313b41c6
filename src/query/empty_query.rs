use crate::core::SegmentReader;
use crate::query::{DocSet, Query, Scorer, Weight};
use crate::schema::Schema;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Matches nothing. Used both as an explicit `Query` variant (§6
/// "Query tree": `NullQuery`) and as the scorer a `TermWeight` returns
/// for a term absent from a given segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyQuery;

impl Query for EmptyQuery {
    fn weight(&self, _schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(EmptyWeight))
    }
}

struct EmptyWeight;

impl Weight for EmptyWeight {
    fn scorer(&self, _reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        Ok(Box::new(EmptyScorer))
    }

    fn count(&self, _reader: &SegmentReader) -> Result<u32> {
        Ok(0)
    }
}

/// A `Scorer`/`DocSet` with no matches, ever.
pub struct EmptyScorer;

impl DocSet for EmptyScorer {
    fn advance(&mut self) -> bool {
        false
    }

    fn doc(&self) -> DocId {
        u32::MAX
    }

    fn skip_to(&mut self, _target: DocId) -> bool {
        false
    }
}

impl Scorer for EmptyScorer {
    fn score(&mut self) -> Score {
        0.0
    }

    fn supports_block_quality(&self) -> bool {
        true
    }

    fn max_quality(&self) -> Score {
        0.0
    }
}
