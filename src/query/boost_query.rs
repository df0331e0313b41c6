use crate::core::SegmentReader;
use crate::query::{DocSet, Query, Scorer, TermMatcher, Weight};
use crate::schema::Schema;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Scales an inner query's scores by a constant factor (§6 "Query
/// tree": every query carries an optional `boost`; this variant makes
/// boosting composable for queries that don't carry their own).
#[derive(Debug)]
pub struct BoostQuery {
    query: Box<dyn Query>,
    boost: f32,
}

impl BoostQuery {
    pub fn new(query: Box<dyn Query>, boost: f32) -> BoostQuery {
        BoostQuery { query, boost }
    }
}

impl Query for BoostQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(BoostWeight {
            inner: self.query.weight(schema)?,
            boost: self.boost,
        }))
    }
}

struct BoostWeight {
    inner: Box<dyn Weight>,
    boost: f32,
}

impl Weight for BoostWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        Ok(Box::new(BoostScorer {
            inner: self.inner.scorer(reader)?,
            boost: self.boost,
        }))
    }

    fn count(&self, reader: &SegmentReader) -> Result<u32> {
        self.inner.count(reader)
    }
}

struct BoostScorer {
    inner: Box<dyn Scorer>,
    boost: f32,
}

impl DocSet for BoostScorer {
    fn advance(&mut self) -> bool {
        self.inner.advance()
    }

    fn doc(&self) -> DocId {
        self.inner.doc()
    }

    fn skip_to(&mut self, target: DocId) -> bool {
        self.inner.skip_to(target)
    }

    fn size_hint(&self) -> u32 {
        self.inner.size_hint()
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        self.inner.term_matchers()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        self.inner.matching_terms(docid)
    }
}

impl Scorer for BoostScorer {
    fn score(&mut self) -> Score {
        self.inner.score() * self.boost
    }

    fn supports_block_quality(&self) -> bool {
        self.inner.supports_block_quality()
    }

    fn max_quality(&self) -> Score {
        self.inner.max_quality() * self.boost
    }

    fn block_quality(&self) -> Score {
        self.inner.block_quality() * self.boost
    }
}
