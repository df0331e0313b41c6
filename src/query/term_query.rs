use crate::core::SegmentReader;
use crate::query::bm25::Bm25Weight;
use crate::query::scorer::SkipResult;
use crate::query::{DocSet, Query, Scorer, TermMatcher, Weight};
use crate::schema::{Schema, Term};
use crate::DocId;
use crate::Result;
use crate::Score;

/// Matches documents containing exactly one term (§6 "Query tree":
/// `Term(field, text, boost)`). The leaf every other query variant
/// eventually bottoms out on.
#[derive(Debug, Clone)]
pub struct TermQuery {
    term: Term,
    boost: f32,
}

impl TermQuery {
    pub fn new(term: Term) -> TermQuery {
        TermQuery { term, boost: 1.0 }
    }

    pub fn with_boost(term: Term, boost: f32) -> TermQuery {
        TermQuery { term, boost }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }
}

impl Query for TermQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let field_type = schema.get_field_entry(self.term.field()).field_type().clone();
        let record_option = crate::postings::IndexRecordOption::for_field_type(&field_type);
        Ok(Box::new(TermWeight {
            term: self.term.clone(),
            record_option,
            boost: self.boost,
        }))
    }
}

struct TermWeight {
    term: Term,
    record_option: crate::postings::IndexRecordOption,
    boost: f32,
}

impl Weight for TermWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        let inverted_index = reader.inverted_index(self.term.field());
        match inverted_index.read_postings(&self.term)? {
            Some(postings) => {
                let bm25_weight =
                    Bm25Weight::for_one_term(reader, self.term.field(), postings.doc_freq(), self.boost);
                let fieldnorm_reader = reader.fieldnorm_reader(self.term.field());
                Ok(Box::new(TermScorer {
                    term: self.term.clone(),
                    postings,
                    fieldnorm_reader,
                    bm25_weight,
                }))
            }
            None => Ok(Box::new(crate::query::EmptyScorer)),
        }
    }

    fn count(&self, reader: &SegmentReader) -> Result<u32> {
        // `TermInfo::doc_freq` counts every posting ever written for
        // this term, deleted docs included -- only safe to return
        // directly when the segment has none. Otherwise fall back to
        // the delete-aware scorer walk `Weight::count`'s default
        // provides (§8 property 5 "deletion masking").
        if !reader.has_deletes() {
            let inverted_index = reader.inverted_index(self.term.field());
            return Ok(inverted_index
                .term_info(&self.term)?
                .map(|term_info| term_info.doc_freq)
                .unwrap_or(0));
        }
        let mut scorer = self.scorer(reader)?;
        let mut count = 0u32;
        while scorer.advance() {
            if !reader.is_deleted(scorer.doc()) {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Scores a single term's postings by BM25. Shared with
/// `FuzzyTermQuery` and `RangeQuery`, which both bottom out on one or
/// more individual terms' posting lists.
pub(crate) struct TermScorer {
    term: Term,
    postings: crate::postings::SegmentPostings,
    fieldnorm_reader: Option<crate::fieldnorm::FieldNormReader>,
    bm25_weight: Bm25Weight,
}

impl TermScorer {
    pub(crate) fn new(
        term: Term,
        postings: crate::postings::SegmentPostings,
        fieldnorm_reader: Option<crate::fieldnorm::FieldNormReader>,
        bm25_weight: Bm25Weight,
    ) -> TermScorer {
        TermScorer {
            term,
            postings,
            fieldnorm_reader,
            bm25_weight,
        }
    }
}

impl DocSet for TermScorer {
    fn advance(&mut self) -> bool {
        self.postings.advance()
    }

    fn doc(&self) -> DocId {
        self.postings.doc()
    }

    fn skip_to(&mut self, target: DocId) -> bool {
        self.postings.skip_to(target)
    }

    fn size_hint(&self) -> u32 {
        self.postings.doc_freq()
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        vec![TermMatcher::new(self.term.field(), self.term.clone())]
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        if self.doc() == docid {
            self.term_matchers()
        } else {
            Vec::new()
        }
    }
}

impl Scorer for TermScorer {
    fn score(&mut self) -> Score {
        let fieldnorm = self
            .fieldnorm_reader
            .as_ref()
            .map(|reader| reader.fieldnorm(self.postings.doc()))
            .unwrap_or(1);
        self.bm25_weight.score(fieldnorm, self.postings.term_freq())
    }

    /// Backed by `SegmentPostings`' own per-block `max_weight` summary
    /// (§4.1), the one place in the matcher tree this bound is exact
    /// rather than propagated from children.
    fn supports_block_quality(&self) -> bool {
        self.postings.supports_block_quality()
    }

    fn max_quality(&self) -> Score {
        self.bm25_weight.max_score()
    }

    fn block_quality(&self) -> Score {
        if !self.postings.supports_block_quality() {
            return self.max_quality();
        }
        // The friendliest fieldnorm this block could contain isn't
        // tracked (only the block's *worst* length is), so assume the
        // shortest possible field length (`1`) paired with the block's
        // actual max term frequency -- a valid, if not maximally tight,
        // upper bound.
        self.bm25_weight.score(1, self.postings.block_max_weight())
    }

    fn skip_to_quality(&mut self, min_quality: Score) -> SkipResult {
        if !self.postings.supports_block_quality() {
            return SkipResult::Reached;
        }
        loop {
            if self.block_quality() >= min_quality {
                return SkipResult::Reached;
            }
            let last_doc_in_block = self.postings.block_last_doc();
            if last_doc_in_block == DocId::MAX || !self.postings.skip_to(last_doc_in_block + 1) {
                return SkipResult::End;
            }
        }
    }
}
