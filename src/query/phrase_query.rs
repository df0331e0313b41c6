use crate::core::SegmentReader;
use crate::postings::{IndexRecordOption, SegmentPostings};
use crate::query::bm25::Bm25Weight;
use crate::query::{DocSet, EmptyScorer, Query, Scorer, TermMatcher, Weight};
use crate::schema::{Field, Schema, Term};
use crate::DocId;
use crate::Result;
use crate::Score;

/// Matches documents where every term of `terms` appears, in order, at
/// consecutive positions (§4.3 "Phrase/Span"). Requires the field to be
/// indexed `WithFreqsAndPositions`; a field indexed at a coarser record
/// option simply never matches (there is no position data to check).
///
/// Scope note: this only matches exact adjacency (slop 0). A slop-aware
/// variant, and true span queries (bounded-distance unordered matches),
/// are left out -- see `DESIGN.md`.
#[derive(Debug, Clone)]
pub struct PhraseQuery {
    field: Field,
    terms: Vec<Term>,
}

impl PhraseQuery {
    pub fn new(field: Field, terms: Vec<Term>) -> PhraseQuery {
        assert!(terms.len() >= 2, "a phrase needs at least two terms");
        PhraseQuery { field, terms }
    }
}

impl Query for PhraseQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let field_type = schema.get_field_entry(self.field).field_type().clone();
        let record_option = IndexRecordOption::for_field_type(&field_type);
        Ok(Box::new(PhraseWeight {
            field: self.field,
            terms: self.terms.clone(),
            record_option,
        }))
    }
}

struct PhraseWeight {
    field: Field,
    terms: Vec<Term>,
    record_option: IndexRecordOption,
}

impl Weight for PhraseWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        if !self.record_option.has_positions() {
            return Ok(Box::new(EmptyScorer));
        }
        let inverted_index = reader.inverted_index(self.field);
        let mut postings_per_term = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            match inverted_index.read_postings(term)? {
                Some(postings) => postings_per_term.push(postings),
                None => return Ok(Box::new(EmptyScorer)),
            }
        }
        let doc_freq = postings_per_term
            .iter()
            .map(SegmentPostings::doc_freq)
            .min()
            .unwrap_or(0);
        let bm25_weight = Bm25Weight::for_one_term(reader, self.field, doc_freq, 1.0);
        let fieldnorm_reader = reader.fieldnorm_reader(self.field);
        Ok(Box::new(PhraseScorer {
            postings: postings_per_term,
            terms: self.terms.clone(),
            current_doc: None,
            fieldnorm_reader,
            bm25_weight,
        }))
    }
}

struct PhraseScorer {
    postings: Vec<SegmentPostings>,
    terms: Vec<Term>,
    current_doc: Option<DocId>,
    fieldnorm_reader: Option<crate::fieldnorm::FieldNormReader>,
    bm25_weight: Bm25Weight,
}

impl PhraseScorer {
    /// Advances every postings list to the first doc `>= target` on
    /// which all the query's terms co-occur in consecutive positions,
    /// returning that doc, or `None` if no such doc exists.
    fn seek_phrase_match(&mut self, mut target: DocId) -> Option<DocId> {
        'outer: loop {
            for postings in &mut self.postings {
                if !postings.skip_to(target) {
                    return None;
                }
                if postings.doc() > target {
                    target = postings.doc();
                    continue 'outer;
                }
            }
            if self.positions_align() {
                return Some(target);
            }
            target += 1;
        }
    }

    /// Whether the current doc's positions contain the query's terms
    /// consecutively, in order.
    fn positions_align(&self) -> bool {
        let first_positions = self.postings[0].positions();
        'candidate: for &start in first_positions {
            for (offset, postings) in self.postings.iter().enumerate().skip(1) {
                let expected = start + offset as u32;
                if postings.positions().binary_search(&expected).is_err() {
                    continue 'candidate;
                }
            }
            return true;
        }
        false
    }
}

impl DocSet for PhraseScorer {
    fn advance(&mut self) -> bool {
        let target = match self.current_doc {
            Some(doc) => doc + 1,
            None => 0,
        };
        self.current_doc = self.seek_phrase_match(target);
        self.current_doc.is_some()
    }

    fn doc(&self) -> DocId {
        self.current_doc.unwrap_or(u32::MAX)
    }

    fn skip_to(&mut self, target: DocId) -> bool {
        self.current_doc = self.seek_phrase_match(target);
        self.current_doc.is_some()
    }

    fn size_hint(&self) -> u32 {
        self.postings.iter().map(SegmentPostings::doc_freq).min().unwrap_or(0)
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        self.terms
            .iter()
            .map(|term| TermMatcher::new(term.field(), term.clone()))
            .collect()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        if self.doc() == docid {
            self.term_matchers()
        } else {
            Vec::new()
        }
    }
}

impl Scorer for PhraseScorer {
    fn score(&mut self) -> Score {
        let doc = self.doc();
        let fieldnorm = self
            .fieldnorm_reader
            .as_ref()
            .map(|reader| reader.fieldnorm(doc))
            .unwrap_or(1);
        let term_freq = self.postings[0].term_freq();
        self.bm25_weight.score(fieldnorm, term_freq)
    }

    /// None of the phrase's component postings tracks a per-block
    /// maximum specific to the adjacency constraint, so the bound is
    /// the same term_freq-to-infinity limit a lone `TermScorer` falls
    /// back to when it has no block quality stats.
    fn max_quality(&self) -> Score {
        self.bm25_weight.max_score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaBuilder, TEXT};
    use crate::Index;

    #[test]
    fn test_phrase_requires_consecutive_positions() {
        let mut builder = SchemaBuilder::default();
        let body = builder.add_text_field("body", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema.clone());
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for text in &["the quick brown fox", "the brown quick fox", "quick fox the brown"] {
            let mut doc = crate::schema::Document::default();
            doc.add_text(body, text);
            writer.add_document(doc).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = PhraseQuery::new(
            body,
            vec![
                Term::from_field_text(body, "quick"),
                Term::from_field_text(body, "brown"),
            ],
        );
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 1);
    }
}
