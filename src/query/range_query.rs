use std::ops::Bound;

use crate::core::SegmentReader;
use crate::query::bm25::Bm25Weight;
use crate::query::term_query::TermScorer;
use crate::query::union::Union;
use crate::query::{EmptyScorer, Query, Scorer, Weight};
use crate::schema::{Field, Schema, Term};
use crate::Result;

/// Matches every doc whose value for `field` falls within `[lower,
/// upper)` (§6 "Query tree": `Range`/`NumericRange`). Candidate terms
/// are found by walking the term dictionary's ascending-order slice for
/// `field`, relying on `Term`'s order-preserving numeric encoding
/// (`i64_to_sortable_u64`/`f64_to_sortable_u64`) so that byte order
/// within the field's slice agrees with value order for every field
/// type this crate supports, text included.
#[derive(Debug, Clone)]
pub struct RangeQuery {
    field: Field,
    lower: Bound<Term>,
    upper: Bound<Term>,
}

impl RangeQuery {
    pub fn new(field: Field, lower: Bound<Term>, upper: Bound<Term>) -> RangeQuery {
        RangeQuery { field, lower, upper }
    }
}

impl Query for RangeQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let field_type = schema.get_field_entry(self.field).field_type().clone();
        let record_option = crate::postings::IndexRecordOption::for_field_type(&field_type);
        Ok(Box::new(RangeWeight {
            field: self.field,
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            record_option,
        }))
    }
}

struct RangeWeight {
    field: Field,
    lower: Bound<Term>,
    upper: Bound<Term>,
    record_option: crate::postings::IndexRecordOption,
}

impl RangeWeight {
    fn passes_upper_bound(&self, key: &[u8]) -> bool {
        match &self.upper {
            Bound::Unbounded => true,
            Bound::Included(term) => key <= term.as_slice(),
            Bound::Excluded(term) => key < term.as_slice(),
        }
    }
}

impl Weight for RangeWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        let field_prefix = Term::for_field(self.field);
        let inverted_index = reader.inverted_index(self.field);

        let (start_term, skip_first_if_excluded) = match &self.lower {
            Bound::Unbounded => (field_prefix.clone(), false),
            Bound::Included(term) => (term.clone(), false),
            Bound::Excluded(term) => (term.clone(), true),
        };

        let mut matched_terms = Vec::new();
        let mut cursor = inverted_index.terms_ge(&start_term);
        let mut first = true;
        while let Some((key, term_info)) = cursor.next() {
            if !key.starts_with(field_prefix.as_slice()) {
                break;
            }
            if !self.passes_upper_bound(key) {
                break;
            }
            if first && skip_first_if_excluded && key == start_term.as_slice() {
                first = false;
                continue;
            }
            first = false;
            let value = &key[field_prefix.as_slice().len()..];
            matched_terms.push((Term::from_field_bytes(self.field, value), term_info));
        }

        if matched_terms.is_empty() {
            return Ok(Box::new(EmptyScorer));
        }

        let mut scorers: Vec<Box<dyn Scorer>> = Vec::with_capacity(matched_terms.len());
        for (matched_term, term_info) in matched_terms {
            let postings = crate::postings::SegmentPostings::open(
                &term_info,
                self.record_option,
                reader.postings_source(),
                reader.positions_source(),
            )?;
            let bm25_weight = Bm25Weight::for_one_term(reader, self.field, postings.doc_freq(), 1.0);
            let fieldnorm_reader = reader.fieldnorm_reader(self.field);
            scorers.push(Box::new(TermScorer::new(matched_term, postings, fieldnorm_reader, bm25_weight)) as Box<dyn Scorer>);
        }
        if scorers.len() == 1 {
            Ok(scorers.pop().unwrap())
        } else {
            Ok(Box::new(Union::build(scorers)))
        }
    }
}
