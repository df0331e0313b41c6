use crate::core::SegmentReader;
use crate::query::bm25::Bm25Weight;
use crate::query::term_query::TermScorer;
use crate::query::union::Union;
use crate::query::{EmptyScorer, Query, Scorer, Weight};
use crate::schema::{Schema, Term};
use crate::Result;

/// Matches every term in `field` that starts with a given prefix (§6
/// "Query tree": `Prefix(field, text)`), found the same way `RangeQuery`
/// finds its candidates: seek to the prefix's lower bound in the field's
/// term dictionary slice, then walk forward until a key stops sharing
/// the prefix.
#[derive(Debug, Clone)]
pub struct PrefixQuery {
    prefix_term: Term,
}

impl PrefixQuery {
    pub fn new(prefix_term: Term) -> PrefixQuery {
        PrefixQuery { prefix_term }
    }
}

impl Query for PrefixQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let field_type = schema.get_field_entry(self.prefix_term.field()).field_type().clone();
        let record_option = crate::postings::IndexRecordOption::for_field_type(&field_type);
        Ok(Box::new(PrefixWeight {
            prefix_term: self.prefix_term.clone(),
            record_option,
        }))
    }
}

struct PrefixWeight {
    prefix_term: Term,
    record_option: crate::postings::IndexRecordOption,
}

impl Weight for PrefixWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        let field = self.prefix_term.field();
        let inverted_index = reader.inverted_index(field);

        let field_prefix_len = Term::for_field(field).as_slice().len();
        let mut matched_terms = Vec::new();
        let mut cursor = inverted_index.terms_ge(&self.prefix_term);
        while let Some((key, term_info)) = cursor.next() {
            if !key.starts_with(self.prefix_term.as_slice()) {
                break;
            }
            let value = &key[field_prefix_len..];
            matched_terms.push((Term::from_field_bytes(field, value), term_info));
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
            let bm25_weight = Bm25Weight::for_one_term(reader, field, postings.doc_freq(), 1.0);
            let fieldnorm_reader = reader.fieldnorm_reader(field);
            scorers.push(Box::new(TermScorer::new(matched_term, postings, fieldnorm_reader, bm25_weight)) as Box<dyn Scorer>);
        }
        if scorers.len() == 1 {
            Ok(scorers.pop().unwrap())
        } else {
            Ok(Box::new(Union::build(scorers)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, TEXT};
    use crate::{Index, Term};

    #[test]
    fn test_prefix_query_matches_every_term_sharing_the_prefix() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for text in &["rustacean", "rusty nail", "python"] {
            writer.add_document(crate::doc!(title => *text)).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = PrefixQuery::new(Term::from_field_text(title, "rust"));
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 2);
    }
}
