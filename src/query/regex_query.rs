use regex::Regex;

use crate::core::SegmentReader;
use crate::query::bm25::Bm25Weight;
use crate::query::term_query::TermScorer;
use crate::query::union::Union;
use crate::query::{EmptyScorer, Query, Scorer, Weight};
use crate::schema::{Field, Schema};
use crate::{Result, TantivyError};

/// Matches every term in `field` whose text fully matches a regular
/// expression (§6 "Query tree": `Regex`/`Wildcard`). Like
/// `FuzzyTermQuery`, candidates come from a linear scan of the field's
/// term dictionary slice rather than an automaton intersected against
/// the FST (see `DESIGN.md`) -- the `regex` crate is already part of
/// this crate's dependency stack for that reason, not `tantivy_fst`'s
/// own automaton support.
#[derive(Debug, Clone)]
pub struct RegexQuery {
    field: Field,
    pattern: String,
}

impl RegexQuery {
    pub fn from_pattern(field: Field, pattern: &str) -> Result<RegexQuery> {
        // Validated eagerly so a malformed pattern fails at query
        // construction rather than silently matching nothing per segment.
        Regex::new(pattern).map_err(|err| TantivyError::InvalidArgument(err.to_string()))?;
        Ok(RegexQuery {
            field,
            pattern: pattern.to_string(),
        })
    }
}

impl Query for RegexQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let field_type = schema.get_field_entry(self.field).field_type().clone();
        let record_option = crate::postings::IndexRecordOption::for_field_type(&field_type);
        let regex = Regex::new(&self.pattern).map_err(|err| TantivyError::InvalidArgument(err.to_string()))?;
        Ok(Box::new(RegexWeight {
            field: self.field,
            regex,
            record_option,
        }))
    }
}

struct RegexWeight {
    field: Field,
    regex: Regex,
    record_option: crate::postings::IndexRecordOption,
}

impl Weight for RegexWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        use crate::schema::Term;

        let field_prefix = Term::for_field(self.field);
        let inverted_index = reader.inverted_index(self.field);

        let mut matched_terms = Vec::new();
        let mut cursor = inverted_index.terms_ge(&field_prefix);
        while let Some((key, term_info)) = cursor.next() {
            if !key.starts_with(field_prefix.as_slice()) {
                break;
            }
            let value = &key[field_prefix.as_slice().len()..];
            if let Ok(text) = std::str::from_utf8(value) {
                if self.regex.is_match(text) {
                    matched_terms.push((Term::from_field_bytes(self.field, value), term_info));
                }
            }
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

/// Translates a `*`/`?` glob into an anchored regex and matches it the
/// same way `RegexQuery` does (§6 "Query tree": `Wildcard(field,
/// pattern)`). `*` becomes `.*`, `?` becomes `.`, and every other regex
/// metacharacter in the input is escaped first so a literal `.` or `+`
/// in the glob stays literal.
#[derive(Debug, Clone)]
pub struct WildcardQuery(RegexQuery);

impl WildcardQuery {
    pub fn from_pattern(field: Field, glob: &str) -> Result<WildcardQuery> {
        Ok(WildcardQuery(RegexQuery::from_pattern(field, &glob_to_regex(glob))?))
    }
}

impl Query for WildcardQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        self.0.weight(schema)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() + 2);
    pattern.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(&ch.to_string())),
        }
    }
    pattern.push('$');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, TEXT};
    use crate::{doc, Index};

    #[test]
    fn test_regex_query_matches_full_term() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for text in &["bear", "bearable", "beer"] {
            writer.add_document(doc!(title => *text)).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = RegexQuery::from_pattern(title, "bear.*").unwrap();
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_wildcard_query_matches_glob() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for text in &["bear", "bearable", "beer"] {
            writer.add_document(doc!(title => *text)).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = WildcardQuery::from_pattern(title, "be?r").unwrap();
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 2);
    }
}
