use crate::query::union::Union;
use crate::query::{Query, Scorer, TermQuery, Weight};
use crate::schema::{Schema, Term};
use crate::Result;

/// Matches any of a caller-supplied set of term variants, each scored
/// and summed like an ordinary `Should` union (§6 "Query tree":
/// `Variations(field, terms[])`; §1 Non-goal: "no embedded stemmer or
/// language model" -- a host application runs its own stemmer/synonym
/// expansion and hands the resulting surface forms to this query rather
/// than this crate owning that analysis). Equivalent to a `BooleanQuery`
/// of `Should` `TermQuery` clauses, offered as a named shorthand since
/// "expand this term to its known variants" is a common enough caller
/// need to not require rebuilding a `BooleanQuery` by hand each time.
#[derive(Debug, Clone)]
pub struct VariationsQuery {
    variants: Vec<Term>,
}

impl VariationsQuery {
    /// `variants` must be non-empty and every term must be on the same
    /// field; which stemmer, normalizer or synonym table produced them
    /// is entirely up to the caller.
    pub fn new(variants: Vec<Term>) -> VariationsQuery {
        assert!(!variants.is_empty(), "VariationsQuery needs at least one variant term");
        VariationsQuery { variants }
    }
}

impl Query for VariationsQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let term_weights = self
            .variants
            .iter()
            .map(|term| TermQuery::new(term.clone()).weight(schema))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(VariationsWeight { term_weights }))
    }
}

struct VariationsWeight {
    term_weights: Vec<Box<dyn Weight>>,
}

impl Weight for VariationsWeight {
    fn scorer(&self, reader: &crate::core::SegmentReader) -> Result<Box<dyn Scorer>> {
        let mut scorers = Vec::with_capacity(self.term_weights.len());
        for weight in &self.term_weights {
            scorers.push(weight.scorer(reader)?);
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
    use crate::{doc, Index};

    #[test]
    fn test_variations_query_matches_any_surface_form() {
        let mut builder = Schema::builder();
        let body = builder.add_text_field("body", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        writer.add_document(doc!(body => "the dog runs")).unwrap();
        writer.add_document(doc!(body => "the dog ran")).unwrap();
        writer.add_document(doc!(body => "the dog sleeps")).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = VariationsQuery::new(vec![
            Term::from_field_text(body, "runs"),
            Term::from_field_text(body, "ran"),
        ]);
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 2);
    }

    /// Demonstrates the intended host-side collaboration: an external
    /// analyzer (here, `rust_stemmers`) is what would supply the variant
    /// surface forms a caller hands to `VariationsQuery::new` -- this
    /// crate has no stemmer of its own (§1 Non-goal), so a host
    /// indexing "runners" and "running" under their shared stem would
    /// stem both at index time with the same analyzer and then query
    /// with that stem directly as a single `TermQuery`, or else collect
    /// every surface form it knows about into one `VariationsQuery`.
    #[test]
    fn test_external_stemmer_produces_variant_surface_forms() {
        use rust_stemmers::{Algorithm, Stemmer};

        let stemmer = Stemmer::create(Algorithm::English);
        assert_eq!(stemmer.stem("running").into_owned(), stemmer.stem("runs").into_owned());

        let mut builder = Schema::builder();
        let body = builder.add_text_field("body", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        let stem = stemmer.stem("running").into_owned();
        writer.add_document(doc!(body => stem.clone())).unwrap();
        writer.add_document(doc!(body => "a quiet walk")).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = VariationsQuery::new(vec![Term::from_field_text(body, &stem)]);
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 1);
    }
}
