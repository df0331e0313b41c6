use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder, DFA, SINK_STATE};
use tantivy_fst::Automaton;

use crate::core::SegmentReader;
use crate::query::bm25::Bm25Weight;
use crate::query::term_query::TermScorer;
use crate::query::union::Union;
use crate::query::{EmptyScorer, Query, Scorer, Weight};
use crate::schema::{Schema, Term};
use crate::Result;

/// Adapts a `levenshtein_automata::DFA` to the FST crate's `Automaton`
/// trait, so the term dictionary's FST can intersect with it directly
/// instead of evaluating the DFA against every candidate byte string.
struct DfaWrapper(DFA);

impl Automaton for DfaWrapper {
    type State = u32;

    fn start(&self) -> u32 {
        self.0.initial_state()
    }

    fn is_match(&self, state: &u32) -> bool {
        matches!(self.0.distance(*state), Distance::Exact(_))
    }

    fn can_match(&self, state: &u32) -> bool {
        *state != SINK_STATE
    }

    fn accept(&self, state: &u32, byte: u8) -> u32 {
        self.0.transition(*state, byte)
    }
}

/// The dictionary backing every field shares one FST (§4.2), so a
/// fuzzy search needs to scope the DFA to one field's key range itself:
/// match `field_prefix` literally first, then hand remaining bytes to
/// the DFA. A mismatched prefix byte moves to a dead state that never
/// matches and never keeps matching, pruning that whole FST subtree.
struct FieldScopedDfa {
    field_prefix: Vec<u8>,
    dfa: DfaWrapper,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PrefixState {
    Matching(usize),
    Dead,
    InDfa(u32),
}

impl Automaton for FieldScopedDfa {
    type State = PrefixState;

    fn start(&self) -> PrefixState {
        if self.field_prefix.is_empty() {
            PrefixState::InDfa(self.dfa.start())
        } else {
            PrefixState::Matching(0)
        }
    }

    fn is_match(&self, state: &PrefixState) -> bool {
        match state {
            PrefixState::InDfa(s) => self.dfa.is_match(s),
            _ => false,
        }
    }

    fn can_match(&self, state: &PrefixState) -> bool {
        match state {
            PrefixState::Dead => false,
            PrefixState::Matching(_) => true,
            PrefixState::InDfa(s) => self.dfa.can_match(s),
        }
    }

    fn accept(&self, state: &PrefixState, byte: u8) -> PrefixState {
        match state {
            PrefixState::Dead => PrefixState::Dead,
            PrefixState::Matching(consumed) => {
                if self.field_prefix[*consumed] != byte {
                    return PrefixState::Dead;
                }
                let next = consumed + 1;
                if next == self.field_prefix.len() {
                    PrefixState::InDfa(self.dfa.start())
                } else {
                    PrefixState::Matching(next)
                }
            }
            PrefixState::InDfa(s) => PrefixState::InDfa(self.dfa.accept(s, byte)),
        }
    }
}

/// Matches terms within Levenshtein edit distance `distance` of a query
/// term (§4.7 "Automata"). Candidates are found by intersecting the
/// query's Levenshtein DFA with the segment's term dictionary FST
/// (`FieldScopedDfa`, above), visiting only the dictionary paths the
/// DFA can still accept -- `O(|dictionary ∩ DFA|)`, not a scan of the
/// field's whole dictionary slice.
#[derive(Debug, Clone)]
pub struct FuzzyTermQuery {
    term: Term,
    distance: u8,
    transposition_cost_one: bool,
}

impl FuzzyTermQuery {
    pub fn new(term: Term, distance: u8, transposition_cost_one: bool) -> FuzzyTermQuery {
        FuzzyTermQuery {
            term,
            distance,
            transposition_cost_one,
        }
    }
}

impl Query for FuzzyTermQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let field_type = schema.get_field_entry(self.term.field()).field_type().clone();
        let record_option = crate::postings::IndexRecordOption::for_field_type(&field_type);
        Ok(Box::new(FuzzyTermWeight {
            term: self.term.clone(),
            record_option,
            distance: self.distance,
            transposition_cost_one: self.transposition_cost_one,
        }))
    }
}

struct FuzzyTermWeight {
    term: Term,
    record_option: crate::postings::IndexRecordOption,
    distance: u8,
    transposition_cost_one: bool,
}

impl Weight for FuzzyTermWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        let builder = LevenshteinAutomatonBuilder::new(self.distance, self.transposition_cost_one);
        let query_text = std::str::from_utf8(self.term.value_bytes()).unwrap_or("");
        let dfa = builder.build_dfa(query_text);

        let field = self.term.field();
        let field_prefix = Term::for_field(field);
        let field_prefix_len = field_prefix.as_slice().len();
        let inverted_index = reader.inverted_index(field);

        let automaton = FieldScopedDfa {
            field_prefix: field_prefix.as_slice().to_vec(),
            dfa: DfaWrapper(dfa),
        };

        let mut matched_terms = Vec::new();
        let mut cursor = inverted_index.terms_matching(automaton);
        while let Some((key, term_info)) = cursor.next() {
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
    use crate::schema::{SchemaBuilder, STRING};
    use crate::Index;

    #[test]
    fn test_fuzzy_term_matches_within_edit_distance() {
        let mut builder = SchemaBuilder::default();
        let title = builder.add_text_field("title", STRING);
        let schema = builder.build();
        let index = Index::create_in_ram(schema.clone());
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for text in &["rust", "rustic", "dust", "gold"] {
            let mut doc = crate::schema::Document::default();
            doc.add_text(title, text);
            writer.add_document(doc).unwrap();
        }
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = FuzzyTermQuery::new(Term::from_field_text(title, "rust"), 1, false);
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_fuzzy_term_scopes_to_one_field() {
        let mut builder = SchemaBuilder::default();
        let title = builder.add_text_field("title", STRING);
        let body = builder.add_text_field("body", STRING);
        let schema = builder.build();
        let index = Index::create_in_ram(schema.clone());
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        let mut doc = crate::schema::Document::default();
        doc.add_text(title, "rust");
        doc.add_text(body, "rust");
        writer.add_document(doc).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = FuzzyTermQuery::new(Term::from_field_text(body, "rust"), 0, false);
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 1);
    }
}
