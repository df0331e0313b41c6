use crate::core::SegmentReader;
use crate::query::{DocSet, Query, Scorer, TermMatcher, Weight};
use crate::schema::Schema;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Matches whatever any child matches, but scores by the single best
/// child's score plus a fraction (`tie_breaker`) of the rest, rather
/// than summing every child like `Union`/`Should` does (§6 "Query
/// tree": `DisjunctionMax(queries[], tie_breaker)`). Useful for
/// "same concept, several fields" clauses (title/body/tags) where
/// double-counting a hit that happens to appear in more than one field
/// would over-reward it relative to a hit that is simply a better match
/// in one field.
#[derive(Debug)]
pub struct DisjunctionMaxQuery {
    disjuncts: Vec<Box<dyn Query>>,
    tie_breaker: f32,
}

impl DisjunctionMaxQuery {
    pub fn new(disjuncts: Vec<Box<dyn Query>>, tie_breaker: f32) -> DisjunctionMaxQuery {
        assert!(!disjuncts.is_empty(), "DisjunctionMaxQuery needs at least one clause");
        DisjunctionMaxQuery { disjuncts, tie_breaker }
    }
}

impl Query for DisjunctionMaxQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let child_weights = self
            .disjuncts
            .iter()
            .map(|query| query.weight(schema))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(DisjunctionMaxWeight {
            child_weights,
            tie_breaker: self.tie_breaker,
        }))
    }
}

struct DisjunctionMaxWeight {
    child_weights: Vec<Box<dyn Weight>>,
    tie_breaker: f32,
}

impl Weight for DisjunctionMaxWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        let mut scorers = Vec::with_capacity(self.child_weights.len());
        for weight in &self.child_weights {
            scorers.push(weight.scorer(reader)?);
        }
        Ok(Box::new(DisjunctionMaxScorer {
            children: scorers,
            active: vec![],
            current_doc: None,
            tie_breaker: self.tie_breaker,
        }))
    }
}

struct DisjunctionMaxScorer {
    children: Vec<Box<dyn Scorer>>,
    active: Vec<bool>,
    current_doc: Option<DocId>,
    tie_breaker: f32,
}

impl DocSet for DisjunctionMaxScorer {
    fn advance(&mut self) -> bool {
        if self.active.is_empty() {
            self.active = self.children.iter_mut().map(|child| child.advance()).collect();
        } else if let Some(prev) = self.current_doc {
            for (idx, child) in self.children.iter_mut().enumerate() {
                if self.active[idx] && child.doc() == prev {
                    self.active[idx] = child.advance();
                }
            }
        }
        let min = self
            .children
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.active[*idx])
            .map(|(_, child)| child.doc())
            .min();
        self.current_doc = min;
        min.is_some()
    }

    fn doc(&self) -> DocId {
        self.current_doc.unwrap_or(u32::MAX)
    }

    fn size_hint(&self) -> u32 {
        self.children.iter().map(|child| child.size_hint()).max().unwrap_or(0)
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        self.children.iter().flat_map(|child| child.term_matchers()).collect()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        self.children.iter().flat_map(|child| child.matching_terms(docid)).collect()
    }
}

impl Scorer for DisjunctionMaxScorer {
    fn score(&mut self) -> Score {
        let doc = self.doc();
        let mut best = 0.0f32;
        let mut rest_sum = 0.0f32;
        for (idx, child) in self.children.iter_mut().enumerate() {
            if self.active[idx] && child.doc() == doc {
                let score = child.score();
                if score > best {
                    rest_sum += best;
                    best = score;
                } else {
                    rest_sum += score;
                }
            }
        }
        best + self.tie_breaker * rest_sum
    }

    /// Mirrors `score`'s shape: the best child dominates, the rest only
    /// contribute `tie_breaker`-scaled.
    fn max_quality(&self) -> Score {
        let mut qualities: Vec<Score> = self.children.iter().map(|child| child.max_quality()).collect();
        qualities.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let best = qualities.first().copied().unwrap_or(0.0);
        let rest: Score = qualities.iter().skip(1).sum();
        best + self.tie_breaker * rest
    }

    /// Drops children that couldn't reach `min_quality` even in their
    /// single most favorable case -- becoming the dismax's sole best
    /// match, undiscounted by `tie_breaker` (§4.3 "periodic replace").
    /// Any other role they could play only contributes less.
    fn replace(&mut self, min_quality: Score) {
        for (idx, child) in self.children.iter_mut().enumerate() {
            if self.active[idx] && child.supports_block_quality() && child.max_quality() < min_quality {
                self.active[idx] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Query, TermQuery};
    use crate::schema::{Schema, TEXT};
    use crate::{doc, Index, Term};

    #[test]
    fn test_dismax_scores_by_best_child_plus_tiebreak() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let body = builder.add_text_field("body", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        writer.add_document(doc!(title => "rust", body => "a systems language")).unwrap();
        writer.add_document(doc!(title => "other", body => "rust rust rust")).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = DisjunctionMaxQuery::new(
            vec![
                Box::new(TermQuery::new(Term::from_field_text(title, "rust"))) as Box<dyn Query>,
                Box::new(TermQuery::new(Term::from_field_text(body, "rust"))) as Box<dyn Query>,
            ],
            0.1,
        );
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 2);
    }
}
