use crate::query::{DocSet, Scorer, TermMatcher};
use crate::DocId;
use crate::Score;

/// `Require(A, B)` (§4.3 "Require"): emits `A ∩ B` like `Intersection`,
/// but scores from `A` alone -- used when `B` only narrows the result
/// set and shouldn't influence ranking (e.g. a filter clause).
pub struct Require {
    scored: Box<dyn Scorer>,
    filter: Box<dyn Scorer>,
    current_doc: Option<DocId>,
}

impl Require {
    pub fn build(scored: Box<dyn Scorer>, filter: Box<dyn Scorer>) -> Require {
        Require {
            scored,
            filter,
            current_doc: None,
        }
    }

    fn align(&mut self, mut target: DocId) -> bool {
        loop {
            if !self.scored.skip_to(target) {
                return false;
            }
            let doc = self.scored.doc();
            if !self.filter.skip_to(doc) {
                return false;
            }
            if self.filter.doc() == doc {
                return true;
            }
            target = self.filter.doc();
        }
    }
}

impl DocSet for Require {
    fn advance(&mut self) -> bool {
        let target = match self.current_doc {
            Some(doc) => doc + 1,
            None => 0,
        };
        if self.align(target) {
            self.current_doc = Some(self.scored.doc());
            true
        } else {
            self.current_doc = None;
            false
        }
    }

    fn doc(&self) -> DocId {
        self.current_doc.unwrap_or(u32::MAX)
    }

    fn skip_to(&mut self, target: DocId) -> bool {
        if self.align(target) {
            self.current_doc = Some(self.scored.doc());
            true
        } else {
            self.current_doc = None;
            false
        }
    }

    fn size_hint(&self) -> u32 {
        self.scored.size_hint().min(self.filter.size_hint())
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        self.scored.term_matchers()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        self.scored.matching_terms(docid)
    }
}

impl Scorer for Require {
    fn score(&mut self) -> Score {
        self.scored.score()
    }

    fn supports_block_quality(&self) -> bool {
        self.scored.supports_block_quality()
    }

    fn max_quality(&self) -> Score {
        self.scored.max_quality()
    }
}

/// `AndMaybe(A, B)` (§4.3 "AndMaybe"): emits every doc of `A`; if `B`
/// also matches that doc, its score is added in, otherwise only `A`'s
/// score counts. `B` is advanced lazily via `skip_to(A.id)`.
pub struct AndMaybe {
    required: Box<dyn Scorer>,
    optional: Box<dyn Scorer>,
    optional_exhausted: bool,
    current_doc: Option<DocId>,
}

impl AndMaybe {
    pub fn build(required: Box<dyn Scorer>, mut optional: Box<dyn Scorer>) -> AndMaybe {
        let optional_exhausted = !optional.advance();
        AndMaybe {
            required,
            optional,
            optional_exhausted,
            current_doc: None,
        }
    }

    fn optional_matches(&self, doc: DocId) -> bool {
        !self.optional_exhausted && self.optional.doc() == doc
    }
}

impl DocSet for AndMaybe {
    fn advance(&mut self) -> bool {
        if !self.required.advance() {
            self.current_doc = None;
            return false;
        }
        let doc = self.required.doc();
        if !self.optional_exhausted && self.optional.doc() < doc {
            self.optional_exhausted = !self.optional.skip_to(doc);
        }
        self.current_doc = Some(doc);
        true
    }

    fn doc(&self) -> DocId {
        self.current_doc.unwrap_or(u32::MAX)
    }

    fn size_hint(&self) -> u32 {
        self.required.size_hint()
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        let mut matchers = self.required.term_matchers();
        matchers.extend(self.optional.term_matchers());
        matchers
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        let mut matchers = self.required.matching_terms(docid);
        if self.optional_matches(docid) {
            matchers.extend(self.optional.matching_terms(docid));
        }
        matchers
    }
}

impl Scorer for AndMaybe {
    fn score(&mut self) -> Score {
        let doc = self.doc();
        if self.optional_matches(doc) {
            self.required.score() + self.optional.score()
        } else {
            self.required.score()
        }
    }

    /// `optional` can add to the score but never subtracts, so the
    /// bound is both children's bounds summed.
    fn max_quality(&self) -> Score {
        self.required.max_quality() + self.optional.max_quality()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ConstScorer;

    struct VecDocSet {
        docs: Vec<DocId>,
        cursor: Option<usize>,
    }
    impl DocSet for VecDocSet {
        fn advance(&mut self) -> bool {
            let next = self.cursor.map(|c| c + 1).unwrap_or(0);
            self.cursor = Some(next);
            next < self.docs.len()
        }
        fn doc(&self) -> DocId {
            self.docs[self.cursor.unwrap()]
        }
    }

    #[test]
    fn test_require_keeps_a_score_only() {
        let a = ConstScorer::new(VecDocSet { docs: vec![1, 2, 3], cursor: None }, 5.0);
        let b = ConstScorer::new(VecDocSet { docs: vec![2, 3], cursor: None }, 100.0);
        let mut require = Require::build(Box::new(a), Box::new(b));
        let mut seen = Vec::new();
        while require.advance() {
            seen.push((require.doc(), require.score()));
        }
        assert_eq!(seen, vec![(2, 5.0), (3, 5.0)]);
    }

    #[test]
    fn test_and_maybe_adds_optional_score_when_present() {
        let a = ConstScorer::new(VecDocSet { docs: vec![1, 2, 3], cursor: None }, 1.0);
        let b = ConstScorer::new(VecDocSet { docs: vec![2], cursor: None }, 10.0);
        let mut and_maybe = AndMaybe::build(Box::new(a), Box::new(b));
        let mut seen = Vec::new();
        while and_maybe.advance() {
            seen.push((and_maybe.doc(), and_maybe.score()));
        }
        assert_eq!(seen, vec![(1, 1.0), (2, 11.0), (3, 1.0)]);
    }
}
