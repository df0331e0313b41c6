use crate::query::{DocSet, Scorer, TermMatcher};
use crate::DocId;
use crate::Score;

/// `A AND NOT B` (§4.3 "AndNot"): emits `A`'s docs that aren't also in
/// `B`, scored from `A` alone. `B` is only ever advanced lazily via
/// `skip_to`, never fully materialized.
pub struct Exclude {
    include: Box<dyn Scorer>,
    exclude: Box<dyn Scorer>,
    exclude_exhausted: bool,
}

impl Exclude {
    pub fn build(include: Box<dyn Scorer>, mut exclude: Box<dyn Scorer>) -> Exclude {
        let exclude_exhausted = !exclude.advance();
        Exclude {
            include,
            exclude,
            exclude_exhausted,
        }
    }

    fn excluded_at(&self, doc: DocId) -> bool {
        !self.exclude_exhausted && self.exclude.doc() == doc
    }
}

impl DocSet for Exclude {
    fn advance(&mut self) -> bool {
        loop {
            if !self.include.advance() {
                return false;
            }
            let doc = self.include.doc();
            if !self.exclude_exhausted && self.exclude.doc() < doc {
                self.exclude_exhausted = !self.exclude.skip_to(doc);
            }
            if !self.excluded_at(doc) {
                return true;
            }
        }
    }

    fn doc(&self) -> DocId {
        self.include.doc()
    }

    fn size_hint(&self) -> u32 {
        self.include.size_hint()
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        self.include.term_matchers()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        self.include.matching_terms(docid)
    }
}

impl Scorer for Exclude {
    fn score(&mut self) -> Score {
        self.include.score()
    }

    fn supports_block_quality(&self) -> bool {
        self.include.supports_block_quality()
    }

    fn max_quality(&self) -> Score {
        self.include.max_quality()
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
    fn test_exclude_drops_docs_present_in_b() {
        let a = ConstScorer::new(VecDocSet { docs: vec![1, 2, 3, 4], cursor: None }, 1.0);
        let b = ConstScorer::new(VecDocSet { docs: vec![2, 4], cursor: None }, 1.0);
        let mut exclude = Exclude::build(Box::new(a), Box::new(b));
        let mut seen = Vec::new();
        while exclude.advance() {
            seen.push(exclude.doc());
        }
        assert_eq!(seen, vec![1, 3]);
    }
}
