use crate::query::scorer::SkipResult;
use crate::query::{DocSet, Scorer, TermMatcher};
use crate::DocId;
use crate::Score;

/// OR over any number of child scorers (§4.3 "Union (OR)"): on each
/// `advance`, every child still sitting on the previously emitted doc
/// is itself advanced, then the new current doc is the minimum among
/// whatever children remain active. Score is the sum of the scores of
/// every child currently sitting on that doc.
///
/// Children are scanned linearly rather than through a min-heap --
/// clause counts in a `BooleanQuery` are small in practice, and this
/// keeps the combinator trivially correct. The spec's large-fanout
/// bitmap-matcher threshold (§4.3: "Large unions over small indexes
/// switch to a pre-loaded bitmap matcher") is a documented
/// simplification left unimplemented (see `DESIGN.md`).
pub struct Union {
    children: Vec<Box<dyn Scorer>>,
    active: Vec<bool>,
    current_doc: Option<DocId>,
}

impl Union {
    pub fn build(mut children: Vec<Box<dyn Scorer>>) -> Union {
        let active: Vec<bool> = children.iter_mut().map(|child| child.advance()).collect();
        Union {
            children,
            active,
            current_doc: None,
        }
    }
}

impl DocSet for Union {
    fn advance(&mut self) -> bool {
        if let Some(prev) = self.current_doc {
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
        self.children.iter().map(|child| child.size_hint()).sum()
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        self.children.iter().flat_map(|child| child.term_matchers()).collect()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        self.children
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.active[*idx])
            .flat_map(|(_, child)| child.matching_terms(docid))
            .collect()
    }
}

impl Scorer for Union {
    fn score(&mut self) -> Score {
        let doc = self.current_doc.unwrap_or(u32::MAX);
        let mut total = 0.0;
        for (idx, child) in self.children.iter_mut().enumerate() {
            if self.active[idx] && child.doc() == doc {
                total += child.score();
            }
        }
        total
    }

    /// Every child could in principle contribute on the same doc, so
    /// the bound is a sum, not a max (§4.3 "Union" scores by summing).
    fn max_quality(&self) -> Score {
        self.children.iter().map(|child| child.max_quality()).sum()
    }

    fn skip_to_quality(&mut self, min_quality: Score) -> SkipResult {
        if self.max_quality() >= min_quality {
            SkipResult::Reached
        } else {
            SkipResult::End
        }
    }

    /// Drops children whose own `max_quality` can no longer matter once
    /// a collector has raised its threshold past what the *rest* of the
    /// union could make up for -- a child surviving alone still needs to
    /// clear `min_quality` on its own.
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
    fn test_union_merges_and_dedups() {
        let a = ConstScorer::new(VecDocSet { docs: vec![1, 3, 5], cursor: None }, 1.0);
        let b = ConstScorer::new(VecDocSet { docs: vec![2, 3, 6], cursor: None }, 1.0);
        let mut union = Union::build(vec![Box::new(a), Box::new(b)]);
        let mut seen = Vec::new();
        while union.advance() {
            seen.push(union.doc());
        }
        assert_eq!(seen, vec![1, 2, 3, 5, 6]);
    }

    #[test]
    fn test_union_sums_scores_on_overlap() {
        let a = ConstScorer::new(VecDocSet { docs: vec![3], cursor: None }, 1.0);
        let b = ConstScorer::new(VecDocSet { docs: vec![3], cursor: None }, 2.0);
        let mut union = Union::build(vec![Box::new(a), Box::new(b)]);
        assert!(union.advance());
        assert_eq!(union.doc(), 3);
        assert_eq!(union.score(), 3.0);
    }
}
