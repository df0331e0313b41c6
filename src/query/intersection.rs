use crate::query::{DocSet, Scorer, TermMatcher};
use crate::DocId;
use crate::Score;

/// AND over two or more child scorers (§4.3 "Intersection (AND)"):
/// repeatedly skip the child(ren) behind the current maximum id forward
/// until every child agrees, or one is exhausted. Score is the sum of
/// every child's score at the agreed-upon doc.
pub struct Intersection {
    children: Vec<Box<dyn Scorer>>,
    current_doc: Option<DocId>,
}

impl Intersection {
    pub fn build(children: Vec<Box<dyn Scorer>>) -> Intersection {
        assert!(children.len() >= 2, "intersection needs at least two children");
        Intersection {
            children,
            current_doc: None,
        }
    }

    /// Advances every child to the first doc `>= target`, retrying with
    /// the new maximum until they all land on the same doc or one runs
    /// out.
    fn align_from(&mut self, mut target: DocId) -> bool {
        'outer: loop {
            for child in &mut self.children {
                if !child.skip_to(target) {
                    return false;
                }
                if child.doc() > target {
                    target = child.doc();
                    continue 'outer;
                }
            }
            return true;
        }
    }
}

impl DocSet for Intersection {
    fn advance(&mut self) -> bool {
        let target = match self.current_doc {
            Some(doc) => doc + 1,
            None => 0,
        };
        if self.align_from(target) {
            self.current_doc = Some(self.children[0].doc());
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
        if self.align_from(target) {
            self.current_doc = Some(self.children[0].doc());
            true
        } else {
            self.current_doc = None;
            false
        }
    }

    fn size_hint(&self) -> u32 {
        self.children.iter().map(|child| child.size_hint()).min().unwrap_or(0)
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        self.children.iter().flat_map(|child| child.term_matchers()).collect()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        self.children.iter().flat_map(|child| child.matching_terms(docid)).collect()
    }
}

impl Scorer for Intersection {
    fn score(&mut self) -> Score {
        self.children.iter_mut().map(|child| child.score()).sum()
    }

    /// Every child must match for the intersection to match at all, so
    /// the bound is still a sum of every child's own bound.
    fn max_quality(&self) -> Score {
        self.children.iter().map(|child| child.max_quality()).sum()
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
    fn test_intersection_keeps_common_docs_only() {
        let a = ConstScorer::new(VecDocSet { docs: vec![1, 2, 3, 5], cursor: None }, 1.0);
        let b = ConstScorer::new(VecDocSet { docs: vec![2, 3, 4, 5], cursor: None }, 1.0);
        let mut intersection = Intersection::build(vec![Box::new(a), Box::new(b)]);
        let mut seen = Vec::new();
        while intersection.advance() {
            seen.push(intersection.doc());
        }
        assert_eq!(seen, vec![2, 3, 5]);
    }
}
