use crate::schema::{Field, Term};
use crate::DocId;

/// One leaf term a matcher (or one of its descendants) is built from
/// (§4.3 "term_matchers"/"matching_terms"), for explain-style tooling
/// that needs to know which terms actually produced a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatcher {
    pub field: Field,
    pub term: Term,
}

impl TermMatcher {
    pub fn new(field: Field, term: Term) -> TermMatcher {
        TermMatcher { field, term }
    }
}

/// A cursor over a strictly ascending sequence of docids (§4.3 "Matcher
/// engine"). Every matcher, from a term leaf up through the Boolean/
/// Phrase combinators, implements this; `Scorer` only adds a `score()`
/// on top.
pub trait DocSet: Send {
    /// Advances to the next matching doc, returning whether one
    /// exists. The very first call positions the cursor on the first
    /// match rather than skipping it -- matching `SegmentPostings`'
    /// own `advance` convention.
    fn advance(&mut self) -> bool;

    /// The current doc. Meaningless before the first `advance()`
    /// returns `true`.
    fn doc(&self) -> DocId;

    /// Advances to the first doc `>= target`, returning whether one
    /// exists. The default walks one doc at a time; leaf matchers over
    /// `SegmentPostings` override this with a real skip.
    fn skip_to(&mut self, target: DocId) -> bool {
        if !self.advance() {
            return false;
        }
        while self.doc() < target {
            if !self.advance() {
                return false;
            }
        }
        true
    }

    /// A cheap, possibly loose upper bound on the number of remaining
    /// matches. Never load-bearing for correctness -- collectors use it
    /// only to size buffers.
    fn size_hint(&self) -> u32 {
        0
    }

    /// Every leaf term this matcher is built from, depth-first and in
    /// no particular order. Empty for matchers with no underlying term
    /// (`AllQuery`, range/filter-style leaves).
    fn term_matchers(&self) -> Vec<TermMatcher> {
        Vec::new()
    }

    /// The subset of `term_matchers()` that actually contributed to the
    /// match at `docid` -- all-or-nothing for a leaf, whichever children
    /// are sitting on `docid` for a combinator.
    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        let _ = docid;
        Vec::new()
    }

    /// Cheap, allocation-free snapshot of the current position, so a
    /// caller can look ahead and come back (§4.3 "save/restore").
    /// The default snapshots just the current doc and `restore` re-seeks
    /// via `skip_to` -- correct for every matcher, since docids are
    /// strictly ascending, though not truly O(1) the way a matcher with
    /// its own cursor stack could make it.
    fn save(&self) -> DocId {
        self.doc()
    }

    /// Restores a position taken with `save`. Returns whether a doc was
    /// actually recovered, mirroring `advance`/`skip_to`.
    fn restore(&mut self, saved: DocId) -> bool {
        if saved == u32::MAX {
            return false;
        }
        self.skip_to(saved)
    }
}
