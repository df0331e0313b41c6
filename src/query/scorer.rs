use crate::query::doc_set::TermMatcher;
use crate::query::DocSet;
use crate::DocId;
use crate::Score;

/// Outcome of `Scorer::skip_to_quality` (§4.3 "block-max skip
/// optimization").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipResult {
    /// A doc whose block could still reach the threshold is current --
    /// the caller still needs `advance`/`skip_to` to confirm an actual
    /// match.
    Reached,
    /// Nothing from the current position on could reach the threshold;
    /// this scorer is done contributing.
    End,
}

/// A `DocSet` that also knows the current doc's relevance score (§4.4
/// "Scorer"). `Weight::scorer` is the one place a query tree is turned
/// into one of these, per segment.
pub trait Scorer: DocSet {
    /// The current doc's score. Only meaningful once `advance`/`skip_to`
    /// has returned `true` at least once.
    fn score(&mut self) -> Score;

    /// Whether `max_quality`/`block_quality`/`skip_to_quality` carry
    /// real, tighter-than-default information for this scorer. Leaf
    /// term scorers back this with `SegmentPostings`' per-block
    /// summaries; most combinators just propagate a looser bound
    /// derived from their children.
    fn supports_block_quality(&self) -> bool {
        false
    }

    /// Upper bound on `score()` across every doc this scorer could still
    /// produce, current position onward. The default of `+infinity`
    /// means "no usable bound" -- safe (never prunes a real match) but
    /// useless for skipping.
    fn max_quality(&self) -> Score {
        Score::INFINITY
    }

    /// Tighter upper bound on `score()` within whatever block-sized unit
    /// covers the current position. Defaults to `max_quality()` for
    /// scorers with no finer-grained notion of "block".
    fn block_quality(&self) -> Score {
        self.max_quality()
    }

    /// Advances past any block that provably cannot reach `min_quality`,
    /// without necessarily landing on an actual match -- callers still
    /// need `advance`/`skip_to` afterward to confirm one. The default
    /// has no block structure to skip over, so it just reports whether
    /// this scorer could clear the bar at all from here on.
    fn skip_to_quality(&mut self, min_quality: Score) -> SkipResult {
        if self.max_quality() >= min_quality {
            SkipResult::Reached
        } else {
            SkipResult::End
        }
    }

    /// Called periodically by a top-k collector once it has tightened
    /// its `min_quality` threshold, so a scorer holding several
    /// sub-scorers can drop ones that can no longer contribute (§4.3
    /// "periodic replace"). Default is a no-op -- only combinators that
    /// actually hold replaceable children override it.
    fn replace(&mut self, min_quality: Score) {
        let _ = min_quality;
    }

    /// Every span the current doc matched, for scorers built from a
    /// span query (§4.5 "with_spans(fields?)"). Empty for every scorer
    /// that isn't span-aware -- overridden only by `SpanScorerAdapter`,
    /// which forwards to the `SpanScorer` it wraps.
    fn matched_spans(&self) -> Vec<crate::query::span::Span> {
        Vec::new()
    }
}

impl DocSet for Box<dyn Scorer> {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn doc(&self) -> DocId {
        (**self).doc()
    }

    fn skip_to(&mut self, target: DocId) -> bool {
        (**self).skip_to(target)
    }

    fn size_hint(&self) -> u32 {
        (**self).size_hint()
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        (**self).term_matchers()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        (**self).matching_terms(docid)
    }

    fn save(&self) -> DocId {
        (**self).save()
    }

    fn restore(&mut self, saved: DocId) -> bool {
        (**self).restore(saved)
    }
}

impl Scorer for Box<dyn Scorer> {
    fn score(&mut self) -> Score {
        (**self).score()
    }

    fn supports_block_quality(&self) -> bool {
        (**self).supports_block_quality()
    }

    fn max_quality(&self) -> Score {
        (**self).max_quality()
    }

    fn block_quality(&self) -> Score {
        (**self).block_quality()
    }

    fn skip_to_quality(&mut self, min_quality: Score) -> SkipResult {
        (**self).skip_to_quality(min_quality)
    }

    fn replace(&mut self, min_quality: Score) {
        (**self).replace(min_quality)
    }
}

/// A scorer that always returns a fixed score regardless of doc,
/// wrapping a plain `DocSet`. Used by filter-style queries (`AllQuery`,
/// range/prefix enumeration) whose relevance is the same for every
/// match.
pub struct ConstScorer<D> {
    docset: D,
    score: Score,
}

impl<D: DocSet> ConstScorer<D> {
    pub fn new(docset: D, score: Score) -> ConstScorer<D> {
        ConstScorer { docset, score }
    }
}

impl<D: DocSet> DocSet for ConstScorer<D> {
    fn advance(&mut self) -> bool {
        self.docset.advance()
    }

    fn doc(&self) -> DocId {
        self.docset.doc()
    }

    fn skip_to(&mut self, target: DocId) -> bool {
        self.docset.skip_to(target)
    }

    fn size_hint(&self) -> u32 {
        self.docset.size_hint()
    }

    fn term_matchers(&self) -> Vec<TermMatcher> {
        self.docset.term_matchers()
    }

    fn matching_terms(&self, docid: DocId) -> Vec<TermMatcher> {
        self.docset.matching_terms(docid)
    }

    fn save(&self) -> DocId {
        self.docset.save()
    }

    fn restore(&mut self, saved: DocId) -> bool {
        self.docset.restore(saved)
    }
}

impl<D: DocSet> Scorer for ConstScorer<D> {
    fn score(&mut self) -> Score {
        self.score
    }

    /// A fixed score is trivially its own tight bound, everywhere.
    fn supports_block_quality(&self) -> bool {
        true
    }

    fn max_quality(&self) -> Score {
        self.score
    }

    fn block_quality(&self) -> Score {
        self.score
    }

    fn skip_to_quality(&mut self, min_quality: Score) -> SkipResult {
        if self.score >= min_quality {
            SkipResult::Reached
        } else {
            SkipResult::End
        }
    }
}
