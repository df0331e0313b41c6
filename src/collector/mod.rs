//! Collector and scoring pipeline (§4.5 "Collector"): the consumer of
//! matcher output. A `Collector` describes *what to compute* over a
//! whole `Searcher` (top-K, a count, facet counts, ...); for each
//! segment it hands out a `SegmentCollector`, which actually walks that
//! segment's scorer and accumulates one partial result (`Fruit`).
//! `Searcher::search` drives the per-segment loop and then asks the
//! `Collector` to `merge_fruits` across segments.
//!
//! Wrappers compose by literal Rust nesting rather than by a runtime
//! priority system (§9 "Design notes": "the nesting order in code IS the
//! semantics") -- `TopDocs` is the base collector named throughout this
//! module's doc examples; `FilterCollector`, `GroupByCollector`,
//! `CollapseCollector`, `SampleCollector`, `ReversedCollector`,
//! `WeightedByCollector`, `WithTermsCollector` and `WithSpansCollector`
//! all wrap an inner collector the same way.

mod chain;
mod count_collector;
mod facet_collector;
mod filter_collector;
mod group_collector;
mod page;
mod reversed_collector;
mod sample_collector;
mod term_span_collector;
mod top_collector;
mod top_score_collector;
mod weighted_by_collector;

pub use self::chain::MultiCollector;
pub use self::count_collector::Count;
pub use self::facet_collector::{FacetCollector, FacetCounts};
pub use self::filter_collector::FilterCollector;
pub use self::group_collector::{CollapseCollector, CollapseOrder, GroupByCollector, GroupMapType};
pub use self::page::{paginate, PageCollector};
pub use self::reversed_collector::ReversedCollector;
pub use self::sample_collector::SampleCollector;
pub use self::term_span_collector::{WithSpansCollector, WithTermsCollector};
pub use self::top_collector::{TopCollector, TopSegmentCollector};
pub use self::top_score_collector::{TopDocs, TopDocsByField};
pub use self::weighted_by_collector::WeightedByCollector;

use crate::core::{SegmentLocalId, SegmentReader};
use crate::query::Scorer;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Computes one `Fruit` over an entire `Searcher` (§4.5). Implementors
/// are stateless descriptions of the computation; all mutable state
/// lives in the `Child` segment collector `for_segment` hands out.
pub trait Collector: Sync {
    /// The final, whole-index result (after `merge_fruits`).
    type Fruit: Send;

    /// The per-segment accumulator.
    type Child: SegmentCollector<Fruit = Self::Fruit>;

    /// Builds this collector's accumulator for one segment.
    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<Self::Child>;

    /// Whether the search loop needs to compute `Scorer::score` at all.
    /// `Count`-style collectors that only care about matching docids
    /// return `false`, letting the search loop skip scoring entirely.
    fn requires_scoring(&self) -> bool;

    /// Combines every segment's partial `Fruit` into the final result.
    fn merge_fruits(&self, segment_fruits: Vec<Self::Fruit>) -> Result<Self::Fruit>;
}

/// One segment's half of a `Collector` (§4.5 "Collector run loop"):
/// `collect` is called once per matching, non-deleted document in
/// ascending docid order; `harvest` finalizes this segment's `Fruit`.
pub trait SegmentCollector: 'static {
    type Fruit: Send;

    fn collect(&mut self, doc: DocId, score: Score);

    /// Like `collect`, but also given the live `Scorer` that produced
    /// this hit, for collectors that need more than the score itself --
    /// `with_terms`/`with_spans` call `scorer.matching_terms`/
    /// `scorer.matched_spans` from here. `Searcher::search` calls this
    /// instead of `collect` whenever `requires_scoring()` is true; the
    /// default just forwards to `collect` and ignores `scorer`, so
    /// existing collectors need no changes.
    fn collect_scored(&mut self, doc: DocId, score: Score, scorer: &mut dyn Scorer) {
        let _ = scorer;
        self.collect(doc, score);
    }

    /// The score a new hit would need to beat to still matter to this
    /// collector, if one can be named yet (§4.3 "block-max skip
    /// optimization", §4.5 "enabling block-max skipping"). A full top-K
    /// heap's current worst score is the canonical example: nothing at
    /// or below it can change the result, so `Searcher::search` feeds
    /// it back into the scorer tree via `replace`/`skip_to_quality`.
    /// `None` means this collector has no such threshold yet, or never
    /// will -- the default, safe for every collector that needs to see
    /// every matching doc regardless of score (count, group-by,
    /// collapse, sampling, ...).
    fn current_threshold(&self) -> Option<Score> {
        None
    }

    fn harvest(self) -> Self::Fruit;
}
