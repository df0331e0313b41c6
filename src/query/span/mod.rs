//! Span queries (§4.3 "Phrase/Span", §6 "Query tree": `Span*`),
//! generalizing `PhraseQuery`'s exact-adjacency matching to slop- and
//! order-tolerant near-matches, and to combinators (`SpanNot`,
//! `SpanContaining`, `SpanBefore`, `SpanOr`) that compare *where*
//! matches happened rather than just *whether* they happened.
//!
//! Each `Span` carries `[start, end)` token positions plus the
//! char-offset range and payload recorded alongside those positions
//! (when the field's postings carry them), so a caller doing
//! highlighting can map a match straight back into the original text
//! without re-analyzing the stored value.

use std::fmt;

use crate::core::SegmentReader;
use crate::postings::{IndexRecordOption, SegmentPostings};
use crate::query::{DocSet, Query, Scorer, Weight};
use crate::schema::{Field, Schema, Term};
use crate::DocId;
use crate::Result;
use crate::Score;

/// A half-open range of token positions, `[start, end)`, within one
/// field's position stream for one document, plus whatever char-offset
/// and payload data the matching postings carried.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    /// Char offset of `start`'s token, when the field records char offsets.
    pub startchar: Option<u32>,
    /// Char offset of `end`'s token, when the field records char offsets.
    pub endchar: Option<u32>,
    /// Payload carried by the span's anchor position, when any was recorded.
    pub payload: Option<Vec<u8>>,
}

impl Span {
    /// A bare position-range span, with no char offsets or payload.
    pub fn new(start: u32, end: u32) -> Span {
        Span { start, end, startchar: None, endchar: None, payload: None }
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn is_before(&self, other: &Span) -> bool {
        self.end <= other.start
    }
}

/// A `Scorer` that also knows which spans of the current doc matched
/// (§4.3: span queries report *where*, not just *whether*).
pub trait SpanScorer: DocSet {
    /// Every matched span on the current doc, in ascending `start` order.
    fn matched_spans(&self) -> Vec<Span>;
}

/// Compiled form of a `SpanQuery`, parallel to `Weight`/`Scorer`.
pub trait SpanWeight {
    fn span_scorer(&self, reader: &SegmentReader) -> Result<Box<dyn SpanScorer>>;
}

/// A query tree node that can report matched spans, not just matching
/// docs. Every `SpanQuery` is usable anywhere a plain `Query` is (via
/// its `Query` impl), but span-aware combinators (`SpanNotQuery` and
/// friends) only accept other `SpanQuery`s as children, since they need
/// the position information a plain `Query`/`Weight` doesn't expose.
pub trait SpanQuery: fmt::Debug + Send + Sync {
    fn field(&self) -> Field;
    fn span_weight(&self, schema: &Schema) -> Result<Box<dyn SpanWeight>>;
}

/// Builds a `Scorer`/`Weight` out of a `SpanQuery`/`SpanWeight` for
/// ordinary (non-span-aware) callers: a doc matches iff it has at least
/// one span, scored by BM25 over the matched span count as its "term
/// frequency" stand-in.
struct SpanScorerAdapter(Box<dyn SpanScorer>);

impl DocSet for SpanScorerAdapter {
    fn advance(&mut self) -> bool {
        self.0.advance()
    }
    fn doc(&self) -> DocId {
        self.0.doc()
    }
    fn skip_to(&mut self, target: DocId) -> bool {
        self.0.skip_to(target)
    }
    fn size_hint(&self) -> u32 {
        self.0.size_hint()
    }
}

impl Scorer for SpanScorerAdapter {
    fn score(&mut self) -> Score {
        self.0.matched_spans().len().max(1) as Score
    }

    /// The wrapped `SpanScorer` carries no per-block quality stats of
    /// its own (those live on the `SegmentPostings` a span combinator
    /// reads from, not on the combinator itself), so this falls back to
    /// the trait's unbounded default rather than claiming a bound it
    /// can't back up.
    fn supports_block_quality(&self) -> bool {
        false
    }

    fn matched_spans(&self) -> Vec<Span> {
        self.0.matched_spans()
    }
}

/// Matches all of `terms` occurring close together (§6 "Query tree":
/// `SpanNear(terms[], slop, in_order)`), generalizing `PhraseQuery`'s
/// slop-0/in-order-only matching: `slop` is the maximum extra gap
/// tolerated between consecutive terms, and `in_order` controls whether
/// they must appear in query order.
#[derive(Debug, Clone)]
pub struct SpanNearQuery {
    field: Field,
    terms: Vec<Term>,
    slop: u32,
    in_order: bool,
}

impl SpanNearQuery {
    pub fn new(field: Field, terms: Vec<Term>, slop: u32, in_order: bool) -> SpanNearQuery {
        assert!(terms.len() >= 2, "a span-near query needs at least two terms");
        SpanNearQuery { field, terms, slop, in_order }
    }
}

impl SpanQuery for SpanNearQuery {
    fn field(&self) -> Field {
        self.field
    }

    fn span_weight(&self, schema: &Schema) -> Result<Box<dyn SpanWeight>> {
        let field_type = schema.get_field_entry(self.field).field_type().clone();
        let record_option = IndexRecordOption::for_field_type(&field_type);
        Ok(Box::new(SpanNearWeight {
            terms: self.terms.clone(),
            slop: self.slop,
            in_order: self.in_order,
            record_option,
        }))
    }
}

impl Query for SpanNearQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(SpanAsQueryWeight(self.span_weight(schema)?)))
    }
}

struct SpanAsQueryWeight(Box<dyn SpanWeight>);

impl Weight for SpanAsQueryWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        Ok(Box::new(SpanScorerAdapter(self.0.span_scorer(reader)?)))
    }
}

struct SpanNearWeight {
    terms: Vec<Term>,
    slop: u32,
    in_order: bool,
    record_option: IndexRecordOption,
}

impl SpanWeight for SpanNearWeight {
    fn span_scorer(&self, reader: &SegmentReader) -> Result<Box<dyn SpanScorer>> {
        if !self.record_option.has_positions() {
            return Ok(Box::new(EmptySpanScorer));
        }
        let field = self.terms[0].field();
        let inverted_index = reader.inverted_index(field);
        let mut postings_per_term = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            match inverted_index.read_postings(term)? {
                Some(postings) => postings_per_term.push(postings),
                None => return Ok(Box::new(EmptySpanScorer)),
            }
        }
        Ok(Box::new(SpanNearScorer {
            postings: postings_per_term,
            slop: self.slop,
            in_order: self.in_order,
            current_doc: None,
            current_spans: Vec::new(),
        }))
    }
}

struct SpanNearScorer {
    postings: Vec<SegmentPostings>,
    slop: u32,
    in_order: bool,
    current_doc: Option<DocId>,
    current_spans: Vec<Span>,
}

impl SpanNearScorer {
    fn seek_match(&mut self, mut target: DocId) -> Option<DocId> {
        'outer: loop {
            for postings in &mut self.postings {
                if !postings.skip_to(target) {
                    return None;
                }
                if postings.doc() > target {
                    target = postings.doc();
                    continue 'outer;
                }
            }
            let spans = self.spans_at_current_doc();
            if !spans.is_empty() {
                self.current_spans = spans;
                return Some(target);
            }
            target += 1;
        }
    }

    /// Every window of positions, one per term, satisfying the slop and
    /// ordering constraints -- an in-order window needs each term `i` at
    /// a position within `[anchor + i, anchor + i + slop]`; an
    /// unordered window just needs every term somewhere within
    /// `anchor`'s symmetric `slop + (terms.len() - 1)`-wide neighborhood
    /// (a documented approximation of a true any-order permutation
    /// search -- see `DESIGN.md`).
    fn spans_at_current_doc(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        let anchor_positions = self.postings[0].positions();
        for (anchor_idx, &anchor) in anchor_positions.iter().enumerate() {
            let mut low = anchor;
            let mut high = anchor;
            let mut startchar = self.postings[0].chars().get(anchor_idx).map(|&(s, _)| s);
            let mut endchar = self.postings[0].chars().get(anchor_idx).map(|&(_, e)| e);
            let anchor_payload = self.postings[0].payload(anchor_idx);
            let payload = if anchor_payload.is_empty() { None } else { Some(anchor_payload.to_vec()) };
            let mut matched = true;
            if self.in_order {
                for (offset, postings) in self.postings.iter().enumerate().skip(1) {
                    let lo = anchor + offset as u32;
                    let hi = lo + self.slop;
                    match postings.positions().iter().enumerate().find(|&(_, &p)| p >= lo && p <= hi) {
                        Some((idx, &p)) => {
                            if p >= high {
                                high = p;
                                if let Some(&(_, e)) = postings.chars().get(idx) {
                                    endchar = Some(e);
                                }
                            }
                        }
                        None => {
                            matched = false;
                            break;
                        }
                    }
                }
            } else {
                let window = self.slop + (self.postings.len() as u32 - 1);
                let lo = anchor.saturating_sub(window);
                let hi = anchor + window;
                for postings in self.postings.iter().skip(1) {
                    match postings.positions().iter().enumerate().find(|&(_, &p)| p >= lo && p <= hi) {
                        Some((idx, &p)) => {
                            if p < low {
                                low = p;
                                if let Some(&(s, _)) = postings.chars().get(idx) {
                                    startchar = Some(s);
                                }
                            }
                            if p > high {
                                high = p;
                                if let Some(&(_, e)) = postings.chars().get(idx) {
                                    endchar = Some(e);
                                }
                            }
                        }
                        None => {
                            matched = false;
                            break;
                        }
                    }
                }
            }
            if matched {
                spans.push(Span { start: low, end: high + 1, startchar, endchar, payload });
            }
        }
        spans
    }
}

impl DocSet for SpanNearScorer {
    fn advance(&mut self) -> bool {
        let target = match self.current_doc {
            Some(doc) => doc + 1,
            None => 0,
        };
        self.current_doc = self.seek_match(target);
        self.current_doc.is_some()
    }

    fn doc(&self) -> DocId {
        self.current_doc.unwrap_or(u32::MAX)
    }

    fn skip_to(&mut self, target: DocId) -> bool {
        self.current_doc = self.seek_match(target);
        self.current_doc.is_some()
    }

    fn size_hint(&self) -> u32 {
        self.postings.iter().map(SegmentPostings::doc_freq).min().unwrap_or(0)
    }
}

impl SpanScorer for SpanNearScorer {
    fn matched_spans(&self) -> Vec<Span> {
        self.current_spans.clone()
    }
}

struct EmptySpanScorer;

impl DocSet for EmptySpanScorer {
    fn advance(&mut self) -> bool {
        false
    }
    fn doc(&self) -> DocId {
        u32::MAX
    }
}

impl SpanScorer for EmptySpanScorer {
    fn matched_spans(&self) -> Vec<Span> {
        Vec::new()
    }
}

/// Matches whatever any clause matches, reporting every clause's
/// matched spans at a shared doc (§6 "Query tree": `SpanOr(clauses[])`).
#[derive(Debug)]
pub struct SpanOrQuery {
    clauses: Vec<Box<dyn SpanQuery>>,
}

impl SpanOrQuery {
    pub fn new(clauses: Vec<Box<dyn SpanQuery>>) -> SpanOrQuery {
        assert!(!clauses.is_empty(), "SpanOrQuery needs at least one clause");
        SpanOrQuery { clauses }
    }
}

impl SpanQuery for SpanOrQuery {
    fn field(&self) -> Field {
        self.clauses[0].field()
    }

    fn span_weight(&self, schema: &Schema) -> Result<Box<dyn SpanWeight>> {
        let child_weights = self
            .clauses
            .iter()
            .map(|clause| clause.span_weight(schema))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(SpanOrWeight { child_weights }))
    }
}

impl Query for SpanOrQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(SpanAsQueryWeight(self.span_weight(schema)?)))
    }
}

struct SpanOrWeight {
    child_weights: Vec<Box<dyn SpanWeight>>,
}

impl SpanWeight for SpanOrWeight {
    fn span_scorer(&self, reader: &SegmentReader) -> Result<Box<dyn SpanScorer>> {
        let mut children = Vec::with_capacity(self.child_weights.len());
        for weight in &self.child_weights {
            children.push(weight.span_scorer(reader)?);
        }
        let active = children.iter_mut().map(|child| child.advance()).collect();
        Ok(Box::new(SpanOrScorer { children, active, current_doc: None }))
    }
}

struct SpanOrScorer {
    children: Vec<Box<dyn SpanScorer>>,
    active: Vec<bool>,
    current_doc: Option<DocId>,
}

impl DocSet for SpanOrScorer {
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
}

impl SpanScorer for SpanOrScorer {
    fn matched_spans(&self) -> Vec<Span> {
        let doc = self.doc();
        let mut spans: Vec<Span> = self
            .children
            .iter()
            .enumerate()
            .filter(|(idx, child)| self.active[*idx] && child.doc() == doc)
            .flat_map(|(_, child)| child.matched_spans())
            .collect();
        spans.sort();
        spans
    }
}

/// Matches `include`'s docs whose spans the closest `exclude` span
/// never overlaps (§6 "Query tree": `SpanNot(include, exclude)`):
/// unlike `Exclude`/`AndNot`, a doc isn't dropped wholesale just because
/// `exclude` also matches it there -- only the individual spans that
/// actually overlap an `exclude` span are discarded, and the doc still
/// matches if any of `include`'s spans survive.
#[derive(Debug)]
pub struct SpanNotQuery {
    include: Box<dyn SpanQuery>,
    exclude: Box<dyn SpanQuery>,
}

impl SpanNotQuery {
    pub fn new(include: Box<dyn SpanQuery>, exclude: Box<dyn SpanQuery>) -> SpanNotQuery {
        SpanNotQuery { include, exclude }
    }
}

impl SpanQuery for SpanNotQuery {
    fn field(&self) -> Field {
        self.include.field()
    }

    fn span_weight(&self, schema: &Schema) -> Result<Box<dyn SpanWeight>> {
        Ok(Box::new(SpanNotWeight {
            include: self.include.span_weight(schema)?,
            exclude: self.exclude.span_weight(schema)?,
        }))
    }
}

impl Query for SpanNotQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(SpanAsQueryWeight(self.span_weight(schema)?)))
    }
}

struct SpanNotWeight {
    include: Box<dyn SpanWeight>,
    exclude: Box<dyn SpanWeight>,
}

impl SpanWeight for SpanNotWeight {
    fn span_scorer(&self, reader: &SegmentReader) -> Result<Box<dyn SpanScorer>> {
        Ok(Box::new(SpanNotScorer {
            include: self.include.span_scorer(reader)?,
            exclude: self.exclude.span_scorer(reader)?,
            exclude_exhausted: false,
            current_spans: Vec::new(),
        }))
    }
}

struct SpanNotScorer {
    include: Box<dyn SpanScorer>,
    exclude: Box<dyn SpanScorer>,
    exclude_exhausted: bool,
    current_spans: Vec<Span>,
}

impl SpanNotScorer {
    fn surviving_spans_at(&mut self, doc: DocId) -> Vec<Span> {
        if !self.exclude_exhausted && self.exclude.doc() < doc {
            self.exclude_exhausted = !self.exclude.skip_to(doc);
        }
        let exclude_spans = if !self.exclude_exhausted && self.exclude.doc() == doc {
            self.exclude.matched_spans()
        } else {
            Vec::new()
        };
        self.include
            .matched_spans()
            .into_iter()
            .filter(|span| !exclude_spans.iter().any(|excluded| span.overlaps(excluded)))
            .collect()
    }
}

impl DocSet for SpanNotScorer {
    fn advance(&mut self) -> bool {
        if self.exclude.doc() == u32::MAX && !self.exclude_exhausted {
            self.exclude_exhausted = !self.exclude.advance();
        }
        loop {
            if !self.include.advance() {
                return false;
            }
            let doc = self.include.doc();
            let surviving = self.surviving_spans_at(doc);
            if !surviving.is_empty() {
                self.current_spans = surviving;
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
}

impl SpanScorer for SpanNotScorer {
    fn matched_spans(&self) -> Vec<Span> {
        self.current_spans.clone()
    }
}

/// Matches `big`'s spans that contain at least one `little` span (§6
/// "Query tree": `SpanContaining(big, little)`).
#[derive(Debug)]
pub struct SpanContainingQuery {
    big: Box<dyn SpanQuery>,
    little: Box<dyn SpanQuery>,
}

impl SpanContainingQuery {
    pub fn new(big: Box<dyn SpanQuery>, little: Box<dyn SpanQuery>) -> SpanContainingQuery {
        SpanContainingQuery { big, little }
    }
}

impl SpanQuery for SpanContainingQuery {
    fn field(&self) -> Field {
        self.big.field()
    }

    fn span_weight(&self, schema: &Schema) -> Result<Box<dyn SpanWeight>> {
        Ok(Box::new(SpanPairWeight {
            first: self.big.span_weight(schema)?,
            second: self.little.span_weight(schema)?,
            relation: PairRelation::Containing,
        }))
    }
}

impl Query for SpanContainingQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(SpanAsQueryWeight(self.span_weight(schema)?)))
    }
}

/// Matches `first`'s spans that end before at least one `second` span
/// starts (§6 "Query tree": `SpanBefore(first, second)`).
#[derive(Debug)]
pub struct SpanBeforeQuery {
    first: Box<dyn SpanQuery>,
    second: Box<dyn SpanQuery>,
}

impl SpanBeforeQuery {
    pub fn new(first: Box<dyn SpanQuery>, second: Box<dyn SpanQuery>) -> SpanBeforeQuery {
        SpanBeforeQuery { first, second }
    }
}

impl SpanQuery for SpanBeforeQuery {
    fn field(&self) -> Field {
        self.first.field()
    }

    fn span_weight(&self, schema: &Schema) -> Result<Box<dyn SpanWeight>> {
        Ok(Box::new(SpanPairWeight {
            first: self.first.span_weight(schema)?,
            second: self.second.span_weight(schema)?,
            relation: PairRelation::Before,
        }))
    }
}

impl Query for SpanBeforeQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(SpanAsQueryWeight(self.span_weight(schema)?)))
    }
}

/// Matches every `base` span on a doc where `condition` also has at
/// least one span, regardless of where `condition`'s spans fall (§6
/// "Query tree": `SpanCondition(base, condition)`) -- unlike
/// `SpanContaining`/`SpanBefore`, this never compares the two spans'
/// positions against each other, only that `condition` matched *some*
/// span on the same doc.
#[derive(Debug)]
pub struct SpanConditionQuery {
    base: Box<dyn SpanQuery>,
    condition: Box<dyn SpanQuery>,
}

impl SpanConditionQuery {
    pub fn new(base: Box<dyn SpanQuery>, condition: Box<dyn SpanQuery>) -> SpanConditionQuery {
        SpanConditionQuery { base, condition }
    }
}

impl SpanQuery for SpanConditionQuery {
    fn field(&self) -> Field {
        self.base.field()
    }

    fn span_weight(&self, schema: &Schema) -> Result<Box<dyn SpanWeight>> {
        Ok(Box::new(SpanPairWeight {
            first: self.base.span_weight(schema)?,
            second: self.condition.span_weight(schema)?,
            relation: PairRelation::Condition,
        }))
    }
}

impl Query for SpanConditionQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(SpanAsQueryWeight(self.span_weight(schema)?)))
    }
}

#[derive(Clone, Copy)]
enum PairRelation {
    Containing,
    Before,
    Condition,
}

impl PairRelation {
    /// Whether `candidate` (a "first"/"big" span) should be kept, given
    /// every "second"/"little" span on the same doc.
    fn keeps(self, candidate: &Span, others: &[Span]) -> bool {
        match self {
            PairRelation::Containing => others.iter().any(|other| candidate.contains(other)),
            PairRelation::Before => others.iter().any(|other| candidate.is_before(other)),
            PairRelation::Condition => !others.is_empty(),
        }
    }
}

struct SpanPairWeight {
    first: Box<dyn SpanWeight>,
    second: Box<dyn SpanWeight>,
    relation: PairRelation,
}

impl SpanWeight for SpanPairWeight {
    fn span_scorer(&self, reader: &SegmentReader) -> Result<Box<dyn SpanScorer>> {
        Ok(Box::new(SpanPairScorer {
            first: self.first.span_scorer(reader)?,
            second: self.second.span_scorer(reader)?,
            relation: self.relation,
            current_spans: Vec::new(),
        }))
    }
}

struct SpanPairScorer {
    first: Box<dyn SpanScorer>,
    second: Box<dyn SpanScorer>,
    relation: PairRelation,
    current_spans: Vec<Span>,
}

impl SpanPairScorer {
    /// Advances both children to the first common doc at or after
    /// `target` where at least one of `first`'s spans satisfies
    /// `relation` against one of `second`'s spans there.
    fn align_from(&mut self, mut target: DocId) -> bool {
        loop {
            if !self.first.skip_to(target) {
                return false;
            }
            let first_doc = self.first.doc();
            if !self.second.skip_to(first_doc) {
                return false;
            }
            let second_doc = self.second.doc();
            if second_doc != first_doc {
                target = second_doc;
                continue;
            }
            let seconds = self.second.matched_spans();
            let kept: Vec<Span> = self
                .first
                .matched_spans()
                .into_iter()
                .filter(|span| self.relation.keeps(span, &seconds))
                .collect();
            if kept.is_empty() {
                target = first_doc + 1;
                continue;
            }
            self.current_spans = kept;
            return true;
        }
    }
}

impl DocSet for SpanPairScorer {
    fn advance(&mut self) -> bool {
        let target = if self.first.doc() == u32::MAX && self.second.doc() == u32::MAX {
            0
        } else {
            self.first.doc().max(self.second.doc()) + 1
        };
        self.align_from(target)
    }

    fn doc(&self) -> DocId {
        self.first.doc()
    }

    fn skip_to(&mut self, target: DocId) -> bool {
        self.align_from(target)
    }

    fn size_hint(&self) -> u32 {
        self.first.size_hint().min(self.second.size_hint())
    }
}

impl SpanScorer for SpanPairScorer {
    fn matched_spans(&self) -> Vec<Span> {
        self.current_spans.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, TEXT};
    use crate::{doc, Index};

    fn build_index() -> (Index, Field) {
        let mut builder = Schema::builder();
        let body = builder.add_text_field("body", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        writer.add_document(doc!(body => "the quick brown fox jumps")).unwrap();
        writer.add_document(doc!(body => "the quick lazy brown fox")).unwrap();
        writer.add_document(doc!(body => "the fox is quick and brown")).unwrap();
        writer.commit().unwrap();
        (index, body)
    }

    #[test]
    fn test_span_near_tolerates_slop() {
        let (index, body) = build_index();
        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = SpanNearQuery::new(
            body,
            vec![Term::from_field_text(body, "quick"), Term::from_field_text(body, "brown")],
            1,
            true,
        );
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_span_near_exact_adjacency_is_stricter() {
        let (index, body) = build_index();
        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = SpanNearQuery::new(
            body,
            vec![Term::from_field_text(body, "quick"), Term::from_field_text(body, "brown")],
            0,
            true,
        );
        let count = crate::query::count(&query, &searcher).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_span_before_requires_first_to_precede_second() {
        let (index, body) = build_index();
        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let before = SpanBeforeQuery::new(
            Box::new(SpanNearQuery::new(body, vec![Term::from_field_text(body, "the"), Term::from_field_text(body, "quick")], 0, true)),
            Box::new(SpanNearQuery::new(body, vec![Term::from_field_text(body, "brown"), Term::from_field_text(body, "fox")], 2, true)),
        );
        let count = crate::query::count(&before, &searcher).unwrap();
        assert!(count >= 1);
    }

    #[test]
    fn test_span_near_reports_char_offsets() {
        let (index, body) = build_index();
        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let segment_reader = searcher.segment_reader(0);
        let query = SpanNearQuery::new(
            body,
            vec![Term::from_field_text(body, "quick"), Term::from_field_text(body, "brown")],
            0,
            true,
        );
        let weight = query.span_weight(&index.schema()).unwrap();
        let mut scorer = weight.span_scorer(segment_reader).unwrap();
        assert!(scorer.advance());
        let spans = scorer.matched_spans();
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        // "the quick brown fox jumps": "quick" starts at char 4, "brown" ends at char 15.
        assert_eq!(span.startchar, Some(4));
        assert_eq!(span.endchar, Some(15));
    }

    #[test]
    fn test_span_condition_gates_on_presence() {
        let (index, body) = build_index();
        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        // "quick" spans should only count on docs that also contain "lazy".
        let gated = SpanConditionQuery::new(
            Box::new(SpanNearQuery::new(body, vec![Term::from_field_text(body, "the"), Term::from_field_text(body, "quick")], 0, true)),
            Box::new(SpanNearQuery::new(body, vec![Term::from_field_text(body, "lazy"), Term::from_field_text(body, "brown")], 0, true)),
        );
        let count = crate::query::count(&gated, &searcher).unwrap();
        assert_eq!(count, 1);
    }
}
