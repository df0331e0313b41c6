use crate::collector::{Collector, SegmentCollector};
use crate::core::{DocAddress, SegmentLocalId, SegmentReader};
use crate::query::span::Span;
use crate::query::{Scorer, TermMatcher};
use crate::schema::Field;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Wraps an inner collector to additionally record, per hit, which
/// terms actually matched (§4.5 "with_terms(fields?): Record matching
/// terms per hit"). Needs the live `Scorer` at collection time, so this
/// always asks the search loop for scoring regardless of whether the
/// inner collector would -- the terms a block-max skip never visited
/// can't be recorded, so enabling this effectively turns off skip-based
/// shortcuts for the query. With no `fields` restriction, every
/// matched term is recorded regardless of which field it came from.
pub struct WithTermsCollector<C> {
    collector: C,
    fields: Option<Vec<Field>>,
}

impl<C: Collector> WithTermsCollector<C> {
    pub fn new(collector: C) -> WithTermsCollector<C> {
        WithTermsCollector { collector, fields: None }
    }

    /// Restricts recorded terms to the given fields, dropping matches
    /// from every other field a query might also have touched.
    pub fn for_fields(collector: C, fields: Vec<Field>) -> WithTermsCollector<C> {
        WithTermsCollector {
            collector,
            fields: Some(fields),
        }
    }
}

impl<C: Collector> Collector for WithTermsCollector<C> {
    type Fruit = (C::Fruit, Vec<(DocAddress, Vec<TermMatcher>)>);
    type Child = WithTermsSegmentCollector<C::Child>;

    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<Self::Child> {
        Ok(WithTermsSegmentCollector {
            segment_local_id,
            inner: self.collector.for_segment(segment_local_id, reader)?,
            fields: self.fields.clone(),
            terms: Vec::new(),
        })
    }

    fn requires_scoring(&self) -> bool {
        true
    }

    fn merge_fruits(&self, segment_fruits: Vec<Self::Fruit>) -> Result<Self::Fruit> {
        let mut inner_fruits = Vec::with_capacity(segment_fruits.len());
        let mut all_terms = Vec::new();
        for (inner_fruit, terms) in segment_fruits {
            inner_fruits.push(inner_fruit);
            all_terms.extend(terms);
        }
        Ok((self.collector.merge_fruits(inner_fruits)?, all_terms))
    }
}

pub struct WithTermsSegmentCollector<SC> {
    segment_local_id: SegmentLocalId,
    inner: SC,
    fields: Option<Vec<Field>>,
    terms: Vec<(DocAddress, Vec<TermMatcher>)>,
}

impl<SC: SegmentCollector> SegmentCollector for WithTermsSegmentCollector<SC> {
    type Fruit = (SC::Fruit, Vec<(DocAddress, Vec<TermMatcher>)>);

    fn collect(&mut self, doc: DocId, score: Score) {
        self.inner.collect(doc, score);
    }

    fn collect_scored(&mut self, doc: DocId, score: Score, scorer: &mut dyn Scorer) {
        let mut matched = scorer.matching_terms(doc);
        if let Some(fields) = &self.fields {
            matched.retain(|matcher| fields.contains(&matcher.field));
        }
        self.terms.push((DocAddress(self.segment_local_id, doc), matched));
        self.inner.collect_scored(doc, score, scorer);
    }

    fn harvest(self) -> Self::Fruit {
        (self.inner.harvest(), self.terms)
    }
}

/// Wraps an inner collector to additionally record, per hit, the spans
/// a span query matched (§4.5 "with_spans(fields?): Record span lists
/// per hit"). Any scorer that isn't span-aware just reports an empty
/// span list for every hit, per `Scorer::matched_spans`'s default.
/// Unlike `WithTermsCollector`, this has no `for_fields` restriction:
/// a `Span` carries no field of its own (`SpanQuery::field` already
/// fixes one field for the whole query it's attached to), so there is
/// nothing per-span left to filter by.
pub struct WithSpansCollector<C> {
    collector: C,
}

impl<C: Collector> WithSpansCollector<C> {
    pub fn new(collector: C) -> WithSpansCollector<C> {
        WithSpansCollector { collector }
    }
}

impl<C: Collector> Collector for WithSpansCollector<C> {
    type Fruit = (C::Fruit, Vec<(DocAddress, Vec<Span>)>);
    type Child = WithSpansSegmentCollector<C::Child>;

    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<Self::Child> {
        Ok(WithSpansSegmentCollector {
            segment_local_id,
            inner: self.collector.for_segment(segment_local_id, reader)?,
            spans: Vec::new(),
        })
    }

    fn requires_scoring(&self) -> bool {
        true
    }

    fn merge_fruits(&self, segment_fruits: Vec<Self::Fruit>) -> Result<Self::Fruit> {
        let mut inner_fruits = Vec::with_capacity(segment_fruits.len());
        let mut all_spans = Vec::new();
        for (inner_fruit, spans) in segment_fruits {
            inner_fruits.push(inner_fruit);
            all_spans.extend(spans);
        }
        Ok((self.collector.merge_fruits(inner_fruits)?, all_spans))
    }
}

pub struct WithSpansSegmentCollector<SC> {
    segment_local_id: SegmentLocalId,
    inner: SC,
    spans: Vec<(DocAddress, Vec<Span>)>,
}

impl<SC: SegmentCollector> SegmentCollector for WithSpansSegmentCollector<SC> {
    type Fruit = (SC::Fruit, Vec<(DocAddress, Vec<Span>)>);

    fn collect(&mut self, doc: DocId, score: Score) {
        self.inner.collect(doc, score);
    }

    fn collect_scored(&mut self, doc: DocId, score: Score, scorer: &mut dyn Scorer) {
        self.spans.push((DocAddress(self.segment_local_id, doc), scorer.matched_spans()));
        self.inner.collect_scored(doc, score, scorer);
    }

    fn harvest(self) -> Self::Fruit {
        (self.inner.harvest(), self.spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Count;
    use crate::query::TermQuery;
    use crate::schema::{Schema, Term, TEXT};
    use crate::Index;

    #[test]
    fn test_with_terms_collector_records_matching_terms_per_hit() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        writer.add_document(crate::doc!(title => "rust programming")).unwrap();
        writer.add_document(crate::doc!(title => "python programming")).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = TermQuery::new(Term::from_field_text(title, "rust"));
        let (count, terms) = searcher.search(&query, &WithTermsCollector::new(Count)).unwrap();
        assert_eq!(count, 1);
        assert_eq!(terms.len(), 1);
        let (_, matchers) = &terms[0];
        assert_eq!(matchers.len(), 1);
        assert_eq!(matchers[0].term.value_bytes(), b"rust");
    }

    #[test]
    fn test_with_terms_for_fields_drops_other_fields() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT);
        let body = builder.add_text_field("body", TEXT);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        let mut doc = crate::schema::Document::default();
        doc.add_text(title, "rust");
        doc.add_text(body, "rust");
        writer.add_document(doc).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let query = crate::query::BooleanQuery::new(vec![
            (crate::query::Occur::Should, Box::new(TermQuery::new(Term::from_field_text(title, "rust")))),
            (crate::query::Occur::Should, Box::new(TermQuery::new(Term::from_field_text(body, "rust")))),
        ]);
        let (_, terms) = searcher
            .search(&query, &WithTermsCollector::for_fields(Count, vec![title]))
            .unwrap();
        assert_eq!(terms.len(), 1);
        let (_, matchers) = &terms[0];
        assert_eq!(matchers.len(), 1);
        assert_eq!(matchers[0].field, title);
    }
}
