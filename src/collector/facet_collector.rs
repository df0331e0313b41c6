use std::collections::HashMap;

use crate::collector::{Collector, SegmentCollector};
use crate::core::{SegmentLocalId, SegmentReader};
use crate::schema::{Facet, Field, Term};
use crate::DocId;
use crate::Result;
use crate::Score;

/// Counts documents per facet value, rolled up to every ancestor (§4.5
/// "facet(field) -> counts by value"). Grounded on the teacher's own
/// `FacetCollector::for_field` / `searcher.search(&AllQuery, &facet_collector)`
/// usage (see `benches/facet_collectors.rs`), and on the facet ordinal
/// alignment `fastfield::writer`'s `term_ord_map` sets up: a facet fast
/// field column stores, per doc, the *leaf* facet's ordinal in the
/// segment's whole-dictionary term dictionary, so resolving a count back
/// to a `Facet` path is a `TermDictionary` range scan over the field's
/// term prefix.
pub struct FacetCollector {
    field: Field,
}

impl FacetCollector {
    pub fn for_field(field: Field) -> FacetCollector {
        FacetCollector { field }
    }
}

impl Collector for FacetCollector {
    type Fruit = FacetCounts;
    type Child = FacetSegmentCollector;

    fn for_segment(&self, _segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<FacetSegmentCollector> {
        let multi_reader = reader.multi_fast_field_reader(self.field).ok_or_else(|| {
            crate::TantivyError::SchemaError(format!("field {:?} is not a facet field", self.field))
        })?;

        let prefix = Term::for_field(self.field);
        let mut ord_to_facet = HashMap::new();
        let mut cursor = reader.term_dictionary().range(Some(prefix.as_slice()));
        while let Some((key, _term_info)) = cursor.next() {
            if !key.starts_with(prefix.as_slice()) {
                break;
            }
            if let Ok(facet) = Facet::from_encoded(&key[prefix.as_slice().len()..]) {
                ord_to_facet.insert(cursor.term_ord(), facet);
            }
        }

        Ok(FacetSegmentCollector {
            multi_reader,
            ord_to_facet,
            counts: HashMap::new(),
        })
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn merge_fruits(&self, segment_fruits: Vec<FacetCounts>) -> Result<FacetCounts> {
        let mut merged = FacetCounts { counts: HashMap::new() };
        for fruit in segment_fruits {
            for (facet, count) in fruit.counts {
                *merged.counts.entry(facet).or_insert(0) += count;
            }
        }
        Ok(merged)
    }
}

pub struct FacetSegmentCollector {
    multi_reader: crate::fastfield::MultiValueFastFieldReader,
    ord_to_facet: HashMap<u64, Facet>,
    counts: HashMap<Facet, u64>,
}

impl SegmentCollector for FacetSegmentCollector {
    type Fruit = FacetCounts;

    fn collect(&mut self, doc: DocId, _score: Score) {
        for ord in self.multi_reader.get_vals(doc) {
            if let Some(facet) = self.ord_to_facet.get(&ord) {
                for ancestor in facet.ancestors() {
                    *self.counts.entry(ancestor).or_insert(0) += 1;
                }
            }
        }
    }

    fn harvest(self) -> FacetCounts {
        FacetCounts { counts: self.counts }
    }
}

/// Per-facet match counts, rolled up to every ancestor path (§4.5).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FacetCounts {
    counts: HashMap<Facet, u64>,
}

impl FacetCounts {
    pub fn get(&self, facet: &Facet) -> u64 {
        self.counts.get(facet).copied().unwrap_or(0)
    }

    /// The facets directly under `parent`, with their counts, sorted by
    /// descending count then ascending path for determinism.
    pub fn top_k(&self, parent: &Facet, k: usize) -> Vec<(Facet, u64)> {
        let mut children: Vec<(Facet, u64)> = self
            .counts
            .iter()
            .filter(|(facet, _)| is_direct_child(parent, facet))
            .map(|(facet, &count)| (facet.clone(), count))
            .collect();
        children.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        children.truncate(k);
        children
    }
}

fn is_direct_child(parent: &Facet, candidate: &Facet) -> bool {
    let ancestors = candidate.ancestors();
    ancestors.len() >= 2 && ancestors[ancestors.len() - 2] == *parent && candidate != parent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AllQuery;
    use crate::schema::{Document, Schema};
    use crate::Index;

    fn doc_with_facet(field: Field, path: &str) -> Document {
        let mut doc = Document::default();
        doc.add_facet(field, path.parse::<Facet>().unwrap());
        doc
    }

    #[test]
    fn test_facet_collector_counts_rollup_to_ancestors() {
        let mut builder = Schema::builder();
        let category = builder.add_facet_field("category");
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        writer.add_document(doc_with_facet(category, "/electronics/laptops")).unwrap();
        writer.add_document(doc_with_facet(category, "/electronics/laptops")).unwrap();
        writer.add_document(doc_with_facet(category, "/electronics/phones")).unwrap();
        writer.add_document(doc_with_facet(category, "/books")).unwrap();
        writer.commit().unwrap();

        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let facet_collector = FacetCollector::for_field(category);
        let counts = searcher.search(&AllQuery, &facet_collector).unwrap();

        assert_eq!(counts.get(&"/electronics/laptops".parse().unwrap()), 2);
        assert_eq!(counts.get(&"/electronics/phones".parse().unwrap()), 1);
        assert_eq!(counts.get(&"/electronics".parse().unwrap()), 3);
        assert_eq!(counts.get(&"/books".parse().unwrap()), 1);
        assert_eq!(counts.get(&"/".parse().unwrap()), 4);

        let top = counts.top_k(&"/electronics".parse().unwrap(), 10);
        assert_eq!(
            top,
            vec![
                ("/electronics/laptops".parse().unwrap(), 2),
                ("/electronics/phones".parse().unwrap(), 1),
            ]
        );
    }
}
