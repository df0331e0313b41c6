use std::collections::HashMap;

use crate::collector::{Collector, SegmentCollector};
use crate::core::{DocAddress, SegmentLocalId, SegmentReader};
use crate::fastfield::FastFieldReader;
use crate::schema::Field;
use crate::DocId;
use crate::Result;
use crate::Score;
use crate::TantivyError;

/// Every matching `DocAddress`, grouped by a fast field's raw value
/// (§4.5 "group_by(facet) -> groups"). Groups are keyed on the field's
/// sortable `u64` encoding, same as `TopDocsByField` -- the caller
/// decodes back to the signed/float/facet domain it cares about.
pub type GroupMapType = HashMap<u64, Vec<DocAddress>>;

pub struct GroupByCollector {
    field: Field,
}

impl GroupByCollector {
    pub fn for_field(field: Field) -> GroupByCollector {
        GroupByCollector { field }
    }
}

impl Collector for GroupByCollector {
    type Fruit = GroupMapType;
    type Child = GroupBySegmentCollector;

    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<GroupBySegmentCollector> {
        let fast_field_reader = reader.fast_field_reader(self.field).ok_or_else(|| {
            TantivyError::SchemaError(format!("field {:?} is not a single-valued fast field", self.field))
        })?;
        Ok(GroupBySegmentCollector {
            segment_local_id,
            reader: fast_field_reader,
            groups: HashMap::new(),
        })
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn merge_fruits(&self, segment_fruits: Vec<GroupMapType>) -> Result<GroupMapType> {
        let mut merged: GroupMapType = HashMap::new();
        for fruit in segment_fruits {
            for (key, mut addresses) in fruit {
                merged.entry(key).or_insert_with(Vec::new).append(&mut addresses);
            }
        }
        Ok(merged)
    }
}

pub struct GroupBySegmentCollector {
    segment_local_id: SegmentLocalId,
    reader: FastFieldReader,
    groups: GroupMapType,
}

impl SegmentCollector for GroupBySegmentCollector {
    type Fruit = GroupMapType;

    fn collect(&mut self, doc: DocId, _score: Score) {
        let key = self.reader.get(doc);
        self.groups
            .entry(key)
            .or_insert_with(Vec::new)
            .push(DocAddress(self.segment_local_id, doc));
    }

    fn harvest(self) -> GroupMapType {
        self.groups
    }
}

/// What `CollapseCollector` keeps the best doc by, within each group
/// (§4.5 "collapse(facet, order)").
#[derive(Clone, Copy)]
pub enum CollapseOrder {
    /// Highest relevance score wins.
    Score,
    /// Highest raw value of this fast field wins.
    Field(Field),
}

#[derive(Clone, Copy, PartialEq, PartialOrd)]
struct OrderKey(f64);

/// Collapses matches to (at most) one doc per group -- the best by
/// `order` -- instead of returning every group member the way
/// `GroupByCollector` does. Grounded on the same per-group best-of
/// pattern as `TopSegmentCollector`, specialized to a single winner.
pub struct CollapseCollector {
    group_field: Field,
    order: CollapseOrder,
}

impl CollapseCollector {
    pub fn new(group_field: Field, order: CollapseOrder) -> CollapseCollector {
        CollapseCollector { group_field, order }
    }
}

impl Collector for CollapseCollector {
    type Fruit = Vec<DocAddress>;
    type Child = CollapseSegmentCollector;

    fn for_segment(&self, segment_local_id: SegmentLocalId, reader: &SegmentReader) -> Result<CollapseSegmentCollector> {
        let group_reader = reader.fast_field_reader(self.group_field).ok_or_else(|| {
            TantivyError::SchemaError(format!("field {:?} is not a single-valued fast field", self.group_field))
        })?;
        let order_reader = match self.order {
            CollapseOrder::Score => None,
            CollapseOrder::Field(field) => Some(reader.fast_field_reader(field).ok_or_else(|| {
                TantivyError::SchemaError(format!("field {:?} is not a single-valued fast field", field))
            })?),
        };
        Ok(CollapseSegmentCollector {
            segment_local_id,
            group_reader,
            order_reader,
            best: HashMap::new(),
        })
    }

    fn requires_scoring(&self) -> bool {
        matches!(self.order, CollapseOrder::Score)
    }

    fn merge_fruits(&self, segment_fruits: Vec<HashMap<u64, (OrderKey, DocAddress)>>) -> Result<Vec<DocAddress>> {
        let mut best: HashMap<u64, (OrderKey, DocAddress)> = HashMap::new();
        for fruit in segment_fruits {
            for (key, (order_key, address)) in fruit {
                best.entry(key)
                    .and_modify(|current| {
                        if order_key.0 > current.0 .0 {
                            *current = (order_key, address);
                        }
                    })
                    .or_insert((order_key, address));
            }
        }
        Ok(best.into_iter().map(|(_, (_, address))| address).collect())
    }
}

pub struct CollapseSegmentCollector {
    segment_local_id: SegmentLocalId,
    group_reader: FastFieldReader,
    order_reader: Option<FastFieldReader>,
    best: HashMap<u64, (OrderKey, DocAddress)>,
}

impl SegmentCollector for CollapseSegmentCollector {
    type Fruit = HashMap<u64, (OrderKey, DocAddress)>;

    fn collect(&mut self, doc: DocId, score: Score) {
        let group_key = self.group_reader.get(doc);
        let order_key = OrderKey(match &self.order_reader {
            Some(reader) => reader.get(doc) as f64,
            None => score as f64,
        });
        let address = DocAddress(self.segment_local_id, doc);
        self.best
            .entry(group_key)
            .and_modify(|current| {
                if order_key.0 > current.0 .0 {
                    *current = (order_key, address);
                }
            })
            .or_insert((order_key, address));
    }

    fn harvest(self) -> HashMap<u64, (OrderKey, DocAddress)> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AllQuery;
    use crate::schema::{Schema, FAST, TEXT};
    use crate::{doc, Index};

    fn build_index() -> (Index, Field) {
        let mut builder = Schema::builder();
        let _title = builder.add_text_field("title", TEXT);
        let category = builder.add_u64_field("category", FAST);
        let schema = builder.build();
        let index = Index::create_in_ram(schema);
        let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
        for i in 0..6u64 {
            let mut document = crate::schema::Document::default();
            document.add(category, i % 2);
            writer.add_document(document).unwrap();
        }
        writer.commit().unwrap();
        (index, category)
    }

    #[test]
    fn test_group_by_collector_buckets_by_fast_field() {
        let (index, category) = build_index();
        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let groups = searcher.search(&AllQuery, &GroupByCollector::for_field(category)).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get(&0).unwrap().len(), 3);
        assert_eq!(groups.get(&1).unwrap().len(), 3);
    }

    #[test]
    fn test_collapse_collector_keeps_one_per_group() {
        let (index, category) = build_index();
        let reader = index.reader().unwrap();
        let searcher = reader.searcher();
        let collapsed = searcher
            .search(&AllQuery, &CollapseCollector::new(category, CollapseOrder::Field(category)))
            .unwrap();
        assert_eq!(collapsed.len(), 2);
    }
}
