use std::collections::HashMap;

use crate::fastfield::serializer::FastFieldSerializer;
use crate::postings::TermOrdinal;
use crate::schema::{Document, Field, FieldType, Schema};
use crate::schema::{i64_to_sortable_u64, Value};
use crate::Result;

/// Accumulates one fast field's values, one per document, in docid
/// order. Backs every `U64`/`I64`/`F64`/`Date` field marked `FAST`.
struct IntFastFieldWriter {
    field: Field,
    vals: Vec<u64>,
}

impl IntFastFieldWriter {
    fn new(field: Field) -> IntFastFieldWriter {
        IntFastFieldWriter { field, vals: Vec::new() }
    }
}

/// Accumulates a multi-valued fast field: a flat `vals` array plus a
/// `doc_index` boundary array (`doc_index[d]..doc_index[d+1]` is doc
/// `d`'s range within `vals`). The only field type that needs this in
/// this schema is `HierarchicalFacet`, whose values are unordered term
/// ids at write time and get remapped to the sorted term dictionary's
/// ordinals in `FastFieldsWriter::serialize`.
pub struct MultiValueIntFastFieldWriter {
    vals: Vec<TermOrdinal>,
    doc_index: Vec<u64>,
}

impl MultiValueIntFastFieldWriter {
    fn new() -> MultiValueIntFastFieldWriter {
        MultiValueIntFastFieldWriter {
            vals: Vec::new(),
            doc_index: Vec::new(),
        }
    }

    /// Closes off the previous document's range and opens a new one.
    /// Called once per document, before that document's values (if any)
    /// are added.
    pub fn next_doc(&mut self) {
        self.doc_index.push(self.vals.len() as u64);
    }

    pub fn add_val(&mut self, val: TermOrdinal) {
        self.vals.push(val);
    }

    fn full_doc_index(&self) -> Vec<u64> {
        let mut doc_index = self.doc_index.clone();
        doc_index.push(self.vals.len() as u64);
        doc_index
    }
}

/// Owns every fast field's in-memory column for the segment currently
/// being built. Single-valued numeric fields are populated directly
/// from each `Document` in `add_document`; the facet fast field is
/// driven externally, one value at a time, via `get_multivalue_writer`
/// (see `SegmentWriter::add_document`, which walks the facet's
/// tokenized ancestor path).
pub struct FastFieldsWriter {
    single_value_writers: Vec<IntFastFieldWriter>,
    multi_value_writers: HashMap<Field, MultiValueIntFastFieldWriter>,
}

impl FastFieldsWriter {
    pub fn from_schema(schema: &Schema) -> FastFieldsWriter {
        let mut single_value_writers = Vec::new();
        let mut multi_value_writers = HashMap::new();
        for (field, entry) in schema.fields() {
            match entry.field_type() {
                FieldType::HierarchicalFacet => {
                    multi_value_writers.insert(field, MultiValueIntFastFieldWriter::new());
                }
                field_type if field_type.is_fast() => {
                    single_value_writers.push(IntFastFieldWriter::new(field));
                }
                _ => {}
            }
        }
        FastFieldsWriter {
            single_value_writers,
            multi_value_writers,
        }
    }

    /// Records `doc`'s single-valued fast field values (defaulting to 0
    /// for a document missing a value), and opens a new range for every
    /// multi-valued (facet) fast field.
    pub fn add_document(&mut self, doc: &Document) {
        for writer in &mut self.single_value_writers {
            let value = doc
                .get_first(writer.field)
                .and_then(fast_value_to_sortable_u64)
                .unwrap_or(0);
            writer.vals.push(value);
        }
        for writer in self.multi_value_writers.values_mut() {
            writer.next_doc();
        }
    }

    pub fn get_multivalue_writer(&mut self, field: Field) -> Option<&mut MultiValueIntFastFieldWriter> {
        self.multi_value_writers.get_mut(&field)
    }

    /// Flushes every column. `term_ord_map` (from
    /// `MultiFieldPostingsWriter::serialize`) remaps each facet field's
    /// unordered term ids to their final sorted-dictionary ordinal
    /// before the facet column is written.
    pub fn serialize(
        &self,
        serializer: &mut FastFieldSerializer,
        term_ord_map: &HashMap<Field, Vec<TermOrdinal>>,
    ) -> Result<()> {
        for writer in &self.single_value_writers {
            serializer.write_column(writer.field, 0, &writer.vals)?;
        }
        for (&field, writer) in &self.multi_value_writers {
            let remap = term_ord_map.get(&field);
            let vals: Vec<u64> = writer
                .vals
                .iter()
                .map(|&unordered_id| {
                    remap
                        .and_then(|m| m.get(unordered_id as usize).copied())
                        .unwrap_or(unordered_id)
                })
                .collect();
            serializer.write_column(field, 0, &vals)?;
            serializer.write_column(field, 1, &writer.full_doc_index())?;
        }
        Ok(())
    }
}

fn fast_value_to_sortable_u64(value: &Value) -> Option<u64> {
    match value {
        Value::U64(v) => Some(*v),
        Value::I64(v) => Some(i64_to_sortable_u64(*v)),
        Value::F64(v) => Some(crate::schema::f64_to_sortable_u64(*v)),
        Value::Date(v) => Some(i64_to_sortable_u64(*v)),
        Value::Str(_) | Value::Bytes(_) | Value::Facet(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Directory, RAMDirectory};
    use crate::fastfield::FastFieldsReader;
    use crate::schema::SchemaBuilder;
    use std::path::Path;

    #[test]
    fn test_single_value_fast_field_roundtrip() {
        let mut schema_builder = SchemaBuilder::default();
        let score = schema_builder.add_u64_field("score", crate::schema::FAST);
        let schema = schema_builder.build();

        let mut writer = FastFieldsWriter::from_schema(&schema);
        let mut doc0 = Document::new();
        doc0.add_u64(score, 10);
        writer.add_document(&doc0);
        let mut doc1 = Document::new();
        doc1.add_u64(score, 1000);
        writer.add_document(&doc1);

        let directory = RAMDirectory::create();
        let path = Path::new("fast");
        {
            let write = directory.open_write(path).unwrap();
            let mut serializer = FastFieldSerializer::from_write(write).unwrap();
            writer.serialize(&mut serializer, &HashMap::new()).unwrap();
            serializer.close().unwrap();
        }
        let source = directory.open_read(path).unwrap();
        let reader = FastFieldsReader::open(source).unwrap();
        let column = reader.u64_reader(score).unwrap();
        assert_eq!(column.get(0), 10);
        assert_eq!(column.get(1), 1000);
    }
}
