use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use super::{Facet, Field, Value};
use crate::common::{BinarySerializable, VInt};

/// An indexable/storable unit of data: a multimap from `Field` to
/// `Value`, since a field may legitimately repeat (a multi-valued "tags"
/// field, for instance). Field/value pairs are not required to be
/// sorted by field id until `add_document` validates and compiles the
/// document against a `Schema`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    field_values: Vec<(Field, Value)>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    pub fn add(&mut self, field: Field, value: impl Into<Value>) {
        self.field_values.push((field, value.into()));
    }

    pub fn add_text(&mut self, field: Field, text: &str) {
        self.add(field, text.to_string());
    }

    pub fn add_u64(&mut self, field: Field, value: u64) {
        self.add(field, value);
    }

    pub fn add_i64(&mut self, field: Field, value: i64) {
        self.add(field, value);
    }

    pub fn add_f64(&mut self, field: Field, value: f64) {
        self.add(field, value);
    }

    pub fn add_facet(&mut self, field: Field, facet: Facet) {
        self.add(field, facet);
    }

    pub fn field_values(&self) -> &[(Field, Value)] {
        &self.field_values
    }

    /// All values bound to `field`, in insertion order.
    pub fn get_all(&self, field: Field) -> impl Iterator<Item = &Value> {
        self.field_values
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    pub fn get_first(&self, field: Field) -> Option<&Value> {
        self.get_all(field).next()
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }

    /// Sorts field/value pairs by field id, stabilizing on insertion
    /// order within a field -- the layout every downstream consumer
    /// (postings writer, document store) expects.
    pub fn sort_by_field(&mut self) {
        self.field_values.sort_by_key(|(field, _)| field.field_id());
    }

    /// Groups all values by field, in ascending field-id order, each
    /// group preserving the document's original insertion order. Used
    /// by `SegmentWriter` so every field's values are indexed together
    /// in one pass regardless of how they were interleaved when added.
    pub fn get_sorted_field_values(&self) -> Vec<(Field, Vec<&Value>)> {
        let mut sorted = self.field_values.clone();
        sorted.sort_by_key(|(field, _)| field.field_id());
        let mut grouped: Vec<(Field, Vec<&Value>)> = Vec::new();
        for (field, _) in &sorted {
            if grouped.last().map(|(f, _)| *f) != Some(*field) {
                grouped.push((*field, Vec::new()));
            }
        }
        for (field, value) in &self.field_values {
            if let Some(entry) = grouped.iter_mut().find(|(f, _)| f == field) {
                entry.1.push(value);
            }
        }
        grouped
    }

    /// Drops every field/value pair whose field does not satisfy
    /// `keep`. Used to cut a document down to only its `STORED` fields
    /// before it is written to the document store.
    pub fn filter_fields(&mut self, keep: impl Fn(Field) -> bool) {
        self.field_values.retain(|(field, _)| keep(*field));
    }
}

impl BinarySerializable for Document {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        VInt(self.field_values.len() as u64).serialize(writer)?;
        for (field, value) in &self.field_values {
            field.serialize(writer)?;
            value.serialize(writer)?;
        }
        Ok(())
    }

    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let num_fields = VInt::deserialize(reader)?.0 as usize;
        let mut field_values = Vec::with_capacity(num_fields);
        for _ in 0..num_fields {
            let field = Field::deserialize(reader)?;
            let value = Value::deserialize(reader)?;
            field_values.push((field, value));
        }
        Ok(Document { field_values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_multivalued_field() {
        let mut doc = Document::new();
        doc.add_text(Field(0), "red");
        doc.add_text(Field(0), "blue");
        let values: Vec<&str> = doc.get_all(Field(0)).filter_map(Value::as_str).collect();
        assert_eq!(values, vec!["red", "blue"]);
    }

    #[test]
    fn test_document_roundtrip() {
        let mut doc = Document::new();
        doc.add_text(Field(0), "hello");
        doc.add_u64(Field(1), 7);
        let mut buffer = Vec::new();
        doc.serialize(&mut buffer).unwrap();
        let read_back = Document::deserialize(&mut &buffer[..]).unwrap();
        assert_eq!(doc, read_back);
    }

    #[test]
    fn test_sort_by_field_is_stable() {
        let mut doc = Document::new();
        doc.add_text(Field(1), "a");
        doc.add_text(Field(0), "b");
        doc.add_text(Field(1), "c");
        doc.sort_by_field();
        let fields: Vec<u32> = doc.field_values().iter().map(|(f, _)| f.field_id()).collect();
        assert_eq!(fields, vec![0, 1, 1]);
    }
}
