//! Schema definitions: field names, types and options, plus the
//! `Document`/`Value`/`Term`/`Facet` types built against a schema.

mod document;
mod facet;
mod field;
mod field_entry;
mod field_type;
mod flags;
mod int_options;
mod term;
mod text_options;

pub use self::document::Document;
pub use self::facet::{Facet, FacetParseError};
pub use self::field::Field;
pub use self::field_entry::FieldEntry;
pub use self::field_type::FieldType;
pub use self::flags::{PostingsFormat, SchemaFlagList, FAST, INDEXED, STORED};
pub use self::int_options::{BytesOptions, IntOptions};
pub use self::term::{
    f64_to_sortable_u64, i64_to_sortable_u64, sortable_u64_to_f64, sortable_u64_to_i64, Term,
};
pub use self::text_options::{
    text_full, text_raw, Bm25Params, TextFieldIndexing, TextOptions, STRING, TEXT,
};
pub use self::value::Value;

mod value;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Builds a `Schema` by adding fields in a fixed order; field ids are
/// assigned positionally, so the same sequence of `add_*_field` calls
/// always reproduces the same `Schema`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldEntry>,
    fields_map: HashMap<String, Field>,
}

/// Returned when a `SchemaBuilder` is asked to add a field name that was
/// already added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFieldName(pub String);

impl fmt::Display for DuplicateFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field already defined in this schema: {}", self.0)
    }
}

impl std::error::Error for DuplicateFieldName {}

impl SchemaBuilder {
    pub fn new() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    fn add_field(&mut self, name: &str, field_type: FieldType) -> Field {
        if self.fields_map.contains_key(name) {
            panic!("{}", DuplicateFieldName(name.to_string()));
        }
        let field = Field(self.fields.len() as u32);
        self.fields.push(FieldEntry::new(name.to_string(), field_type));
        self.fields_map.insert(name.to_string(), field);
        field
    }

    pub fn add_text_field(&mut self, name: &str, options: impl Into<TextOptions>) -> Field {
        self.add_field(name, FieldType::Str(options.into()))
    }

    pub fn add_u64_field(&mut self, name: &str, options: impl Into<IntOptions>) -> Field {
        self.add_field(name, FieldType::U64(options.into()))
    }

    pub fn add_i64_field(&mut self, name: &str, options: impl Into<IntOptions>) -> Field {
        self.add_field(name, FieldType::I64(options.into()))
    }

    pub fn add_f64_field(&mut self, name: &str, options: impl Into<IntOptions>) -> Field {
        self.add_field(name, FieldType::F64(options.into()))
    }

    pub fn add_date_field(&mut self, name: &str, options: impl Into<IntOptions>) -> Field {
        self.add_field(name, FieldType::Date(options.into()))
    }

    pub fn add_bytes_field(&mut self, name: &str, options: impl Into<IntOptions>) -> Field {
        self.add_field(name, FieldType::Bytes(options.into()))
    }

    pub fn add_facet_field(&mut self, name: &str) -> Field {
        self.add_field(name, FieldType::HierarchicalFacet)
    }

    pub fn build(self) -> Schema {
        Schema(Arc::new(InnerSchema {
            fields: self.fields,
            fields_map: self.fields_map,
        }))
    }
}

#[derive(Debug)]
struct InnerSchema {
    fields: Vec<FieldEntry>,
    fields_map: HashMap<String, Field>,
}

/// An immutable, cheaply-cloneable set of `FieldEntry`s. Every `Index`
/// carries one `Schema`; it round-trips through JSON as part of the
/// index metadata so that a reopened index can validate that the
/// on-disk segments still match the code's expectations.
#[derive(Debug, Clone)]
pub struct Schema(Arc<InnerSchema>);

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn get_field(&self, field_name: &str) -> Option<Field> {
        self.0.fields_map.get(field_name).copied()
    }

    pub fn get_field_entry(&self, field: Field) -> &FieldEntry {
        &self.0.fields[field.field_id() as usize]
    }

    pub fn get_field_name(&self, field: Field) -> &str {
        self.get_field_entry(field).name()
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldEntry)> {
        self.0
            .fields
            .iter()
            .enumerate()
            .map(|(id, entry)| (Field(id as u32), entry))
    }

    pub fn len(&self) -> usize {
        self.0.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.fields.is_empty()
    }
}

impl Serialize for Schema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = Vec::<FieldEntry>::deserialize(deserializer)?;
        let fields_map = fields
            .iter()
            .enumerate()
            .map(|(id, entry)| (entry.name().to_string(), Field(id as u32)))
            .collect();
        Ok(Schema(Arc::new(InnerSchema { fields, fields_map })))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Schema) -> bool {
        self.0.fields == other.0.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder_assigns_positional_ids() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT | STORED);
        let body = builder.add_text_field("body", TEXT);
        assert_eq!(title, Field(0));
        assert_eq!(body, Field(1));
    }

    #[test]
    #[should_panic(expected = "field already defined")]
    fn test_schema_builder_rejects_duplicate_names() {
        let mut builder = Schema::builder();
        builder.add_text_field("title", TEXT);
        builder.add_text_field("title", STRING);
    }

    #[test]
    fn test_schema_get_field_roundtrip() {
        let mut builder = Schema::builder();
        let title = builder.add_text_field("title", TEXT | STORED);
        let schema = builder.build();
        assert_eq!(schema.get_field("title"), Some(title));
        assert_eq!(schema.get_field_name(title), "title");
        assert!(schema.get_field_entry(title).is_stored());
    }

    #[test]
    fn test_schema_json_roundtrip() {
        let mut builder = Schema::builder();
        builder.add_text_field("title", TEXT | STORED);
        builder.add_u64_field("views", INDEXED | FAST);
        let schema = builder.build();
        let json = serde_json::to_string(&schema).unwrap();
        let read_back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, read_back);
        assert_eq!(read_back.get_field("views"), schema.get_field("views"));
    }
}
