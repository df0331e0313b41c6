use serde::{Deserialize, Serialize};

use super::field_type::FieldType;
use super::text_options::Bm25Params;

/// A named slot in a `Schema`: the field's display name plus its
/// (immutable, once added) `FieldType`. Fields are never removed or
/// retyped after a `SchemaBuilder` finishes -- every segment written
/// against a `Schema` must be readable by every later `Schema` value
/// built from the same `SchemaBuilder` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    name: String,
    field_type: FieldType,
}

impl FieldEntry {
    pub fn new(name: String, field_type: FieldType) -> FieldEntry {
        FieldEntry { name, field_type }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_indexed(&self) -> bool {
        self.field_type.is_indexed()
    }

    pub fn is_stored(&self) -> bool {
        self.field_type.is_stored()
    }

    pub fn is_fast(&self) -> bool {
        self.field_type.is_fast()
    }

    pub fn bm25_params(&self) -> Bm25Params {
        self.field_type.bm25_params()
    }
}
