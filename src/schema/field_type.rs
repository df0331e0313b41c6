use serde::{Deserialize, Serialize};

use super::int_options::IntOptions;
use super::text_options::{Bm25Params, TextOptions};
use super::Value;

/// The closed set of field kinds the data model supports. Each variant
/// owns its own options type; there is deliberately no "generic" field
/// kind, so a `Schema` can answer "is this field fast/stored/indexed"
/// without consulting anything but the `FieldType` itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum FieldType {
    Str(TextOptions),
    U64(IntOptions),
    I64(IntOptions),
    F64(IntOptions),
    Date(IntOptions),
    Bytes(IntOptions),
    HierarchicalFacet,
}

impl FieldType {
    pub fn is_indexed(&self) -> bool {
        match self {
            FieldType::Str(opts) => opts.is_indexed(),
            FieldType::U64(opts)
            | FieldType::I64(opts)
            | FieldType::F64(opts)
            | FieldType::Date(opts)
            | FieldType::Bytes(opts) => opts.is_indexed(),
            FieldType::HierarchicalFacet => true,
        }
    }

    pub fn is_stored(&self) -> bool {
        match self {
            FieldType::Str(opts) => opts.is_stored(),
            FieldType::U64(opts)
            | FieldType::I64(opts)
            | FieldType::F64(opts)
            | FieldType::Date(opts)
            | FieldType::Bytes(opts) => opts.is_stored(),
            FieldType::HierarchicalFacet => true,
        }
    }

    pub fn is_fast(&self) -> bool {
        match self {
            FieldType::Str(opts) => opts.is_fast(),
            FieldType::U64(opts)
            | FieldType::I64(opts)
            | FieldType::F64(opts)
            | FieldType::Date(opts)
            | FieldType::Bytes(opts) => opts.is_fast(),
            FieldType::HierarchicalFacet => false,
        }
    }

    /// Whether this field participates in the unique-key invariant (at
    /// most one document may carry a given value for it -- enforced by
    /// the indexer's delete-by-term pass on update, not by `FieldType`
    /// itself).
    pub fn is_unique(&self) -> bool {
        match self {
            FieldType::Str(opts) => opts.is_unique(),
            FieldType::U64(opts)
            | FieldType::I64(opts)
            | FieldType::F64(opts)
            | FieldType::Date(opts)
            | FieldType::Bytes(opts) => opts.is_unique(),
            FieldType::HierarchicalFacet => false,
        }
    }

    /// This field's BM25F scoring parameters, if it's an indexed text
    /// field (§4.4 "BM25F with per-field k1, b, field boost"). Other
    /// field types don't carry relevance scoring of their own, so this
    /// falls back to the library-wide default rather than failing.
    pub fn bm25_params(&self) -> Bm25Params {
        match self {
            FieldType::Str(opts) => opts
                .get_indexing_options()
                .map(|indexing| indexing.bm25)
                .unwrap_or_default(),
            _ => Bm25Params::default(),
        }
    }

    /// Validates that `value` is the right shape for this field type,
    /// without yet converting it to indexable bytes (that's `Term`'s job).
    pub fn value_matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldType::Str(_), Value::Str(_))
                | (FieldType::U64(_), Value::U64(_))
                | (FieldType::I64(_), Value::I64(_))
                | (FieldType::F64(_), Value::F64(_))
                | (FieldType::Date(_), Value::Date(_))
                | (FieldType::Bytes(_), Value::Bytes(_))
                | (FieldType::HierarchicalFacet, Value::Facet(_))
        )
    }
}
