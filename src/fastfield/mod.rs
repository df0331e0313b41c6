//! Per-document columnar storage (§3 "Column", §4.2 `FASTFIELDS`):
//! fixed-width, randomly-addressable values used for sorting, faceting
//! and grouping without touching the document store. Single-valued
//! numeric fields and the implicit facet term-ordinal column share one
//! bit-packed encoding (`bitpacker`), multiplexed per field the same
//! way field norms are (`common::CompositeFile`).

mod bitpacker;
mod reader;
mod serializer;
mod writer;

pub use self::reader::{is_facet_field, FastFieldReader, FastFieldsReader, MultiValueFastFieldReader};
pub use self::serializer::FastFieldSerializer;
pub use self::writer::{FastFieldsWriter, MultiValueIntFastFieldWriter};
