//! The document store (§3 "Stored-field (document store) detail"):
//! block-compressed, random-access storage for a document's `STORED`
//! field values, addressed by local docid. Distinct from fast fields
//! (`crate::fastfield`), which hold sortable per-doc scalars rather than
//! arbitrary field values.

mod compression;
mod reader;
mod writer;

pub use self::compression::Compressor;
pub use self::reader::StoreReader;
pub use self::writer::StoreWriter;
