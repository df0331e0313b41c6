//! The crate's structural backbone: `Index` (directory + schema),
//! `Segment`/`SegmentMeta`/`SegmentId` (one on-disk unit), `IndexMeta`
//! (the TOC), and the reader stack (`SegmentReader`, `InvertedIndexReader`,
//! `Searcher`, `IndexReader`) that composes them for query execution.

mod doc_address;
mod index;
mod index_meta;
mod index_reader;
mod index_settings;
mod inverted_index_reader;
mod searcher;
mod segment;
mod segment_component;
mod segment_id;
mod segment_meta;
mod segment_reader;

pub use self::doc_address::{DocAddress, SegmentLocalId};
pub use self::index::Index;
pub use self::index_meta::IndexMeta;
pub use self::index_reader::{IndexReader, IndexReaderBuilder, ReloadPolicy};
pub use self::index_settings::{Compressor, IndexSettings, WriterSettings};
pub use self::inverted_index_reader::InvertedIndexReader;
pub use self::searcher::Searcher;
pub use self::segment::{SerializableSegment, Segment};
pub use self::segment_component::SegmentComponent;
pub use self::segment_id::SegmentId;
pub use self::segment_meta::SegmentMeta;
pub(crate) use self::segment_reader::write_delete_bitset;
pub use self::segment_reader::SegmentReader;
