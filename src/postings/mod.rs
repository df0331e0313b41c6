//! On-disk posting lists (§4.1/§4.2/§4.3): in-memory accumulation while a
//! segment is being built (`postings_writer`, `recorder`), their
//! serialization into a segment's `TERMS`/`POSTINGS`/`POSITIONS` files
//! (`serializer`, `term_info`), and the reader-side decode into a leaf
//! matcher (`segment_postings`).

mod block;
mod postings_writer;
mod recorder;
mod segment_postings;
mod serializer;
mod term_info;

pub use self::postings_writer::{compute_table_size, MultiFieldPostingsWriter, TermOrdinal};
pub use self::recorder::{NothingRecorder, Recorder, TFAndPositionRecorder, TermFrequencyRecorder};
pub use self::segment_postings::SegmentPostings;
pub use self::serializer::PostingsSerializer;
pub use self::term_info::{IndexRecordOption, TermInfo};
