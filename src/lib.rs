//! Vellum is an embeddable full-text search engine core: schema-driven
//! indexing, segment-based storage, Boolean and ranked retrieval,
//! phrase/span matching, and spelling/fuzzy expansion over a
//! Levenshtein-automaton term dictionary.
//!
//! The crate is deliberately scoped to the engine's core (see the
//! module-level docs of [`query`], [`collector`] and [`indexer`]):
//! query-string parsing syntax, natural-language analysis beyond the two
//! bundled trivial tokenizers, UI-level highlighting and distributed
//! sharding are all out of scope and left to host applications.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate failure;

pub mod collector;
pub mod common;
pub mod core;
pub mod directory;
mod error;
pub mod fastfield;
pub mod fieldnorm;
pub mod indexer;
pub mod postings;
pub mod query;
pub mod schema;
pub mod store;
pub mod termdict;
pub mod tokenizer;

pub use crate::error::TantivyError;

/// The crate-wide `Result` alias: every fallible public entry point
/// returns this rather than a bespoke per-module error type.
pub type Result<T> = std::result::Result<T, TantivyError>;

/// Document identifier, local to one segment. Monotonically assigned
/// starting at zero as documents are added to a `SegmentWriter`.
pub type DocId = u32;

/// A relevance score produced by a `Scorer`. Higher is more relevant;
/// there is no fixed upper bound.
pub type Score = f32;

/// A monotonically increasing counter stamped on every indexing
/// operation (add/delete), used to order operations within a single
/// writer session and to decide, for a given unique-key update, which
/// of two operations on the same key happened last.
pub type Opstamp = u64;

pub use crate::core::{
    DocAddress, Index, IndexMeta, IndexReader, IndexReaderBuilder, IndexSettings, ReloadPolicy,
    Searcher, Segment, SegmentId, SegmentMeta, SegmentReader,
};
pub use crate::indexer::IndexWriter;
pub use crate::schema::{Document, Term};

/// Builds a [`schema::Document`] from `field => value` pairs, mirroring
/// the teacher's own `doc!` ergonomics.
///
/// ```
/// use vellum::schema::Schema;
/// use vellum::doc;
///
/// let mut builder = Schema::builder();
/// let title = builder.add_text_field("title", vellum::schema::TEXT);
/// let document = doc!(title => "hello world");
/// assert_eq!(document.len(), 1);
/// ```
#[macro_export]
macro_rules! doc {
    () => {{
        $crate::schema::Document::default()
    }};
    ($($field:expr => $value:expr),*$(,)?) => {{
        let mut document = $crate::schema::Document::default();
        $(document.add($field, $value);)*
        document
    }};
}
