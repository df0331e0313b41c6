use std::fmt;

use crate::core::{Searcher, SegmentReader};
use crate::query::Weight;
use crate::schema::Schema;
use crate::Result;

/// A query tree node (§6 "Query tree"): `weight` compiles it against a
/// schema into a `Weight`, the object every segment's search actually
/// runs against. Query trees are built directly (this crate does not
/// parse query strings, by design -- see SCOPE in the crate root docs).
pub trait Query: Send + Sync + fmt::Debug {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>>;

    /// Matching doc count in one segment, summed by callers across
    /// every segment of a `Searcher` for the corpus-wide count.
    fn count(&self, schema: &Schema, reader: &SegmentReader) -> Result<u32> {
        self.weight(schema)?.count(reader)
    }
}

/// Total matching doc count across every segment `searcher` holds,
/// without running a full collector pass.
pub fn count(query: &dyn Query, searcher: &Searcher) -> Result<u32> {
    let weight = query.weight(searcher.schema())?;
    let mut total = 0u32;
    for reader in searcher.segment_readers() {
        total += weight.count(reader)?;
    }
    Ok(total)
}
