/// Ordinal of a segment within one `Searcher`'s segment list. Distinct
/// from a segment's persistent `SegmentId`: this is purely positional
/// and only meaningful for the lifetime of one `Searcher` snapshot.
pub type SegmentLocalId = u32;

/// Addresses one document within a `Searcher`: which segment (by
/// position in the searcher's reader list) and which local docid within
/// it. Global docid composition (§4.6 "local + offset[seg]") happens
/// inside the matcher tree during a search; `DocAddress` is the
/// consumer-facing identifier collectors hand back to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocAddress(pub SegmentLocalId, pub crate::DocId);

impl DocAddress {
    pub fn segment_ord(self) -> SegmentLocalId {
        self.0
    }

    pub fn doc(self) -> crate::DocId {
        self.1
    }
}
