/// The four logical files a segment writer emits (§4.2), plus the
/// mutable deletions side file and a scratch component used while a
/// merge is in flight.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum SegmentComponent {
    /// Sorted term dictionary (FST over term bytes -> ordinal, §4.7).
    TERMS,
    /// Posting blocks (docids, lengths, weights), addressed by the
    /// `TermInfo` each dictionary entry carries.
    POSTINGS,
    /// Per-occurrence positions, chars and payloads.
    POSITIONS,
    /// Per-doc stored fields, block-compressed.
    STORE,
    /// Columnar fast-field values and term vectors.
    FASTFIELDS,
    /// Per-doc, per-field token-count used for BM25 length normalization.
    FIELDNORMS,
    /// Growable per-segment deleted-doc bitset.
    DELETE,
    /// Scratch space used by a writer/merger before `finalize`.
    TEMPSTORE,
}

impl SegmentComponent {
    /// All variants, in the order a fresh segment's files are written.
    pub fn iterator() -> impl Iterator<Item = &'static SegmentComponent> {
        static COMPONENTS: [SegmentComponent; 8] = [
            SegmentComponent::TERMS,
            SegmentComponent::POSTINGS,
            SegmentComponent::POSITIONS,
            SegmentComponent::STORE,
            SegmentComponent::FASTFIELDS,
            SegmentComponent::FIELDNORMS,
            SegmentComponent::DELETE,
            SegmentComponent::TEMPSTORE,
        ];
        COMPONENTS.iter()
    }

    /// The file extension used for `<segment_id>.<ext>` naming.
    pub fn extension(self) -> &'static str {
        match self {
            SegmentComponent::TERMS => "term",
            SegmentComponent::POSTINGS => "idx",
            SegmentComponent::POSITIONS => "pos",
            SegmentComponent::STORE => "store",
            SegmentComponent::FASTFIELDS => "fast",
            SegmentComponent::FIELDNORMS => "fieldnorm",
            SegmentComponent::DELETE => "del",
            SegmentComponent::TEMPSTORE => "tmp",
        }
    }
}
