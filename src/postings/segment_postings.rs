use crate::directory::ReadOnlySource;
use crate::postings::block::{self, DecodedPositions, DecodedPostings};
use crate::postings::term_info::{IndexRecordOption, TermInfo};
use crate::DocId;

/// A term's postings, decoded from a segment's `POSTINGS`/`POSITIONS`
/// files (§4.1's block layout, via `postings::block`) into memory in
/// full (§4.3 "Term" leaf matcher). Each block's `(max_weight,
/// max_length_code)` summary survives the decode so a wrapping
/// `Scorer` can answer block-max quality queries without re-reading
/// the block it covers; the decode itself is eager rather than
/// streaming (see `DESIGN.md`) -- the public shape (`doc`, `advance`,
/// `skip_to`, `term_freq`, `positions`, plus the block-quality
/// accessors) is the one a streaming decoder would need to preserve.
pub struct SegmentPostings {
    postings: DecodedPostings,
    positions: DecodedPositions,
    cursor: usize,
    started: bool,
}

impl SegmentPostings {
    pub fn open(
        term_info: &TermInfo,
        record_option: IndexRecordOption,
        postings_source: &ReadOnlySource,
        positions_source: &ReadOnlySource,
    ) -> std::io::Result<SegmentPostings> {
        let postings_slice = postings_source.slice(
            term_info.postings_offset as usize,
            (term_info.postings_offset + u64::from(term_info.postings_len)) as usize,
        );
        let postings = block::decode_postings(postings_slice.as_slice(), record_option.has_freq())?;

        let positions = if record_option.has_positions() {
            let positions_slice = positions_source.slice(
                term_info.positions_offset as usize,
                (term_info.positions_offset + u64::from(term_info.positions_len)) as usize,
            );
            block::decode_positions(positions_slice.as_slice(), postings.doc_ids.len())?
        } else {
            DecodedPositions::default()
        };

        Ok(SegmentPostings { postings, positions, cursor: 0, started: false })
    }

    pub fn doc_freq(&self) -> u32 {
        self.postings.doc_ids.len() as u32
    }

    pub fn is_active(&self) -> bool {
        self.started && self.cursor < self.postings.doc_ids.len()
    }

    pub fn doc(&self) -> DocId {
        self.postings.doc_ids[self.cursor]
    }

    /// Advances to the next document; returns `false` once exhausted.
    /// Like a real cursor, the first call positions on the first
    /// posting rather than skipping it.
    pub fn advance(&mut self) -> bool {
        if !self.started {
            self.started = true;
            return !self.postings.doc_ids.is_empty();
        }
        self.cursor += 1;
        self.cursor < self.postings.doc_ids.len()
    }

    /// Advances to the first doc `>= target`. Returns `false` if none
    /// exists.
    pub fn skip_to(&mut self, target: DocId) -> bool {
        if !self.started {
            self.started = true;
        } else {
            self.cursor += 1;
        }
        while self.cursor < self.postings.doc_ids.len() && self.postings.doc_ids[self.cursor] < target {
            self.cursor += 1;
        }
        self.cursor < self.postings.doc_ids.len()
    }

    pub fn term_freq(&self) -> u32 {
        self.postings.weights.get(self.cursor).copied().unwrap_or(1)
    }

    /// The current doc's field length bucket (§4.1 "lengths section"),
    /// decoded back to an approximate token count via
    /// `fieldnorm::id_to_fieldnorm`.
    pub fn length_code(&self) -> u8 {
        self.postings.length_codes.get(self.cursor).copied().unwrap_or(0)
    }

    pub fn positions(&self) -> &[u32] {
        self.positions.positions.get(self.cursor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The current doc's char-offset spans, one per position in
    /// `positions()`. Empty when the term never recorded any (the
    /// common case).
    pub fn chars(&self) -> &[(u32, u32)] {
        self.positions.chars.get(self.cursor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The payload recorded alongside the `i`-th position in the
    /// current doc, or an empty slice if none was recorded.
    pub fn payload(&self, i: usize) -> &[u8] {
        self.positions
            .payloads
            .get(self.cursor)
            .and_then(|doc_payloads| doc_payloads.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether this posting list retains per-block quality summaries a
    /// matcher can use to skip whole blocks (§4.3 block-max skipping).
    /// Always true -- every block, full or partial, carries one.
    pub fn supports_block_quality(&self) -> bool {
        !self.postings.block_end.is_empty()
    }

    /// The highest weight appearing in the block covering the current
    /// cursor position (or the last block, if the cursor is past the
    /// end -- useful for probing ahead before an actual skip).
    pub fn block_max_weight(&self) -> u32 {
        let block = self.postings.block_for(self.cursor);
        self.postings.block_max_weight.get(block).copied().unwrap_or(0)
    }

    /// The highest length-bucket code appearing in the same block.
    pub fn block_max_length_code(&self) -> u8 {
        let block = self.postings.block_for(self.cursor);
        self.postings.block_max_length_code.get(block).copied().unwrap_or(0)
    }

    /// The last docid covered by the block covering the current
    /// cursor position -- skipping past it guarantees leaving the
    /// block's quality bound behind.
    pub fn block_last_doc(&self) -> DocId {
        let block = self.postings.block_for(self.cursor);
        let end = self.postings.block_end.get(block).copied().unwrap_or(0);
        self.postings.doc_ids.get(end.saturating_sub(1)).copied().unwrap_or(DocId::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postings::recorder::{Recorder, TFAndPositionRecorder};

    #[test]
    fn test_segment_postings_roundtrip_with_positions() {
        let mut recorder = TFAndPositionRecorder::default();
        recorder.new_doc(1);
        recorder.record_position(0, 0, 1, &[]);
        recorder.record_position(3, 4, 5, &[]);
        recorder.new_doc(5);
        recorder.record_position(1, 2, 3, b"x");

        let mut postings_buf = Vec::new();
        let mut positions_buf = Vec::new();
        let (postings_len, positions_len) =
            recorder.serialize(&[], &mut postings_buf, &mut positions_buf);

        let term_info = TermInfo {
            doc_freq: 2,
            postings_offset: 0,
            postings_len,
            positions_offset: 0,
            positions_len,
        };
        let postings_source = ReadOnlySource::new(postings_buf);
        let positions_source = ReadOnlySource::new(positions_buf);
        let mut postings = SegmentPostings::open(
            &term_info,
            IndexRecordOption::WithFreqsAndPositions,
            &postings_source,
            &positions_source,
        )
        .unwrap();

        assert!(postings.advance());
        assert_eq!(postings.doc(), 1);
        assert_eq!(postings.positions(), &[0, 3]);
        assert_eq!(postings.chars(), &[(0, 1), (4, 5)]);
        assert!(postings.payload(0).is_empty());
        assert!(postings.advance());
        assert_eq!(postings.doc(), 5);
        assert_eq!(postings.positions(), &[1]);
        assert_eq!(postings.payload(0), b"x");
        assert!(!postings.advance());
    }

    #[test]
    fn test_segment_postings_skip_to() {
        let mut recorder = crate::postings::recorder::NothingRecorder::default();
        for doc in [0u32, 2, 4, 8, 16] {
            recorder.new_doc(doc);
        }
        let mut postings_buf = Vec::new();
        let mut positions_buf = Vec::new();
        let (postings_len, _) = recorder.serialize(&[], &mut postings_buf, &mut positions_buf);
        let term_info = TermInfo {
            doc_freq: 5,
            postings_offset: 0,
            postings_len,
            positions_offset: 0,
            positions_len: 0,
        };
        let postings_source = ReadOnlySource::new(postings_buf);
        let positions_source = ReadOnlySource::empty();
        let mut postings = SegmentPostings::open(
            &term_info,
            IndexRecordOption::Basic,
            &postings_source,
            &positions_source,
        )
        .unwrap();
        assert!(postings.skip_to(5));
        assert_eq!(postings.doc(), 8);
        assert!(postings.skip_to(20) == false);
    }

    #[test]
    fn test_block_quality_tracks_max_term_freq() {
        let mut recorder = crate::postings::recorder::TermFrequencyRecorder::default();
        recorder.new_doc(0);
        recorder.record_position(0, 0, 1, &[]);
        recorder.new_doc(1);
        for i in 0..5 {
            recorder.record_position(i, 0, 1, &[]);
        }
        let mut postings_buf = Vec::new();
        let mut positions_buf = Vec::new();
        let (postings_len, _) = recorder.serialize(&[], &mut postings_buf, &mut positions_buf);
        let term_info = TermInfo {
            doc_freq: 2,
            postings_offset: 0,
            postings_len,
            positions_offset: 0,
            positions_len: 0,
        };
        let postings_source = ReadOnlySource::new(postings_buf);
        let positions_source = ReadOnlySource::empty();
        let mut postings = SegmentPostings::open(
            &term_info,
            IndexRecordOption::WithFreqs,
            &postings_source,
            &positions_source,
        )
        .unwrap();
        assert!(postings.supports_block_quality());
        postings.advance();
        assert_eq!(postings.block_max_weight(), 5);
        assert_eq!(postings.block_last_doc(), 1);
    }
}
