use std::io::{self, Read, Write};

use crate::common::{BinarySerializable, VInt};
use crate::schema::FieldType;

/// Which posting sections a field's record option asks for, mirroring
/// the three `Recorder` implementations: `Basic` stores only the docid
/// set, `WithFreqs` adds a per-doc term frequency, `WithFreqsAndPositions`
/// additionally stores per-doc token positions (required for phrase
/// queries, §4.3 "Phrase/Span").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRecordOption {
    Basic,
    WithFreqs,
    WithFreqsAndPositions,
}

impl IndexRecordOption {
    pub fn for_field_type(field_type: &FieldType) -> IndexRecordOption {
        match field_type {
            FieldType::Str(text_options) => match text_options.get_indexing_options() {
                Some(indexing) if indexing.format.has_positions() => {
                    IndexRecordOption::WithFreqsAndPositions
                }
                Some(_) => IndexRecordOption::WithFreqs,
                None => IndexRecordOption::Basic,
            },
            FieldType::HierarchicalFacet => IndexRecordOption::Basic,
            _ => IndexRecordOption::Basic,
        }
    }

    pub fn has_freq(self) -> bool {
        !matches!(self, IndexRecordOption::Basic)
    }

    pub fn has_positions(self) -> bool {
        matches!(self, IndexRecordOption::WithFreqsAndPositions)
    }
}

/// The term dictionary's side value (§4.2: "Rare terms ... are stored
/// inline ...; common terms get an offset into the posting data
/// file"). We always go through the offset/len path -- the inlining
/// optimization for singleton postings is left as a documented
/// simplification (see `DESIGN.md`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TermInfo {
    pub doc_freq: u32,
    pub postings_offset: u64,
    pub postings_len: u32,
    pub positions_offset: u64,
    pub positions_len: u32,
}

impl BinarySerializable for TermInfo {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        VInt(u64::from(self.doc_freq)).serialize(writer)?;
        VInt(self.postings_offset).serialize(writer)?;
        VInt(u64::from(self.postings_len)).serialize(writer)?;
        VInt(self.positions_offset).serialize(writer)?;
        VInt(u64::from(self.positions_len)).serialize(writer)
    }

    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let doc_freq = VInt::deserialize(reader)?.0 as u32;
        let postings_offset = VInt::deserialize(reader)?.0;
        let postings_len = VInt::deserialize(reader)?.0 as u32;
        let positions_offset = VInt::deserialize(reader)?.0;
        let positions_len = VInt::deserialize(reader)?.0 as u32;
        Ok(TermInfo {
            doc_freq,
            postings_offset,
            postings_len,
            positions_offset,
            positions_len,
        })
    }
}
