use crate::core::SegmentReader;
use crate::query::{DocSet, Query, Scorer, Weight};
use crate::schema::Schema;
use crate::DocId;
use crate::Result;
use crate::Score;

/// Matches every live document in the index, each with score `1.0`
/// (§6 "Query tree": `Every(field?)`, restricted here to the whole-
/// index case -- a per-field "every value of this field is set" variant
/// is left unimplemented since this crate has no sparse-field tracking
/// to answer it cheaply).
#[derive(Debug, Clone, Copy, Default)]
pub struct AllQuery;

impl Query for AllQuery {
    fn weight(&self, _schema: &Schema) -> Result<Box<dyn Weight>> {
        Ok(Box::new(AllWeight))
    }
}

struct AllWeight;

impl Weight for AllWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        Ok(Box::new(AllScorer {
            reader_max_doc: reader.max_doc(),
            reader: reader.clone(),
            doc: None,
        }))
    }

    fn count(&self, reader: &SegmentReader) -> Result<u32> {
        Ok(reader.num_docs())
    }
}

struct AllScorer {
    reader: SegmentReader,
    reader_max_doc: DocId,
    doc: Option<DocId>,
}

impl DocSet for AllScorer {
    fn advance(&mut self) -> bool {
        let mut next = self.doc.map(|doc| doc + 1).unwrap_or(0);
        while next < self.reader_max_doc && self.reader.is_deleted(next) {
            next += 1;
        }
        if next >= self.reader_max_doc {
            self.doc = Some(self.reader_max_doc);
            return false;
        }
        self.doc = Some(next);
        true
    }

    fn doc(&self) -> DocId {
        self.doc.unwrap_or(u32::MAX)
    }

    fn size_hint(&self) -> u32 {
        self.reader_max_doc
    }
}

impl Scorer for AllScorer {
    fn score(&mut self) -> Score {
        1.0
    }

    fn supports_block_quality(&self) -> bool {
        true
    }

    fn max_quality(&self) -> Score {
        1.0
    }
}
