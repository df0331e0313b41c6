use serde::{Deserialize, Serialize};

use crate::core::{IndexSettings, SegmentMeta};
use crate::schema::Schema;
use crate::Opstamp;

/// The Table of Contents: the single versioned manifest naming every
/// live segment at a given generation (§3 "TOC"). A `TOC` is valid iff
/// every segment it names is fully flushed; `commit` is the atomic
/// replacement of one `IndexMeta` by another under the well-known
/// `_toc_<generation>` file name (§6 "On-disk file naming").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    pub segments: Vec<SegmentMeta>,
    pub schema: Schema,
    pub opstamp: Opstamp,
    pub settings: IndexSettings,
    #[serde(default)]
    pub payload: Option<String>,
}

impl IndexMeta {
    pub fn with_schema(schema: Schema) -> IndexMeta {
        IndexMeta {
            segments: Vec::new(),
            schema,
            opstamp: 0,
            settings: IndexSettings::default(),
            payload: None,
        }
    }

    /// Total live (undeleted) document count across every segment named
    /// by this TOC.
    pub fn num_docs(&self) -> u64 {
        self.segments.iter().map(|meta| u64::from(meta.num_docs())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SegmentId;
    use crate::schema::{Schema, TEXT};

    #[test]
    fn test_index_meta_json_roundtrip() {
        let mut builder = Schema::builder();
        builder.add_text_field("title", TEXT);
        let schema = builder.build();
        let mut meta = IndexMeta::with_schema(schema);
        meta.segments.push(SegmentMeta::new(SegmentId::generate(), 3));
        meta.opstamp = 7;

        let json = serde_json::to_string(&meta).unwrap();
        let read_back: IndexMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(read_back.opstamp, 7);
        assert_eq!(read_back.num_docs(), 3);
    }
}
