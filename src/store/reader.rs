use crate::common::{BinarySerializable, VInt};
use crate::directory::ReadOnlySource;
use crate::schema::Document;
use crate::store::compression::decompress;
use crate::store::writer::compressor_from_tag;
use crate::store::Compressor;
use crate::DocId;
use crate::Result;
use crate::TantivyError;

const FOOTER_LEN: usize = 9;

/// Random-access reader over one segment's document store. `get`
/// decompresses only the block containing the requested document (§4.2
/// "Stored-field detail"); there is no cross-call block cache, a
/// documented simplification against the teacher's own reader (see
/// `DESIGN.md`).
pub struct StoreReader {
    source: ReadOnlySource,
    compressor: Compressor,
    checkpoints: Vec<(DocId, u64)>,
    offset_index_start: u64,
}

impl StoreReader {
    pub fn open(source: ReadOnlySource) -> Result<StoreReader> {
        let len = source.len();
        if len < FOOTER_LEN {
            return Err(TantivyError::CorruptedFile("store file too small".to_string()));
        }
        let footer = source.slice_from(len - FOOTER_LEN);
        let mut footer_cursor = footer.as_slice();
        let offset_index_start = u64::deserialize(&mut footer_cursor)?;
        let compressor_tag = u8::deserialize(&mut footer_cursor)?;
        let compressor = compressor_from_tag(compressor_tag)?;

        let index_slice = source.slice(offset_index_start as usize, len - FOOTER_LEN);
        let mut cursor = index_slice.as_slice();
        let num_blocks = VInt::deserialize(&mut cursor)?.0 as usize;
        let mut checkpoints = Vec::with_capacity(num_blocks);
        for _ in 0..num_blocks {
            let first_doc = VInt::deserialize(&mut cursor)?.0 as DocId;
            let offset = VInt::deserialize(&mut cursor)?.0;
            checkpoints.push((first_doc, offset));
        }
        Ok(StoreReader {
            source,
            compressor,
            checkpoints,
            offset_index_start,
        })
    }

    fn block_range(&self, checkpoint_idx: usize) -> (u64, u64) {
        let start = self.checkpoints[checkpoint_idx].1;
        let stop = self
            .checkpoints
            .get(checkpoint_idx + 1)
            .map(|&(_, offset)| offset)
            .unwrap_or(self.offset_index_start);
        (start, stop)
    }

    fn checkpoint_for(&self, doc: DocId) -> Option<usize> {
        match self.checkpoints.binary_search_by_key(&doc, |&(first_doc, _)| first_doc) {
            Ok(idx) => Some(idx),
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        }
    }

    /// Decompresses the document block containing `doc` and deserializes
    /// just that one document out of it.
    pub fn get(&self, doc: DocId) -> Result<Document> {
        let checkpoint_idx = self
            .checkpoint_for(doc)
            .ok_or_else(|| TantivyError::InvalidArgument(format!("doc {} out of range", doc)))?;
        let (first_doc, _) = self.checkpoints[checkpoint_idx];
        let (start, stop) = self.block_range(checkpoint_idx);
        let block_slice = self.source.slice(start as usize, stop as usize);
        let mut cursor = block_slice.as_slice();
        let compressed_len = VInt::deserialize(&mut cursor)?.0 as usize;
        let compressed = &cursor[..compressed_len];
        let decompressed = decompress(self.compressor, compressed)?;

        let mut rows = decompressed.as_slice();
        let skip = (doc - first_doc) as usize;
        for _ in 0..skip {
            let row_len = VInt::deserialize(&mut rows)?.0 as usize;
            rows = &rows[row_len..];
        }
        let row_len = VInt::deserialize(&mut rows)?.0 as usize;
        let mut row = &rows[..row_len];
        Ok(Document::deserialize(&mut row)?)
    }

    /// The first docid of every block, in ascending order -- useful for
    /// tests asserting how many blocks a merge or write produced.
    pub fn block_checkpoints(&self) -> impl Iterator<Item = DocId> + '_ {
        self.checkpoints.iter().map(|&(first_doc, _)| first_doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Directory, RAMDirectory};
    use crate::schema::{SchemaBuilder, TEXT};
    use crate::store::StoreWriter;
    use std::path::Path;

    #[test]
    fn test_store_roundtrip_multi_block() {
        let mut schema_builder = SchemaBuilder::default();
        let title = schema_builder.add_text_field("title", TEXT);
        let _ = schema_builder.build();

        let directory = RAMDirectory::create();
        let path = Path::new("store");
        {
            let write = directory.open_write(path).unwrap();
            let mut writer = StoreWriter::new(write, Compressor::Snappy, 256).unwrap();
            for i in 0..200 {
                let mut doc = Document::new();
                doc.add_text(title, &format!("document number {}", i));
                writer.store(&doc).unwrap();
            }
            writer.close().unwrap();
        }
        let source = directory.open_read(path).unwrap();
        let reader = StoreReader::open(source).unwrap();
        assert!(reader.block_checkpoints().count() > 1);
        for i in 0..200u32 {
            let doc = reader.get(i).unwrap();
            assert_eq!(
                doc.get_first(title).unwrap().as_str().unwrap(),
                format!("document number {}", i)
            );
        }
    }
}
