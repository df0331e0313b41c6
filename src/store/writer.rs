use std::io::{self, Write};

use crate::common::{BinarySerializable, VInt};
use crate::directory::{TerminatingWrite, WritePtr};
use crate::schema::Document;
use crate::store::compression::compress;
use crate::store::Compressor;
use crate::DocId;
use crate::Result;

/// Writes the document store's block-compressed layout (§4.2
/// "Stored-field detail"): documents are serialized one after another,
/// length-prefixed, into an uncompressed row buffer; once the buffer
/// reaches `block_size` it is compressed as a whole and appended to the
/// output, and a `(first_doc, byte_offset)` checkpoint is recorded for
/// the trailing skip list.
pub struct StoreWriter {
    compressor: Compressor,
    block_size: usize,
    write: WritePtr,
    written_bytes: u64,
    current_block: Vec<u8>,
    first_doc_in_block: DocId,
    next_doc_id: DocId,
    checkpoints: Vec<(DocId, u64)>,
}

impl StoreWriter {
    pub fn new(write: WritePtr, compressor: Compressor, block_size: usize) -> Result<StoreWriter> {
        Ok(StoreWriter {
            compressor,
            block_size,
            write,
            written_bytes: 0,
            current_block: Vec::new(),
            first_doc_in_block: 0,
            next_doc_id: 0,
            checkpoints: Vec::new(),
        })
    }

    /// Appends `doc`'s already-filtered (stored-only) field values to the
    /// block currently being built, flushing it first if it has grown
    /// past `block_size`.
    pub fn store(&mut self, doc: &Document) -> Result<()> {
        if self.current_block.is_empty() {
            self.first_doc_in_block = self.next_doc_id;
        }
        let mut buffer = Vec::new();
        doc.serialize(&mut buffer)?;
        VInt(buffer.len() as u64).serialize(&mut self.current_block)?;
        self.current_block.write_all(&buffer)?;
        self.next_doc_id += 1;
        if self.current_block.len() >= self.block_size {
            self.flush_block()?;
        }
        Ok(())
    }

    fn flush_block(&mut self) -> io::Result<()> {
        if self.current_block.is_empty() {
            return Ok(());
        }
        let compressed = compress(self.compressor, &self.current_block)?;
        self.checkpoints.push((self.first_doc_in_block, self.written_bytes));
        let mut header = Vec::new();
        VInt(compressed.len() as u64).serialize(&mut header)?;
        self.write.write_all(&header)?;
        self.write.write_all(&compressed)?;
        self.written_bytes += (header.len() + compressed.len()) as u64;
        self.current_block.clear();
        Ok(())
    }

    /// Flushes any buffered block, writes the checkpoint skip list and a
    /// fixed-width footer pointing at it, and finalizes the underlying
    /// file.
    pub fn close(mut self) -> Result<()> {
        self.flush_block()?;
        let offset_index_start = self.written_bytes;
        let mut index_buffer = Vec::new();
        VInt(self.checkpoints.len() as u64).serialize(&mut index_buffer)?;
        for &(first_doc, offset) in &self.checkpoints {
            VInt(u64::from(first_doc)).serialize(&mut index_buffer)?;
            VInt(offset).serialize(&mut index_buffer)?;
        }
        self.write.write_all(&index_buffer)?;

        offset_index_start.serialize(&mut self.write)?;
        let compressor_tag = compressor_tag(self.compressor);
        compressor_tag.serialize(&mut self.write)?;
        self.write.terminate()?;
        Ok(())
    }
}

pub(crate) fn compressor_tag(compressor: Compressor) -> u8 {
    match compressor {
        Compressor::None => 0,
        Compressor::Snappy => 1,
        Compressor::Lz4 => 2,
    }
}

pub(crate) fn compressor_from_tag(tag: u8) -> io::Result<Compressor> {
    match tag {
        0 => Ok(Compressor::None),
        1 => Ok(Compressor::Snappy),
        2 => Ok(Compressor::Lz4),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unknown store compressor tag {}", tag),
        )),
    }
}
