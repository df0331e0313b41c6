use std::collections::HashMap;
use std::io::{self, Write};

use crate::common::counting_writer::CountingWriter;
use crate::common::serialize::BinarySerializable;
use crate::common::vint::VInt;
use crate::directory::{ReadOnlySource, TerminatingWrite, WritePtr};
use crate::schema::Field;

/// Several segment components (term positions, fast fields, field norms)
/// are conceptually "one logical file per field" but are written as a
/// single physical file, to keep the segment's file count independent of
/// the number of fields in the schema. A `CompositeFile` is that single
/// physical file: field payloads one after another, followed by a
/// footer mapping `(field, idx)` to a byte range.
///
/// `idx` distinguishes multiple logical streams for the same field
/// inside one composite file (a fast field's data and its null bitmap,
/// for instance); most callers only ever use `idx = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct FileAddr {
    field: Field,
    idx: usize,
}

impl BinarySerializable for FileAddr {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.field.serialize(writer)?;
        VInt(self.idx as u64).serialize(writer)
    }

    fn deserialize<R: std::io::Read>(reader: &mut R) -> io::Result<Self> {
        let field = Field::deserialize(reader)?;
        let idx = VInt::deserialize(reader)?.0 as usize;
        Ok(FileAddr { field, idx })
    }
}

/// Accumulates one per-field payload at a time into a composite file's
/// writer. Fields may be written in any order; `write_all`/`close`
/// appends the footer once every field has been written.
pub struct CompositeWrite<W = WritePtr> {
    write: CountingWriter<W>,
    offsets: Vec<(FileAddr, u64)>,
}

impl<W: TerminatingWrite + Write> CompositeWrite<W> {
    pub fn wrap(write: W) -> CompositeWrite<W> {
        CompositeWrite {
            write: CountingWriter::wrap(write),
            offsets: Vec::new(),
        }
    }

    /// Returns a writer for the next field payload. The caller must
    /// finish writing to it (and drop it) before calling `for_field`
    /// again or `close`ing the composite file -- the offset bookkeeping
    /// below assumes payloads are written strictly one after another.
    pub fn for_field(&mut self, field: Field) -> &mut impl Write {
        self.for_field_with_idx(field, 0)
    }

    pub fn for_field_with_idx(&mut self, field: Field, idx: usize) -> &mut impl Write {
        self.offsets
            .push((FileAddr { field, idx }, self.write.written_bytes()));
        &mut self.write
    }

    /// Writes the footer (field address -> start offset, one past the
    /// last field's end) and terminates the underlying write.
    pub fn close(mut self) -> io::Result<()> {
        let footer_start = self.write.written_bytes();
        VInt(self.offsets.len() as u64).serialize(&mut self.write)?;
        for (addr, offset) in &self.offsets {
            addr.serialize(&mut self.write)?;
            VInt(*offset).serialize(&mut self.write)?;
        }
        footer_start.serialize(&mut self.write)?;
        self.write.finish()?.terminate()
    }
}

/// A composite file opened for reading: the footer has already been
/// parsed into an in-memory manifest, so `open_read` is a pure slice
/// lookup with no further I/O.
#[derive(Clone)]
pub struct CompositeFile {
    data: ReadOnlySource,
    offsets_index: HashMap<FileAddr, (u64, u64)>,
}

impl CompositeFile {
    pub fn open(source: &ReadOnlySource) -> io::Result<CompositeFile> {
        let total_len = source.len();
        if total_len < 8 {
            return Ok(CompositeFile {
                data: source.clone(),
                offsets_index: HashMap::new(),
            });
        }
        let footer_start_bytes = source.slice(total_len - 8, total_len);
        let footer_start = u64::deserialize(&mut footer_start_bytes.as_slice())? as usize;

        let footer_bytes = source.slice(footer_start, total_len - 8);
        let mut footer_cursor = footer_bytes.as_slice();
        let num_fields = VInt::deserialize(&mut footer_cursor)?.0 as usize;
        let mut entries = Vec::with_capacity(num_fields);
        for _ in 0..num_fields {
            let addr = FileAddr::deserialize(&mut footer_cursor)?;
            let offset = VInt::deserialize(&mut footer_cursor)?.0;
            entries.push((addr, offset));
        }

        let mut offsets_index = HashMap::with_capacity(num_fields);
        for i in 0..entries.len() {
            let (addr, start) = entries[i];
            let stop = if i + 1 < entries.len() {
                entries[i + 1].1
            } else {
                footer_start as u64
            };
            offsets_index.insert(addr, (start, stop));
        }

        Ok(CompositeFile {
            data: source.clone(),
            offsets_index,
        })
    }

    pub fn open_read(&self, field: Field) -> Option<ReadOnlySource> {
        self.open_read_with_idx(field, 0)
    }

    pub fn open_read_with_idx(&self, field: Field, idx: usize) -> Option<ReadOnlySource> {
        let &(start, stop) = self.offsets_index.get(&FileAddr { field, idx })?;
        Some(self.data.slice(start as usize, stop as usize))
    }

    pub fn is_empty(&self) -> bool {
        self.offsets_index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Directory, RAMDirectory};
    use std::path::Path;

    #[test]
    fn test_composite_file_roundtrip() {
        let directory = RAMDirectory::create();
        let path = Path::new("composite");
        {
            let write = directory.open_write(path).unwrap();
            let mut composite_write = CompositeWrite::wrap(write);
            composite_write
                .for_field(Field(0))
                .write_all(b"hello")
                .unwrap();
            composite_write
                .for_field(Field(1))
                .write_all(b"world!!")
                .unwrap();
            composite_write.close().unwrap();
        }
        let source = directory.open_read(path).unwrap();
        let composite_file = CompositeFile::open(&source).unwrap();

        let field0 = composite_file.open_read(Field(0)).unwrap();
        assert_eq!(field0.as_slice(), b"hello");

        let field1 = composite_file.open_read(Field(1)).unwrap();
        assert_eq!(field1.as_slice(), b"world!!");

        assert!(composite_file.open_read(Field(2)).is_none());
    }

    #[test]
    fn test_composite_file_empty() {
        let directory = RAMDirectory::create();
        let path = Path::new("composite_empty");
        {
            let write = directory.open_write(path).unwrap();
            let composite_write: CompositeWrite<_> = CompositeWrite::wrap(write);
            composite_write.close().unwrap();
        }
        let source = directory.open_read(path).unwrap();
        let composite_file = CompositeFile::open(&source).unwrap();
        assert!(composite_file.is_empty());
    }
}
