use std::io;

use crate::common::{BinarySerializable, CompositeFile, VInt};
use crate::directory::ReadOnlySource;
use crate::fastfield::bitpacker::BitUnpacker;
use crate::schema::{Field, Schema};
use crate::DocId;

/// Random-access reader over one `U64`/`I64`/`F64`/`Date` fast field
/// column. Values stay in their sortable `u64` encoding; callers that
/// need the signed/float domain back convert via
/// `schema::{sortable_u64_to_i64, sortable_u64_to_f64}`.
pub struct FastFieldReader {
    min_value: u64,
    num_vals: u64,
    bit_unpacker: BitUnpacker,
}

impl FastFieldReader {
    pub fn open(source: ReadOnlySource) -> io::Result<FastFieldReader> {
        let mut cursor = source.as_slice();
        let starting_len = cursor.len();
        let min_value = VInt::deserialize(&mut cursor)?.0;
        let num_bits = u8::deserialize(&mut cursor)?;
        let num_vals = VInt::deserialize(&mut cursor)?.0;
        let header_len = starting_len - cursor.len();
        let data = source.slice_from(header_len);
        Ok(FastFieldReader {
            min_value,
            num_vals,
            bit_unpacker: BitUnpacker::new(data, num_bits),
        })
    }

    pub fn get(&self, doc: DocId) -> u64 {
        self.min_value + self.bit_unpacker.get(u64::from(doc))
    }

    pub fn min_value(&self) -> u64 {
        self.min_value
    }

    pub fn num_vals(&self) -> u64 {
        self.num_vals
    }
}

/// Random-access reader over a multi-valued (facet) fast field: a
/// `vals` column (idx 0) holding term ordinals, and a `doc_index`
/// column (idx 1) of cumulative per-doc offsets into it.
pub struct MultiValueFastFieldReader {
    vals: FastFieldReader,
    doc_index: FastFieldReader,
}

impl MultiValueFastFieldReader {
    pub fn open(vals: FastFieldReader, doc_index: FastFieldReader) -> MultiValueFastFieldReader {
        MultiValueFastFieldReader { vals, doc_index }
    }

    /// Every term ordinal recorded against `doc`, in insertion order.
    pub fn get_vals(&self, doc: DocId) -> Vec<u64> {
        let start = self.doc_index.get(doc);
        let stop = self.doc_index.get(doc + 1);
        (start..stop).map(|ord| self.vals.get(ord as DocId)).collect()
    }
}

/// Opens every fast field column declared `FAST` (or the implicit facet
/// column) in one segment's `FASTFIELDS` composite file.
pub struct FastFieldsReader {
    composite_file: CompositeFile,
}

impl FastFieldsReader {
    pub fn open(source: ReadOnlySource) -> io::Result<FastFieldsReader> {
        Ok(FastFieldsReader {
            composite_file: CompositeFile::open(&source)?,
        })
    }

    pub fn u64_reader(&self, field: Field) -> Option<FastFieldReader> {
        let source = self.composite_file.open_read_with_idx(field, 0)?;
        FastFieldReader::open(source).ok()
    }

    pub fn multi_value_reader(&self, field: Field) -> Option<MultiValueFastFieldReader> {
        let vals = self.u64_reader(field)?;
        let doc_index_source = self.composite_file.open_read_with_idx(field, 1)?;
        let doc_index = FastFieldReader::open(doc_index_source).ok()?;
        Some(MultiValueFastFieldReader::open(vals, doc_index))
    }
}

/// Convenience used by the collector/scorer layer: whether `schema`
/// marks `field` as carrying a facet (multi-valued) fast field.
pub fn is_facet_field(schema: &Schema, field: Field) -> bool {
    matches!(
        schema.get_field_entry(field).field_type(),
        crate::schema::FieldType::HierarchicalFacet
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastfield::serializer::FastFieldSerializer;
    use crate::directory::{Directory, RAMDirectory};
    use std::path::Path;

    #[test]
    fn test_multivalue_fast_field_roundtrip() {
        let directory = RAMDirectory::create();
        let path = Path::new("fast_multi");
        let field = Field(0);
        {
            let write = directory.open_write(path).unwrap();
            let mut serializer = FastFieldSerializer::from_write(write).unwrap();
            // doc0 -> [5, 9], doc1 -> [], doc2 -> [2]
            serializer.write_column(field, 0, &[5, 9, 2]).unwrap();
            serializer.write_column(field, 1, &[0, 2, 2, 3]).unwrap();
            serializer.close().unwrap();
        }
        let source = directory.open_read(path).unwrap();
        let reader = FastFieldsReader::open(source).unwrap();
        let multi = reader.multi_value_reader(field).unwrap();
        assert_eq!(multi.get_vals(0), vec![5, 9]);
        assert_eq!(multi.get_vals(1), Vec::<u64>::new());
        assert_eq!(multi.get_vals(2), vec![2]);
    }

    #[test]
    fn test_constant_column_zero_bits() {
        let directory = RAMDirectory::create();
        let path = Path::new("fast_const");
        let field = Field(0);
        {
            let write = directory.open_write(path).unwrap();
            let mut serializer = FastFieldSerializer::from_write(write).unwrap();
            serializer.write_column(field, 0, &[7, 7, 7]).unwrap();
            serializer.close().unwrap();
        }
        let source = directory.open_read(path).unwrap();
        let reader = FastFieldsReader::open(source).unwrap();
        let column = reader.u64_reader(field).unwrap();
        for doc in 0..3 {
            assert_eq!(column.get(doc), 7);
        }
    }
}
