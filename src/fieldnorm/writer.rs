use std::io;

use crate::common::CompositeWrite;
use crate::directory::WritePtr;
use crate::fieldnorm::fieldnorm_to_id;
use crate::schema::{Field, Schema};
use crate::DocId;

/// Accumulates, per indexed field, one length-in-tokens value per
/// document, in docid order. Flushed once per segment by
/// `serialize` into the `FIELDNORMS` composite file.
pub struct FieldNormsWriter {
    fields: Vec<Field>,
    fieldnorms_buffer: Vec<Vec<u32>>,
}

impl FieldNormsWriter {
    pub fn for_schema(schema: &Schema) -> FieldNormsWriter {
        let fields: Vec<Field> = schema
            .fields()
            .filter(|(_, entry)| entry.is_indexed())
            .map(|(field, _)| field)
            .collect();
        let fieldnorms_buffer = fields.iter().map(|_| Vec::new()).collect();
        FieldNormsWriter { fields, fieldnorms_buffer }
    }

    fn buffer_for(&mut self, field: Field) -> Option<&mut Vec<u32>> {
        let idx = self.fields.iter().position(|&f| f == field)?;
        Some(&mut self.fieldnorms_buffer[idx])
    }

    /// `field`'s raw per-doc lengths in ascending docid order, or an
    /// empty slice if `field` isn't indexed (and so was never tracked).
    /// Used by the postings serializer to derive each posting's length
    /// bucket without duplicating this bookkeeping (see `DESIGN.md`).
    pub fn field_lengths(&self, field: Field) -> &[u32] {
        match self.fields.iter().position(|&f| f == field) {
            Some(idx) => &self.fieldnorms_buffer[idx],
            None => &[],
        }
    }

    /// Records `doc`'s length (in tokens) for `field`. Documents must be
    /// recorded in ascending docid order; any doc skipped over (no
    /// value for `field`) is backfilled with a length of 0 so the
    /// per-field array stays dense.
    pub fn record(&mut self, doc: DocId, field: Field, length: u32) {
        if let Some(buffer) = self.buffer_for(field) {
            while buffer.len() < doc as usize {
                buffer.push(0);
            }
            if buffer.len() == doc as usize {
                buffer.push(length);
            } else {
                buffer[doc as usize] = length;
            }
        }
    }

    /// Pads every field's array up to `max_doc` entries with 0, so
    /// fields absent from a given document still produce a byte in the
    /// serialized output.
    pub fn fill_up_to_max_doc(&mut self, max_doc: DocId) {
        for buffer in &mut self.fieldnorms_buffer {
            while buffer.len() < max_doc as usize {
                buffer.push(0);
            }
        }
    }

    pub fn serialize(&self, write: WritePtr) -> io::Result<()> {
        let mut composite_write = CompositeWrite::wrap(write);
        for (&field, lengths) in self.fields.iter().zip(self.fieldnorms_buffer.iter()) {
            let field_write = composite_write.for_field(field);
            for &length in lengths {
                field_write.write_all(&[fieldnorm_to_id(length)])?;
            }
        }
        composite_write.close()
    }
}

use std::io::Write as _;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Directory, RAMDirectory};
    use crate::fieldnorm::FieldNormReader;
    use crate::schema::SchemaBuilder;
    use std::path::Path;

    #[test]
    fn test_fieldnorms_roundtrip() {
        let mut schema_builder = SchemaBuilder::default();
        let title = schema_builder.add_text_field("title", crate::schema::TEXT);
        let schema = schema_builder.build();

        let mut writer = FieldNormsWriter::for_schema(&schema);
        writer.record(0, title, 3);
        writer.record(1, title, 120);
        writer.fill_up_to_max_doc(2);

        let directory = RAMDirectory::create();
        let path = Path::new("fieldnorm");
        {
            let write = directory.open_write(path).unwrap();
            writer.serialize(write).unwrap();
        }
        let source = directory.open_read(path).unwrap();
        let composite = crate::common::CompositeFile::open(&source).unwrap();
        let field_source = composite.open_read(title).unwrap();
        let reader = FieldNormReader::open(field_source);
        assert_eq!(reader.fieldnorm(0), 3);
        assert!(reader.fieldnorm(1) <= 120);
    }
}
