use crate::directory::ReadOnlySource;
use crate::fieldnorm::id_to_fieldnorm;
use crate::DocId;

/// Random-access view over one field's per-document length codes,
/// backed by a zero-copy slice of the segment's `FIELDNORMS` file.
#[derive(Clone)]
pub struct FieldNormReader {
    data: ReadOnlySource,
}

impl FieldNormReader {
    pub fn open(data: ReadOnlySource) -> FieldNormReader {
        FieldNormReader { data }
    }

    pub fn num_docs(&self) -> u32 {
        self.data.len() as u32
    }

    /// Returns the raw stored byte code for `doc`, without decoding it
    /// into an approximate length. BM25's IDF/length-norm computation
    /// only needs the code, not the length itself.
    pub fn fieldnorm_id(&self, doc: DocId) -> u8 {
        self.data.as_slice()[doc as usize]
    }

    /// Decodes `doc`'s stored code into its (possibly approximate)
    /// length in tokens.
    pub fn fieldnorm(&self, doc: DocId) -> u32 {
        id_to_fieldnorm(self.fieldnorm_id(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Directory, RAMDirectory};
    use std::path::Path;

    #[test]
    fn test_fieldnorm_reader_over_raw_bytes() {
        let directory = RAMDirectory::create();
        let path = Path::new("raw_norms");
        {
            let mut write = directory.open_write(path).unwrap();
            use std::io::Write;
            write.write_all(&[0u8, 3u8, 24u8]).unwrap();
            write.terminate().unwrap();
        }
        let source = directory.open_read(path).unwrap();
        let reader = FieldNormReader::open(source);
        assert_eq!(reader.num_docs(), 3);
        assert_eq!(reader.fieldnorm(0), 0);
        assert_eq!(reader.fieldnorm(1), 3);
        assert_eq!(reader.fieldnorm_id(2), 24);
    }
}
