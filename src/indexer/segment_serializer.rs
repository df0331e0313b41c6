use crate::core::{Segment, SegmentComponent};
use crate::fastfield::FastFieldSerializer;
use crate::fieldnorm::FieldNormsWriter;
use crate::postings::PostingsSerializer;
use crate::store::StoreWriter;
use crate::Result;

/// Bundles the per-component serializers a `SegmentWriter`/`IndexMerger`
/// writes through, one set of open files per segment (§4.2). Holding
/// them behind one type keeps `write()`'s signature from growing a new
/// parameter every time a component is added.
pub struct SegmentSerializer {
    postings_serializer: PostingsSerializer,
    fast_field_serializer: FastFieldSerializer,
    fieldnorms_write: Option<crate::directory::WritePtr>,
    store_writer: StoreWriter,
}

impl SegmentSerializer {
    pub fn for_segment(segment: &mut Segment) -> Result<SegmentSerializer> {
        let terms_write = segment.open_write(SegmentComponent::TERMS)?;
        let postings_write = segment.open_write(SegmentComponent::POSTINGS)?;
        let positions_write = segment.open_write(SegmentComponent::POSITIONS)?;
        let postings_serializer = PostingsSerializer::new(terms_write, postings_write, positions_write)?;

        let fastfields_write = segment.open_write(SegmentComponent::FASTFIELDS)?;
        let fast_field_serializer = FastFieldSerializer::from_write(fastfields_write)?;

        let fieldnorms_write = segment.open_write(SegmentComponent::FIELDNORMS)?;

        let settings = segment.index().load_metas()?.settings;
        let store_write = segment.open_write(SegmentComponent::STORE)?;
        let store_writer = StoreWriter::new(
            store_write,
            settings.docstore_compression,
            settings.docstore_blocksize,
        )?;

        Ok(SegmentSerializer {
            postings_serializer,
            fast_field_serializer,
            fieldnorms_write: Some(fieldnorms_write),
            store_writer,
        })
    }

    pub fn get_postings_serializer(&mut self) -> &mut PostingsSerializer {
        &mut self.postings_serializer
    }

    pub fn get_fast_field_serializer(&mut self) -> &mut FastFieldSerializer {
        &mut self.fast_field_serializer
    }

    pub fn get_fieldnorms_serializer(&mut self) -> crate::directory::WritePtr {
        self.fieldnorms_write
            .take()
            .expect("fieldnorms serializer already taken")
    }

    pub fn get_store_writer(&mut self) -> &mut StoreWriter {
        &mut self.store_writer
    }

    pub fn close(self) -> Result<()> {
        self.postings_serializer.close()?;
        self.fast_field_serializer.close()?;
        self.store_writer.close()?;
        Ok(())
    }
}
