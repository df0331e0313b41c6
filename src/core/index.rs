use std::path::Path;

use crate::core::{IndexMeta, IndexReader, IndexReaderBuilder, Segment, SegmentId, SegmentMeta};
use crate::directory::{Directory, Lock, RAMDirectory, INDEX_WRITER_LOCK, META_LOCK};
use crate::indexer::IndexWriter;
use crate::schema::Schema;
use crate::tokenizer::TokenizerManager;
use crate::Result;

#[cfg(feature = "mmap")]
use crate::directory::MmapDirectory;

/// The well-known name of the TOC file (§6 "On-disk file naming"). We
/// carry tantivy's own convention of one atomically-rewritten file
/// rather than literally materializing a new `_toc_<generation>` file
/// per commit -- see `DESIGN.md` for the rationale -- but `IndexMeta`
/// still carries an explicit generation-like `opstamp` so a reader can
/// tell two metas apart.
pub const META_FILEPATH: &str = "meta.json";

/// Top-level handle to a full-text index: a `Directory`, the `Schema`
/// bound to it, and the process-wide `TokenizerManager` used to resolve
/// a text field's named analyzer (§6 "Analyzer contract").
#[derive(Clone)]
pub struct Index {
    directory: Box<dyn Directory>,
    schema: Schema,
    tokenizers: TokenizerManager,
}

impl Index {
    fn from_directory(directory: Box<dyn Directory>, schema: Schema) -> Index {
        Index {
            directory,
            schema,
            tokenizers: TokenizerManager::default(),
        }
    }

    /// Creates a brand new index backed by an in-memory directory. Used
    /// pervasively by tests and by callers who never need persistence.
    pub fn create_in_ram(schema: Schema) -> Index {
        let directory = RAMDirectory::create();
        let index = Index::from_directory(Box::new(directory), schema);
        index.write_initial_meta().expect("writing initial meta to a RAMDirectory cannot fail");
        index
    }

    /// Creates a brand new index on disk, behind the `mmap` feature.
    #[cfg(feature = "mmap")]
    pub fn create_in_dir<P: AsRef<Path>>(path: P, schema: Schema) -> Result<Index> {
        let directory = MmapDirectory::open(path.as_ref())?;
        let index = Index::from_directory(Box::new(directory), schema);
        index.write_initial_meta()?;
        Ok(index)
    }

    fn write_initial_meta(&self) -> Result<()> {
        let meta = IndexMeta::with_schema(self.schema.clone());
        self.save_metas(&meta)
    }

    /// Opens an already-existing index via an arbitrary `Directory`.
    pub fn open(directory: Box<dyn Directory>) -> Result<Index> {
        let meta = Index::load_metas_from(directory.as_ref())?;
        Ok(Index::from_directory(directory, meta.schema))
    }

    /// Opens an already-existing index on disk.
    #[cfg(feature = "mmap")]
    pub fn open_in_dir<P: AsRef<Path>>(path: P) -> Result<Index> {
        let directory = MmapDirectory::open(path.as_ref())?;
        Index::open(Box::new(directory))
    }

    pub fn schema(&self) -> Schema {
        self.schema.clone()
    }

    pub fn directory(&self) -> &dyn Directory {
        &*self.directory
    }

    pub fn tokenizers(&self) -> &TokenizerManager {
        &self.tokenizers
    }

    /// Allocates a brand new, empty segment bound to this index.
    pub fn new_segment(&self) -> Segment {
        let meta = SegmentMeta::new(SegmentId::generate(), 0);
        Segment::for_index(self.clone(), meta)
    }

    pub fn segment(&self, meta: SegmentMeta) -> Segment {
        Segment::for_index(self.clone(), meta)
    }

    fn load_metas_from(directory: &dyn Directory) -> Result<IndexMeta> {
        let meta_bytes = directory.atomic_read(Path::new(META_FILEPATH))?;
        let meta: IndexMeta = serde_json::from_slice(&meta_bytes)?;
        Ok(meta)
    }

    /// Reads the current TOC. A reader opened against the result stays
    /// a consistent snapshot until an explicit `refresh()` (§5
    /// "Ordering guarantees").
    pub fn load_metas(&self) -> Result<IndexMeta> {
        Index::load_metas_from(self.directory())
    }

    /// Atomically replaces the TOC -- the single linearization point
    /// described in §5.
    pub fn save_metas(&self, meta: &IndexMeta) -> Result<()> {
        let json = serde_json::to_vec_pretty(meta)?;
        self.directory.atomic_write(Path::new(META_FILEPATH), &json)?;
        Ok(())
    }

    pub fn writer_lock(&self) -> Lock {
        Lock::from_filename(INDEX_WRITER_LOCK, false)
    }

    pub fn meta_lock(&self) -> Lock {
        Lock::from_filename(META_LOCK, true)
    }

    /// Opens an `IndexWriter` with the default memory budget (256 MB)
    /// and one indexing thread per logical core.
    pub fn writer(&self) -> Result<IndexWriter> {
        let num_threads = num_cpus::get().max(1);
        self.writer_with_num_threads(num_threads, 256_000_000)
    }

    pub fn writer_with_num_threads(
        &self,
        num_threads: usize,
        overall_memory_budget: usize,
    ) -> Result<IndexWriter> {
        IndexWriter::new(self, num_threads, overall_memory_budget)
    }

    /// Opens an `IndexReader` with the default reload policy (manual;
    /// call `reader.reload()` to observe later commits).
    pub fn reader(&self) -> Result<IndexReader> {
        self.reader_builder().build()
    }

    pub fn reader_builder(&self) -> IndexReaderBuilder {
        IndexReaderBuilder::new(self.clone())
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Index({:?})", self.directory)
    }
}
