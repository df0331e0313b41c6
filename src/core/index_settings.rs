use serde::{Deserialize, Serialize};

/// Compression codec used by the document store's block compressor
/// (§10 ambient stack: `snap` is always linked, `lz4` is available
/// behind the `lz4-compression` cargo feature).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compressor {
    None,
    Snappy,
    Lz4,
}

impl Default for Compressor {
    fn default() -> Compressor {
        Compressor::Snappy
    }
}

/// Index-level configuration that lives in the TOC rather than in
/// process-wide globals or environment variables (§6 "Environment"):
/// every setting a host application might want to tune is an explicit
/// field here, read once at `Index::create`/`Index::open` time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Compressor applied to blocks of stored documents.
    pub docstore_compression: Compressor,
    /// Number of documents buffered before a stored-document block is
    /// flushed and compressed as a unit.
    pub docstore_blocksize: usize,
}

impl Default for IndexSettings {
    fn default() -> IndexSettings {
        IndexSettings {
            docstore_compression: Compressor::default(),
            docstore_blocksize: 16_384,
        }
    }
}

/// Per-writer tuning, analogous to `IndexSettings` but scoped to one
/// `IndexWriter` session rather than persisted in the TOC.
#[derive(Debug, Clone)]
pub struct WriterSettings {
    /// Total heap budget (bytes) shared across indexing threads.
    pub memory_budget: usize,
    /// Number of indexing threads.
    pub num_threads: usize,
}

impl Default for WriterSettings {
    fn default() -> WriterSettings {
        WriterSettings {
            memory_budget: 256_000_000,
            num_threads: num_cpus::get().max(1),
        }
    }
}
