//! Per-document, per-field token counts (§4.1 "Lengths section"),
//! stored as one byte per document so BM25's length normalization can
//! be read without touching the postings themselves. Values above the
//! exact range are bucketed into a deterministic log-scale code
//! (`code::fieldnorm_to_id` / `code::id_to_fieldnorm`).

mod code;
mod reader;
mod writer;

pub use self::code::{fieldnorm_to_id, id_to_fieldnorm};
pub use self::reader::FieldNormReader;
pub use self::writer::FieldNormsWriter;
