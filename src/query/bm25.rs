use crate::core::SegmentReader;
use crate::schema::Field;
use crate::Score;

/// BM25 scoring parameters and the per-segment statistics (IDF, average
/// field length) they're combined with (§4.4 "Default: BM25F": per-field
/// `k1`, `b`, field boost). One `Bm25Weight` is built per segment, since
/// doc frequency and average field length are both segment-local
/// quantities; `k1`/`b`/the field's own boost come from the field's
/// schema entry, so different fields in the same query (title vs body)
/// can saturate term frequency and normalize length differently.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Weight {
    k1: f32,
    b: f32,
    boost: f32,
    idf: f32,
    average_fieldnorm: f32,
}

impl Bm25Weight {
    /// `term_doc_freq` and `total_num_docs` are this segment's; `boost`
    /// is the query-level boost for this term/clause, multiplied with
    /// the field's own BM25F boost from its schema entry.
    pub fn for_one_term(
        reader: &SegmentReader,
        field: Field,
        term_doc_freq: u32,
        boost: f32,
    ) -> Bm25Weight {
        let total_num_docs = reader.num_docs().max(1);
        let idf = idf(term_doc_freq, total_num_docs);
        let average_fieldnorm = average_fieldnorm(reader, field);
        let field_params = reader.schema().get_field_entry(field).bm25_params();
        Bm25Weight {
            k1: field_params.k1,
            b: field_params.b,
            boost: boost * field_params.boost,
            idf,
            average_fieldnorm,
        }
    }

    pub fn score(&self, fieldnorm: u32, term_freq: u32) -> Score {
        let fieldnorm = fieldnorm.max(1) as f32;
        let term_freq = term_freq as f32;
        let norm = self.k1 * (1.0 - self.b + self.b * fieldnorm / self.average_fieldnorm.max(1.0));
        self.boost * self.idf * (term_freq * (self.k1 + 1.0)) / (term_freq + norm)
    }

    /// An upper bound on this weight's score over any doc/term-freq,
    /// used by block-max style skipping (§4.3 "Block-max skip
    /// optimization"). Term frequency has no hard ceiling, so this is
    /// the limit as `term_freq -> infinity` with the friendliest
    /// (shortest) possible field length.
    pub fn max_score(&self) -> Score {
        self.boost * self.idf * (self.k1 + 1.0)
    }
}

/// Robertson/Sparck-Jones IDF, floored at a small positive value so a
/// term present in every document still contributes a (small) positive
/// score rather than zero or negative.
fn idf(doc_freq: u32, total_num_docs: u32) -> f32 {
    let x = ((total_num_docs as f32 - doc_freq as f32 + 0.5) / (doc_freq as f32 + 0.5)) + 1.0;
    x.ln().max(1e-4)
}

fn average_fieldnorm(reader: &SegmentReader, field: Field) -> f32 {
    let fieldnorm_reader = match reader.fieldnorm_reader(field) {
        Some(fieldnorm_reader) => fieldnorm_reader,
        None => return 1.0,
    };
    let num_docs = fieldnorm_reader.num_docs();
    if num_docs == 0 {
        return 1.0;
    }
    let total: u64 = (0..num_docs).map(|doc| u64::from(fieldnorm_reader.fieldnorm(doc))).sum();
    (total as f32 / num_docs as f32).max(1.0)
}
