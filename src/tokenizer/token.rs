/// One token produced by a `TokenStream` (§6 "Analyzer contract").
///
/// `text`/`position`/`offset_from`/`offset_to` are always populated by
/// the two bundled analyzers; `payload` and `position_length` exist so
/// an external, more sophisticated analyzer (a stemmer, a synonym
/// expander) can plug in without the core needing to change shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    /// Token ordinal within the field's token stream, starting at 0.
    /// Consecutive tokens normally differ by 1; an external filter that
    /// drops stopwords may leave gaps so that phrase slop across a
    /// removed word is still computed correctly.
    pub position: usize,
    /// Number of positions this token occupies; 1 for ordinary tokens,
    /// greater than 1 for a multi-word synonym standing in for several
    /// source positions.
    pub position_length: usize,
    /// The token's own text, after whatever normalization the
    /// tokenizer performs (e.g. lowercasing).
    pub text: String,
    /// Byte offset of the first character of the token in the original
    /// text.
    pub offset_from: usize,
    /// Byte offset one past the last character of the token.
    pub offset_to: usize,
    /// Opaque, analyzer-defined bytes carried alongside the token and
    /// stored in the posting if the field's format requests payloads.
    pub payload: Vec<u8>,
}

impl Token {
    pub fn reset(&mut self) {
        self.position = 0;
        self.position_length = 1;
        self.text.clear();
        self.offset_from = 0;
        self.offset_to = 0;
        self.payload.clear();
    }
}
