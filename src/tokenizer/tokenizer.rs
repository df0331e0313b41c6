use crate::tokenizer::Token;

/// Gap (in token positions) inserted between successive values of a
/// multi-valued field, so a phrase query never spuriously matches
/// across two distinct values of the same field.
const POSITION_GAP: usize = 2;

/// A lazy sequence of `Token`s (§6 "Analyzer contract"): pull-based
/// rather than generator-based (§9 "Generator/yield-based matcher
/// loops" applies here too -- the core never uses language-level
/// generators).
pub trait TokenStream {
    /// Advances to the next token; returns `false` once exhausted.
    fn advance(&mut self) -> bool;

    fn token(&self) -> &Token;

    fn token_mut(&mut self) -> &mut Token;

    /// Convenience driver: calls `sink` once per token in order.
    fn process(&mut self, sink: &mut dyn FnMut(&Token)) -> u32 {
        let mut count = 0u32;
        while self.advance() {
            sink(self.token());
            count += 1;
        }
        count
    }
}

/// A boxed `Tokenizer` stored per-field by `SegmentWriter`, resolved by
/// name from a `TokenizerManager` at indexing and query time.
pub type BoxedTokenizer = Box<dyn Tokenizer>;

/// Callable that turns a string into a `TokenStream` (§6 "Analyzer
/// contract"). Implementors must be clonable so the manager's registry
/// can hand out independent copies (most tokenizers are zero-sized or
/// trivially small; stateful ones must make their state `Clone`, not
/// shared, since a `TokenStream` must not observe concurrent mutation
/// from another thread's indexing).
pub trait Tokenizer: 'static + Send + Sync + TokenizerClone {
    fn token_stream<'a>(&self, text: &'a str) -> Box<dyn TokenStream + 'a>;

    /// Indexes several values of the same multi-valued field as one
    /// logical stream, separated by a position gap so phrase queries
    /// cannot span two distinct values.
    fn token_stream_texts<'a>(&self, texts: &[&'a str]) -> Box<dyn TokenStream + 'a> {
        let streams: Vec<Box<dyn TokenStream + 'a>> =
            texts.iter().map(|text| self.token_stream(text)).collect();
        Box::new(MultiValueTokenStream::new(streams))
    }
}

pub trait TokenizerClone {
    fn box_clone(&self) -> BoxedTokenizer;
}

impl<T: Tokenizer + Clone> TokenizerClone for T {
    fn box_clone(&self) -> BoxedTokenizer {
        Box::new(self.clone())
    }
}

impl Clone for BoxedTokenizer {
    fn clone(&self) -> BoxedTokenizer {
        self.box_clone()
    }
}

/// Chains several per-value token streams into one, bumping token
/// positions by `POSITION_GAP` at each value boundary.
///
/// Callers must call `token_mut` at most once per `advance()`: it
/// applies the running position shift in place and is not idempotent
/// across repeated calls for the same token.
struct MultiValueTokenStream<'a> {
    streams: Vec<Box<dyn TokenStream + 'a>>,
    stream_idx: usize,
    position_shift: usize,
}

impl<'a> MultiValueTokenStream<'a> {
    fn new(streams: Vec<Box<dyn TokenStream + 'a>>) -> MultiValueTokenStream<'a> {
        MultiValueTokenStream {
            streams,
            stream_idx: 0,
            position_shift: 0,
        }
    }
}

impl<'a> TokenStream for MultiValueTokenStream<'a> {
    fn advance(&mut self) -> bool {
        while self.stream_idx < self.streams.len() {
            if self.streams[self.stream_idx].advance() {
                return true;
            }
            self.position_shift += self.streams[self.stream_idx].token().position + POSITION_GAP;
            self.stream_idx += 1;
        }
        false
    }

    fn token(&self) -> &Token {
        self.streams[self.stream_idx].token()
    }

    fn token_mut(&mut self) -> &mut Token {
        let shift = self.position_shift;
        let token = self.streams[self.stream_idx].token_mut();
        token.position += shift;
        token
    }
}
