use crate::tokenizer::{Token, TokenStream, Tokenizer};

/// Emits the whole input as a single token, unmodified. Used by
/// `schema::STRING` for identifier-like fields that must match exactly
/// (§6 "Analyzer contract": the core ships this dependency-free
/// analyzer so the rest of the pipeline is exercisable without an
/// external NLP crate).
#[derive(Clone, Default)]
pub struct RawTokenizer;

pub struct RawTokenStream {
    token: Token,
    has_token: bool,
}

impl Tokenizer for RawTokenizer {
    fn token_stream<'a>(&self, text: &'a str) -> Box<dyn TokenStream + 'a> {
        Box::new(RawTokenStream {
            token: Token {
                position: 0,
                position_length: 1,
                text: text.to_string(),
                offset_from: 0,
                offset_to: text.len(),
                payload: Vec::new(),
            },
            has_token: !text.is_empty() || true,
        })
    }
}

impl TokenStream for RawTokenStream {
    fn advance(&mut self) -> bool {
        if self.has_token {
            self.has_token = false;
            true
        } else {
            false
        }
    }

    fn token(&self) -> &Token {
        &self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_tokenizer_single_token() {
        let mut stream = RawTokenizer.token_stream("Hello World");
        assert!(stream.advance());
        assert_eq!(stream.token().text, "Hello World");
        assert!(!stream.advance());
    }
}
