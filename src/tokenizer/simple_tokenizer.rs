use crate::tokenizer::{Token, TokenStream, Tokenizer};

/// Splits on any run of non-alphanumeric characters and lowercases each
/// resulting piece. The default analyzer bound to `schema::TEXT`; no
/// stemming, no stopword removal -- both are external collaborators
/// per §1/§6.
#[derive(Clone, Default)]
pub struct SimpleTokenizer;

pub struct SimpleTokenStream<'a> {
    text: &'a str,
    chars: std::str::CharIndices<'a>,
    token: Token,
    position: usize,
}

impl Tokenizer for SimpleTokenizer {
    fn token_stream<'a>(&self, text: &'a str) -> Box<dyn TokenStream + 'a> {
        Box::new(SimpleTokenStream {
            text,
            chars: text.char_indices(),
            token: Token::default(),
            position: 0,
        })
    }
}

impl<'a> SimpleTokenStream<'a> {
    fn search_token_end(&mut self, start: usize) -> usize {
        let mut end = start;
        for (offset, ch) in &mut self.chars {
            if !ch.is_alphanumeric() {
                return end;
            }
            end = offset + ch.len_utf8();
        }
        end
    }
}

impl<'a> TokenStream for SimpleTokenStream<'a> {
    fn advance(&mut self) -> bool {
        loop {
            match self.chars.clone().next() {
                None => return false,
                Some((start, ch)) if ch.is_alphanumeric() => {
                    self.chars.next();
                    let end = self.search_token_end(start);
                    self.token.reset();
                    self.token.position = self.position;
                    self.token.position_length = 1;
                    self.token.offset_from = start;
                    self.token.offset_to = end;
                    self.token.text = self.text[start..end].to_lowercase();
                    self.position += 1;
                    return true;
                }
                Some((_, _)) => {
                    self.chars.next();
                }
            }
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

    fn tokenize(text: &str) -> Vec<String> {
        let mut stream = SimpleTokenizer.token_stream(text);
        let mut out = Vec::new();
        stream.process(&mut |token| out.push(token.text.clone()));
        out
    }

    #[test]
    fn test_simple_tokenizer_splits_and_lowercases() {
        assert_eq!(
            tokenize("Hello, World! 42"),
            vec!["hello", "world", "42"]
        );
    }

    #[test]
    fn test_simple_tokenizer_positions_are_sequential() {
        let mut stream = SimpleTokenizer.token_stream("alfa bravo charlie");
        let mut positions = Vec::new();
        stream.process(&mut |token| positions.push(token.position));
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_simple_tokenizer_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
