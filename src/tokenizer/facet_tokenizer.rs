use crate::tokenizer::{Token, TokenStream};

/// Not a `Tokenizer` resolved by name through the `TokenizerManager` --
/// facets are indexed directly by the `SegmentWriter`, which emits one
/// token per ancestor path prefix of the facet's `\u{1}`-separated
/// encoding (`Facet::ancestors`), so a query against `/electronics`
/// also matches `/electronics/laptops`.
pub struct FacetTokenizer;

pub struct FacetTokenStream<'a> {
    text: &'a str,
    separator_ends: Vec<usize>,
    idx: usize,
    token: Token,
}

impl FacetTokenizer {
    pub fn token_stream<'a>(&self, encoded: &'a str) -> FacetTokenStream<'a> {
        let mut separator_ends: Vec<usize> = encoded
            .char_indices()
            .filter(|&(_, ch)| ch == '\u{1}')
            .map(|(idx, _)| idx)
            .collect();
        separator_ends.push(encoded.len());
        FacetTokenStream {
            text: encoded,
            separator_ends,
            idx: 0,
            token: Token::default(),
        }
    }
}

impl<'a> TokenStream for FacetTokenStream<'a> {
    fn advance(&mut self) -> bool {
        if self.idx >= self.separator_ends.len() {
            return false;
        }
        let end = self.separator_ends[self.idx];
        self.token.reset();
        self.token.position = self.idx;
        self.token.offset_from = 0;
        self.token.offset_to = end;
        self.token.text = self.text[..end].to_string();
        self.idx += 1;
        true
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
    use crate::schema::Facet;

    #[test]
    fn test_facet_tokenizer_emits_one_token_per_ancestor() {
        let facet: Facet = "/a/b/c".parse().unwrap();
        let mut stream = FacetTokenizer.token_stream(facet.encoded_str());
        let mut texts = Vec::new();
        stream.process(&mut |token| texts.push(token.text.clone()));
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[0], "");
        assert_eq!(texts[3], facet.encoded_str());
    }
}
