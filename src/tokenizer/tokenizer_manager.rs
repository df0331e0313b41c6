use crate::tokenizer::{BoxedTokenizer, RawTokenizer, SimpleTokenizer};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry mapping an analyzer name (as stored on `TextOptions`) to the
/// `BoxedTokenizer` it resolves to, both at index time and at query
/// parse time. Cloned cheaply: the map itself is behind an `Arc`.
#[derive(Clone)]
pub struct TokenizerManager {
    tokenizers: Arc<RwLock<HashMap<String, BoxedTokenizer>>>,
}

impl TokenizerManager {
    pub fn new() -> TokenizerManager {
        let manager = TokenizerManager {
            tokenizers: Arc::new(RwLock::new(HashMap::new())),
        };
        manager.register("default", SimpleTokenizer);
        manager.register("raw", RawTokenizer);
        manager
    }

    pub fn register<T: Into<BoxedTokenizer>>(&self, name: &str, tokenizer: T) {
        self.tokenizers
            .write()
            .expect("tokenizer registry lock poisoned")
            .insert(name.to_string(), tokenizer.into());
    }

    pub fn get(&self, name: &str) -> Option<BoxedTokenizer> {
        self.tokenizers
            .read()
            .expect("tokenizer registry lock poisoned")
            .get(name)
            .cloned()
    }
}

impl Default for TokenizerManager {
    fn default() -> TokenizerManager {
        TokenizerManager::new()
    }
}

impl From<RawTokenizer> for BoxedTokenizer {
    fn from(tokenizer: RawTokenizer) -> BoxedTokenizer {
        Box::new(tokenizer)
    }
}

impl From<SimpleTokenizer> for BoxedTokenizer {
    fn from(tokenizer: SimpleTokenizer) -> BoxedTokenizer {
        Box::new(tokenizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenStream;

    #[test]
    fn test_default_registrations_resolve() {
        let manager = TokenizerManager::new();
        assert!(manager.get("default").is_some());
        assert!(manager.get("raw").is_some());
        assert!(manager.get("nonexistent").is_none());
    }

    #[test]
    fn test_resolved_tokenizer_tokenizes() {
        let manager = TokenizerManager::new();
        let tokenizer = manager.get("default").unwrap();
        let mut stream = tokenizer.token_stream("Hello World");
        let mut count = 0;
        stream.process(&mut |_| count += 1);
        assert_eq!(count, 2);
    }
}
