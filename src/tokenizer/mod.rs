//! Text analysis (§6 "Analyzer contract"): turns a field's string value
//! into a stream of `Token`s that the indexer records into postings.
//! Stemming, stopword filtering, and n-gram generation are explicitly
//! out of scope (§1 Non-goals) -- they plug in externally as another
//! `Tokenizer` implementation registered with a `TokenizerManager`.

mod facet_tokenizer;
mod raw_tokenizer;
mod simple_tokenizer;
mod token;
mod tokenizer;
mod tokenizer_manager;

pub use self::facet_tokenizer::{FacetTokenStream, FacetTokenizer};
pub use self::raw_tokenizer::RawTokenizer;
pub use self::simple_tokenizer::SimpleTokenizer;
pub use self::token::Token;
pub use self::tokenizer::{BoxedTokenizer, TokenStream, Tokenizer, TokenizerClone};
pub use self::tokenizer_manager::TokenizerManager;
