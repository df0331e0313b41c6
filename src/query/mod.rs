//! Query tree and matcher engine (§4.3/§4.4/§6 "Query tree"). A `Query`
//! is a cheap, cloneable description of what to match; `Query::weight`
//! compiles it against a `Schema` into a `Weight`, which in turn hands
//! out one `Scorer` per segment. Combinators (`Union`, `Intersection`,
//! `Exclude`, `Require`, `AndMaybe`, `BooleanQuery`) build larger
//! matchers out of smaller ones at the `Scorer` level, independent of
//! how the `Query` tree that produced them looked.
//!
//! This crate builds query trees directly rather than parsing a query
//! string -- see the crate root docs for the scope boundary.

mod all_query;
mod bm25;
mod boolean_query;
mod boost_query;
mod dismax_query;
mod doc_set;
mod empty_query;
mod exclude;
mod fuzzy_query;
mod intersection;
mod occur;
mod phrase_query;
mod prefix_query;
mod query;
mod range_query;
mod regex_query;
mod require;
mod scorer;
pub mod span;
mod term_query;
mod union;
mod variations_query;
mod weight;

pub use self::all_query::AllQuery;
pub use self::bm25::Bm25Weight;
pub use self::boolean_query::BooleanQuery;
pub use self::boost_query::BoostQuery;
pub use self::dismax_query::DisjunctionMaxQuery;
pub use self::doc_set::{DocSet, TermMatcher};
pub use self::empty_query::{EmptyQuery, EmptyScorer};
pub use self::exclude::Exclude;
pub use self::fuzzy_query::FuzzyTermQuery;
pub use self::intersection::Intersection;
pub use self::occur::Occur;
pub use self::phrase_query::PhraseQuery;
pub use self::prefix_query::PrefixQuery;
pub use self::query::{count, Query};
pub use self::range_query::RangeQuery;
pub use self::regex_query::{RegexQuery, WildcardQuery};
pub use self::require::{AndMaybe, Require};
pub use self::scorer::{ConstScorer, Scorer, SkipResult};
pub use self::span::{
    Span, SpanBeforeQuery, SpanConditionQuery, SpanContainingQuery, SpanNearQuery, SpanNotQuery, SpanOrQuery,
};
pub use self::term_query::TermQuery;
pub use self::union::Union;
pub use self::variations_query::VariationsQuery;
pub use self::weight::Weight;
