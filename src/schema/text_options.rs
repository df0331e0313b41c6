use std::borrow::Cow;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use super::flags::{PostingsFormat, SchemaFlagList};

/// How a text field is indexed: which analyzer (by name, resolved against
/// the process-wide `TokenizerManager` at indexing/query time, §6
/// "Analyzer contract") and which posting sections are stored.
///
/// The tokenizer name is `Cow<'static, str>` rather than `String` so that
/// the handful of built-in configurations (`TEXT`, `STRING`, below) can be
/// plain `const`s instead of functions built at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFieldIndexing {
    pub tokenizer: Cow<'static, str>,
    pub format: PostingsFormat,
    pub bm25: Bm25Params,
}

impl Default for TextFieldIndexing {
    fn default() -> Self {
        TextFieldIndexing {
            tokenizer: Cow::Borrowed("default"),
            format: PostingsFormat::FREQS,
            bm25: Bm25Params::default_const(),
        }
    }
}

impl TextFieldIndexing {
    pub fn set_tokenizer(mut self, tokenizer_name: &str) -> TextFieldIndexing {
        self.tokenizer = Cow::Owned(tokenizer_name.to_string());
        self
    }

    pub fn set_format(mut self, format: PostingsFormat) -> TextFieldIndexing {
        self.format = format;
        self
    }

    pub fn set_bm25(mut self, bm25: Bm25Params) -> TextFieldIndexing {
        self.bm25 = bm25;
        self
    }
}

/// Per-field BM25F scoring parameters (§4.4 "BM25F with per-field k1,
/// b, field boost"): how steeply term frequency saturates (`k1`), how
/// much the field's length is normalized against the field average
/// (`b`), and a static multiplier applied to every term matched in this
/// field regardless of query-level boost (`boost`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
    pub boost: f32,
}

impl Bm25Params {
    pub const fn default_const() -> Bm25Params {
        Bm25Params { k1: 1.2, b: 0.75, boost: 1.0 }
    }

    pub fn new(k1: f32, b: f32, boost: f32) -> Bm25Params {
        Bm25Params { k1, b, boost }
    }
}

impl Default for Bm25Params {
    fn default() -> Bm25Params {
        Bm25Params::default_const()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOptions {
    indexing: Option<TextFieldIndexing>,
    stored: bool,
    fast: bool,
    unique: bool,
}

impl TextOptions {
    pub fn is_indexed(&self) -> bool {
        self.indexing.is_some()
    }

    pub fn is_stored(&self) -> bool {
        self.stored
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn get_indexing_options(&self) -> Option<&TextFieldIndexing> {
        self.indexing.as_ref()
    }

    pub fn set_indexing_options(mut self, indexing: TextFieldIndexing) -> TextOptions {
        self.indexing = Some(indexing);
        self
    }

    pub fn set_stored(mut self) -> TextOptions {
        self.stored = true;
        self
    }

    pub fn set_fast(mut self) -> TextOptions {
        self.fast = true;
        self
    }

    pub fn set_unique(mut self) -> TextOptions {
        self.unique = true;
        self
    }
}

/// `text_field(name, TEXT | STORED)` merges in the plain `SchemaFlagList`
/// flags (`STORED`/`FAST`) on top of a base `TextOptions` such as `TEXT` or
/// `STRING`.
impl BitOr<SchemaFlagList> for TextOptions {
    type Output = TextOptions;

    fn bitor(mut self, rhs: SchemaFlagList) -> TextOptions {
        if rhs.is_stored {
            self.stored = true;
        }
        if rhs.is_fast {
            self.fast = true;
        }
        if rhs.is_indexed && self.indexing.is_none() {
            self.indexing = Some(TextFieldIndexing::default());
        }
        self
    }
}

/// Indexed with the default (whitespace + lowercase) tokenizer, term
/// frequencies and positions stored -- enough to run phrase queries.
/// Not stored: use `TEXT | STORED` to keep the original value around too.
pub const TEXT: TextOptions = TextOptions {
    indexing: Some(TextFieldIndexing {
        tokenizer: Cow::Borrowed("default"),
        format: PostingsFormat::POSITIONS,
        bm25: Bm25Params::default_const(),
    }),
    stored: false,
    fast: false,
    unique: false,
};

/// Indexed as a single raw token (the `raw` analyzer, no tokenization),
/// suited to identifiers and exact-match fields.
pub const STRING: TextOptions = TextOptions {
    indexing: Some(TextFieldIndexing {
        tokenizer: Cow::Borrowed("raw"),
        format: PostingsFormat::FREQS,
        bm25: Bm25Params::default_const(),
    }),
    stored: false,
    fast: false,
    unique: false,
};

/// Indexed with the default (whitespace + lowercase) tokenizer, term
/// frequencies and positions stored -- enough to run phrase queries.
pub fn text_full() -> TextOptions {
    TEXT
}

/// Indexed as a single raw token (the `raw` analyzer, no tokenization),
/// suited to identifiers and exact-match fields.
pub fn text_raw() -> TextOptions {
    STRING
}
