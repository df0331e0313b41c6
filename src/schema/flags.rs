use std::ops::BitOr;

/// Describes which on-disk sections a posting format carries, mirroring
/// the "format flags" of the data model: weights, positions, character
/// offsets and payloads are each optional and independently toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingsFormat {
    pub store_weights: bool,
    pub store_positions: bool,
    pub store_chars: bool,
    pub store_payloads: bool,
}

use serde::{Deserialize, Serialize};

impl PostingsFormat {
    pub const NONE: PostingsFormat = PostingsFormat {
        store_weights: false,
        store_positions: false,
        store_chars: false,
        store_payloads: false,
    };

    pub const FREQS: PostingsFormat = PostingsFormat {
        store_weights: true,
        store_positions: false,
        store_chars: false,
        store_payloads: false,
    };

    pub const POSITIONS: PostingsFormat = PostingsFormat {
        store_weights: true,
        store_positions: true,
        store_chars: false,
        store_payloads: false,
    };

    pub const ALL: PostingsFormat = PostingsFormat {
        store_weights: true,
        store_positions: true,
        store_chars: true,
        store_payloads: true,
    };

    pub fn has_positions(self) -> bool {
        self.store_positions
    }
}

/// A flag describing one piece of a `FieldType`'s behavior: stored,
/// indexed, columnar ("fast"), or unique-key. Schema builders combine
/// these with `|`, matching the teacher's `SchemaFlagList` pattern
/// (`TEXT | STORED`) instead of a struct-literal options type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaFlagList {
    pub is_stored: bool,
    pub is_indexed: bool,
    pub is_fast: bool,
    pub is_fast_vec: bool,
}

pub const STORED: SchemaFlagList = SchemaFlagList {
    is_stored: true,
    is_indexed: false,
    is_fast: false,
    is_fast_vec: false,
};

pub const INDEXED: SchemaFlagList = SchemaFlagList {
    is_stored: false,
    is_indexed: true,
    is_fast: false,
    is_fast_vec: false,
};

pub const FAST: SchemaFlagList = SchemaFlagList {
    is_stored: false,
    is_indexed: false,
    is_fast: true,
    is_fast_vec: false,
};

impl BitOr for SchemaFlagList {
    type Output = SchemaFlagList;

    fn bitor(self, rhs: SchemaFlagList) -> SchemaFlagList {
        SchemaFlagList {
            is_stored: self.is_stored || rhs.is_stored,
            is_indexed: self.is_indexed || rhs.is_indexed,
            is_fast: self.is_fast || rhs.is_fast,
            is_fast_vec: self.is_fast_vec || rhs.is_fast_vec,
        }
    }
}
