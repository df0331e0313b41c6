use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use super::flags::SchemaFlagList;

/// Options for `u64`/`i64`/`f64`/date fields. All four numeric kinds share
/// the same option surface; only the sortable byte encoding differs
/// (`schema::value` maps signed/float values into the unsigned,
/// order-preserving domain before the bytes ever reach a posting or a
/// column, exactly as the data model requires).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntOptions {
    indexed: bool,
    stored: bool,
    fast: bool,
    unique: bool,
}

impl IntOptions {
    pub fn is_indexed(self) -> bool {
        self.indexed
    }

    pub fn is_stored(self) -> bool {
        self.stored
    }

    pub fn is_fast(self) -> bool {
        self.fast
    }

    pub fn is_unique(self) -> bool {
        self.unique
    }

    pub fn set_indexed(mut self) -> IntOptions {
        self.indexed = true;
        self
    }

    pub fn set_stored(mut self) -> IntOptions {
        self.stored = true;
        self
    }

    pub fn set_fast(mut self) -> IntOptions {
        self.fast = true;
        self
    }

    pub fn set_unique(mut self) -> IntOptions {
        self.unique = true;
        self
    }
}

impl From<SchemaFlagList> for IntOptions {
    fn from(flags: SchemaFlagList) -> IntOptions {
        let mut opts = IntOptions::default();
        if flags.is_indexed {
            opts = opts.set_indexed();
        }
        if flags.is_stored {
            opts = opts.set_stored();
        }
        if flags.is_fast {
            opts = opts.set_fast();
        }
        opts
    }
}

impl BitOr for IntOptions {
    type Output = IntOptions;

    fn bitor(self, rhs: IntOptions) -> IntOptions {
        IntOptions {
            indexed: self.indexed || rhs.indexed,
            stored: self.stored || rhs.stored,
            fast: self.fast || rhs.fast,
            unique: self.unique || rhs.unique,
        }
    }
}

impl BitOr<SchemaFlagList> for IntOptions {
    type Output = IntOptions;

    fn bitor(self, rhs: SchemaFlagList) -> IntOptions {
        self | IntOptions::from(rhs)
    }
}

/// Bytes fields: opaque, never analyzed, optionally stored/fast/indexed
/// as a single exact-match token.
pub use self::IntOptions as BytesOptions;
