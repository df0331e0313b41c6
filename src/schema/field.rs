use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::common::BinarySerializable;

/// Opaque handle to a field, assigned by the order fields were added to a
/// `SchemaBuilder`. Field identity is positional, not name-based, so that
/// hot paths never need to hash a `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Field(pub u32);

impl Field {
    pub fn field_id(self) -> u32 {
        self.0
    }
}

impl BinarySerializable for Field {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.0.serialize(writer)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Field(u32::deserialize(reader)?))
    }
}
