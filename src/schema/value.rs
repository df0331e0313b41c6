use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use super::Facet;
use crate::common::{BinarySerializable, VInt};

/// A value bound to a field inside a `Document`. Numeric kinds are kept
/// distinct (rather than folded into one `f64`) so that a schema
/// mismatch -- storing a `Str` into a `U64` field -- is caught at
/// indexing time instead of silently truncating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    U64(u64),
    I64(i64),
    F64(f64),
    /// Milliseconds since the Unix epoch, UTC.
    Date(i64),
    Bytes(Vec<u8>),
    Facet(Facet),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_facet(&self) -> Option<&Facet> {
        match self {
            Value::Facet(facet) => Some(facet),
            _ => None,
        }
    }

    /// Milliseconds since the Unix epoch, for a `Value::Date`.
    pub fn as_date(&self) -> Option<i64> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Value {
        Value::Str(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Value {
        Value::Str(text.to_string())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Value {
        Value::U64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::F64(v)
    }
}

impl From<Facet> for Value {
    fn from(facet: Facet) -> Value {
        Value::Facet(facet)
    }
}

/// A tag byte ahead of each serialized `Value`, so the document store can
/// deserialize a row without consulting the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum ValueTag {
    Str = 0,
    U64 = 1,
    I64 = 2,
    F64 = 3,
    Date = 4,
    Bytes = 5,
    Facet = 6,
}

impl BinarySerializable for Value {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Value::Str(text) => {
                (ValueTag::Str as u8).serialize(writer)?;
                text.serialize(writer)
            }
            Value::U64(v) => {
                (ValueTag::U64 as u8).serialize(writer)?;
                VInt(*v).serialize(writer)
            }
            Value::I64(v) => {
                (ValueTag::I64 as u8).serialize(writer)?;
                VInt(common_zigzag_encode(*v)).serialize(writer)
            }
            Value::F64(v) => {
                (ValueTag::F64 as u8).serialize(writer)?;
                v.to_bits().serialize(writer)
            }
            Value::Date(v) => {
                (ValueTag::Date as u8).serialize(writer)?;
                VInt(common_zigzag_encode(*v)).serialize(writer)
            }
            Value::Bytes(bytes) => {
                (ValueTag::Bytes as u8).serialize(writer)?;
                bytes.serialize(writer)
            }
            Value::Facet(facet) => {
                (ValueTag::Facet as u8).serialize(writer)?;
                facet.serialize(writer)
            }
        }
    }

    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let tag = u8::deserialize(reader)?;
        match tag {
            0 => Ok(Value::Str(String::deserialize(reader)?)),
            1 => Ok(Value::U64(VInt::deserialize(reader)?.0)),
            2 => Ok(Value::I64(common_zigzag_decode(
                VInt::deserialize(reader)?.0,
            ))),
            3 => Ok(Value::F64(f64::from_bits(u64::deserialize(reader)?))),
            4 => Ok(Value::Date(common_zigzag_decode(
                VInt::deserialize(reader)?.0,
            ))),
            5 => Ok(Value::Bytes(Vec::<u8>::deserialize(reader)?)),
            6 => Ok(Value::Facet(Facet::deserialize(reader)?)),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown value tag {}", tag),
            )),
        }
    }
}

fn common_zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn common_zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) {
        let mut buffer = Vec::new();
        value.serialize(&mut buffer).unwrap();
        let read_back = Value::deserialize(&mut &buffer[..]).unwrap();
        assert_eq!(value, read_back);
    }

    #[test]
    fn test_value_roundtrip() {
        roundtrip(Value::Str("hello".to_string()));
        roundtrip(Value::U64(42));
        roundtrip(Value::I64(-42));
        roundtrip(Value::F64(1.5));
        roundtrip(Value::Date(-1000));
        roundtrip(Value::Bytes(vec![1, 2, 3]));
        roundtrip(Value::Facet(Facet::root()));
    }

    #[test]
    fn test_zigzag_roundtrip() {
        for v in [0i64, 1, -1, 42, -42, i64::MAX, i64::MIN] {
            assert_eq!(common_zigzag_decode(common_zigzag_encode(v)), v);
        }
    }
}
