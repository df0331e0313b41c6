use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Trait implemented by every type that has a fixed-width, little-endian
/// on-disk representation.
///
/// All integers are always stored little-endian regardless of host
/// endianness; readers never need to byte-swap on little-endian hosts and
/// swap transparently (via `from_le`) on big-endian ones.
pub trait BinarySerializable: fmt::Debug + Sized {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()>;
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self>;
}

use std::fmt;

impl BinarySerializable for u32 {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(*self)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u32::<LittleEndian>()
    }
}

impl BinarySerializable for u64 {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u64::<LittleEndian>(*self)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u64::<LittleEndian>()
    }
}

impl BinarySerializable for f32 {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_f32::<LittleEndian>(*self)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_f32::<LittleEndian>()
    }
}

impl BinarySerializable for u8 {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(*self)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u8()
    }
}

impl BinarySerializable for String {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        super::VInt(self.len() as u64).serialize(writer)?;
        writer.write_all(self.as_bytes())
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let len = super::VInt::deserialize(reader)?.0 as usize;
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<T: BinarySerializable> BinarySerializable for Vec<T> {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        super::VInt(self.len() as u64).serialize(writer)?;
        for el in self {
            el.serialize(writer)?;
        }
        Ok(())
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let len = super::VInt::deserialize(reader)?.0 as usize;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::deserialize(reader)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: BinarySerializable + PartialEq>(val: T) {
        let mut buf = Vec::new();
        val.serialize(&mut buf).unwrap();
        let read = T::deserialize(&mut &buf[..]).unwrap();
        assert_eq!(val, read);
    }

    #[test]
    fn test_roundtrip_primitives() {
        roundtrip(12u32);
        roundtrip(u64::MAX);
        roundtrip(3.5f32);
        roundtrip("hello world".to_string());
        roundtrip(vec![1u32, 2, 3, 4]);
    }
}
