use crate::common::{compute_num_bits, BinarySerializable, CompositeWrite, VInt};
use crate::directory::WritePtr;
use crate::fastfield::bitpacker::BitPacker;
use crate::schema::Field;
use crate::Result;

/// Writes one composite file's worth of fast-field columns. A column is
/// `[VInt min_value][u8 num_bits][VInt num_vals][bit-packed (val -
/// min_value) per val]`; `num_bits` is chosen as the narrowest width
/// that holds the column's full value range, so a constant column costs
/// zero bits beyond its header.
pub struct FastFieldSerializer {
    composite_write: CompositeWrite<WritePtr>,
}

impl FastFieldSerializer {
    pub fn from_write(write: WritePtr) -> Result<FastFieldSerializer> {
        Ok(FastFieldSerializer {
            composite_write: CompositeWrite::wrap(write),
        })
    }

    pub fn write_column(&mut self, field: Field, idx: usize, values: &[u64]) -> Result<()> {
        let min_value = values.iter().copied().min().unwrap_or(0);
        let max_value = values.iter().copied().max().unwrap_or(0);
        let num_bits = compute_num_bits(max_value - min_value);
        let writer = self.composite_write.for_field_with_idx(field, idx);
        VInt(min_value).serialize(writer)?;
        num_bits.serialize(writer)?;
        VInt(values.len() as u64).serialize(writer)?;
        let mut bit_packer = BitPacker::new();
        for &value in values {
            bit_packer.write(value - min_value, num_bits, writer)?;
        }
        bit_packer.close(writer)?;
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        self.composite_write.close()?;
        Ok(())
    }
}
