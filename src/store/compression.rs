use std::io;

pub use crate::core::Compressor;

/// Compresses one whole block of concatenated, length-prefixed document
/// bytes (§4.2 "Stored-field detail"). `None` is a straight copy, kept
/// mostly for tests and tiny indices where compression overhead isn't
/// worth it.
pub fn compress(compressor: Compressor, data: &[u8]) -> io::Result<Vec<u8>> {
    match compressor {
        Compressor::None => Ok(data.to_vec()),
        Compressor::Snappy => {
            let mut encoder = snap::Encoder::new();
            encoder
                .compress_vec(data)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
        }
        Compressor::Lz4 => compress_lz4(data),
    }
}

pub fn decompress(compressor: Compressor, data: &[u8]) -> io::Result<Vec<u8>> {
    match compressor {
        Compressor::None => Ok(data.to_vec()),
        Compressor::Snappy => {
            let mut decoder = snap::Decoder::new();
            decoder
                .decompress_vec(data)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
        }
        Compressor::Lz4 => decompress_lz4(data),
    }
}

#[cfg(feature = "lz4-compression")]
fn compress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    lz4::block::compress(data, None, true)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

#[cfg(not(feature = "lz4-compression"))]
fn compress_lz4(_data: &[u8]) -> io::Result<Vec<u8>> {
    Err(io::Error::new(
        io::ErrorKind::Other,
        "lz4 compression requested but the `lz4-compression` feature is not enabled",
    ))
}

#[cfg(feature = "lz4-compression")]
fn decompress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    lz4::block::decompress(data, None).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

#[cfg(not(feature = "lz4-compression"))]
fn decompress_lz4(_data: &[u8]) -> io::Result<Vec<u8>> {
    Err(io::Error::new(
        io::ErrorKind::Other,
        "lz4 compression requested but the `lz4-compression` feature is not enabled",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_roundtrip_none_and_snappy() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(20);
        for compressor in [Compressor::None, Compressor::Snappy] {
            let compressed = compress(compressor, &data).unwrap();
            let decompressed = decompress(compressor, &compressed).unwrap();
            assert_eq!(decompressed, data);
        }
    }
}
