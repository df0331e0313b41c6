//! On-disk block layout for one term's postings (§4.1).
//!
//! Docids are grouped into fixed `BLOCK_LEN`-doc blocks. A full block's
//! deltas are bitpacked with `BitPacker4x` at the narrowest width that
//! fits; the trailing partial block (fewer than `BLOCK_LEN` docs) falls
//! back to a fixed byte width (1/2/4/8) since `BitPacker4x` only packs
//! full blocks. Each block also carries a length-bucket byte per doc
//! (reusing `fieldnorm`'s log-scale code), a per-doc weight column
//! encoded one of three ways depending on what the block actually
//! needs, and a trailing `(max_weight, max_length_code)` summary a
//! matcher can read without touching the rest of the block.
//!
//! Positions, when a field records them, are stored in a companion
//! buffer chunked the same way: one sub-section per block, each
//! holding every doc's position list, and -- when the term ever saw
//! non-default values -- char offsets and payloads alongside them.

use std::io::Read as _;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use bitpacking::{BitPacker, BitPacker4x};

use crate::common::{BinarySerializable, VInt};
use crate::DocId;

pub const BLOCK_LEN: usize = BitPacker4x::BLOCK_LEN;

/// Number of bytes a full block packs down to at `num_bits` per delta.
/// `BLOCK_LEN` (128) is a multiple of 8, so this is always exact.
fn compressed_block_size(num_bits: u8) -> usize {
    BLOCK_LEN * usize::from(num_bits) / 8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeightCode {
    /// The field doesn't record a weight at all (`NothingRecorder`).
    Absent,
    /// Every doc in the block has weight 1 -- common enough (most terms
    /// occur once per doc) to skip storing a column entirely.
    AllOnes,
    /// One `VInt` weight per doc.
    Integers,
    /// One little-endian `f32` per doc, for externally supplied impact
    /// weights rather than a raw term frequency.
    Floats,
}

impl WeightCode {
    fn to_byte(self) -> u8 {
        match self {
            WeightCode::Absent => 0,
            WeightCode::AllOnes => 1,
            WeightCode::Integers => 2,
            WeightCode::Floats => 3,
        }
    }

    fn from_byte(byte: u8) -> WeightCode {
        match byte {
            0 => WeightCode::Absent,
            1 => WeightCode::AllOnes,
            2 => WeightCode::Integers,
            _ => WeightCode::Floats,
        }
    }
}

/// A decoded term's postings: flat columns plus, per block, the
/// quality summary matchers consult to skip whole blocks (§4.3
/// block-max WAND-style skipping).
#[derive(Debug, Default, Clone)]
pub struct DecodedPostings {
    pub doc_ids: Vec<DocId>,
    pub weights: Vec<u32>,
    pub length_codes: Vec<u8>,
    pub block_max_weight: Vec<u32>,
    pub block_max_length_code: Vec<u8>,
    /// `block_max_weight[i]` (and `block_max_length_code[i]`) covers
    /// docs in `[0, block_end[i])` of this term's doc list, in cursor
    /// index space -- `block_end[i]` is the exclusive end of block `i`.
    pub block_end: Vec<usize>,
}

impl DecodedPostings {
    /// The block covering cursor position `idx`, or the last block if
    /// `idx` is past the end (so a caller probing ahead of the current
    /// cursor still gets a usable bound).
    pub fn block_for(&self, idx: usize) -> usize {
        self.block_end
            .iter()
            .position(|&end| idx < end)
            .unwrap_or_else(|| self.block_end.len().saturating_sub(1))
    }
}

fn weight_code_for(weights: &[u32]) -> WeightCode {
    if weights.iter().all(|&w| w == 1) {
        WeightCode::AllOnes
    } else {
        WeightCode::Integers
    }
}

fn narrow_width(max_delta: u64) -> u8 {
    if max_delta <= u64::from(u8::MAX) {
        1
    } else if max_delta <= u64::from(u16::MAX) {
        2
    } else if max_delta <= u64::from(u32::MAX) {
        4
    } else {
        8
    }
}

fn write_narrow(width: u8, value: u64, out: &mut Vec<u8>) {
    match width {
        1 => out.push(value as u8),
        2 => out.write_u16::<LittleEndian>(value as u16).expect("Vec write cannot fail"),
        4 => out.write_u32::<LittleEndian>(value as u32).expect("Vec write cannot fail"),
        _ => out.write_u64::<LittleEndian>(value).expect("Vec write cannot fail"),
    }
}

fn read_narrow(width: u8, cursor: &mut &[u8]) -> std::io::Result<u64> {
    Ok(match width {
        1 => u64::from(cursor.read_u8()?),
        2 => u64::from(cursor.read_u16::<LittleEndian>()?),
        4 => u64::from(cursor.read_u32::<LittleEndian>()?),
        _ => cursor.read_u64::<LittleEndian>()?,
    })
}

fn write_weights(code: WeightCode, weights: &[u32], out: &mut Vec<u8>) {
    match code {
        WeightCode::Absent | WeightCode::AllOnes => {}
        WeightCode::Integers => {
            for &w in weights {
                VInt(u64::from(w)).serialize(out).expect("Vec write cannot fail");
            }
        }
        WeightCode::Floats => {
            for &w in weights {
                out.write_f32::<LittleEndian>(w as f32).expect("Vec write cannot fail");
            }
        }
    }
}

fn read_weights(code: WeightCode, count: usize, cursor: &mut &[u8]) -> std::io::Result<Vec<u32>> {
    match code {
        WeightCode::Absent => Ok(Vec::new()),
        WeightCode::AllOnes => Ok(vec![1; count]),
        WeightCode::Integers => {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                out.push(VInt::deserialize(cursor)?.0 as u32);
            }
            Ok(out)
        }
        WeightCode::Floats => {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                out.push(cursor.read_f32::<LittleEndian>()? as u32);
            }
            Ok(out)
        }
    }
}

/// Encodes one term's docid/weight/length columns into the block
/// layout described above. `weights` is `None` for fields that don't
/// track a per-doc weight at all (`IndexRecordOption::Basic`).
/// `length_codes` must have one entry per doc in `doc_ids`, already
/// quantized through `fieldnorm::fieldnorm_to_id` (or taken verbatim
/// from an already-quantized source, as the segment merger does).
pub fn encode_postings(doc_ids: &[DocId], weights: Option<&[u32]>, length_codes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    VInt(doc_ids.len() as u64).serialize(&mut out).expect("Vec write cannot fail");

    let bitpacker = BitPacker4x::new();
    let mut prev_last = 0u32;
    let mut start = 0usize;
    while start < doc_ids.len() {
        let remaining = doc_ids.len() - start;
        let block_docs = &doc_ids[start..start + remaining.min(BLOCK_LEN)];
        let block_lengths = &length_codes[start..start + remaining.min(BLOCK_LEN)];
        let block_weights = weights.map(|w| &w[start..start + remaining.min(BLOCK_LEN)]);

        if remaining >= BLOCK_LEN {
            encode_full_block(&bitpacker, block_docs, block_weights, block_lengths, prev_last, &mut out);
        } else {
            encode_partial_block(block_docs, block_weights, block_lengths, prev_last, &mut out);
        }
        prev_last = *block_docs.last().expect("block is non-empty");
        start += block_docs.len();
    }
    out
}

fn encode_full_block(
    bitpacker: &BitPacker4x,
    doc_ids: &[DocId],
    weights: Option<&[u32]>,
    length_codes: &[u8],
    prev_last: u32,
    out: &mut Vec<u8>,
) {
    let num_bits = bitpacker.num_bits_sorted(prev_last, doc_ids);
    out.push(num_bits);
    let mut buf = vec![0u8; 4 * BLOCK_LEN];
    let written = bitpacker.compress_sorted(prev_last, doc_ids, &mut buf, num_bits);
    out.extend_from_slice(&buf[..written]);

    encode_weights_and_lengths(weights, length_codes, out);
}

fn encode_partial_block(
    doc_ids: &[DocId],
    weights: Option<&[u32]>,
    length_codes: &[u8],
    prev_last: u32,
    out: &mut Vec<u8>,
) {
    let max_delta = {
        let mut prev = prev_last;
        let mut max_delta = 0u64;
        for &doc in doc_ids {
            max_delta = max_delta.max(u64::from(doc - prev));
            prev = doc;
        }
        max_delta
    };
    let width = narrow_width(max_delta);
    out.push(width);
    let mut prev = prev_last;
    for &doc in doc_ids {
        write_narrow(width, u64::from(doc - prev), out);
        prev = doc;
    }

    encode_weights_and_lengths(weights, length_codes, out);
}

fn encode_weights_and_lengths(weights: Option<&[u32]>, length_codes: &[u8], out: &mut Vec<u8>) {
    let code = match weights {
        None => WeightCode::Absent,
        Some(w) => weight_code_for(w),
    };
    out.push(code.to_byte());
    if let Some(w) = weights {
        write_weights(code, w, out);
    }
    out.extend_from_slice(length_codes);

    let max_weight = weights.map(|w| w.iter().copied().max().unwrap_or(0)).unwrap_or(0);
    let max_length_code = length_codes.iter().copied().max().unwrap_or(0);
    VInt(u64::from(max_weight)).serialize(out).expect("Vec write cannot fail");
    out.push(max_length_code);
}

/// Decodes the block layout written by `encode_postings` back into flat
/// columns plus per-block quality summaries.
pub fn decode_postings(bytes: &[u8], has_weights: bool) -> std::io::Result<DecodedPostings> {
    let mut cursor = bytes;
    let doc_freq = VInt::deserialize(&mut cursor)?.0 as usize;

    let mut result = DecodedPostings::default();
    let bitpacker = BitPacker4x::new();
    let mut prev_last = 0u32;
    let mut remaining = doc_freq;

    while remaining > 0 {
        let block_len = remaining.min(BLOCK_LEN);
        let doc_ids = if block_len == BLOCK_LEN {
            let num_bits = cursor.read_u8()?;
            let compressed_len = compressed_block_size(num_bits);
            let mut block = vec![0u32; BLOCK_LEN];
            bitpacker.decompress_sorted(prev_last, &cursor[..compressed_len], &mut block, num_bits);
            cursor = &cursor[compressed_len..];
            block
        } else {
            let width = cursor.read_u8()?;
            let mut prev = prev_last;
            let mut block = Vec::with_capacity(block_len);
            for _ in 0..block_len {
                let delta = read_narrow(width, &mut cursor)?;
                prev += delta as u32;
                block.push(prev);
            }
            block
        };
        prev_last = *doc_ids.last().expect("block is non-empty");

        let weight_code = WeightCode::from_byte(cursor.read_u8()?);
        let weights = read_weights(weight_code, block_len, &mut cursor)?;
        let mut length_codes = vec![0u8; block_len];
        cursor.read_exact(&mut length_codes)?;

        let max_weight = VInt::deserialize(&mut cursor)?.0 as u32;
        let max_length_code = cursor.read_u8()?;

        result.doc_ids.extend(doc_ids);
        if has_weights {
            result.weights.extend(weights);
        }
        result.length_codes.extend(length_codes);
        result.block_max_weight.push(max_weight);
        result.block_max_length_code.push(max_length_code);
        result.block_end.push(result.doc_ids.len());

        remaining -= block_len;
    }

    Ok(result)
}

const POSITIONS_HAS_CHARS: u8 = 0b01;
const POSITIONS_HAS_PAYLOADS: u8 = 0b10;

/// A term's per-doc position data, decoded from the positions buffer.
/// `chars`/`payloads` are empty inner vecs for every doc when the term
/// never recorded either (the common case for plain text fields).
#[derive(Debug, Default, Clone)]
pub struct DecodedPositions {
    pub positions: Vec<Vec<u32>>,
    pub chars: Vec<Vec<(u32, u32)>>,
    pub payloads: Vec<Vec<Vec<u8>>>,
}

/// Encodes one term's position lists (chunked per doc, in the same
/// doc order as `encode_postings`), with char offsets and payloads
/// appended only when the term ever recorded a non-default one -- most
/// text fields carry neither, so this keeps the common case down to a
/// single flag byte plus delta-coded positions.
pub fn encode_positions(
    positions: &[Vec<u32>],
    chars: &[Vec<(u32, u32)>],
    payloads: &[Vec<Vec<u8>>],
) -> Vec<u8> {
    let has_chars = chars.iter().any(|doc_chars| !doc_chars.is_empty());
    let has_payloads = payloads.iter().any(|doc_payloads| !doc_payloads.is_empty());

    let mut out = Vec::new();
    let mut flags = 0u8;
    if has_chars {
        flags |= POSITIONS_HAS_CHARS;
    }
    if has_payloads {
        flags |= POSITIONS_HAS_PAYLOADS;
    }
    out.push(flags);

    for (doc_idx, doc_positions) in positions.iter().enumerate() {
        VInt(doc_positions.len() as u64).serialize(&mut out).expect("Vec write cannot fail");
        let mut prev = 0u32;
        for &position in doc_positions {
            VInt(u64::from(position - prev)).serialize(&mut out).expect("Vec write cannot fail");
            prev = position;
        }
        if has_chars {
            let doc_chars = chars.get(doc_idx).map(Vec::as_slice).unwrap_or(&[]);
            let mut prev_from = 0u32;
            for i in 0..doc_positions.len() {
                let (from, to) = doc_chars.get(i).copied().unwrap_or((prev_from, prev_from));
                VInt(u64::from(from - prev_from)).serialize(&mut out).expect("Vec write cannot fail");
                VInt(u64::from(to - from)).serialize(&mut out).expect("Vec write cannot fail");
                prev_from = from;
            }
        }
        if has_payloads {
            let doc_payloads = payloads.get(doc_idx).map(Vec::as_slice).unwrap_or(&[]);
            for i in 0..doc_positions.len() {
                let payload = doc_payloads.get(i).map(Vec::as_slice).unwrap_or(&[]);
                VInt(payload.len() as u64).serialize(&mut out).expect("Vec write cannot fail");
                out.extend_from_slice(payload);
            }
        }
    }
    out
}

/// Decodes the buffer written by `encode_positions`. `doc_freq` is the
/// number of docs the term's postings list covers (the positions
/// buffer has no independent doc count of its own).
pub fn decode_positions(bytes: &[u8], doc_freq: usize) -> std::io::Result<DecodedPositions> {
    let mut cursor = bytes;
    let mut result = DecodedPositions {
        positions: Vec::with_capacity(doc_freq),
        chars: Vec::with_capacity(doc_freq),
        payloads: Vec::with_capacity(doc_freq),
    };
    if bytes.is_empty() {
        return Ok(result);
    }
    let flags = cursor.read_u8()?;
    let has_chars = flags & POSITIONS_HAS_CHARS != 0;
    let has_payloads = flags & POSITIONS_HAS_PAYLOADS != 0;

    for _ in 0..doc_freq {
        let num_positions = VInt::deserialize(&mut cursor)?.0 as usize;
        let mut doc_positions = Vec::with_capacity(num_positions);
        let mut prev = 0u32;
        for _ in 0..num_positions {
            let delta = VInt::deserialize(&mut cursor)?.0 as u32;
            prev += delta;
            doc_positions.push(prev);
        }

        let mut doc_chars = Vec::new();
        if has_chars {
            let mut prev_from = 0u32;
            for _ in 0..num_positions {
                let from = prev_from + VInt::deserialize(&mut cursor)?.0 as u32;
                let len = VInt::deserialize(&mut cursor)?.0 as u32;
                doc_chars.push((from, from + len));
                prev_from = from;
            }
        }

        let mut doc_payloads = Vec::new();
        if has_payloads {
            for _ in 0..num_positions {
                let len = VInt::deserialize(&mut cursor)?.0 as usize;
                let mut payload = vec![0u8; len];
                cursor.read_exact(&mut payload)?;
                doc_payloads.push(payload);
            }
        }

        result.positions.push(doc_positions);
        result.chars.push(doc_chars);
        result.payloads.push(doc_payloads);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_partial_block_roundtrip() {
        let doc_ids = vec![1u32, 5, 20, 21, 100];
        let weights = vec![1u32, 3, 1, 1, 7];
        let lengths = vec![10u8, 20, 30, 5, 255];
        let encoded = encode_postings(&doc_ids, Some(&weights), &lengths);
        let decoded = decode_postings(&encoded, true).unwrap();
        assert_eq!(decoded.doc_ids, doc_ids);
        assert_eq!(decoded.weights, weights);
        assert_eq!(decoded.length_codes, lengths);
        assert_eq!(decoded.block_end, vec![5]);
        assert_eq!(decoded.block_max_weight, vec![7]);
        assert_eq!(decoded.block_max_length_code, vec![255]);
    }

    #[test]
    fn test_full_block_plus_remainder_roundtrip() {
        let doc_ids: Vec<u32> = (0..(BLOCK_LEN as u32 + 10)).map(|i| i * 2).collect();
        let weights: Vec<u32> = (0..doc_ids.len() as u32).map(|i| 1 + i % 5).collect();
        let lengths: Vec<u8> = (0..doc_ids.len()).map(|i| (i % 256) as u8).collect();
        let encoded = encode_postings(&doc_ids, Some(&weights), &lengths);
        let decoded = decode_postings(&encoded, true).unwrap();
        assert_eq!(decoded.doc_ids, doc_ids);
        assert_eq!(decoded.weights, weights);
        assert_eq!(decoded.block_end, vec![BLOCK_LEN, BLOCK_LEN + 10]);
        assert_eq!(
            decoded.block_max_weight[0],
            weights[..BLOCK_LEN].iter().copied().max().unwrap()
        );
    }

    #[test]
    fn test_all_ones_weight_column_is_not_stored() {
        let doc_ids = vec![0u32, 1, 2];
        let weights = vec![1u32, 1, 1];
        let lengths = vec![0u8, 0, 0];
        let with_weights = encode_postings(&doc_ids, Some(&weights), &lengths);
        let without_weights = encode_postings(&doc_ids, None, &lengths);
        // The AllOnes column costs exactly one typecode byte more than
        // Absent, never a per-doc VInt.
        assert_eq!(with_weights.len(), without_weights.len() + 1);
    }

    #[test]
    fn test_basic_no_weight_column_roundtrip() {
        let doc_ids = vec![3u32, 9, 12];
        let lengths = vec![1u8, 2, 3];
        let encoded = encode_postings(&doc_ids, None, &lengths);
        let decoded = decode_postings(&encoded, false).unwrap();
        assert_eq!(decoded.doc_ids, doc_ids);
        assert!(decoded.weights.is_empty());
        assert_eq!(decoded.block_max_weight, vec![0]);
    }

    #[test]
    fn test_block_for_probes_ahead_of_cursor() {
        let doc_ids: Vec<u32> = (0..(BLOCK_LEN as u32 + 5)).collect();
        let weights: Vec<u32> = vec![1; doc_ids.len()];
        let lengths: Vec<u8> = vec![0; doc_ids.len()];
        let encoded = encode_postings(&doc_ids, Some(&weights), &lengths);
        let decoded = decode_postings(&encoded, true).unwrap();
        assert_eq!(decoded.block_for(0), 0);
        assert_eq!(decoded.block_for(BLOCK_LEN - 1), 0);
        assert_eq!(decoded.block_for(BLOCK_LEN), 1);
        assert_eq!(decoded.block_for(10_000), 1);
    }

    #[test]
    fn test_positions_without_chars_or_payloads_roundtrip() {
        let positions = vec![vec![0u32, 3, 9], vec![1u32]];
        let encoded = encode_positions(&positions, &[Vec::new(), Vec::new()], &[Vec::new(), Vec::new()]);
        let decoded = decode_positions(&encoded, 2).unwrap();
        assert_eq!(decoded.positions, positions);
        assert!(decoded.chars.iter().all(Vec::is_empty));
        assert!(decoded.payloads.iter().all(Vec::is_empty));
        // No char/payload columns means just the flag byte plus deltas.
        assert_eq!(encoded[0], 0);
    }

    #[test]
    fn test_positions_with_chars_and_payloads_roundtrip() {
        let positions = vec![vec![0u32, 1], vec![0u32]];
        let chars = vec![vec![(0u32, 5u32), (6, 9)], vec![(0u32, 4u32)]];
        let payloads = vec![vec![b"ab".to_vec(), Vec::new()], vec![b"xyz".to_vec()]];
        let encoded = encode_positions(&positions, &chars, &payloads);
        let decoded = decode_positions(&encoded, 2).unwrap();
        assert_eq!(decoded.positions, positions);
        assert_eq!(decoded.chars, chars);
        assert_eq!(decoded.payloads, payloads);
    }
}
