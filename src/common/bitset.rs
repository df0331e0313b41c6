//! Doc id set representations (§4.3's shared `DocIdSet` accessors: a
//! set needs more than membership -- `first`/`last`/`before`/`after`
//! let a matcher seek around it the same way it seeks a posting list).
//! Three variants trade memory for lookup shape:
//!
//! - [`BitSet`]: dense, one bit per id, grouped into 64-element words
//!   for fast word-at-a-time scanning. Best for id sets that are a
//!   sizeable fraction of `max_doc` (e.g. deletion bitsets).
//! - [`SortedDocIdSet`]: a plain sorted `Vec<DocId>`, binary-searched.
//!   Best for small, sparse sets (a handful of docs matching a filter
//!   predicate) where a dense bitmap would be mostly zero words.
//! - [`HybridDocIdSet`]: a roaring-style container, partitioning the
//!   id space into 2^16-id chunks and storing each chunk as a sorted
//!   array of local offsets until it grows dense enough to flip to a
//!   bitmap -- good default when a set's cardinality isn't known ahead
//!   of time and might land anywhere between the other two extremes.

const TINYSET_SHIFT: u32 = 6;

/// Bitset over a 64-element range, stored as a single `u64` word.
#[derive(Clone, Copy, Default)]
struct TinySet(u64);

impl TinySet {
    fn empty() -> TinySet {
        TinySet(0)
    }

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn insert(self, val: u32) -> TinySet {
        TinySet(self.0 | (1u64 << (val & 63)))
    }

    fn contains(self, val: u32) -> bool {
        (self.0 & (1u64 << (val & 63))) != 0
    }

    fn remove(self, val: u32) -> TinySet {
        TinySet(self.0 & !(1u64 << (val & 63)))
    }

    fn lowest(self) -> Option<u32> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros())
        }
    }

    fn remove_lowest(self) -> TinySet {
        TinySet(self.0 & (self.0 - 1))
    }

    fn highest(self) -> Option<u32> {
        if self.0 == 0 {
            None
        } else {
            Some(63 - self.0.leading_zeros())
        }
    }
}

/// Accessors shared by every doc id set representation (§4.3): seeking
/// forward or backward from an arbitrary id, not just forward
/// membership scanning. `first_ge`/`before` are the primitives;
/// `first`/`last`/`after` have default implementations in terms of
/// them.
pub trait DocIdSet {
    fn contains(&self, val: u32) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First set id `>= from`, if any.
    fn first_ge(&self, from: u32) -> Option<u32>;

    /// Greatest set id strictly less than `from`, if any.
    fn before(&self, from: u32) -> Option<u32>;

    fn first(&self) -> Option<u32> {
        self.first_ge(0)
    }

    fn last(&self) -> Option<u32> {
        self.before(u32::MAX)
    }

    /// First set id strictly greater than `from`, if any.
    fn after(&self, from: u32) -> Option<u32> {
        from.checked_add(1).and_then(|next| self.first_ge(next))
    }
}

/// A mutable, dense set of `u32` document ids.
///
/// Backed by an array of 64-bit words (`TinySet`); a companion parallel
/// array would be needed for a true "roaring" tri-state encoding, but the
/// invariant required by the data model -- sorted-set semantics regardless
/// of backing representation -- holds for this dense encoding at any
/// occupancy. Small, sparse id sets (e.g. a handful of docs matching a
/// filter predicate) are cheaper as a plain sorted `Vec<DocId>` -- see
/// `collector::FilterCollector`, which wraps such a set in a closure
/// rather than going through this dense representation.
#[derive(Clone)]
pub struct BitSet {
    tinysets: Vec<TinySet>,
    len: usize,
    max_value: u32,
}

impl BitSet {
    pub fn with_max_value(max_value: u32) -> BitSet {
        let num_buckets = (max_value as usize >> TINYSET_SHIFT) + 1;
        BitSet {
            tinysets: vec![TinySet::empty(); num_buckets],
            len: 0,
            max_value,
        }
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, val: u32) {
        let bucket = (val >> TINYSET_SHIFT) as usize;
        if !self.tinysets[bucket].contains(val) {
            self.tinysets[bucket] = self.tinysets[bucket].insert(val);
            self.len += 1;
        }
    }

    pub fn remove(&mut self, val: u32) {
        let bucket = (val >> TINYSET_SHIFT) as usize;
        if self.tinysets[bucket].contains(val) {
            self.tinysets[bucket] = self.tinysets[bucket].remove(val);
            self.len -= 1;
        }
    }

    pub fn contains(&self, val: u32) -> bool {
        let bucket = (val >> TINYSET_SHIFT) as usize;
        self.tinysets
            .get(bucket)
            .map(|ts| ts.contains(val))
            .unwrap_or(false)
    }

    /// First set id greater than or equal to `from`, if any.
    pub fn first_ge(&self, from: u32) -> Option<u32> {
        let mut bucket = (from >> TINYSET_SHIFT) as usize;
        if bucket >= self.tinysets.len() {
            return None;
        }
        let offset_in_bucket = from & 63;
        let mut cur = TinySet(self.tinysets[bucket].0 & !((1u64 << offset_in_bucket) - 1));
        loop {
            if let Some(lowest) = cur.lowest() {
                return Some((bucket as u32) * 64 + lowest);
            }
            bucket += 1;
            if bucket >= self.tinysets.len() {
                return None;
            }
            cur = self.tinysets[bucket];
        }
    }

    /// Greatest set id strictly less than `from`, if any.
    pub fn before(&self, from: u32) -> Option<u32> {
        let mut bucket = (from >> TINYSET_SHIFT) as usize;
        if bucket < self.tinysets.len() {
            let offset_in_bucket = from & 63;
            let mask = if offset_in_bucket == 0 {
                0
            } else {
                (1u64 << offset_in_bucket) - 1
            };
            let masked = TinySet(self.tinysets[bucket].0 & mask);
            if let Some(highest) = masked.highest() {
                return Some((bucket as u32) * 64 + highest);
            }
        } else {
            bucket = self.tinysets.len();
        }
        while bucket > 0 {
            bucket -= 1;
            if let Some(highest) = self.tinysets[bucket].highest() {
                return Some((bucket as u32) * 64 + highest);
            }
        }
        None
    }

    /// Lowest set id, if any.
    pub fn first(&self) -> Option<u32> {
        self.first_ge(0)
    }

    /// Highest set id, if any.
    pub fn last(&self) -> Option<u32> {
        for (bucket_idx, ts) in self.tinysets.iter().enumerate().rev() {
            if let Some(highest) = ts.highest() {
                return Some((bucket_idx as u32) * 64 + highest);
            }
        }
        None
    }

    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            bitset: self,
            bucket_idx: 0,
            cur: self.tinysets.first().copied().unwrap_or_default(),
        }
    }
}

impl DocIdSet for BitSet {
    fn contains(&self, val: u32) -> bool {
        BitSet::contains(self, val)
    }

    fn len(&self) -> usize {
        BitSet::len(self)
    }

    fn first_ge(&self, from: u32) -> Option<u32> {
        BitSet::first_ge(self, from)
    }

    fn before(&self, from: u32) -> Option<u32> {
        BitSet::before(self, from)
    }
}

pub struct BitSetIter<'a> {
    bitset: &'a BitSet,
    bucket_idx: usize,
    cur: TinySet,
}

impl<'a> Iterator for BitSetIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some(lowest) = self.cur.lowest() {
                self.cur = self.cur.remove_lowest();
                return Some((self.bucket_idx as u32) * 64 + lowest);
            }
            self.bucket_idx += 1;
            if self.bucket_idx >= self.bitset.tinysets.len() {
                return None;
            }
            self.cur = self.bitset.tinysets[self.bucket_idx];
        }
    }
}

/// A sorted, deduplicated `Vec<u32>`, binary-searched. Cheapest
/// representation for a small, sparse id set -- no wasted zero words,
/// at the cost of O(log n) instead of O(1) membership tests.
#[derive(Clone, Default)]
pub struct SortedDocIdSet {
    ids: Vec<u32>,
}

impl SortedDocIdSet {
    /// Sorts and dedups `ids` in place.
    pub fn from_unsorted(mut ids: Vec<u32>) -> SortedDocIdSet {
        ids.sort_unstable();
        ids.dedup();
        SortedDocIdSet { ids }
    }

    /// `ids` must already be sorted ascending and deduplicated; not
    /// checked in release builds.
    pub fn from_sorted(ids: Vec<u32>) -> SortedDocIdSet {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        SortedDocIdSet { ids }
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }
}

impl DocIdSet for SortedDocIdSet {
    fn contains(&self, val: u32) -> bool {
        self.ids.binary_search(&val).is_ok()
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn first_ge(&self, from: u32) -> Option<u32> {
        match self.ids.binary_search(&from) {
            Ok(i) => Some(self.ids[i]),
            Err(i) => self.ids.get(i).copied(),
        }
    }

    fn before(&self, from: u32) -> Option<u32> {
        let i = match self.ids.binary_search(&from) {
            Ok(i) | Err(i) => i,
        };
        if i == 0 {
            None
        } else {
            Some(self.ids[i - 1])
        }
    }
}

const CHUNK_BITS: u32 = 16;
const CHUNK_SIZE: u32 = 1 << CHUNK_BITS;
/// Above this many set bits, a chunk's sorted-array container is
/// converted to a dense bitmap -- the same crossover roaring bitmaps
/// use (a 65536-slot chunk with > 4096 elements is denser than a dense
/// 8KB bitmap would be to store as a sorted `u16` array).
const SPARSE_TO_DENSE_THRESHOLD: usize = 4096;
const DENSE_WORDS_PER_CHUNK: usize = CHUNK_SIZE as usize / 64;

#[derive(Clone)]
enum Chunk {
    Sparse(Vec<u16>),
    Dense(Vec<u64>),
}

fn sparse_to_dense(offsets: &[u16]) -> Vec<u64> {
    let mut words = vec![0u64; DENSE_WORDS_PER_CHUNK];
    for &offset in offsets {
        words[offset as usize / 64] |= 1u64 << (offset as u64 % 64);
    }
    words
}

fn chunk_first_ge(chunk: &Chunk, from: u16) -> Option<u16> {
    match chunk {
        Chunk::Sparse(offsets) => match offsets.binary_search(&from) {
            Ok(i) => Some(offsets[i]),
            Err(i) => offsets.get(i).copied(),
        },
        Chunk::Dense(words) => {
            let mut word_idx = from as usize / 64;
            if word_idx >= words.len() {
                return None;
            }
            let bit_off = from as u64 % 64;
            let keep_mask = !((1u64 << bit_off) - 1);
            let mut word = words[word_idx] & keep_mask;
            loop {
                if word != 0 {
                    return Some((word_idx * 64) as u16 + word.trailing_zeros() as u16);
                }
                word_idx += 1;
                if word_idx >= words.len() {
                    return None;
                }
                word = words[word_idx];
            }
        }
    }
}

fn chunk_last_lt(chunk: &Chunk, before: u16) -> Option<u16> {
    if before == 0 {
        return None;
    }
    match chunk {
        Chunk::Sparse(offsets) => {
            let i = match offsets.binary_search(&before) {
                Ok(i) | Err(i) => i,
            };
            if i == 0 {
                None
            } else {
                Some(offsets[i - 1])
            }
        }
        Chunk::Dense(words) => {
            let to = before - 1;
            let mut word_idx = to as usize / 64;
            let bit_off = to as u64 % 64;
            let keep_mask = if bit_off == 63 {
                u64::MAX
            } else {
                (1u64 << (bit_off + 1)) - 1
            };
            let mut word = words[word_idx] & keep_mask;
            loop {
                if word != 0 {
                    return Some((word_idx * 64) as u16 + (63 - word.leading_zeros() as u16));
                }
                if word_idx == 0 {
                    return None;
                }
                word_idx -= 1;
                word = words[word_idx];
            }
        }
    }
}

fn chunk_last(chunk: &Chunk) -> Option<u16> {
    match chunk {
        Chunk::Sparse(offsets) => offsets.last().copied(),
        Chunk::Dense(words) => {
            for (word_idx, &word) in words.iter().enumerate().rev() {
                if word != 0 {
                    return Some((word_idx * 64) as u16 + (63 - word.leading_zeros() as u16));
                }
            }
            None
        }
    }
}

/// An adaptive roaring-style doc id set: the id space is split into
/// 2^16-id chunks, each stored sparsely (a sorted `Vec<u16>` of local
/// offsets) until it crosses `SPARSE_TO_DENSE_THRESHOLD`, at which
/// point it's rewritten as a dense per-chunk bitmap. Good default when
/// a set's final cardinality relative to its id range isn't known
/// ahead of time.
#[derive(Clone, Default)]
pub struct HybridDocIdSet {
    chunks: Vec<Option<Chunk>>,
    len: usize,
}

impl HybridDocIdSet {
    pub fn new() -> HybridDocIdSet {
        HybridDocIdSet::default()
    }

    pub fn insert(&mut self, val: u32) {
        let chunk_id = (val >> CHUNK_BITS) as usize;
        if chunk_id >= self.chunks.len() {
            self.chunks.resize_with(chunk_id + 1, || None);
        }
        let offset = (val & (CHUNK_SIZE - 1)) as u16;
        let slot = &mut self.chunks[chunk_id];
        let inserted = match slot {
            None => {
                *slot = Some(Chunk::Sparse(vec![offset]));
                true
            }
            Some(Chunk::Sparse(offsets)) => match offsets.binary_search(&offset) {
                Ok(_) => false,
                Err(i) => {
                    offsets.insert(i, offset);
                    if offsets.len() > SPARSE_TO_DENSE_THRESHOLD {
                        *slot = Some(Chunk::Dense(sparse_to_dense(offsets)));
                    }
                    true
                }
            },
            Some(Chunk::Dense(words)) => {
                let word_idx = offset as usize / 64;
                let bit = 1u64 << (offset as u64 % 64);
                if words[word_idx] & bit == 0 {
                    words[word_idx] |= bit;
                    true
                } else {
                    false
                }
            }
        };
        if inserted {
            self.len += 1;
        }
    }
}

impl DocIdSet for HybridDocIdSet {
    fn contains(&self, val: u32) -> bool {
        let chunk_id = (val >> CHUNK_BITS) as usize;
        let offset = (val & (CHUNK_SIZE - 1)) as u16;
        match self.chunks.get(chunk_id).and_then(Option::as_ref) {
            None => false,
            Some(Chunk::Sparse(offsets)) => offsets.binary_search(&offset).is_ok(),
            Some(Chunk::Dense(words)) => words[offset as usize / 64] & (1u64 << (offset as u64 % 64)) != 0,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn first_ge(&self, from: u32) -> Option<u32> {
        let start_chunk = (from >> CHUNK_BITS) as usize;
        if start_chunk < self.chunks.len() {
            if let Some(chunk) = &self.chunks[start_chunk] {
                let local_from = (from & (CHUNK_SIZE - 1)) as u16;
                if let Some(offset) = chunk_first_ge(chunk, local_from) {
                    return Some((start_chunk as u32) * CHUNK_SIZE + offset as u32);
                }
            }
        }
        for (chunk_id, chunk) in self.chunks.iter().enumerate().skip(start_chunk + 1) {
            if let Some(chunk) = chunk {
                if let Some(offset) = chunk_first_ge(chunk, 0) {
                    return Some((chunk_id as u32) * CHUNK_SIZE + offset as u32);
                }
            }
        }
        None
    }

    fn before(&self, from: u32) -> Option<u32> {
        let start_chunk = (from >> CHUNK_BITS) as usize;
        if start_chunk < self.chunks.len() {
            if let Some(chunk) = &self.chunks[start_chunk] {
                let local_from = (from & (CHUNK_SIZE - 1)) as u16;
                if let Some(offset) = chunk_last_lt(chunk, local_from) {
                    return Some((start_chunk as u32) * CHUNK_SIZE + offset as u32);
                }
            }
        }
        let search_end = start_chunk.min(self.chunks.len());
        for chunk_id in (0..search_end).rev() {
            if let Some(chunk) = &self.chunks[chunk_id] {
                if let Some(offset) = chunk_last(chunk) {
                    return Some((chunk_id as u32) * CHUNK_SIZE + offset as u32);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_insert_contains() {
        let mut bs = BitSet::with_max_value(1000);
        bs.insert(0);
        bs.insert(64);
        bs.insert(999);
        assert!(bs.contains(0));
        assert!(bs.contains(64));
        assert!(bs.contains(999));
        assert!(!bs.contains(1));
        assert_eq!(bs.len(), 3);
    }

    #[test]
    fn test_bitset_iter_is_sorted() {
        let mut bs = BitSet::with_max_value(300);
        for v in [200u32, 5, 64, 65, 1, 299] {
            bs.insert(v);
        }
        let collected: Vec<u32> = bs.iter().collect();
        assert_eq!(collected, vec![1, 5, 64, 65, 200, 299]);
    }

    #[test]
    fn test_bitset_remove() {
        let mut bs = BitSet::with_max_value(10);
        bs.insert(3);
        bs.insert(4);
        bs.remove(3);
        assert!(!bs.contains(3));
        assert!(bs.contains(4));
        assert_eq!(bs.len(), 1);
    }

    #[test]
    fn test_first_ge() {
        let mut bs = BitSet::with_max_value(200);
        bs.insert(10);
        bs.insert(150);
        assert_eq!(bs.first_ge(0), Some(10));
        assert_eq!(bs.first_ge(11), Some(150));
        assert_eq!(bs.first_ge(151), None);
    }

    #[test]
    fn test_bitset_first_last_before() {
        let mut bs = BitSet::with_max_value(200);
        bs.insert(10);
        bs.insert(64);
        bs.insert(150);
        assert_eq!(bs.first(), Some(10));
        assert_eq!(bs.last(), Some(150));
        assert_eq!(bs.before(150), Some(64));
        assert_eq!(bs.before(64), Some(10));
        assert_eq!(bs.before(10), None);
        assert_eq!(bs.after(10), Some(64));
    }

    #[test]
    fn test_sorted_doc_id_set() {
        let set = SortedDocIdSet::from_unsorted(vec![5, 1, 1, 9, 3]);
        assert_eq!(set.ids(), &[1, 3, 5, 9]);
        assert!(set.contains(5));
        assert!(!set.contains(4));
        assert_eq!(set.first(), Some(1));
        assert_eq!(set.last(), Some(9));
        assert_eq!(set.first_ge(4), Some(5));
        assert_eq!(set.before(5), Some(3));
        assert_eq!(set.before(1), None);
        assert_eq!(set.after(5), Some(9));
    }

    #[test]
    fn test_hybrid_doc_id_set_sparse() {
        let mut set = HybridDocIdSet::new();
        for v in [5u32, 70_000, 3, 70_005] {
            set.insert(v);
        }
        assert_eq!(set.len(), 4);
        assert!(set.contains(70_000));
        assert!(!set.contains(70_001));
        assert_eq!(set.first(), Some(3));
        assert_eq!(set.last(), Some(70_005));
        assert_eq!(set.first_ge(4), Some(5));
        assert_eq!(set.first_ge(6), Some(70_000));
        assert_eq!(set.before(70_005), Some(70_000));
        assert_eq!(set.before(5), Some(3));
        assert_eq!(set.after(70_000), Some(70_005));
    }

    #[test]
    fn test_hybrid_doc_id_set_promotes_to_dense() {
        let mut set = HybridDocIdSet::new();
        for v in 0..(SPARSE_TO_DENSE_THRESHOLD as u32 + 10) {
            set.insert(v * 2);
        }
        assert_eq!(set.len(), SPARSE_TO_DENSE_THRESHOLD + 10);
        assert!(set.contains(0));
        assert!(set.contains(20));
        assert!(!set.contains(21));
        assert_eq!(set.first(), Some(0));
        assert_eq!(set.before(20), Some(18));
        assert_eq!(set.after(18), Some(20));
    }
}
