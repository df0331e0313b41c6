use std::ops::Deref;
use std::sync::Arc;

/// A reference-counted, immutable view over a byte range.
///
/// Backed either by an in-memory `Vec<u8>` (the `RAMDirectory`) or by a
/// memory-mapped file (the `MmapDirectory`, behind the `mmap` feature);
/// either way readers get zero-copy `&[u8]` access and slicing is cheap
/// (it only adjusts the stored range, never copies).
#[derive(Clone)]
pub struct ReadOnlySource {
    data: Arc<dyn Deref<Target = [u8]> + Send + Sync>,
    start: usize,
    stop: usize,
}

impl ReadOnlySource {
    pub fn new(data: Vec<u8>) -> ReadOnlySource {
        let len = data.len();
        ReadOnlySource {
            data: Arc::new(data),
            start: 0,
            stop: len,
        }
    }

    pub fn from_shared(data: Arc<dyn Deref<Target = [u8]> + Send + Sync>) -> ReadOnlySource {
        let len = data.len();
        ReadOnlySource {
            data,
            start: 0,
            stop: len,
        }
    }

    pub fn empty() -> ReadOnlySource {
        ReadOnlySource::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.start..self.stop]
    }

    /// Returns a view into a sub-range of this source. Panics if `from..to`
    /// is out of bounds -- callers are expected to have validated offsets
    /// against a manifest before slicing.
    pub fn slice(&self, from: usize, to: usize) -> ReadOnlySource {
        assert!(from <= to);
        assert!(self.start + to <= self.stop);
        ReadOnlySource {
            data: Arc::clone(&self.data),
            start: self.start + from,
            stop: self.start + to,
        }
    }

    pub fn slice_from(&self, from: usize) -> ReadOnlySource {
        let len = self.len();
        self.slice(from, len)
    }
}

impl Deref for ReadOnlySource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Lets a `ReadOnlySource` back a `tantivy_fst::Map` directly, without an
/// intermediate copy into a `Vec<u8>`.
impl AsRef<[u8]> for ReadOnlySource {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice() {
        let source = ReadOnlySource::new(vec![1, 2, 3, 4, 5]);
        let slice = source.slice(1, 4);
        assert_eq!(slice.as_slice(), &[2, 3, 4]);
        let sub_slice = slice.slice(1, 2);
        assert_eq!(sub_slice.as_slice(), &[3]);
    }

    #[test]
    fn test_empty() {
        assert!(ReadOnlySource::empty().is_empty());
    }
}
