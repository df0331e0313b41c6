use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::Opstamp;

/// Hands out strictly increasing `Opstamp`s for add/delete operations
/// (§5 "Opstamp ordering"). Cloning shares the same counter: every
/// clone is a handle onto one atomic, not an independent sequence, so
/// an `IndexWriter` can stamp operations submitted from several
/// producers without a lock.
#[derive(Clone)]
pub struct Stamper {
    inner: Arc<AtomicU64>,
}

impl Stamper {
    pub fn new(first_opstamp: Opstamp) -> Stamper {
        Stamper {
            inner: Arc::new(AtomicU64::new(first_opstamp)),
        }
    }

    /// Returns the next opstamp and advances the counter.
    pub fn stamp(&self) -> Opstamp {
        self.inner.fetch_add(1, Ordering::SeqCst)
    }

    /// The opstamp that will be returned by the *next* call to `stamp`,
    /// without consuming it. Used to record "everything up to here" as
    /// a commit's opstamp when no further operations land in between.
    pub fn peek(&self) -> Opstamp {
        self.inner.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamper_increases() {
        let stamper = Stamper::new(0);
        assert_eq!(stamper.stamp(), 0);
        assert_eq!(stamper.stamp(), 1);
        assert_eq!(stamper.peek(), 2);
    }

    #[test]
    fn test_stamper_clone_shares_counter() {
        let stamper = Stamper::new(5);
        let clone = stamper.clone();
        assert_eq!(stamper.stamp(), 5);
        assert_eq!(clone.stamp(), 6);
    }
}
