use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identifier for a scene [`Object`](super::Object).
///
/// Handles are minted from a process-wide counter that is never reset, so a
/// handle observed anywhere in the program refers to at most one object for
/// the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(0x1000);

/// Odd by construction, hence coprime to 2^64: the counter walks the full
/// 64-bit ring before any value repeats, even under wraparound.
const HANDLE_STRIDE: u64 = (u64::MAX / 3 + u64::MAX / 7) | 1;

impl Handle {
    /// Mint the next process-unique handle.
    pub fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(HANDLE_STRIDE, Ordering::Relaxed))
    }

    /// The raw identifier value.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stride_is_odd() {
        assert_eq!(HANDLE_STRIDE & 1, 1);
    }

    #[test]
    fn handles_are_unique() {
        let handles: HashSet<u64> =
            (0..10_000).map(|_| Handle::next().raw()).collect();
        assert_eq!(handles.len(), 10_000);
    }
}
