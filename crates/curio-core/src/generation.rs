use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Token marking one logical operation in a stream.
///
/// Tokens are only ever compared; workers never mutate them. An operation is
/// current exactly when its token equals the stream's latest issued value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Strictly increasing token issuer for one operation stream.
///
/// Each independent stream gets its own counter: invalidating the search
/// stream must not invalidate an in-flight detail selection, and vice versa.
/// Issuing a new token is the sole cancellation mechanism in the system;
/// superseded work keeps running but its writes are suppressed.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next token, invalidating every earlier one in this stream.
    pub fn next(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True iff `generation` is the latest issued token of this stream.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::SeqCst))
    }
}
