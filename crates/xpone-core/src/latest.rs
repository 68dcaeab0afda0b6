// ── Latest-result guard ──
//
// Overlapping fetches for the same data may complete out of order. Each
// fetch takes a ticket when it starts; only the holder of the newest
// ticket may publish. A slower, older fetch finishing last is dropped.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Generation counter shared by all fetches of one piece of data.
///
/// Starting a fetch and committing a result take the same lock, so a
/// commit can never land after a newer fetch has begun.
#[derive(Debug, Default)]
pub struct LatestGuard {
    generation: Mutex<u64>,
}

/// Proof that a fetch started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl LatestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a fetch. Invalidates every earlier ticket.
    pub fn begin(&self) -> Ticket {
        let mut generation = self.lock();
        *generation += 1;
        Ticket(*generation)
    }

    /// Join the current generation without superseding anyone. The ticket
    /// goes stale as soon as another fetch calls [`begin`](Self::begin).
    pub fn current(&self) -> Ticket {
        Ticket(*self.lock())
    }

    /// Whether `ticket` still belongs to the newest fetch.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        *self.lock() == ticket.0
    }

    /// Run `publish` with `value` only if `ticket` is still the newest.
    /// Returns whether the value was published. `publish` runs under the
    /// generation lock and must not call back into this guard.
    pub fn commit<T>(&self, ticket: Ticket, value: T, publish: impl FnOnce(T)) -> bool {
        let generation = self.lock();
        if *generation == ticket.0 {
            publish(value);
            true
        } else {
            false
        }
    }
}
