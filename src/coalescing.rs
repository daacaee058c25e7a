//! Metadata coalescing guard (§4.G): at most one full-topics or
//! brokers-only Metadata request in flight per broker at a time, unless the
//! caller forces it.

use std::sync::Mutex;

/// Which full-metadata counter a request belongs to. Specific-topic requests
/// don't go through the guard at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataRequestKind {
    FullTopics,
    BrokersOnly,
}

#[derive(Debug, Default)]
struct Counters {
    full_topics_in_flight: u32,
    full_brokers_in_flight: u32,
}

/// Process-wide pair of in-flight counters guarded by a mutex (§3).
#[derive(Debug, Default)]
pub struct CoalescingGuard {
    counters: Mutex<Counters>,
}

/// Held by an in-flight full-metadata request; decrements its counter on
/// drop, modeling the "decrement closure that fires on response" from §3 as
/// RAII instead of an explicit callback.
pub struct CoalescingToken<'a> {
    guard: &'a CoalescingGuard,
    kind: MetadataRequestKind,
}

impl CoalescingGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to start a full-metadata request of `kind`. Returns `None`
    /// (PrevInProgress) if one is already in flight and `forced` is false;
    /// `forced` requests always proceed and still increment the counter.
    pub fn try_acquire(&self, kind: MetadataRequestKind, forced: bool) -> Option<CoalescingToken<'_>> {
        let mut counters = self.counters.lock().unwrap();
        let count = match kind {
            MetadataRequestKind::FullTopics => &mut counters.full_topics_in_flight,
            MetadataRequestKind::BrokersOnly => &mut counters.full_brokers_in_flight,
        };
        if *count > 0 && !forced {
            return None;
        }
        *count += 1;
        Some(CoalescingToken { guard: self, kind })
    }

    fn release(&self, kind: MetadataRequestKind) {
        let mut counters = self.counters.lock().unwrap();
        let count = match kind {
            MetadataRequestKind::FullTopics => &mut counters.full_topics_in_flight,
            MetadataRequestKind::BrokersOnly => &mut counters.full_brokers_in_flight,
        };
        *count = count.saturating_sub(1);
    }

    #[cfg(test)]
    fn in_flight(&self, kind: MetadataRequestKind) -> u32 {
        let counters = self.counters.lock().unwrap();
        match kind {
            MetadataRequestKind::FullTopics => counters.full_topics_in_flight,
            MetadataRequestKind::BrokersOnly => counters.full_brokers_in_flight,
        }
    }
}

impl Drop for CoalescingToken<'_> {
    fn drop(&mut self) {
        self.guard.release(self.kind);
    }
}
