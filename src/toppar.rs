//! Minimal topic-partition handle (glossary: Toppar): just enough
//! client-side state for the response parser and dispatcher to reference —
//! the full partition/consumer machinery built on top of it is a collaborator
//! out of scope here (§1).

use parking_lot::Mutex;

/// Sentinel committed-offset values used by OffsetFetch's skip rule (§4.B):
/// a partition whose offset is neither of these is considered already valid
/// and is skipped when building the request.
pub const OFFSET_INVALID: i64 = -1001;
pub const OFFSET_STORED: i64 = -1000;

#[derive(Debug)]
pub struct Toppar {
    pub topic: String,
    pub partition: i32,
    committed_offset: Mutex<i64>,
}

impl Toppar {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
            committed_offset: Mutex::new(OFFSET_INVALID),
        }
    }

    pub fn with_offset(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            committed_offset: Mutex::new(offset),
        }
    }

    pub fn committed_offset(&self) -> i64 {
        *self.committed_offset.lock()
    }

    /// True when this partition's offset is already known and doesn't need
    /// to be asked for again (§4.B OffsetFetch skip rule).
    pub fn has_valid_offset(&self) -> bool {
        !matches!(self.committed_offset(), OFFSET_INVALID | OFFSET_STORED)
    }

    /// Writes a freshly fetched offset into the committed-offset slot under
    /// this partition's lock (§4.F OffsetFetch handler, "update_toppar").
    pub fn update_committed_offset(&self, offset: i64) {
        *self.committed_offset.lock() = offset;
    }
}
