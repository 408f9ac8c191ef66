//! Allocation counter entity.

/// Name of the counter record that hands out short identifiers.
pub const SHORT_URL_COUNTER: &str = "shortUrl";

/// A named, durable sequence.
///
/// `seq` is the next identifier to hand out. Every identifier in
/// `[baseline, seq)` has been consumed by an allocation, although some may
/// never have been mapped if the mapping insert failed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationCounter {
    pub name: String,
    pub seq: i64,
}

impl AllocationCounter {
    pub fn new(name: impl Into<String>, seq: i64) -> Self {
        Self {
            name: name.into(),
            seq,
        }
    }

    /// Number of identifiers consumed since `baseline`.
    pub fn consumed_since(&self, baseline: i64) -> i64 {
        (self.seq - baseline).max(0)
    }
}
