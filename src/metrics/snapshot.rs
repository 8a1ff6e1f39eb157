/// Point-in-time copy of an [`LfuCache`](crate::policy::lfu::LfuCache)'s counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub get_expired: u64,

    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub insert_ignored: u64,

    pub delete_calls: u64,
    pub delete_found: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,

    pub peek_calls: u64,
    pub peek_hits: u64,
    pub frequency_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
    pub bucket_count: usize,
}

impl LfuMetricsSnapshot {
    /// Fraction of `get` calls that returned a value; `0.0` before any reads.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_handles_no_reads() {
        let snapshot = LfuMetricsSnapshot::default();
        assert_eq!(snapshot.hit_rate(), 0.0);

        let snapshot = LfuMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            ..Default::default()
        };
        assert_eq!(snapshot.hit_rate(), 0.75);
    }
}
