//! Snowflake ID Generator
//!
//! Twitter-style unique ID generation for rooms, users and participants.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default epoch (2024-01-01T00:00:00.000Z)
pub const DEFAULT_EPOCH: u64 = 1704067200000;

const SEQUENCE_BITS: u64 = 12;
const MACHINE_BITS: u64 = 10;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const MACHINE_MASK: u64 = (1 << MACHINE_BITS) - 1;

/// Snowflake ID generator
///
/// Layout: 41 bits of milliseconds since `epoch`, 10 bits machine id,
/// 12 bits sequence. Timestamp and sequence share one atomic word so two
/// callers in the same millisecond never observe the same pair.
pub struct SnowflakeGenerator {
    machine_id: u64,
    epoch: u64,
    /// `(timestamp << 12) | sequence` of the last issued id
    state: AtomicU64,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new(machine_id: u64, epoch: u64) -> Self {
        Self {
            machine_id: machine_id & MACHINE_MASK,
            epoch,
            state: AtomicU64::new(0),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut last = self.state.load(Ordering::Acquire);
        loop {
            let now = self.current_timestamp();
            let last_ts = last >> SEQUENCE_BITS;

            let next = if now > last_ts {
                now << SEQUENCE_BITS
            } else if (last & SEQUENCE_MASK) < SEQUENCE_MASK {
                last + 1
            } else {
                // sequence exhausted for this millisecond, borrow the next one
                (last_ts + 1) << SEQUENCE_BITS
            };

            match self
                .state
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let timestamp = next >> SEQUENCE_BITS;
                    let sequence = next & SEQUENCE_MASK;
                    let id = ((timestamp.saturating_sub(self.epoch)) << (MACHINE_BITS + SEQUENCE_BITS))
                        | (self.machine_id << SEQUENCE_BITS)
                        | sequence;
                    return id as i64;
                }
                Err(actual) => last = actual,
            }
        }
    }

    /// Extract the creation timestamp (unix millis) from an id produced by this generator.
    pub fn extract_timestamp(&self, snowflake: i64) -> u64 {
        ((snowflake as u64) >> (MACHINE_BITS + SEQUENCE_BITS)) + self.epoch
    }

    /// Get current timestamp in milliseconds
    fn current_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(self.epoch)
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(1, DEFAULT_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_generate_unique() {
        let gen = SnowflakeGenerator::default();
        let id1 = gen.generate();
        let id2 = gen.generate();
        assert_ne!(id1, id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_extract_timestamp() {
        let gen = SnowflakeGenerator::default();
        let id = gen.generate();
        let ts = gen.extract_timestamp(id);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        assert!(ts <= now + 5);
        assert!(ts > now - 1000);
    }

    #[test]
    fn test_unique_across_threads() {
        let gen = Arc::new(SnowflakeGenerator::new(7, DEFAULT_EPOCH));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = gen.clone();
                std::thread::spawn(move || (0..5000).map(|_| gen.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
    }
}
