//! Maps native-ledger timestamps onto the embedded machine's synthetic block
//! cadence. Everything here works in whole seconds.

use crate::config::MappingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMapping {
    genesis_time: i64,
    block_interval: u32,
}

impl BlockMapping {
    /// A zero interval is treated as one second.
    pub fn new(genesis_time: i64, block_interval_secs: u32) -> Self {
        Self {
            genesis_time,
            block_interval: block_interval_secs.max(1),
        }
    }

    pub fn from_config(cfg: &MappingConfig) -> Self {
        Self::new(cfg.genesis_time, cfg.block_interval_secs)
    }

    pub fn genesis_time(&self) -> i64 {
        self.genesis_time
    }

    pub fn block_interval(&self) -> u32 {
        self.block_interval
    }

    /// `floor((timestamp - genesis) / interval)`; timestamps before genesis
    /// collapse onto index 0.
    pub fn block_index(&self, timestamp: i64) -> u64 {
        if timestamp < self.genesis_time {
            return 0;
        }
        let elapsed = timestamp.abs_diff(self.genesis_time);
        elapsed / u64::from(self.block_interval)
    }

    /// EVM block number holding `timestamp`. Block 0 is genesis, so the first
    /// block after genesis is 1.
    pub fn evm_block_num(&self, timestamp: i64) -> u32 {
        if timestamp < self.genesis_time {
            return 0;
        }
        let index = u32::try_from(self.block_index(timestamp)).unwrap_or(u32::MAX);
        index.saturating_add(1)
    }

    /// Timestamp the EVM reports for `block_num`, saturating at the ends of
    /// `i64`.
    pub fn evm_block_timestamp(&self, block_num: u32) -> i64 {
        let offset = i64::from(block_num).saturating_mul(i64::from(self.block_interval));
        self.genesis_time.saturating_add(offset)
    }
}
