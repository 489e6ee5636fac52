use std::collections::VecDeque;

use evm_common::BlockMapping;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GovernanceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedValue<T> {
    /// EVM block number from which the value applies.
    pub block: u32,
    pub value: T,
}

/// Values waiting for a future EVM block, ordered by activation block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationQueue<T> {
    entries: VecDeque<QueuedValue<T>>,
}

impl<T> Default for ActivationQueue<T> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<T> ActivationQueue<T> {
    /// Schedules `value` for the block after the one reached once
    /// `grace_period_secs` have elapsed. A second value for the same block
    /// replaces the first. Returns the activation block.
    pub fn enqueue(
        &mut self,
        value: T,
        grace_period_secs: u64,
        mapping: &BlockMapping,
        now: i64,
    ) -> Result<u32, GovernanceError> {
        let grace = i64::try_from(grace_period_secs).unwrap_or(i64::MAX);
        let block = mapping
            .evm_block_num(now.saturating_add(grace))
            .saturating_add(1);

        if let Some(tail) = self.entries.back_mut() {
            if block < tail.block {
                return Err(GovernanceError::QueueOutOfOrder {
                    block,
                    tail: tail.block,
                });
            }
            if block == tail.block {
                tail.value = value;
                debug!(block, "replaced queued value");
                return Ok(block);
            }
        }
        self.entries.push_back(QueuedValue { block, value });
        debug!(block, queued = self.entries.len(), "queued value");
        Ok(block)
    }

    /// Activation block of the oldest entry.
    pub fn front_block(&self) -> Option<u32> {
        self.entries.front().map(|entry| entry.block)
    }

    /// Removes and returns, oldest first, every entry due at `now`.
    pub fn process(&mut self, mapping: &BlockMapping, now: i64) -> Vec<QueuedValue<T>> {
        let current = mapping.evm_block_num(now);
        let mut due = Vec::new();
        while self
            .entries
            .front()
            .is_some_and(|entry| entry.block <= current)
        {
            if let Some(entry) = self.entries.pop_front() {
                due.push(entry);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedValue<T>> {
        self.entries.iter()
    }
}
