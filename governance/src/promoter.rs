//! Two-phase container for a governed value.
//!
//! A staged value becomes effective in the first block after the one it was
//! staged in, judged on the derived EVM block number so every replica agrees
//! on the switch-over block regardless of local clocks. Block numbers place
//! pre-genesis timestamps in block 0 and genesis in block 1, so a value
//! staged before genesis is live from genesis on.

use std::convert::Infallible;

use evm_common::BlockMapping;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GovernanceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingValue<T> {
    pub value: T,
    /// Timestamp (seconds) of the stage call.
    pub staged_at: i64,
}

impl<T> PendingValue<T> {
    pub fn is_active(&self, mapping: &BlockMapping, now: i64) -> bool {
        mapping.evm_block_num(now) > mapping.evm_block_num(self.staged_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePromoter<T> {
    cached: T,
    pending: Option<PendingValue<T>>,
}

impl<T: Clone + Default> ValuePromoter<T> {
    pub fn new(initial: T) -> Self {
        Self {
            cached: initial,
            pending: None,
        }
    }

    /// Last committed value, ignoring any pending entry.
    pub fn cached(&self) -> &T {
        &self.cached
    }

    pub fn pending(&self) -> Option<&PendingValue<T>> {
        self.pending.as_ref()
    }

    pub fn is_staged(&self) -> bool {
        self.pending.is_some()
    }

    /// Effective value at `now`.
    pub fn get(&self, mapping: &BlockMapping, now: i64) -> T {
        match &self.pending {
            Some(pending) if pending.is_active(mapping, now) => pending.value.clone(),
            _ => self.cached.clone(),
        }
    }

    /// Effective value at `now`, committing the pending entry if it has
    /// activated. The flag reports whether a commit happened.
    pub fn get_and_maybe_promote(&mut self, mapping: &BlockMapping, now: i64) -> (T, bool) {
        let active = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.is_active(mapping, now));
        if !active {
            return (self.cached.clone(), false);
        }
        if let Some(pending) = self.pending.take() {
            info!(
                staged_at = pending.staged_at,
                block = mapping.evm_block_num(now),
                "promoted pending value"
            );
            self.cached = pending.value;
        }
        (self.cached.clone(), true)
    }

    /// Applies `mutator` to the effective value and stages the result at
    /// `now`, replacing any entry that has not activated yet.
    pub fn stage<F>(&mut self, mutator: F, mapping: &BlockMapping, now: i64)
    where
        F: FnOnce(&mut T),
    {
        let staged = self.try_stage(
            |value| {
                mutator(value);
                Ok::<(), Infallible>(())
            },
            mapping,
            now,
        );
        match staged {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Fallible [`stage`](Self::stage). When `mutator` fails nothing changes,
    /// not even a promotion that was due.
    pub fn try_stage<F, E>(&mut self, mutator: F, mapping: &BlockMapping, now: i64) -> Result<(), E>
    where
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut value = self.get(mapping, now);
        mutator(&mut value)?;
        self.get_and_maybe_promote(mapping, now);
        if self.pending.is_some() {
            debug!(staged_at = now, "replacing unpromoted pending value");
        }
        self.pending = Some(PendingValue {
            value,
            staged_at: now,
        });
        Ok(())
    }

    /// Commits the pending entry without waiting for its block.
    pub fn force_promote(&mut self) -> Result<(), GovernanceError> {
        let pending = self.pending.take().ok_or(GovernanceError::NoPendingValue)?;
        self.cached = pending.value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> BlockMapping {
        BlockMapping::new(1000, 1)
    }

    #[test]
    fn activation_is_visible_one_block_after_staging() {
        let bm = mapping();
        let mut p = ValuePromoter::new(1u64);
        p.stage(|v| *v = 2, &bm, 1005);
        assert_eq!(p.pending().map(|pv| bm.block_index(pv.staged_at)), Some(5));

        assert_eq!(p.get(&bm, 1005), 1);
        assert_eq!(p.get_and_maybe_promote(&bm, 1005), (1, false));
        assert!(p.is_staged());

        assert_eq!(p.get(&bm, 1006), 2);
        assert_eq!(p.get_and_maybe_promote(&bm, 1006), (2, true));
        assert!(!p.is_staged());

        assert_eq!(p.get_and_maybe_promote(&bm, 1007), (2, false));
    }

    #[test]
    fn get_never_mutates() {
        let bm = mapping();
        let mut p = ValuePromoter::new(1u64);
        p.stage(|v| *v = 9, &bm, 1001);
        let before = p.clone();
        assert_eq!(p.get(&bm, 5000), 9);
        assert_eq!(p, before);
    }

    #[test]
    fn force_promote_requires_pending() {
        let bm = mapping();
        let mut p = ValuePromoter::<u64>::default();
        assert_eq!(p.force_promote(), Err(GovernanceError::NoPendingValue));

        p.stage(|v| *v = 4, &bm, 1000);
        p.force_promote().unwrap();
        assert_eq!(*p.cached(), 4);
        assert!(!p.is_staged());
        assert_eq!(p.force_promote(), Err(GovernanceError::NoPendingValue));
    }

    #[test]
    fn value_staged_before_genesis_is_live_at_genesis() {
        let bm = mapping();
        let mut p = ValuePromoter::new(0u64);
        p.stage(|v| *v = 3, &bm, 990);
        assert_eq!(p.get(&bm, 999), 0);
        assert_eq!(p.get(&bm, 1000), 3);
        assert_eq!(p.get_and_maybe_promote(&bm, 1000), (3, true));
    }

    #[test]
    fn failed_mutator_leaves_state_untouched() {
        let bm = mapping();
        let mut p = ValuePromoter::new(1u64);
        p.stage(|v| *v = 2, &bm, 1001);
        let before = p.clone();

        let res: Result<(), &str> = p.try_stage(|_| Err("rejected"), &bm, 1010);
        assert_eq!(res, Err("rejected"));
        assert_eq!(p, before);
    }
}
