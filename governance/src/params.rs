use evm_common::BlockMapping;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GovernanceError;
use crate::promoter::ValuePromoter;
use crate::queue::ActivationQueue;

/// Fixed-point denominator of `miner_cut`.
pub const HUNDRED_PERCENT: u32 = 100_000;
pub const NINETY_PERCENT: u32 = 90_000;

/// First EVM version whose gas parameters are governed.
pub const GAS_PARAMETERS_MIN_VERSION: u64 = 1;
/// First EVM version pricing overhead and storage separately.
pub const GAS_PRICES_MIN_VERSION: u64 = 3;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GovernanceConfig {
    /// Delay between a gas price change and the block it is queued for.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
    #[serde(default = "default_max_evm_version")]
    pub max_evm_version: u64,
    #[serde(default = "default_gas_sset_min")]
    pub gas_sset_min: u64,
    #[serde(default = "default_min_gas_price")]
    pub min_gas_price: u64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period_secs(),
            max_evm_version: default_max_evm_version(),
            gas_sset_min: default_gas_sset_min(),
            min_gas_price: default_min_gas_price(),
        }
    }
}

fn default_grace_period_secs() -> u64 {
    180
}

fn default_max_evm_version() -> u64 {
    3
}

fn default_gas_sset_min() -> u64 {
    2900
}

fn default_min_gas_price() -> u64 {
    1_000_000_000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasParameters {
    pub gas_txnewaccount: u64,
    pub gas_newaccount: u64,
    pub gas_txcreate: u64,
    pub gas_codedeposit: u64,
    pub gas_sset: u64,
}

impl Default for GasParameters {
    fn default() -> Self {
        Self {
            gas_txnewaccount: 0,
            gas_newaccount: 25_000,
            gas_txcreate: 32_000,
            gas_codedeposit: 200,
            gas_sset: 20_000,
        }
    }
}

/// Partial update of [`GasParameters`]; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasParameterUpdate {
    pub gas_txnewaccount: Option<u64>,
    pub gas_newaccount: Option<u64>,
    pub gas_txcreate: Option<u64>,
    pub gas_codedeposit: Option<u64>,
    pub gas_sset: Option<u64>,
}

/// Overhead and storage prices governed from EVM version 3. An absent field
/// leaves that price unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPrices {
    #[serde(default)]
    pub overhead_price: Option<u64>,
    #[serde(default)]
    pub storage_price: Option<u64>,
}

impl GasPrices {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.overhead_price.is_none() && self.storage_price.is_none() {
            return Err(GovernanceError::NoPriceSpecified);
        }
        if self.storage_price == Some(0) {
            return Err(GovernanceError::ZeroStoragePrice);
        }
        Ok(())
    }
}

/// Chain parameters under governance control, each activated on the derived
/// EVM block clock.
///
/// Every setter validates against the non-mutating view first, so a rejected
/// call leaves the parameters exactly as they were, including any promotion
/// that was due.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    evm_version: ValuePromoter<u64>,
    gas_parameters: ValuePromoter<GasParameters>,
    price_queue: ActivationQueue<u64>,
    prices_queue: ActivationQueue<GasPrices>,
    gas_price: u64,
    gas_prices: GasPrices,
    miner_cut: u32,
}

impl ChainParams {
    pub fn new(gas_price: u64, miner_cut: u32) -> Self {
        Self {
            gas_price,
            miner_cut,
            ..Self::default()
        }
    }

    pub fn evm_version(&self, mapping: &BlockMapping, now: i64) -> u64 {
        self.evm_version.get(mapping, now)
    }

    /// Active EVM version, committing a due upgrade. Reaching version 1 or
    /// later zeroes `miner_cut`.
    pub fn evm_version_and_maybe_promote(&mut self, mapping: &BlockMapping, now: i64) -> u64 {
        let (version, promoted) = self.evm_version.get_and_maybe_promote(mapping, now);
        if promoted {
            info!(version, "evm version activated");
            if version >= 1 && self.miner_cut != 0 {
                self.miner_cut = 0;
            }
        }
        version
    }

    /// Stages an upgrade. Version 3 switches gas pricing over to
    /// [`GasPrices`], so it is refused while single-price changes are queued.
    pub fn set_evm_version(
        &mut self,
        version: u64,
        cfg: &GovernanceConfig,
        mapping: &BlockMapping,
        now: i64,
    ) -> Result<(), GovernanceError> {
        if version > cfg.max_evm_version {
            return Err(GovernanceError::UnsupportedVersion {
                requested: version,
                max: cfg.max_evm_version,
            });
        }
        if version == GAS_PRICES_MIN_VERSION && !self.price_queue.is_empty() {
            return Err(GovernanceError::PriceQueueNotEmpty);
        }
        let active = self.evm_version(mapping, now);
        if version <= active {
            return Err(GovernanceError::VersionNotIncreasing {
                requested: version,
                active,
            });
        }
        self.evm_version_and_maybe_promote(mapping, now);
        self.evm_version.stage(|v| *v = version, mapping, now);
        info!(version, staged_at = now, "evm version staged");
        Ok(())
    }

    pub fn gas_parameters(&self, mapping: &BlockMapping, now: i64) -> GasParameters {
        self.gas_parameters.get(mapping, now)
    }

    pub fn gas_parameters_and_maybe_promote(
        &mut self,
        mapping: &BlockMapping,
        now: i64,
    ) -> (GasParameters, bool) {
        self.gas_parameters.get_and_maybe_promote(mapping, now)
    }

    /// Stages the fields present in `update` on top of the effective gas
    /// parameters.
    pub fn update_gas_parameters(
        &mut self,
        update: GasParameterUpdate,
        cfg: &GovernanceConfig,
        mapping: &BlockMapping,
        now: i64,
    ) -> Result<(), GovernanceError> {
        self.require_version(GAS_PARAMETERS_MIN_VERSION, mapping, now)?;
        let sset_min = cfg.gas_sset_min;
        self.gas_parameters.try_stage(
            |params| {
                if let Some(sset) = update.gas_sset {
                    if sset < sset_min {
                        return Err(GovernanceError::GasSsetTooSmall {
                            value: sset,
                            min: sset_min,
                        });
                    }
                    params.gas_sset = sset;
                }
                if let Some(v) = update.gas_txnewaccount {
                    params.gas_txnewaccount = v;
                }
                if let Some(v) = update.gas_newaccount {
                    params.gas_newaccount = v;
                }
                if let Some(v) = update.gas_txcreate {
                    params.gas_txcreate = v;
                }
                if let Some(v) = update.gas_codedeposit {
                    params.gas_codedeposit = v;
                }
                Ok(())
            },
            mapping,
            now,
        )?;
        debug!(staged_at = now, "gas parameters staged");
        Ok(())
    }

    pub fn gas_prices(&self) -> GasPrices {
        self.gas_prices
    }

    /// Below version 3 the prices apply immediately; from version 3 they are
    /// queued behind the grace period.
    pub fn set_gas_prices(
        &mut self,
        prices: GasPrices,
        cfg: &GovernanceConfig,
        mapping: &BlockMapping,
        now: i64,
    ) -> Result<(), GovernanceError> {
        prices.validate()?;
        let active = self.evm_version(mapping, now);
        if active >= GAS_PRICES_MIN_VERSION {
            self.prices_queue
                .enqueue(prices, cfg.grace_period_secs, mapping, now)?;
        } else {
            self.gas_prices = prices;
        }
        self.evm_version_and_maybe_promote(mapping, now);
        Ok(())
    }

    pub fn gas_price(&self) -> u64 {
        self.gas_price
    }

    /// Before version 1 the price applies immediately; from version 1 it is
    /// queued behind the grace period. Version 3 replaces it with
    /// [`GasPrices`].
    pub fn set_gas_price(
        &mut self,
        price: u64,
        cfg: &GovernanceConfig,
        mapping: &BlockMapping,
        now: i64,
    ) -> Result<(), GovernanceError> {
        if price < cfg.min_gas_price {
            return Err(GovernanceError::GasPriceTooLow {
                min: cfg.min_gas_price,
            });
        }
        let active = self.evm_version(mapping, now);
        if active >= GAS_PRICES_MIN_VERSION {
            return Err(GovernanceError::GasPriceLocked { active });
        }
        if active >= 1 {
            self.price_queue
                .enqueue(price, cfg.grace_period_secs, mapping, now)?;
        } else {
            self.gas_price = price;
        }
        self.evm_version_and_maybe_promote(mapping, now);
        Ok(())
    }

    /// Applies every queued price change due at `now` and returns how many
    /// were applied. From version 3 the [`GasPrices`] queue is drained,
    /// before it the single gas price queue.
    pub fn process_price_queue(&mut self, mapping: &BlockMapping, now: i64) -> usize {
        if self.evm_version(mapping, now) >= GAS_PRICES_MIN_VERSION {
            let due = self.prices_queue.process(mapping, now);
            if let Some(last) = due.last() {
                self.gas_prices = last.value;
                info!(block = last.block, "queued gas prices applied");
            }
            due.len()
        } else {
            let due = self.price_queue.process(mapping, now);
            if let Some(last) = due.last() {
                self.gas_price = last.value;
                info!(block = last.block, gas_price = last.value, "queued gas price applied");
            }
            due.len()
        }
    }

    pub fn price_queue(&self) -> &ActivationQueue<u64> {
        &self.price_queue
    }

    pub fn prices_queue(&self) -> &ActivationQueue<GasPrices> {
        &self.prices_queue
    }

    pub fn miner_cut(&self) -> u32 {
        self.miner_cut
    }

    /// Only settable while the EVM version is 0.
    pub fn set_miner_cut(
        &mut self,
        miner_cut: u32,
        mapping: &BlockMapping,
        now: i64,
    ) -> Result<(), GovernanceError> {
        let active = self.evm_version(mapping, now);
        if active != 0 {
            return Err(GovernanceError::MinerCutLocked { active });
        }
        if miner_cut > NINETY_PERCENT {
            return Err(GovernanceError::MinerCutTooHigh);
        }
        self.miner_cut = miner_cut;
        Ok(())
    }

    fn require_version(
        &self,
        required: u64,
        mapping: &BlockMapping,
        now: i64,
    ) -> Result<(), GovernanceError> {
        let active = self.evm_version(mapping, now);
        if active < required {
            return Err(GovernanceError::EvmVersionTooLow { required, active });
        }
        Ok(())
    }
}
