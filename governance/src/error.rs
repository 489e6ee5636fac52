use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("no pending value")]
    NoPendingValue,
    #[error("unsupported version {requested}, maximum is {max}")]
    UnsupportedVersion { requested: u64, max: u64 },
    #[error("new version {requested} must be greater than the active one ({active})")]
    VersionNotIncreasing { requested: u64, active: u64 },
    #[error("evm_version must >= {required} (active {active})")]
    EvmVersionTooLow { required: u64, active: u64 },
    #[error("gas_sset too small: {value} < {min}")]
    GasSsetTooSmall { value: u64, min: u64 },
    #[error("gas_price must >= {min}")]
    GasPriceTooLow { min: u64 },
    #[error("can't set gas_price at evm_version {active}")]
    GasPriceLocked { active: u64 },
    #[error("miner_cut must <= 90%")]
    MinerCutTooHigh,
    #[error("can't set miner_cut at evm_version {active}")]
    MinerCutLocked { active: u64 },
    #[error("at least one price must be specified")]
    NoPriceSpecified,
    #[error("zero storage price is not allowed")]
    ZeroStoragePrice,
    #[error("price queue must be empty")]
    PriceQueueNotEmpty,
    #[error("internal error: activation block {block} precedes queue tail {tail}")]
    QueueOutOfOrder { block: u32, tail: u32 },
}
