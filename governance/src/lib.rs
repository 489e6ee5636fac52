//! Governed EVM chain parameters whose changes take effect on the derived
//! EVM block clock rather than on wall-clock deltas.
#![forbid(unsafe_code)]

pub mod error;
pub mod params;
pub mod promoter;
pub mod queue;

pub use error::GovernanceError;
pub use params::{
    ChainParams, GasParameterUpdate, GasParameters, GasPrices, GovernanceConfig,
    GAS_PARAMETERS_MIN_VERSION, GAS_PRICES_MIN_VERSION, HUNDRED_PERCENT, NINETY_PERCENT,
};
pub use promoter::{PendingValue, ValuePromoter};
pub use queue::{ActivationQueue, QueuedValue};
