//! Durable checkpoint of how far ingestion from the native ledger has
//! progressed.
#![forbid(unsafe_code)]

pub mod chain_state;

pub use chain_state::{ChainState, HeadState, StateError, RECORD_LEN, STATE_FILE_NAME};
