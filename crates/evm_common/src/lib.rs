//! Deterministic helpers shared by every crate that talks to the embedded EVM:
//! reserved-address partitioning, timestamp to block mapping and native
//! account names.
#![forbid(unsafe_code)]

pub mod address;
pub mod block_mapping;
pub mod config;
pub mod error;
pub mod name;

pub use address::{
    extract_reserved_id, is_reserved_address, make_reserved_address, Address, ADDRESS_LEN,
    MAX_ROUND_TRIP_ID, RESERVED_MARKER,
};
pub use block_mapping::BlockMapping;
pub use config::{load_from_path, MappingConfig};
pub use error::{AddressError, ConfigError, NameError};
pub use name::Name;
