#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod message;
pub mod receiver;

use serde::{Deserialize, Serialize};

pub use codec::{decode_message, BRIDGE_MSG_V0_SELECTOR};
pub use error::BridgeError;
pub use message::{Message, MessageV0};
pub use receiver::{MessageReceiver, ReceiverRegistry, FORCE_ATOMIC};

/// What the decoder does with bytes left over after the payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBytes {
    /// Ignore them, as deployed contracts always have.
    #[default]
    Allow,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub trailing_bytes: TrailingBytes,
    /// Smallest EVM value (in wei) representable by one native token unit.
    #[serde(default = "default_minimum_natively_representable")]
    pub minimum_natively_representable: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            trailing_bytes: TrailingBytes::default(),
            minimum_natively_representable: default_minimum_natively_representable(),
        }
    }
}

// 18 decimals in the EVM against 4 on the native token.
fn default_minimum_natively_representable() -> u64 {
    100_000_000_000_000
}
