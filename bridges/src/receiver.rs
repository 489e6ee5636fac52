use std::collections::BTreeMap;

use evm_common::Name;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::BridgeError;
use crate::message::MessageV0;
use crate::BridgeConfig;

/// Receiver accepts messages with `force_atomic` set.
pub const FORCE_ATOMIC: u32 = 0x1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceiver {
    pub account: Name,
    /// Contract notified with the message.
    pub handler: Name,
    /// Minimum value, in native token units, a message must carry.
    pub min_fee: u64,
    pub flags: u32,
}

impl MessageReceiver {
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

/// Native accounts willing to receive bridge messages.
#[derive(Debug, Clone, Default)]
pub struct ReceiverRegistry {
    receivers: BTreeMap<Name, MessageReceiver>,
}

impl ReceiverRegistry {
    /// Inserts or replaces the registration of `account`.
    pub fn register(&mut self, account: Name, handler: Name, min_fee: u64) {
        let receiver = MessageReceiver {
            account,
            handler,
            min_fee,
            flags: FORCE_ATOMIC,
        };
        if self.receivers.insert(account, receiver).is_some() {
            debug!(%account, %handler, min_fee, "bridge receiver updated");
        } else {
            info!(%account, %handler, min_fee, "bridge receiver registered");
        }
    }

    pub fn unregister(&mut self, account: Name) -> Result<MessageReceiver, BridgeError> {
        self.receivers
            .remove(&account)
            .ok_or(BridgeError::ReceiverNotFound(account))
    }

    pub fn status(&self, account: Name) -> Option<&MessageReceiver> {
        self.receivers.get(&account)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageReceiver> {
        self.receivers.values()
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Resolves the receiver of `msg` carrying `value` wei and checks it may
    /// accept the message.
    pub fn route(
        &self,
        msg: &MessageV0,
        value: u128,
        cfg: &BridgeConfig,
    ) -> Result<&MessageReceiver, BridgeError> {
        let account = msg.account_as_name()?;
        let receiver = self
            .receivers
            .get(&account)
            .ok_or(BridgeError::ReceiverNotRegistered(account))?;
        if msg.force_atomic() && !receiver.has_flag(FORCE_ATOMIC) {
            return Err(BridgeError::AtomicNotSupported(account));
        }
        let required =
            u128::from(receiver.min_fee) * u128::from(cfg.minimum_natively_representable);
        if value < required {
            return Err(BridgeError::MinFeeNotCovered {
                required,
                provided: value,
            });
        }
        debug!(%account, handler = %receiver.handler, value, "bridge message routed");
        Ok(receiver)
    }

    pub(crate) fn insert_state(&mut self, receiver: MessageReceiver) {
        self.receivers.insert(receiver.account, receiver);
    }
}

impl FromIterator<MessageReceiver> for ReceiverRegistry {
    fn from_iter<I: IntoIterator<Item = MessageReceiver>>(iter: I) -> Self {
        let mut registry = ReceiverRegistry::default();
        for receiver in iter {
            registry.insert_state(receiver);
        }
        registry
    }
}
