use std::fmt;

use evm_common::Name;
use once_cell::unsync::OnceCell;

use crate::codec::{self, BRIDGE_MSG_V0_SELECTOR};
use crate::error::BridgeError;
use crate::BridgeConfig;

/// A decoded bridge call. New versions get new variants; the layout of an
/// existing variant never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    V0(MessageV0),
}

impl Message {
    /// Like [`codec::decode_message`] but treats an unknown selector as
    /// [`BridgeError::DecodeMismatch`].
    pub fn decode(input: &[u8], cfg: &BridgeConfig) -> Result<Self, BridgeError> {
        codec::decode_message(input, cfg)?.ok_or(BridgeError::DecodeMismatch)
    }

    pub fn selector(&self) -> u32 {
        match self {
            Message::V0(_) => BRIDGE_MSG_V0_SELECTOR,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Message::V0(msg) => codec::encode_v0(msg),
        }
    }
}

#[derive(Clone)]
pub struct MessageV0 {
    account: String,
    force_atomic: bool,
    data: Vec<u8>,
    account_name: OnceCell<Name>,
}

impl MessageV0 {
    pub fn new(account: impl Into<String>, force_atomic: bool, data: Vec<u8>) -> Self {
        Self {
            account: account.into(),
            force_atomic,
            data,
            account_name: OnceCell::new(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn force_atomic(&self) -> bool {
        self.force_atomic
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Native account addressed by this message. The string must be the
    /// canonical spelling of the parsed name; the result is cached.
    pub fn account_as_name(&self) -> Result<Name, BridgeError> {
        self.account_name
            .get_or_try_init(|| {
                let name = Name::parse(&self.account).map_err(|err| BridgeError::InvalidAccount {
                    account: self.account.clone(),
                    reason: err.to_string(),
                })?;
                if name.to_string() != self.account {
                    return Err(BridgeError::InvalidAccount {
                        account: self.account.clone(),
                        reason: "not in canonical form".into(),
                    });
                }
                Ok(name)
            })
            .copied()
    }
}

// The cached name is derived from `account` and takes no part in equality.
impl PartialEq for MessageV0 {
    fn eq(&self, other: &Self) -> bool {
        self.account == other.account
            && self.force_atomic == other.force_atomic
            && self.data == other.data
    }
}

impl Eq for MessageV0 {}

impl fmt::Debug for MessageV0 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageV0")
            .field("account", &self.account)
            .field("force_atomic", &self.force_atomic)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_account_resolves_and_is_cached() {
        let msg = MessageV0::new("rec1", true, vec![1, 2, 3]);
        let name = msg.account_as_name().unwrap();
        assert_eq!(name.to_string(), "rec1");
        assert_eq!(msg.account_name.get(), Some(&name));
        assert_eq!(msg.account_as_name().unwrap(), name);
    }

    #[test]
    fn non_canonical_account_is_rejected() {
        let msg = MessageV0::new("rec1.", false, Vec::new());
        assert!(matches!(
            msg.account_as_name(),
            Err(BridgeError::InvalidAccount { .. })
        ));
        assert!(msg.account_name.get().is_none());

        let msg = MessageV0::new("Rec1", false, Vec::new());
        assert!(matches!(
            msg.account_as_name(),
            Err(BridgeError::InvalidAccount { .. })
        ));
    }

    #[test]
    fn equality_ignores_cache() {
        let a = MessageV0::new("alice", false, vec![9]);
        let b = a.clone();
        a.account_as_name().unwrap();
        assert_eq!(a, b);
    }
}
