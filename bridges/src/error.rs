use evm_common::Name;
use thiserror::Error;

/// Every variant aborts the enclosing unit of work except
/// [`BridgeError::DecodeMismatch`], which only signals that the payload is
/// not a bridge message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("unable to decode bridge message")]
    DecodeMismatch,
    #[error("malformed bridge message: {reason}")]
    MalformedMessage { reason: &'static str },
    #[error("invalid account name '{account}': {reason}")]
    InvalidAccount { account: String, reason: String },
    #[error("receiver not registered: {0}")]
    ReceiverNotRegistered(Name),
    #[error("receiver not found: {0}")]
    ReceiverNotFound(Name),
    #[error("unable to process message: {0} does not accept atomic messages")]
    AtomicNotSupported(Name),
    #[error("min_fee not covered: required {required}, provided {provided}")]
    MinFeeNotCovered { required: u128, provided: u128 },
}

impl BridgeError {
    pub(crate) fn malformed(reason: &'static str) -> Self {
        Self::MalformedMessage { reason }
    }
}
