//! Wire format of messages an EVM contract sends to the bridge's reserved
//! address. The payload is the ABI encoding of
//! `bridgeMsgV0(string account, bool force_atomic, bytes data)`:
//!
//! ```text
//! selector      4 bytes  0xf781185b
//! offset        32 bytes 0x60
//! force_atomic  32 bytes 0 or 1
//! offset        32 bytes 0xa0
//! account len   32 bytes, followed by account bytes padded to 32
//! data len      32 bytes, followed by data bytes padded to 32
//! ```
//!
//! All words are big-endian.

use tracing::trace;

use crate::error::BridgeError;
use crate::message::{Message, MessageV0};
use crate::{BridgeConfig, TrailingBytes};

/// First four bytes of `keccak256("bridgeMsgV0(string,bool,bytes)")`.
pub const BRIDGE_MSG_V0_SELECTOR: u32 = 0xf781_185b;

const WORD_LEN: usize = 32;
const ACCOUNT_OFFSET: u64 = 0x60;
const DATA_OFFSET: u64 = 0xa0;

type Word = [u8; WORD_LEN];

/// Decodes a bridge call. `Ok(None)` means the selector belongs to no known
/// message version; every structural violation is an error.
pub fn decode_message(input: &[u8], cfg: &BridgeConfig) -> Result<Option<Message>, BridgeError> {
    let mut cursor = input;
    let selector = read_u32(&mut cursor)?;
    match selector {
        BRIDGE_MSG_V0_SELECTOR => {
            let msg = decode_v0(&mut cursor)?;
            if cfg.trailing_bytes == TrailingBytes::Reject && !cursor.is_empty() {
                return Err(BridgeError::malformed("unexpected trailing bytes"));
            }
            Ok(Some(Message::V0(msg)))
        }
        other => {
            trace!(selector = other, "payload is not a bridge message");
            Ok(None)
        }
    }
}

fn decode_v0(input: &mut &[u8]) -> Result<MessageV0, BridgeError> {
    expect_word(input, ACCOUNT_OFFSET, "invalid account offset")?;
    let force_atomic = match word_to_u64(&read_word(input)?) {
        Some(0) => false,
        Some(1) => true,
        _ => return Err(BridgeError::malformed("invalid force_atomic flag")),
    };
    expect_word(input, DATA_OFFSET, "invalid data offset")?;

    let account = read_dynamic(input)?;
    let data = read_dynamic(input)?;
    let account =
        String::from_utf8(account).map_err(|_| BridgeError::malformed("account is not utf-8"))?;
    Ok(MessageV0::new(account, force_atomic, data))
}

/// Length-prefixed field whose body is padded to a word boundary.
fn read_dynamic(input: &mut &[u8]) -> Result<Vec<u8>, BridgeError> {
    let len = word_to_u64(&read_word(input)?)
        .filter(|len| *len <= u64::from(u32::MAX))
        .ok_or(BridgeError::malformed("invalid length"))?;
    let padded = (len + WORD_LEN as u64 - 1) / WORD_LEN as u64 * WORD_LEN as u64;
    let padded = usize::try_from(padded).map_err(|_| BridgeError::malformed("invalid length"))?;
    let body = take(input, padded)?;
    Ok(body[..len as usize].to_vec())
}

fn expect_word(input: &mut &[u8], expected: u64, reason: &'static str) -> Result<(), BridgeError> {
    match word_to_u64(&read_word(input)?) {
        Some(value) if value == expected => Ok(()),
        _ => Err(BridgeError::malformed(reason)),
    }
}

/// Value of a big-endian word if it fits in 64 bits.
fn word_to_u64(word: &Word) -> Option<u64> {
    let (high, low) = word.split_at(WORD_LEN - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(low);
    Some(u64::from_be_bytes(buf))
}

fn take<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8], BridgeError> {
    if input.len() < len {
        return Err(BridgeError::malformed("unexpected end of message"));
    }
    let (prefix, rest) = input.split_at(len);
    *input = rest;
    Ok(prefix)
}

fn read_u32(input: &mut &[u8]) -> Result<u32, BridgeError> {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(take(input, 4)?);
    Ok(u32::from_be_bytes(buf))
}

fn read_word(input: &mut &[u8]) -> Result<Word, BridgeError> {
    let mut word = [0u8; WORD_LEN];
    word.copy_from_slice(take(input, WORD_LEN)?);
    Ok(word)
}

fn write_word(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&[0u8; WORD_LEN - 8]);
    out.extend_from_slice(&value.to_be_bytes());
}

fn write_dynamic(out: &mut Vec<u8>, bytes: &[u8]) {
    write_word(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
    let rem = bytes.len() % WORD_LEN;
    if rem != 0 {
        out.resize(out.len() + WORD_LEN - rem, 0);
    }
}

/// Canonical version-0 encoding of `msg`.
pub(crate) fn encode_v0(msg: &MessageV0) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 5 * WORD_LEN + msg.account().len() + msg.data().len());
    out.extend_from_slice(&BRIDGE_MSG_V0_SELECTOR.to_be_bytes());
    write_word(&mut out, ACCOUNT_OFFSET);
    write_word(&mut out, u64::from(msg.force_atomic()));
    write_word(&mut out, DATA_OFFSET);
    write_dynamic(&mut out, msg.account().as_bytes());
    write_dynamic(&mut out, msg.data());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_to_u64_rejects_high_bits() {
        let mut word = [0u8; WORD_LEN];
        word[31] = 0x60;
        assert_eq!(word_to_u64(&word), Some(0x60));
        word[0] = 1;
        assert_eq!(word_to_u64(&word), None);
    }

    #[test]
    fn dynamic_fields_are_padded_to_words() {
        let mut out = Vec::new();
        write_dynamic(&mut out, b"alice");
        assert_eq!(out.len(), 2 * WORD_LEN);
        let mut cursor = out.as_slice();
        assert_eq!(read_dynamic(&mut cursor).unwrap(), b"alice");
        assert!(cursor.is_empty());

        let mut out = Vec::new();
        write_dynamic(&mut out, &[]);
        assert_eq!(out.len(), WORD_LEN);
    }

    #[test]
    fn short_selector_is_malformed() {
        let err = decode_message(&[0xf7, 0x81], &BridgeConfig::default()).unwrap_err();
        assert_eq!(err, BridgeError::malformed("unexpected end of message"));
    }
}
