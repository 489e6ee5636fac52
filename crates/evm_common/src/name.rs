//! Native ledger account names: up to thirteen characters from a 32-symbol
//! alphabet packed into a `u64`, five bits per character (four for the last).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";
const MAX_LEN: usize = 13;
const TOP_FIVE_BITS: u64 = 0xf800_0000_0000_0000;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(u64);

impl Name {
    pub const fn from_u64(value: u64) -> Self {
        Name(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn parse(s: &str) -> Result<Self, NameError> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_LEN {
            return Err(NameError::TooLong);
        }
        if bytes.is_empty() {
            return Ok(Name(0));
        }

        let head = bytes.len().min(MAX_LEN - 1);
        let mut value = 0u64;
        for &c in &bytes[..head] {
            value <<= 5;
            value |= char_to_value(c)?;
        }
        value <<= 4 + 5 * (MAX_LEN - 1 - head);

        if bytes.len() == MAX_LEN {
            let last = char_to_value(bytes[MAX_LEN - 1])?;
            if last > 0x0f {
                return Err(NameError::InvalidThirteenthCharacter);
            }
            value |= last;
        }
        Ok(Name(value))
    }
}

fn char_to_value(c: u8) -> Result<u64, NameError> {
    match c {
        b'.' => Ok(0),
        b'1'..=b'5' => Ok(u64::from(c - b'1') + 1),
        b'a'..=b'z' => Ok(u64::from(c - b'a') + 6),
        other => Err(NameError::InvalidCharacter(char::from(other))),
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(MAX_LEN);
        let mut v = self.0;
        for i in 0..MAX_LEN {
            if v == 0 {
                break;
            }
            let shift = if i == MAX_LEN - 1 { 60 } else { 59 };
            let idx = ((v & TOP_FIVE_BITS) >> shift) as usize;
            out.push(char::from(CHARMAP[idx]));
            v <<= 5;
        }
        f.write_str(&out)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(Name::parse("").unwrap().as_u64(), 0);
        assert_eq!(Name::parse("a").unwrap().as_u64(), 6u64 << 59);
        assert_eq!(Name::parse("1").unwrap().as_u64(), 1u64 << 59);
        assert_eq!(Name::parse("zzzzzzzzzzzzj").unwrap().as_u64(), u64::MAX);
    }

    #[test]
    fn canonical_names_round_trip() {
        for raw in ["evm", "alice", "eosio.token", "rec1", "a.b.c", "zzzzzzzzzzzzj"] {
            let name: Name = raw.parse().unwrap();
            assert_eq!(name.to_string(), raw);
        }
    }

    #[test]
    fn trailing_dots_are_dropped_on_display() {
        let name = Name::parse("abc..").unwrap();
        assert_eq!(name.to_string(), "abc");
        assert_eq!(name, Name::parse("abc").unwrap());
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Name::parse("Alice"), Err(NameError::InvalidCharacter('A')));
        assert_eq!(Name::parse("a6"), Err(NameError::InvalidCharacter('6')));
        assert_eq!(Name::parse("aaaaaaaaaaaaaa"), Err(NameError::TooLong));
        assert_eq!(
            Name::parse("aaaaaaaaaaaak"),
            Err(NameError::InvalidThirteenthCharacter)
        );
    }
}
