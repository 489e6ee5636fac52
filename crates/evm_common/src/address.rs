//! Partition of the 20-byte EVM address space that maps native accounts into
//! the embedded machine.
//!
//! A reserved address carries twelve `0xff` bytes in its tail. The leading
//! eight bytes hold the native identifier packed as
//! `byte[i] = (id >> (7 - i)) & 0xff`. Neighbouring bytes overlap, so only
//! identifiers up to [`MAX_ROUND_TRIP_ID`] survive an encode/decode cycle.
//! The layout is consensus-visible and must stay bit-for-bit identical.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AddressError;
use crate::name::Name;

pub const ADDRESS_LEN: usize = 20;

const PACKED_LEN: usize = 8;

/// Tail marker identifying a reserved address.
pub const RESERVED_MARKER: [u8; ADDRESS_LEN - PACKED_LEN] = [0xff; ADDRESS_LEN - PACKED_LEN];

/// Largest identifier for which `extract_reserved_id(make_reserved_address(id)) == id`.
pub const MAX_ROUND_TRIP_ID: u64 = (1 << 15) - 1;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let arr: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Address(arr))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// Reserved address standing in for `id` inside the EVM.
    pub fn reserved(id: u64) -> Self {
        make_reserved_address(id)
    }

    /// Reserved address of a native account, e.g. the bridge contract itself.
    pub fn for_name(name: Name) -> Self {
        make_reserved_address(name.as_u64())
    }

    pub fn is_reserved(&self) -> bool {
        is_reserved_address(self)
    }

    /// Checked form of [`extract_reserved_id`].
    pub fn reserved_id(&self) -> Option<u64> {
        self.is_reserved().then(|| extract_reserved_id(self))
    }
}

pub fn is_reserved_address(address: &Address) -> bool {
    address.0[PACKED_LEN..] == RESERVED_MARKER
}

/// Packs `id` into a reserved address. Bits above [`MAX_ROUND_TRIP_ID`] are
/// folded into the overlapping bytes rather than rejected.
pub fn make_reserved_address(id: u64) -> Address {
    let mut bytes = [0u8; ADDRESS_LEN];
    bytes[PACKED_LEN..].copy_from_slice(&RESERVED_MARKER);
    for (i, byte) in bytes[..PACKED_LEN].iter_mut().enumerate() {
        *byte = ((id >> (7 - i)) & 0xff) as u8;
    }
    Address(bytes)
}

/// Inverse of [`make_reserved_address`]. Callers must check
/// [`is_reserved_address`] first; the result for any other address is
/// meaningless.
pub fn extract_reserved_id(address: &Address) -> u64 {
    address.0[..PACKED_LEN]
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, byte)| acc | (u64::from(*byte) << (7 - i)))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed)?;
        Address::from_slice(&bytes)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
