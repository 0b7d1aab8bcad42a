//! 20-byte facet addresses.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;
use crate::hex;

/// Identifies an independently deployed unit of executable code.
///
/// [`FacetAddress::ZERO`] is the null sentinel: "no facet". It is returned by
/// lookups for unregistered selectors and is the required target of a
/// `Remove` change.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FacetAddress([u8; 20]);

impl FacetAddress {
    pub const LEN: usize = 20;

    pub const ZERO: FacetAddress = FacetAddress([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address whose low bytes hold `n`, big-endian. Handy for fixtures.
    pub const fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        let be = n.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let fixed: [u8; 20] = bytes.try_into().ok()?;
        Some(Self(fixed))
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<[u8; 20]> for FacetAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for FacetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex::write_prefixed(f, &self.0)
    }
}

impl fmt::Debug for FacetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FacetAddress({})", self)
    }
}

impl FromStr for FacetAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode_fixed(s).map(Self)
    }
}

impl Serialize for FacetAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FacetAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Parse an address literal, panicking on malformed input.
#[macro_export]
macro_rules! address {
    ($hex:expr) => {
        $hex.parse::<$crate::FacetAddress>().unwrap()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default_and_null() {
        assert!(FacetAddress::default().is_zero());
        assert!(!FacetAddress::from_low_u64(1).is_zero());
        assert_eq!(
            FacetAddress::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn low_u64_lands_in_trailing_bytes() {
        let a = FacetAddress::from_low_u64(0x0102);
        assert_eq!(a.as_bytes()[18], 0x01);
        assert_eq!(a.as_bytes()[19], 0x02);
        assert!(a.as_bytes()[..18].iter().all(|b| *b == 0));
    }

    #[test]
    fn parse_round_trips_display() {
        let a = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
        assert_eq!(a.to_string(), "0x5fbdb2315678afecb367f032d93f642f64180aa3");
        assert_eq!(a.to_string().parse::<FacetAddress>().unwrap(), a);
    }

    #[test]
    fn from_slice_requires_exact_length() {
        assert!(FacetAddress::from_slice(&[0u8; 19]).is_none());
        assert_eq!(FacetAddress::from_slice(&[0u8; 20]), Some(FacetAddress::ZERO));
    }
}
